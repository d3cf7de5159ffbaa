//! Cancellable scheduled-action queue
//!
//! Replaces ad-hoc nested timers with explicit data: each spin cycle owns a
//! generation token, every scheduled action carries the token it was created
//! under, and bumping the generation discards the whole backlog. Stale
//! actions from a cancelled cycle can therefore never reach a handler.

use serde::{Deserialize, Serialize};

/// One step of the spin cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpinAction {
    /// Begin a reel's spin animation
    ReelStart { reel: u8 },
    /// Land a reel at its final position
    ReelStop { reel: u8 },
    /// Evaluate the final windows and settle the spin
    EvaluateWins,
}

/// A pending action with its fire time and cycle token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledAction {
    /// Absolute fire time (ms)
    pub fire_at_ms: f64,
    /// Cycle generation this action belongs to
    pub cycle: u64,
    /// Tie-breaker preserving schedule order at equal fire times
    pub seq: u64,
    /// The action
    pub action: SpinAction,
}

/// Pending-action queue for the spin orchestrator
#[derive(Debug, Default)]
pub struct SpinScheduler {
    pending: Vec<ScheduledAction>,
    cycle: u64,
    next_seq: u64,
}

impl SpinScheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cycle generation
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Start a new cycle: discard every pending action, bump the token
    pub fn begin_cycle(&mut self) -> u64 {
        if !self.pending.is_empty() {
            log::debug!(
                "discarding {} stale action(s) from cycle {}",
                self.pending.len(),
                self.cycle
            );
        }
        self.pending.clear();
        self.cycle += 1;
        self.cycle
    }

    /// Cancel everything without starting a new cycle (reset path)
    pub fn cancel_all(&mut self) {
        self.begin_cycle();
    }

    /// Schedule an action for the current cycle
    pub fn schedule(&mut self, fire_at_ms: f64, action: SpinAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(ScheduledAction {
            fire_at_ms,
            cycle: self.cycle,
            seq,
            action,
        });
    }

    /// Pop every current-cycle action due at `now_ms`, in (fire time, seq)
    /// order; anything carrying a stale cycle token is dropped
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<SpinAction> {
        let cycle = self.cycle;
        let mut due: Vec<ScheduledAction> = Vec::new();
        self.pending.retain(|entry| {
            if entry.cycle != cycle {
                return false;
            }
            if entry.fire_at_ms <= now_ms {
                due.push(entry.clone());
                false
            } else {
                true
            }
        });

        due.sort_by(|a, b| {
            a.fire_at_ms
                .partial_cmp(&b.fire_at_ms)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.seq.cmp(&b.seq))
        });

        due.into_iter().map(|entry| entry.action).collect()
    }

    /// Number of pending actions
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// True when nothing is scheduled
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Fire time of the next pending action, if any
    pub fn next_due(&self) -> Option<f64> {
        self.pending
            .iter()
            .map(|e| e.fire_at_ms)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }
}
