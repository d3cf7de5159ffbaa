//! Spin orchestrator — the timed state machine of a spin cycle
//!
//! ```text
//! Idle ──spin()──▶ Starting ──last ReelStart──▶ Stopping
//!   ▲                                              │
//!   └──settle◀── Evaluating ◀──last ReelStop───────┘
//! ```
//!
//! `spin` debits and schedules the whole cascade up front; `tick` drains due
//! actions and runs each handler to completion. The win check is scheduled
//! strictly after the last reel stop, so it always observes the final
//! windows. Rejections (insufficient balance, spin in progress) change
//! nothing.

use rand::Rng;
use serde::{Deserialize, Serialize};

use sr_core::{PayTable, SpinSchedule, TimingConfig, WinMode};

use crate::error::SpinError;
use crate::reels::ReelSet;
use crate::scheduler::{SpinAction, SpinScheduler};
use crate::store::GameStore;

/// Orchestrator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinPhase {
    /// No cycle in flight
    #[default]
    Idle,
    /// Reel-start cascade in flight
    Starting,
    /// All reels started; stop cascade pending or in flight
    Stopping,
    /// All reels stopped; win check pending
    Evaluating,
}

/// What a tick did, for the session to publish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpinEvent {
    /// A reel began its spin animation
    ReelStarted { reel: u8 },
    /// A reel landed at its final position
    ReelStopped { reel: u8 },
    /// The cycle settled; payout credited
    SpinSettled { payout: f64 },
}

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub total_bet: f64,
    pub total_win: f64,
    pub wins: u64,
    pub losses: u64,
    pub max_win_ratio: f64,
}

impl SessionStats {
    /// Return-to-player percentage
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0.0 {
            (self.total_win / self.total_bet) * 100.0
        } else {
            0.0
        }
    }

    /// Winning-spin percentage
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// The spin state machine
pub struct Orchestrator {
    scheduler: SpinScheduler,
    phase: SpinPhase,
    paytable: PayTable,
    win_mode: WinMode,
    timing: TimingConfig,
    stats: SessionStats,
    starts_remaining: u8,
    stops_remaining: u8,
    cycle_bet: f64,
}

impl Orchestrator {
    /// Create an idle orchestrator
    pub fn new(paytable: PayTable, win_mode: WinMode, timing: TimingConfig) -> Self {
        Self {
            scheduler: SpinScheduler::new(),
            phase: SpinPhase::Idle,
            paytable,
            win_mode,
            timing,
            stats: SessionStats::default(),
            starts_remaining: 0,
            stops_remaining: 0,
            cycle_bet: 0.0,
        }
    }

    /// Current phase
    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    /// Session statistics
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Timing configuration
    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// Replace the timing configuration (applies from the next spin)
    pub fn set_timing(&mut self, timing: TimingConfig) {
        self.timing = timing;
    }

    /// Pending scheduled actions (diagnostics)
    pub fn pending_actions(&self) -> usize {
        self.scheduler.pending_len()
    }

    /// Fire time of the next pending action, if any
    pub fn next_action_at(&self) -> Option<f64> {
        self.scheduler.next_due()
    }

    /// Request a spin at `now_ms`
    ///
    /// On success the bet is debited, the cycle's whole cascade is
    /// scheduled, and the phase leaves `Idle`. On rejection nothing
    /// changes.
    pub fn spin(
        &mut self,
        now_ms: f64,
        store: &mut GameStore,
        reels: &ReelSet,
    ) -> Result<(), SpinError> {
        if self.phase != SpinPhase::Idle {
            log::debug!("spin rejected: cycle in progress (phase {:?})", self.phase);
            return Err(SpinError::SpinInProgress);
        }

        let state = store.state();
        if state.balance < state.bet {
            log::debug!(
                "spin rejected: balance {} below bet {}",
                state.balance,
                state.bet
            );
            return Err(SpinError::InsufficientBalance {
                balance: state.balance,
                bet: state.bet,
            });
        }

        // New cycle token; anything stale is discarded before we schedule
        let cycle = self.scheduler.begin_cycle();
        self.cycle_bet = state.bet;
        store.begin_spin();

        let reel_count = reels.len() as u8;
        let plan = SpinSchedule::generate(&self.timing, reel_count, now_ms);
        for (reel, &at) in plan.reel_starts.iter().enumerate() {
            self.scheduler
                .schedule(at, SpinAction::ReelStart { reel: reel as u8 });
        }
        for (reel, &at) in plan.reel_stops.iter().enumerate() {
            self.scheduler
                .schedule(at, SpinAction::ReelStop { reel: reel as u8 });
        }
        self.scheduler.schedule(plan.win_check, SpinAction::EvaluateWins);

        self.phase = SpinPhase::Starting;
        self.starts_remaining = reel_count;
        self.stops_remaining = reel_count;
        self.stats.total_spins += 1;
        self.stats.total_bet += self.cycle_bet;

        log::debug!(
            "spin {} started (cycle {}, bet {}, settles at {}ms)",
            store.state().spin_count,
            cycle,
            self.cycle_bet,
            plan.win_check
        );
        Ok(())
    }

    /// Run every due action; returns what happened, in order
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        now_ms: f64,
        store: &mut GameStore,
        reels: &mut ReelSet,
        rng: &mut R,
    ) -> Vec<SpinEvent> {
        let mut events = Vec::new();

        for action in self.scheduler.drain_due(now_ms) {
            match action {
                SpinAction::ReelStart { reel } => {
                    reels.set_spinning(reel, true);
                    self.starts_remaining = self.starts_remaining.saturating_sub(1);
                    if self.starts_remaining == 0 && self.phase == SpinPhase::Starting {
                        self.phase = SpinPhase::Stopping;
                    }
                    events.push(SpinEvent::ReelStarted { reel });
                }
                SpinAction::ReelStop { reel } => {
                    let strip_len = reels.strip_len(reel);
                    if strip_len > 0 {
                        let position = rng.random_range(0..strip_len);
                        reels.stop_at(reel, position);
                    }
                    self.stops_remaining = self.stops_remaining.saturating_sub(1);
                    if self.stops_remaining == 0 && self.phase == SpinPhase::Stopping {
                        self.phase = SpinPhase::Evaluating;
                    }
                    events.push(SpinEvent::ReelStopped { reel });
                }
                SpinAction::EvaluateWins => {
                    let payout = self.settle(store, reels);
                    events.push(SpinEvent::SpinSettled { payout });
                }
            }
        }

        events
    }

    /// Cancel the cycle in flight; pending actions can never fire again
    pub fn cancel(&mut self) {
        self.scheduler.cancel_all();
        self.phase = SpinPhase::Idle;
        self.starts_remaining = 0;
        self.stops_remaining = 0;
    }

    /// Cancel and zero the statistics (session reset)
    pub fn reset(&mut self) {
        self.cancel();
        self.stats = SessionStats::default();
    }

    fn settle(&mut self, store: &mut GameStore, reels: &ReelSet) -> f64 {
        let windows = reels.windows();
        let eval = self.paytable.evaluate(&windows, self.win_mode);
        let payout = eval.total_win;

        self.stats.total_win += payout;
        if eval.is_win() {
            self.stats.wins += 1;
        } else {
            self.stats.losses += 1;
        }
        if self.cycle_bet > 0.0 {
            let ratio = payout / self.cycle_bet;
            if ratio > self.stats.max_win_ratio {
                self.stats.max_win_ratio = ratio;
            }
        }

        log::debug!(
            "spin settled: {} win(s), payout {}",
            eval.win_count(),
            payout
        );

        store.settle_spin(eval.wins, payout);
        self.phase = SpinPhase::Idle;
        payout
    }
}
