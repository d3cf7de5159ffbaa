//! Thread-safe session handle
//!
//! The session itself is single-threaded; hosts that drive ticks from a
//! timer thread while the UI thread issues operations share one session
//! through this handle. Locking is coarse: one mutex around the whole
//! session, and every call runs to completion under it.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::SpinError;
use crate::orchestrator::{SessionStats, SpinEvent, SpinPhase};
use crate::reels::ReelSnapshot;
use crate::session::GameSession;
use crate::store::{GameState, SubscriptionId};

/// Clone-able, thread-safe wrapper around a [`GameSession`]
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<GameSession>>,
}

impl SessionHandle {
    /// Wrap a session
    pub fn new(session: GameSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Set the bet (clamped)
    pub fn set_bet(&self, amount: f64) {
        self.inner.lock().set_bet(amount);
    }

    /// Request a spin at `now_ms`
    pub fn spin(&self, now_ms: f64) -> Result<(), SpinError> {
        self.inner.lock().spin(now_ms)
    }

    /// Advance the clock
    pub fn tick(&self, now_ms: f64) -> Vec<SpinEvent> {
        self.inner.lock().tick(now_ms)
    }

    /// Drive every pending action to completion
    pub fn fast_forward(&self) -> Vec<SpinEvent> {
        self.inner.lock().fast_forward()
    }

    /// Cancel and restore defaults
    pub fn reset(&self) {
        self.inner.lock().reset();
    }

    /// Zero the win presentation
    pub fn clear_wins(&self) {
        self.inner.lock().clear_wins();
    }

    /// Reseed for reproducible play
    pub fn seed(&self, seed: u64) {
        self.inner.lock().seed(seed);
    }

    /// Snapshot of the current game state
    pub fn state(&self) -> GameState {
        self.inner.lock().state().clone()
    }

    /// Snapshot of the session statistics
    pub fn stats(&self) -> SessionStats {
        self.inner.lock().stats().clone()
    }

    /// Current orchestrator phase
    pub fn phase(&self) -> SpinPhase {
        self.inner.lock().phase()
    }

    /// Visible window of one reel
    pub fn visible_window(&self, reel: u8) -> Vec<u32> {
        self.inner.lock().visible_window(reel)
    }

    /// Per-reel snapshots
    pub fn reel_snapshot(&self) -> Vec<ReelSnapshot> {
        self.inner.lock().reel_snapshot()
    }

    /// Fire time of the next scheduled action
    pub fn next_action_at(&self) -> Option<f64> {
        self.inner.lock().next_action_at()
    }

    /// Attach a game state observer
    pub fn subscribe(
        &self,
        observer: impl FnMut(&GameState) + Send + 'static,
    ) -> SubscriptionId {
        self.inner.lock().subscribe(observer)
    }

    /// Detach a game state observer
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.lock().unsubscribe(id);
    }

    /// Run a closure against the locked session (composite operations)
    pub fn with_session<T>(&self, f: impl FnOnce(&mut GameSession) -> T) -> T {
        f(&mut self.inner.lock())
    }
}
