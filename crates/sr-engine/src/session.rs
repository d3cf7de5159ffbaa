//! Session facade
//!
//! One [`GameSession`] is one player sitting at one machine: it owns the
//! store, the reels, the orchestrator, and the RNG, and exposes the whole
//! inbound surface the presentation layer calls. There are no globals; drop
//! the session and every piece of state goes with it.

use rand::SeedableRng;
use rand::rngs::StdRng;

use sr_core::{ConfigError, GameConfig, TimingConfig};

use crate::error::SpinError;
use crate::orchestrator::{Orchestrator, SessionStats, SpinEvent, SpinPhase};
use crate::reels::{ReelSet, ReelSnapshot};
use crate::store::{GameState, GameStore, SubscriptionId};

type ReelObserver = Box<dyn FnMut(&[ReelSnapshot]) + Send>;

/// A complete slot-machine session
pub struct GameSession {
    config: GameConfig,
    store: GameStore,
    reels: ReelSet,
    orchestrator: Orchestrator,
    rng: StdRng,
    reel_subscribers: Vec<(SubscriptionId, ReelObserver)>,
    next_reel_subscription: SubscriptionId,
}

impl GameSession {
    /// Create a session with normal gameplay timing
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_timing(config, TimingConfig::normal())
    }

    /// Create a session with explicit timing
    pub fn with_timing(config: GameConfig, timing: TimingConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = StdRng::from_os_rng();
        let reels = ReelSet::generate(&mut rng, &config);
        let orchestrator = Orchestrator::new(config.paytable(), config.win_mode, timing);
        let store = GameStore::new(&config);

        log::info!(
            "session opened: {} reels × {} visible, balance {}",
            config.reels,
            config.visible_symbols,
            config.initial_balance
        );

        Ok(Self {
            config,
            store,
            reels,
            orchestrator,
            rng,
            reel_subscribers: Vec::new(),
            next_reel_subscription: 0,
        })
    }

    /// Reseed the session RNG for reproducible play
    ///
    /// Also regenerates the reel strips so the whole run is a function of
    /// the seed.
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.reels.regenerate(&mut self.rng, &self.config);
        self.notify_reels();
    }

    // ═══════════════════════════════════════════════════════════════════════
    // INBOUND OPERATIONS
    // ═══════════════════════════════════════════════════════════════════════

    /// Set the bet (clamped to the configured bounds)
    pub fn set_bet(&mut self, amount: f64) {
        self.store.set_bet(amount);
    }

    /// Request a spin at `now_ms`
    pub fn spin(&mut self, now_ms: f64) -> Result<(), SpinError> {
        self.orchestrator.spin(now_ms, &mut self.store, &self.reels)
    }

    /// Advance the clock; runs every due cascade action in order
    pub fn tick(&mut self, now_ms: f64) -> Vec<SpinEvent> {
        let events = self
            .orchestrator
            .tick(now_ms, &mut self.store, &mut self.reels, &mut self.rng);

        if events
            .iter()
            .any(|e| !matches!(e, SpinEvent::SpinSettled { .. }))
        {
            self.notify_reels();
        }
        events
    }

    /// Drive every pending action to completion in fire-time order
    ///
    /// Virtual-time fast path for tests and batch simulation; equivalent to
    /// ticking at each scheduled timestamp.
    pub fn fast_forward(&mut self) -> Vec<SpinEvent> {
        let mut events = Vec::new();
        while let Some(at) = self.orchestrator.next_action_at() {
            events.extend(self.tick(at));
        }
        events
    }

    /// Cancel any cycle in flight and restore full defaults
    ///
    /// Pending cascade actions are discarded first, so nothing stale can
    /// touch the fresh state; strips are regenerated.
    pub fn reset(&mut self) {
        self.orchestrator.reset();
        self.store.reset();
        self.reels.regenerate(&mut self.rng, &self.config);
        log::info!("session reset");
        self.notify_reels();
    }

    /// Zero the win presentation without touching balance or counters
    pub fn clear_wins(&mut self) {
        self.store.clear_wins();
    }

    /// Animation-only: step a spinning reel one position
    pub fn advance(&mut self, reel: u8) {
        self.reels.advance(reel);
        self.notify_reels();
    }

    // ═══════════════════════════════════════════════════════════════════════
    // OUTBOUND STATE
    // ═══════════════════════════════════════════════════════════════════════

    /// Current game state
    pub fn state(&self) -> &GameState {
        self.store.state()
    }

    /// Session statistics
    pub fn stats(&self) -> &SessionStats {
        self.orchestrator.stats()
    }

    /// Orchestrator phase
    pub fn phase(&self) -> SpinPhase {
        self.orchestrator.phase()
    }

    /// Game configuration
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Timing configuration
    pub fn timing(&self) -> &TimingConfig {
        self.orchestrator.timing()
    }

    /// Swap timing (applies from the next spin)
    pub fn set_timing(&mut self, timing: TimingConfig) {
        self.orchestrator.set_timing(timing);
    }

    /// Visible window of one reel, top row first
    pub fn visible_window(&self, reel: u8) -> Vec<u32> {
        self.reels.visible_window(reel)
    }

    /// Published per-reel snapshots
    pub fn reel_snapshot(&self) -> Vec<ReelSnapshot> {
        self.reels.snapshot()
    }

    /// Full strip of one reel (hosts render it for the scroll animation)
    pub fn strip(&self, reel: u8) -> Option<&sr_core::ReelStrip> {
        self.reels.strip(reel)
    }

    /// Fire time of the next scheduled action (host tick pacing)
    pub fn next_action_at(&self) -> Option<f64> {
        self.orchestrator.next_action_at()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // SUBSCRIPTIONS
    // ═══════════════════════════════════════════════════════════════════════

    /// Observe game state; immediate snapshot, then every change, in
    /// subscription order
    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&GameState) + Send + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(observer)
    }

    /// Detach a game state observer
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.store.unsubscribe(id);
    }

    /// Observe per-reel snapshots; immediate snapshot, then every reel
    /// change
    pub fn subscribe_reels(
        &mut self,
        mut observer: impl FnMut(&[ReelSnapshot]) + Send + 'static,
    ) -> SubscriptionId {
        let id = self.next_reel_subscription;
        self.next_reel_subscription += 1;
        observer(&self.reels.snapshot());
        self.reel_subscribers.push((id, Box::new(observer)));
        id
    }

    /// Detach a reel observer
    pub fn unsubscribe_reels(&mut self, id: SubscriptionId) {
        self.reel_subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    fn notify_reels(&mut self) {
        if self.reel_subscribers.is_empty() {
            return;
        }
        let snapshot = self.reels.snapshot();
        for (_, observer) in self.reel_subscribers.iter_mut() {
            observer(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn instant_session() -> GameSession {
        let mut session =
            GameSession::with_timing(GameConfig::classic(), TimingConfig::instant()).unwrap();
        session.seed(1234);
        session
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GameConfig {
            symbols_per_reel: 1,
            ..GameConfig::classic()
        };
        assert!(GameSession::new(config).is_err());
    }

    #[test]
    fn test_full_cycle_through_facade() {
        let mut session = instant_session();
        session.set_bet(10.0);
        session.spin(0.0).unwrap();

        let balance_during = session.state().balance;
        assert_eq!(balance_during, 990.0);
        assert!(session.state().is_spinning);

        let events = session.fast_forward();
        assert!(matches!(events.last(), Some(SpinEvent::SpinSettled { .. })));

        let state = session.state();
        assert!(!state.is_spinning);
        assert_eq!(state.balance, 990.0 + state.win_amount);
        assert_eq!(state.last_win, state.win_amount);
        assert_eq!(state.spin_count, 1);
        assert_eq!(session.phase(), SpinPhase::Idle);
    }

    #[test]
    fn test_seeded_sessions_agree() {
        let run = || {
            let mut session = instant_session();
            session.set_bet(5.0);
            for i in 0..50 {
                session.spin(i as f64).unwrap();
                session.fast_forward();
            }
            (session.state().clone(), session.stats().clone())
        };

        let (state_a, stats_a) = run();
        let (state_b, stats_b) = run();
        assert_eq!(state_a, state_b);
        assert_eq!(stats_a, stats_b);
    }

    #[test]
    fn test_strips_persist_across_spins() {
        let mut session = instant_session();
        let strips_before: Vec<_> = (0..3u8)
            .map(|i| session.strip(i).unwrap().clone())
            .collect();

        for i in 0..10 {
            session.spin(i as f64).unwrap();
            session.fast_forward();
        }

        for (i, before) in strips_before.iter().enumerate() {
            assert_eq!(session.strip(i as u8).unwrap(), before);
        }
    }

    #[test]
    fn test_reset_regenerates_strips() {
        let mut session = instant_session();
        let strips_before: Vec<_> = (0..3u8)
            .map(|i| session.strip(i).unwrap().clone())
            .collect();

        session.reset();

        let changed = (0..3u8).any(|i| session.strip(i).unwrap() != &strips_before[i as usize]);
        assert!(changed);
    }

    #[test]
    fn test_reset_mid_spin_kills_stale_timers() {
        let mut session =
            GameSession::with_timing(GameConfig::classic(), TimingConfig::normal()).unwrap();
        session.seed(77);
        session.spin(0.0).unwrap();
        assert!(session.state().is_spinning);

        session.reset();
        assert!(!session.state().is_spinning);
        assert_eq!(session.state().balance, 1000.0);
        assert_eq!(session.next_action_at(), None);

        // Far-future tick: nothing stale may fire or mutate
        let events = session.tick(1e12);
        assert!(events.is_empty());
        assert_eq!(session.state().balance, 1000.0);
        assert_eq!(session.state().spin_count, 0);
    }

    #[test]
    fn test_state_observer_sees_spin_lifecycle() {
        let mut session = instant_session();
        let spinning_log = Arc::new(Mutex::new(Vec::new()));
        let sink = spinning_log.clone();
        session.subscribe(move |state| sink.lock().unwrap().push(state.is_spinning));

        session.spin(0.0).unwrap();
        session.fast_forward();

        let log = spinning_log.lock().unwrap();
        // Immediate snapshot, debit notification, settle notification
        assert_eq!(log.as_slice(), &[false, true, false]);
    }

    #[test]
    fn test_reel_observer_sees_cascade() {
        let mut session = instant_session();
        let updates = Arc::new(Mutex::new(0u32));
        let sink = updates.clone();
        session.subscribe_reels(move |_| *sink.lock().unwrap() += 1);
        assert_eq!(*updates.lock().unwrap(), 1); // Immediate

        session.spin(0.0).unwrap();
        session.fast_forward();
        assert!(*updates.lock().unwrap() > 1);
    }

    #[test]
    fn test_spin_guard_while_spinning() {
        let mut session = instant_session();
        session.spin(0.0).unwrap();
        let balance = session.state().balance;

        assert_eq!(session.spin(0.0), Err(SpinError::SpinInProgress));
        assert_eq!(session.state().balance, balance);
        assert_eq!(session.state().spin_count, 1);
    }

    #[test]
    fn test_insufficient_balance_spin_is_rejected() {
        let config = GameConfig {
            initial_balance: 50.0,
            ..GameConfig::classic()
        };
        let mut session = GameSession::with_timing(config, TimingConfig::instant()).unwrap();
        session.set_bet(100.0);

        assert!(matches!(
            session.spin(0.0),
            Err(SpinError::InsufficientBalance { .. })
        ));
        assert_eq!(session.state().balance, 50.0);
        assert_eq!(session.state().spin_count, 0);
        assert!(!session.state().is_spinning);
    }
}
