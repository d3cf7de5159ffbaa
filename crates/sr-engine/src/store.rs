//! Game state store
//!
//! The single source of truth for player-facing state. Every mutation goes
//! through a named operation, and each completed operation notifies the
//! subscribers synchronously, in subscription order.

use serde::{Deserialize, Serialize};

use sr_core::{GameConfig, WinResult};

/// Authoritative player-facing state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Current balance
    pub balance: f64,
    /// Current bet
    pub bet: f64,
    /// A spin cycle is in flight
    pub is_spinning: bool,
    /// Payout of the current/most recent spin
    pub win_amount: f64,
    /// Payout of the most recently settled spin
    pub last_win: f64,
    /// Lifetime spin counter
    pub spin_count: u64,
    /// Win details of the most recent spin
    pub last_wins: Vec<WinResult>,
    /// Lifetime winnings accumulator
    pub total_winnings: f64,
}

impl GameState {
    /// Session defaults for a config
    pub fn initial(config: &GameConfig) -> Self {
        Self {
            balance: config.initial_balance,
            bet: config.min_bet,
            is_spinning: false,
            win_amount: 0.0,
            last_win: 0.0,
            spin_count: 0,
            last_wins: Vec::new(),
            total_winnings: 0.0,
        }
    }
}

/// Handle for detaching a state observer
pub type SubscriptionId = u64;

type StateObserver = Box<dyn FnMut(&GameState) + Send>;

/// Owns [`GameState`] and its observers
pub struct GameStore {
    state: GameState,
    min_bet: f64,
    max_bet: f64,
    initial: GameState,
    subscribers: Vec<(SubscriptionId, StateObserver)>,
    next_subscription: SubscriptionId,
}

impl GameStore {
    /// Create a store with the config's defaults
    pub fn new(config: &GameConfig) -> Self {
        let initial = GameState::initial(config);
        Self {
            state: initial.clone(),
            min_bet: config.min_bet,
            max_bet: config.max_bet,
            initial,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Attach an observer; it receives the current state immediately and
    /// after every subsequent mutation
    pub fn subscribe(&mut self, mut observer: impl FnMut(&GameState) + Send + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        observer(&self.state);
        self.subscribers.push((id, Box::new(observer)));
        id
    }

    /// Detach an observer
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    /// Set the bet, clamped to the configured `[min_bet, max_bet]`
    ///
    /// Non-finite input collapses to the minimum bet.
    pub fn set_bet(&mut self, amount: f64) {
        let amount = if amount.is_finite() { amount } else { self.min_bet };
        self.state.bet = amount.clamp(self.min_bet, self.max_bet);
        log::trace!("bet set to {}", self.state.bet);
        self.notify();
    }

    /// Zero the current win presentation without touching balance or counters
    pub fn clear_wins(&mut self) {
        self.state.win_amount = 0.0;
        self.state.last_wins.clear();
        self.notify();
    }

    /// Debit the bet and open a spin cycle
    ///
    /// The orchestrator guards affordability before calling this.
    pub fn begin_spin(&mut self) {
        self.state.balance -= self.state.bet;
        self.state.is_spinning = true;
        self.state.win_amount = 0.0;
        self.state.last_wins.clear();
        self.state.spin_count += 1;
        self.notify();
    }

    /// Credit the payout and close the spin cycle
    pub fn settle_spin(&mut self, wins: Vec<WinResult>, payout: f64) {
        self.state.balance += payout;
        self.state.is_spinning = false;
        self.state.win_amount = payout;
        self.state.last_win = payout;
        self.state.total_winnings += payout;
        self.state.last_wins = wins;
        self.notify();
    }

    /// Restore session defaults
    pub fn reset(&mut self) {
        self.state = self.initial.clone();
        self.notify();
    }

    fn notify(&mut self) {
        for (_, observer) in self.subscribers.iter_mut() {
            observer(&self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn store() -> GameStore {
        GameStore::new(&GameConfig::classic())
    }

    #[test]
    fn test_initial_state() {
        let store = store();
        let state = store.state();
        assert_eq!(state.balance, 1000.0);
        assert_eq!(state.bet, 1.0);
        assert!(!state.is_spinning);
        assert_eq!(state.spin_count, 0);
        assert!(state.last_wins.is_empty());
        assert_eq!(state.total_winnings, 0.0);
    }

    #[test]
    fn test_set_bet_clamps() {
        let mut store = store();

        store.set_bet(10.0);
        assert_eq!(store.state().bet, 10.0);

        store.set_bet(-5.0);
        assert_eq!(store.state().bet, 1.0);

        store.set_bet(250.0);
        assert_eq!(store.state().bet, 100.0);

        store.set_bet(f64::NAN);
        assert_eq!(store.state().bet, 1.0);
    }

    #[test]
    fn test_bet_clamp_ignores_balance() {
        let mut store = store();
        // Drain the whole balance
        store.set_bet(100.0);
        for _ in 0..10 {
            store.begin_spin();
            store.settle_spin(Vec::new(), 0.0);
        }
        assert_eq!(store.state().balance, 0.0);

        // Config max still wins over live balance
        store.set_bet(100.0);
        assert_eq!(store.state().bet, 100.0);
    }

    #[test]
    fn test_subscribe_receives_immediate_snapshot() {
        let mut store = store();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |state| sink.lock().unwrap().push(state.balance));

        assert_eq!(seen.lock().unwrap().as_slice(), &[1000.0]);

        store.begin_spin();
        assert_eq!(seen.lock().unwrap().as_slice(), &[1000.0, 999.0]);
    }

    #[test]
    fn test_notification_order_is_subscription_order() {
        let mut store = store();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let sink = order.clone();
            store.subscribe(move |_| sink.lock().unwrap().push(tag));
        }
        order.lock().unwrap().clear();

        store.set_bet(5.0);
        assert_eq!(
            order.lock().unwrap().as_slice(),
            &["first", "second", "third"]
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut store = store();
        let count = Arc::new(Mutex::new(0u32));
        let sink = count.clone();
        let id = store.subscribe(move |_| *sink.lock().unwrap() += 1);
        assert_eq!(*count.lock().unwrap(), 1);

        store.unsubscribe(id);
        store.set_bet(3.0);
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn test_spin_accounting() {
        let mut store = store();
        store.set_bet(10.0);

        store.begin_spin();
        let state = store.state();
        assert_eq!(state.balance, 990.0);
        assert!(state.is_spinning);
        assert_eq!(state.spin_count, 1);

        store.settle_spin(Vec::new(), 300.0);
        let state = store.state();
        assert_eq!(state.balance, 1290.0);
        assert!(!state.is_spinning);
        assert_eq!(state.win_amount, 300.0);
        assert_eq!(state.last_win, 300.0);
        assert_eq!(state.total_winnings, 300.0);
    }

    #[test]
    fn test_clear_wins_is_surgical() {
        let mut store = store();
        store.begin_spin();
        store.settle_spin(Vec::new(), 50.0);

        store.clear_wins();
        let state = store.state();
        assert_eq!(state.win_amount, 0.0);
        assert!(state.last_wins.is_empty());
        // Untouched
        assert_eq!(state.last_win, 50.0);
        assert_eq!(state.balance, 1049.0);
        assert_eq!(state.spin_count, 1);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut store = store();
        store.set_bet(25.0);
        store.begin_spin();
        store.settle_spin(Vec::new(), 10.0);

        store.reset();
        assert_eq!(store.state(), &GameState::initial(&GameConfig::classic()));
    }
}
