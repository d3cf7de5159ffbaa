//! Rejected operations

use thiserror::Error;

/// Why a spin request was rejected
///
/// Rejections leave every piece of state untouched: no debit, no counter
/// change, no timers scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SpinError {
    #[error("balance {balance} cannot cover bet {bet}")]
    InsufficientBalance { balance: f64, bet: f64 },
    #[error("a spin cycle is already in progress")]
    SpinInProgress,
}
