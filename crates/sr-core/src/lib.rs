//! # sr-core — Deterministic slot-machine model
//!
//! Pure data model for the SpinRig session engine: the symbol catalog,
//! virtual reel strips, the paytable with its win-evaluation modes, and the
//! timing plan for a spin cycle. Everything in this crate is deterministic
//! given its inputs; randomness enters only through RNGs passed in by the
//! caller.
//!
//! ## Architecture
//!
//! ```text
//! GameConfig
//!     │
//!     ├── SymbolCatalog (classic 6-symbol set)
//!     ├── PayTable (win modes: reel+horizontal, legacy paylines)
//!     └── TimingConfig (cascade delays)
//!           │
//!           v
//!     windows → PayTable::evaluate → Evaluation → Vec<WinResult>
//!     TimingConfig → SpinSchedule (start/stop/win-check timestamps)
//! ```

pub mod config;
pub mod paytable;
pub mod symbols;
pub mod timing;

pub use config::*;
pub use paytable::*;
pub use symbols::*;
pub use timing::*;
