//! Game configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paytable::{PayLine, PayTable, WinMode, classic_paylines};
use crate::symbols::SymbolCatalog;

/// Configuration invariant violations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid must have at least one reel and one visible row")]
    EmptyGrid,
    #[error("symbol catalog is empty or has duplicate IDs / non-positive values")]
    MalformedCatalog,
    #[error("strip length {strip} is shorter than the visible window {visible}")]
    StripTooShort { strip: u16, visible: u8 },
    #[error("payline {line} position {position} is outside the {cells}-cell grid")]
    PaylineOutOfRange {
        line: u8,
        position: u16,
        cells: u16,
    },
    #[error("bet bounds inverted: min {min} > max {max}")]
    BetBoundsInverted { min: f64, max: f64 },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Static game configuration
///
/// Compiled-in by default; the JSON round-trip exists for tooling, not for
/// runtime loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of reels
    pub reels: u8,
    /// Virtual strip length per reel
    pub symbols_per_reel: u16,
    /// Visible window height per reel
    pub visible_symbols: u8,
    /// Minimum bet
    pub min_bet: f64,
    /// Maximum bet
    pub max_bet: f64,
    /// Starting (and reset) balance
    pub initial_balance: f64,
    /// Active win-evaluation mode
    pub win_mode: WinMode,
    /// Symbol catalog
    pub symbols: SymbolCatalog,
    /// Payline set (legacy mode)
    pub pay_lines: Vec<PayLine>,
}

impl GameConfig {
    /// The classic 3-reel game
    pub fn classic() -> Self {
        Self {
            reels: 3,
            symbols_per_reel: 20,
            visible_symbols: 3,
            min_bet: 1.0,
            max_bet: 100.0,
            initial_balance: 1000.0,
            win_mode: WinMode::ReelHorizontal,
            symbols: SymbolCatalog::classic(),
            pay_lines: classic_paylines(),
        }
    }

    /// Same game evaluated under the legacy payline rules
    pub fn classic_paylines() -> Self {
        Self {
            win_mode: WinMode::Paylines,
            ..Self::classic()
        }
    }

    /// Total visible grid cells
    pub fn grid_cells(&self) -> u16 {
        self.reels as u16 * self.visible_symbols as u16
    }

    /// Build the paytable for this config
    pub fn paytable(&self) -> PayTable {
        PayTable::new(
            self.symbols.clone(),
            self.pay_lines.clone(),
            self.visible_symbols,
        )
    }

    /// Check every configuration invariant
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reels == 0 || self.visible_symbols == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if !self.symbols.is_well_formed() {
            return Err(ConfigError::MalformedCatalog);
        }
        if self.symbols_per_reel < self.visible_symbols as u16 {
            return Err(ConfigError::StripTooShort {
                strip: self.symbols_per_reel,
                visible: self.visible_symbols,
            });
        }
        if self.min_bet > self.max_bet {
            return Err(ConfigError::BetBoundsInverted {
                min: self.min_bet,
                max: self.max_bet,
            });
        }
        let cells = self.grid_cells();
        for line in &self.pay_lines {
            if let Some(&position) = line.positions.iter().find(|&&p| p >= cells) {
                return Err(ConfigError::PaylineOutOfRange {
                    line: line.index,
                    position,
                    cells,
                });
            }
        }
        Ok(())
    }

    /// Export as pretty JSON
    pub fn export_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Import from JSON, validating invariants
    pub fn import_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::debug!("imported game config: {} reels, mode {:?}", config.reels, config.win_mode);
        Ok(config)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic()
    }
}
