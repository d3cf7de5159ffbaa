//! Reel engine — strips, scroll positions, visible windows
//!
//! Owns the per-reel mutable state. Animation flags and position stepping
//! are cosmetic; the payout is decided solely by the windows read after the
//! orchestrator lands each reel with [`ReelSet::stop_at`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use sr_core::{GameConfig, ReelStrip};

/// One reel's runtime state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelBand {
    /// The virtual strip
    pub strip: ReelStrip,
    /// Scroll position (wraps modulo strip length)
    pub position: usize,
    /// Animation flag; no gameplay effect
    pub is_spinning: bool,
}

/// Published per-reel view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelSnapshot {
    pub reel_index: u8,
    pub position: usize,
    pub is_spinning: bool,
    /// Visible symbol IDs, top row first
    pub window: Vec<u32>,
}

/// All reels of a session
#[derive(Debug, Clone)]
pub struct ReelSet {
    bands: Vec<ReelBand>,
    visible_symbols: u8,
}

impl ReelSet {
    /// Create reels with freshly generated strips
    ///
    /// Reel `i` starts at position `i × 2` so the initial grid is not a
    /// repeated column.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, config: &GameConfig) -> Self {
        let bands = (0..config.reels)
            .map(|i| ReelBand {
                strip: ReelStrip::generate(
                    rng,
                    i,
                    config.symbols_per_reel as usize,
                    &config.symbols,
                ),
                position: i as usize * 2,
                is_spinning: false,
            })
            .collect();

        Self {
            bands,
            visible_symbols: config.visible_symbols,
        }
    }

    /// Replace all strips and reset positions (used by reset)
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &GameConfig) {
        *self = Self::generate(rng, config);
    }

    /// Number of reels
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// The visible window of one reel, top row first
    ///
    /// An out-of-range index yields an empty window rather than failing; the
    /// evaluator treats it as no-win data.
    pub fn visible_window(&self, reel: u8) -> Vec<u32> {
        match self.bands.get(reel as usize) {
            Some(band) => band.strip.window(band.position, self.visible_symbols as usize),
            None => Vec::new(),
        }
    }

    /// All visible windows, reel order
    pub fn windows(&self) -> Vec<Vec<u32>> {
        (0..self.bands.len() as u8)
            .map(|i| self.visible_window(i))
            .collect()
    }

    /// Animation-only: step a reel's position forward by one
    pub fn advance(&mut self, reel: u8) {
        if let Some(band) = self.bands.get_mut(reel as usize) {
            if !band.strip.is_empty() {
                band.position = (band.position + 1) % band.strip.len();
            }
        }
    }

    /// Animation-only: flip a reel's spinning flag
    pub fn set_spinning(&mut self, reel: u8, spinning: bool) {
        if let Some(band) = self.bands.get_mut(reel as usize) {
            band.is_spinning = spinning;
        }
    }

    /// Land a reel at its final position for this cycle
    pub fn stop_at(&mut self, reel: u8, position: usize) {
        if let Some(band) = self.bands.get_mut(reel as usize) {
            if !band.strip.is_empty() {
                band.position = position % band.strip.len();
            }
            band.is_spinning = false;
        }
    }

    /// Strip length of one reel (0 if out of range)
    pub fn strip_len(&self, reel: u8) -> usize {
        self.bands.get(reel as usize).map(|b| b.strip.len()).unwrap_or(0)
    }

    /// Whether any reel is flagged as spinning
    pub fn any_spinning(&self) -> bool {
        self.bands.iter().any(|b| b.is_spinning)
    }

    /// Published per-reel snapshots
    pub fn snapshot(&self) -> Vec<ReelSnapshot> {
        self.bands
            .iter()
            .enumerate()
            .map(|(i, band)| ReelSnapshot {
                reel_index: i as u8,
                position: band.position,
                is_spinning: band.is_spinning,
                window: self.visible_window(i as u8),
            })
            .collect()
    }

    /// Direct access for tests and diagnostics
    pub fn band(&self, reel: u8) -> Option<&ReelBand> {
        self.bands.get(reel as usize)
    }

    /// Full strip of one reel (hosts render it for the scroll animation)
    pub fn strip(&self, reel: u8) -> Option<&ReelStrip> {
        self.bands.get(reel as usize).map(|b| &b.strip)
    }
}
