//! Symbol catalog and virtual reel strips

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A symbol definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    /// Unique symbol ID
    pub id: u32,
    /// Stable machine name (e.g., "seven", "bell")
    pub slug: String,
    /// Display name
    pub name: String,
    /// Payout weight; every win amount is a multiple of this
    pub value: f64,
    /// Display color (hex)
    pub color: String,
    /// Display glyph
    pub glyph: String,
}

impl Symbol {
    /// Create a symbol definition
    pub fn new(
        id: u32,
        slug: impl Into<String>,
        name: impl Into<String>,
        value: f64,
        color: impl Into<String>,
        glyph: impl Into<String>,
    ) -> Self {
        Self {
            id,
            slug: slug.into(),
            name: name.into(),
            value,
            color: color.into(),
            glyph: glyph.into(),
        }
    }
}

/// The fixed symbol set a game is built from
///
/// Ordered by descending `value`; IDs are unique within a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolCatalog {
    pub symbols: Vec<Symbol>,
}

impl SymbolCatalog {
    /// The classic 6-symbol fruit-machine catalog
    pub fn classic() -> Self {
        let symbols = vec![
            Symbol::new(1, "seven", "Seven", 100.0, "#FFD700", "7\u{fe0f}\u{20e3}"),
            Symbol::new(2, "bell", "Bell", 50.0, "#FFA500", "\u{1f514}"),
            Symbol::new(3, "cherry", "Cherry", 25.0, "#FF0000", "\u{1f352}"),
            Symbol::new(4, "lemon", "Lemon", 15.0, "#FFFF00", "\u{1f34b}"),
            Symbol::new(5, "orange", "Orange", 10.0, "#FF8C00", "\u{1f34a}"),
            Symbol::new(6, "plum", "Plum", 5.0, "#800080", "\u{1fad0}"),
        ];

        Self { symbols }
    }

    /// Get symbol by ID
    pub fn get(&self, id: u32) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.id == id)
    }

    /// Get symbol by slug
    pub fn get_by_slug(&self, slug: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.slug == slug)
    }

    /// All symbol IDs, catalog order
    pub fn ids(&self) -> Vec<u32> {
        self.symbols.iter().map(|s| s.id).collect()
    }

    /// Payout value for a symbol ID (0.0 if unknown)
    pub fn value_of(&self, id: u32) -> f64 {
        self.get(id).map(|s| s.value).unwrap_or(0.0)
    }

    /// Number of symbols in the catalog
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// IDs unique and every value positive
    pub fn is_well_formed(&self) -> bool {
        if self.symbols.is_empty() {
            return false;
        }
        let mut ids: Vec<u32> = self.ids();
        ids.sort_unstable();
        ids.dedup();
        ids.len() == self.symbols.len() && self.symbols.iter().all(|s| s.value > 0.0)
    }
}

impl Default for SymbolCatalog {
    fn default() -> Self {
        Self::classic()
    }
}

/// A virtual reel strip
///
/// Longer than the visible window; the window slides over it, wrapping at
/// the end to simulate continuous scrolling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelStrip {
    /// Symbol IDs in strip order
    pub symbols: Vec<u32>,
    /// Reel index
    pub reel_index: u8,
}

impl ReelStrip {
    /// Create a strip from explicit symbol IDs
    pub fn new(reel_index: u8, symbols: Vec<u32>) -> Self {
        Self { symbols, reel_index }
    }

    /// Generate a strip of `length` symbols drawn uniformly (with
    /// replacement) from the catalog
    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        reel_index: u8,
        length: usize,
        catalog: &SymbolCatalog,
    ) -> Self {
        let ids = catalog.ids();
        if ids.is_empty() {
            return Self::new(reel_index, Vec::new());
        }
        let symbols = (0..length)
            .map(|_| ids[rng.random_range(0..ids.len())])
            .collect();
        Self { symbols, reel_index }
    }

    /// Get symbol at position (wraps around)
    pub fn symbol_at(&self, position: usize) -> u32 {
        if self.symbols.is_empty() {
            return 0;
        }
        self.symbols[position % self.symbols.len()]
    }

    /// `count` consecutive symbols starting at `position`, wrapping
    pub fn window(&self, position: usize, count: usize) -> Vec<u32> {
        if self.symbols.is_empty() {
            return Vec::new();
        }
        (0..count).map(|i| self.symbol_at(position + i)).collect()
    }

    /// Total strip length
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
