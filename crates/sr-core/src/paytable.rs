//! Paytable and win evaluation
//!
//! Evaluation is a pure function of the visible windows: same windows in,
//! same wins out. Missing or short reel data never fails — it simply cannot
//! contribute a match.

use serde::{Deserialize, Serialize};

use crate::symbols::SymbolCatalog;

/// Bonus multiplier applied to horizontal matches
pub const HORIZONTAL_BONUS: f64 = 2.0;

/// Minimum matching symbols for a reel win
pub const REEL_MATCH_MIN: usize = 3;

/// Minimum matching symbols for a horizontal win
pub const HORIZONTAL_MATCH_MIN: usize = 2;

/// A payline definition (legacy win mode)
///
/// Positions are flat indices into the visible grid, column-major:
/// `index = reel × visible_symbols + row`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayLine {
    /// Payline index (0-based)
    pub index: u8,
    /// Flat grid positions
    pub positions: Vec<u16>,
    /// Win multiplier for this line
    pub multiplier: u32,
}

impl PayLine {
    /// Create a payline
    pub fn new(index: u8, positions: Vec<u16>, multiplier: u32) -> Self {
        Self {
            index,
            positions,
            multiplier,
        }
    }
}

/// The classic line set for a 3-reel, 3-visible grid
///
/// Three single-reel column lines (×1) and the two diagonals (×2).
pub fn classic_paylines() -> Vec<PayLine> {
    vec![
        PayLine::new(0, vec![0, 1, 2], 1),
        PayLine::new(1, vec![3, 4, 5], 1),
        PayLine::new(2, vec![6, 7, 8], 1),
        PayLine::new(3, vec![0, 4, 8], 2),
        PayLine::new(4, vec![2, 4, 6], 2),
    ]
}

/// Which win checks a spin evaluation runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinMode {
    /// Per-reel 3-of-a-kind plus horizontal matches across reels (default)
    #[default]
    ReelHorizontal,
    /// Legacy fixed-payline matching only
    Paylines,
}

/// How a win was matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinKind {
    /// All positions of a fixed payline identical
    Payline,
    /// Three or more of a kind within one reel window
    Reel,
    /// Two or more of a kind at one row across reels
    Horizontal,
}

/// One matched line, reel, or row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinResult {
    /// Winning symbol ID
    pub symbol_id: u32,
    /// Symbol display name
    pub symbol_name: String,
    /// How the win was matched
    pub kind: WinKind,
    /// Number of matching symbols
    pub match_count: u8,
    /// Effective multiplier applied to the symbol value
    pub multiplier: f64,
    /// Win amount
    pub amount: f64,
    /// Payline index (payline wins)
    pub line_index: Option<u8>,
    /// Reel index (reel wins)
    pub reel_index: Option<u8>,
    /// Row index (horizontal wins)
    pub row: Option<u8>,
}

/// Result of evaluating one spin's windows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// All matched wins
    pub wins: Vec<WinResult>,
    /// Sum of win amounts
    pub total_win: f64,
}

impl Evaluation {
    /// Check if this is a winning spin
    pub fn is_win(&self) -> bool {
        self.total_win > 0.0
    }

    /// Number of matched wins
    pub fn win_count(&self) -> usize {
        self.wins.len()
    }
}

/// Complete paytable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayTable {
    /// Symbol definitions
    pub catalog: SymbolCatalog,
    /// Payline definitions (legacy mode)
    pub lines: Vec<PayLine>,
    /// Visible rows per reel (payline position mapping)
    pub visible_symbols: u8,
}

impl PayTable {
    /// Create the classic 3×3 paytable
    pub fn classic() -> Self {
        Self {
            catalog: SymbolCatalog::classic(),
            lines: classic_paylines(),
            visible_symbols: 3,
        }
    }

    /// Create a paytable
    pub fn new(catalog: SymbolCatalog, lines: Vec<PayLine>, visible_symbols: u8) -> Self {
        Self {
            catalog,
            lines,
            visible_symbols,
        }
    }

    /// Evaluate one spin's visible windows under the given mode
    ///
    /// `windows[reel]` is the visible window of that reel, top row first.
    pub fn evaluate(&self, windows: &[Vec<u32>], mode: WinMode) -> Evaluation {
        let mut wins = Vec::new();

        match mode {
            WinMode::ReelHorizontal => {
                self.evaluate_reels(windows, &mut wins);
                self.evaluate_horizontal(windows, &mut wins);
            }
            WinMode::Paylines => {
                self.evaluate_paylines(windows, &mut wins);
            }
        }

        let total_win = wins.iter().map(|w| w.amount).sum();
        Evaluation { wins, total_win }
    }

    /// Reel-match mode: ≥3 of a kind within a single reel window
    fn evaluate_reels(&self, windows: &[Vec<u32>], wins: &mut Vec<WinResult>) {
        for (reel, window) in windows.iter().enumerate() {
            for symbol_id in distinct_in_order(window) {
                let count = window.iter().filter(|&&s| s == symbol_id).count();
                if count < REEL_MATCH_MIN {
                    continue;
                }
                let Some(symbol) = self.catalog.get(symbol_id) else {
                    continue;
                };
                wins.push(WinResult {
                    symbol_id,
                    symbol_name: symbol.name.clone(),
                    kind: WinKind::Reel,
                    match_count: count as u8,
                    multiplier: count as f64,
                    amount: symbol.value * count as f64,
                    line_index: None,
                    reel_index: Some(reel as u8),
                    row: None,
                });
            }
        }
    }

    /// Horizontal mode: ≥2 of a kind at one row across all reels
    fn evaluate_horizontal(&self, windows: &[Vec<u32>], wins: &mut Vec<WinResult>) {
        for row in 0..self.visible_symbols as usize {
            let slice: Vec<u32> = windows
                .iter()
                .filter_map(|w| w.get(row).copied())
                .collect();

            for symbol_id in distinct_in_order(&slice) {
                let count = slice.iter().filter(|&&s| s == symbol_id).count();
                if count < HORIZONTAL_MATCH_MIN {
                    continue;
                }
                let Some(symbol) = self.catalog.get(symbol_id) else {
                    continue;
                };
                let multiplier = count as f64 * HORIZONTAL_BONUS;
                wins.push(WinResult {
                    symbol_id,
                    symbol_name: symbol.name.clone(),
                    kind: WinKind::Horizontal,
                    match_count: count as u8,
                    multiplier,
                    amount: symbol.value * multiplier,
                    line_index: None,
                    reel_index: None,
                    row: Some(row as u8),
                });
            }
        }
    }

    /// Legacy payline mode: all mapped positions identical
    fn evaluate_paylines(&self, windows: &[Vec<u32>], wins: &mut Vec<WinResult>) {
        let rows = self.visible_symbols as usize;
        if rows == 0 {
            return;
        }

        for line in &self.lines {
            let symbols: Vec<u32> = line
                .positions
                .iter()
                .filter_map(|&pos| {
                    let reel = pos as usize / rows;
                    let row = pos as usize % rows;
                    windows.get(reel).and_then(|w| w.get(row)).copied()
                })
                .collect();

            // A line with unavailable positions cannot match
            if symbols.len() != line.positions.len() || symbols.is_empty() {
                continue;
            }

            let first = symbols[0];
            if !symbols.iter().all(|&s| s == first) {
                continue;
            }
            let Some(symbol) = self.catalog.get(first) else {
                continue;
            };
            wins.push(WinResult {
                symbol_id: first,
                symbol_name: symbol.name.clone(),
                kind: WinKind::Payline,
                match_count: symbols.len() as u8,
                multiplier: line.multiplier as f64,
                amount: symbol.value * line.multiplier as f64,
                line_index: Some(line.index),
                reel_index: None,
                row: None,
            });
        }
    }
}

impl Default for PayTable {
    fn default() -> Self {
        Self::classic()
    }
}

/// Distinct values in first-occurrence order
fn distinct_in_order(values: &[u32]) -> Vec<u32> {
    let mut seen = Vec::new();
    for &v in values {
        if !seen.contains(&v) {
            seen.push(v);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEVEN: u32 = 1;
    const BELL: u32 = 2;
    const CHERRY: u32 = 3;
    const LEMON: u32 = 4;
    const ORANGE: u32 = 5;
    const PLUM: u32 = 6;

    fn no_win_windows() -> Vec<Vec<u32>> {
        vec![
            vec![SEVEN, BELL, CHERRY],
            vec![LEMON, ORANGE, PLUM],
            vec![BELL, CHERRY, LEMON],
        ]
    }

    #[test]
    fn test_reel_three_of_a_kind() {
        let paytable = PayTable::classic();
        let mut windows = no_win_windows();
        windows[0] = vec![SEVEN, SEVEN, SEVEN];
        // Kill the incidental row matches
        windows[1] = vec![BELL, CHERRY, LEMON];
        windows[2] = vec![ORANGE, PLUM, BELL];

        let eval = paytable.evaluate(&windows, WinMode::ReelHorizontal);
        assert_eq!(eval.win_count(), 1);

        let win = &eval.wins[0];
        assert_eq!(win.kind, WinKind::Reel);
        assert_eq!(win.reel_index, Some(0));
        assert_eq!(win.match_count, 3);
        assert_eq!(win.amount, 300.0); // Seven value 100 × 3
        assert_eq!(eval.total_win, 300.0);
    }

    #[test]
    fn test_horizontal_full_row() {
        let paytable = PayTable::classic();
        let windows = vec![
            vec![BELL, CHERRY, LEMON],
            vec![BELL, LEMON, ORANGE],
            vec![BELL, PLUM, CHERRY],
        ];

        let eval = paytable.evaluate(&windows, WinMode::ReelHorizontal);
        assert_eq!(eval.win_count(), 1);

        let win = &eval.wins[0];
        assert_eq!(win.kind, WinKind::Horizontal);
        assert_eq!(win.row, Some(0));
        assert_eq!(win.match_count, 3);
        assert_eq!(win.amount, 300.0); // Bell 50 × 3 × 2
    }

    #[test]
    fn test_horizontal_pair() {
        let paytable = PayTable::classic();
        let windows = vec![
            vec![CHERRY, BELL, LEMON],
            vec![CHERRY, LEMON, ORANGE],
            vec![SEVEN, PLUM, BELL],
        ];

        let eval = paytable.evaluate(&windows, WinMode::ReelHorizontal);
        assert_eq!(eval.win_count(), 1);
        assert_eq!(eval.wins[0].match_count, 2);
        assert_eq!(eval.wins[0].amount, 100.0); // Cherry 25 × 2 × 2
    }

    #[test]
    fn test_reel_and_horizontal_union() {
        let paytable = PayTable::classic();
        // Reel 0 is all Sevens; row 0 pairs Seven across reels 0 and 1
        let windows = vec![
            vec![SEVEN, SEVEN, SEVEN],
            vec![SEVEN, BELL, CHERRY],
            vec![LEMON, ORANGE, PLUM],
        ];

        let eval = paytable.evaluate(&windows, WinMode::ReelHorizontal);
        let reel_wins = eval.wins.iter().filter(|w| w.kind == WinKind::Reel).count();
        let horiz_wins = eval
            .wins
            .iter()
            .filter(|w| w.kind == WinKind::Horizontal)
            .count();

        assert_eq!(reel_wins, 1);
        assert_eq!(horiz_wins, 1);
        // Reel: 100 × 3; horizontal pair of Sevens: 100 × 2 × 2
        assert_eq!(eval.total_win, 300.0 + 400.0);
    }

    #[test]
    fn test_payline_column_match() {
        let paytable = PayTable::classic();
        // Reel 1's full window identical → line [3, 4, 5]
        let windows = vec![
            vec![SEVEN, BELL, CHERRY],
            vec![BELL, BELL, BELL],
            vec![LEMON, ORANGE, PLUM],
        ];

        let eval = paytable.evaluate(&windows, WinMode::Paylines);
        assert_eq!(eval.win_count(), 1);
        assert_eq!(eval.wins[0].kind, WinKind::Payline);
        assert_eq!(eval.wins[0].line_index, Some(1));
        assert_eq!(eval.wins[0].amount, 50.0); // Bell 50 × 1
    }

    #[test]
    fn test_payline_diagonal_doubles() {
        let paytable = PayTable::classic();
        // Positions 0, 4, 8: (reel 0, row 0), (reel 1, row 1), (reel 2, row 2)
        let windows = vec![
            vec![SEVEN, BELL, CHERRY],
            vec![LEMON, SEVEN, ORANGE],
            vec![PLUM, BELL, SEVEN],
        ];

        let eval = paytable.evaluate(&windows, WinMode::Paylines);
        assert_eq!(eval.win_count(), 1);
        assert_eq!(eval.wins[0].line_index, Some(3));
        assert_eq!(eval.wins[0].amount, 200.0); // Seven 100 × 2
    }

    #[test]
    fn test_modes_never_mix() {
        let paytable = PayTable::classic();
        // All-Bell reel 1: a payline match AND a reel match, depending on mode
        let windows = vec![
            vec![SEVEN, CHERRY, LEMON],
            vec![BELL, BELL, BELL],
            vec![ORANGE, PLUM, SEVEN],
        ];

        let reel_eval = paytable.evaluate(&windows, WinMode::ReelHorizontal);
        assert!(reel_eval.wins.iter().all(|w| w.kind != WinKind::Payline));

        let line_eval = paytable.evaluate(&windows, WinMode::Paylines);
        assert!(line_eval.wins.iter().all(|w| w.kind == WinKind::Payline));
    }

    #[test]
    fn test_no_win() {
        let paytable = PayTable::classic();
        let eval = paytable.evaluate(&no_win_windows(), WinMode::ReelHorizontal);
        assert!(!eval.is_win());
        assert_eq!(eval.total_win, 0.0);
    }

    #[test]
    fn test_empty_and_short_windows_are_no_wins() {
        let paytable = PayTable::classic();

        let empty: Vec<Vec<u32>> = Vec::new();
        assert!(!paytable.evaluate(&empty, WinMode::ReelHorizontal).is_win());
        assert!(!paytable.evaluate(&empty, WinMode::Paylines).is_win());

        // One reel missing, one short — must not panic, must not match lines
        let ragged = vec![vec![SEVEN, SEVEN, SEVEN], vec![SEVEN]];
        let eval = paytable.evaluate(&ragged, WinMode::Paylines);
        assert!(!eval.is_win());
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let paytable = PayTable::classic();
        let windows = vec![
            vec![SEVEN, SEVEN, SEVEN],
            vec![SEVEN, BELL, BELL],
            vec![SEVEN, BELL, CHERRY],
        ];

        let first = paytable.evaluate(&windows, WinMode::ReelHorizontal);
        for _ in 0..10 {
            assert_eq!(paytable.evaluate(&windows, WinMode::ReelHorizontal), first);
        }
    }
}
