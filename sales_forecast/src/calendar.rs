//! Calendar helpers: seasons and quarters for a month of the year

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four fixed three-month seasons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Seasons in the order their one-hot indicators appear in a feature vector
    pub const ONE_HOT_ORDER: [Season; 4] =
        [Season::Fall, Season::Spring, Season::Summer, Season::Winter];

    /// Get the season name
    pub fn name(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }

    /// One-hot indicators for this season, in [`Season::ONE_HOT_ORDER`]
    pub fn one_hot(&self) -> [f64; 4] {
        Self::ONE_HOT_ORDER.map(|s| if s == *self { 1.0 } else { 0.0 })
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Wrap any month number onto 1..=12 (0 is December, 13 is January)
fn normalize_month(month: u32) -> u32 {
    (month % 12 + 11) % 12 + 1
}

/// Map a month of the year (1-12) to its season.
///
/// December, January and February are Winter; the remaining months follow
/// in groups of three.
pub fn season_of(month: u32) -> Season {
    match normalize_month(month) {
        12 | 1 | 2 => Season::Winter,
        3..=5 => Season::Spring,
        6..=8 => Season::Summer,
        _ => Season::Fall,
    }
}

/// Map a month of the year (1-12) to its calendar quarter (1-4)
pub fn quarter_of(month: u32) -> u32 {
    (normalize_month(month) - 1) / 3 + 1
}
