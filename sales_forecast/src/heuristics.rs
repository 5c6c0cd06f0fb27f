//! Deterministic annotations layered on top of raw model output:
//! trend labels, confidence decay and the category split.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Direction label attached to each forecast month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    Growing,
    Stable,
    Declining,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Trend::Growing => "Growing",
            Trend::Stable => "Stable",
            Trend::Declining => "Declining",
        };
        write!(f, "{}", name)
    }
}

/// Classify the trend of a forecast step (1-based).
///
/// The first two steps are always Growing. Later steps compare the adjusted
/// prediction with the raw model output using a 5% band.
pub fn classify_trend(step: usize, adjusted: f64, raw: f64) -> Trend {
    if step <= 2 {
        Trend::Growing
    } else if adjusted > raw * 1.05 {
        Trend::Growing
    } else if adjusted < raw * 0.95 {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

/// Confidence at step 1, in percent
const BASE_CONFIDENCE: u32 = 85;
/// Confidence lost per additional step
const CONFIDENCE_DECAY: u32 = 5;
/// Confidence never drops below this
const MIN_CONFIDENCE: u32 = 60;

/// Confidence (percent) for a forecast step (1-based)
pub fn confidence(step: usize) -> u32 {
    let decay = step.saturating_sub(1).saturating_mul(CONFIDENCE_DECAY as usize);
    let decay = u32::try_from(decay).unwrap_or(u32::MAX);
    BASE_CONFIDENCE.saturating_sub(decay).max(MIN_CONFIDENCE)
}

/// Round to cents
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Product categories a monthly total is split across
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Men,
    Women,
    Unisex,
    Accessories,
}

impl Category {
    /// All categories, in reporting order
    pub const ALL: [Category; 4] = [
        Category::Men,
        Category::Women,
        Category::Unisex,
        Category::Accessories,
    ];

    /// Share of the monthly total assigned to this category
    pub fn proportion(&self) -> f64 {
        match self {
            Category::Men => 0.35,
            Category::Women => 0.42,
            Category::Unisex => 0.18,
            Category::Accessories => 0.05,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Men => "Men",
            Category::Women => "Women",
            Category::Unisex => "Unisex",
            Category::Accessories => "Accessories",
        };
        write!(f, "{}", name)
    }
}

/// Category amounts derived from a single monthly total
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryForecast(BTreeMap<Category, f64>);

impl CategoryForecast {
    /// Split a total by the fixed category proportions.
    ///
    /// Each amount is rounded to cents on its own, so the parts may differ
    /// from the total by a few cents.
    pub fn allocate(total: f64) -> Self {
        Self(
            Category::ALL
                .iter()
                .map(|&c| (c, round2(total * c.proportion())))
                .collect(),
        )
    }

    /// Amount for one category
    pub fn get(&self, category: Category) -> f64 {
        self.0.get(&category).copied().unwrap_or(0.0)
    }

    /// Iterate over (category, amount) pairs in reporting order
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.0.iter().map(|(&c, &v)| (c, v))
    }

    /// Sum of all category amounts
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Check if no categories are present
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CategoryForecast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Category Forecast:")?;
        for (category, amount) in self.iter() {
            writeln!(f, "  {:12}: ${:.2}", category.to_string(), amount)?;
        }
        Ok(())
    }
}
