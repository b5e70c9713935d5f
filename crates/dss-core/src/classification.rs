//! Classification and text rendering of percent-change cells
//!
//! Both the on-screen table and the CSV export read the same stored value.
//! On screen, moves within ±5% are blanked; the export always shows the number.

use serde::{Deserialize, Serialize};

/// Absolute percent change above which a move is significant
pub const SIGNIFICANCE_THRESHOLD: f64 = 5.0;

/// Text shown for cells without a comparison
pub const NO_DATA_TEXT: &str = "N/A";

/// Category of a percent-change cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeClass {
    NoData,
    SignificantIncrease,
    SignificantDecrease,
    Insignificant,
}

impl std::fmt::Display for ChangeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeClass::NoData => write!(f, "no-data"),
            ChangeClass::SignificantIncrease => write!(f, "significant-increase"),
            ChangeClass::SignificantDecrease => write!(f, "significant-decrease"),
            ChangeClass::Insignificant => write!(f, "insignificant"),
        }
    }
}

/// Whether a value is strictly beyond the significance threshold
pub fn is_significant(value: f64) -> bool {
    value.abs() > SIGNIFICANCE_THRESHOLD
}

pub fn classify(value: Option<f64>) -> ChangeClass {
    match value {
        None => ChangeClass::NoData,
        Some(v) if v > SIGNIFICANCE_THRESHOLD => ChangeClass::SignificantIncrease,
        Some(v) if v < -SIGNIFICANCE_THRESHOLD => ChangeClass::SignificantDecrease,
        Some(_) => ChangeClass::Insignificant,
    }
}

/// On-screen text: `N/A`, `"6.00%"` for significant moves, empty otherwise
pub fn display_text(value: Option<f64>) -> String {
    match value {
        None => NO_DATA_TEXT.to_string(),
        Some(v) if is_significant(v) => format!("{:.2}%", v),
        Some(_) => String::new(),
    }
}

/// Export text: `N/A` or the value with 2 decimals, never blanked
pub fn export_text(value: Option<f64>) -> String {
    match value {
        None => NO_DATA_TEXT.to_string(),
        Some(v) => format!("{:.2}%", v),
    }
}

#[cfg(test)]
#[path = "classification_test.rs"]
mod tests;
