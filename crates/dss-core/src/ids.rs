//! Strongly-typed entity and period identifiers.

use crate::newtype_string::define_identifier;
use std::cmp::Ordering;

define_identifier! {
    /// A planning unit (station/site) identifier, e.g. `DAB5`.
    pub struct EntityId;
}

define_identifier! {
    /// A time bucket label, e.g. `19` or `W19`.
    pub struct PeriodId;
}

impl PeriodId {
    /// The integer embedded in the label: the first run of ASCII digits.
    ///
    /// Returns `None` when the label has no digits or the digits overflow `u64`.
    pub fn ordinal(&self) -> Option<u64> {
        let digits: String = self
            .as_str()
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if digits.is_empty() {
            None
        } else {
            digits.parse().ok()
        }
    }

    /// Chronological ordering used for result columns.
    ///
    /// Numeric labels sort by their ordinal and come before labels without
    /// digits. Equal ordinals (`"3"` vs `"03"`) fall back to the raw label.
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        match (self.ordinal(), other.ordinal()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| self.as_str().cmp(other.as_str()))
    }
}

#[cfg(test)]
#[path = "ids_test.rs"]
mod tests;
