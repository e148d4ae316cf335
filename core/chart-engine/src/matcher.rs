//! FILENAME: core/chart-engine/src/matcher.rs
//! Type-tolerant filter matching.
//!
//! Filter values always arrive as text (they come from value pickers), while
//! cells are typed. Matching therefore compares trimmed, case-insensitive text
//! forms rather than native values, so `Number(5.0)` matches `"5"`.

use engine::{row_cell, CellValue};

use crate::definition::{EngineConfig, FilterSpec};

/// Normalized text key used for matching and for label indexes.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Match key of a cell, or None for an empty cell.
pub fn match_key(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Empty => None,
        other => Some(normalize(&other.display_value())),
    }
}

// ============================================================================
// VALUE MATCHER
// ============================================================================

/// Equality between a cell and a filter value.
#[derive(Debug, Clone)]
pub struct ValueMatcher {
    /// Normalized filter values that select empty cells.
    null_tokens: Vec<String>,
}

impl Default for ValueMatcher {
    fn default() -> Self {
        ValueMatcher::from_config(&EngineConfig::default())
    }
}

impl ValueMatcher {
    pub fn from_config(config: &EngineConfig) -> Self {
        ValueMatcher {
            null_tokens: config.null_tokens.iter().map(|t| normalize(t)).collect(),
        }
    }

    /// Whether `filter_value` selects empty cells: the "all" sentinel or a
    /// null token.
    pub fn is_blank_token(&self, filter_value: &str) -> bool {
        let key = normalize(filter_value);
        filter_value.is_empty() || self.null_tokens.iter().any(|t| *t == key)
    }

    pub fn matches(&self, cell: &CellValue, filter_value: &str) -> bool {
        match match_key(cell) {
            None => self.is_blank_token(filter_value),
            Some(key) => key == normalize(filter_value),
        }
    }
}

// ============================================================================
// ROW FILTER
// ============================================================================

/// A `FilterSpec` bound to a matcher, testing whole rows.
#[derive(Debug, Clone)]
pub struct RowFilter<'a> {
    column: Option<usize>,
    value: &'a str,
    /// Pre-normalized `value`, so rows are not re-normalizing the filter.
    key: String,
    blank_token: bool,
}

impl<'a> RowFilter<'a> {
    pub fn new(spec: &'a FilterSpec, matcher: &ValueMatcher) -> Self {
        let column = if spec.is_active() { spec.column } else { None };
        RowFilter {
            column,
            value: &spec.value,
            key: normalize(&spec.value),
            blank_token: matcher.is_blank_token(&spec.value),
        }
    }

    /// True when the filter constrains nothing.
    pub fn is_pass_through(&self) -> bool {
        self.column.is_none()
    }

    pub fn value(&self) -> &str {
        self.value
    }

    pub fn row_matches(&self, row: &[CellValue]) -> bool {
        let Some(column) = self.column else {
            return true;
        };
        match match_key(row_cell(row, column)) {
            None => self.blank_token,
            Some(key) => key == self.key,
        }
    }
}
