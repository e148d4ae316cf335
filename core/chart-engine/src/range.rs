//! FILENAME: core/chart-engine/src/range.rs
//! Row window validation. Runs before every aggregation.

use log::warn;

use crate::definition::RangeSelection;
use crate::error::{ChartError, Result};

/// Checks a 1-based inclusive window against a sheet of `total_rows` rows
/// (header included). Accepts iff `2 <= start <= end <= total_rows`.
pub fn validate_range(range: &RangeSelection, total_rows: usize) -> Result<()> {
    let RangeSelection { start_row, end_row } = *range;
    if start_row < 2 || start_row > total_rows || end_row < start_row || end_row > total_rows {
        warn!(
            "rejected row range {}..={} for a sheet of {} rows",
            start_row, end_row, total_rows
        );
        return Err(ChartError::InvalidRange {
            start: start_row.to_string(),
            end: end_row.to_string(),
            total: total_rows,
        });
    }
    Ok(())
}
