//! FILENAME: core/chart-engine/src/preview.rs
//! Data Preview - Quick summary of the selected window.
//!
//! The preview is the only consumer of `ScanMode::Approximate`: on large
//! windows it visits every Nth row and says so through `approximate`.
//! Nothing here is ever charted or exported.

use engine::{row_cell, Sheet};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::definition::{ChartRequest, EngineConfig, ScanMode};
use crate::error::Result;
use crate::matcher::{RowFilter, ValueMatcher};
use crate::range::validate_range;
use crate::scan::RowWindow;

/// Count and numeric summary of one Y column over the scanned rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub name: String,
    /// Non-empty cells.
    pub count: usize,
    /// Cells that parsed as numbers.
    pub numeric_count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub average: Option<f64>,
}

impl SeriesSummary {
    fn new(name: String) -> Self {
        SeriesSummary {
            name,
            count: 0,
            numeric_count: 0,
            min: None,
            max: None,
            average: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPreview {
    pub x_name: String,
    /// First X values of the matching rows, in row order.
    pub x_sample: Vec<String>,
    /// Matching rows with an X value beyond the sample.
    pub x_remaining: usize,
    pub series: Vec<SeriesSummary>,
    /// Rows in the selected window.
    pub rows_in_range: usize,
    /// Rows actually visited (fewer than `rows_in_range` when approximate).
    pub rows_scanned: usize,
    /// Visited rows passing the primary filter.
    pub rows_matching: usize,
    /// Counts and statistics come from a subsample.
    pub approximate: bool,
}

/// Summarizes the request's window. Approximate mode subsamples large
/// windows; the result is flagged accordingly.
pub fn preview(
    sheet: &Sheet,
    request: &ChartRequest,
    mode: ScanMode,
    config: &EngineConfig,
) -> Result<DataPreview> {
    validate_range(&request.range, sheet.total_rows())?;

    let matcher = ValueMatcher::from_config(config);
    let filter = RowFilter::new(&request.primary_filter, &matcher);
    let window = RowWindow::new(&request.range, sheet.data_row_count(), mode, config);
    let x_col = request.series.x_column;

    let mut x_sample = Vec::new();
    let mut x_remaining = 0;
    let mut rows_scanned = 0;
    let mut rows_matching = 0;
    let mut series: Vec<SeriesSummary> = request
        .series
        .y_columns
        .iter()
        .map(|&c| SeriesSummary::new(sheet.column(c).name))
        .collect();
    let mut sums = vec![0.0; series.len()];

    for i in window.indices() {
        let Some(row) = sheet.data_row(i) else {
            continue;
        };
        rows_scanned += 1;
        if !filter.row_matches(row) {
            continue;
        }
        rows_matching += 1;

        let x = row_cell(row, x_col);
        if !x.is_empty() {
            if x_sample.len() < config.preview_sample_len {
                x_sample.push(x.display_value());
            } else {
                x_remaining += 1;
            }
        }

        for ((summary, sum), &y_col) in series.iter_mut().zip(sums.iter_mut()).zip(&request.series.y_columns) {
            let cell = row_cell(row, y_col);
            if cell.is_empty() {
                continue;
            }
            summary.count += 1;
            let Some(value) = cell.parse_number().filter(|v| !v.is_nan()) else {
                continue;
            };
            summary.numeric_count += 1;
            *sum += value;
            summary.min = Some(summary.min.map_or(value, |m| m.min(value)));
            summary.max = Some(summary.max.map_or(value, |m| m.max(value)));
        }
    }

    for (summary, sum) in series.iter_mut().zip(&sums) {
        if summary.numeric_count > 0 {
            summary.average = Some(sum / summary.numeric_count as f64);
        }
    }

    debug!(
        "preview scanned {} of {} rows ({} matching, approximate: {})",
        rows_scanned,
        window.len(),
        rows_matching,
        window.is_approximate()
    );

    Ok(DataPreview {
        x_name: sheet.column(x_col).name,
        x_sample,
        x_remaining,
        series,
        rows_in_range: window.len(),
        rows_scanned,
        rows_matching,
        approximate: window.is_approximate(),
    })
}
