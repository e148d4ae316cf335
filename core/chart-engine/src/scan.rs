//! FILENAME: core/chart-engine/src/scan.rs
//! Row window enumeration shared by the builders, the preview and the
//! reverse projector.

use crate::definition::{EngineConfig, RangeSelection, ScanMode};

/// The data-row indices a (validated) range selection covers.
///
/// User row `r` (1-based, header is row 1) is data row `r - 2`. The window
/// is clamped to the sheet so a stale `end_row` never reads past the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    start: usize,
    end: usize,
    stride: usize,
}

impl RowWindow {
    pub fn new(
        range: &RangeSelection,
        data_rows: usize,
        mode: ScanMode,
        config: &EngineConfig,
    ) -> Self {
        let start = range.start_row.saturating_sub(2);
        let end = range.end_row.saturating_sub(1).min(data_rows).max(start);
        let subsample = mode == ScanMode::Approximate
            && range.span() > config.preview_row_threshold;
        let stride = if subsample { config.preview_stride.max(1) } else { 1 };
        RowWindow { start, end, stride }
    }

    /// Every row in the window.
    pub fn exact(range: &RangeSelection, data_rows: usize) -> Self {
        RowWindow::new(range, data_rows, ScanMode::Exact, &EngineConfig::default())
    }

    /// True when rows are being skipped.
    pub fn is_approximate(&self) -> bool {
        self.stride > 1
    }

    /// Number of rows in the window before any subsampling.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Data-row indices to visit. Subsampling keeps rows whose sheet position
    /// (header = 0) is a multiple of the stride.
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        let stride = self.stride;
        (self.start..self.end).filter(move |idx| stride == 1 || (idx + 1) % stride == 0)
    }
}
