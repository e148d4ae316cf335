//! FILENAME: core/chart-engine/src/error.rs

use thiserror::Error;

use crate::definition::ChartType;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("Invalid data range: rows {start}..={end} (sheet has {total} rows, data starts at row 2)")]
    InvalidRange { start: String, end: String, total: usize },

    #[error("At least one Y-axis series is required")]
    NoYAxisSelected,

    #[error("No valid data for this chart type")]
    NoValidData,

    #[error("No data matches the filter criteria")]
    NoMatchingData,

    #[error("Series index {index} out of range ({count} series)")]
    SeriesOutOfRange { index: usize, count: usize },

    #[error("Invalid engine configuration: {0}")]
    Config(String),

    #[error("Failed to serialize chart data: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, ChartError>;

/// Non-fatal conditions reported next to a successful result.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartWarning {
    /// A single-series chart was given several Y columns; only the first is used.
    UnsupportedMultiSeries { chart_type: ChartType, ignored: usize },
}

impl std::fmt::Display for ChartWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartWarning::UnsupportedMultiSeries { chart_type, ignored } => write!(
                f,
                "{} charts can only display one data series; ignoring {} extra series",
                chart_type.display_name(),
                ignored
            ),
        }
    }
}
