//! FILENAME: core/chart-engine/src/definition.rs
//! Chart Definition - The serializable configuration.
//!
//! This module contains all the types needed to DESCRIBE a chart request.
//! These structures are designed to be:
//! - Serializable (for saving/loading or sending over a host bridge)
//! - Immutable snapshots of user intent, passed explicitly into every call

use serde::{Deserialize, Serialize};

use crate::color::palette_color;
use crate::error::{ChartError, Result};

/// Index into the sheet columns (0-based).
pub type ColumnIndex = usize;

// ============================================================================
// CHART TYPES
// ============================================================================

/// The algorithm family a chart type is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartFamily {
    /// One series, one slice per surviving row (pie, doughnut, polarArea).
    SingleSeries,
    /// (x, y[, r]) points per Y column (scatter, bubble).
    Coordinate,
    /// Distinct X values as labels, Y values summed per label.
    Categorical,
}

/// Supported chart types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartType {
    Pie,
    Doughnut,
    PolarArea,
    Scatter,
    Bubble,
    Bar,
    Line,
    Radar,
    StackedBar,
    PercentStackedBar,
}

impl ChartType {
    pub fn family(self) -> ChartFamily {
        match self {
            ChartType::Pie | ChartType::Doughnut | ChartType::PolarArea => ChartFamily::SingleSeries,
            ChartType::Scatter | ChartType::Bubble => ChartFamily::Coordinate,
            ChartType::Bar
            | ChartType::Line
            | ChartType::Radar
            | ChartType::StackedBar
            | ChartType::PercentStackedBar => ChartFamily::Categorical,
        }
    }

    pub fn is_percent_stacked(self) -> bool {
        self == ChartType::PercentStackedBar
    }

    pub fn is_stacked(self) -> bool {
        matches!(self, ChartType::StackedBar | ChartType::PercentStackedBar)
    }

    /// The chart type name the renderer understands.
    /// Stacked variants are plain bar charts with stacked scales.
    pub fn renderer_type(self) -> &'static str {
        match self {
            ChartType::Pie => "pie",
            ChartType::Doughnut => "doughnut",
            ChartType::PolarArea => "polarArea",
            ChartType::Scatter => "scatter",
            ChartType::Bubble => "bubble",
            ChartType::Bar | ChartType::StackedBar | ChartType::PercentStackedBar => "bar",
            ChartType::Line => "line",
            ChartType::Radar => "radar",
        }
    }

    /// Human-readable name used in messages.
    pub fn display_name(self) -> &'static str {
        match self {
            ChartType::Pie => "Pie",
            ChartType::Doughnut => "Doughnut",
            ChartType::PolarArea => "Polar area",
            ChartType::Scatter => "Scatter",
            ChartType::Bubble => "Bubble",
            ChartType::Bar => "Bar",
            ChartType::Line => "Line",
            ChartType::Radar => "Radar",
            ChartType::StackedBar => "Stacked bar",
            ChartType::PercentStackedBar => "100% stacked bar",
        }
    }
}

// ============================================================================
// SELECTIONS
// ============================================================================

/// A user-facing row window. Both bounds are 1-based and inclusive; row 1 is
/// the header so valid windows start at row 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSelection {
    pub start_row: usize,
    pub end_row: usize,
}

impl RangeSelection {
    pub fn new(start_row: usize, end_row: usize) -> Self {
        RangeSelection { start_row, end_row }
    }

    /// The whole data area of a sheet with `total_rows` rows (header included).
    pub fn all(total_rows: usize) -> Self {
        RangeSelection { start_row: 2, end_row: total_rows }
    }

    /// Parses the raw text of the start/end inputs.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let invalid = || ChartError::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
            total: 0,
        };
        let start_row = start.trim().parse::<usize>().map_err(|_| invalid())?;
        let end_row = end.trim().parse::<usize>().map_err(|_| invalid())?;
        Ok(RangeSelection { start_row, end_row })
    }

    /// Number of rows the window spans (`end - start`, as the preview
    /// threshold measures it).
    pub fn span(&self) -> usize {
        self.end_row.saturating_sub(self.start_row)
    }
}

/// A column/value filter. An unset column or an empty value means "all".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    pub column: Option<ColumnIndex>,
    #[serde(default)]
    pub value: String,
}

impl FilterSpec {
    pub fn new(column: ColumnIndex, value: impl Into<String>) -> Self {
        FilterSpec {
            column: Some(column),
            value: value.into(),
        }
    }

    /// The "All Values" filter.
    pub fn all() -> Self {
        FilterSpec::default()
    }

    pub fn is_active(&self) -> bool {
        self.column.is_some() && !self.value.is_empty()
    }
}

/// Axis mapping and series colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub x_column: ColumnIndex,
    pub y_columns: Vec<ColumnIndex>,
    /// Explicit series colors aligned with `y_columns`.
    #[serde(default)]
    pub colors: Vec<String>,
}

impl SeriesSpec {
    pub fn new(x_column: ColumnIndex, y_columns: Vec<ColumnIndex>) -> Self {
        SeriesSpec {
            x_column,
            y_columns,
            colors: Vec::new(),
        }
    }

    pub fn with_colors(mut self, colors: Vec<String>) -> Self {
        self.colors = colors;
        self
    }

    /// Color of series `index`, falling back to the palette.
    pub fn color_for(&self, index: usize) -> String {
        self.colors
            .get(index)
            .cloned()
            .unwrap_or_else(|| palette_color(index).to_string())
    }
}

/// Everything one chart generation reads. Built fresh from the current
/// selections for every (re)build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub chart_type: ChartType,
    pub range: RangeSelection,
    pub series: SeriesSpec,
    #[serde(default)]
    pub primary_filter: FilterSpec,
}

impl ChartRequest {
    pub fn new(chart_type: ChartType, range: RangeSelection, series: SeriesSpec) -> Self {
        ChartRequest {
            chart_type,
            range,
            series,
            primary_filter: FilterSpec::all(),
        }
    }

    pub fn with_filter(mut self, filter: FilterSpec) -> Self {
        self.primary_filter = filter;
        self
    }
}

// ============================================================================
// SCANNING & CONFIGURATION
// ============================================================================

/// How a row window is enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScanMode {
    /// Every row in range. Used for everything that is charted or exported.
    #[default]
    Exact,
    /// Every Nth row once the window is large. Preview only.
    Approximate,
}

/// Engine tunables. Every field has a default so partial JSON is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window span above which approximate scans start subsampling.
    pub preview_row_threshold: usize,
    /// Subsampling stride for approximate scans.
    pub preview_stride: usize,
    /// Number of X values listed in a preview.
    pub preview_sample_len: usize,
    /// Absolute per-axis tolerance when matching points back to rows.
    pub coordinate_tolerance: f64,
    /// Bubble radius when the size column is absent or unparsable.
    pub bubble_default_radius: f64,
    /// Filter values that select empty cells.
    pub null_tokens: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            preview_row_threshold: 10_000,
            preview_stride: 10,
            preview_sample_len: 10,
            coordinate_tolerance: 0.0001,
            bubble_default_radius: 10.0,
            null_tokens: vec!["null".to_string(), "undefined".to_string()],
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| ChartError::Config(e.to_string()))?;
        if config.preview_stride == 0 {
            return Err(ChartError::Config("preview_stride must be at least 1".to_string()));
        }
        if !(config.coordinate_tolerance > 0.0) {
            return Err(ChartError::Config("coordinate_tolerance must be positive".to_string()));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_families() {
        assert_eq!(ChartType::Doughnut.family(), ChartFamily::SingleSeries);
        assert_eq!(ChartType::Bubble.family(), ChartFamily::Coordinate);
        assert_eq!(ChartType::PercentStackedBar.family(), ChartFamily::Categorical);
        assert_eq!(ChartType::StackedBar.renderer_type(), "bar");
    }

    #[test]
    fn test_chart_type_serde_names() {
        let json = serde_json::to_string(&ChartType::PercentStackedBar).unwrap();
        assert_eq!(json, "\"percentStackedBar\"");
        let back: ChartType = serde_json::from_str("\"polarArea\"").unwrap();
        assert_eq!(back, ChartType::PolarArea);
    }

    #[test]
    fn test_range_parse() {
        assert_eq!(RangeSelection::parse("2", " 10 ").unwrap(), RangeSelection::new(2, 10));
        assert!(matches!(
            RangeSelection::parse("abc", "10"),
            Err(ChartError::InvalidRange { .. })
        ));
        assert!(RangeSelection::parse("2", "").is_err());
    }

    #[test]
    fn test_filter_activity() {
        assert!(!FilterSpec::all().is_active());
        assert!(!FilterSpec::new(0, "").is_active());
        assert!(FilterSpec::new(0, "North").is_active());
    }

    #[test]
    fn test_series_color_falls_back_to_palette() {
        let spec = SeriesSpec::new(0, vec![1, 2]).with_colors(vec!["#ff0000".to_string()]);
        assert_eq!(spec.color_for(0), "#ff0000");
        assert_eq!(spec.color_for(1), palette_color(1));
    }

    #[test]
    fn test_config_partial_json() {
        let config = EngineConfig::from_json(r#"{"preview_stride": 5}"#).unwrap();
        assert_eq!(config.preview_stride, 5);
        assert_eq!(config.preview_row_threshold, 10_000);
        assert!(EngineConfig::from_json(r#"{"preview_stride": 0}"#).is_err());
        assert!(matches!(EngineConfig::from_json("not json"), Err(ChartError::Config(_))));
    }
}
