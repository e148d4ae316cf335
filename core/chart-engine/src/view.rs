//! FILENAME: core/chart-engine/src/view.rs
//! Chart View - Renderable output for the chart renderer.
//!
//! These are the structures handed to the renderer: category labels plus one
//! dataset per series, with the style attributes each chart family needs.
//! Field names serialize in camelCase, matching the renderer's config.

use serde::{Deserialize, Serialize};

use crate::definition::ChartType;
use crate::error::{ChartError, Result};
use crate::options::RenderOptions;

// ============================================================================
// DATA POINTS
// ============================================================================

/// A single value in a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataPoint {
    /// Coordinate point; `r` is set for bubble charts only.
    Point {
        x: f64,
        y: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        r: Option<f64>,
    },
    /// Value at the matching label index.
    Value(f64),
}

impl DataPoint {
    /// Scalar value, 0 for coordinate points.
    pub fn value(&self) -> f64 {
        match self {
            DataPoint::Value(v) => *v,
            DataPoint::Point { .. } => 0.0,
        }
    }

    /// (x, y) of a coordinate point.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match self {
            DataPoint::Point { x, y, .. } => Some((*x, *y)),
            DataPoint::Value(_) => None,
        }
    }
}

impl From<f64> for DataPoint {
    fn from(value: f64) -> Self {
        DataPoint::Value(value)
    }
}

// ============================================================================
// STYLE
// ============================================================================

/// A dataset's background: one color, or one per data point (pie segments).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Single(String),
    PerPoint(Vec<String>),
}

impl ColorSpec {
    /// Keeps only the per-point colors at `kept` indices.
    pub(crate) fn retain_indices(&self, kept: &[usize]) -> ColorSpec {
        match self {
            ColorSpec::Single(c) => ColorSpec::Single(c.clone()),
            ColorSpec::PerPoint(colors) => ColorSpec::PerPoint(
                kept.iter().filter_map(|&i| colors.get(i).cloned()).collect(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStyle {
    pub background_color: ColorSpec,
    pub border_color: String,
    pub border_width: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<u32>,
}

impl DatasetStyle {
    /// Solid series style shared by categorical and coordinate charts.
    pub fn solid(color: &str) -> Self {
        DatasetStyle {
            background_color: ColorSpec::Single(color.to_string()),
            border_color: color.to_string(),
            border_width: 1,
            fill: None,
            tension: None,
            point_radius: None,
        }
    }

    /// Per-segment colors with white borders.
    pub fn segments(colors: Vec<String>) -> Self {
        DatasetStyle {
            background_color: ColorSpec::PerPoint(colors),
            border_color: "white".to_string(),
            border_width: 1,
            fill: None,
            tension: None,
            point_radius: None,
        }
    }
}

// ============================================================================
// DATASETS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<DataPoint>,
    #[serde(flatten)]
    pub style: DatasetStyle,
}

impl Dataset {
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().map(DataPoint::value)
    }

    /// A copy with only the data points at `kept` indices (per-point colors
    /// follow their points).
    pub(crate) fn retain_indices(&self, kept: &[usize]) -> Dataset {
        let mut style = self.style.clone();
        style.background_color = self.style.background_color.retain_indices(kept);
        Dataset {
            label: self.label.clone(),
            data: kept.iter().filter_map(|&i| self.data.get(i).copied()).collect(),
            style,
        }
    }
}

/// Labels plus datasets. Coordinate charts carry no labels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.datasets.iter().all(|d| d.data.is_empty())
    }

    /// Total number of data points over all datasets.
    pub fn point_count(&self) -> usize {
        self.datasets.iter().map(|d| d.data.len()).sum()
    }

    /// Pretty JSON of the data, as copied to the clipboard.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ChartError::Serialization(e.to_string()))
    }
}

/// The triple handed to the renderer for one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPayload {
    pub chart_type: ChartType,
    pub renderer_type: String,
    pub data: ChartData,
    pub options: RenderOptions,
}
