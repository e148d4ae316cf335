//! FILENAME: core/chart-engine/src/options.rs
//! Render options handed to the chart renderer alongside the data.
//!
//! Only the parts that depend on the chart type live here: legend placement,
//! axis titles, stacking and the 0..100 percentage scale. Everything purely
//! visual is left to the renderer's defaults.

use serde::{Deserialize, Serialize};

use crate::definition::{ChartFamily, ChartType};

pub const DEFAULT_TITLE: &str = "Data Chart";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LegendPosition {
    Top,
    Right,
}

/// One cartesian axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisOptions {
    pub title: String,
    pub stacked: bool,
    pub begin_at_zero: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Render tick values with a `%` suffix.
    #[serde(default)]
    pub percent_ticks: bool,
}

impl AxisOptions {
    fn titled(title: &str) -> Self {
        AxisOptions {
            title: title.to_string(),
            stacked: false,
            begin_at_zero: false,
            min: None,
            max: None,
            percent_ticks: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    pub title: String,
    pub legend_position: LegendPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<AxisOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<AxisOptions>,
    /// Radial scale starts at zero (radar charts).
    #[serde(default)]
    pub radial_begin_at_zero: bool,
    /// Tooltips show values as percentages of their slice/stack.
    #[serde(default)]
    pub percent_tooltips: bool,
}

impl RenderOptions {
    pub fn for_chart(chart_type: ChartType) -> Self {
        let mut options = RenderOptions {
            title: DEFAULT_TITLE.to_string(),
            legend_position: LegendPosition::Top,
            x_axis: None,
            y_axis: None,
            radial_begin_at_zero: false,
            percent_tooltips: false,
        };

        match chart_type.family() {
            ChartFamily::SingleSeries => {
                options.legend_position = LegendPosition::Right;
                options.percent_tooltips = chart_type != ChartType::PolarArea;
            }
            ChartFamily::Coordinate => {
                options.x_axis = Some(AxisOptions::titled("X Values"));
                options.y_axis = Some(AxisOptions::titled("Y Values"));
            }
            ChartFamily::Categorical if chart_type == ChartType::Radar => {
                options.radial_begin_at_zero = true;
            }
            ChartFamily::Categorical => {
                let mut x = AxisOptions::titled("Categories");
                let mut y = AxisOptions::titled("Values");
                y.begin_at_zero = true;
                if chart_type.is_stacked() {
                    x.stacked = true;
                    y.stacked = true;
                }
                if chart_type.is_percent_stacked() {
                    y.title = "Percentage".to_string();
                    y.min = Some(0.0);
                    y.max = Some(100.0);
                    y.percent_ticks = true;
                    options.percent_tooltips = true;
                }
                options.x_axis = Some(x);
                options.y_axis = Some(y);
            }
        }
        options
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Retitles the cartesian axes. No-op for charts without them.
    pub fn set_axis_titles(&mut self, x_title: &str, y_title: &str) {
        if let Some(axis) = self.x_axis.as_mut() {
            axis.title = x_title.to_string();
        }
        if let Some(axis) = self.y_axis.as_mut() {
            axis.title = y_title.to_string();
        }
    }
}
