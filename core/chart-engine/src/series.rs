//! FILENAME: core/chart-engine/src/series.rs
//! Series Builder - Turns filtered rows into chart-family datasets.
//!
//! Three mutually exclusive algorithms, selected by `ChartFamily`:
//! 1. Single-series: one slice per surviving row, NaN/zero values dropped
//! 2. Coordinate: one (x, y[, r]) point per surviving row and Y column,
//!    unparsable numbers coerced to defaults
//! 3. Categorical: distinct X values become sorted labels, Y values are
//!    summed per label and missing labels are zero-filled
//!
//! All three walk the same exact row window and skip rows that fail the
//! primary filter. The chart filter is never applied here.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use engine::{row_cell, CellValue, Sheet};
use log::debug;
use rustc_hash::FxHashMap;

use crate::color::{segment_color, translucent};
use crate::definition::{ChartFamily, ChartRequest, ChartType, EngineConfig};
use crate::error::{ChartError, Result};
use crate::matcher::{RowFilter, ValueMatcher};
use crate::scan::RowWindow;
use crate::view::{ChartData, ColorSpec, DataPoint, Dataset, DatasetStyle};

// ============================================================================
// CATEGORY KEYS & ORDERING
// ============================================================================

/// Hashable identity of a category value. Numbers and text stay distinct
/// (`1` and `"1"` are different categories); -0 equals 0 and NaN equals NaN.
#[derive(Debug, Clone)]
pub(crate) enum CategoryKey {
    Number(f64),
    Text(String),
    Boolean(bool),
    Empty,
}

impl From<&CellValue> for CategoryKey {
    fn from(value: &CellValue) -> Self {
        match value {
            CellValue::Empty => CategoryKey::Empty,
            CellValue::Number(n) => CategoryKey::Number(*n),
            CellValue::Text(s) => CategoryKey::Text(s.clone()),
            CellValue::Boolean(b) => CategoryKey::Boolean(*b),
        }
    }
}

impl PartialEq for CategoryKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CategoryKey::Number(a), CategoryKey::Number(b)) => {
                (a.is_nan() && b.is_nan()) || a == b
            }
            (CategoryKey::Text(a), CategoryKey::Text(b)) => a == b,
            (CategoryKey::Boolean(a), CategoryKey::Boolean(b)) => a == b,
            (CategoryKey::Empty, CategoryKey::Empty) => true,
            _ => false,
        }
    }
}

impl Eq for CategoryKey {}

impl Hash for CategoryKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CategoryKey::Number(n) => {
                if n.is_nan() {
                    u64::MAX.hash(state);
                } else if *n == 0.0 {
                    0u64.hash(state);
                } else {
                    n.to_bits().hash(state);
                }
            }
            CategoryKey::Text(s) => s.hash(state),
            CategoryKey::Boolean(b) => b.hash(state),
            CategoryKey::Empty => {}
        }
    }
}

/// Total order for category labels and filter values.
///
/// Values whose text parses as a number sort first, ascending by value.
/// Everything else follows, compared case-insensitively with the raw text
/// as tie-breaker.
pub fn compare_labels(a: &CellValue, b: &CellValue) -> Ordering {
    let na = a.parse_number().filter(|n| !n.is_nan());
    let nb = b.parse_number().filter(|n| !n.is_nan());
    let ta = a.display_value();
    let tb = b.display_value();
    match (na, nb) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| ta.cmp(&tb)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => ta
            .to_lowercase()
            .cmp(&tb.to_lowercase())
            .then_with(|| ta.cmp(&tb)),
    }
}

// ============================================================================
// SERIES BUILDER
// ============================================================================

/// Builds the `ChartData` for one request. Assumes the range has already
/// been validated and at least one Y column is selected.
pub struct SeriesBuilder<'a> {
    sheet: &'a Sheet,
    request: &'a ChartRequest,
    config: &'a EngineConfig,
    filter: RowFilter<'a>,
    window: RowWindow,
}

impl<'a> SeriesBuilder<'a> {
    pub fn new(
        sheet: &'a Sheet,
        request: &'a ChartRequest,
        config: &'a EngineConfig,
        matcher: &ValueMatcher,
    ) -> Self {
        SeriesBuilder {
            sheet,
            request,
            config,
            filter: RowFilter::new(&request.primary_filter, matcher),
            window: RowWindow::exact(&request.range, sheet.data_row_count()),
        }
    }

    pub fn build(&self) -> Result<ChartData> {
        match self.request.chart_type.family() {
            ChartFamily::SingleSeries => self.build_single_series(),
            ChartFamily::Coordinate => self.build_coordinate(),
            ChartFamily::Categorical => self.build_categorical(),
        }
    }

    /// Surviving rows: in the window and passing the primary filter.
    fn rows(&self) -> impl Iterator<Item = (usize, &'a [CellValue])> + '_ {
        let sheet = self.sheet;
        self.window
            .indices()
            .filter_map(move |i| sheet.data_row(i).map(|row| (i, row.as_slice())))
            .filter(move |(_, row)| self.filter.row_matches(row))
    }

    fn series_name(&self, column: usize) -> String {
        self.sheet.column(column).name
    }

    // ------------------------------------------------------------------------
    // Single-series (pie, doughnut, polarArea)
    // ------------------------------------------------------------------------

    fn build_single_series(&self) -> Result<ChartData> {
        let x_col = self.request.series.x_column;
        let Some(&y_col) = self.request.series.y_columns.first() else {
            return Err(ChartError::NoYAxisSelected);
        };

        let mut labels = Vec::new();
        let mut data = Vec::new();
        let mut colors = Vec::new();

        for (i, row) in self.rows() {
            let x = row_cell(row, x_col);
            let y = row_cell(row, y_col);
            if x.is_empty() || y.is_empty() {
                continue;
            }
            // Zero and unparsable values are dropped, not rendered as empty slices
            let value = match y.parse_number() {
                Some(v) if !v.is_nan() && v != 0.0 => v,
                _ => continue,
            };
            labels.push(x.display_value());
            data.push(DataPoint::Value(value));
            colors.push(segment_color(i));
        }

        if data.is_empty() {
            return Err(ChartError::NoValidData);
        }
        debug!("single-series build produced {} slices", data.len());

        Ok(ChartData {
            labels,
            datasets: vec![Dataset {
                label: self.series_name(y_col),
                data,
                style: DatasetStyle::segments(colors),
            }],
        })
    }

    // ------------------------------------------------------------------------
    // Coordinate (scatter, bubble)
    // ------------------------------------------------------------------------

    fn build_coordinate(&self) -> Result<ChartData> {
        let series = &self.request.series;
        let x_col = series.x_column;
        let bubble = self.request.chart_type == ChartType::Bubble;
        let default_r = self.config.bubble_default_radius;

        let mut datasets = Vec::with_capacity(series.y_columns.len());
        for (series_idx, &y_col) in series.y_columns.iter().enumerate() {
            let mut data = Vec::new();
            for (_, row) in self.rows() {
                let x = row_cell(row, x_col);
                let y = row_cell(row, y_col);
                if x.is_empty() || y.is_empty() {
                    continue;
                }
                let r = if bubble {
                    // Missing, unparsable and zero sizes all fall back to the default
                    let size = row_cell(row, y_col + 1).parse_number();
                    Some(size.filter(|v| !v.is_nan() && *v != 0.0).unwrap_or(default_r))
                } else {
                    None
                };
                data.push(DataPoint::Point {
                    x: x.number_or(0.0),
                    y: y.number_or(0.0),
                    r,
                });
            }

            let color = series.color_for(series_idx);
            let mut style = DatasetStyle::solid(&color);
            style.point_radius = Some(5);
            datasets.push(Dataset {
                label: self.series_name(y_col),
                data,
                style,
            });
        }

        let chart = ChartData { labels: Vec::new(), datasets };
        if chart.point_count() == 0 {
            return Err(ChartError::NoMatchingData);
        }
        debug!("coordinate build produced {} points", chart.point_count());
        Ok(chart)
    }

    // ------------------------------------------------------------------------
    // Categorical (bar, line, radar, stacked variants)
    // ------------------------------------------------------------------------

    fn build_categorical(&self) -> Result<ChartData> {
        let series = &self.request.series;
        let x_col = series.x_column;

        // Pass 1: distinct X values (first-seen order) and per-label sums
        let mut slots: FxHashMap<CategoryKey, usize> = FxHashMap::default();
        let mut categories: Vec<&CellValue> = Vec::new();
        let mut sums: Vec<Vec<f64>> = vec![Vec::new(); series.y_columns.len()];

        for (_, row) in self.rows() {
            let x = row_cell(row, x_col);
            if x.is_empty() {
                continue;
            }
            let slot = *slots.entry(CategoryKey::from(x)).or_insert_with(|| {
                categories.push(x);
                for column_sums in sums.iter_mut() {
                    column_sums.push(0.0);
                }
                categories.len() - 1
            });
            for (column_sums, &y_col) in sums.iter_mut().zip(&series.y_columns) {
                column_sums[slot] += row_cell(row, y_col).number_or(0.0);
            }
        }

        if categories.is_empty() {
            return Err(ChartError::NoMatchingData);
        }

        // Pass 2: order labels, then lay every series out in label order
        let mut order: Vec<usize> = (0..categories.len()).collect();
        order.sort_by(|&a, &b| compare_labels(categories[a], categories[b]));

        let labels = order.iter().map(|&slot| categories[slot].display_value()).collect();
        let datasets = series
            .y_columns
            .iter()
            .zip(&sums)
            .enumerate()
            .map(|(series_idx, (&y_col, column_sums))| Dataset {
                label: self.series_name(y_col),
                data: order.iter().map(|&slot| DataPoint::Value(column_sums[slot])).collect(),
                style: self.categorical_style(&series.color_for(series_idx)),
            })
            .collect();

        debug!("categorical build produced {} labels", order.len());
        Ok(ChartData { labels, datasets })
    }

    fn categorical_style(&self, color: &str) -> DatasetStyle {
        let mut style = DatasetStyle::solid(color);
        match self.request.chart_type {
            ChartType::Line => {
                style.fill = Some(false);
                style.tension = Some(0.1);
            }
            ChartType::Radar => {
                style.fill = Some(true);
                style.background_color = ColorSpec::Single(translucent(color));
            }
            _ => {}
        }
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{FilterSpec, RangeSelection, SeriesSpec};

    fn sheet(rows: Vec<Vec<CellValue>>) -> Sheet {
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let header = (0..width).map(|i| CellValue::from(format!("H{}", i))).collect();
        Sheet::new("Test", header, rows)
    }

    fn abc_sheet() -> Sheet {
        sheet(vec![
            vec!["A".into(), 1.0.into()],
            vec!["B".into(), 2.0.into()],
            vec!["A".into(), 3.0.into()],
        ])
    }

    fn build(sheet: &Sheet, request: &ChartRequest) -> Result<ChartData> {
        let config = EngineConfig::default();
        let matcher = ValueMatcher::from_config(&config);
        SeriesBuilder::new(sheet, request, &config, &matcher).build()
    }

    fn request(chart_type: ChartType, sheet: &Sheet, y: Vec<usize>) -> ChartRequest {
        ChartRequest::new(chart_type, RangeSelection::all(sheet.total_rows()), SeriesSpec::new(0, y))
    }

    fn values(dataset: &Dataset) -> Vec<f64> {
        dataset.values().collect()
    }

    #[test]
    fn test_categorical_sums_duplicates() {
        let sheet = abc_sheet();
        let chart = build(&sheet, &request(ChartType::Bar, &sheet, vec![1])).unwrap();
        assert_eq!(chart.labels, vec!["A", "B"]);
        assert_eq!(values(&chart.datasets[0]), vec![4.0, 2.0]);
        assert_eq!(chart.datasets[0].label, "H1");
    }

    #[test]
    fn test_categorical_primary_filter() {
        let sheet = abc_sheet();
        let req = request(ChartType::Bar, &sheet, vec![1]).with_filter(FilterSpec::new(0, "A"));
        let chart = build(&sheet, &req).unwrap();
        assert_eq!(chart.labels, vec!["A"]);
        assert_eq!(values(&chart.datasets[0]), vec![4.0]);
    }

    #[test]
    fn test_categorical_zero_fills_and_coerces() {
        let sheet = sheet(vec![
            vec!["A".into(), 1.0.into(), CellValue::Empty],
            vec!["B".into(), "n/a".into(), 5.0.into()],
        ]);
        let chart = build(&sheet, &request(ChartType::Bar, &sheet, vec![1, 2])).unwrap();
        assert_eq!(values(&chart.datasets[0]), vec![1.0, 0.0]);
        assert_eq!(values(&chart.datasets[1]), vec![0.0, 5.0]);
        for dataset in &chart.datasets {
            assert_eq!(dataset.data.len(), chart.labels.len());
        }
    }

    #[test]
    fn test_categorical_sorts_numbers_before_text() {
        let sheet = sheet(vec![
            vec!["b".into(), 1.0.into()],
            vec![10.0.into(), 1.0.into()],
            vec!["A".into(), 1.0.into()],
            vec!["9".into(), 1.0.into()],
            vec![2.0.into(), 1.0.into()],
        ]);
        let chart = build(&sheet, &request(ChartType::Line, &sheet, vec![1])).unwrap();
        assert_eq!(chart.labels, vec!["2", "9", "10", "A", "b"]);
        assert_eq!(chart.datasets[0].style.fill, Some(false));
        assert_eq!(chart.datasets[0].style.tension, Some(0.1));
    }

    #[test]
    fn test_numbers_and_text_are_distinct_categories() {
        let sheet = sheet(vec![
            vec![1.0.into(), 1.0.into()],
            vec!["1".into(), 2.0.into()],
        ]);
        let chart = build(&sheet, &request(ChartType::Bar, &sheet, vec![1])).unwrap();
        assert_eq!(chart.labels, vec!["1", "1"]);
    }

    #[test]
    fn test_negative_zero_joins_zero_category() {
        let sheet = sheet(vec![
            vec![(-0.0).into(), 1.0.into()],
            vec![0.0.into(), 2.0.into()],
        ]);
        let chart = build(&sheet, &request(ChartType::Bar, &sheet, vec![1])).unwrap();
        assert_eq!(chart.labels, vec!["0"]);
        assert_eq!(values(&chart.datasets[0]), vec![3.0]);
    }

    #[test]
    fn test_categorical_skips_empty_x_and_fails_when_nothing_left() {
        let sheet = sheet(vec![vec![CellValue::Empty, 1.0.into()]]);
        let err = build(&sheet, &request(ChartType::Bar, &sheet, vec![1])).unwrap_err();
        assert_eq!(err, ChartError::NoMatchingData);
    }

    #[test]
    fn test_radar_uses_translucent_fill() {
        let sheet = abc_sheet();
        let chart = build(&sheet, &request(ChartType::Radar, &sheet, vec![1])).unwrap();
        let style = &chart.datasets[0].style;
        assert_eq!(style.fill, Some(true));
        assert_eq!(style.background_color, ColorSpec::Single("#4e73df50".to_string()));
        assert_eq!(style.border_color, "#4e73df");
    }

    #[test]
    fn test_pie_slices_per_row_with_golden_angle_hues() {
        let sheet = abc_sheet();
        let chart = build(&sheet, &request(ChartType::Pie, &sheet, vec![1])).unwrap();
        assert_eq!(chart.labels, vec!["A", "B", "A"]);
        assert_eq!(values(&chart.datasets[0]), vec![1.0, 2.0, 3.0]);
        assert_eq!(
            chart.datasets[0].style.background_color,
            ColorSpec::PerPoint(vec![
                "hsl(0, 70%, 60%)".to_string(),
                "hsl(137.5, 70%, 60%)".to_string(),
                "hsl(275, 70%, 60%)".to_string(),
            ])
        );
        assert_eq!(chart.datasets[0].style.border_color, "white");
    }

    #[test]
    fn test_pie_drops_zero_and_nan() {
        let sheet = sheet(vec![
            vec!["A".into(), 0.0.into()],
            vec!["B".into(), "abc".into()],
            vec!["C".into(), "7".into()],
            vec!["D".into(), CellValue::Empty],
        ]);
        let chart = build(&sheet, &request(ChartType::Doughnut, &sheet, vec![1])).unwrap();
        assert_eq!(chart.labels, vec!["C"]);
        assert_eq!(values(&chart.datasets[0]), vec![7.0]);
        // Hue follows the source row, not the slice position
        assert_eq!(
            chart.datasets[0].style.background_color,
            ColorSpec::PerPoint(vec!["hsl(275, 70%, 60%)".to_string()])
        );
    }

    #[test]
    fn test_pie_without_valid_values_fails() {
        let sheet = sheet(vec![vec!["A".into(), 0.0.into()]]);
        let err = build(&sheet, &request(ChartType::PolarArea, &sheet, vec![1])).unwrap_err();
        assert_eq!(err, ChartError::NoValidData);
    }

    #[test]
    fn test_scatter_coerces_invalid_numbers() {
        let sheet = sheet(vec![
            vec![1.0.into(), 2.0.into()],
            vec!["x".into(), "3".into()],
            vec![4.0.into(), CellValue::Empty],
        ]);
        let chart = build(&sheet, &request(ChartType::Scatter, &sheet, vec![1])).unwrap();
        assert!(chart.labels.is_empty());
        assert_eq!(
            chart.datasets[0].data,
            vec![
                DataPoint::Point { x: 1.0, y: 2.0, r: None },
                DataPoint::Point { x: 0.0, y: 3.0, r: None },
            ]
        );
        assert_eq!(chart.datasets[0].style.point_radius, Some(5));
    }

    #[test]
    fn test_bubble_reads_radius_from_next_column() {
        let sheet = sheet(vec![
            vec![1.0.into(), 2.0.into(), 6.0.into()],
            vec![2.0.into(), 3.0.into()],
            vec![3.0.into(), 4.0.into(), "big".into()],
            vec![4.0.into(), 5.0.into(), 0.0.into()],
            vec![5.0.into(), 6.0.into(), (-2.0).into()],
        ]);
        let chart = build(&sheet, &request(ChartType::Bubble, &sheet, vec![1])).unwrap();
        let radii: Vec<Option<f64>> = chart.datasets[0]
            .data
            .iter()
            .map(|p| match p {
                DataPoint::Point { r, .. } => *r,
                DataPoint::Value(_) => None,
            })
            .collect();
        assert_eq!(radii, vec![Some(6.0), Some(10.0), Some(10.0), Some(10.0), Some(-2.0)]);
    }

    #[test]
    fn test_coordinate_one_dataset_per_y_column() {
        let sheet = sheet(vec![
            vec![1.0.into(), 2.0.into(), 5.0.into()],
            vec![2.0.into(), CellValue::Empty, 6.0.into()],
        ]);
        let chart = build(&sheet, &request(ChartType::Scatter, &sheet, vec![1, 2])).unwrap();
        assert_eq!(chart.datasets.len(), 2);
        assert_eq!(chart.datasets[0].data.len(), 1);
        assert_eq!(chart.datasets[1].data.len(), 2);
        assert_eq!(chart.datasets[1].style.border_color, "#1cc88a");
    }

    #[test]
    fn test_coordinate_without_points_fails() {
        let sheet = abc_sheet();
        let req = request(ChartType::Scatter, &sheet, vec![1]).with_filter(FilterSpec::new(0, "Z"));
        assert_eq!(build(&sheet, &req).unwrap_err(), ChartError::NoMatchingData);
    }

    #[test]
    fn test_window_limits_rows() {
        let sheet = abc_sheet();
        let mut req = request(ChartType::Bar, &sheet, vec![1]);
        req.range = RangeSelection::new(3, 4);
        let chart = build(&sheet, &req).unwrap();
        assert_eq!(chart.labels, vec!["A", "B"]);
        assert_eq!(values(&chart.datasets[0]), vec![3.0, 2.0]);
    }

    #[test]
    fn test_category_key_zero_and_nan_equality() {
        assert_eq!(CategoryKey::Number(0.0), CategoryKey::Number(-0.0));
        assert_eq!(CategoryKey::Number(f64::NAN), CategoryKey::Number(f64::NAN));
        assert_ne!(CategoryKey::Number(1.0), CategoryKey::Text("1".to_string()));
    }
}
