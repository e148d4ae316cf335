//! FILENAME: core/chart-engine/src/projector.rs
//! Reverse Projector - Re-filters an already built chart.
//!
//! Instead of re-running the series builders, every chart element in the
//! snapshot (a category label, or an (x, y) point) is mapped back to the
//! source rows that produced it. An element survives the chart filter iff at
//! least one of those rows also satisfies it.
//!
//! Lookups go through an index built once per call (label -> rows, or
//! tolerance-sized coordinate bucket -> rows), so the cost is
//! O(rows + elements) rather than O(rows × elements).

use engine::{row_cell, CellValue, Sheet};
use log::{debug, info};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::definition::{ChartFamily, ChartRequest, EngineConfig, FilterSpec};
use crate::error::{ChartError, Result};
use crate::matcher::{match_key, normalize, RowFilter, ValueMatcher};
use crate::percent::normalize as normalize_percent;
use crate::scan::RowWindow;
use crate::view::{ChartData, Dataset};

// ============================================================================
// ELEMENT INDEXES
// ============================================================================

/// Source rows grouped by the match key of their X cell.
#[derive(Debug, Default)]
struct LabelIndex {
    by_key: FxHashMap<String, SmallVec<[usize; 4]>>,
    /// Rows whose X cell is empty; only blank-token labels reach them.
    blank: Vec<usize>,
}

impl LabelIndex {
    fn build(sheet: &Sheet, x_col: usize, rows: &[usize]) -> Self {
        let mut index = LabelIndex::default();
        for &i in rows {
            match match_key(sheet.cell(i, x_col)) {
                Some(key) => index.by_key.entry(key).or_default().push(i),
                None => index.blank.push(i),
            }
        }
        index
    }

    /// Rows whose X cell matches `label` under the value matcher.
    fn rows_for<'s>(&'s self, label: &str, matcher: &ValueMatcher) -> impl Iterator<Item = usize> + 's {
        let keyed = self
            .by_key
            .get(&normalize(label))
            .map(|rows| rows.as_slice())
            .unwrap_or(&[]);
        let blank: &[usize] = if matcher.is_blank_token(label) { &self.blank } else { &[] };
        keyed.iter().chain(blank.iter()).copied()
    }
}

/// Candidate point of one source row under one Y column.
type Candidate = (usize, f64, f64);

/// Source rows bucketed on a grid whose cell size equals the tolerance, so
/// every row within tolerance of a point lies in the 3×3 neighbourhood of
/// the point's bucket.
#[derive(Debug)]
struct CoordinateIndex {
    tolerance: f64,
    buckets: FxHashMap<(i64, i64), SmallVec<[Candidate; 2]>>,
}

impl CoordinateIndex {
    fn build(sheet: &Sheet, x_col: usize, y_cols: &[usize], rows: &[usize], tolerance: f64) -> Self {
        let mut index = CoordinateIndex {
            tolerance,
            buckets: FxHashMap::default(),
        };
        for &i in rows {
            let x_cell = sheet.cell(i, x_col);
            if x_cell.is_empty() {
                continue;
            }
            let x = x_cell.number_or(0.0);
            for &y_col in y_cols {
                let y_cell = sheet.cell(i, y_col);
                if y_cell.is_empty() {
                    continue;
                }
                let y = y_cell.number_or(0.0);
                let key = index.bucket(x, y);
                index.buckets.entry(key).or_default().push((i, x, y));
            }
        }
        index
    }

    fn bucket(&self, x: f64, y: f64) -> (i64, i64) {
        // Float-to-int casts saturate, so infinities land in the edge buckets
        ((x / self.tolerance).floor() as i64, (y / self.tolerance).floor() as i64)
    }

    /// Rows with a candidate strictly within tolerance of (x, y) on both axes.
    fn rows_near(&self, x: f64, y: f64) -> SmallVec<[usize; 8]> {
        let (bx, by) = self.bucket(x, y);
        let mut rows = SmallVec::new();
        for dx in -1i64..=1 {
            for dy in -1i64..=1 {
                let (Some(kx), Some(ky)) = (bx.checked_add(dx), by.checked_add(dy)) else {
                    continue;
                };
                let Some(candidates) = self.buckets.get(&(kx, ky)) else {
                    continue;
                };
                for &(row, cx, cy) in candidates {
                    if (cx - x).abs() < self.tolerance && (cy - y).abs() < self.tolerance {
                        rows.push(row);
                    }
                }
            }
        }
        rows
    }
}

// ============================================================================
// REVERSE PROJECTOR
// ============================================================================

/// Maps snapshot elements back to source rows for one chart request.
pub struct ReverseProjector<'a> {
    sheet: &'a Sheet,
    request: &'a ChartRequest,
    config: &'a EngineConfig,
    matcher: &'a ValueMatcher,
}

impl<'a> ReverseProjector<'a> {
    pub fn new(
        sheet: &'a Sheet,
        request: &'a ChartRequest,
        config: &'a EngineConfig,
        matcher: &'a ValueMatcher,
    ) -> Self {
        ReverseProjector {
            sheet,
            request,
            config,
            matcher,
        }
    }

    /// Rows in the exact window that pass the primary filter.
    fn primary_rows(&self) -> Vec<usize> {
        let primary = RowFilter::new(&self.request.primary_filter, self.matcher);
        RowWindow::exact(&self.request.range, self.sheet.data_row_count())
            .indices()
            .filter(|&i| {
                self.sheet
                    .data_row(i)
                    .map_or(false, |row| primary.row_matches(row))
            })
            .collect()
    }

    fn row_passes(&self, filter: &RowFilter<'_>, row: usize) -> bool {
        self.sheet
            .data_row(row)
            .map_or(false, |r| filter.row_matches(r))
    }

    fn label_index(&self) -> LabelIndex {
        LabelIndex::build(self.sheet, self.request.series.x_column, &self.primary_rows())
    }

    fn coordinate_index(&self) -> CoordinateIndex {
        CoordinateIndex::build(
            self.sheet,
            self.request.series.x_column,
            &self.request.series.y_columns,
            &self.primary_rows(),
            self.config.coordinate_tolerance,
        )
    }

    /// Filters `snapshot` by `chart_filter` without re-aggregating. Values are
    /// returned as they appear in the snapshot (raw, not percentages).
    ///
    /// An inactive chart filter returns the snapshot unchanged. An empty
    /// result is `NoMatchingData`.
    pub fn project(&self, snapshot: &ChartData, chart_filter: &FilterSpec) -> Result<ChartData> {
        if !chart_filter.is_active() {
            return Ok(snapshot.clone());
        }
        let filter = RowFilter::new(chart_filter, self.matcher);
        let projected = match self.request.chart_type.family() {
            ChartFamily::Categorical | ChartFamily::SingleSeries => {
                self.project_labels(snapshot, &filter)
            }
            ChartFamily::Coordinate => self.project_points(snapshot, &filter),
        };

        if projected.is_empty() {
            info!("chart filter '{}' matched nothing", filter.value());
            return Err(ChartError::NoMatchingData);
        }
        info!(
            "chart filter '{}' kept {} of {} points",
            filter.value(),
            projected.point_count(),
            snapshot.point_count()
        );
        Ok(projected)
    }

    /// `project`, followed by percentage normalization for percent-stacked
    /// charts.
    pub fn refilter(&self, snapshot: &ChartData, chart_filter: &FilterSpec) -> Result<ChartData> {
        let mut projected = self.project(snapshot, chart_filter)?;
        if self.request.chart_type.is_percent_stacked() {
            projected.datasets = normalize_percent(&projected.datasets, &projected.labels);
        }
        Ok(projected)
    }

    /// Whole-label inclusion: a label and every dataset's value at its index
    /// are kept together or dropped together.
    fn project_labels(&self, snapshot: &ChartData, filter: &RowFilter<'_>) -> ChartData {
        let index = self.label_index();
        debug!("label index covers {} distinct keys", index.by_key.len());

        let kept: Vec<usize> = snapshot
            .labels
            .iter()
            .enumerate()
            .filter(|(_, label)| {
                index
                    .rows_for(label, self.matcher)
                    .any(|row| self.row_passes(filter, row))
            })
            .map(|(i, _)| i)
            .collect();

        if kept.is_empty() {
            return ChartData::default();
        }
        ChartData {
            labels: kept.iter().map(|&i| snapshot.labels[i].clone()).collect(),
            datasets: snapshot.datasets.iter().map(|d| d.retain_indices(&kept)).collect(),
        }
    }

    /// Per-point inclusion; datasets may keep different point counts.
    fn project_points(&self, snapshot: &ChartData, filter: &RowFilter<'_>) -> ChartData {
        let index = self.coordinate_index();
        debug!("coordinate index holds {} buckets", index.buckets.len());

        let datasets: Vec<Dataset> = snapshot
            .datasets
            .iter()
            .map(|dataset| {
                let kept: Vec<usize> = dataset
                    .data
                    .iter()
                    .enumerate()
                    .filter(|(_, point)| {
                        point.coordinates().map_or(false, |(x, y)| {
                            index
                                .rows_near(x, y)
                                .iter()
                                .any(|&row| self.row_passes(filter, row))
                        })
                    })
                    .map(|(i, _)| i)
                    .collect();
                dataset.retain_indices(&kept)
            })
            .collect();

        ChartData {
            labels: Vec::new(),
            datasets,
        }
    }

    /// Source rows (primary-filtered, exact window) that produced at least
    /// one element of `snapshot`, in row order.
    pub fn contributing_rows(&self, snapshot: &ChartData) -> Vec<usize> {
        let mut rows: Vec<usize> = match self.request.chart_type.family() {
            ChartFamily::Categorical | ChartFamily::SingleSeries => {
                let index = self.label_index();
                snapshot
                    .labels
                    .iter()
                    .flat_map(|label| index.rows_for(label, self.matcher).collect::<Vec<_>>())
                    .collect()
            }
            ChartFamily::Coordinate => {
                let index = self.coordinate_index();
                snapshot
                    .datasets
                    .iter()
                    .flat_map(|d| d.data.iter())
                    .filter_map(|p| p.coordinates())
                    .flat_map(|(x, y)| index.rows_near(x, y))
                    .collect()
            }
        };
        rows.sort_unstable();
        rows.dedup();
        rows
    }

    /// Distinct non-empty values of `column` across the contributing rows.
    pub fn contributing_values(&self, snapshot: &ChartData, column: usize) -> Vec<CellValue> {
        let values = self
            .contributing_rows(snapshot)
            .into_iter()
            .filter_map(|i| self.sheet.data_row(i))
            .map(|row| row_cell(row, column).clone());
        crate::session::distinct_sorted(values)
    }
}
