//! FILENAME: core/chart-engine/src/session.rs
//! Chart Session - The aggregation pipeline and its displayed state.
//!
//! `build_chart` sequences validation, the primary-filtered series build and
//! warnings. `ChartSession` owns one generated chart: the immutable
//! snapshot, the chart-filtered data, legend visibility and render options.
//! Every mutating operation computes its result first and only then swaps it
//! in, so a failed call leaves the session as it was.

use std::sync::Arc;

use engine::{row_cell, CellValue, Sheet};
use log::{info, warn};
use rustc_hash::FxHashSet;

use crate::definition::{ChartFamily, ChartRequest, EngineConfig, FilterSpec, RangeSelection};
use crate::error::{ChartError, ChartWarning, Result};
use crate::matcher::{RowFilter, ValueMatcher};
use crate::options::RenderOptions;
use crate::percent::normalize_visible;
use crate::projector::ReverseProjector;
use crate::range::validate_range;
use crate::scan::RowWindow;
use crate::series::{compare_labels, CategoryKey, SeriesBuilder};
use crate::view::{ChartData, ChartPayload};

// ============================================================================
// PIPELINE
// ============================================================================

/// Raw (un-normalized) chart data for `request`, plus non-fatal warnings.
pub fn build_chart(
    sheet: &Sheet,
    request: &ChartRequest,
    config: &EngineConfig,
) -> Result<(ChartData, Vec<ChartWarning>)> {
    validate_range(&request.range, sheet.total_rows())?;

    let y_count = request.series.y_columns.len();
    if y_count == 0 {
        return Err(ChartError::NoYAxisSelected);
    }

    let mut warnings = Vec::new();
    if request.chart_type.family() == ChartFamily::SingleSeries && y_count > 1 {
        let warning = ChartWarning::UnsupportedMultiSeries {
            chart_type: request.chart_type,
            ignored: y_count - 1,
        };
        warn!("{}", warning);
        warnings.push(warning);
    }

    let matcher = ValueMatcher::from_config(config);
    let data = SeriesBuilder::new(sheet, request, config, &matcher).build()?;
    info!(
        "built {:?} chart: {} labels, {} datasets, {} points",
        request.chart_type,
        data.labels.len(),
        data.datasets.len(),
        data.point_count()
    );
    Ok((data, warnings))
}

/// Distinct non-empty values in first-seen identity, sorted in label order.
pub(crate) fn distinct_sorted<I: IntoIterator<Item = CellValue>>(values: I) -> Vec<CellValue> {
    let mut seen: FxHashSet<CategoryKey> = FxHashSet::default();
    let mut distinct: Vec<CellValue> = values
        .into_iter()
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(CategoryKey::from(v)))
        .collect();
    distinct.sort_by(compare_labels);
    distinct
}

/// Values offered by a filter picker: the distinct non-empty values of
/// `column` over the rows of `range`, optionally narrowed by another filter.
pub fn list_distinct_values(
    sheet: &Sheet,
    column: usize,
    range: &RangeSelection,
    applied_filter: Option<&FilterSpec>,
    config: &EngineConfig,
) -> Result<Vec<CellValue>> {
    validate_range(range, sheet.total_rows())?;

    let matcher = ValueMatcher::from_config(config);
    let all = FilterSpec::all();
    let filter = RowFilter::new(applied_filter.unwrap_or(&all), &matcher);
    let values = RowWindow::exact(range, sheet.data_row_count())
        .indices()
        .filter_map(|i| sheet.data_row(i))
        .filter(|row| filter.row_matches(row))
        .map(|row| row_cell(row, column).clone());
    Ok(distinct_sorted(values))
}

// ============================================================================
// CHART SESSION
// ============================================================================

/// One generated chart and everything the renderer currently shows.
#[derive(Debug, Clone)]
pub struct ChartSession {
    request: ChartRequest,
    config: EngineConfig,
    matcher: ValueMatcher,
    /// Primary pipeline output. Never mutated; replaced only by regeneration.
    snapshot: Arc<ChartData>,
    /// Snapshot after the chart filter, raw values.
    filtered: ChartData,
    /// What the renderer shows (percentages for percent-stacked charts).
    displayed: ChartData,
    visible: Vec<bool>,
    chart_filter: FilterSpec,
    options: RenderOptions,
    warnings: Vec<ChartWarning>,
}

impl ChartSession {
    pub fn generate(sheet: &Sheet, request: ChartRequest, config: EngineConfig) -> Result<Self> {
        let (data, warnings) = build_chart(sheet, &request, &config)?;
        let visible = vec![true; data.datasets.len()];
        let mut session = ChartSession {
            matcher: ValueMatcher::from_config(&config),
            options: RenderOptions::for_chart(request.chart_type),
            request,
            config,
            displayed: ChartData::default(),
            filtered: data.clone(),
            snapshot: Arc::new(data),
            visible,
            chart_filter: FilterSpec::all(),
            warnings,
        };
        session.displayed = session.present(&session.filtered);
        Ok(session)
    }

    /// Rebuilds from a new request. On failure the current chart stays.
    pub fn regenerate(&mut self, sheet: &Sheet, request: ChartRequest) -> Result<&[ChartWarning]> {
        let next = ChartSession::generate(sheet, request, self.config.clone())?;
        *self = next;
        Ok(&self.warnings)
    }

    /// Applies `filter` to the snapshot through reverse projection. On
    /// `NoMatchingData` the displayed chart is left unchanged.
    pub fn reapply_filter(&mut self, sheet: &Sheet, filter: FilterSpec) -> Result<&ChartData> {
        let projector = ReverseProjector::new(sheet, &self.request, &self.config, &self.matcher);
        let filtered = projector.project(&self.snapshot, &filter)?;
        self.displayed = self.present(&filtered);
        self.filtered = filtered;
        self.chart_filter = filter;
        Ok(&self.displayed)
    }

    /// Legend toggle. Percent-stacked charts renormalize over the visible
    /// series; other charts only record the flag.
    pub fn set_series_visible(&mut self, index: usize, visible: bool) -> Result<&ChartData> {
        let count = self.visible.len();
        let Some(flag) = self.visible.get_mut(index) else {
            return Err(ChartError::SeriesOutOfRange { index, count });
        };
        *flag = visible;
        if self.request.chart_type.is_percent_stacked() {
            self.displayed = self.present(&self.filtered);
        }
        Ok(&self.displayed)
    }

    /// Values for the chart-filter picker: distinct values of `column` over
    /// the primary-filtered rows that produced the snapshot.
    pub fn chart_filter_values(&self, sheet: &Sheet, column: usize) -> Vec<CellValue> {
        ReverseProjector::new(sheet, &self.request, &self.config, &self.matcher)
            .contributing_values(&self.snapshot, column)
    }

    fn present(&self, data: &ChartData) -> ChartData {
        if !self.request.chart_type.is_percent_stacked() {
            return data.clone();
        }
        ChartData {
            labels: data.labels.clone(),
            datasets: normalize_visible(&data.datasets, &data.labels, &self.visible),
        }
    }

    pub fn payload(&self) -> ChartPayload {
        ChartPayload {
            chart_type: self.request.chart_type,
            renderer_type: self.request.chart_type.renderer_type().to_string(),
            data: self.displayed.clone(),
            options: self.options.clone(),
        }
    }

    pub fn snapshot(&self) -> &ChartData {
        &self.snapshot
    }

    /// A shared handle to the snapshot.
    pub fn shared_snapshot(&self) -> Arc<ChartData> {
        Arc::clone(&self.snapshot)
    }

    pub fn displayed(&self) -> &ChartData {
        &self.displayed
    }

    pub fn request(&self) -> &ChartRequest {
        &self.request
    }

    pub fn chart_filter(&self) -> &FilterSpec {
        &self.chart_filter
    }

    pub fn is_series_visible(&self, index: usize) -> bool {
        self.visible.get(index).copied().unwrap_or(false)
    }

    pub fn warnings(&self) -> &[ChartWarning] {
        &self.warnings
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.options.set_title(title);
    }

    pub fn set_axis_titles(&mut self, x_title: &str, y_title: &str) {
        self.options.set_axis_titles(x_title, y_title);
    }
}
