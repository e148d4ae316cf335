//! FILENAME: core/chart-engine/src/lib.rs
//! Chart subsystem: series aggregation and re-filtering.
//!
//! Turns the rows of a `Sheet` into chart-ready datasets under a row range,
//! an axis mapping and a primary filter, then lets a second chart filter
//! narrow the built chart without re-aggregating. Depends on `engine` only
//! for the shared cell and sheet types.
//!
//! Layers:
//! - `definition`: Serializable request and configuration (what to chart)
//! - `matcher`, `range`, `scan`: Row selection (which rows count)
//! - `series`, `percent`: Dataset construction (HOW we aggregate)
//! - `projector`: Reverse lookup from chart elements to source rows
//! - `view`, `options`: Renderable output (WHAT the renderer gets)
//! - `session`: Pipeline and displayed state
//! - `preview`: Approximate summary of a selection

pub mod color;
pub mod definition;
pub mod error;
pub mod matcher;
pub mod options;
pub mod percent;
pub mod preview;
pub mod projector;
pub mod range;
pub mod scan;
pub mod series;
pub mod session;
pub mod view;

pub use definition::*;
pub use error::{ChartError, ChartWarning, Result};
pub use matcher::{RowFilter, ValueMatcher};
pub use options::{AxisOptions, LegendPosition, RenderOptions};
pub use percent::{normalize, normalize_visible};
pub use preview::{preview, DataPreview, SeriesSummary};
pub use projector::ReverseProjector;
pub use range::validate_range;
pub use scan::RowWindow;
pub use series::{compare_labels, SeriesBuilder};
pub use session::{build_chart, list_distinct_values, ChartSession};
pub use view::*;
