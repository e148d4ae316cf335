//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Shared tabular types for the chart workspace.
//! CONTEXT: Re-exports the cell and sheet model consumed by `chart-engine`.

pub mod cell;
pub mod sheet;

// Re-export commonly used types at the crate root
pub use cell::{parse_leading_number, CellValue};
pub use sheet::{col_to_index, index_to_col, row_cell, Column, Row, Sheet};
