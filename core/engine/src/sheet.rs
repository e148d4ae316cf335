//! FILENAME: core/engine/src/sheet.rs
//! PURPOSE: Dense, row-ordered tabular data as handed over by a tabular source.
//! CONTEXT: A `Sheet` is created once per sheet selection and never mutated.
//! Row 1 of the source is the header; it is split off into `header` and the
//! remaining rows are data rows addressed 0-based internally.
//! Column "A" = 0, "B" = 1, ..., "Z" = 25, "AA" = 26, etc.

use serde::{Deserialize, Serialize};
use crate::cell::CellValue;

/// One row of cells. Rows may be ragged; missing cells read as `Empty`.
pub type Row = Vec<CellValue>;

static EMPTY: CellValue = CellValue::Empty;

/// Converts a 0-based column index to a column string.
/// 0 -> "A", 1 -> "B", ..., 25 -> "Z", 26 -> "AA", 27 -> "AB", etc.
pub fn index_to_col(col_index: usize) -> String {
    let mut n = col_index;
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().map(|&b| b as char).collect()
}

/// Converts a column string (e.g., "A", "aa") back to its 0-based index.
/// Returns None for an empty string or any non-alphabetic character.
pub fn col_to_index(col_str: &str) -> Option<usize> {
    if col_str.is_empty() {
        return None;
    }
    let mut result: usize = 0;
    for c in col_str.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as usize) - ('A' as usize) + 1;
        result = result.checked_mul(26)?.checked_add(digit)?;
    }
    Some(result - 1)
}

/// A column derived from the header row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub index: usize,
    pub letter: String,
    pub name: String,
}

impl Column {
    /// Builds a column, falling back to `Column <letter>` for a blank header.
    pub fn new(index: usize, header: &CellValue) -> Self {
        let letter = index_to_col(index);
        let name = match header {
            CellValue::Empty => format!("Column {}", letter),
            other => {
                let text = other.display_value();
                if text.trim().is_empty() {
                    format!("Column {}", letter)
                } else {
                    text
                }
            }
        };
        Column { index, letter, name }
    }

    /// Derives one column per header cell.
    pub fn derive_all(header: &[CellValue]) -> Vec<Column> {
        header
            .iter()
            .enumerate()
            .map(|(index, cell)| Column::new(index, cell))
            .collect()
    }
}

/// A named sheet of rows with the header row split off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    header: Row,
    rows: Vec<Row>,
    columns: Vec<Column>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, header: Row, rows: Vec<Row>) -> Self {
        let columns = Column::derive_all(&header);
        Sheet {
            name: name.into(),
            header,
            rows,
            columns,
        }
    }

    /// Builds a sheet from raw source rows where the first row is the header.
    pub fn from_rows(name: impl Into<String>, mut rows: Vec<Row>) -> Self {
        let header = if rows.is_empty() { Vec::new() } else { rows.remove(0) };
        Sheet::new(name, header, rows)
    }

    pub fn header(&self) -> &[CellValue] {
        &self.header
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column metadata for `index`, synthesized when the header is shorter.
    pub fn column(&self, index: usize) -> Column {
        self.columns
            .get(index)
            .cloned()
            .unwrap_or_else(|| Column::new(index, &CellValue::Empty))
    }

    /// Number of data rows (header excluded).
    pub fn data_row_count(&self) -> usize {
        self.rows.len()
    }

    /// User-facing row count, header included. Row 1 is the header, so the
    /// last data row is addressed as `total_rows()`.
    pub fn total_rows(&self) -> usize {
        if self.header.is_empty() && self.rows.is_empty() {
            0
        } else {
            self.rows.len() + 1
        }
    }

    /// A data row by 0-based index.
    pub fn data_row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The cell at (data row, column), `Empty` when out of bounds.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }
}

/// Reads a cell from a row, `Empty` when the row is shorter.
pub fn row_cell(row: &[CellValue], col: usize) -> &CellValue {
    row.get(col).unwrap_or(&EMPTY)
}
