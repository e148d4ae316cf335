//! FILENAME: tests/common/mod.rs
//! Sheet fixtures and assertions for chart-engine integration tests.

#![allow(dead_code)]

use chart_engine::{ChartData, ChartRequest, ChartType, RangeSelection, SeriesSpec};
use engine::{CellValue, Sheet};

// ============================================================================
// COLUMN LAYOUT
// ============================================================================

pub const REGION: usize = 0;
pub const PRODUCT: usize = 1;
pub const QUARTER: usize = 2;
pub const SALES: usize = 3;
pub const QUANTITY: usize = 4;

// ============================================================================
// FIXTURES
// ============================================================================

pub struct SalesFixture;

impl SalesFixture {
    pub fn headers() -> Vec<&'static str> {
        vec!["Region", "Product", "Quarter", "Sales", "Quantity"]
    }

    pub fn data() -> Vec<(&'static str, &'static str, &'static str, f64, f64)> {
        vec![
            ("North", "Widget", "Q1", 10000.0, 100.0),
            ("North", "Widget", "Q2", 12000.0, 120.0),
            ("North", "Gadget", "Q1", 8000.0, 80.0),
            ("North", "Gadget", "Q2", 9000.0, 90.0),
            ("South", "Widget", "Q1", 15000.0, 150.0),
            ("South", "Widget", "Q2", 14000.0, 140.0),
            ("South", "Gadget", "Q1", 11000.0, 110.0),
            ("South", "Gadget", "Q2", 13000.0, 130.0),
            ("East", "Widget", "Q1", 9000.0, 90.0),
            ("East", "Widget", "Q2", 11000.0, 110.0),
            ("East", "Gadget", "Q1", 7000.0, 70.0),
            ("East", "Gadget", "Q2", 8500.0, 85.0),
        ]
    }

    fn header_row() -> Vec<CellValue> {
        Self::headers().into_iter().map(CellValue::from).collect()
    }

    fn data_rows() -> Vec<Vec<CellValue>> {
        Self::data()
            .into_iter()
            .map(|(region, product, quarter, sales, quantity)| {
                vec![
                    CellValue::from(region),
                    CellValue::from(product),
                    CellValue::from(quarter),
                    CellValue::from(sales),
                    CellValue::from(quantity),
                ]
            })
            .collect()
    }

    /// The sales table as a sheet (header plus 12 data rows).
    pub fn sheet() -> Sheet {
        let mut rows = vec![Self::header_row()];
        rows.extend(Self::data_rows());
        Sheet::from_rows("Sales", rows)
    }

    /// The sales table with every data row appearing twice.
    pub fn doubled_sheet() -> Sheet {
        let mut rows = vec![Self::header_row()];
        rows.extend(Self::data_rows());
        rows.extend(Self::data_rows());
        Sheet::from_rows("Sales", rows)
    }

    /// Request over every data row of `sheet`.
    pub fn request(sheet: &Sheet, chart_type: ChartType, x: usize, y: Vec<usize>) -> ChartRequest {
        ChartRequest::new(chart_type, RangeSelection::all(sheet.total_rows()), SeriesSpec::new(x, y))
    }
}

/// Sheet from a header and (key, value) rows.
pub fn pairs_sheet(rows: &[(&str, f64)]) -> Sheet {
    let mut all = vec![vec![CellValue::from("Key"), CellValue::from("Value")]];
    all.extend(rows.iter().map(|&(k, v)| vec![CellValue::from(k), CellValue::from(v)]));
    Sheet::from_rows("Pairs", all)
}

/// Sheet of `rows` generated rows: category, group, value, size.
pub fn large_sheet(rows: usize) -> Sheet {
    let mut all = vec![vec![
        CellValue::from("Category"),
        CellValue::from("Group"),
        CellValue::from("Value"),
        CellValue::from("Size"),
    ]];
    for i in 0..rows {
        all.push(vec![
            CellValue::from(format!("C{:03}", i % 200)),
            CellValue::from(format!("G{}", i % 7)),
            CellValue::from((i % 1000) as f64),
            CellValue::from((i % 13) as f64),
        ]);
    }
    Sheet::from_rows("Large", all)
}

// ============================================================================
// ASSERTION HELPERS
// ============================================================================

/// Values of dataset `index` as plain numbers.
pub fn dataset_values(data: &ChartData, index: usize) -> Vec<f64> {
    data.datasets[index].values().collect()
}

/// Assert that every label's values across all datasets sum to 100.
pub fn assert_columns_sum_to_100(data: &ChartData) {
    for i in 0..data.labels.len() {
        let sum: f64 = data.datasets.iter().map(|d| d.data[i].value()).sum();
        assert!(
            (sum - 100.0).abs() < 1e-9,
            "label '{}' sums to {} instead of 100",
            data.labels[i],
            sum
        );
    }
}
