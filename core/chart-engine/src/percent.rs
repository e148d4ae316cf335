//! FILENAME: core/chart-engine/src/percent.rs
//! 100%-stacked normalization.
//!
//! For every label index the denominator is the sum of absolute values over
//! the datasets passed in, so calling with only the visible series
//! renormalizes them to 100 without the hidden ones.

use crate::view::{DataPoint, Dataset};

/// Per-label totals of absolute values across `datasets`.
fn label_totals<'d>(datasets: impl Iterator<Item = &'d Dataset>, label_count: usize) -> Vec<f64> {
    let mut totals = vec![0.0; label_count];
    for dataset in datasets {
        for (total, point) in totals.iter_mut().zip(&dataset.data) {
            *total += point.value().abs();
        }
    }
    totals
}

fn to_percent(dataset: &Dataset, totals: &[f64]) -> Dataset {
    let data = dataset
        .data
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let total = totals.get(i).copied().unwrap_or(0.0);
            if total == 0.0 {
                DataPoint::Value(0.0)
            } else {
                DataPoint::Value(point.value().abs() / total * 100.0)
            }
        })
        .collect();
    Dataset {
        label: dataset.label.clone(),
        data,
        style: dataset.style.clone(),
    }
}

/// Converts raw per-label values into percentages of the per-label total.
/// Values are `|v| / Σ|v| × 100`, or 0 where the total is 0.
pub fn normalize(datasets: &[Dataset], labels: &[String]) -> Vec<Dataset> {
    let totals = label_totals(datasets.iter(), labels.len());
    datasets.iter().map(|d| to_percent(d, &totals)).collect()
}

/// Normalizes over the visible subset only. Visible datasets sum to 100 per
/// label; hidden datasets keep their percentage of the all-series total so
/// they reappear sensibly when toggled back on.
pub fn normalize_visible(datasets: &[Dataset], labels: &[String], visible: &[bool]) -> Vec<Dataset> {
    let is_visible = |i: usize| visible.get(i).copied().unwrap_or(true);
    let visible_totals = label_totals(
        datasets.iter().enumerate().filter(|(i, _)| is_visible(*i)).map(|(_, d)| d),
        labels.len(),
    );
    let all_totals = label_totals(datasets.iter(), labels.len());

    datasets
        .iter()
        .enumerate()
        .map(|(i, d)| {
            if is_visible(i) {
                to_percent(d, &visible_totals)
            } else {
                to_percent(d, &all_totals)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::DatasetStyle;

    fn dataset(label: &str, values: &[f64]) -> Dataset {
        Dataset {
            label: label.to_string(),
            data: values.iter().map(|&v| DataPoint::Value(v)).collect(),
            style: DatasetStyle::solid("#4e73df"),
        }
    }

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("L{}", i)).collect()
    }

    fn column_sum(datasets: &[Dataset], index: usize) -> f64 {
        datasets.iter().map(|d| d.data[index].value()).sum()
    }

    #[test]
    fn test_columns_sum_to_100() {
        let input = vec![dataset("a", &[1.0, 3.0, 5.0]), dataset("b", &[3.0, 1.0, 0.5])];
        let out = normalize(&input, &labels(3));
        assert_eq!(out[0].data[0].value(), 25.0);
        assert_eq!(out[1].data[0].value(), 75.0);
        for i in 0..3 {
            assert!((column_sum(&out, i) - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_negative_values_use_magnitude() {
        let input = vec![dataset("a", &[-1.0]), dataset("b", &[3.0])];
        let out = normalize(&input, &labels(1));
        assert_eq!(out[0].data[0].value(), 25.0);
        assert_eq!(out[1].data[0].value(), 75.0);
    }

    #[test]
    fn test_all_zero_label_stays_zero() {
        let input = vec![dataset("a", &[0.0, 2.0]), dataset("b", &[0.0, 2.0])];
        let out = normalize(&input, &labels(2));
        assert_eq!(out[0].data[0].value(), 0.0);
        assert_eq!(out[1].data[0].value(), 0.0);
        assert_eq!(out[0].data[1].value(), 50.0);
    }

    #[test]
    fn test_short_dataset_counts_missing_as_zero() {
        let input = vec![dataset("a", &[2.0]), dataset("b", &[2.0, 4.0])];
        let out = normalize(&input, &labels(2));
        assert_eq!(out[0].data.len(), 1);
        assert_eq!(out[1].data[1].value(), 100.0);
    }

    #[test]
    fn test_subset_renormalizes_visible_series() {
        let input = vec![
            dataset("a", &[1.0, 2.0]),
            dataset("b", &[1.0, 2.0]),
            dataset("c", &[2.0, 0.0]),
        ];
        let out = normalize_visible(&input, &labels(2), &[true, false, true]);
        assert!((out[0].data[0].value() - 100.0 / 3.0).abs() < 1e-9);
        assert!((out[2].data[0].value() - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(out[0].data[1].value(), 100.0);
        assert!((out[0].data[0].value() + out[2].data[0].value() - 100.0).abs() < 1e-9);
        // Hidden series keeps its share of the full total
        assert_eq!(out[1].data[0].value(), 25.0);
    }

    #[test]
    fn test_subset_call_matches_plain_normalize() {
        let input = vec![dataset("a", &[1.0, 2.0]), dataset("c", &[2.0, 0.0])];
        let subset = normalize(&input, &labels(2));
        let visible = normalize_visible(&input, &labels(2), &[true, true]);
        assert_eq!(subset, visible);
    }
}
