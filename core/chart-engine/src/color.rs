//! FILENAME: core/chart-engine/src/color.rs
//! Deterministic colors for series and single-series segments.

/// Fixed series palette, cycled by series index.
pub const SERIES_PALETTE: [&str; 10] = [
    "#4e73df", "#1cc88a", "#36b9cc", "#f6c23e", "#e74a3b",
    "#6f42c1", "#5a5c69", "#858796", "#4287f5", "#41e169",
];

/// Golden-angle increment between consecutive segment hues, in degrees.
pub const GOLDEN_ANGLE: f64 = 137.5;

/// Suffix appended to a hex series color for translucent area fills.
pub const FILL_ALPHA_SUFFIX: &str = "50";

pub fn palette_color(index: usize) -> &'static str {
    SERIES_PALETTE[index % SERIES_PALETTE.len()]
}

/// Hue for the segment produced by data row `row_index`.
pub fn segment_hue(row_index: usize) -> f64 {
    (row_index as f64 * GOLDEN_ANGLE) % 360.0
}

/// CSS color for the segment produced by data row `row_index`.
pub fn segment_color(row_index: usize) -> String {
    format!("hsl({}, 70%, 60%)", segment_hue(row_index))
}

/// Translucent variant of a series color, for filled radar areas.
pub fn translucent(color: &str) -> String {
    format!("{}{}", color, FILL_ALPHA_SUFFIX)
}
