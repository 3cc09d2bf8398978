//! Depth arithmetic and formatting
//!
//! Depths are metres below ground level. Text output uses one decimal place
//! with half-up rounding on the decimal value, so 1.45 renders as "1.5" even
//! though its binary representation sits just below the midpoint.

/// Absorbs binary representation error before rounding (well below 1 mm)
const ROUNDING_SLACK: f64 = 1e-9;

/// Resolution used when comparing spreads against tolerances (1 nm)
const SPREAD_RESOLUTION: f64 = 1e9;

/// Round to one decimal place, half away from zero
pub fn round_half_up_1dp(value: f64) -> f64 {
    let magnitude = libm::floor(value.abs() * 10.0 + 0.5 + ROUNDING_SLACK) / 10.0;
    if magnitude == 0.0 {
        0.0
    } else {
        magnitude.copysign(value)
    }
}

/// Fixed-point, one decimal: `1.45` → `"1.5"`
pub fn format_depth(value: f64) -> String {
    format!("{:.1}", round_half_up_1dp(value))
}

/// Snap a spread to nanometre resolution so `2.3 - 2.0` compares as `0.3`
pub fn quantize_spread(spread: f64) -> f64 {
    libm::round(spread * SPREAD_RESOLUTION) / SPREAD_RESOLUTION
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

pub fn min_value(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max_value(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}
