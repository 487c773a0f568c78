// ---------------------------------------------------------------------------
// Min–max normalization
// ---------------------------------------------------------------------------

/// Scale a spectrum to [0, 1] by min–max normalization. A flat spectrum
/// (range below `f64::EPSILON`) maps to all zeros rather than dividing by
/// the degenerate range.
pub fn normalize_spectrum(values: &[f64]) -> Vec<f64> {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range.abs() < f64::EPSILON {
        vec![0.0; values.len()]
    } else {
        values.iter().map(|&v| (v - min) / range).collect()
    }
}
