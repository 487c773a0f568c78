use crate::processing::{polyfit, ProcessingError};

/// Fixed Savitzky–Golay polynomial order.
const POLY_ORDER: usize = 3;

// ---------------------------------------------------------------------------
// Savitzky–Golay smoothing
// ---------------------------------------------------------------------------

/// Smooth a spectrum with a Savitzky–Golay filter of order 3. The window
/// must be odd, larger than the polynomial order and no longer than the
/// spectrum; violations are rejected rather than rounded.
///
/// Interior samples use the least-squares convolution kernel; the first and
/// last half-window samples are filled by evaluating a degree-3 fit of the
/// first (respectively last) full window at those positions.
pub fn smooth_spectrum(values: &[f64], window: usize) -> Result<Vec<f64>, ProcessingError> {
    let n = values.len();
    if window % 2 == 0 {
        return Err(ProcessingError::InvalidParameter(format!(
            "smoothing window must be odd, got {window}"
        )));
    }
    if window <= POLY_ORDER {
        return Err(ProcessingError::InvalidParameter(format!(
            "smoothing window {window} must exceed the polynomial order {POLY_ORDER}"
        )));
    }
    if window > n {
        return Err(ProcessingError::InvalidParameter(format!(
            "smoothing window {window} exceeds the spectrum length {n}"
        )));
    }

    let half = window / 2;
    let kernel = savgol_kernel(window)?;

    let mut smoothed = vec![0.0f64; n];
    for i in half..n - half {
        let mut acc = 0.0;
        for (j, &c) in kernel.iter().enumerate() {
            acc += c * values[i - half + j];
        }
        smoothed[i] = acc;
    }

    let xs: Vec<f64> = (0..window).map(|i| i as f64).collect();

    let head_targets: Vec<f64> = (0..half).map(|i| i as f64).collect();
    let head = polyfit::fit_eval(&xs, &values[..window], POLY_ORDER, &head_targets)
        .ok_or_else(|| singular(window))?;
    smoothed[..half].copy_from_slice(&head);

    // Target positions expressed in the last window's local coordinates.
    let tail_targets: Vec<f64> = (window - half..window).map(|i| i as f64).collect();
    let tail = polyfit::fit_eval(&xs, &values[n - window..], POLY_ORDER, &tail_targets)
        .ok_or_else(|| singular(window))?;
    smoothed[n - half..].copy_from_slice(&tail);

    Ok(smoothed)
}

/// Central convolution coefficients, derived by fitting each unit impulse
/// and reading the fit value at the window center.
fn savgol_kernel(window: usize) -> Result<Vec<f64>, ProcessingError> {
    let half = window / 2;
    let xs: Vec<f64> = (0..window).map(|i| i as f64 - half as f64).collect();
    let mut impulse = vec![0.0f64; window];
    let mut kernel = Vec::with_capacity(window);
    for j in 0..window {
        impulse[j] = 1.0;
        let fitted =
            polyfit::fit_eval(&xs, &impulse, POLY_ORDER, &[0.0]).ok_or_else(|| singular(window))?;
        kernel.push(fitted[0]);
        impulse[j] = 0.0;
    }
    Ok(kernel)
}

fn singular(window: usize) -> ProcessingError {
    ProcessingError::InvalidParameter(format!(
        "smoothing window {window} produced a numerically singular fit"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn cubic(x: f64) -> f64 {
        1.0 + 3.0 * x - 0.2 * x * x + 0.004 * x * x * x
    }

    #[test]
    fn an_order_three_filter_reproduces_a_cubic_exactly() {
        let values: Vec<f64> = (0..31).map(|i| cubic(i as f64)).collect();
        let smoothed = smooth_spectrum(&values, 11).unwrap();
        assert_eq!(smoothed.len(), values.len());
        for (s, v) in smoothed.iter().zip(&values) {
            assert_abs_diff_eq!(s, v, epsilon = 1e-8);
        }
    }

    #[test]
    fn window_equal_to_the_length_is_a_global_fit() {
        let values: Vec<f64> = (0..5).map(|i| cubic(i as f64)).collect();
        let smoothed = smooth_spectrum(&values, 5).unwrap();
        for (s, v) in smoothed.iter().zip(&values) {
            assert_abs_diff_eq!(s, v, epsilon = 1e-8);
        }
    }

    #[test]
    fn center_coefficient_matches_the_reference_kernel() {
        // Window 5, order 3: central weights (-3, 12, 17, 12, -3) / 35.
        let mut impulse = vec![0.0; 5];
        impulse[2] = 1.0;
        let smoothed = smooth_spectrum(&impulse, 5).unwrap();
        assert_relative_eq!(smoothed[2], 17.0 / 35.0, epsilon = 1e-9);
    }

    #[test]
    fn high_frequency_noise_is_attenuated() {
        let values: Vec<f64> = (0..40)
            .map(|i| 100.0 + if i % 2 == 0 { 4.0 } else { -4.0 })
            .collect();
        let smoothed = smooth_spectrum(&values, 5).unwrap();
        let ssd = |v: &[f64]| -> f64 { v.iter().map(|y| (y - 100.0) * (y - 100.0)).sum() };
        assert!(ssd(&smoothed[2..38]) < ssd(&values[2..38]));
    }

    #[test]
    fn even_windows_are_rejected() {
        let values = vec![0.0; 32];
        assert!(matches!(
            smooth_spectrum(&values, 10),
            Err(ProcessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn windows_not_exceeding_the_order_are_rejected() {
        let values = vec![0.0; 32];
        assert!(matches!(
            smooth_spectrum(&values, 3),
            Err(ProcessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn windows_longer_than_the_spectrum_are_rejected() {
        let values = vec![0.0; 5];
        assert!(matches!(
            smooth_spectrum(&values, 11),
            Err(ProcessingError::InvalidParameter(_))
        ));
    }
}
