use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::model::WavelengthSpectrum;
use crate::processing::{polyfit, ProcessingError};

// ---------------------------------------------------------------------------
// BaselineMethod
// ---------------------------------------------------------------------------

/// How the slowly varying instrument baseline is estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineMethod {
    /// Least-squares polynomial fit over pixel index.
    Polynomial,
    /// Rolling median of window `len / 20` (clamped to ≥ 1, forced odd).
    RollingMinimum,
}

impl BaselineMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaselineMethod::Polynomial => "polynomial",
            BaselineMethod::RollingMinimum => "rolling_minimum",
        }
    }
}

impl fmt::Display for BaselineMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BaselineMethod {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "polynomial" => Ok(BaselineMethod::Polynomial),
            "rolling_minimum" => Ok(BaselineMethod::RollingMinimum),
            other => Err(ProcessingError::InvalidArgument(format!(
                "unknown baseline method '{other}' (expected polynomial or rolling_minimum)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Baseline correction
// ---------------------------------------------------------------------------

/// Estimate the baseline with the chosen method and subtract it. Returns a
/// fresh spectrum; the input is not touched. `degree` only applies to the
/// polynomial method.
pub fn correct_baseline(
    spectrum: &WavelengthSpectrum,
    method: BaselineMethod,
    degree: usize,
) -> Result<WavelengthSpectrum, ProcessingError> {
    let baseline = match method {
        BaselineMethod::Polynomial => polynomial_baseline(&spectrum.intensities, degree)?,
        BaselineMethod::RollingMinimum => rolling_median_baseline(&spectrum.intensities),
    };
    let intensities = spectrum
        .intensities
        .iter()
        .zip(&baseline)
        .map(|(y, b)| y - b)
        .collect();
    Ok(WavelengthSpectrum {
        wavelengths: spectrum.wavelengths.clone(),
        intensities,
    })
}

fn polynomial_baseline(values: &[f64], degree: usize) -> Result<Vec<f64>, ProcessingError> {
    if degree >= values.len() {
        return Err(ProcessingError::InvalidParameter(format!(
            "polynomial degree {degree} requires at least {} samples, spectrum has {}",
            degree + 1,
            values.len()
        )));
    }
    let xs: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
    polyfit::fit_eval(&xs, values, degree, &xs).ok_or_else(|| {
        ProcessingError::InvalidParameter(format!(
            "polynomial degree {degree} is numerically singular for this spectrum"
        ))
    })
}

fn rolling_median_baseline(values: &[f64]) -> Vec<f64> {
    let mut window = (values.len() / 20).max(1);
    if window % 2 == 0 {
        window += 1;
    }
    median_filter(values, window)
}

/// Rolling median with zero-padded edges. `window` must be odd.
fn median_filter(values: &[f64], window: usize) -> Vec<f64> {
    let half = window / 2;
    let len = values.len() as isize;
    let mut neighborhood = Vec::with_capacity(window);
    (0..values.len())
        .map(|i| {
            neighborhood.clear();
            for offset in 0..window {
                let idx = i as isize + offset as isize - half as isize;
                neighborhood.push(if idx < 0 || idx >= len {
                    0.0
                } else {
                    values[idx as usize]
                });
            }
            neighborhood.sort_unstable_by(f64::total_cmp);
            neighborhood[half]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn spectrum_from(intensities: Vec<f64>) -> WavelengthSpectrum {
        let wavelengths = (0..intensities.len()).map(|i| 400.0 + i as f64).collect();
        WavelengthSpectrum {
            wavelengths,
            intensities,
        }
    }

    #[test]
    fn polynomial_removes_a_matching_trend_completely() {
        let values: Vec<f64> = (0..50)
            .map(|i| {
                let x = i as f64;
                3.0 + 0.2 * x + 0.01 * x * x - 0.0002 * x * x * x
            })
            .collect();
        let corrected =
            correct_baseline(&spectrum_from(values), BaselineMethod::Polynomial, 3).unwrap();
        for y in &corrected.intensities {
            assert_abs_diff_eq!(*y, 0.0, epsilon = 1e-8);
        }
    }

    #[test]
    fn polynomial_keeps_a_narrow_peak() {
        let mut values: Vec<f64> = (0..101).map(|i| 5.0 + 0.1 * i as f64).collect();
        values[50] += 100.0;
        let corrected =
            correct_baseline(&spectrum_from(values), BaselineMethod::Polynomial, 1).unwrap();
        assert!(corrected.intensities[50] > 95.0);
        assert!(corrected.intensities[0].abs() < 3.0);
        assert!(corrected.intensities[100].abs() < 3.0);
    }

    #[test]
    fn polynomial_degree_must_be_below_the_length() {
        let short = spectrum_from(vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            correct_baseline(&short, BaselineMethod::Polynomial, 3),
            Err(ProcessingError::InvalidParameter(_))
        ));

        let minimal = spectrum_from(vec![1.0, 2.0, 3.0, 4.0]);
        assert!(correct_baseline(&minimal, BaselineMethod::Polynomial, 3).is_ok());
    }

    #[test]
    fn rolling_median_flattens_a_constant_spectrum() {
        let corrected = correct_baseline(
            &spectrum_from(vec![5.0; 100]),
            BaselineMethod::RollingMinimum,
            3,
        )
        .unwrap();
        for y in &corrected.intensities {
            assert_abs_diff_eq!(*y, 0.0);
        }
    }

    #[test]
    fn rolling_median_window_clamps_to_one_for_short_spectra() {
        // len 3 → window 1, the identity filter
        let corrected = correct_baseline(
            &spectrum_from(vec![1.0, 2.0, 3.0]),
            BaselineMethod::RollingMinimum,
            3,
        )
        .unwrap();
        assert_eq!(corrected.intensities, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn rolling_median_passes_a_spike_through() {
        // len 40 derives an even window (2) which is rounded up to 3
        let mut values = vec![10.0; 40];
        values[20] = 100.0;
        let corrected = correct_baseline(
            &spectrum_from(values),
            BaselineMethod::RollingMinimum,
            3,
        )
        .unwrap();
        assert_abs_diff_eq!(corrected.intensities[20], 90.0);
        assert_abs_diff_eq!(corrected.intensities[10], 0.0);
        assert_abs_diff_eq!(corrected.intensities[0], 0.0);
    }

    #[test]
    fn wavelength_axis_is_carried_over_unchanged() {
        let input = spectrum_from(vec![1.0, 4.0, 2.0, 5.0, 3.0]);
        let corrected = correct_baseline(&input, BaselineMethod::Polynomial, 1).unwrap();
        assert_eq!(corrected.wavelengths, input.wavelengths);
        assert_eq!(input.intensities, vec![1.0, 4.0, 2.0, 5.0, 3.0]);
    }

    #[test]
    fn method_names_parse_and_display() {
        assert_eq!(
            "rolling_minimum".parse::<BaselineMethod>().unwrap(),
            BaselineMethod::RollingMinimum
        );
        assert_eq!(BaselineMethod::Polynomial.to_string(), "polynomial");
        assert!(matches!(
            "subtractive".parse::<BaselineMethod>(),
            Err(ProcessingError::InvalidArgument(_))
        ));
    }
}
