use crate::data::model::{Peak, WavelengthSpectrum};

// ---------------------------------------------------------------------------
// Prominence-based peak detection
// ---------------------------------------------------------------------------

/// Detect strict local maxima (greater than both immediate neighbors;
/// plateau samples are never candidates) and keep those whose topographic
/// prominence reaches the threshold. Results are ordered by ascending
/// pixel index. An empty result is normal, not an error.
pub fn find_peaks(spectrum: &WavelengthSpectrum, prominence_threshold: f64) -> Vec<Peak> {
    let y = &spectrum.intensities;
    let n = y.len();
    let mut peaks = Vec::new();
    if n < 3 {
        return peaks;
    }
    for i in 1..n - 1 {
        if !(y[i] > y[i - 1] && y[i] > y[i + 1]) {
            continue;
        }
        let prominence = prominence_of(y, i);
        if prominence >= prominence_threshold {
            peaks.push(Peak {
                wavelength: spectrum.wavelengths[i],
                intensity: y[i],
                prominence,
            });
        }
    }
    peaks
}

/// Topographic prominence of the sample at `peak`: walk outward on each
/// side until a strictly higher sample or the signal edge, take the
/// minimum seen on each side, and subtract the larger of the two minima
/// from the peak height.
fn prominence_of(y: &[f64], peak: usize) -> f64 {
    let height = y[peak];

    let mut left_min = height;
    let mut j = peak;
    while j > 0 && y[j - 1] <= height {
        j -= 1;
        if y[j] < left_min {
            left_min = y[j];
        }
    }

    let mut right_min = height;
    let mut j = peak;
    while j + 1 < y.len() && y[j + 1] <= height {
        j += 1;
        if y[j] < right_min {
            right_min = y[j];
        }
    }

    height - left_min.max(right_min)
}
