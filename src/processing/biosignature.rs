use crate::data::model::{BiosignatureResult, Confidence};

// ---------------------------------------------------------------------------
// Biosignature windows (nm, exclusive bounds)
// ---------------------------------------------------------------------------

/// Chlorophyll absorption edges.
pub const CHLOROPHYLL_WINDOWS: [(f64, f64); 2] = [(425.0, 435.0), (655.0, 665.0)];
/// Carotenoid pigments.
pub const CAROTENOID_WINDOW: (f64, f64) = (450.0, 550.0);
/// General organic compounds. Overlaps the lower chlorophyll window, so a
/// single peak can raise both flags.
pub const ORGANICS_WINDOW: (f64, f64) = (400.0, 450.0);

fn within(wavelength: f64, window: (f64, f64)) -> bool {
    window.0 < wavelength && wavelength < window.1
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Match peak wavelengths against the indicator windows and grade the
/// number of matched indicators into a confidence level. Pure and
/// order-independent; window bounds are strictly exclusive.
pub fn classify(peak_wavelengths: &[f64]) -> BiosignatureResult {
    let chlorophyll = peak_wavelengths
        .iter()
        .any(|&w| CHLOROPHYLL_WINDOWS.iter().any(|&win| within(w, win)));
    let carotenoids = peak_wavelengths
        .iter()
        .any(|&w| within(w, CAROTENOID_WINDOW));
    let organics = peak_wavelengths
        .iter()
        .any(|&w| within(w, ORGANICS_WINDOW));

    let indicators = [chlorophyll, carotenoids, organics]
        .iter()
        .filter(|m| **m)
        .count();
    let confidence = match indicators {
        0 => Confidence::None,
        1 => Confidence::Low,
        2 => Confidence::Medium,
        _ => Confidence::High,
    };

    BiosignatureResult {
        chlorophyll,
        carotenoids,
        organics,
        confidence,
        interpretation: confidence.interpretation(),
    }
}
