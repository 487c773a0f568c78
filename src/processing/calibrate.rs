use crate::data::model::WavelengthSpectrum;
use crate::processing::ProcessingError;

// ---------------------------------------------------------------------------
// CalibrationMap – immutable pixel → wavelength mapping
// ---------------------------------------------------------------------------

/// Piecewise-linear interpolation through calibration anchors, with linear
/// extrapolation along the nearest segment outside the anchor range.
///
/// A map is immutable once built; recalibration replaces the whole value.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationMap {
    pixels: Vec<f64>,
    wavelengths: Vec<f64>,
}

impl CalibrationMap {
    /// Build a map from `(pixel, wavelength_nm)` anchors. At least two
    /// anchors are required and their pixels must be strictly increasing.
    pub fn from_anchors(anchors: &[(usize, f64)]) -> Result<Self, ProcessingError> {
        if anchors.len() < 2 {
            return Err(ProcessingError::InvalidCalibration(format!(
                "requires at least 2 anchors, got {}",
                anchors.len()
            )));
        }
        for pair in anchors.windows(2) {
            if pair[1].0 <= pair[0].0 {
                return Err(ProcessingError::InvalidCalibration(format!(
                    "anchor pixels must be strictly increasing, got {} after {}",
                    pair[1].0, pair[0].0
                )));
            }
        }
        Ok(CalibrationMap {
            pixels: anchors.iter().map(|a| a.0 as f64).collect(),
            wavelengths: anchors.iter().map(|a| a.1).collect(),
        })
    }

    /// Number of anchors the map was built from.
    pub fn anchor_count(&self) -> usize {
        self.pixels.len()
    }

    /// Wavelength at an arbitrary pixel position. Defined everywhere,
    /// including positions outside the anchor range.
    pub fn wavelength_at(&self, pixel: f64) -> f64 {
        let n = self.pixels.len();
        let segment = match self.pixels.partition_point(|&p| p <= pixel) {
            0 => 0,
            k if k >= n => n - 2,
            k => k - 1,
        };
        let (p0, p1) = (self.pixels[segment], self.pixels[segment + 1]);
        let (w0, w1) = (self.wavelengths[segment], self.wavelengths[segment + 1]);
        w0 + (pixel - p0) * (w1 - w0) / (p1 - p0)
    }

    /// Pair every pixel index of `intensities` with its wavelength.
    pub fn apply(&self, intensities: &[f64]) -> WavelengthSpectrum {
        WavelengthSpectrum {
            wavelengths: (0..intensities.len())
                .map(|p| self.wavelength_at(p as f64))
                .collect(),
            intensities: intensities.to_vec(),
        }
    }
}
