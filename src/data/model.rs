use std::fmt;

use serde::Serialize;

use crate::processing::ProcessingError;

// ---------------------------------------------------------------------------
// Frame – one raw detector acquisition
// ---------------------------------------------------------------------------

/// A single 2D detector frame of unsigned 16-bit counts, row-major.
/// The spectral axis runs along columns, the spatial axis along rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    data: Vec<u16>,
}

impl Frame {
    /// Build a frame, validating the shape against the backing buffer.
    pub fn new(width: usize, height: usize, data: Vec<u16>) -> Result<Self, ProcessingError> {
        if width == 0 || height == 0 {
            return Err(ProcessingError::InvalidParameter(format!(
                "frame dimensions must be non-zero, got {width}x{height}"
            )));
        }
        if data.len() != width * height {
            return Err(ProcessingError::InvalidParameter(format!(
                "frame buffer holds {} values, expected {} for {width}x{height}",
                data.len(),
                width * height
            )));
        }
        Ok(Frame {
            width,
            height,
            data,
        })
    }

    /// Number of columns (spectral pixels).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Count at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> u16 {
        self.data[row * self.width + col]
    }

    /// One detector row as a slice.
    pub fn row(&self, row: usize) -> &[u16] {
        let start = row * self.width;
        &self.data[start..start + self.width]
    }

    /// Iterate over all rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u16]> {
        self.data.chunks_exact(self.width)
    }
}

// ---------------------------------------------------------------------------
// WavelengthSpectrum – a calibrated 1D spectrum
// ---------------------------------------------------------------------------

/// A 1D spectrum with a physical wavelength axis.
#[derive(Debug, Clone, PartialEq)]
pub struct WavelengthSpectrum {
    /// Wavelength axis in nm – same length as `intensities`.
    pub wavelengths: Vec<f64>,
    /// Intensity axis in detector counts.
    pub intensities: Vec<f64>,
}

impl WavelengthSpectrum {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.intensities.len()
    }

    /// Whether the spectrum holds no samples.
    pub fn is_empty(&self) -> bool {
        self.intensities.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Peak – one detected emission peak
// ---------------------------------------------------------------------------

/// A detected peak, ordered by pixel position within its spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Peak {
    /// Calibrated wavelength in nm.
    pub wavelength: f64,
    /// Smoothed intensity at the peak sample.
    pub intensity: f64,
    /// Topographic prominence above the surrounding signal.
    pub prominence: f64,
}

// ---------------------------------------------------------------------------
// Confidence / BiosignatureResult – classification output
// ---------------------------------------------------------------------------

/// Confidence grade derived from the number of matched indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    None,
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Fixed operator-facing interpretation for this grade.
    pub fn interpretation(&self) -> &'static str {
        match self {
            Confidence::None => "No biosignatures detected",
            Confidence::Low => "Weak biosignature detected",
            Confidence::Medium => "Multiple biosignatures detected",
            Confidence::High => "Strong biosignature pattern detected",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::None => "none",
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of matching a peak set against the biosignature windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BiosignatureResult {
    /// 425–435 nm or 655–665 nm absorption-edge match.
    pub chlorophyll: bool,
    /// 450–550 nm match.
    pub carotenoids: bool,
    /// 400–450 nm match.
    pub organics: bool,
    pub confidence: Confidence,
    pub interpretation: &'static str,
}

impl BiosignatureResult {
    /// Number of distinct indicators matched (0–3).
    pub fn indicator_count(&self) -> usize {
        [self.chlorophyll, self.carotenoids, self.organics]
            .iter()
            .filter(|m| **m)
            .count()
    }
}

// ---------------------------------------------------------------------------
// Analysis – the bundled result of one pipeline invocation
// ---------------------------------------------------------------------------

/// Everything produced from a single frame: the frame itself, the final
/// processed spectrum, the detected peaks and their classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub frame: Frame,
    pub spectrum: WavelengthSpectrum,
    pub peaks: Vec<Peak>,
    pub biosignature: BiosignatureResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_shape_validation() {
        assert!(Frame::new(4, 3, vec![0; 12]).is_ok());
        assert!(matches!(
            Frame::new(4, 3, vec![0; 11]),
            Err(ProcessingError::InvalidParameter(_))
        ));
        assert!(matches!(
            Frame::new(0, 3, vec![]),
            Err(ProcessingError::InvalidParameter(_))
        ));
        assert!(matches!(
            Frame::new(4, 0, vec![]),
            Err(ProcessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn frame_indexing_is_row_major() {
        let frame = Frame::new(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(frame.get(0, 0), 1);
        assert_eq!(frame.get(0, 2), 3);
        assert_eq!(frame.get(1, 0), 4);
        assert_eq!(frame.row(1), &[4, 5, 6]);
        assert_eq!(frame.rows().count(), 2);
    }

    #[test]
    fn confidence_interpretations_are_fixed() {
        assert_eq!(Confidence::None.interpretation(), "No biosignatures detected");
        assert_eq!(Confidence::Low.interpretation(), "Weak biosignature detected");
        assert_eq!(
            Confidence::Medium.interpretation(),
            "Multiple biosignatures detected"
        );
        assert_eq!(
            Confidence::High.interpretation(),
            "Strong biosignature pattern detected"
        );
        assert_eq!(Confidence::Medium.to_string(), "medium");
    }
}
