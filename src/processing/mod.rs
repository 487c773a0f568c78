/// Processing layer: the frame-to-biosignature pipeline.
///
/// Stage order:
/// ```text
///   Frame (height × width u16)
///        │ extract
///        ▼
///   Vec<f64> raw spectrum (one value per column)
///        │ CalibrationMap::apply
///        ▼
///   WavelengthSpectrum (nm axis)
///        │ correct_baseline
///        ▼
///   WavelengthSpectrum (baseline removed)
///        │ smooth_spectrum (Savitzky–Golay, order 3)
///        ▼
///   WavelengthSpectrum (final)
///        │ find_peaks (topographic prominence)
///        ▼
///   Vec<Peak> → classify → BiosignatureResult
/// ```
pub mod baseline;
pub mod biosignature;
pub mod calibrate;
pub mod extract;
pub mod normalize;
pub mod peaks;
mod polyfit;
pub mod processor;
pub mod smooth;

use thiserror::Error;

pub use baseline::{correct_baseline, BaselineMethod};
pub use biosignature::classify;
pub use calibrate::CalibrationMap;
pub use extract::{extract_spectrum, ExtractionMethod};
pub use normalize::normalize_spectrum;
pub use peaks::find_peaks;
pub use processor::{ProcessingParams, SpectrumProcessor};
pub use smooth::smooth_spectrum;

// ---------------------------------------------------------------------------
// ProcessingError – the pipeline failure taxonomy
// ---------------------------------------------------------------------------

/// Failures that abort a frame's pipeline run. No partial results are
/// produced, logged, or published once one of these is raised.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// An unrecognized selector at a parse boundary (config, CLI).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A numeric setting outside its valid range for the given data.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A malformed calibration anchor set.
    #[error("invalid calibration: {0}")]
    InvalidCalibration(String),

    /// Processing was requested before any calibration was built.
    #[error("no wavelength calibration has been built")]
    NotCalibrated,
}
