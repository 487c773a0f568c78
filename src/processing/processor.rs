use std::sync::Arc;

use crate::data::model::{Analysis, Frame, WavelengthSpectrum};
use crate::processing::{
    baseline, biosignature, extract, peaks, smooth, BaselineMethod, CalibrationMap,
    ExtractionMethod, ProcessingError,
};

// ---------------------------------------------------------------------------
// ProcessingParams
// ---------------------------------------------------------------------------

/// Tunable pipeline settings. The defaults mirror the field configuration
/// the instrument ships with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessingParams {
    pub extraction: ExtractionMethod,
    pub baseline: BaselineMethod,
    pub baseline_degree: usize,
    pub smoothing_window: usize,
    pub prominence: f64,
}

impl Default for ProcessingParams {
    fn default() -> Self {
        ProcessingParams {
            extraction: ExtractionMethod::Average,
            baseline: BaselineMethod::Polynomial,
            baseline_degree: 3,
            smoothing_window: 11,
            prominence: 100.0,
        }
    }
}

impl ProcessingParams {
    /// Check everything that does not depend on the frame size, so bad
    /// settings surface at startup instead of on the first frame.
    pub fn validate(&self) -> Result<(), ProcessingError> {
        if self.smoothing_window % 2 == 0 {
            return Err(ProcessingError::InvalidParameter(format!(
                "smoothing window must be odd, got {}",
                self.smoothing_window
            )));
        }
        if self.smoothing_window <= 3 {
            return Err(ProcessingError::InvalidParameter(format!(
                "smoothing window {} must exceed the polynomial order 3",
                self.smoothing_window
            )));
        }
        if !self.prominence.is_finite() {
            return Err(ProcessingError::InvalidParameter(
                "prominence threshold must be finite".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SpectrumProcessor
// ---------------------------------------------------------------------------

/// Owns the pipeline settings and the current calibration.
///
/// Every stage is a pure function of its inputs, so one processor can serve
/// any number of frames concurrently; `process` takes `&self`. The
/// calibration is an immutable value behind an `Arc`: `set_calibration`
/// swaps the whole map, and pipelines already running keep the map they
/// started with.
#[derive(Debug, Clone, Default)]
pub struct SpectrumProcessor {
    params: ProcessingParams,
    calibration: Option<Arc<CalibrationMap>>,
}

impl SpectrumProcessor {
    pub fn new(params: ProcessingParams) -> Self {
        SpectrumProcessor {
            params,
            calibration: None,
        }
    }

    /// Install a new calibration, replacing any previous map as a whole.
    pub fn set_calibration(&mut self, map: CalibrationMap) {
        self.calibration = Some(Arc::new(map));
    }

    /// Shared handle to the current calibration, if one has been built.
    pub fn calibration(&self) -> Option<Arc<CalibrationMap>> {
        self.calibration.clone()
    }

    pub fn params(&self) -> &ProcessingParams {
        &self.params
    }

    /// Run the full pipeline on one frame: extract, calibrate, correct the
    /// baseline, smooth, find peaks, classify. The frame moves in and comes
    /// back out inside the bundle; an error leaves no partial output.
    pub fn process(&self, frame: Frame) -> Result<Analysis, ProcessingError> {
        let map = self
            .calibration
            .as_ref()
            .ok_or(ProcessingError::NotCalibrated)?;

        let raw = extract::extract_spectrum(&frame, self.params.extraction);
        let calibrated = map.apply(&raw);
        let corrected = baseline::correct_baseline(
            &calibrated,
            self.params.baseline,
            self.params.baseline_degree,
        )?;
        let smoothed =
            smooth::smooth_spectrum(&corrected.intensities, self.params.smoothing_window)?;
        let spectrum = WavelengthSpectrum {
            wavelengths: corrected.wavelengths,
            intensities: smoothed,
        };

        let peaks = peaks::find_peaks(&spectrum, self.params.prominence);
        let peak_wavelengths: Vec<f64> = peaks.iter().map(|p| p.wavelength).collect();
        let biosignature = biosignature::classify(&peak_wavelengths);

        Ok(Analysis {
            frame,
            spectrum,
            peaks,
            biosignature,
        })
    }
}
