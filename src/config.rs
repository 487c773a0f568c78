use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::processing::{BaselineMethod, ExtractionMethod, ProcessingParams};

// ---------------------------------------------------------------------------
// AppConfig – JSON application configuration
// ---------------------------------------------------------------------------

/// Application configuration, read from a JSON file. Missing fields fall
/// back to the field-deployment defaults; unknown fields and unknown enum
/// names are rejected when the file is parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Root directory under which recording sessions are created.
    pub session_root: PathBuf,
    /// Wavelength calibration anchors as `(pixel, wavelength_nm)` pairs.
    pub calibration_anchors: Vec<(usize, f64)>,
    pub extraction: ExtractionMethod,
    pub baseline: BaselineMethod,
    pub baseline_degree: usize,
    pub smoothing_window: usize,
    pub prominence: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            session_root: PathBuf::from("spectroscopy_logs"),
            calibration_anchors: vec![(0, 400.0), (640, 550.0), (1279, 700.0)],
            extraction: ExtractionMethod::Average,
            baseline: BaselineMethod::Polynomial,
            baseline_degree: 3,
            smoothing_window: 11,
            prominence: 100.0,
        }
    }
}

impl AppConfig {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Processing parameters described by this configuration.
    pub fn processing_params(&self) -> ProcessingParams {
        ProcessingParams {
            extraction: self.extraction,
            baseline: self.baseline,
            baseline_degree: self.baseline_degree,
            smoothing_window: self.smoothing_window,
            prominence: self.prominence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_field_deployment() {
        let config = AppConfig::default();
        assert_eq!(config.session_root, PathBuf::from("spectroscopy_logs"));
        assert_eq!(
            config.calibration_anchors,
            vec![(0, 400.0), (640, 550.0), (1279, 700.0)]
        );
        assert_eq!(config.extraction, ExtractionMethod::Average);
        assert_eq!(config.baseline, BaselineMethod::Polynomial);
        assert_eq!(config.baseline_degree, 3);
        assert_eq!(config.smoothing_window, 11);
        assert_eq!(config.prominence, 100.0);
        assert!(config.processing_params().validate().is_ok());
    }

    #[test]
    fn a_partial_file_keeps_the_remaining_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "prominence": 50.0, "extraction": "median" }"#).unwrap();
        assert_eq!(config.prominence, 50.0);
        assert_eq!(config.extraction, ExtractionMethod::Median);
        assert_eq!(config.smoothing_window, 11);
    }

    #[test]
    fn full_roundtrip_preserves_the_configuration() {
        let config = AppConfig::default();
        let text = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<AppConfig>(r#"{ "prominenze": 1.0 }"#).is_err());
    }

    #[test]
    fn unknown_method_names_are_rejected_at_the_boundary() {
        assert!(serde_json::from_str::<AppConfig>(r#"{ "extraction": "bogus" }"#).is_err());
        assert!(serde_json::from_str::<AppConfig>(r#"{ "baseline": "spline" }"#).is_err());
    }

    #[test]
    fn load_reads_a_file_and_reports_missing_ones() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, r#"{{ "smoothing_window": 21 }}"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.smoothing_window, 21);

        assert!(AppConfig::load(&dir.path().join("absent.json")).is_err());
    }
}
