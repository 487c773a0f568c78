use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::config::AppConfig;
use crate::dashboard::{Dashboard, DashboardSnapshot, SessionStats};
use crate::data::model::{Analysis, Frame};
use crate::processing::{CalibrationMap, SpectrumProcessor};
use crate::session::SessionLogger;

// ---------------------------------------------------------------------------
// SpectrometerApp – processor + logger + dashboard wiring
// ---------------------------------------------------------------------------

/// The headless application: one processor, an optional session logger and
/// the dashboard store display surfaces read from.
pub struct SpectrometerApp {
    processor: SpectrumProcessor,
    logger: Option<SessionLogger>,
    dashboard: Arc<Dashboard>,
}

impl SpectrometerApp {
    /// Wire the application from a configuration. Parameter and calibration
    /// problems surface here, before any frame is touched.
    pub fn new(config: &AppConfig, enable_logging: bool) -> Result<Self> {
        let params = config.processing_params();
        params.validate().context("validating processing parameters")?;

        let mut processor = SpectrumProcessor::new(params);
        let map = CalibrationMap::from_anchors(&config.calibration_anchors)
            .context("building wavelength calibration")?;
        processor.set_calibration(map);

        let logger = if enable_logging {
            Some(SessionLogger::create(&config.session_root)?)
        } else {
            None
        };

        log::info!(
            "spectrometer initialized (logging {})",
            if logger.is_some() { "on" } else { "off" }
        );
        Ok(SpectrometerApp {
            processor,
            logger,
            dashboard: Arc::new(Dashboard::default()),
        })
    }

    /// Shared handle for display surfaces.
    pub fn dashboard(&self) -> Arc<Dashboard> {
        Arc::clone(&self.dashboard)
    }

    pub fn session_logger(&self) -> Option<&SessionLogger> {
        self.logger.as_ref()
    }

    /// Run the pipeline on one frame, archive the measurement, then publish
    /// it. Any failure aborts before anything is logged or published.
    pub fn analyze_sample(&mut self, frame: Frame, sample_id: &str) -> Result<Arc<Analysis>> {
        log::info!("analyzing {sample_id}");
        let analysis = Arc::new(
            self.processor
                .process(frame)
                .with_context(|| format!("processing {sample_id}"))?,
        );

        let measurement_id = match &mut self.logger {
            Some(logger) => Some(logger.log_measurement(&analysis, Some(sample_id))?),
            None => None,
        };

        self.dashboard.publish(DashboardSnapshot {
            sample_id: sample_id.to_string(),
            measurement_id,
            recorded_at: Utc::now(),
            analysis: Arc::clone(&analysis),
        });

        Ok(analysis)
    }

    /// Running confidence tallies for this session.
    pub fn session_stats(&self) -> SessionStats {
        self.dashboard.stats()
    }

    /// Stamp the session end in the manifest, if logging is on.
    pub fn end_session(&mut self) -> Result<()> {
        if let Some(logger) = &mut self.logger {
            logger.end_session()?;
        }
        Ok(())
    }
}
