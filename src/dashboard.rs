use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::data::model::{Analysis, Confidence};

// ---------------------------------------------------------------------------
// DashboardSnapshot / SessionStats
// ---------------------------------------------------------------------------

/// One published measurement, shared read-only with display surfaces.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub sample_id: String,
    /// Session-scoped measurement id, when a logger assigned one.
    pub measurement_id: Option<u32>,
    pub recorded_at: DateTime<Utc>,
    pub analysis: Arc<Analysis>,
}

/// Running confidence tallies for the current session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub total_measurements: u32,
    pub high_confidence: u32,
    pub medium_confidence: u32,
    pub low_confidence: u32,
}

impl SessionStats {
    fn record(&mut self, confidence: Confidence) {
        self.total_measurements += 1;
        match confidence {
            Confidence::High => self.high_confidence += 1,
            Confidence::Medium => self.medium_confidence += 1,
            Confidence::Low => self.low_confidence += 1,
            Confidence::None => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard – single-writer snapshot store
// ---------------------------------------------------------------------------

/// Latest-measurement store for display surfaces.
///
/// The pipeline owner is the single writer. Readers receive shared
/// snapshot handles and copied tallies; nothing a reader holds can reach
/// back into the pipeline.
#[derive(Debug, Default)]
pub struct Dashboard {
    inner: RwLock<DashboardState>,
}

#[derive(Debug, Default)]
struct DashboardState {
    latest: Option<Arc<DashboardSnapshot>>,
    stats: SessionStats,
}

impl Dashboard {
    /// Publish a measurement, replacing the previous snapshot and updating
    /// the running tallies.
    pub fn publish(&self, snapshot: DashboardSnapshot) {
        if let Ok(mut state) = self.inner.write() {
            state.stats.record(snapshot.analysis.biosignature.confidence);
            state.latest = Some(Arc::new(snapshot));
        }
    }

    /// The most recently published snapshot, if any.
    pub fn latest(&self) -> Option<Arc<DashboardSnapshot>> {
        self.inner.read().ok().and_then(|state| state.latest.clone())
    }

    /// Copy of the running tallies.
    pub fn stats(&self) -> SessionStats {
        self.inner
            .read()
            .map(|state| state.stats)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Frame, WavelengthSpectrum};
    use crate::processing::classify;

    fn analysis_for(peak_wavelengths: &[f64]) -> Arc<Analysis> {
        Arc::new(Analysis {
            frame: Frame::new(2, 1, vec![0, 0]).unwrap(),
            spectrum: WavelengthSpectrum {
                wavelengths: vec![400.0, 401.0],
                intensities: vec![0.0, 0.0],
            },
            peaks: Vec::new(),
            biosignature: classify(peak_wavelengths),
        })
    }

    fn snapshot(sample_id: &str, peak_wavelengths: &[f64]) -> DashboardSnapshot {
        DashboardSnapshot {
            sample_id: sample_id.to_string(),
            measurement_id: None,
            recorded_at: Utc::now(),
            analysis: analysis_for(peak_wavelengths),
        }
    }

    #[test]
    fn an_empty_dashboard_has_no_snapshot_and_zero_stats() {
        let dashboard = Dashboard::default();
        assert!(dashboard.latest().is_none());
        assert_eq!(dashboard.stats(), SessionStats::default());
    }

    #[test]
    fn publishing_replaces_the_snapshot_and_counts_confidences() {
        let dashboard = Dashboard::default();
        dashboard.publish(snapshot("sample_001", &[430.0, 500.0])); // high
        dashboard.publish(snapshot("sample_002", &[540.0])); // low
        dashboard.publish(snapshot("sample_003", &[])); // none

        let latest = dashboard.latest().unwrap();
        assert_eq!(latest.sample_id, "sample_003");

        let stats = dashboard.stats();
        assert_eq!(stats.total_measurements, 3);
        assert_eq!(stats.high_confidence, 1);
        assert_eq!(stats.low_confidence, 1);
        assert_eq!(stats.medium_confidence, 0);
    }

    #[test]
    fn readers_on_other_threads_see_complete_snapshots() {
        let dashboard = Arc::new(Dashboard::default());
        dashboard.publish(snapshot("sample_001", &[500.0, 660.0]));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let dashboard = Arc::clone(&dashboard);
                std::thread::spawn(move || {
                    let snap = dashboard.latest().unwrap();
                    assert_eq!(snap.sample_id, "sample_001");
                    assert_eq!(snap.analysis.biosignature.confidence, Confidence::Medium);
                    dashboard.stats().total_measurements
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
    }
}
