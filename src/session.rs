use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::Float64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::Utc;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

use crate::data::model::{Analysis, BiosignatureResult, Confidence, Frame, Peak, WavelengthSpectrum};

// ---------------------------------------------------------------------------
// Session manifest
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct SessionManifest {
    session_id: String,
    start_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_time: Option<String>,
    measurements: Vec<MeasurementRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    notes: Vec<SessionNote>,
}

#[derive(Debug, Serialize)]
struct MeasurementRecord {
    measurement_id: u32,
    sample_id: String,
    timestamp: String,
    peaks_detected: usize,
    peaks: Vec<Peak>,
    biosignature_analysis: BiosignatureResult,
    /// Spectrum archive, relative to the session directory.
    spectrum_file: String,
    /// Raw frame archive, relative to the session directory.
    frame_file: String,
}

#[derive(Debug, Serialize)]
struct SessionNote {
    timestamp: String,
    note: String,
}

// ---------------------------------------------------------------------------
// SessionLogger
// ---------------------------------------------------------------------------

/// Records one measurement session on disk for post-run analysis.
///
/// Layout under the session root:
/// ```text
///   session_<YYYYMMDD_HHMMSS>/
///     session_log.json     durable manifest, rewritten on every change
///     spectra/             processed spectra as two-column Parquet
///     frames/              raw frames as headerless u16 CSV
/// ```
#[derive(Debug)]
pub struct SessionLogger {
    session_dir: PathBuf,
    manifest: SessionManifest,
}

impl SessionLogger {
    /// Start a new session under `root`, creating its directory layout.
    pub fn create(root: &Path) -> Result<Self> {
        let session_id = Utc::now().format("%Y%m%d_%H%M%S").to_string();
        let session_dir = root.join(format!("session_{session_id}"));
        for subdir in ["spectra", "frames"] {
            fs::create_dir_all(session_dir.join(subdir)).with_context(|| {
                format!("Failed to create session directory: {}", session_dir.display())
            })?;
        }
        log::info!("logger initialized: {}", session_dir.display());

        Ok(SessionLogger {
            session_dir,
            manifest: SessionManifest {
                session_id,
                start_time: Utc::now().to_rfc3339(),
                end_time: None,
                measurements: Vec::new(),
                notes: Vec::new(),
            },
        })
    }

    pub fn session_id(&self) -> &str {
        &self.manifest.session_id
    }

    pub fn session_dir(&self) -> &Path {
        &self.session_dir
    }

    pub fn measurement_count(&self) -> usize {
        self.manifest.measurements.len()
    }

    /// Archive one analysis and append its record to the manifest. Returns
    /// the session-scoped measurement id. A missing sample id defaults to
    /// `sample_<id:03>`. Nothing is recorded if any write fails.
    pub fn log_measurement(&mut self, analysis: &Analysis, sample_id: Option<&str>) -> Result<u32> {
        let measurement_id = self.manifest.measurements.len() as u32 + 1;
        let sample_id = match sample_id {
            Some(id) => id.to_string(),
            None => format!("sample_{measurement_id:03}"),
        };

        let spectrum_file = format!("spectra/{sample_id}_spectrum.parquet");
        write_spectrum_parquet(&self.session_dir.join(&spectrum_file), &analysis.spectrum)?;

        let frame_file = format!("frames/{sample_id}_frame.csv");
        write_frame_csv(&self.session_dir.join(&frame_file), &analysis.frame)?;

        self.manifest.measurements.push(MeasurementRecord {
            measurement_id,
            sample_id: sample_id.clone(),
            timestamp: Utc::now().to_rfc3339(),
            peaks_detected: analysis.peaks.len(),
            peaks: analysis.peaks.clone(),
            biosignature_analysis: analysis.biosignature,
            spectrum_file,
            frame_file,
        });
        self.save_manifest()?;

        log::info!("logged measurement {measurement_id}: {sample_id}");
        Ok(measurement_id)
    }

    /// Append a timestamped free-text note.
    pub fn add_note(&mut self, note: &str) -> Result<()> {
        self.manifest.notes.push(SessionNote {
            timestamp: Utc::now().to_rfc3339(),
            note: note.to_string(),
        });
        self.save_manifest()
    }

    /// Stamp the end time and write the manifest one last time. The logger
    /// stays usable afterwards; a later measurement simply re-stamps.
    pub fn end_session(&mut self) -> Result<()> {
        self.manifest.end_time = Some(Utc::now().to_rfc3339());
        self.save_manifest()?;
        log::info!(
            "session ended: {} measurements logged",
            self.manifest.measurements.len()
        );
        Ok(())
    }

    /// Human-readable session summary.
    pub fn summary(&self) -> String {
        let total = self.manifest.measurements.len();
        if total == 0 {
            return "No measurements recorded".to_string();
        }
        let count = |confidence: Confidence| {
            self.manifest
                .measurements
                .iter()
                .filter(|m| m.biosignature_analysis.confidence == confidence)
                .count()
        };
        format!(
            "Session Summary:\n\
             - Total measurements: {total}\n\
             - High confidence biosignatures: {}\n\
             - Medium confidence biosignatures: {}\n\
             - Session ID: {}\n\
             - Log directory: {}",
            count(Confidence::High),
            count(Confidence::Medium),
            self.manifest.session_id,
            self.session_dir.display()
        )
    }

    fn save_manifest(&self) -> Result<()> {
        let path = self.session_dir.join("session_log.json");
        let text = serde_json::to_string_pretty(&self.manifest)
            .context("serializing session manifest")?;
        fs::write(&path, text)
            .with_context(|| format!("Failed to write session manifest: {}", path.display()))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Archive writers
// ---------------------------------------------------------------------------

/// Two plain Float64 columns, `wavelength` and `intensity`, one row per
/// spectral sample.
fn write_spectrum_parquet(path: &Path, spectrum: &WavelengthSpectrum) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("wavelength", DataType::Float64, false),
        Field::new("intensity", DataType::Float64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(spectrum.wavelengths.clone())),
            Arc::new(Float64Array::from(spectrum.intensities.clone())),
        ],
    )
    .context("building spectrum record batch")?;

    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create spectrum file: {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing spectrum batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

/// Headerless CSV of u16 counts, matching the loader's frame format.
fn write_frame_csv(path: &Path, frame: &Frame) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create frame file: {}", path.display()))?;
    for row in frame.rows() {
        writer
            .write_record(row.iter().map(|v| v.to_string()))
            .context("writing frame row")?;
    }
    writer.flush().context("flushing frame file")?;
    Ok(())
}
