use std::path::Path;

use anyhow::{Context, Result, bail};

use super::model::Frame;

// ---------------------------------------------------------------------------
// Frame loader
// ---------------------------------------------------------------------------

/// Load a detector frame from a headerless CSV of u16 counts, one
/// detector row per line. All rows must hold the same number of columns;
/// the sensor range itself (0–4095 for the 12-bit detector) is not
/// validated here.
pub fn load_frame(path: &Path) -> Result<Frame> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open frame file: {}", path.display()))?;

    let mut data: Vec<u16> = Vec::new();
    let mut width = 0usize;
    let mut height = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Frame row {row_no}"))?;
        if row_no == 0 {
            width = record.len();
        } else if record.len() != width {
            bail!(
                "Frame row {row_no} has {} values, expected {width}",
                record.len()
            );
        }
        for (col, tok) in record.iter().enumerate() {
            let value = tok.trim().parse::<u16>().with_context(|| {
                format!("Frame row {row_no}, column {col}: '{tok}' is not a u16 count")
            })?;
            data.push(value);
        }
        height += 1;
    }

    if height == 0 {
        bail!("Frame file is empty: {}", path.display());
    }

    Ok(Frame::new(width, height, data)?)
}
