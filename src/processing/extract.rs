use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::model::Frame;
use crate::processing::ProcessingError;

// ---------------------------------------------------------------------------
// ExtractionMethod
// ---------------------------------------------------------------------------

/// How a 2D frame is reduced to one intensity per column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Arithmetic mean of each column.
    Average,
    /// Median of each column, robust to hot pixels.
    Median,
    /// The single row at index `height / 2`.
    CenterRow,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Average => "average",
            ExtractionMethod::Median => "median",
            ExtractionMethod::CenterRow => "center_row",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExtractionMethod {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "average" => Ok(ExtractionMethod::Average),
            "median" => Ok(ExtractionMethod::Median),
            "center_row" => Ok(ExtractionMethod::CenterRow),
            other => Err(ProcessingError::InvalidArgument(format!(
                "unknown extraction method '{other}' (expected average, median, or center_row)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Spectrum extraction
// ---------------------------------------------------------------------------

/// Reduce a frame to one intensity per column. The output length always
/// equals the frame width.
pub fn extract_spectrum(frame: &Frame, method: ExtractionMethod) -> Vec<f64> {
    match method {
        ExtractionMethod::Average => column_means(frame),
        ExtractionMethod::Median => column_medians(frame),
        ExtractionMethod::CenterRow => frame
            .row(frame.height() / 2)
            .iter()
            .map(|&v| v as f64)
            .collect(),
    }
}

fn column_means(frame: &Frame) -> Vec<f64> {
    let mut sums = vec![0.0; frame.width()];
    for row in frame.rows() {
        for (sum, &v) in sums.iter_mut().zip(row) {
            *sum += v as f64;
        }
    }
    let rows = frame.height() as f64;
    sums.into_iter().map(|s| s / rows).collect()
}

fn column_medians(frame: &Frame) -> Vec<f64> {
    let height = frame.height();
    let mut column = vec![0u16; height];
    (0..frame.width())
        .map(|col| {
            for (row, slot) in column.iter_mut().enumerate() {
                *slot = frame.get(row, col);
            }
            column.sort_unstable();
            // An even row count averages the two central order statistics.
            if height % 2 == 1 {
                column[height / 2] as f64
            } else {
                (column[height / 2 - 1] as f64 + column[height / 2] as f64) / 2.0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_frame() -> Frame {
        // 3 columns, 4 rows:
        //   col 0: 1, 2, 3, 10   col 1: 0, 0, 0, 0   col 2: 5, 5, 7, 7
        Frame::new(3, 4, vec![1, 0, 5, 2, 0, 5, 3, 0, 7, 10, 0, 7]).unwrap()
    }

    #[test]
    fn output_length_equals_width_for_every_method() {
        let frame = Frame::new(5, 2, vec![0; 10]).unwrap();
        for method in [
            ExtractionMethod::Average,
            ExtractionMethod::Median,
            ExtractionMethod::CenterRow,
        ] {
            assert_eq!(extract_spectrum(&frame, method).len(), 5);
        }
    }

    #[test]
    fn average_is_the_column_mean() {
        let spectrum = extract_spectrum(&test_frame(), ExtractionMethod::Average);
        assert_eq!(spectrum, vec![4.0, 0.0, 6.0]);
    }

    #[test]
    fn median_averages_central_pair_for_even_heights() {
        let spectrum = extract_spectrum(&test_frame(), ExtractionMethod::Median);
        assert_eq!(spectrum, vec![2.5, 0.0, 6.0]);
    }

    #[test]
    fn median_ignores_a_hot_pixel() {
        let frame = Frame::new(1, 3, vec![10, 4000, 12]).unwrap();
        let spectrum = extract_spectrum(&frame, ExtractionMethod::Median);
        assert_eq!(spectrum, vec![12.0]);
    }

    #[test]
    fn center_row_picks_height_over_two() {
        let spectrum = extract_spectrum(&test_frame(), ExtractionMethod::CenterRow);
        // height 4 → row index 2
        assert_eq!(spectrum, vec![3.0, 0.0, 7.0]);

        let single = Frame::new(2, 1, vec![8, 9]).unwrap();
        assert_eq!(
            extract_spectrum(&single, ExtractionMethod::CenterRow),
            vec![8.0, 9.0]
        );
    }

    #[test]
    fn method_names_parse_and_display() {
        assert_eq!(
            "average".parse::<ExtractionMethod>().unwrap(),
            ExtractionMethod::Average
        );
        assert_eq!(
            "center_row".parse::<ExtractionMethod>().unwrap(),
            ExtractionMethod::CenterRow
        );
        assert_eq!(ExtractionMethod::Median.to_string(), "median");
    }

    #[test]
    fn unknown_method_is_rejected_at_the_parse_boundary() {
        let err = "bogus".parse::<ExtractionMethod>().unwrap_err();
        match err {
            ProcessingError::InvalidArgument(msg) => assert!(msg.contains("bogus")),
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }
}
