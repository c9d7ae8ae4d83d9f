// Error types for the feature extraction pipeline
//
// One enum covers the whole pipeline: dataset loading, windowing parameters,
// label resolution, and the feature-vector length contract. Variants carry
// the context a caller needs to report the failure (line numbers, expected
// vs. actual counts) without re-reading the input.

use std::fmt;
use std::io;

/// Errors produced while loading data or running the extraction pipeline.
///
/// Loading errors are fail-fast: the first malformed row aborts the run for
/// that file (there is no partial recovery).
#[derive(Debug)]
pub enum PipelineError {
    /// A CSV row could not be parsed as numeric data.
    MalformedRow { line: usize, reason: String },

    /// A CSV row had a different number of columns than the first row.
    ColumnCountMismatch {
        line: usize,
        expected: usize,
        actual: usize,
    },

    /// The input contained no usable rows.
    EmptyInput { source: String },

    /// `window_size` and `step_size` must both be greater than zero.
    InvalidWindowParams {
        window_size: usize,
        step_size: usize,
    },

    /// The configured label offset does not fall inside the window.
    LabelOffsetOutOfRange { offset: usize, window_size: usize },

    /// A window contained more than one distinct label under the
    /// require-uniform policy.
    LabelConflict { window_start: usize },

    /// An extracted feature vector did not have the statically expected
    /// length. This is a configuration mismatch, never silently accepted.
    FeatureLengthMismatch { expected: usize, actual: usize },

    /// Orientation normalization requires exactly three axes.
    AxisCountUnsupported { expected: usize, actual: usize },

    /// The gravity smoothing constant must lie in `[0, 1)`.
    InvalidSmoothing { smoothing: f64 },

    /// Mismatched timestamp/sample/label lengths when assembling a stream.
    LengthMismatch {
        timestamps: usize,
        samples: usize,
        labels: usize,
    },

    /// Underlying I/O failure.
    Io(io::Error),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::MalformedRow { line, reason } => {
                write!(f, "malformed row at line {}: {}", line, reason)
            }
            PipelineError::ColumnCountMismatch {
                line,
                expected,
                actual,
            } => write!(
                f,
                "line {}: expected {} columns, found {}",
                line, expected, actual
            ),
            PipelineError::EmptyInput { source } => {
                write!(f, "no usable rows in {}", source)
            }
            PipelineError::InvalidWindowParams {
                window_size,
                step_size,
            } => write!(
                f,
                "window_size and step_size must be > 0 (got window_size={}, step_size={})",
                window_size, step_size
            ),
            PipelineError::LabelOffsetOutOfRange {
                offset,
                window_size,
            } => write!(
                f,
                "label offset {} is outside a window of {} samples",
                offset, window_size
            ),
            PipelineError::LabelConflict { window_start } => write!(
                f,
                "window starting at sample {} contains more than one label",
                window_start
            ),
            PipelineError::FeatureLengthMismatch { expected, actual } => write!(
                f,
                "received feature vector of length {}, expected length {}",
                actual, expected
            ),
            PipelineError::AxisCountUnsupported { expected, actual } => write!(
                f,
                "orientation normalization needs {} axes, stream has {}",
                expected, actual
            ),
            PipelineError::InvalidSmoothing { smoothing } => write!(
                f,
                "gravity smoothing constant must be in [0, 1), got {}",
                smoothing
            ),
            PipelineError::LengthMismatch {
                timestamps,
                samples,
                labels,
            } => write!(
                f,
                "stream parts disagree: {} timestamps, {} sample rows, {} labels",
                timestamps, samples, labels
            ),
            PipelineError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for PipelineError {
    fn from(err: io::Error) -> Self {
        PipelineError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_row_mentions_line_number() {
        let err = PipelineError::MalformedRow {
            line: 42,
            reason: "invalid float literal".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 42"), "got: {}", msg);
    }

    #[test]
    fn feature_length_mismatch_reports_both_lengths() {
        let err = PipelineError::FeatureLengthMismatch {
            expected: 25,
            actual: 19,
        };
        let msg = err.to_string();
        assert!(msg.contains("25"));
        assert!(msg.contains("19"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing file");
        let err: PipelineError = io_err.into();
        assert!(matches!(err, PipelineError::Io(_)));
        assert!(err.to_string().contains("missing file"));
    }
}
