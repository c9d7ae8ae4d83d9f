// Dataset loading - CSV input for the extraction pipeline
//
// Two on-disk formats are supported, matching the collection tools that
// produce them:
//
// 1. Sample streams: one sensor sample per row
//    (`timestamp,axis0,...,axisN,label`), no header. Windowing happens
//    downstream.
// 2. Pre-windowed rows: one complete window per row
//    (`timestamp,value0,...,valueN,label`), as written by the audio
//    recorder. Each row becomes a single-axis window directly.
//
// Loading is fail-fast: the first malformed row aborts with its line number.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ndarray::{Array2, ArrayView2};

use crate::error::PipelineError;

/// Number of leading samples used to estimate the sampling rate.
const SAMPLING_RATE_PROBE: usize = 1000;

/// An ordered, timestamp-ascending sequence of labelled sensor samples.
///
/// The axis count is fixed for the life of the stream; timestamps are in
/// milliseconds. Samples are read-only once loaded.
#[derive(Debug, Clone)]
pub struct SensorStream {
    timestamps: Vec<f64>,
    samples: Array2<f64>,
    labels: Vec<i64>,
}

impl SensorStream {
    /// Assemble a stream from its parts, enforcing equal lengths.
    pub fn new(
        timestamps: Vec<f64>,
        samples: Array2<f64>,
        labels: Vec<i64>,
    ) -> Result<Self, PipelineError> {
        if timestamps.len() != samples.nrows() || labels.len() != samples.nrows() {
            return Err(PipelineError::LengthMismatch {
                timestamps: timestamps.len(),
                samples: samples.nrows(),
                labels: labels.len(),
            });
        }
        Ok(Self {
            timestamps,
            samples,
            labels,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of sensor axes (columns, excluding timestamp and label).
    pub fn n_axes(&self) -> usize {
        self.samples.ncols()
    }

    pub fn samples(&self) -> ArrayView2<'_, f64> {
        self.samples.view()
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    /// Replace the sample matrix, keeping timestamps and labels.
    ///
    /// Used after orientation normalization, which rewrites axis values but
    /// leaves the row structure untouched.
    pub fn with_samples(&self, samples: Array2<f64>) -> Result<Self, PipelineError> {
        Self::new(self.timestamps.clone(), samples, self.labels.clone())
    }

    /// Estimate the sampling rate in Hz from the first ~1000 timestamps.
    ///
    /// Returns `None` when the stream is too short or timestamps do not
    /// advance.
    pub fn estimated_sampling_rate(&self) -> Option<f64> {
        let n = SAMPLING_RATE_PROBE.min(self.len().saturating_sub(1));
        if n == 0 {
            return None;
        }
        let elapsed_seconds = (self.timestamps[n] - self.timestamps[0]) / 1000.0;
        if elapsed_seconds <= 0.0 {
            return None;
        }
        Some(n as f64 / elapsed_seconds)
    }
}

/// A set of already-windowed observations (one window per CSV row).
///
/// All windows share the same length; each is an N×1 matrix so the feature
/// extractor sees the same shape it gets from the windower.
#[derive(Debug, Clone, Default)]
pub struct WindowedDataset {
    pub windows: Vec<Array2<f64>>,
    pub labels: Vec<i64>,
    /// Class names discovered from file names, in discovery order. Empty
    /// when the dataset came from a single file.
    pub class_names: Vec<String>,
}

impl WindowedDataset {
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

/// Load a labelled sample stream from a CSV file.
pub fn load_stream<P: AsRef<Path>>(path: P) -> Result<SensorStream, PipelineError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read_stream(BufReader::new(file), &path.display().to_string())
}

/// Parse a labelled sample stream from any buffered reader.
pub fn read_stream<R: BufRead>(reader: R, source: &str) -> Result<SensorStream, PipelineError> {
    let mut timestamps = Vec::new();
    let mut labels = Vec::new();
    let mut flat = Vec::new();
    let mut n_axes = None;
    let mut rows = 0usize;

    for (line_no, row) in parse_rows(reader)? {
        let axes = row.values.len();
        match n_axes {
            None => {
                if axes == 0 {
                    return Err(PipelineError::MalformedRow {
                        line: line_no,
                        reason: "row has no axis columns between timestamp and label".to_string(),
                    });
                }
                n_axes = Some(axes);
            }
            Some(expected) if expected != axes => {
                return Err(PipelineError::ColumnCountMismatch {
                    line: line_no,
                    expected: expected + 2,
                    actual: axes + 2,
                });
            }
            Some(_) => {}
        }
        timestamps.push(row.timestamp);
        labels.push(row.label);
        flat.extend_from_slice(&row.values);
        rows += 1;
    }

    let n_axes = n_axes.ok_or_else(|| PipelineError::EmptyInput {
        source: source.to_string(),
    })?;
    let samples = Array2::from_shape_vec((rows, n_axes), flat).map_err(|_| {
        PipelineError::LengthMismatch {
            timestamps: timestamps.len(),
            samples: rows,
            labels: labels.len(),
        }
    })?;

    let stream = SensorStream::new(timestamps, samples, labels)?;
    log::info!(
        "Loaded {} raw labelled samples ({} axes) from {}",
        stream.len(),
        stream.n_axes(),
        source
    );
    Ok(stream)
}

/// Load pre-windowed rows (one window per row) from a CSV file.
pub fn load_window_rows<P: AsRef<Path>>(path: P) -> Result<WindowedDataset, PipelineError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read_window_rows(BufReader::new(file), &path.display().to_string())
}

/// Parse pre-windowed rows from any buffered reader.
pub fn read_window_rows<R: BufRead>(
    reader: R,
    source: &str,
) -> Result<WindowedDataset, PipelineError> {
    let mut dataset = WindowedDataset::default();
    let mut width = None;

    for (line_no, row) in parse_rows(reader)? {
        let n = row.values.len();
        match width {
            None => {
                if n == 0 {
                    return Err(PipelineError::MalformedRow {
                        line: line_no,
                        reason: "row has no values between timestamp and label".to_string(),
                    });
                }
                width = Some(n);
            }
            Some(expected) if expected != n => {
                return Err(PipelineError::ColumnCountMismatch {
                    line: line_no,
                    expected: expected + 2,
                    actual: n + 2,
                });
            }
            Some(_) => {}
        }
        let window = Array2::from_shape_vec((n, 1), row.values).map_err(|_| {
            PipelineError::MalformedRow {
                line: line_no,
                reason: "could not shape row into a window".to_string(),
            }
        })?;
        dataset.windows.push(window);
        dataset.labels.push(row.label);
    }

    if dataset.is_empty() {
        return Err(PipelineError::EmptyInput {
            source: source.to_string(),
        });
    }
    log::info!(
        "Loaded {} pre-windowed rows of {} values from {}",
        dataset.len(),
        width.unwrap_or(0),
        source
    );
    Ok(dataset)
}

/// Load every `speaker-data-<name>-*.csv` file under a directory.
///
/// Class names are collected from the file names in sorted file order;
/// labels come from the rows themselves, as written by the recorder.
pub fn load_speaker_dir<P: AsRef<Path>>(dir: P) -> Result<WindowedDataset, PipelineError> {
    let dir = dir.as_ref();
    let mut dataset = WindowedDataset::default();

    let mut entries: Vec<_> = std::fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    entries.sort();

    for path in entries {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };
        if !name.starts_with("speaker-data") || !name.ends_with(".csv") {
            continue;
        }
        if let Some(speaker) = name.split('-').nth(2) {
            if !dataset.class_names.iter().any(|c| c == speaker) {
                dataset.class_names.push(speaker.to_string());
            }
            log::info!("Loading data for {}", speaker);
        }
        let part = load_window_rows(&path)?;
        dataset.windows.extend(part.windows);
        dataset.labels.extend(part.labels);
    }

    if dataset.is_empty() {
        return Err(PipelineError::EmptyInput {
            source: dir.display().to_string(),
        });
    }
    log::info!(
        "Found data for {} speakers: {}",
        dataset.class_names.len(),
        dataset.class_names.join(", ")
    );
    Ok(dataset)
}

struct ParsedRow {
    timestamp: f64,
    values: Vec<f64>,
    label: i64,
}

/// Parse `timestamp,value...,label` rows, skipping blank lines.
///
/// Returns 1-based line numbers alongside each parsed row so errors point
/// at the offending input line.
fn parse_rows<R: BufRead>(reader: R) -> Result<Vec<(usize, ParsedRow)>, PipelineError> {
    let mut rows = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let fields: Vec<&str> = text.split(',').collect();
        if fields.len() < 3 {
            return Err(PipelineError::MalformedRow {
                line: line_no,
                reason: format!(
                    "expected at least 3 comma-separated columns, found {}",
                    fields.len()
                ),
            });
        }

        let mut numbers = Vec::with_capacity(fields.len());
        for field in &fields {
            let value: f64 = field.trim().parse().map_err(|_| PipelineError::MalformedRow {
                line: line_no,
                reason: format!("non-numeric field {:?}", field.trim()),
            })?;
            numbers.push(value);
        }

        let timestamp = numbers[0];
        // Recorders write labels as floats ("1.0"); truncate to the integer class.
        let label = numbers[numbers.len() - 1] as i64;
        let values = numbers[1..numbers.len() - 1].to_vec();

        rows.push((
            line_no,
            ParsedRow {
                timestamp,
                values,
                label,
            },
        ));
    }

    Ok(rows)
}
