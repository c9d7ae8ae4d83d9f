// Export - feature matrix CSV and run summary JSON
//
// The CSV layout is one header row (feature names plus a trailing `label`
// column) followed by one row per window. Downstream trainers consume it
// directly, so the column order is exactly the extractor's output order.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::PipelineError;
use crate::pipeline::FeatureMatrix;

/// Write the feature matrix as CSV to any writer.
pub fn write_feature_csv<W: Write>(matrix: &FeatureMatrix, writer: &mut W) -> std::io::Result<()> {
    for name in matrix.names() {
        write!(writer, "{},", name)?;
    }
    writeln!(writer, "label")?;

    for (row, label) in matrix.features().rows().into_iter().zip(matrix.labels()) {
        for value in row {
            write!(writer, "{},", value)?;
        }
        writeln!(writer, "{}", label)?;
    }
    writer.flush()
}

/// Write the feature matrix as CSV to a file path.
pub fn write_feature_csv_path<P: AsRef<Path>>(
    matrix: &FeatureMatrix,
    path: P,
) -> Result<(), PipelineError> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_feature_csv(matrix, &mut writer)?;
    tracing::info!(
        "Wrote {} feature rows to {}",
        matrix.n_windows(),
        path.as_ref().display()
    );
    Ok(())
}

/// Summary of one extraction run, serialized as JSON for tooling.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub windows: usize,
    pub features: usize,
    pub unique_labels: Vec<i64>,
    pub feature_names: Vec<String>,
}

impl RunSummary {
    pub fn from_matrix(matrix: &FeatureMatrix) -> Self {
        Self {
            windows: matrix.n_windows(),
            features: matrix.n_features(),
            unique_labels: matrix.unique_labels(),
            feature_names: matrix.names().to_vec(),
        }
    }
}

/// Write the run summary as pretty-printed JSON.
pub fn write_summary_json<W: Write>(summary: &RunSummary, writer: &mut W) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::dataset::SensorStream;
    use crate::pipeline::StreamProcessor;
    use ndarray::Array2;

    fn small_matrix() -> FeatureMatrix {
        let n = 40;
        let timestamps: Vec<f64> = (0..n).map(|i| i as f64 * 40.0).collect();
        let samples = Array2::from_shape_fn((n, 3), |(i, j)| (i * 3 + j) as f64 * 0.1);
        let labels = vec![2i64; n];
        let stream = SensorStream::new(timestamps, samples, labels).unwrap();
        let mut config = PipelineConfig::default();
        config.orientation.enabled = false;
        StreamProcessor::new(config).process_stream(&stream).unwrap()
    }

    #[test]
    fn csv_header_ends_with_label() {
        let matrix = small_matrix();
        let mut sink = Vec::new();
        write_feature_csv(&matrix, &mut sink).unwrap();
        let text = String::from_utf8(sink).unwrap();
        let header = text.lines().next().unwrap();

        assert!(header.starts_with("mean x,"));
        assert!(header.ends_with("entropy,label"));
        assert_eq!(header.split(',').count(), 26);
    }

    #[test]
    fn csv_has_one_row_per_window() {
        let matrix = small_matrix();
        let mut sink = Vec::new();
        write_feature_csv(&matrix, &mut sink).unwrap();
        let text = String::from_utf8(sink).unwrap();

        let rows: Vec<&str> = text.lines().skip(1).collect();
        assert_eq!(rows.len(), matrix.n_windows());
        for row in rows {
            assert_eq!(row.split(',').count(), 26);
            assert!(row.ends_with(",2"));
        }
    }

    #[test]
    fn summary_reflects_matrix_shape() {
        let matrix = small_matrix();
        let summary = RunSummary::from_matrix(&matrix);
        assert_eq!(summary.windows, 2);
        assert_eq!(summary.features, 25);
        assert_eq!(summary.unique_labels, vec![2]);

        let mut sink = Vec::new();
        write_summary_json(&summary, &mut sink).unwrap();
        let text = String::from_utf8(sink).unwrap();
        assert!(text.contains("\"windows\": 2"));
        assert!(text.contains("\"entropy\""));
    }
}
