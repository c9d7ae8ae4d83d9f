// Pipeline module - orientation, windowing, and feature extraction
//
// This module wires the three stages into one batch pass:
//
//   raw samples -> OrientationNormalizer -> SlidingWindows -> FeatureExtractor
//
// The output is a feature matrix (rows = windows, columns = features in the
// documented order) paired with one label per row, ready for an external
// classifier trainer. Everything runs synchronously to completion; the only
// mutable state is the per-stream gravity estimate, which the processor
// creates fresh for every stream so recordings can never contaminate each
// other.

pub mod features;
pub mod orientation;
pub mod window;

use std::collections::BTreeSet;

use ndarray::{Array2, ArrayView2};

use crate::config::PipelineConfig;
use crate::dataset::{SensorStream, WindowedDataset};
use crate::error::PipelineError;
use features::FeatureExtractor;
use orientation::OrientationNormalizer;
use window::sliding_windows;

/// Extraction output: one row of features and one label per window.
///
/// Column order matches `names()`; consumers address features by position.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    names: Vec<String>,
    x: Array2<f64>,
    y: Vec<i64>,
}

impl FeatureMatrix {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.x.view()
    }

    pub fn labels(&self) -> &[i64] {
        &self.y
    }

    pub fn n_windows(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Distinct labels in ascending order.
    pub fn unique_labels(&self) -> Vec<i64> {
        self.y.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
    }
}

/// Batch processor running the full extraction pipeline.
#[derive(Debug, Clone)]
pub struct StreamProcessor {
    config: PipelineConfig,
    extractor: FeatureExtractor,
}

impl StreamProcessor {
    pub fn new(config: PipelineConfig) -> Self {
        let extractor = FeatureExtractor::new(
            config.features.selection(),
            config.features.entropy_source,
        );
        Self { config, extractor }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Names of the features this processor will produce for `n_axes` axes.
    pub fn feature_names(&self, n_axes: usize) -> Vec<String> {
        self.extractor.feature_names(n_axes)
    }

    /// Run the full pipeline over one continuous sample stream.
    pub fn process_stream(&self, stream: &SensorStream) -> Result<FeatureMatrix, PipelineError> {
        let reoriented;
        let stream = if self.config.orientation.enabled {
            let smoothing = self.config.orientation.smoothing;
            if !smoothing.is_finite() || !(0.0..1.0).contains(&smoothing) {
                return Err(PipelineError::InvalidSmoothing { smoothing });
            }
            tracing::info!("Reorienting {} samples", stream.len());
            // Fresh normalizer per stream: the gravity estimate never
            // crosses recording boundaries.
            let mut normalizer = OrientationNormalizer::new(self.config.orientation.smoothing);
            let samples = normalizer.normalize_matrix(stream.samples())?;
            reoriented = stream.with_samples(samples)?;
            &reoriented
        } else {
            stream
        };

        let window_size = self.config.windowing.window_size;
        let step_size = self.config.windowing.step_size;
        let policy = self.config.windowing.label_policy;
        tracing::info!(
            "Extracting features with window size {} and step size {}",
            window_size,
            step_size
        );

        let n_axes = stream.n_axes();
        let expected = self.extractor.feature_count(n_axes);
        let mut flat = Vec::new();
        let mut labels = Vec::new();

        for window in sliding_windows(stream, window_size, step_size)? {
            let features = self.extractor.extract(window.samples);
            if features.len() != expected {
                return Err(PipelineError::FeatureLengthMismatch {
                    expected,
                    actual: features.len(),
                });
            }
            labels.push(policy.resolve(window.start, window.labels)?);
            flat.extend_from_slice(&features);
        }

        self.assemble(n_axes, expected, flat, labels)
    }

    /// Run feature extraction over windows that arrive pre-sliced (one CSV
    /// row per window). Orientation and windowing do not apply here.
    pub fn process_windows(
        &self,
        dataset: &WindowedDataset,
    ) -> Result<FeatureMatrix, PipelineError> {
        let n_axes = match dataset.windows.first() {
            Some(window) => window.ncols(),
            None => {
                return Err(PipelineError::EmptyInput {
                    source: "windowed dataset".to_string(),
                })
            }
        };
        let expected = self.extractor.feature_count(n_axes);
        let mut flat = Vec::with_capacity(expected * dataset.len());

        for window in &dataset.windows {
            let features = self.extractor.extract(window.view());
            if features.len() != expected {
                return Err(PipelineError::FeatureLengthMismatch {
                    expected,
                    actual: features.len(),
                });
            }
            flat.extend_from_slice(&features);
        }

        self.assemble(n_axes, expected, flat, dataset.labels.clone())
    }

    fn assemble(
        &self,
        n_axes: usize,
        n_features: usize,
        flat: Vec<f64>,
        labels: Vec<i64>,
    ) -> Result<FeatureMatrix, PipelineError> {
        let rows = labels.len();
        let x = Array2::from_shape_vec((rows, n_features), flat).map_err(|_| {
            PipelineError::FeatureLengthMismatch {
                expected: rows * n_features,
                actual: rows,
            }
        })?;
        let matrix = FeatureMatrix {
            names: self.extractor.feature_names(n_axes),
            x,
            y: labels,
        };
        tracing::info!(
            "Finished feature extraction over {} windows, labels found: {:?}",
            matrix.n_windows(),
            matrix.unique_labels()
        );
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::dataset::SensorStream;
    use ndarray::Array2;

    fn labelled_stream(n: usize) -> SensorStream {
        let timestamps: Vec<f64> = (0..n).map(|i| i as f64 * 40.0).collect();
        // Standing still for the first half, moving for the second.
        let samples = Array2::from_shape_fn((n, 3), |(i, j)| {
            if i < n / 2 {
                [0.0, 0.0, 9.8][j]
            } else {
                [2.0 * (i as f64 * 0.9).sin(), 1.5, 9.8][j]
            }
        });
        let labels: Vec<i64> = (0..n).map(|i| if i < n / 2 { 0 } else { 1 }).collect();
        SensorStream::new(timestamps, samples, labels).unwrap()
    }

    #[test]
    fn stream_pipeline_produces_25_features_per_window() {
        let processor = StreamProcessor::new(PipelineConfig::default());
        let matrix = processor.process_stream(&labelled_stream(200)).unwrap();
        assert_eq!(matrix.n_windows(), 10); // 200 samples / 20-sample stride
        assert_eq!(matrix.n_features(), 25); // 6*3 + 6 + 1
        assert_eq!(matrix.names().len(), 25);
        assert_eq!(matrix.labels().len(), 10);
        assert_eq!(matrix.unique_labels(), vec![0, 1]);
    }

    #[test]
    fn disabling_orientation_skips_reorientation() {
        let mut config = PipelineConfig::default();
        config.orientation.enabled = false;
        let processor = StreamProcessor::new(config);
        let stream = labelled_stream(40);
        let matrix = processor.process_stream(&stream).unwrap();

        // With orientation off the first window's mean z must equal the
        // raw value exactly.
        let names = matrix.names().to_vec();
        let mean_z = names.iter().position(|n| n == "mean z").unwrap();
        assert!((matrix.features()[[0, mean_z]] - 9.8).abs() < 1e-12);
    }

    #[test]
    fn short_stream_yields_empty_matrix() {
        let processor = StreamProcessor::new(PipelineConfig::default());
        let matrix = processor.process_stream(&labelled_stream(10)).unwrap();
        assert_eq!(matrix.n_windows(), 0);
        assert_eq!(matrix.n_features(), 25);
        assert!(matrix.unique_labels().is_empty());
    }

    #[test]
    fn feature_selection_changes_matrix_width() {
        let mut config = PipelineConfig::default();
        config.features.entropy = false;
        config.features.magnitude = false;
        let processor = StreamProcessor::new(config);
        let matrix = processor.process_stream(&labelled_stream(100)).unwrap();
        assert_eq!(matrix.n_features(), 18);
    }

    #[test]
    fn prewindowed_rows_extract_single_axis_features() {
        let mut config = PipelineConfig::default();
        config.orientation.enabled = false;
        let processor = StreamProcessor::new(config);

        let dataset = crate::dataset::WindowedDataset {
            windows: vec![
                Array2::from_shape_fn((50, 1), |(i, _)| (i as f64 * 0.3).sin()),
                Array2::from_shape_fn((50, 1), |(i, _)| (i as f64 * 0.7).cos()),
            ],
            labels: vec![0, 1],
            class_names: vec!["alice".to_string(), "bob".to_string()],
        };

        let matrix = processor.process_windows(&dataset).unwrap();
        assert_eq!(matrix.n_windows(), 2);
        assert_eq!(matrix.n_features(), 13); // 6*1 + 6 + 1
        assert_eq!(matrix.labels(), &[0, 1]);
    }

    #[test]
    fn empty_windowed_dataset_is_an_error() {
        let processor = StreamProcessor::new(PipelineConfig::default());
        let err = processor
            .process_windows(&crate::dataset::WindowedDataset::default())
            .unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput { .. }));
    }

    #[test]
    fn out_of_range_smoothing_is_rejected() {
        let mut config = PipelineConfig::default();
        config.orientation.smoothing = 1.0;
        let processor = StreamProcessor::new(config);
        let err = processor.process_stream(&labelled_stream(40)).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidSmoothing { .. }));
    }

    #[test]
    fn uniform_policy_errors_on_label_transition_inside_window() {
        let mut config = PipelineConfig::default();
        config.windowing.label_policy = window::LabelPolicy::RequireUniform;
        config.windowing.window_size = 30; // straddles the label change
        config.windowing.step_size = 30;
        config.orientation.enabled = false;
        let processor = StreamProcessor::new(config);

        let err = processor.process_stream(&labelled_stream(60)).unwrap_err();
        assert!(matches!(err, PipelineError::LabelConflict { .. }));
    }
}
