// Activity Trainer Core - sensor feature extraction pipeline
// Orientation normalization, fixed-size windowing, and statistical features
// for accelerometer activity recognition and speaker identification data.

// Module declarations
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod pipeline;

// Re-exports for convenience
pub use config::PipelineConfig;
pub use dataset::{SensorStream, WindowedDataset};
pub use error::PipelineError;
pub use pipeline::{FeatureMatrix, StreamProcessor};
