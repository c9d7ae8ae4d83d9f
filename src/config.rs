//! Configuration management for pipeline parameter tuning
//!
//! This module provides runtime configuration loading from JSON files,
//! enabling fast iteration without recompilation. Windowing geometry,
//! orientation smoothing, and feature selection can all be adjusted via
//! the config file for rapid experimentation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::pipeline::features::{EntropySource, FeatureSelection};
use crate::pipeline::orientation::DEFAULT_SMOOTHING;
use crate::pipeline::window::LabelPolicy;

/// Complete pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PipelineConfig {
    pub windowing: WindowingConfig,
    pub orientation: OrientationConfig,
    pub features: FeatureConfig,
}

/// Windowing geometry and label assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowingConfig {
    /// Samples per window
    pub window_size: usize,
    /// Samples between consecutive window starts
    pub step_size: usize,
    /// How a window's label is chosen from its samples' labels
    pub label_policy: LabelPolicy,
}

impl Default for WindowingConfig {
    fn default() -> Self {
        Self {
            // 20 samples at ~25 Hz is just under a second of motion,
            // and non-overlapping windows keep training rows independent.
            window_size: 20,
            step_size: 20,
            label_policy: LabelPolicy::default(),
        }
    }
}

/// Orientation normalization parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientationConfig {
    /// Run the gravity-based reorientation pass before windowing
    pub enabled: bool,
    /// Low-pass smoothing factor for the gravity estimate, in [0, 1)
    pub smoothing: f64,
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            smoothing: DEFAULT_SMOOTHING,
        }
    }
}

/// Feature group selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Per-axis summary statistics
    pub statistical: bool,
    /// Statistics over the per-sample magnitude series
    pub magnitude: bool,
    /// Five-bin histogram entropy
    pub entropy: bool,
    /// Which series the entropy feature is computed over
    pub entropy_source: EntropySource,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            statistical: true,
            magnitude: true,
            entropy: true,
            entropy_source: EntropySource::default(),
        }
    }
}

impl FeatureConfig {
    pub fn selection(&self) -> FeatureSelection {
        FeatureSelection {
            statistical: self.statistical,
            magnitude: self.magnitude,
            entropy: self.entropy,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The loaded configuration, or the defaults if the file is missing
    /// or fails to parse.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }
}
