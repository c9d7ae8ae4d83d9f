// FeatureExtractor - window to fixed-length feature vector
//
// Reduces one N×M window (N samples, M axes, no timestamp/label columns)
// into a feature vector with a statically known length and order:
//
// 1. Statistical: mean/median/std/var/min/max per axis, group-major (6*M)
// 2. Magnitude: the same six statistics over the per-sample Euclidean
//    norm series (6)
// 3. Entropy: five-bin histogram entropy of the window values (1)
//
// Groups are individually selectable; consumers address features by
// position, so the selection fixes the expected vector length and
// `feature_names` documents the order.

mod entropy;
mod magnitude;
mod statistical;

pub use entropy::{histogram_entropy, HISTOGRAM_BINS};
pub use magnitude::magnitude_series;
pub use statistical::{column_statistics, series_statistics, STATS_PER_SERIES, STAT_NAMES};

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

/// Which feature groups to compute. Defaults to all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSelection {
    pub statistical: bool,
    pub magnitude: bool,
    pub entropy: bool,
}

impl Default for FeatureSelection {
    fn default() -> Self {
        Self {
            statistical: true,
            magnitude: true,
            entropy: true,
        }
    }
}

/// Input to the entropy feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntropySource {
    /// The flattened raw window values (every axis of every sample).
    #[default]
    RawValues,
    /// The per-sample magnitude series.
    Magnitude,
}

/// Stateless reducer from windows to feature vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor {
    selection: FeatureSelection,
    entropy_source: EntropySource,
}

impl FeatureExtractor {
    pub fn new(selection: FeatureSelection, entropy_source: EntropySource) -> Self {
        Self {
            selection,
            entropy_source,
        }
    }

    /// The exact vector length `extract` will produce for `n_axes` axes.
    pub fn feature_count(&self, n_axes: usize) -> usize {
        let mut count = 0;
        if self.selection.statistical {
            count += STATS_PER_SERIES * n_axes;
        }
        if self.selection.magnitude {
            count += STATS_PER_SERIES;
        }
        if self.selection.entropy {
            count += 1;
        }
        count
    }

    /// Feature names in output order, one per vector position.
    pub fn feature_names(&self, n_axes: usize) -> Vec<String> {
        let mut names = Vec::with_capacity(self.feature_count(n_axes));
        if self.selection.statistical {
            for stat in STAT_NAMES {
                for axis in 0..n_axes {
                    names.push(format!("{} {}", stat, axis_label(axis, n_axes)));
                }
            }
        }
        if self.selection.magnitude {
            for stat in STAT_NAMES {
                names.push(format!("{} mag", stat));
            }
        }
        if self.selection.entropy {
            names.push("entropy".to_string());
        }
        names
    }

    /// Extract the configured features from one window.
    ///
    /// The result length always equals `feature_count(window.ncols())`.
    pub fn extract(&self, window: ArrayView2<'_, f64>) -> Vec<f64> {
        let mut features = Vec::with_capacity(self.feature_count(window.ncols()));

        if self.selection.statistical {
            features.extend(column_statistics(window));
        }

        let need_magnitudes = self.selection.magnitude
            || (self.selection.entropy && self.entropy_source == EntropySource::Magnitude);
        let magnitudes = if need_magnitudes {
            magnitude_series(window)
        } else {
            Vec::new()
        };

        if self.selection.magnitude {
            features.extend(series_statistics(&magnitudes));
        }

        if self.selection.entropy {
            let value = match self.entropy_source {
                EntropySource::RawValues => {
                    let flat: Vec<f64> = window.iter().copied().collect();
                    histogram_entropy(&flat)
                }
                EntropySource::Magnitude => histogram_entropy(&magnitudes),
            };
            features.push(value);
        }

        features
    }
}

/// Axis display name: x/y/z for up to three axes, a<i> beyond that.
fn axis_label(axis: usize, n_axes: usize) -> String {
    if n_axes <= 3 {
        ["x", "y", "z"][axis].to_string()
    } else {
        format!("a{}", axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};
    use rand::Rng;
    use rand::SeedableRng;

    fn noise_window(rows: usize, cols: usize, seed: u64) -> Array2<f64> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        Array2::from_shape_fn((rows, cols), |_| rng.gen_range(-10.0..10.0))
    }

    #[test]
    fn full_selection_length_is_6m_plus_7() {
        let extractor = FeatureExtractor::default();
        for n_axes in [1usize, 3, 6] {
            let expected = 6 * n_axes + 6 + 1;
            assert_eq!(extractor.feature_count(n_axes), expected);
            let window = noise_window(20, n_axes, 1);
            assert_eq!(extractor.extract(window.view()).len(), expected);
            assert_eq!(extractor.feature_names(n_axes).len(), expected);
        }
    }

    #[test]
    fn tri_axial_names_match_documented_order() {
        let extractor = FeatureExtractor::default();
        let names = extractor.feature_names(3);
        assert_eq!(names.len(), 25);
        assert_eq!(
            &names[..6],
            &["mean x", "mean y", "mean z", "median x", "median y", "median z"]
        );
        assert_eq!(names[6], "std x");
        assert_eq!(names[17], "max z");
        assert_eq!(names[18], "mean mag");
        assert_eq!(names[23], "max mag");
        assert_eq!(names[24], "entropy");
    }

    #[test]
    fn statistical_only_selection() {
        let extractor = FeatureExtractor::new(
            FeatureSelection {
                statistical: true,
                magnitude: false,
                entropy: false,
            },
            EntropySource::default(),
        );
        assert_eq!(extractor.feature_count(3), 18);
        let window = noise_window(10, 3, 2);
        let features = extractor.extract(window.view());
        assert_eq!(features.len(), 18);
        assert!(!extractor.feature_names(3).iter().any(|n| n == "entropy"));
    }

    #[test]
    fn values_line_up_with_names() {
        let extractor = FeatureExtractor::default();
        let window = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let features = extractor.extract(window.view());
        let names = extractor.feature_names(2);

        let index_of = |name: &str| names.iter().position(|n| n == name).unwrap();
        assert_relative_eq!(features[index_of("mean x")], 3.0);
        assert_relative_eq!(features[index_of("mean y")], 4.0);
        assert_relative_eq!(features[index_of("min x")], 1.0);
        assert_relative_eq!(features[index_of("max y")], 6.0);
        // mean magnitude: mean of sqrt(5), 5, sqrt(61)
        let expected_mag = (5f64.sqrt() + 5.0 + 61f64.sqrt()) / 3.0;
        assert_relative_eq!(features[index_of("mean mag")], expected_mag, epsilon = 1e-12);
    }

    #[test]
    fn entropy_over_magnitude_series_differs_from_raw() {
        let window = noise_window(30, 3, 3);
        let raw = FeatureExtractor::new(FeatureSelection::default(), EntropySource::RawValues);
        let mag = FeatureExtractor::new(FeatureSelection::default(), EntropySource::Magnitude);

        let raw_entropy = *raw.extract(window.view()).last().unwrap();
        let mag_entropy = *mag.extract(window.view()).last().unwrap();

        let flat: Vec<f64> = window.iter().copied().collect();
        assert_relative_eq!(raw_entropy, histogram_entropy(&flat), epsilon = 1e-12);
        let mags = magnitude_series(window.view());
        assert_relative_eq!(mag_entropy, histogram_entropy(&mags), epsilon = 1e-12);
    }

    #[test]
    fn many_axis_names_are_indexed() {
        let extractor = FeatureExtractor::default();
        let names = extractor.feature_names(5);
        assert_eq!(names[0], "mean a0");
        assert_eq!(names[4], "mean a4");
    }
}
