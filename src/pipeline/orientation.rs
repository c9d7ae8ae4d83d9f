// Orientation normalization for tri-axial accelerometer data
//
// Devices are mounted in arbitrary orientations, so raw axis values are not
// comparable across recordings. This module rotates each sample into a
// canonical frame using a smoothed running estimate of the gravity vector:
// gravity is tracked with an exponential moving average, the roll and pitch
// it implies are computed with the standard arctangent formulas, and the
// inverse rotation is applied to the raw sample.
//
// The gravity estimate is the only mutable state in the pipeline. It must
// start from the neutral zero state for every independent recording:
// either call `reset()` between streams or use a fresh instance per stream.
// NaN/Infinity inputs propagate through unguarded; the CSV loader rejects
// non-numeric fields, so non-finite values only appear via programmatic use.

use ndarray::{Array2, ArrayView2};

use crate::error::PipelineError;

/// Smoothing constant for the gravity EMA. Close to 1.0 means a slow,
/// stable estimate; 0.8 settles within a second at ~25 Hz.
pub const DEFAULT_SMOOTHING: f64 = 0.8;

/// Per-stream gravity tracker and sample re-orienter.
///
/// Owns its gravity estimate outright, so concurrent streams each using
/// their own normalizer cannot corrupt one another.
#[derive(Debug, Clone)]
pub struct OrientationNormalizer {
    alpha: f64,
    gravity: [f64; 3],
}

impl OrientationNormalizer {
    /// Create a normalizer with the given smoothing constant.
    ///
    /// `alpha` weighs the previous estimate: `g = alpha*g + (1-alpha)*raw`.
    pub fn new(alpha: f64) -> Self {
        assert!(
            alpha.is_finite() && (0.0..1.0).contains(&alpha),
            "smoothing constant must be in [0, 1)"
        );
        Self {
            alpha,
            gravity: [0.0; 3],
        }
    }

    /// The current smoothed gravity estimate, in device coordinates.
    pub fn gravity(&self) -> [f64; 3] {
        self.gravity
    }

    /// Clear the gravity estimate back to the neutral zero state.
    ///
    /// Must run once before each independent stream; carrying the estimate
    /// across unrelated recordings leaks orientation state between them.
    pub fn reset(&mut self) {
        self.gravity = [0.0; 3];
    }

    /// Re-orient one raw sample, updating the gravity estimate first.
    pub fn normalize(&mut self, raw: [f64; 3]) -> [f64; 3] {
        for (g, r) in self.gravity.iter_mut().zip(raw.iter()) {
            *g = self.alpha * *g + (1.0 - self.alpha) * r;
        }
        let [gx, gy, gz] = self.gravity;

        let roll = gy.atan2(gz);
        let pitch = (-gx).atan2((gy * gy + gz * gz).sqrt());

        // Undo roll about x, then pitch about y.
        let unrolled = rotate_about_x(raw, -roll);
        rotate_about_y(unrolled, -pitch)
    }

    /// Re-orient every row of a 3-axis sample matrix.
    ///
    /// Does not reset first; callers processing independent streams are
    /// expected to use a fresh or freshly-reset normalizer.
    pub fn normalize_matrix(
        &mut self,
        samples: ArrayView2<'_, f64>,
    ) -> Result<Array2<f64>, PipelineError> {
        if samples.ncols() != 3 {
            return Err(PipelineError::AxisCountUnsupported {
                expected: 3,
                actual: samples.ncols(),
            });
        }

        let mut out = Array2::zeros(samples.raw_dim());
        for (i, row) in samples.rows().into_iter().enumerate() {
            let rotated = self.normalize([row[0], row[1], row[2]]);
            for (j, value) in rotated.iter().enumerate() {
                out[[i, j]] = *value;
            }
        }
        log::debug!(
            "Reoriented {} samples, gravity estimate {:?}",
            samples.nrows(),
            self.gravity
        );
        Ok(out)
    }
}

impl Default for OrientationNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING)
    }
}

fn rotate_about_x(v: [f64; 3], angle: f64) -> [f64; 3] {
    let (sin, cos) = angle.sin_cos();
    [v[0], v[1] * cos - v[2] * sin, v[1] * sin + v[2] * cos]
}

fn rotate_about_y(v: [f64; 3], angle: f64) -> [f64; 3] {
    let (sin, cos) = angle.sin_cos();
    [v[0] * cos + v[2] * sin, v[1], -v[0] * sin + v[2] * cos]
}
