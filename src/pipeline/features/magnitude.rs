// Magnitude features - orientation-independent signal strength
//
// The Euclidean norm across axes collapses an N×M window into an N-length
// series that is invariant to device rotation, which makes its statistics
// useful even when orientation normalization is disabled.

use ndarray::ArrayView2;

/// Per-sample Euclidean norm across the window's axes.
pub fn magnitude_series(window: ArrayView2<'_, f64>) -> Vec<f64> {
    window
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|v| v * v).sum::<f64>().sqrt())
        .collect()
}
