// Statistical features - per-axis and per-series summary statistics
//
// All six statistics use population formulas (divisor N, not N-1), matching
// the numeric contract of the feature matrix consumers. Column statistics
// are laid out group-major: all means first, then all medians, and so on,
// so feature positions stay stable for a fixed axis count.

use ndarray::ArrayView2;

/// Number of statistics per axis or series: mean, median, std, var, min, max.
pub const STATS_PER_SERIES: usize = 6;

/// The six statistic names, in output order.
pub const STAT_NAMES: [&str; STATS_PER_SERIES] = ["mean", "median", "std", "var", "min", "max"];

/// Compute the six statistics for every column, group-major.
///
/// For an N×M window the result has `6 * M` values:
/// `mean(col 0..M), median(col 0..M), std(..), var(..), min(..), max(..)`.
pub fn column_statistics(window: ArrayView2<'_, f64>) -> Vec<f64> {
    let per_column: Vec<[f64; STATS_PER_SERIES]> = window
        .columns()
        .into_iter()
        .map(|column| {
            let values: Vec<f64> = column.iter().copied().collect();
            series_statistics(&values)
        })
        .collect();

    let mut out = Vec::with_capacity(STATS_PER_SERIES * per_column.len());
    for stat in 0..STATS_PER_SERIES {
        for stats in &per_column {
            out.push(stats[stat]);
        }
    }
    out
}

/// The six statistics of one series: `[mean, median, std, var, min, max]`.
///
/// Returns all zeros for an empty series; callers upstream guarantee
/// windows are non-empty, so that path only matters for direct use.
pub fn series_statistics(values: &[f64]) -> [f64; STATS_PER_SERIES] {
    if values.is_empty() {
        return [0.0; STATS_PER_SERIES];
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std = var.sqrt();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    [mean, median(values), std, var, min, max]
}

/// Median with even-length averaging, as numeric consumers expect.
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn hand_computed_two_axis_window() {
        // Window [[1,2],[3,4],[5,6]]: mean [3,4], population std ~1.633.
        let window = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let stats = column_statistics(window.view());
        assert_eq!(stats.len(), 12);

        // means
        assert_relative_eq!(stats[0], 3.0);
        assert_relative_eq!(stats[1], 4.0);
        // medians
        assert_relative_eq!(stats[2], 3.0);
        assert_relative_eq!(stats[3], 4.0);
        // population std
        assert_relative_eq!(stats[4], 1.632993161855452, epsilon = 1e-3);
        assert_relative_eq!(stats[5], 1.632993161855452, epsilon = 1e-3);
        // population var
        assert_relative_eq!(stats[6], 8.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(stats[7], 8.0 / 3.0, epsilon = 1e-12);
        // min / max
        assert_relative_eq!(stats[8], 1.0);
        assert_relative_eq!(stats[9], 2.0);
        assert_relative_eq!(stats[10], 5.0);
        assert_relative_eq!(stats[11], 6.0);
    }

    #[test]
    fn population_not_sample_variance() {
        // Sample variance of [1,3] would be 2; population variance is 1.
        let stats = series_statistics(&[1.0, 3.0]);
        assert_relative_eq!(stats[3], 1.0);
        assert_relative_eq!(stats[2], 1.0);
    }

    #[test]
    fn median_even_length_averages_middle_pair() {
        let stats = series_statistics(&[4.0, 1.0, 3.0, 2.0]);
        assert_relative_eq!(stats[1], 2.5);
    }

    #[test]
    fn median_odd_length_takes_middle() {
        let stats = series_statistics(&[9.0, 1.0, 5.0]);
        assert_relative_eq!(stats[1], 5.0);
    }

    #[test]
    fn constant_series_has_zero_spread() {
        let stats = series_statistics(&[2.5, 2.5, 2.5, 2.5]);
        assert_relative_eq!(stats[0], 2.5);
        assert_relative_eq!(stats[2], 0.0);
        assert_relative_eq!(stats[3], 0.0);
        assert_relative_eq!(stats[4], 2.5);
        assert_relative_eq!(stats[5], 2.5);
    }

    #[test]
    fn empty_series_yields_zeros() {
        assert_eq!(series_statistics(&[]), [0.0; STATS_PER_SERIES]);
    }
}
