// Histogram entropy - distributional spread of a window's values
//
// Values are bucketed into five equal-width bins spanning the window's own
// data range (bin edges vary window to window; trained consumers depend on
// that, so the edges are never fixed globally). The statistic is the
// count-weighted sum `-count * ln(count)` over nonzero bins. This is NOT a
// probability-normalized Shannon entropy; the unnormalized form is kept
// bit-for-bit for compatibility with models trained on it.

/// Fixed number of histogram bins.
pub const HISTOGRAM_BINS: usize = 5;

/// Count-weighted histogram entropy over `values`.
///
/// Bins span `[min, max]` of the input; the maximum value lands in the last
/// bin. A constant input collapses into a single bin and yields
/// `-n * ln(n)`.
pub fn histogram_entropy(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut counts = [0usize; HISTOGRAM_BINS];
    if max > min {
        let width = (max - min) / HISTOGRAM_BINS as f64;
        for &v in values {
            let bin = (((v - min) / width) as usize).min(HISTOGRAM_BINS - 1);
            counts[bin] += 1;
        }
    } else {
        // Degenerate range: every value is identical.
        counts[0] = values.len();
    }

    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let c = c as f64;
            -c * c.ln()
        })
        .sum()
}
