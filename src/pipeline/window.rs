// Sliding-window slicing over a labelled sample stream
//
// Windows are fixed-length contiguous views over the sample matrix,
// advanced by a fixed stride. A trailing run shorter than `window_size` is
// discarded, never padded or returned short. The iterator borrows the
// stream, so iterating twice yields identical windows.
//
// Each window gets a single label. The collection scripts historically took
// the label at the window midpoint (sample 10 of a 20-sample window); that
// rule is fragile when a label transition lands inside a window, so the
// policy is an explicit choice rather than a silent fix.

use std::collections::BTreeMap;

use ndarray::{s, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::dataset::SensorStream;
use crate::error::PipelineError;

/// How a window's single label is chosen from its samples' labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LabelPolicy {
    /// Label of the sample at `window_size / 2` (the historical rule).
    Midpoint,
    /// Label of the sample at a caller-chosen offset into the window.
    FixedOffset { offset: usize },
    /// Most frequent label in the window; ties break toward the smaller
    /// label value for determinism.
    MajorityVote,
    /// All samples must agree, otherwise the window is an error.
    RequireUniform,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        LabelPolicy::Midpoint
    }
}

impl LabelPolicy {
    /// Resolve the label for a window given its per-sample labels.
    ///
    /// `window_start` is the window's start index in the stream, used only
    /// for error reporting.
    pub fn resolve(&self, window_start: usize, labels: &[i64]) -> Result<i64, PipelineError> {
        match *self {
            LabelPolicy::Midpoint => Ok(labels[labels.len() / 2]),
            LabelPolicy::FixedOffset { offset } => {
                if offset >= labels.len() {
                    return Err(PipelineError::LabelOffsetOutOfRange {
                        offset,
                        window_size: labels.len(),
                    });
                }
                Ok(labels[offset])
            }
            LabelPolicy::MajorityVote => {
                let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
                for &label in labels {
                    *counts.entry(label).or_insert(0) += 1;
                }
                // BTreeMap iterates in ascending label order, so `>` keeps
                // the smaller label on a tie.
                let mut best = (labels[0], 0usize);
                for (label, count) in counts {
                    if count > best.1 {
                        best = (label, count);
                    }
                }
                Ok(best.0)
            }
            LabelPolicy::RequireUniform => {
                let first = labels[0];
                if labels.iter().any(|&l| l != first) {
                    return Err(PipelineError::LabelConflict { window_start });
                }
                Ok(first)
            }
        }
    }
}

/// One window: its start index, a view of its samples, and the labels of
/// the samples it covers.
#[derive(Debug)]
pub struct WindowRef<'a> {
    pub start: usize,
    pub samples: ArrayView2<'a, f64>,
    pub labels: &'a [i64],
}

/// Lazy iterator of fixed-size windows over a stream.
#[derive(Debug)]
pub struct SlidingWindows<'a> {
    samples: ArrayView2<'a, f64>,
    labels: &'a [i64],
    window_size: usize,
    step_size: usize,
    next_start: usize,
}

/// Build a window iterator, validating the window parameters.
pub fn sliding_windows<'a>(
    stream: &'a SensorStream,
    window_size: usize,
    step_size: usize,
) -> Result<SlidingWindows<'a>, PipelineError> {
    if window_size == 0 || step_size == 0 {
        return Err(PipelineError::InvalidWindowParams {
            window_size,
            step_size,
        });
    }
    Ok(SlidingWindows {
        samples: stream.samples(),
        labels: stream.labels(),
        window_size,
        step_size,
        next_start: 0,
    })
}

impl<'a> Iterator for SlidingWindows<'a> {
    type Item = WindowRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next_start;
        let end = start.checked_add(self.window_size)?;
        if end > self.samples.nrows() {
            return None;
        }
        self.next_start = start + self.step_size;
        Some(WindowRef {
            start,
            samples: self.samples.slice_move(s![start..end, ..]),
            labels: &self.labels[start..end],
        })
    }
}
