//! Point-budget reduction and smoothing for display.

use std::borrow::Cow;

use crate::core::types::Sample;

pub const MAX_SMOOTHING_FACTOR: f64 = 0.5;

/// Uniform stride decimation down to at most `max_points` samples.
///
/// Keeps every `ceil(len / max_points)`-th sample starting with the first and
/// always keeps the last one, replacing the final kept sample when the budget
/// is already full. Spikes between kept samples are not preserved.
/// Budgets below 2 are raised to 2 so both endpoints survive.
#[must_use]
pub fn reduce(samples: &[Sample], max_points: usize) -> Cow<'_, [Sample]> {
    let max_points = max_points.max(2);
    if samples.len() <= max_points {
        return Cow::Borrowed(samples);
    }

    let stride = samples.len().div_ceil(max_points);
    let last_index = samples.len() - 1;
    let mut reduced: Vec<Sample> = samples.iter().copied().step_by(stride).collect();
    if last_index % stride != 0 {
        let last = samples[last_index];
        if reduced.len() < max_points {
            reduced.push(last);
        } else if let Some(tail) = reduced.last_mut() {
            *tail = last;
        }
    }
    Cow::Owned(reduced)
}

/// Exponential moving average with `alpha` clamped to `[0, 0.5]`.
///
/// `alpha` weighs the previous smoothed value, so `0` returns the input
/// unchanged. The first sample is kept exactly and timestamps are preserved.
/// Sequences shorter than 3 samples are returned as-is.
#[must_use]
pub fn smooth(samples: &[Sample], alpha: f64) -> Cow<'_, [Sample]> {
    let alpha = if alpha.is_finite() {
        alpha.clamp(0.0, MAX_SMOOTHING_FACTOR)
    } else {
        0.0
    };
    if samples.len() < 3 || alpha == 0.0 {
        return Cow::Borrowed(samples);
    }

    let mut smoothed = Vec::with_capacity(samples.len());
    let mut previous = samples[0].value;
    smoothed.push(samples[0]);
    for sample in &samples[1..] {
        previous = (1.0 - alpha) * sample.value + alpha * previous;
        smoothed.push(Sample::new(sample.timestamp_ms, previous));
    }
    Cow::Owned(smoothed)
}

/// Decimates first, then smooths the reduced point set.
#[must_use]
pub fn reduce_and_smooth(samples: &[Sample], max_points: usize, alpha: f64) -> Vec<Sample> {
    let reduced = reduce(samples, max_points);
    smooth(&reduced, alpha).into_owned()
}
