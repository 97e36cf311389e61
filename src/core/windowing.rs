use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::core::types::Sample;

/// Inclusive time window in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_ms: f64,
    pub end_ms: f64,
}

impl TimeWindow {
    #[must_use]
    pub fn new(start_ms: f64, end_ms: f64) -> Self {
        if start_ms <= end_ms {
            Self { start_ms, end_ms }
        } else {
            Self {
                start_ms: end_ms,
                end_ms: start_ms,
            }
        }
    }

    /// Bounds spanned by a time-ordered sequence.
    #[must_use]
    pub fn from_samples(samples: &[Sample]) -> Option<Self> {
        let first = samples.first()?;
        let last = samples.last()?;
        Some(Self::new(first.timestamp_ms as f64, last.timestamp_ms as f64))
    }

    #[must_use]
    pub fn span_ms(self) -> f64 {
        self.end_ms - self.start_ms
    }
}

/// Largest pan distance that keeps a window of `width_ms` inside `bounds`.
#[must_use]
pub fn max_pan_offset_ms(bounds: TimeWindow, width_ms: f64) -> f64 {
    (bounds.span_ms() - width_ms).max(0.0)
}

/// Visible window for a zoom `scale` and a pan `offset_ms` back from the
/// newest sample.
///
/// The window is `base_window_ms * scale` wide, never wider than `bounds`,
/// and the offset is clamped so the window never leaves `bounds`.
#[must_use]
pub fn resolve_visible_window(
    bounds: TimeWindow,
    scale: f64,
    offset_ms: f64,
    base_window_ms: f64,
) -> TimeWindow {
    let span = bounds.span_ms();
    if span <= 0.0 {
        return bounds;
    }

    let requested = base_window_ms * scale;
    let width = if requested.is_finite() && requested > 0.0 {
        requested.min(span)
    } else {
        span
    };
    let offset = if offset_ms.is_finite() {
        offset_ms.clamp(0.0, max_pan_offset_ms(bounds, width))
    } else {
        0.0
    };
    let end = bounds.end_ms - offset;
    TimeWindow::new(end - width, end)
}

/// Samples whose timestamp falls inside `window`, as a borrowed sub-slice.
#[must_use]
pub fn samples_in_window(samples: &[Sample], window: TimeWindow) -> &[Sample] {
    let start = samples.partition_point(|sample| (sample.timestamp_ms as f64) < window.start_ms);
    let end = samples.partition_point(|sample| (sample.timestamp_ms as f64) <= window.end_ms);
    &samples[start..end.max(start)]
}

/// Windowed samples plus flags marking interpolated edge points.
///
/// Edge points are only ever the first and last element.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeWindow {
    pub samples: Vec<Sample>,
    pub leading_edge: bool,
    pub trailing_edge: bool,
}

impl EdgeWindow {
    /// Index range of recorded samples among `point_count` points derived
    /// from this window with both endpoints kept.
    #[must_use]
    pub fn recorded_range(&self, point_count: usize) -> Range<usize> {
        let start = usize::from(self.leading_edge);
        let end = point_count.saturating_sub(usize::from(self.trailing_edge));
        start..end.max(start)
    }
}

/// Windowed samples with interpolated points added at both window edges when
/// the series continues beyond them, so the line reaches the plot borders.
#[must_use]
pub fn samples_in_window_with_edges(samples: &[Sample], window: TimeWindow) -> EdgeWindow {
    let start = samples.partition_point(|sample| (sample.timestamp_ms as f64) < window.start_ms);
    let end = samples.partition_point(|sample| (sample.timestamp_ms as f64) <= window.end_ms);
    let end = end.max(start);

    let mut windowed = Vec::with_capacity(end - start + 2);
    let mut leading_edge = false;
    let mut trailing_edge = false;
    if start > 0 && start < samples.len() && (samples[start].timestamp_ms as f64) > window.start_ms
    {
        if let Some(edge) = interpolate_at(samples[start - 1], samples[start], window.start_ms) {
            windowed.push(edge);
            leading_edge = true;
        }
    }
    windowed.extend_from_slice(&samples[start..end]);
    if end > 0 && end < samples.len() && (samples[end - 1].timestamp_ms as f64) < window.end_ms {
        if let Some(edge) = interpolate_at(samples[end - 1], samples[end], window.end_ms) {
            windowed.push(edge);
            trailing_edge = true;
        }
    }
    EdgeWindow {
        samples: windowed,
        leading_edge,
        trailing_edge,
    }
}

fn interpolate_at(before: Sample, after: Sample, time_ms: f64) -> Option<Sample> {
    let t0 = before.timestamp_ms as f64;
    let t1 = after.timestamp_ms as f64;
    let span = t1 - t0;
    if span <= 0.0 {
        return None;
    }
    let ratio = ((time_ms - t0) / span).clamp(0.0, 1.0);
    let value = before.value + (after.value - before.value) * ratio;
    Some(Sample::new(time_ms.round() as i64, value))
}

#[cfg(test)]
mod tests {
    use super::{TimeWindow, resolve_visible_window, samples_in_window, samples_in_window_with_edges};
    use crate::core::types::Sample;

    fn series() -> Vec<Sample> {
        (0..=10)
            .map(|i| Sample::new(i * 1_000, i as f64))
            .collect()
    }

    #[test]
    fn window_is_clamped_to_data_bounds() {
        let bounds = TimeWindow::new(0.0, 10_000.0);
        let window = resolve_visible_window(bounds, 8.0, 0.0, 4_000.0);
        assert_eq!(window, bounds);

        let window = resolve_visible_window(bounds, 1.0, 50_000.0, 4_000.0);
        assert_eq!(window, TimeWindow::new(0.0, 4_000.0));
    }

    #[test]
    fn window_slice_is_inclusive() {
        let samples = series();
        let window = TimeWindow::new(2_000.0, 4_000.0);
        let values: Vec<f64> = samples_in_window(&samples, window)
            .iter()
            .map(|s| s.value)
            .collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn edges_are_interpolated_between_neighbors() {
        let samples = series();
        let window = TimeWindow::new(2_500.0, 3_500.0);
        let edged = samples_in_window_with_edges(&samples, window);
        assert!(edged.leading_edge && edged.trailing_edge);
        assert_eq!(edged.recorded_range(edged.samples.len()), 1..2);
        let windowed = edged.samples;
        assert_eq!(windowed.len(), 3);
        assert_eq!(windowed[0].timestamp_ms, 2_500);
        assert!((windowed[0].value - 2.5).abs() <= 1e-12);
        assert_eq!(windowed[1], Sample::new(3_000, 3.0));
        assert!((windowed[2].value - 3.5).abs() <= 1e-12);
    }

    #[test]
    fn window_on_recorded_samples_has_no_edges() {
        let samples = series();
        let edged = samples_in_window_with_edges(&samples, TimeWindow::new(2_000.0, 4_000.0));
        assert!(!edged.leading_edge && !edged.trailing_edge);
        assert_eq!(edged.recorded_range(edged.samples.len()), 0..3);
    }
}
