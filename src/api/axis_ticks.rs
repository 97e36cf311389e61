use smallvec::SmallVec;

use crate::core::TimeWindow;

pub(super) const AXIS_VALUE_TARGET_SPACING_PX: f64 = 28.0;
pub(super) const AXIS_TIME_TARGET_SPACING_PX: f64 = 72.0;
pub(super) const AXIS_MIN_TICKS: usize = 2;
pub(super) const AXIS_MAX_TICKS: usize = 8;

const MINUTE_MS: i64 = 60_000;
const TIME_STEPS_MINUTES: [i64; 12] = [1, 2, 5, 10, 15, 30, 60, 120, 180, 360, 720, 1_440];

pub(super) type ValueTicks = SmallVec<[f64; AXIS_MAX_TICKS]>;
pub(super) type TimeTicks = SmallVec<[i64; AXIS_MAX_TICKS]>;

pub(super) fn axis_tick_target_count(
    axis_span_px: f64,
    target_spacing_px: f64,
    min_ticks: usize,
    max_ticks: usize,
) -> usize {
    if !axis_span_px.is_finite() || axis_span_px <= 0.0 {
        return min_ticks;
    }
    if !target_spacing_px.is_finite() || target_spacing_px <= 0.0 {
        return min_ticks;
    }

    let raw = (axis_span_px / target_spacing_px).floor() as usize + 1;
    raw.clamp(min_ticks, max_ticks)
}

/// Smallest 1/2/5 × 10^k step not below `raw_step`.
pub(super) fn nice_step(raw_step: f64) -> f64 {
    if !raw_step.is_finite() || raw_step <= 0.0 {
        return 1.0;
    }
    let magnitude = 10_f64.powf(raw_step.log10().floor());
    let normalized = raw_step / magnitude;
    let factor = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

/// Evenly spaced round values inside `[min, max]` and the step between them.
pub(super) fn value_ticks(min: f64, max: f64, target_count: usize) -> (f64, ValueTicks) {
    let mut ticks = ValueTicks::new();
    if !min.is_finite() || !max.is_finite() || max <= min {
        return (1.0, ticks);
    }

    let intervals = target_count.max(AXIS_MIN_TICKS) - 1;
    let step = nice_step((max - min) / intervals as f64);
    let epsilon = step * 1e-9;
    let mut index = (min / step).ceil();
    while ticks.len() < AXIS_MAX_TICKS {
        let value = index * step;
        if value > max + epsilon {
            break;
        }
        ticks.push(value);
        index += 1.0;
    }
    (step, ticks)
}

/// Timestamps aligned to whole local minutes/hours inside `window`.
///
/// `offset_ms` shifts alignment so ticks land on round local times.
pub(super) fn time_ticks(window: TimeWindow, target_count: usize, offset_ms: i64) -> TimeTicks {
    let mut ticks = TimeTicks::new();
    let span = window.span_ms();
    if !span.is_finite() || span <= 0.0 {
        return ticks;
    }

    let desired = span / target_count.max(1) as f64;
    let step = TIME_STEPS_MINUTES
        .iter()
        .map(|minutes| minutes * MINUTE_MS)
        .find(|step| *step as f64 >= desired)
        .unwrap_or(TIME_STEPS_MINUTES[TIME_STEPS_MINUTES.len() - 1] * MINUTE_MS);

    let start = window.start_ms.ceil() as i64;
    let end = window.end_ms.floor() as i64;
    let local_start = start + offset_ms;
    let mut tick = local_start.div_euclid(step) * step - offset_ms;
    if tick < start {
        tick += step;
    }
    while tick <= end && ticks.len() < AXIS_MAX_TICKS {
        ticks.push(tick);
        tick += step;
    }
    ticks
}
