use chrono::{DateTime, FixedOffset, Offset, Utc};

const TIME_OF_DAY_PATTERN: &str = "%H:%M";
const TOOLTIP_PRECISION: usize = 1;
const MAX_VALUE_PRECISION: usize = 6;

/// Fixed offset for time labels; out-of-range offsets fall back to UTC.
pub(super) fn label_offset(utc_offset_minutes: i32) -> FixedOffset {
    utc_offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

pub(super) fn format_time_of_day(timestamp_ms: i64, offset: FixedOffset) -> String {
    match DateTime::<Utc>::from_timestamp_millis(timestamp_ms) {
        Some(instant) => instant
            .with_timezone(&offset)
            .format(TIME_OF_DAY_PATTERN)
            .to_string(),
        None => "--:--".to_owned(),
    }
}

/// Decimal places needed to tell apart ticks spaced `step` apart.
pub(super) fn value_precision(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 {
        return 1;
    }
    // Nudge so exact powers of ten do not gain a digit from log10 rounding.
    let decimals = -(step.log10() + 1e-9).floor();
    (decimals.max(0.0) as usize).min(MAX_VALUE_PRECISION)
}

pub(super) fn format_value(value: f64, precision: usize) -> String {
    let text = format!("{value:.precision$}");
    // "-0.0" reads as noise on an axis.
    match text.strip_prefix('-') {
        Some(rest) if rest.chars().all(|ch| ch == '0' || ch == '.') => rest.to_owned(),
        _ => text,
    }
}

/// Floating hover label: `HH:MM · value unit`.
pub(super) fn format_tooltip(
    timestamp_ms: i64,
    value: f64,
    unit: &str,
    offset: FixedOffset,
) -> String {
    let time = format_time_of_day(timestamp_ms, offset);
    let value = format_value(value, TOOLTIP_PRECISION);
    let unit = unit.trim();
    if unit.is_empty() {
        format!("{time} · {value}")
    } else {
        format!("{time} · {value} {unit}")
    }
}

#[cfg(test)]
mod tests {
    use super::{format_time_of_day, format_tooltip, format_value, label_offset, value_precision};

    // 2024-03-01T12:34:00Z
    const NOON_MS: i64 = 1_709_296_440_000;

    #[test]
    fn time_of_day_honors_offset() {
        assert_eq!(format_time_of_day(NOON_MS, label_offset(0)), "12:34");
        assert_eq!(format_time_of_day(NOON_MS, label_offset(90)), "14:04");
        assert_eq!(format_time_of_day(NOON_MS, label_offset(-60)), "11:34");
    }

    #[test]
    fn absurd_offset_falls_back_to_utc() {
        assert_eq!(format_time_of_day(NOON_MS, label_offset(i32::MAX)), "12:34");
    }

    #[test]
    fn precision_follows_tick_step() {
        assert_eq!(value_precision(5.0), 0);
        assert_eq!(value_precision(0.5), 1);
        assert_eq!(value_precision(0.02), 2);
        assert_eq!(value_precision(0.1), 1);
        assert_eq!(value_precision(0.002), 3);
        assert_eq!(value_precision(0.005), 3);
        assert_eq!(value_precision(1e-12), 6);
    }

    #[test]
    fn negative_zero_is_printed_without_sign() {
        assert_eq!(format_value(-0.01, 1), "0.0");
        assert_eq!(format_value(-1.26, 1), "-1.3");
    }

    #[test]
    fn tooltip_joins_time_value_and_unit() {
        let offset = label_offset(0);
        assert_eq!(format_tooltip(NOON_MS, 21.46, "°C", offset), "12:34 · 21.5 °C");
        assert_eq!(format_tooltip(NOON_MS, 3.0, "", offset), "12:34 · 3.0");
    }
}
