use approx::assert_abs_diff_eq;
use telemetry_chart::api::{PLACEHOLDER_TEXT, TelemetryConfig, TelemetryEngine};
use telemetry_chart::core::{
    KeyValueStore, ManualClock, MemoryKeyValueStore, SampleOutcome, SensorSources, StateTable,
    Surface,
};
use telemetry_chart::interaction::{GestureTarget, PointerEvent};
use telemetry_chart::render::{CanvasLayerKind, NullRenderer, TextHAlign};

type TestEngine = TelemetryEngine<NullRenderer, MemoryKeyValueStore, ManualClock>;

// 2024-03-01T12:34:00Z
const T0: i64 = 1_709_296_440_000;
const MINUTE: i64 = 60_000;

fn config() -> TelemetryConfig {
    TelemetryConfig::default().with_sensors(SensorSources {
        temperature: Some("sensor.temp".to_owned()),
        humidity: Some("sensor.humidity".to_owned()),
        ..SensorSources::default()
    })
}

fn engine_with(clock: &ManualClock, storage: MemoryKeyValueStore) -> TestEngine {
    TelemetryEngine::with_clock(NullRenderer::default(), storage, clock.clone(), config())
        .expect("engine init")
}

fn states() -> StateTable {
    [("sensor.temp", "21.5"), ("sensor.humidity", "48")]
        .into_iter()
        .collect()
}

fn surface() -> Surface {
    Surface::new(360, 180, 2.0)
}

/// Samples `count` passes one minute apart starting at `T0`.
fn sample_minutes(engine: &mut TestEngine, clock: &ManualClock, source: &StateTable, count: i64) {
    for minute in 0..count {
        clock.set(T0 + minute * MINUTE);
        assert!(engine.sample(source).is_sampled());
    }
}

#[test]
fn engine_samples_and_renders_series() {
    let clock = ManualClock::new(T0);
    let mut engine = engine_with(&clock, MemoryKeyValueStore::new());
    let source = states();

    assert_eq!(
        engine.sample(&source),
        SampleOutcome::Sampled { recorded: 2, skipped: 0 }
    );
    assert!(matches!(engine.sample(&source), SampleOutcome::NotDue { .. }));
    clock.advance(MINUTE);
    assert!(engine.sample(&source).is_sampled());

    assert_eq!(engine.history("temperature").len(), 2);
    assert_eq!(engine.history("humidity").len(), 2);
    assert!(engine.render(surface(), "temperature").expect("render"));

    let renderer = engine.into_renderer();
    assert_eq!(renderer.frames_rendered, 1);
    assert_eq!(renderer.last_backing_size, Some((720, 360)));
    assert!(renderer.last_primitive_count > 0);
}

#[test]
fn render_is_a_no_op_below_two_samples() {
    let clock = ManualClock::new(T0);
    let mut engine = engine_with(&clock, MemoryKeyValueStore::new());
    engine.sample(&states());

    assert!(!engine.render(surface(), "temperature").expect("render"));
    assert!(!engine.render(surface(), "missing").expect("render"));
    assert_eq!(engine.renderer().frames_rendered, 0);
}

#[test]
fn empty_catalog_renders_placeholder() {
    let clock = ManualClock::new(T0);
    let mut engine = engine_with(&clock, MemoryKeyValueStore::new());
    let offline = StateTable::new();

    assert!(engine.series(&offline).is_empty());
    assert!(engine.render_current(surface(), &offline).expect("render"));
    let frame = engine
        .renderer()
        .last_frame
        .clone()
        .expect("placeholder frame");
    let texts: Vec<&str> = frame.texts().map(|text| text.text.as_str()).collect();
    assert_eq!(texts, vec![PLACEHOLDER_TEXT]);
}

#[test]
fn redraw_requests_are_coalesced_per_animation_frame() {
    let clock = ManualClock::new(T0);
    let mut engine = engine_with(&clock, MemoryKeyValueStore::new());
    let source = states();
    sample_minutes(&mut engine, &clock, &source, 2);

    assert!(engine.redraw_scheduler().is_pending());
    assert!(!engine.request_redraw());
    assert!(engine.on_animation_frame(surface(), &source).expect("frame"));
    assert!(!engine.on_animation_frame(surface(), &source).expect("frame"));
    assert_eq!(engine.renderer().frames_rendered, 1);
}

#[test]
fn history_is_persisted_and_lazily_reloaded() {
    let clock = ManualClock::new(T0);
    let mut engine = engine_with(&clock, MemoryKeyValueStore::new());
    sample_minutes(&mut engine, &clock, &states(), 3);
    let history_key = engine.history_key().to_owned();
    let storage = engine.into_storage();
    assert!(storage.get(&history_key).is_some());

    let mut reloaded = engine_with(&clock, storage);
    assert!(!reloaded.is_history_loaded());
    assert_eq!(reloaded.history("temperature").len(), 3);
    assert!(reloaded.is_history_loaded());
}

#[test]
fn storage_failures_do_not_lose_samples() {
    let clock = ManualClock::new(T0);
    let mut engine = engine_with(&clock, MemoryKeyValueStore::with_quota(8));
    sample_minutes(&mut engine, &clock, &states(), 2);

    assert_eq!(engine.history("temperature").len(), 2);
    assert!(engine.storage().is_empty());
}

#[test]
fn chart_input_is_ignored_for_short_series() {
    let clock = ManualClock::new(T0);
    let mut engine = engine_with(&clock, MemoryKeyValueStore::new());
    engine.sample(&states());

    let changed = engine
        .chart_pointer("temperature", PointerEvent::Wheel { delta_y: 1.0 }, surface())
        .expect("pointer");
    assert!(!changed);
    assert_abs_diff_eq!(engine.viewport_state("temperature").scale, 1.0, epsilon = 1e-12);
}

#[test]
fn wheel_zoom_updates_viewport_and_requests_redraw() {
    let clock = ManualClock::new(T0);
    let mut engine = engine_with(&clock, MemoryKeyValueStore::new());
    let source = states();
    sample_minutes(&mut engine, &clock, &source, 3);
    assert!(engine.on_animation_frame(surface(), &source).expect("frame"));

    let changed = engine
        .pointer(
            GestureTarget::Chart,
            PointerEvent::Wheel { delta_y: 1.0 },
            surface(),
            &source,
        )
        .expect("pointer");
    assert!(changed);
    assert_abs_diff_eq!(engine.viewport_state("temperature").scale, 1.2, epsilon = 1e-12);
    assert!(engine.redraw_scheduler().is_pending());
}

#[test]
fn hover_shows_time_value_and_unit() {
    let clock = ManualClock::new(T0);
    let mut engine = engine_with(&clock, MemoryKeyValueStore::new());
    let source = states();
    sample_minutes(&mut engine, &clock, &source, 2);

    // Right edge of the plot is the newest sample.
    engine
        .chart_pointer("temperature", PointerEvent::Move { x: 349.0, y: 60.0 }, surface())
        .expect("pointer");
    assert_eq!(engine.viewport_state("temperature").hover_index, Some(1));

    let frame = engine
        .build_frame(surface(), "temperature")
        .expect("frame")
        .expect("enough samples");
    let overlay = frame.layer(CanvasLayerKind::Overlay).expect("overlay layer");
    assert_eq!(overlay.texts.len(), 1);
    assert_eq!(overlay.texts[0].text, "12:35 · 21.5 °C");
}

#[test]
fn container_swipe_cycles_through_series() {
    let clock = ManualClock::new(T0);
    let mut engine = engine_with(&clock, MemoryKeyValueStore::new());
    let source = states();
    let swipe_left = |engine: &mut TestEngine| {
        for event in [
            PointerEvent::Down { x: 200.0, y: 50.0 },
            PointerEvent::Move { x: 160.0, y: 50.0 },
            PointerEvent::Up { x: 100.0, y: 50.0 },
        ] {
            engine
                .pointer(GestureTarget::Container, event, surface(), &source)
                .expect("pointer");
        }
    };

    assert_eq!(
        engine.current_series(&source).map(|series| series.key),
        Some("temperature".to_owned())
    );
    swipe_left(&mut engine);
    assert_eq!(
        engine.current_series(&source).map(|series| series.key),
        Some("humidity".to_owned())
    );
    swipe_left(&mut engine);
    assert_eq!(engine.carousel_index(), 0);
}

#[test]
fn carousel_index_is_clamped_when_series_disappear() {
    let clock = ManualClock::new(T0);
    let mut engine = engine_with(&clock, MemoryKeyValueStore::new());
    let mut source = states();
    engine.next_series(&source);
    assert_eq!(engine.carousel_index(), 1);

    source.set_state("sensor.humidity", "unavailable");
    assert_eq!(
        engine.current_series(&source).map(|series| series.key),
        Some("temperature".to_owned())
    );
}

#[test]
fn reconfigure_resets_viewports_and_keeps_history() {
    let clock = ManualClock::new(T0);
    let mut engine = engine_with(&clock, MemoryKeyValueStore::new());
    let source = states();
    sample_minutes(&mut engine, &clock, &source, 3);
    engine
        .chart_pointer("temperature", PointerEvent::Wheel { delta_y: 1.0 }, surface())
        .expect("pointer");

    engine
        .reconfigure(config().with_max_samples(2))
        .expect("reconfigure");
    assert_abs_diff_eq!(engine.viewport_state("temperature").scale, 1.0, epsilon = 1e-12);
    assert_eq!(engine.history("temperature").len(), 2);
    assert!(engine.sampler().is_due(clock_now(&clock)));
}

#[test]
fn reconfigure_rejects_invalid_settings() {
    let clock = ManualClock::new(T0);
    let mut engine = engine_with(&clock, MemoryKeyValueStore::new());
    let err = engine
        .reconfigure(config().with_history_retention_hours(0.0))
        .expect_err("zero retention must fail");
    assert!(matches!(err, telemetry_chart::ChartError::InvalidConfig(_)));
}

#[test]
fn reads_drop_samples_that_expired_since_the_last_pass() {
    let clock = ManualClock::new(T0);
    let config = config()
        .with_history_retention_hours(1.0)
        .with_sample_interval_seconds(600.0);
    let mut engine = TelemetryEngine::with_clock(
        NullRenderer::default(),
        MemoryKeyValueStore::new(),
        clock.clone(),
        config,
    )
    .expect("engine init");
    let source = states();
    assert!(engine.sample(&source).is_sampled());
    clock.advance(10 * MINUTE);
    assert!(engine.sample(&source).is_sampled());
    assert!(engine.build_frame(surface(), "temperature").expect("frame").is_some());

    // No sampling pass runs while the clock moves past retention.
    clock.set(T0 + 75 * MINUTE);
    assert!(engine.history("temperature").is_empty());
    assert!(engine.build_frame(surface(), "temperature").expect("frame").is_none());
    let changed = engine
        .chart_pointer("temperature", PointerEvent::Wheel { delta_y: 1.0 }, surface())
        .expect("pointer");
    assert!(!changed);
}

#[test]
fn narrow_value_range_gets_distinct_axis_labels() {
    let clock = ManualClock::new(T0);
    let config = TelemetryConfig::default()
        .with_sensors(SensorSources {
            pressure: Some("sensor.pressure".to_owned()),
            ..SensorSources::default()
        })
        .with_smoothing_factor(0.0);
    let mut engine = TelemetryEngine::with_clock(
        NullRenderer::default(),
        MemoryKeyValueStore::new(),
        clock.clone(),
        config,
    )
    .expect("engine init");
    for (minute, reading) in [(0, "1013.200"), (1, "1013.204"), (2, "1013.210")] {
        clock.set(T0 + minute * MINUTE);
        let source: StateTable = [("sensor.pressure", reading)].into_iter().collect();
        assert!(engine.sample(&source).is_sampled());
    }

    let frame = engine
        .build_frame(surface(), "pressure")
        .expect("frame")
        .expect("enough samples");
    let axis = frame.layer(CanvasLayerKind::Axis).expect("axis layer");
    let labels: Vec<&str> = axis
        .texts
        .iter()
        .filter(|text| text.h_align == TextHAlign::Right)
        .map(|text| text.text.as_str())
        .collect();
    assert!(labels.len() >= 2, "labels: {labels:?}");
    for (index, label) in labels.iter().enumerate() {
        assert!(!labels[index + 1..].contains(label), "repeated label in {labels:?}");
        assert!(label.starts_with("1013.2"), "label: {label}");
    }
}

fn clock_now(clock: &ManualClock) -> i64 {
    use telemetry_chart::core::Clock;
    clock.now_ms()
}
