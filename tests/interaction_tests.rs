use approx::assert_abs_diff_eq;
use telemetry_chart::core::{TimeWindow, resolve_visible_window};
use telemetry_chart::interaction::{
    InteractionContext, InteractionMode, MAX_ZOOM_SCALE, MIN_ZOOM_SCALE, PointerEvent,
    SeriesCarousel, SwipeOutcome, SwipeRecognizer, ViewportState,
};

const XS: [f64; 3] = [10.0, 20.0, 30.0];

fn context() -> InteractionContext<'static> {
    InteractionContext {
        bounds: TimeWindow::new(0.0, 100_000.0),
        base_window_ms: 10_000.0,
        plot_left: 10.0,
        plot_right: 30.0,
        ms_per_px: 100.0,
        plotted_xs: &XS,
        first_plotted_index: 0,
    }
}

#[test]
fn wheel_zoom_scales_by_fixed_factor_and_clamps() {
    let ctx = context();
    let state = ViewportState::default().apply(PointerEvent::Wheel { delta_y: 1.0 }, &ctx);
    assert_abs_diff_eq!(state.scale, 1.2, epsilon = 1e-12);

    let mut zoomed_out = state;
    for _ in 0..30 {
        zoomed_out = zoomed_out.apply(PointerEvent::Wheel { delta_y: 3.0 }, &ctx);
    }
    assert_abs_diff_eq!(zoomed_out.scale, MAX_ZOOM_SCALE, epsilon = 1e-12);

    let mut zoomed_in = zoomed_out;
    for _ in 0..30 {
        zoomed_in = zoomed_in.apply(PointerEvent::Wheel { delta_y: -3.0 }, &ctx);
    }
    assert_abs_diff_eq!(zoomed_in.scale, MIN_ZOOM_SCALE, epsilon = 1e-12);
    assert_eq!(zoomed_in.mode(), InteractionMode::Idle);
}

#[test]
fn wheel_with_zero_delta_changes_nothing() {
    let ctx = context();
    let state = ViewportState::default();
    assert_eq!(state.apply(PointerEvent::Wheel { delta_y: 0.0 }, &ctx), state);
}

#[test]
fn drag_pans_back_in_time_and_clamps_to_bounds() {
    let ctx = context();
    let state = ViewportState::default()
        .apply(PointerEvent::Down { x: 100.0, y: 5.0 }, &ctx);
    assert_eq!(state.mode(), InteractionMode::Dragging);

    let state = state.apply(PointerEvent::Move { x: 150.0, y: 5.0 }, &ctx);
    assert_abs_diff_eq!(state.offset_ms, 5_000.0, epsilon = 1e-9);

    // Window is 10 s wide inside 100 s of data.
    let state = state.apply(PointerEvent::Move { x: 10_000.0, y: 5.0 }, &ctx);
    assert_abs_diff_eq!(state.offset_ms, 90_000.0, epsilon = 1e-9);

    let state = state.apply(PointerEvent::Move { x: -10_000.0, y: 5.0 }, &ctx);
    assert_abs_diff_eq!(state.offset_ms, 0.0, epsilon = 1e-9);

    let state = state.apply(PointerEvent::Up { x: -10_000.0, y: 5.0 }, &ctx);
    assert_eq!(state.mode(), InteractionMode::Idle);
}

#[test]
fn cancel_ends_a_drag() {
    let ctx = context();
    let state = ViewportState::default()
        .apply(PointerEvent::Down { x: 10.0, y: 5.0 }, &ctx)
        .apply(PointerEvent::Cancel, &ctx);
    assert_eq!(state.mode(), InteractionMode::Idle);
}

#[test]
fn idle_move_hovers_nearest_plotted_point() {
    let ctx = context();
    let state = ViewportState::default();
    assert_eq!(state.apply(PointerEvent::Move { x: 24.0, y: 0.0 }, &ctx).hover_index, Some(1));
    assert_eq!(state.apply(PointerEvent::Move { x: 26.0, y: 0.0 }, &ctx).hover_index, Some(2));
    assert_eq!(state.apply(PointerEvent::Move { x: 10.0, y: 0.0 }, &ctx).hover_index, Some(0));
    assert_eq!(state.apply(PointerEvent::Move { x: 5.0, y: 0.0 }, &ctx).hover_index, None);
    assert_eq!(state.apply(PointerEvent::Move { x: 31.0, y: 0.0 }, &ctx).hover_index, None);
}

#[test]
fn hover_index_is_offset_past_skipped_points() {
    let ctx = InteractionContext {
        first_plotted_index: 1,
        ..context()
    };
    assert_eq!(ctx.nearest_index(10.0), Some(1));
    assert_eq!(ctx.nearest_index(29.0), Some(3));
}

#[test]
fn dragging_clears_hover() {
    let ctx = context();
    let state = ViewportState::default()
        .apply(PointerEvent::Move { x: 20.0, y: 0.0 }, &ctx)
        .apply(PointerEvent::Down { x: 20.0, y: 0.0 }, &ctx);
    assert_eq!(state.hover_index, Some(1));

    let state = state.apply(PointerEvent::Move { x: 25.0, y: 0.0 }, &ctx);
    assert_eq!(state.hover_index, None);
    assert_eq!(state.mode(), InteractionMode::Dragging);
}

#[test]
fn leave_clears_hover() {
    let ctx = context();
    let state = ViewportState::default()
        .apply(PointerEvent::Move { x: 20.0, y: 0.0 }, &ctx)
        .apply(PointerEvent::Leave, &ctx);
    assert_eq!(state.hover_index, None);
}

#[test]
fn visible_window_width_follows_scale_and_offset() {
    let bounds = TimeWindow::new(0.0, 24.0 * 3_600_000.0);
    let base = 3.0 * 3_600_000.0;

    let latest = resolve_visible_window(bounds, 1.0, 0.0, base);
    assert_abs_diff_eq!(latest.end_ms, bounds.end_ms, epsilon = 1e-6);
    assert_abs_diff_eq!(latest.span_ms(), base, epsilon = 1e-6);

    let widest = resolve_visible_window(bounds, 8.0, 0.0, base);
    assert_eq!(widest, bounds);

    let panned = resolve_visible_window(bounds, 1.0, 1e12, base);
    assert_abs_diff_eq!(panned.start_ms, bounds.start_ms, epsilon = 1e-6);
}

#[test]
fn swipe_left_past_threshold_advances_and_wraps() {
    let mut recognizer = SwipeRecognizer::new(50.0);
    let mut carousel = SeriesCarousel::new(1);

    recognizer.handle(PointerEvent::Down { x: 200.0, y: 40.0 });
    recognizer.handle(PointerEvent::Move { x: 150.0, y: 40.0 });
    assert_abs_diff_eq!(recognizer.translation_px(), -50.0, epsilon = 1e-12);
    let outcome = recognizer.handle(PointerEvent::Up { x: 120.0, y: 40.0 });
    assert_eq!(outcome, SwipeOutcome::Next);

    carousel.next(2);
    assert_eq!(carousel.index(), 0);
    assert_abs_diff_eq!(recognizer.translation_px(), 0.0, epsilon = 1e-12);
}

#[test]
fn short_swipe_snaps_back() {
    let mut recognizer = SwipeRecognizer::default();
    recognizer.handle(PointerEvent::Down { x: 200.0, y: 40.0 });
    let outcome = recognizer.handle(PointerEvent::Up { x: 230.0, y: 40.0 });
    assert_eq!(outcome, SwipeOutcome::SnapBack);
    assert!(!recognizer.is_active());
}

#[test]
fn swipe_right_goes_to_previous() {
    let mut recognizer = SwipeRecognizer::default();
    recognizer.handle(PointerEvent::Down { x: 100.0, y: 40.0 });
    let outcome = recognizer.handle(PointerEvent::Up { x: 200.0, y: 40.0 });
    assert_eq!(outcome, SwipeOutcome::Previous);
}
