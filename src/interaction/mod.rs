//! Pointer-driven chart state.
//!
//! Every handler is a pure transition `(state, event, context) -> state` so
//! pan, zoom and hover logic can be exercised without a pointer device.

mod carousel;
mod swipe;

pub use carousel::SeriesCarousel;
pub use swipe::{DEFAULT_SWIPE_THRESHOLD_PX, SwipeOutcome, SwipeRecognizer};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::windowing::{TimeWindow, max_pan_offset_ms};

pub const MIN_ZOOM_SCALE: f64 = 1.0;
pub const MAX_ZOOM_SCALE: f64 = 8.0;
/// Scale multiplier applied per wheel notch.
pub const WHEEL_ZOOM_FACTOR: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Dragging,
}

/// Which element a pointer event was delivered to.
///
/// `Chart` drives pan, zoom and hover; `Container` drives series swipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureTarget {
    Chart,
    Container,
}

/// Raw pointer input in logical coordinates relative to the render target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    Cancel,
    Leave,
    /// Positive `delta_y` zooms out (wider window), negative zooms in.
    Wheel { delta_y: f64 },
}

/// Geometry of the currently drawn chart needed to interpret pointer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionContext<'a> {
    /// Full data time bounds of the series.
    pub bounds: TimeWindow,
    pub base_window_ms: f64,
    pub plot_left: f64,
    pub plot_right: f64,
    /// Time covered by one horizontal logical pixel of the plot.
    pub ms_per_px: f64,
    /// X coordinates of the hoverable plotted points, ascending.
    pub plotted_xs: &'a [f64],
    /// Plotted index of `plotted_xs[0]`.
    pub first_plotted_index: usize,
}

impl InteractionContext<'_> {
    /// Index of the plotted point nearest to `x`, `None` outside the plot.
    #[must_use]
    pub fn nearest_index(&self, x: f64) -> Option<usize> {
        if !x.is_finite() || x < self.plot_left || x > self.plot_right {
            return None;
        }
        let xs = self.plotted_xs;
        if xs.is_empty() {
            return None;
        }

        let upper = xs.partition_point(|candidate| *candidate < x);
        let nearest = if upper == 0 {
            0
        } else if upper >= xs.len() {
            xs.len() - 1
        } else if (x - xs[upper - 1]).abs() <= (xs[upper] - x).abs() {
            upper - 1
        } else {
            upper
        };
        Some(self.first_plotted_index + nearest)
    }
}

/// Per-series zoom, pan and hover state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    /// Window width multiplier in `[1, 8]`; larger shows more history.
    pub scale: f64,
    /// Pan distance back from the newest sample, in milliseconds.
    pub offset_ms: f64,
    pub hover_index: Option<usize>,
    pub dragging: bool,
    pub last_pointer_x: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scale: MIN_ZOOM_SCALE,
            offset_ms: 0.0,
            hover_index: None,
            dragging: false,
            last_pointer_x: 0.0,
        }
    }
}

impl ViewportState {
    #[must_use]
    pub fn mode(self) -> InteractionMode {
        if self.dragging {
            InteractionMode::Dragging
        } else {
            InteractionMode::Idle
        }
    }

    /// Applies one pointer event and returns the next state.
    #[must_use]
    pub fn apply(self, event: PointerEvent, context: &InteractionContext<'_>) -> Self {
        match event {
            PointerEvent::Down { x, .. } => self.on_pointer_down(x),
            PointerEvent::Move { x, .. } => self.on_pointer_move(x, context),
            PointerEvent::Up { .. } | PointerEvent::Cancel => self.on_pointer_release(),
            PointerEvent::Leave => self.on_pointer_leave(),
            PointerEvent::Wheel { delta_y } => self.on_wheel(delta_y, context),
        }
    }

    #[must_use]
    pub fn on_pointer_down(mut self, x: f64) -> Self {
        if !x.is_finite() {
            return self;
        }
        self.dragging = true;
        self.last_pointer_x = x;
        self
    }

    #[must_use]
    pub fn on_pointer_move(mut self, x: f64, context: &InteractionContext<'_>) -> Self {
        if !x.is_finite() {
            return self;
        }
        if self.dragging {
            let delta_px = x - self.last_pointer_x;
            self.last_pointer_x = x;
            if context.ms_per_px.is_finite() {
                self.offset_ms += delta_px * context.ms_per_px;
            }
            // Panning moves plotted points under the pointer.
            self.hover_index = None;
            return self.clamped(context.bounds, context.base_window_ms);
        }
        self.hover_index = context.nearest_index(x);
        self
    }

    #[must_use]
    pub fn on_pointer_release(mut self) -> Self {
        self.dragging = false;
        self
    }

    #[must_use]
    pub fn on_pointer_leave(mut self) -> Self {
        self.hover_index = None;
        self
    }

    #[must_use]
    pub fn on_wheel(mut self, delta_y: f64, context: &InteractionContext<'_>) -> Self {
        if !delta_y.is_finite() || delta_y == 0.0 {
            return self;
        }
        let factor = if delta_y > 0.0 {
            WHEEL_ZOOM_FACTOR
        } else {
            WHEEL_ZOOM_FACTOR.recip()
        };
        self.scale *= factor;
        // Plotted points move under the pointer after a zoom.
        self.hover_index = None;
        self.clamped(context.bounds, context.base_window_ms)
    }

    /// Clamps scale to `[1, 8]` and the pan offset to the data bounds.
    #[must_use]
    pub fn clamped(mut self, bounds: TimeWindow, base_window_ms: f64) -> Self {
        self.scale = if self.scale.is_finite() {
            self.scale.clamp(MIN_ZOOM_SCALE, MAX_ZOOM_SCALE)
        } else {
            MIN_ZOOM_SCALE
        };
        let width = (base_window_ms * self.scale).min(bounds.span_ms());
        let max_offset = max_pan_offset_ms(bounds, width);
        self.offset_ms = if self.offset_ms.is_finite() {
            self.offset_ms.clamp(0.0, max_offset)
        } else {
            0.0
        };
        self
    }
}

/// Lazily created viewport states keyed by series key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewportStates {
    states: HashMap<String, ViewportState>,
}

impl ViewportStates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, series_key: &str) -> Option<&ViewportState> {
        self.states.get(series_key)
    }

    /// State for `series_key`, or the default state when none was created yet.
    #[must_use]
    pub fn get_or_default(&self, series_key: &str) -> ViewportState {
        self.states.get(series_key).copied().unwrap_or_default()
    }

    pub fn entry(&mut self, series_key: &str) -> &mut ViewportState {
        self.states.entry(series_key.to_owned()).or_default()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
