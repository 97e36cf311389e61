use tracing::{debug, trace};

use crate::core::{Clock, KeyValueStore, NumericSource, SeriesDescriptor, Surface};
use crate::error::ChartResult;
use crate::interaction::{GestureTarget, PointerEvent, SwipeOutcome, ViewportState};
use crate::render::Renderer;

use super::engine::ensure_history;
use super::{ChartLayout, TelemetryEngine};

impl<R: Renderer, K: KeyValueStore, C: Clock> TelemetryEngine<R, K, C> {
    /// Routes one pointer event to the chart or the container gesture.
    ///
    /// Chart events apply to the series currently shown by the carousel.
    /// Returns whether visible state changed.
    pub fn pointer<S: NumericSource + ?Sized>(
        &mut self,
        target: GestureTarget,
        event: PointerEvent,
        surface: Surface,
        source: &S,
    ) -> ChartResult<bool> {
        match target {
            GestureTarget::Chart => {
                let Some(series) = self.current_series(source) else {
                    return Ok(false);
                };
                self.chart_pointer(&series.key, event, surface)
            }
            GestureTarget::Container => {
                let outcome = self.container_pointer(event, source);
                Ok(outcome != SwipeOutcome::Pending || self.swipe.is_active())
            }
        }
    }

    /// Applies pan, zoom or hover input to the viewport of `series_key`.
    ///
    /// Series with fewer than 2 samples ignore input entirely.
    pub fn chart_pointer(
        &mut self,
        series_key: &str,
        event: PointerEvent,
        surface: Surface,
    ) -> ChartResult<bool> {
        let now_ms = self.clock.now_ms();
        let params = self.layout_params();
        let samples = ensure_history(
            &mut self.history,
            &self.storage,
            &self.history_key,
            self.history_limits,
            now_ms,
        )
        .read(series_key);
        if samples.len() < 2 {
            trace!(series_key, "ignoring pointer input on short series");
            return Ok(false);
        }

        let state = self.viewports.get_or_default(series_key);
        let Some(layout) = ChartLayout::compute(surface, &self.style, samples, state, params)?
        else {
            return Ok(false);
        };
        let next = state.apply(event, &layout.interaction_context(params.base_window_ms));
        *self.viewports.entry(series_key) = next;

        let changed = next != state;
        if changed {
            trace!(
                series_key,
                scale = next.scale,
                offset_ms = next.offset_ms,
                hover_index = ?next.hover_index,
                "viewport updated"
            );
            self.redraw.request();
        }
        Ok(changed)
    }

    /// Feeds the container swipe recognizer and switches series on a swipe.
    pub fn container_pointer<S: NumericSource + ?Sized>(
        &mut self,
        event: PointerEvent,
        source: &S,
    ) -> SwipeOutcome {
        let before = self.swipe.translation_px();
        let outcome = self.swipe.handle(event);
        match outcome {
            SwipeOutcome::Next => {
                self.next_series(source);
            }
            SwipeOutcome::Previous => {
                self.previous_series(source);
            }
            SwipeOutcome::SnapBack => {
                self.redraw.request();
            }
            SwipeOutcome::Pending => {
                if self.swipe.translation_px() != before {
                    self.redraw.request();
                }
            }
        }
        outcome
    }

    /// Advances the carousel with wrap-around; `None` when no series exists.
    pub fn next_series<S: NumericSource + ?Sized>(
        &mut self,
        source: &S,
    ) -> Option<SeriesDescriptor> {
        let series = self.catalog.resolve(source);
        self.carousel.next(series.len());
        self.on_series_switched(&series)
    }

    /// Steps the carousel back with wrap-around; `None` when no series exists.
    pub fn previous_series<S: NumericSource + ?Sized>(
        &mut self,
        source: &S,
    ) -> Option<SeriesDescriptor> {
        let series = self.catalog.resolve(source);
        self.carousel.previous(series.len());
        self.on_series_switched(&series)
    }

    /// Series shown right now, with the carousel index clamped to the list.
    pub fn current_series<S: NumericSource + ?Sized>(&self, source: &S) -> Option<SeriesDescriptor> {
        let series = self.catalog.resolve(source);
        self.carousel.current(&series).cloned()
    }

    #[must_use]
    pub fn carousel_index(&self) -> usize {
        self.carousel.index()
    }

    /// Content translation to apply while a swipe is in progress.
    #[must_use]
    pub fn swipe_translation_px(&self) -> f64 {
        self.swipe.translation_px()
    }

    /// Viewport of `series_key`, or the default one before any interaction.
    #[must_use]
    pub fn viewport_state(&self, series_key: &str) -> ViewportState {
        self.viewports.get_or_default(series_key)
    }

    fn on_series_switched(&mut self, series: &[SeriesDescriptor]) -> Option<SeriesDescriptor> {
        let current = self.carousel.current(series).cloned();
        if let Some(current) = &current {
            debug!(series_key = %current.key, index = self.carousel.index(), "series switched");
            self.redraw.request();
        }
        current
    }
}
