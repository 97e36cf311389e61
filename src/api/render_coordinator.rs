use tracing::{debug, trace};

use crate::core::{Clock, KeyValueStore, NumericSource, Surface};
use crate::error::{ChartError, ChartResult};
use crate::render::{RenderFrame, Renderer};

use super::chart_frame_builder::{FrameDecorations, build_chart_frame, build_placeholder_frame};
use super::engine::ensure_history;
use super::{ChartLayout, TelemetryEngine};

impl<R: Renderer, K: KeyValueStore, C: Clock> TelemetryEngine<R, K, C> {
    /// Builds the frame for `series_key` without drawing it.
    ///
    /// Returns `None` when the series has fewer than 2 samples. Neither the
    /// history nor any viewport state is modified.
    pub fn build_frame(
        &mut self,
        surface: Surface,
        series_key: &str,
    ) -> ChartResult<Option<RenderFrame>> {
        let now_ms = self.clock.now_ms();
        let params = self.layout_params();
        let label_offset = self.label_offset();
        let state = self.viewports.get_or_default(series_key);
        let samples = ensure_history(
            &mut self.history,
            &self.storage,
            &self.history_key,
            self.history_limits,
            now_ms,
        )
        .read(series_key);

        let Some(layout) = ChartLayout::compute(surface, &self.style, samples, state, params)?
        else {
            trace!(series_key, "not enough samples to draw");
            return Ok(None);
        };
        let unit = self
            .catalog
            .find(series_key)
            .map(|series| series.unit.as_str())
            .unwrap_or_default();
        let frame = build_chart_frame(
            &layout,
            FrameDecorations {
                style: &self.style,
                unit,
                hover_index: state.hover_index,
                label_offset,
            },
        )?;
        Ok(Some(frame))
    }

    /// Frame for the carousel's current series, or the placeholder frame
    /// when no series is available.
    pub fn current_frame<S: NumericSource + ?Sized>(
        &mut self,
        surface: Surface,
        source: &S,
    ) -> ChartResult<Option<RenderFrame>> {
        match self.current_series(source) {
            Some(series) => self.build_frame(surface, &series.key),
            None => {
                surface_or_error(surface)?;
                Ok(Some(build_placeholder_frame(surface, &self.style)))
            }
        }
    }

    /// Draws `series_key`; a no-op returning `false` below 2 samples.
    pub fn render(&mut self, surface: Surface, series_key: &str) -> ChartResult<bool> {
        let Some(frame) = self.build_frame(surface, series_key)? else {
            return Ok(false);
        };
        self.renderer.render(&frame)?;
        debug!(
            series_key,
            primitives = frame.primitive_count(),
            "rendered chart frame"
        );
        Ok(true)
    }

    /// Draws the current series or the placeholder.
    pub fn render_current<S: NumericSource + ?Sized>(
        &mut self,
        surface: Surface,
        source: &S,
    ) -> ChartResult<bool> {
        let Some(frame) = self.current_frame(surface, source)? else {
            return Ok(false);
        };
        self.renderer.render(&frame)?;
        Ok(true)
    }

    /// Animation-frame callback: renders once if a redraw is pending.
    pub fn on_animation_frame<S: NumericSource + ?Sized>(
        &mut self,
        surface: Surface,
        source: &S,
    ) -> ChartResult<bool> {
        if !self.redraw.take_pending() {
            return Ok(false);
        }
        self.render_current(surface, source)
    }

    /// Asks for a redraw on the next animation frame.
    ///
    /// Returns `false` when one was already pending.
    pub fn request_redraw(&mut self) -> bool {
        self.redraw.request()
    }
}

fn surface_or_error(surface: Surface) -> ChartResult<()> {
    if surface.is_valid() {
        Ok(())
    } else {
        Err(ChartError::InvalidViewport {
            width: surface.viewport.width,
            height: surface.viewport.height,
        })
    }
}
