use std::ops::Range;

use crate::core::windowing::samples_in_window_with_edges;
use crate::core::{
    LinearScale, Sample, Surface, TimeWindow, reduce_and_smooth, resolve_visible_window,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{InteractionContext, ViewportState};
use crate::render::Point;

use super::ChartStyle;

/// Minimum plot extent kept when paddings eat the whole surface.
const MIN_PLOT_EXTENT_PX: f64 = 1.0;

/// Plot area in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotRect {
    fn inset(surface: Surface, style: &ChartStyle) -> Self {
        let width = surface.width();
        let height = surface.height();
        let left = style
            .plot_padding_left_px
            .min(width - MIN_PLOT_EXTENT_PX)
            .max(0.0);
        let top = style
            .plot_padding_top_px
            .min(height - MIN_PLOT_EXTENT_PX)
            .max(0.0);
        let right = (width - style.plot_padding_right_px).max(left + MIN_PLOT_EXTENT_PX);
        let bottom = (height - style.plot_padding_bottom_px).max(top + MIN_PLOT_EXTENT_PX);
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }
}

/// Inputs that shape the display pipeline, taken from the engine config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LayoutParams {
    pub base_window_ms: f64,
    pub max_points: usize,
    pub smoothing_factor: f64,
}

/// Geometry of one chart draw: visible window, display points and scales.
///
/// Computed from the stored samples and a viewport state without mutating
/// either, so pointer handling and drawing agree on where points are.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub surface: Surface,
    pub plot: PlotRect,
    /// Time span of all stored samples.
    pub bounds: TimeWindow,
    pub window: TimeWindow,
    /// Windowed, decimated and smoothed samples in draw order.
    pub samples: Vec<Sample>,
    pub time_scale: LinearScale,
    pub value_scale: LinearScale,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    /// Indices of recorded samples; interpolated window edges are excluded
    /// so hover never lands on a point that was not sampled.
    pub hoverable: Range<usize>,
}

impl ChartLayout {
    /// Returns `None` when fewer than 2 samples are stored or visible.
    pub(crate) fn compute(
        surface: Surface,
        style: &ChartStyle,
        stored: &[Sample],
        state: ViewportState,
        params: LayoutParams,
    ) -> ChartResult<Option<Self>> {
        if stored.len() < 2 {
            return Ok(None);
        }
        if !surface.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: surface.viewport.width,
                height: surface.viewport.height,
            });
        }
        let Some(bounds) = TimeWindow::from_samples(stored) else {
            return Ok(None);
        };

        let window = resolve_visible_window(
            bounds,
            state.scale,
            state.offset_ms,
            params.base_window_ms,
        );
        let windowed = samples_in_window_with_edges(stored, window);
        let samples =
            reduce_and_smooth(&windowed.samples, params.max_points, params.smoothing_factor);
        if samples.len() < 2 {
            return Ok(None);
        }
        // Decimation keeps both endpoints, so edge points stay first and last.
        let hoverable = windowed.recorded_range(samples.len());

        let (min, max) = samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), sample| {
                (min.min(sample.value), max.max(sample.value))
            });

        let plot = PlotRect::inset(surface, style);
        let time_scale =
            LinearScale::from_observed(window.start_ms, window.end_ms, plot.left, plot.right)?;
        let value_scale = LinearScale::from_observed(min, max, plot.bottom, plot.top)?;

        let xs = samples
            .iter()
            .map(|sample| time_scale.domain_to_pixel(sample.timestamp_ms as f64))
            .collect::<ChartResult<Vec<_>>>()?;
        let ys = samples
            .iter()
            .map(|sample| value_scale.domain_to_pixel(sample.value))
            .collect::<ChartResult<Vec<_>>>()?;

        Ok(Some(Self {
            surface,
            plot,
            bounds,
            window,
            samples,
            time_scale,
            value_scale,
            xs,
            ys,
            hoverable,
        }))
    }

    /// Milliseconds covered by one logical pixel of plot width.
    #[must_use]
    pub fn ms_per_px(&self) -> f64 {
        let (start, end) = self.time_scale.domain();
        (end - start) / self.plot.width()
    }

    #[must_use]
    pub fn points(&self) -> Vec<Point> {
        self.xs
            .iter()
            .zip(&self.ys)
            .map(|(x, y)| Point::new(*x, *y))
            .collect()
    }

    #[must_use]
    pub fn interaction_context(&self, base_window_ms: f64) -> InteractionContext<'_> {
        InteractionContext {
            bounds: self.bounds,
            base_window_ms,
            plot_left: self.plot.left,
            plot_right: self.plot.right,
            ms_per_px: self.ms_per_px(),
            plotted_xs: &self.xs[self.hoverable.clone()],
            first_plotted_index: self.hoverable.start,
        }
    }
}
