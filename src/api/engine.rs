use crate::core::{
    Clock, HistoryLimits, HistoryStore, KeyValueStore, Sampler, SeriesCatalog, SystemClock,
};
use crate::error::ChartResult;
use crate::interaction::{SeriesCarousel, SwipeRecognizer, ViewportStates};
use crate::render::Renderer;

use super::chart_layout::LayoutParams;
use super::label_format::label_offset;
use super::{ChartStyle, RedrawScheduler, TelemetryConfig};

#[cfg(feature = "cairo-backend")]
use crate::render::CairoContextRenderer;

/// Main orchestration facade consumed by host applications.
///
/// `TelemetryEngine` owns one instance of every component: series catalog,
/// lazily loaded history, sampler, per-series viewport states, carousel and
/// redraw scheduler. Hosts drive it with ticks, pointer events and
/// animation-frame callbacks; nothing runs in the background.
pub struct TelemetryEngine<R: Renderer, K: KeyValueStore, C: Clock = SystemClock> {
    pub(super) renderer: R,
    pub(super) storage: K,
    pub(super) clock: C,
    pub(super) config: TelemetryConfig,
    pub(super) style: ChartStyle,
    pub(super) catalog: SeriesCatalog,
    pub(super) history_key: String,
    pub(super) history_limits: HistoryLimits,
    /// `None` until first access; loaded at most once per configuration.
    pub(super) history: Option<HistoryStore>,
    pub(super) sampler: Sampler,
    pub(super) viewports: ViewportStates,
    pub(super) carousel: SeriesCarousel,
    pub(super) swipe: SwipeRecognizer,
    pub(super) redraw: RedrawScheduler,
}

impl<R: Renderer, K: KeyValueStore, C: Clock> TelemetryEngine<R, K, C> {
    #[must_use]
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }

    #[must_use]
    pub fn style(&self) -> ChartStyle {
        self.style
    }

    pub fn set_style(&mut self, style: ChartStyle) -> ChartResult<()> {
        style.validate()?;
        self.style = style;
        self.redraw.request();
        Ok(())
    }

    #[must_use]
    pub fn catalog(&self) -> &SeriesCatalog {
        &self.catalog
    }

    /// Storage key the history is persisted under.
    #[must_use]
    pub fn history_key(&self) -> &str {
        &self.history_key
    }

    #[must_use]
    pub fn is_history_loaded(&self) -> bool {
        self.history.is_some()
    }

    #[must_use]
    pub fn sampler(&self) -> Sampler {
        self.sampler
    }

    #[must_use]
    pub fn redraw_scheduler(&self) -> RedrawScheduler {
        self.redraw
    }

    #[must_use]
    pub fn storage(&self) -> &K {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut K {
        &mut self.storage
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    #[must_use]
    pub fn into_storage(self) -> K {
        self.storage
    }

    /// Renders the current series into an external cairo context.
    ///
    /// This path serves toolkit draw callbacks while keeping the renderer
    /// implementation decoupled from toolkit-specific APIs.
    #[cfg(feature = "cairo-backend")]
    pub fn render_on_cairo_context<S>(
        &mut self,
        context: &cairo::Context,
        surface: crate::core::Surface,
        source: &S,
    ) -> ChartResult<bool>
    where
        R: CairoContextRenderer,
        S: crate::core::NumericSource + ?Sized,
    {
        let Some(frame) = self.current_frame(surface, source)? else {
            return Ok(false);
        };
        self.renderer.render_on_cairo_context(context, &frame)?;
        Ok(true)
    }

    pub(super) fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            base_window_ms: self.config.base_window_ms(),
            max_points: self.config.max_points,
            smoothing_factor: self.config.clamped_smoothing_factor(),
        }
    }

    pub(super) fn label_offset(&self) -> chrono::FixedOffset {
        label_offset(self.config.utc_offset_minutes)
    }
}

/// Loads `history` from `storage` on first use and prunes it at `now_ms`.
///
/// Reads between sampling passes never see samples past retention.
/// Free function so callers can keep `storage` borrowed mutably afterwards.
pub(super) fn ensure_history<'a, K: KeyValueStore + ?Sized>(
    history: &'a mut Option<HistoryStore>,
    storage: &K,
    storage_key: &str,
    limits: HistoryLimits,
    now_ms: i64,
) -> &'a mut HistoryStore {
    let store =
        history.get_or_insert_with(|| HistoryStore::load(storage, storage_key, limits, now_ms));
    store.prune(now_ms);
    store
}
