use tracing::debug;

use crate::core::{Clock, HistoryLimits, HistoryStore, KeyValueStore, Sampler, SystemClock};
use crate::error::ChartResult;
use crate::interaction::{SeriesCarousel, SwipeRecognizer, ViewportStates};
use crate::render::Renderer;

use super::{ChartStyle, RedrawScheduler, TelemetryConfig, TelemetryEngine};

impl<R: Renderer, K: KeyValueStore> TelemetryEngine<R, K, SystemClock> {
    /// Creates an engine reading wall-clock time from the system.
    pub fn new(renderer: R, storage: K, config: TelemetryConfig) -> ChartResult<Self> {
        Self::with_clock(renderer, storage, SystemClock, config)
    }
}

impl<R: Renderer, K: KeyValueStore, C: Clock> TelemetryEngine<R, K, C> {
    /// Creates an engine with an explicit time source.
    ///
    /// History is not read from `storage` until it is first needed.
    pub fn with_clock(renderer: R, storage: K, clock: C, config: TelemetryConfig) -> ChartResult<Self> {
        config.validate()?;
        let history_limits = config.history_limits()?;
        let history_key = config.history_storage_key();
        debug!(
            history_key = %history_key,
            interval_ms = config.sample_interval_ms(),
            "telemetry engine created"
        );

        Ok(Self {
            renderer,
            storage,
            clock,
            catalog: config.catalog(),
            history_key,
            history_limits,
            history: None,
            sampler: Sampler::new(config.sample_interval_ms()),
            viewports: ViewportStates::new(),
            carousel: SeriesCarousel::default(),
            swipe: SwipeRecognizer::new(config.effective_swipe_threshold_px()),
            redraw: RedrawScheduler::new(),
            style: ChartStyle::default(),
            config,
        })
    }

    /// Applies a new configuration.
    ///
    /// Viewport states are reset. Loaded history is kept when the storage
    /// identity is unchanged (re-pruned to the new limits) and dropped for a
    /// lazy reload otherwise. The sampler restarts so the next tick samples.
    pub fn reconfigure(&mut self, config: TelemetryConfig) -> ChartResult<()> {
        config.validate()?;
        let history_limits = config.history_limits()?;
        let history_key = config.history_storage_key();

        if history_key != self.history_key {
            self.history = None;
        } else if history_limits != self.history_limits {
            let now_ms = self.clock.now_ms();
            self.history = self
                .history
                .take()
                .map(|store| rebuild_with_limits(&store, history_limits, now_ms));
        }

        self.catalog = config.catalog();
        self.history_key = history_key;
        self.history_limits = history_limits;
        self.sampler = Sampler::new(config.sample_interval_ms());
        self.swipe = SwipeRecognizer::new(config.effective_swipe_threshold_px());
        self.viewports.clear();
        self.config = config;
        self.redraw.request();
        debug!(history_key = %self.history_key, "telemetry engine reconfigured");
        Ok(())
    }
}

fn rebuild_with_limits(store: &HistoryStore, limits: HistoryLimits, now_ms: i64) -> HistoryStore {
    let mut rebuilt = HistoryStore::new(store.storage_key(), limits);
    for series_key in store.series_keys() {
        for sample in store.read(series_key) {
            rebuilt.push(series_key, sample.timestamp_ms, sample.value);
        }
    }
    rebuilt.prune(now_ms);
    rebuilt
}
