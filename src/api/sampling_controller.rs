use crate::core::{Clock, KeyValueStore, NumericSource, Sample, SampleOutcome, SeriesDescriptor};
use crate::render::Renderer;

use super::TelemetryEngine;
use super::engine::ensure_history;

impl<R: Renderer, K: KeyValueStore, C: Clock> TelemetryEngine<R, K, C> {
    /// Host tick: samples every available series when the interval elapsed.
    pub fn sample<S: NumericSource + ?Sized>(&mut self, source: &S) -> SampleOutcome {
        let now_ms = self.clock.now_ms();
        self.sample_at(now_ms, source)
    }

    /// Like [`Self::sample`] with an explicit timestamp.
    pub fn sample_at<S: NumericSource + ?Sized>(&mut self, now_ms: i64, source: &S) -> SampleOutcome {
        if !self.sampler.is_due(now_ms) {
            return SampleOutcome::NotDue {
                remaining_ms: self.sampler.remaining_ms(now_ms),
            };
        }

        let series = self.catalog.resolve(source);
        let store = ensure_history(
            &mut self.history,
            &self.storage,
            &self.history_key,
            self.history_limits,
            now_ms,
        );
        let outcome = self
            .sampler
            .maybe_sample(now_ms, &series, source, store, &mut self.storage);
        if let SampleOutcome::Sampled { recorded, .. } = outcome {
            if recorded > 0 {
                self.redraw.request();
            }
        }
        outcome
    }

    /// Stored samples of one series, oldest first.
    pub fn history(&mut self, series_key: &str) -> &[Sample] {
        let now_ms = self.clock.now_ms();
        ensure_history(
            &mut self.history,
            &self.storage,
            &self.history_key,
            self.history_limits,
            now_ms,
        )
        .read(series_key)
    }

    /// Series available right now, in display order.
    ///
    /// Auto-detected catalogs re-read every candidate on each call.
    pub fn series<S: NumericSource + ?Sized>(&self, source: &S) -> Vec<SeriesDescriptor> {
        self.catalog.resolve(source)
    }
}
