use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::catalog::SeriesDescriptor;
use crate::core::history::HistoryStore;
use crate::core::source::NumericSource;
use crate::core::storage::KeyValueStore;

/// Shortest accepted sampling interval.
pub const MIN_SAMPLE_INTERVAL_MS: i64 = 10_000;
pub const DEFAULT_SAMPLE_INTERVAL_MS: i64 = 60_000;

/// Result of one sampling attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleOutcome {
    /// The interval since the last pass has not elapsed yet.
    NotDue { remaining_ms: i64 },
    /// A pass ran; `skipped` counts series whose reading was unavailable or
    /// rejected by the store.
    Sampled { recorded: usize, skipped: usize },
}

impl SampleOutcome {
    #[must_use]
    pub fn is_sampled(self) -> bool {
        matches!(self, Self::Sampled { .. })
    }
}

/// Decides on each host tick whether a sampling pass is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampler {
    interval_ms: i64,
    last_sample_ms: Option<i64>,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_INTERVAL_MS)
    }
}

impl Sampler {
    /// Creates a sampler; intervals below [`MIN_SAMPLE_INTERVAL_MS`] are raised to it.
    #[must_use]
    pub fn new(interval_ms: i64) -> Self {
        Self {
            interval_ms: interval_ms.max(MIN_SAMPLE_INTERVAL_MS),
            last_sample_ms: None,
        }
    }

    #[must_use]
    pub fn interval_ms(self) -> i64 {
        self.interval_ms
    }

    #[must_use]
    pub fn last_sample_ms(self) -> Option<i64> {
        self.last_sample_ms
    }

    /// Milliseconds left until the next pass is due, `0` when due now.
    ///
    /// A clock that moved backwards past the last pass counts as due.
    #[must_use]
    pub fn remaining_ms(self, now_ms: i64) -> i64 {
        match self.last_sample_ms {
            None => 0,
            Some(last) if now_ms < last => 0,
            Some(last) => (self.interval_ms - (now_ms - last)).max(0),
        }
    }

    #[must_use]
    pub fn is_due(self, now_ms: i64) -> bool {
        self.remaining_ms(now_ms) == 0
    }

    pub fn reset(&mut self) {
        self.last_sample_ms = None;
    }

    /// Runs one sampling pass when due.
    ///
    /// Reads every series once, pushes available readings into `store`, then
    /// persists the whole batch with a single write.
    pub fn maybe_sample<S, K>(
        &mut self,
        now_ms: i64,
        series: &[SeriesDescriptor],
        source: &S,
        store: &mut HistoryStore,
        storage: &mut K,
    ) -> SampleOutcome
    where
        S: NumericSource + ?Sized,
        K: KeyValueStore + ?Sized,
    {
        let remaining_ms = self.remaining_ms(now_ms);
        if remaining_ms > 0 {
            trace!(remaining_ms, "sampling not due");
            return SampleOutcome::NotDue { remaining_ms };
        }

        store.prune(now_ms);
        let mut recorded = 0;
        let mut skipped = 0;
        for descriptor in series {
            match source.read_numeric(&descriptor.source) {
                Some(value) if store.push(&descriptor.key, now_ms, value) => recorded += 1,
                _ => skipped += 1,
            }
        }

        store.persist(storage);
        self.last_sample_ms = Some(now_ms);
        debug!(now_ms, recorded, skipped, "sampling pass complete");
        SampleOutcome::Sampled { recorded, skipped }
    }
}
