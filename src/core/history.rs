use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::storage::KeyValueStore;
use crate::core::types::Sample;
use crate::error::{ChartError, ChartResult};

/// Schema version written alongside persisted history.
pub const HISTORY_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_MAX_SAMPLES: usize = 5_000;
pub const DEFAULT_RETENTION_MS: i64 = 24 * 60 * 60 * 1_000;

/// Eviction policies applied to every series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryLimits {
    pub retention_ms: i64,
    pub max_samples: usize,
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self {
            retention_ms: DEFAULT_RETENTION_MS,
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }
}

impl HistoryLimits {
    pub fn new(retention_ms: i64, max_samples: usize) -> ChartResult<Self> {
        if retention_ms <= 0 {
            return Err(ChartError::InvalidConfig(
                "history retention must be > 0".to_owned(),
            ));
        }
        if max_samples == 0 {
            return Err(ChartError::InvalidConfig(
                "history sample cap must be > 0".to_owned(),
            ));
        }
        Ok(Self {
            retention_ms,
            max_samples,
        })
    }

    fn cutoff(self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.retention_ms)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedHistory {
    version: u32,
    series: IndexMap<String, Vec<Sample>>,
}

/// Bounded, per-series, append-only sample history.
///
/// Series keep insertion order so persisted snapshots are deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryStore {
    storage_key: String,
    limits: HistoryLimits,
    series: IndexMap<String, Vec<Sample>>,
}

impl HistoryStore {
    #[must_use]
    pub fn new(storage_key: impl Into<String>, limits: HistoryLimits) -> Self {
        Self {
            storage_key: storage_key.into(),
            limits,
            series: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    #[must_use]
    pub fn limits(&self) -> HistoryLimits {
        self.limits
    }

    /// Appends one reading and applies both eviction policies.
    ///
    /// Returns `false` without touching the store when `value` is not finite
    /// or `timestamp_ms` is older than the newest sample of the series.
    pub fn push(&mut self, series_key: &str, timestamp_ms: i64, value: f64) -> bool {
        if !value.is_finite() {
            trace!(series_key, "dropping non-finite sample");
            return false;
        }

        if let Some(last) = self.series.get(series_key).and_then(|samples| samples.last()) {
            if timestamp_ms < last.timestamp_ms {
                warn!(
                    series_key,
                    timestamp_ms,
                    latest_ms = last.timestamp_ms,
                    "dropping out-of-order sample"
                );
                return false;
            }
        }

        let limits = self.limits;
        let samples = self.series.entry(series_key.to_owned()).or_default();
        samples.push(Sample::new(timestamp_ms, value));
        evict(samples, limits.cutoff(timestamp_ms), limits.max_samples);
        trace!(series_key, count = samples.len(), "push sample");
        true
    }

    /// Current sequence of a series, oldest first. Unknown keys read as empty.
    #[must_use]
    pub fn read(&self, series_key: &str) -> &[Sample] {
        self.series
            .get(series_key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Drops samples outside the retention window and series left empty.
    pub fn prune(&mut self, now_ms: i64) {
        let limits = self.limits;
        let cutoff = limits.cutoff(now_ms);
        for samples in self.series.values_mut() {
            evict(samples, cutoff, limits.max_samples);
        }
        self.series.retain(|_, samples| !samples.is_empty());
    }

    pub fn series_keys(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn to_json(&self) -> ChartResult<String> {
        let snapshot = PersistedHistory {
            version: HISTORY_SCHEMA_VERSION,
            series: self.series.clone(),
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Rebuilds a store from a persisted snapshot.
    ///
    /// Every sample is re-validated, so a tampered snapshot cannot break the
    /// ordering, finiteness, retention or cap invariants.
    pub fn from_json(
        storage_key: impl Into<String>,
        limits: HistoryLimits,
        json: &str,
        now_ms: i64,
    ) -> ChartResult<Self> {
        let snapshot: PersistedHistory = serde_json::from_str(json)?;
        if snapshot.version != HISTORY_SCHEMA_VERSION {
            return Err(ChartError::InvalidData(format!(
                "unsupported history schema version {}",
                snapshot.version
            )));
        }

        let mut store = Self::new(storage_key, limits);
        for (series_key, samples) in snapshot.series {
            for sample in samples {
                store.push(&series_key, sample.timestamp_ms, sample.value);
            }
        }
        store.prune(now_ms);
        Ok(store)
    }

    /// Writes the whole store to durable storage.
    ///
    /// Failures are logged and swallowed; the in-memory store stays
    /// authoritative. Returns whether the write succeeded.
    pub fn persist<K: KeyValueStore + ?Sized>(&self, storage: &mut K) -> bool {
        let result = self
            .to_json()
            .and_then(|json| storage.set(&self.storage_key, json));
        match result {
            Ok(()) => {
                debug!(
                    storage_key = %self.storage_key,
                    series = self.series.len(),
                    "persisted history"
                );
                true
            }
            Err(err) => {
                warn!(
                    storage_key = %self.storage_key,
                    error = %err,
                    "failed to persist history; keeping in-memory copy"
                );
                false
            }
        }
    }

    /// Loads history from durable storage, degrading to an empty store when
    /// the entry is missing or unreadable.
    #[must_use]
    pub fn load<K: KeyValueStore + ?Sized>(
        storage: &K,
        storage_key: impl Into<String>,
        limits: HistoryLimits,
        now_ms: i64,
    ) -> Self {
        let storage_key = storage_key.into();
        let Some(json) = storage.get(&storage_key) else {
            debug!(storage_key = %storage_key, "no persisted history");
            return Self::new(storage_key, limits);
        };

        match Self::from_json(storage_key.clone(), limits, &json, now_ms) {
            Ok(store) => {
                debug!(
                    storage_key = %storage_key,
                    series = store.series_count(),
                    "loaded persisted history"
                );
                store
            }
            Err(err) => {
                warn!(
                    storage_key = %storage_key,
                    error = %err,
                    "discarding unreadable persisted history"
                );
                Self::new(storage_key, limits)
            }
        }
    }
}

fn evict(samples: &mut Vec<Sample>, cutoff_ms: i64, max_samples: usize) {
    let stale = samples.partition_point(|sample| sample.timestamp_ms < cutoff_ms);
    if stale > 0 {
        samples.drain(..stale);
    }
    if samples.len() > max_samples {
        let excess = samples.len() - max_samples;
        samples.drain(..excess);
    }
}
