//! Durable key-value persistence seam and storage-key hashing.

use std::collections::HashMap;

use crate::error::{ChartError, ChartResult};

/// String key-value persistence provided by the host.
///
/// `set` may fail (quota, backend errors); callers in this crate treat those
/// failures as non-fatal.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String) -> ChartResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> ChartResult<()> {
        (**self).set(key, value)
    }
}

/// In-memory store with an optional byte quota over all keys and values.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryKeyValueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(existing, value)| existing.len() + value.len())
            .sum()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> ChartResult<()> {
        if let Some(quota) = self.quota_bytes {
            let required = self.used_bytes_excluding(key) + key.len() + value.len();
            if required > quota {
                return Err(ChartError::Storage(format!(
                    "quota exceeded: {required} bytes > {quota} bytes"
                )));
            }
        }
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a hash.
#[must_use]
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Builds the composite identity string used to key persisted history.
#[must_use]
pub fn storage_identity(widget_name: &str, primary_source: &str) -> String {
    format!("{widget_name}|{primary_source}")
}

/// Deterministic storage key derived from an identity string.
#[must_use]
pub fn storage_key(identity: &str) -> String {
    format!("telemetry-history-{:08x}", fnv1a_32(identity.as_bytes()))
}
