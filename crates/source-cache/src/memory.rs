// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory key/value store
//!
//! Process-local [`KeyValueStore`] implementation backed by a `DashMap`.
//! Entries live for the lifetime of the process; there is no eviction and
//! no TTL, matching the store contract.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{KeyValueStore, StoreError};

/// In-memory store for cached source and interpretations
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
    stats: DashMap<String, u64>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the store statistics
    pub fn stats(&self) -> StoreStats {
        let hits = self.get_stat("hits");
        let misses = self.get_stat("misses");
        let total = hits + misses;
        #[allow(clippy::cast_precision_loss)]
        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        StoreStats {
            entry_count: self.entries.len(),
            hits,
            misses,
            stores: self.get_stat("stores"),
            hit_rate,
        }
    }

    fn increment_stat(&self, key: &str) {
        self.stats
            .entry(key.to_string())
            .and_modify(|v| *v += 1)
            .or_insert(1);
    }

    fn get_stat(&self, key: &str) -> u64 {
        self.stats.get(key).map_or(0, |v| *v)
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.entries.get(key) {
            Some(value) => {
                self.increment_stat("hits");
                trace!(key, "memory store hit");
                Ok(Some(value.clone()))
            }
            None => {
                self.increment_stat("misses");
                trace!(key, "memory store miss");
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.increment_stat("stores");
        trace!(key, value_len = value.len(), "memory store write");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Store statistics snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    /// Number of entries currently held
    pub entry_count: usize,
    /// Lookup hit count
    pub hits: u64,
    /// Lookup miss count
    pub misses: u64,
    /// Number of writes performed
    pub stores: u64,
    /// Hit rate (0.0 to 1.0)
    pub hit_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_and_set_round_trip() {
        let store = MemoryStore::new();

        assert_eq!(store.get("0xabc").await.unwrap(), None);

        store.set("0xabc", "source text").await.unwrap();
        assert_eq!(
            store.get("0xabc").await.unwrap(),
            Some("source text".to_string())
        );
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn set_replaces_previous_value() {
        let store = MemoryStore::new();
        store.set("k", "first").await.unwrap();
        store.set("k", "second").await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some("second".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn stats_track_hits_and_misses() {
        let store = MemoryStore::new();

        store.get("missing").await.unwrap();
        store.set("k", "v").await.unwrap();
        store.get("k").await.unwrap();

        let stats = store.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.stores, 1);
        assert_eq!(stats.entry_count, 1);
        assert!((stats.hit_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_store() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.stats().entry_count, 0);
        assert!((store.stats().hit_rate - 0.0).abs() < f64::EPSILON);
    }
}
