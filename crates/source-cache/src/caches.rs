// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Typed cache views over a shared key/value store
//!
//! The raw-source cache and the interpretation cache have independent
//! lifetimes but may share one backing store. Disjoint key spaces keep them
//! from colliding: source entries use the bare contract identifier, while
//! interpretation entries carry a distinguishing prefix.

use std::sync::Arc;

use tracing::debug;

use crate::{KeyValueStore, StoreError};

/// Key prefix for interpretation entries on the shared store
pub const INTERPRETATION_KEY_PREFIX: &str = "intrp-";

/// Cache of raw explorer payloads, keyed by contract identifier
///
/// A hit means the explorer is never asked again for that identifier, even
/// when the cached value captured a past failure sentinel.
#[derive(Debug)]
pub struct SourceCache<S> {
    store: Arc<S>,
}

impl<S> Clone for SourceCache<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore> SourceCache<S> {
    /// Create a cache view over a backing store
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Look up the cached raw source for an identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached
    pub async fn get(&self, identifier: &str) -> Result<Option<String>, StoreError> {
        let cached = self.store.get(identifier).await?;
        if cached.is_some() {
            debug!(identifier, "source cache hit");
        }
        Ok(cached)
    }

    /// Store the raw source for an identifier
    ///
    /// Best-effort: callers deliberately do not fail their request on a
    /// write error, they only log it.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached
    pub async fn set(&self, identifier: &str, raw_source: &str) -> Result<(), StoreError> {
        self.store.set(identifier, raw_source).await
    }
}

/// Cache of generated interpretations, keyed by prefixed identifier
///
/// Interpretations are treated as immutable once cached: nothing ever
/// invalidates or refreshes an entry, even if the underlying source changes.
#[derive(Debug)]
pub struct InterpretationCache<S> {
    store: Arc<S>,
}

impl<S> Clone for InterpretationCache<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore> InterpretationCache<S> {
    /// Create a cache view over a backing store
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn key(identifier: &str) -> String {
        format!("{INTERPRETATION_KEY_PREFIX}{identifier}")
    }

    /// Look up the cached interpretation for an identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached
    pub async fn get(&self, identifier: &str) -> Result<Option<String>, StoreError> {
        let cached = self.store.get(&Self::key(identifier)).await?;
        if cached.is_some() {
            debug!(identifier, "interpretation cache hit");
        }
        Ok(cached)
    }

    /// Store the interpretation for an identifier
    ///
    /// Best-effort, same contract as [`SourceCache::set`].
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached
    pub async fn set(&self, identifier: &str, interpretation: &str) -> Result<(), StoreError> {
        self.store.set(&Self::key(identifier), interpretation).await
    }
}

#[cfg(test)]
mod tests {
    use crate::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn caches_share_a_store_without_colliding() {
        let store = Arc::new(MemoryStore::new());
        let sources = SourceCache::new(Arc::clone(&store));
        let interpretations = InterpretationCache::new(Arc::clone(&store));

        sources.set("0xabc", "contract Token {}").await.unwrap();
        interpretations
            .set("0xabc", "This is a token contract.")
            .await
            .unwrap();

        assert_eq!(
            sources.get("0xabc").await.unwrap(),
            Some("contract Token {}".to_string())
        );
        assert_eq!(
            interpretations.get("0xabc").await.unwrap(),
            Some("This is a token contract.".to_string())
        );

        // Both entries exist side by side on the shared store.
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn interpretation_keys_carry_the_prefix() {
        let store = Arc::new(MemoryStore::new());
        let interpretations = InterpretationCache::new(Arc::clone(&store));

        interpretations.set("0xabc", "synopsis").await.unwrap();

        use crate::KeyValueStore;
        assert_eq!(
            store.get("intrp-0xabc").await.unwrap(),
            Some("synopsis".to_string())
        );
        assert_eq!(store.get("0xabc").await.unwrap(), None);
    }

    #[tokio::test]
    async fn miss_on_empty_cache() {
        let store = Arc::new(MemoryStore::new());
        let sources = SourceCache::new(store);
        assert_eq!(sources.get("0xmissing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_errors_surface_to_the_caller() {
        // The store contract says writes can fail; the pipeline swallows the
        // error, so all the cache layer has to do is report it faithfully.
        struct FailingStore;

        impl KeyValueStore for FailingStore {
            async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
                Err(StoreError::backend("connection reset"))
            }

            async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
                Err(StoreError::backend("connection reset"))
            }

            fn name(&self) -> &'static str {
                "failing"
            }
        }

        let sources = SourceCache::new(Arc::new(FailingStore));
        assert!(sources.set("0xabc", "code").await.is_err());
        assert!(sources.get("0xabc").await.is_err());
    }
}
