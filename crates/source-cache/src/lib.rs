// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Key/value caching for contract source and interpretations
//!
//! This crate provides the flat string key/value store abstraction the
//! pipeline caches are built on, an in-memory implementation, and the two
//! typed cache views used by the request handler:
//!
//! - [`caches::SourceCache`] keys raw explorer payloads by the contract
//!   identifier itself
//! - [`caches::InterpretationCache`] keys generated interpretations by a
//!   prefixed identifier, so both caches can share one backing store without
//!   colliding
//!
//! The store contract is deliberately minimal: `get` and `set` only, no
//! eviction and no TTL. Durability and expiry belong to the backing store.
//! Writes are best-effort from the caller's point of view; a failed `set`
//! only degrades future hit rates and must never fail the request that
//! produced the value.

pub mod caches;
pub mod memory;

use thiserror::Error;

pub use caches::{INTERPRETATION_KEY_PREFIX, InterpretationCache, SourceCache};
pub use memory::{MemoryStore, StoreStats};

/// Flat string key/value store
///
/// Implementations are free to be process-local or network-backed; the
/// pipeline only ever performs independent `get` and `set` calls, never
/// read-modify-write sequences, so no atomicity beyond single operations
/// is required.
pub trait KeyValueStore: Send + Sync {
    /// Look up a value by key
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Store a value under a key, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Get the name/identifier of this store
    fn name(&self) -> &'static str;
}

/// Errors that can occur when talking to the backing store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store rejected or failed the operation
    #[error("store operation failed: {message}")]
    Backend {
        /// Failure detail from the backing store
        message: String,
    },
}

impl StoreError {
    /// Create a backend error
    pub fn backend<T: ToString>(message: T) -> Self {
        Self::Backend {
            message: message.to_string(),
        }
    }
}
