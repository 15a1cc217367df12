// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Chain explorer client abstractions
//!
//! This crate provides the common interface implemented by every chain
//! explorer integration, along with the shared error taxonomy and health
//! check types consumed by the server.
//!
//! # Core Abstractions
//!
//! - **`SourceClient` Trait**: common interface for fetching verified
//!   contract source code from an explorer
//! - **Health Check System**: standardized health status reporting across
//!   all clients
//! - **Error Handling**: `ExplorerError` distinguishes "the explorer has no
//!   source for this identifier" from transport-level failures, because the
//!   two map to different HTTP status classes at the server boundary

pub mod health;

pub use health::HealthStatus;
use thiserror::Error;

/// Generic trait for chain explorer clients
///
/// One implementation exists per supported chain; the orchestrator treats
/// them uniformly once the chain tag is known.
pub trait SourceClient: Send + Sync {
    /// Fetch the verified source code published for a contract identifier
    ///
    /// # Returns
    ///
    /// * `Ok(source)` with the raw source text exactly as the explorer
    ///   returned it (license boilerplate included)
    /// * `Err(ExplorerError::NotFound)` when the explorer answered but has
    ///   no verified source for the identifier
    /// * `Err(_)` for transport failures or unparseable responses
    ///
    /// # Errors
    ///
    /// Returns an error if the explorer request fails or the identifier has
    /// no published source
    fn fetch_source(
        &self,
        identifier: &str,
    ) -> impl Future<Output = Result<String, ExplorerError>> + Send;

    /// Check the health of this explorer client
    ///
    /// # Errors
    ///
    /// Returns an error if the health check cannot be performed
    fn health_check(&self) -> impl Future<Output = Result<HealthStatus, ExplorerError>> + Send;

    /// Get the name/identifier of this explorer client
    fn name(&self) -> &'static str;
}

/// Errors that can occur when talking to a chain explorer
///
/// `NotFound` is the only client-fault variant; every other variant is an
/// infrastructure failure and surfaces as a 500-class response.
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// The explorer responded but has no verified source for the identifier
    #[error("No valid contract found at the address '{identifier}'")]
    NotFound {
        /// Identifier the lookup was performed for
        identifier: String,
    },

    /// Transport failure reaching the explorer (connect, DNS, send)
    #[error("HTTP request failed: {message}")]
    Http {
        /// Underlying transport error text
        message: String,
    },

    /// Request exceeded the client-side deadline
    #[error("Request timeout after {seconds} seconds")]
    Timeout {
        /// Configured timeout in seconds
        seconds: u64,
    },

    /// The explorer answered with a body that did not parse
    #[error("Invalid response format: {message}")]
    InvalidResponse {
        /// Parse failure detail
        message: String,
    },

    /// The client is misconfigured or the chain cannot be routed
    #[error("Configuration error: {message}")]
    Configuration {
        /// Configuration failure detail
        message: String,
    },
}

impl ExplorerError {
    /// Create a `NotFound` error for an identifier
    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            identifier: identifier.into(),
        }
    }

    /// Create an HTTP transport error
    pub fn http<T: ToString>(message: T) -> Self {
        Self::Http {
            message: message.to_string(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response<T: ToString>(message: T) -> Self {
        Self::InvalidResponse {
            message: message.to_string(),
        }
    }

    /// Create a configuration error
    pub fn configuration<T: ToString>(message: T) -> Self {
        Self::Configuration {
            message: message.to_string(),
        }
    }

    /// Whether this error means the identifier has no published source,
    /// as opposed to the explorer being unreachable
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_identifier() {
        let err = ExplorerError::not_found("0xabc");
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "No valid contract found at the address '0xabc'"
        );
    }

    #[test]
    fn transport_errors_are_not_not_found() {
        assert!(!ExplorerError::http("connection refused").is_not_found());
        assert!(!ExplorerError::Timeout { seconds: 30 }.is_not_found());
        assert!(!ExplorerError::invalid_response("bad json").is_not_found());
        assert!(!ExplorerError::configuration("no client").is_not_found());
    }

    #[test]
    fn error_display_includes_cause() {
        let err = ExplorerError::http("dns failure");
        assert!(err.to_string().contains("dns failure"));

        let err = ExplorerError::Timeout { seconds: 20 };
        assert!(err.to_string().contains("20 seconds"));
    }
}
