// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for interpretation operations
//!
//! Every failure talking to the completion service is converted into one of
//! these variants at the call site, carrying the original error's message as
//! context. There is no retry machinery: a failed interpretation is fatal
//! for the request that asked for it.

use thiserror::Error;

/// Result type alias for interpretation operations
pub type InterpreterResult<T> = Result<T, InterpreterError>;

/// Error types for interpretation operations
#[derive(Debug, Error)]
pub enum InterpreterError {
    /// Client misconfiguration (bad base URL, malformed key header)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Configuration failure detail
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {message}")]
    Http {
        /// Underlying transport error text
        message: String,
    },

    /// Authentication failed
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Failure detail from the completion service
        message: String,
    },

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_seconds} seconds")]
    RateLimitExceeded {
        /// Suggested wait before a caller-initiated retry
        retry_after_seconds: u64,
    },

    /// Request timeout
    #[error("Request timeout after {timeout_seconds} seconds")]
    Timeout {
        /// Configured timeout in seconds
        timeout_seconds: u64,
    },

    /// Invalid response format from the completion service
    #[error("Invalid response format: {message}")]
    InvalidResponse {
        /// Parse failure detail
        message: String,
    },

    /// Completion service unavailable
    #[error("Service unavailable: {message}")]
    ServiceUnavailable {
        /// Failure detail from the completion service
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {message}")]
    Json {
        /// Serde failure detail
        message: String,
    },
}

impl InterpreterError {
    /// Create a configuration error
    pub fn config<T: ToString>(message: T) -> Self {
        Self::Configuration {
            message: message.to_string(),
        }
    }

    /// Create an HTTP error
    pub fn http<T: ToString>(message: T) -> Self {
        Self::Http {
            message: message.to_string(),
        }
    }

    /// Create an authentication error
    pub fn authentication<T: ToString>(message: T) -> Self {
        Self::Authentication {
            message: message.to_string(),
        }
    }

    /// Create a rate limit error
    pub fn rate_limit(retry_after_seconds: u64) -> Self {
        Self::RateLimitExceeded {
            retry_after_seconds,
        }
    }

    /// Create a timeout error
    pub fn timeout(timeout_seconds: u64) -> Self {
        Self::Timeout { timeout_seconds }
    }

    /// Create an invalid response error
    pub fn invalid_response<T: ToString>(message: T) -> Self {
        Self::InvalidResponse {
            message: message.to_string(),
        }
    }

    /// Create a service unavailable error
    pub fn service_unavailable<T: ToString>(message: T) -> Self {
        Self::ServiceUnavailable {
            message: message.to_string(),
        }
    }

    /// Check if this error indicates an authentication problem
    pub fn is_auth_error(&self) -> bool {
        matches!(self, InterpreterError::Authentication { .. })
    }

    /// Check if this error indicates a configuration problem
    pub fn is_config_error(&self) -> bool {
        matches!(self, InterpreterError::Configuration { .. })
    }
}

/// Convert from reqwest errors
impl From<reqwest::Error> for InterpreterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                timeout_seconds: 0, // actual value unknown at this layer
            }
        } else {
            Self::Http {
                message: err.to_string(),
            }
        }
    }
}

/// Convert from JSON errors
impl From<serde_json::Error> for InterpreterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            message: err.to_string(),
        }
    }
}
