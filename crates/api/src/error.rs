// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error handling module
//!
//! This module provides comprehensive error types for server operations,
//! including proper HTTP response mapping and error propagation.
//!
//! The mapping follows a simple rule: errors the caller can fix (missing
//! address, unsupported chain, contract without published source) are
//! 400-class; everything the caller cannot fix (explorer transport failures,
//! completion-service failures, internal faults) is 500-class. Every failure
//! body is `{"error": <human-readable message>, "status": <code>}` with no
//! stack traces or internal identifiers.

use std::net::SocketAddr;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use explorer_client::ExplorerError;
use interpreter::InterpreterError;
use thiserror::Error;

/// Comprehensive error types for server operations
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration validation errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Network binding errors
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        /// Socket address that failed to bind
        address: SocketAddr,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Server startup errors
    #[error("Server startup failed: {source}")]
    Startup {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Server shutdown errors
    #[error("Server shutdown failed: {source}")]
    Shutdown {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Runtime errors during server operation
    #[error("Runtime error: {message}")]
    Runtime {
        /// Error message
        message: String,
    },

    /// Task join errors for async operations
    #[error("Task join error: {source}")]
    TaskJoin {
        /// Underlying tokio join error
        #[source]
        source: tokio::task::JoinError,
    },

    /// Signal handling errors
    #[error("Signal handling error: {message}")]
    Signal {
        /// Error message
        message: String,
    },

    /// The request carried no contract address
    #[error("Contract address is required")]
    MissingAddress,

    /// The identifier did not classify as any supported chain
    #[error("Unsupported blockchain")]
    UnsupportedChain,

    /// JSON parsing errors with detailed context
    #[error("Invalid JSON request: {message}")]
    JsonError {
        /// Detailed error message
        message: String,
    },

    /// Explorer lookup failed
    #[error(transparent)]
    Explorer(#[from] ExplorerError),

    /// Completion-service call failed
    #[error("Server error: {0}")]
    Interpreter(#[from] InterpreterError),
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::MissingAddress
            | ServerError::UnsupportedChain
            | ServerError::JsonError { .. } => StatusCode::BAD_REQUEST,
            // "not found" is the explorer's answer, so it is the caller's
            // problem; any other explorer failure is infrastructure
            ServerError::Explorer(e) if e.is_not_found() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }));
        (status, body).into_response()
    }
}

/// Convenient From implementations for common async error types
impl From<tokio::task::JoinError> for ServerError {
    fn from(source: tokio::task::JoinError) -> Self {
        Self::TaskJoin { source }
    }
}
