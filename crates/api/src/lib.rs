// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Contract Lens API Server Implementation
//!
//! This crate provides the HTTP server for the contract interpretation
//! service, built with Axum and designed for production use with
//! comprehensive configuration, middleware, and graceful shutdown
//! capabilities.
//!
//! # Module Structure
//!
//! - [`config`]: Server configuration and environment management with hierarchical loading
//! - [`error`]: Error types and HTTP response handling with proper status codes
//! - [`extractors`]: JSON extraction with detailed parse-failure messages
//! - [`state`]: Shared application state management with cancellation token support
//! - [`server`]: Main server implementation, lifecycle, and coordinated shutdown
//! - [`routes`]: Route configuration and HTTP request handlers
//! - [`openapi`]: `OpenAPI` specification and Swagger UI endpoints for API documentation
//! - [`metrics`]: Prometheus metrics for requests, upstream calls, and cache traffic
//!
//! # Request Pipeline
//!
//! A single `POST /v1/interpret` request flows through: input validation →
//! chain classification → source-cache lookup → explorer fetch on miss →
//! sanitization → interpretation-cache lookup → completion-service call on
//! miss → response assembly. Cache writes are best-effort and never fail the
//! request that produced the value.

pub mod config;
pub mod error;
pub mod extractors;
pub mod metrics;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{Environment, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use server::{Server, ShutdownConfig};
pub use shared_types::Chain;
pub use state::{HealthCheck, ServerState};
