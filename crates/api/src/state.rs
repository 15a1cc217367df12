// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server state management module
//!
//! This module provides shared application state for the contract
//! interpretation server: configuration, the explorer registry, the
//! completion-service client, the two caches, and coordinated cancellation.

use std::{collections::HashMap, sync::Arc};

use explorers::ExplorerRegistry;
use interpreter::OpenAiClient;
use serde::{Deserialize, Serialize};
use source_cache::{InterpretationCache, MemoryStore, SourceCache};
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;

use crate::config::{Environment, ServerConfig};

/// Shared application state with cancellation token support
#[derive(Debug, Clone)]
pub struct ServerState {
    /// Server configuration
    config: ServerConfig,
    /// Explorer registry for source lookups
    explorers: Arc<ExplorerRegistry>,
    /// Completion-service client for interpretations
    interpreter: Arc<OpenAiClient>,
    /// Cache of raw explorer payloads
    source_cache: SourceCache<MemoryStore>,
    /// Cache of generated interpretations
    interpretation_cache: InterpretationCache<MemoryStore>,
    /// Cancellation token for coordinated shutdown
    pub cancellation_token: CancellationToken,
}

impl ServerState {
    /// Create new server state
    pub fn new(
        config: ServerConfig,
        explorers: Arc<ExplorerRegistry>,
        interpreter: Arc<OpenAiClient>,
        source_cache: SourceCache<MemoryStore>,
        interpretation_cache: InterpretationCache<MemoryStore>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            config,
            explorers,
            interpreter,
            source_cache,
            interpretation_cache,
            cancellation_token,
        }
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the explorer registry for source lookups
    pub fn explorers(&self) -> &Arc<ExplorerRegistry> {
        &self.explorers
    }

    /// Get the completion-service client
    pub fn interpreter(&self) -> &Arc<OpenAiClient> {
        &self.interpreter
    }

    /// Get the raw-source cache
    pub fn source_cache(&self) -> &SourceCache<MemoryStore> {
        &self.source_cache
    }

    /// Get the interpretation cache
    pub fn interpretation_cache(&self) -> &InterpretationCache<MemoryStore> {
        &self.interpretation_cache
    }

    /// Perform health check operations
    pub async fn health_check(&self) -> HealthCheck {
        let mut api_clients: HashMap<String, HealthStatus> = self
            .explorers
            .overall_health()
            .await
            .into_iter()
            .map(|(name, status)| (name, Self::convert_health_status(status)))
            .collect();

        let openai_status = match self.interpreter.health_check().await {
            Ok(true) => HealthStatus::Up,
            Ok(false) => HealthStatus::Degraded {
                reason: Box::from("completion service not responding normally"),
            },
            Err(e) => HealthStatus::Down {
                reason: e.to_string().into_boxed_str(),
            },
        };
        api_clients.insert("openai".to_string(), openai_status);

        HealthCheck {
            status: HealthStatus::Up,
            version: Box::from(env!("CARGO_PKG_VERSION")),
            environment: self.config.environment,
            timestamp: chrono::Utc::now().to_rfc3339(),
            api_clients,
        }
    }

    /// Convert external client health status to internal health status
    fn convert_health_status(external_status: explorer_client::HealthStatus) -> HealthStatus {
        match external_status {
            explorer_client::HealthStatus::Up => HealthStatus::Up,
            explorer_client::HealthStatus::Degraded { reason } => HealthStatus::Degraded {
                reason: reason.into_boxed_str(),
            },
            explorer_client::HealthStatus::Down { reason } => HealthStatus::Down {
                reason: reason.into_boxed_str(),
            },
        }
    }
}

/// Health status of a service or dependency
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum HealthStatus {
    /// Service is fully operational and responding normally
    Up,

    /// Service is not operational or has critical failures
    Down {
        /// Human-readable explanation of why the service is down
        reason: Box<str>,
    },

    /// Service is operational but experiencing performance issues or partial failures
    Degraded {
        /// Human-readable explanation of the degradation condition
        reason: Box<str>,
    },
}

/// Health check status
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthCheck {
    /// Service status
    pub status: HealthStatus,
    /// Service version
    pub version: Box<str>,
    /// Environment
    pub environment: Environment,
    /// Timestamp
    pub timestamp: String,
    /// Status of individual API clients
    #[schema(value_type = Object)]
    pub api_clients: HashMap<String, HealthStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> ServerState {
        let store = Arc::new(MemoryStore::new());
        let interpreter = OpenAiClient::new("sk-test".to_string(), None, 5)
            .expect("test client");
        ServerState::new(
            ServerConfig::for_testing(),
            Arc::new(ExplorerRegistry::new()),
            Arc::new(interpreter),
            SourceCache::new(Arc::clone(&store)),
            InterpretationCache::new(store),
            CancellationToken::new(),
        )
    }

    #[test]
    fn server_state_creation() {
        let state = test_state();
        assert!(!state.cancellation_token.is_cancelled());
        assert_eq!(state.explorers().client_count(), 0);
    }

    #[test]
    fn server_state_with_cancellation_token() {
        let state = test_state();
        let token = state.cancellation_token.clone();

        assert!(!state.cancellation_token.is_cancelled());

        // Test that the tokens are linked
        token.cancel();
        assert!(state.cancellation_token.is_cancelled());
    }
}
