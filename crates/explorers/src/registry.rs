// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Explorer registry for chain-tag dispatch
//!
//! This module routes a source fetch to the explorer client matching the
//! classified chain. The set of chains is closed: dispatch is a match over
//! the `Chain` tag rather than open-ended dynamic lookup, which keeps adding
//! a chain a compile-time concern.

use std::collections::HashMap;

use explorer_client::{ExplorerError, HealthStatus, SourceClient};
use shared_types::Chain;
use tracing::debug;

use crate::{EtherscanClient, HiroClient};

/// Registry holding the per-chain explorer clients
#[derive(Debug, Default)]
pub struct ExplorerRegistry {
    etherscan_client: Option<EtherscanClient>,
    hiro_client: Option<HiroClient>,
}

impl ExplorerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            etherscan_client: None,
            hiro_client: None,
        }
    }

    /// Create a registry with the specified clients
    pub fn with_clients(
        etherscan_client: Option<EtherscanClient>,
        hiro_client: Option<HiroClient>,
    ) -> Self {
        Self {
            etherscan_client,
            hiro_client,
        }
    }

    /// Fetch the raw source of a contract from the explorer of its chain
    ///
    /// The caller is expected to have rejected [`Chain::Unknown`] already;
    /// the registry still answers it totally, with a configuration error,
    /// rather than panicking.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the explorer has no source for the identifier,
    /// a transport-class error when the explorer is unreachable, or
    /// `Configuration` when no client is registered for the chain.
    pub async fn fetch_source(
        &self,
        chain: Chain,
        identifier: &str,
    ) -> Result<String, ExplorerError> {
        debug!(identifier, chain = %chain, "dispatching source fetch");

        match chain {
            Chain::Ethereum => match &self.etherscan_client {
                Some(client) => client.fetch_source(identifier).await,
                None => Err(ExplorerError::configuration(
                    "no Etherscan client registered for ethereum",
                )),
            },
            Chain::Stacks => match &self.hiro_client {
                Some(client) => client.fetch_source(identifier).await,
                None => Err(ExplorerError::configuration(
                    "no Hiro client registered for stacks",
                )),
            },
            Chain::Unknown => Err(ExplorerError::configuration(
                "no explorer exists for an unclassified identifier",
            )),
        }
    }

    /// Get the overall health status of all registered clients
    ///
    /// Health checks are performed concurrently for better performance.
    pub async fn overall_health(&self) -> HashMap<String, HealthStatus> {
        let etherscan_future = async {
            match &self.etherscan_client {
                Some(client) => Some((client.name(), client.health_check().await)),
                None => None,
            }
        };

        let hiro_future = async {
            match &self.hiro_client {
                Some(client) => Some((client.name(), client.health_check().await)),
                None => None,
            }
        };

        let (etherscan_result, hiro_result) = tokio::join!(etherscan_future, hiro_future);

        let mut health_status = HashMap::new();
        for entry in [etherscan_result, hiro_result].into_iter().flatten() {
            let (name, result) = entry;
            let status = result.unwrap_or_else(|e| HealthStatus::Down {
                reason: format!("Health check failed: {e}"),
            });
            health_status.insert(name.to_string(), status);
        }

        health_status
    }

    /// Get the number of registered clients
    pub fn client_count(&self) -> usize {
        usize::from(self.etherscan_client.is_some()) + usize::from(self.hiro_client.is_some())
    }

    /// Get the names of all registered clients
    pub fn client_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.etherscan_client.is_some() {
            names.push("etherscan");
        }
        if self.hiro_client.is_some() {
            names.push("hiro");
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use crate::{EtherscanConfig, HiroConfig};

    use super::*;

    fn full_registry() -> ExplorerRegistry {
        ExplorerRegistry::with_clients(
            Some(EtherscanClient::new(EtherscanConfig::default()).unwrap()),
            Some(HiroClient::new(HiroConfig::default()).unwrap()),
        )
    }

    #[test]
    fn empty_registry() {
        let registry = ExplorerRegistry::new();
        assert_eq!(registry.client_count(), 0);
        assert!(registry.client_names().is_empty());
    }

    #[test]
    fn registered_clients_are_listed() {
        let registry = full_registry();
        assert_eq!(registry.client_count(), 2);
        assert_eq!(registry.client_names(), vec!["etherscan", "hiro"]);
    }

    #[tokio::test]
    async fn unknown_chain_is_a_configuration_error() {
        let registry = full_registry();
        let err = registry.fetch_source(Chain::Unknown, "whatever").await;
        assert!(matches!(
            err.unwrap_err(),
            ExplorerError::Configuration { .. }
        ));
    }

    #[tokio::test]
    async fn missing_client_is_a_configuration_error() {
        let registry = ExplorerRegistry::new();
        let err = registry
            .fetch_source(Chain::Ethereum, "0xabc")
            .await
            .unwrap_err();
        assert!(matches!(err, ExplorerError::Configuration { .. }));
    }

    #[tokio::test]
    async fn overall_health_with_no_clients() {
        let registry = ExplorerRegistry::new();
        assert!(registry.overall_health().await.is_empty());
    }
}
