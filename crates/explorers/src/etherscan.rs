// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Etherscan API integration
//!
//! This module provides an implementation of the `SourceClient` trait for the
//! Etherscan API, which serves the verified source code of Ethereum mainnet
//! contracts.

use std::time::Duration;

use explorer_client::{ExplorerError, HealthStatus, SourceClient};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Configuration for the Etherscan API client
#[derive(Debug, Clone)]
pub struct EtherscanConfig {
    /// Base URL for the Etherscan API
    pub base_url: String,
    /// API key for authentication. Not validated here: a missing key surfaces
    /// as Etherscan's own error response at call time.
    pub api_key: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Health check timeout in seconds
    pub health_check_timeout_seconds: u64,
}

impl Default for EtherscanConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.etherscan.io".to_string(),
            api_key: "test-api-key".to_string(),
            timeout_seconds: 30,
            health_check_timeout_seconds: 5,
        }
    }
}

/// Etherscan API client implementation
#[derive(Debug)]
pub struct EtherscanClient {
    client: Client,
    config: EtherscanConfig,
}

/// Response envelope of the Etherscan `getsourcecode` endpoint
///
/// `result` is an array of source entries on success but a bare error string
/// on some failures, so it is deserialized lazily.
#[derive(Debug, Deserialize)]
pub struct EtherscanSourceResponse {
    /// Logical status flag, `"1"` means found
    pub status: String,
    /// Human-readable status message
    #[serde(default)]
    pub message: String,
    /// Result payload, shape depends on `status`
    #[serde(default)]
    pub result: serde_json::Value,
}

/// A single entry of the `getsourcecode` result array
#[derive(Debug, Deserialize)]
pub struct EtherscanSourceEntry {
    /// Verified source code text, possibly several concatenated files
    #[serde(rename = "SourceCode", default)]
    pub source_code: String,
    /// Name of the main contract in the source
    #[serde(rename = "ContractName", default)]
    pub contract_name: String,
}

impl EtherscanClient {
    /// Create a new Etherscan API client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created or the base URL
    /// is empty
    pub fn new(config: EtherscanConfig) -> Result<Self, ExplorerError> {
        if config.base_url.trim().is_empty() {
            return Err(ExplorerError::configuration("base URL cannot be empty"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("contract-lens/0.1.0")
            .build()
            .map_err(ExplorerError::http)?;

        Ok(Self { client, config })
    }

    /// Interpret a decoded `getsourcecode` envelope
    ///
    /// Success requires the logical status flag `"1"` and at least one result
    /// entry; the source of the first entry is returned. Everything else is a
    /// not-found for the identifier.
    fn extract_source(
        &self,
        body: EtherscanSourceResponse,
        identifier: &str,
    ) -> Result<String, ExplorerError> {
        if body.status != "1" {
            debug!(
                identifier,
                status = %body.status,
                message = %body.message,
                "Etherscan reported no source for contract"
            );
            return Err(ExplorerError::not_found(identifier));
        }

        let entries: Vec<EtherscanSourceEntry> =
            serde_json::from_value(body.result).map_err(|e| {
                ExplorerError::invalid_response(format!("unexpected result payload: {e}"))
            })?;

        match entries.into_iter().next() {
            Some(entry) => Ok(entry.source_code),
            None => Err(ExplorerError::not_found(identifier)),
        }
    }
}

impl SourceClient for EtherscanClient {
    async fn fetch_source(&self, identifier: &str) -> Result<String, ExplorerError> {
        let url = format!("{}/api", self.config.base_url);

        debug!(url, identifier, "fetching contract source from Etherscan");

        let request = self
            .client
            .get(&url)
            .query(&[
                ("module", "contract"),
                ("action", "getsourcecode"),
                ("address", identifier),
                ("apikey", self.config.api_key.as_str()),
            ])
            .header("accept", "application/json");

        let response = timeout(
            Duration::from_secs(self.config.timeout_seconds),
            request.send(),
        )
        .await
        .map_err(|_| ExplorerError::Timeout {
            seconds: self.config.timeout_seconds,
        })?
        .map_err(ExplorerError::http)?;

        match response.status() {
            StatusCode::OK => {
                let body: EtherscanSourceResponse = response
                    .json()
                    .await
                    .map_err(ExplorerError::invalid_response)?;
                self.extract_source(body, identifier)
            }
            status => {
                // Any non-200 answer from the explorer is treated as the
                // contract not being available, not as a server fault.
                warn!(
                    identifier,
                    status = status.as_u16(),
                    "Etherscan returned non-200 status"
                );
                Err(ExplorerError::not_found(identifier))
            }
        }
    }

    async fn health_check(&self) -> Result<HealthStatus, ExplorerError> {
        let url = format!("{}/api", self.config.base_url);

        debug!(url, "performing health check on Etherscan API");

        let request = self
            .client
            .get(&url)
            .query(&[
                ("module", "stats"),
                ("action", "ethsupply"),
                ("apikey", self.config.api_key.as_str()),
            ])
            .header("accept", "application/json");

        let response = timeout(
            Duration::from_secs(self.config.health_check_timeout_seconds),
            request.send(),
        )
        .await
        .map_err(|_| ExplorerError::Timeout {
            seconds: self.config.health_check_timeout_seconds,
        })?
        .map_err(ExplorerError::http)?;

        match response.status() {
            StatusCode::OK => Ok(HealthStatus::Up),
            StatusCode::TOO_MANY_REQUESTS => Ok(HealthStatus::Degraded {
                reason: "Rate limited".to_string(),
            }),
            status => Ok(HealthStatus::Degraded {
                reason: format!("API returned status {}", status.as_u16()),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "etherscan"
    }
}
