// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Hiro API integration
//!
//! This module provides an implementation of the `SourceClient` trait for the
//! Hiro API, which serves metadata (including Clarity source code) for Stacks
//! mainnet contracts. Unlike Etherscan, the Hiro contract endpoint takes the
//! identifier in the URL path and requires no API key.

use std::time::Duration;

use explorer_client::{ExplorerError, HealthStatus, SourceClient};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::non_empty_string::NonEmptyString;

const DEFAULT_HIRO_BASE_URL: &str = "https://api.mainnet.hiro.so";
const DEFAULT_HIRO_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_HIRO_HEALTH_CHECK_TIMEOUT_SECONDS: u64 = 5;

/// Configuration for the Hiro API client
/// This type is always valid by construction.
#[derive(Debug, Clone)]
pub struct HiroConfig {
    /// Base URL for the Hiro API
    pub base_url: NonEmptyString,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Health check timeout in seconds
    pub health_check_timeout_seconds: u64,
}

impl HiroConfig {
    /// Create a new `HiroConfig` with validation
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or whitespace-only
    pub fn new(
        base_url: impl Into<String>,
        timeout_seconds: u64,
        health_check_timeout_seconds: u64,
    ) -> Result<Self, String> {
        Ok(Self {
            base_url: NonEmptyString::new(base_url)?,
            timeout_seconds,
            health_check_timeout_seconds,
        })
    }
}

impl Default for HiroConfig {
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        Self {
            base_url: NonEmptyString::new(DEFAULT_HIRO_BASE_URL).expect("known to be non-empty"),
            timeout_seconds: DEFAULT_HIRO_TIMEOUT_SECONDS,
            health_check_timeout_seconds: DEFAULT_HIRO_HEALTH_CHECK_TIMEOUT_SECONDS,
        }
    }
}

/// Hiro API client implementation
#[derive(Debug)]
pub struct HiroClient {
    client: Client,
    config: HiroConfig,
}

/// Response of the Hiro contract metadata endpoint
///
/// Only the source field is consumed; everything else in the payload
/// (tx id, ABI, block height) is ignored.
#[derive(Debug, Deserialize)]
pub struct HiroContractResponse {
    /// Clarity source code of the contract
    #[serde(default)]
    pub source_code: String,
}

impl HiroClient {
    /// Create a new Hiro API client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(config: HiroConfig) -> Result<Self, ExplorerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("contract-lens/0.1.0")
            .build()
            .map_err(ExplorerError::http)?;

        Ok(Self { client, config })
    }
}

impl SourceClient for HiroClient {
    async fn fetch_source(&self, identifier: &str) -> Result<String, ExplorerError> {
        let url = format!(
            "{}/extended/v1/contract/{identifier}",
            self.config.base_url
        );

        debug!(url, identifier, "fetching contract source from Hiro");

        let request = self.client.get(&url).header("accept", "application/json");

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
                let body: HiroContractResponse = response
                    .json()
                    .await
                    .map_err(ExplorerError::invalid_response)?;

                if body.source_code.is_empty() {
                    debug!(identifier, "Hiro returned contract without source code");
                    Err(ExplorerError::not_found(identifier))
                } else {
                    Ok(body.source_code)
                }
            }
            status => {
                warn!(
                    identifier,
                    status = status.as_u16(),
                    "Hiro returned non-200 status"
                );
                Err(ExplorerError::not_found(identifier))
            }
        }
    }

    async fn health_check(&self) -> Result<HealthStatus, ExplorerError> {
        let url = format!("{}/extended/v1/status", self.config.base_url);

        debug!(url, "performing health check on Hiro API");

        let request = self.client.get(&url).header("accept", "application/json");

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
        "hiro"
    }
}
