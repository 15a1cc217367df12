// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP request handlers module
//!
//! This module provides the HTTP request handlers for the contract
//! interpretation server. `interpret_handler` is the orchestrator: it walks a
//! request through validation, chain classification, source resolution,
//! sanitization, and interpretation resolution, and is the only place that
//! decides outward-facing status codes. The resolution helpers always return
//! a typed result and never touch the response themselves.

use std::time::Instant;

use axum::{Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};
use shared_types::{Chain, strip_license_boilerplate};
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::{
    error::ServerError,
    extractors::JsonExtractor,
    metrics,
    state::{HealthCheck, ServerState},
};

/// Health check endpoint handler
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    summary = "Health check endpoint",
    description = "Returns the current health status of the service including version, environment information, and status of the explorer and completion-service clients.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthCheck)
    )
)]
pub async fn health_handler(
    State(state): State<ServerState>,
) -> Result<impl IntoResponse, ServerError> {
    let health = state.health_check().await;
    Ok(Json(health))
}

/// Contract interpretation request
///
/// Carries the contract identifier to resolve and interpret. The field
/// defaults to empty when absent so a missing address reports the same
/// validation error as an empty one.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InterpretRequest {
    /// Contract identifier: an Ethereum address or a Stacks contract ID
    #[serde(default)]
    #[schema(example = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2")]
    pub address: String,
}

/// Response from the interpretation endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterpretResponse {
    /// The identifier the caller asked about, echoed back
    pub requested_contract_address: String,
    /// Chain the identifier was classified as
    pub blockchain: Chain,
    /// Sanitized contract source code
    pub source_code: String,
    /// Natural-language interpretation of the source
    pub interpretation: String,
}

/// Contract interpretation
///
/// Resolves a contract identifier to its published source code and a
/// natural-language interpretation:
/// 1. Classifying the chain from the identifier's shape alone
/// 2. Serving the raw source from cache, or fetching it from the chain's
///    explorer and caching it
/// 3. Stripping trailing license boilerplate
/// 4. Serving the interpretation from cache, or generating it via the
///    completion service and caching it
///
/// Cache writes are best-effort; a failed write is logged and the response
/// still succeeds.
///
/// # Errors
///
/// Returns `ServerError` when the address is missing, the chain is
/// unsupported, the explorer has no source for the identifier, or an
/// upstream service fails.
#[utoipa::path(
    post,
    path = "/v1/interpret",
    tag = "contracts",
    summary = "Interpret a smart contract",
    description = "Resolves a contract identifier to its verified source code and returns the source together with a natural-language interpretation generated by the completion service. Both the raw source and the interpretation are cached per identifier.",
    request_body = InterpretRequest,
    responses(
        (status = 200, description = "Source resolved and interpreted", body = InterpretResponse),
        (status = 400, description = "Missing address, unsupported chain, or no contract at the address", body = String),
        (status = 500, description = "Explorer or completion service failure", body = String)
    )
)]
pub async fn interpret_handler(
    State(state): State<ServerState>,
    JsonExtractor(request): JsonExtractor<InterpretRequest>,
) -> Result<Json<InterpretResponse>, ServerError> {
    let identifier = request.address;
    if identifier.is_empty() {
        return Err(ServerError::MissingAddress);
    }

    let chain = Chain::classify(&identifier);
    if !chain.is_supported() {
        debug!(identifier, "identifier did not classify as a supported chain");
        return Err(ServerError::UnsupportedChain);
    }

    metrics::inc_requests_by_chain(chain);
    info!(identifier, chain = %chain, "interpreting contract");

    let raw_source = resolve_raw_source(&state, chain, &identifier).await?;
    let sanitized = strip_license_boilerplate(&raw_source);
    let interpretation = resolve_interpretation(&state, &identifier, sanitized).await?;

    Ok(Json(InterpretResponse {
        requested_contract_address: identifier,
        blockchain: chain,
        source_code: sanitized.to_string(),
        interpretation,
    }))
}

/// Resolve the raw source for an identifier, consulting the cache first
///
/// A cache hit short-circuits the explorer entirely: a previously seen
/// identifier is never looked up again, even when the cached value captured
/// a past failure sentinel. A cache read failure degrades to a fetch; a
/// cache write failure is logged and swallowed.
async fn resolve_raw_source(
    state: &ServerState,
    chain: Chain,
    identifier: &str,
) -> Result<String, ServerError> {
    match state.source_cache().get(identifier).await {
        Ok(Some(cached)) => {
            metrics::record_cache_operation("hit", "source");
            return Ok(cached);
        }
        Ok(None) => {
            metrics::record_cache_operation("miss", "source");
        }
        Err(e) => {
            warn!(identifier, error = %e, "source cache read failed, falling back to fetch");
        }
    }

    let started = Instant::now();
    let fetched = state.explorers().fetch_source(chain, identifier).await;
    let result_label = match &fetched {
        Ok(_) => "success",
        Err(e) if e.is_not_found() => "not_found",
        Err(_) => "error",
    };
    metrics::observe_explorer_duration(chain.name(), result_label, started.elapsed().as_secs_f64());

    let raw_source = fetched?;

    if let Err(e) = state.source_cache().set(identifier, &raw_source).await {
        metrics::record_cache_operation("store_error", "source");
        warn!(identifier, error = %e, "failed to cache raw source");
    } else {
        metrics::record_cache_operation("store", "source");
    }

    Ok(raw_source)
}

/// Resolve the interpretation for an identifier
///
/// The cache is consulted only when the cache-use policy allows it; the
/// write after a fresh generation happens regardless, so flipping the policy
/// back on picks up previously generated texts. Cached interpretations are
/// never invalidated, even if the underlying source has changed since.
async fn resolve_interpretation(
    state: &ServerState,
    identifier: &str,
    sanitized_source: &str,
) -> Result<String, ServerError> {
    if state.config().interpretation_cache_enabled {
        match state.interpretation_cache().get(identifier).await {
            Ok(Some(cached)) => {
                metrics::record_cache_operation("hit", "interpretation");
                debug!(identifier, "using cached interpretation");
                return Ok(cached);
            }
            Ok(None) => {
                metrics::record_cache_operation("miss", "interpretation");
            }
            Err(e) => {
                warn!(identifier, error = %e, "interpretation cache read failed, regenerating");
            }
        }
    }

    let user_prompt = interpreter::user_prompt(sanitized_source);
    let started = Instant::now();
    let outcome = state
        .interpreter()
        .interpret(interpreter::system_prompt(), &user_prompt)
        .await;
    let result_label = if outcome.is_ok() { "success" } else { "error" };
    metrics::observe_interpreter_duration(result_label, started.elapsed().as_secs_f64());

    let interpretation = outcome?;

    if let Err(e) = state
        .interpretation_cache()
        .set(identifier, &interpretation)
        .await
    {
        metrics::record_cache_operation("store_error", "interpretation");
        warn!(identifier, error = %e, "failed to cache interpretation");
    } else {
        metrics::record_cache_operation("store", "interpretation");
    }

    Ok(interpretation)
}
