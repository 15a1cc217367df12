// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Prometheus metrics module
//!
//! Provides global metrics using the default Prometheus registry via macros and
//! an Axum-compatible metrics handler.

use std::sync::LazyLock;

use axum::{
    http::{StatusCode, header},
    response::Response,
};
use prometheus::{
    Encoder, HistogramVec, IntCounterVec, TextEncoder, register_histogram_vec,
    register_int_counter_vec,
};
use shared_types::Chain;

/// Total number of interpretation requests received, labeled by chain.
pub static REQUESTS_BY_CHAIN: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "contract_lens_requests_total",
        "Total number of interpretation requests, labeled by chain",
        &["chain"]
    )
    .expect("Failed to create contract_lens_requests_total counter vec")
});

/// Histogram for explorer request durations in seconds.
pub static EXPLORER_REQUEST_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    register_histogram_vec!(
        "contract_lens_explorer_request_duration",
        "Explorer request durations in seconds",
        &["chain", "result"],
        vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .expect("Failed to create explorer request duration histogram")
});

/// Histogram for completion-service request durations in seconds.
pub static INTERPRETER_REQUEST_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    register_histogram_vec!(
        "contract_lens_interpreter_request_duration",
        "Completion-service request durations in seconds",
        &["result"],
        vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]
    )
    .expect("Failed to create interpreter request duration histogram")
});

/// Cache hit/miss counters for the two pipeline caches
pub static CACHE_OPERATIONS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "contract_lens_cache_operations_total",
        "Total number of cache operations",
        &["operation", "cache"]
    )
    .expect("Failed to create cache operations counter vec")
});

/// Increment the requests counter with the chain label
pub fn inc_requests_by_chain(chain: Chain) {
    REQUESTS_BY_CHAIN.with_label_values(&[chain.name()]).inc();
}

/// Observe the duration of an explorer request
///
/// # Arguments
/// * `chain` - The chain whose explorer was queried
/// * `result` - The result of the request (`success`, `not_found`, `error`)
/// * `duration_secs` - The duration of the request in seconds
pub fn observe_explorer_duration(chain: &str, result: &str, duration_secs: f64) {
    EXPLORER_REQUEST_DURATION
        .with_label_values(&[chain, result])
        .observe(duration_secs);
}

/// Observe the duration of a completion-service request
pub fn observe_interpreter_duration(result: &str, duration_secs: f64) {
    INTERPRETER_REQUEST_DURATION
        .with_label_values(&[result])
        .observe(duration_secs);
}

/// Record a cache operation
///
/// # Arguments
/// * `operation` - The cache operation (`hit`, `miss`, `store`, `store_error`)
/// * `cache` - The cache touched (`source` or `interpretation`)
pub fn record_cache_operation(operation: &str, cache: &str) {
    CACHE_OPERATIONS
        .with_label_values(&[operation, cache])
        .inc();
}

/// Axum handler that exports metrics in Prometheus text format
///
/// # Panics
///
/// This function will panic if:
/// - The metrics encoder fails to encode the metrics data
/// - The UTF-8 conversion of the encoded buffer fails
/// - The HTTP response builder fails to create the response
#[allow(clippy::expect_used)]
pub async fn metrics_handler() -> Response<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, encoder.format_type())
        .body(String::from_utf8(buffer).expect("metrics buffer should be valid UTF-8"))
        .expect("Failed to create metrics response")
}
