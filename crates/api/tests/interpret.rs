// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the interpretation endpoint
//!
//! These tests run the full pipeline against wiremock stand-ins for the
//! explorers and the completion service, with dependencies injected through
//! `Server::with_dependencies`.

use std::{net::SocketAddr, sync::Arc};

use api::{Server, ServerConfig, ShutdownConfig};
use axum::http::StatusCode;
use explorers::{EtherscanClient, EtherscanConfig, ExplorerRegistry, HiroClient, HiroConfig};
use interpreter::OpenAiClient;
use serde_json::{Value, json};
use source_cache::{InterpretationCache, MemoryStore, SourceCache};
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const WETH_ADDRESS: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";
const ORACLE_CONTRACT: &str = "SP2C2YFP12AJZB4MABJBAJ55XECVS7E4PMMZ89YZR.arkadiko-oracle-v2-2";

/// Start a test server whose explorers and completion service point at the
/// given base URLs, sharing the provided cache store.
async fn spawn_server(
    etherscan_url: &str,
    hiro_url: &str,
    openai_url: &str,
    store: Arc<MemoryStore>,
) -> SocketAddr {
    let etherscan_client = EtherscanClient::new(EtherscanConfig {
        base_url: etherscan_url.to_string(),
        api_key: "test-api-key".to_string(),
        timeout_seconds: 10,
        health_check_timeout_seconds: 5,
    })
    .expect("etherscan client");

    let hiro_client = HiroClient::new(
        HiroConfig::new(hiro_url, 10, 5).expect("hiro config"),
    )
    .expect("hiro client");

    let openai_client = OpenAiClient::new(
        "sk-test-key".to_string(),
        Some(Url::parse(openai_url).expect("openai url")),
        10,
    )
    .expect("openai client");

    let server = Server::with_dependencies(
        ServerConfig::for_testing(),
        ShutdownConfig::default(),
        Arc::new(ExplorerRegistry::with_clients(
            Some(etherscan_client),
            Some(hiro_client),
        )),
        Arc::new(openai_client),
        store,
    )
    .expect("Failed to create server");

    let (addr, _token) = server
        .run_for_testing()
        .await
        .expect("Failed to start test server");
    addr
}

/// Mock a successful completion-service response with the given text
async fn mount_completion(mock_server: &MockServer, content: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "created": 1234567890,
            "model": "gpt-4",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 50, "completion_tokens": 20, "total_tokens": 70 }
        })))
        .expect(expected_calls)
        .mount(mock_server)
        .await;
}

async fn post_interpret(addr: SocketAddr, body: &Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{addr}/v1/interpret"))
        .json(body)
        .send()
        .await
        .expect("Failed to send request")
}

#[tokio::test]
async fn interpret_ethereum_contract_end_to_end() {
    let etherscan = MockServer::start().await;
    let hiro = MockServer::start().await;
    let openai = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api"))
        .and(query_param("action", "getsourcecode"))
        .and(query_param("address", WETH_ADDRESS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "1",
            "message": "OK",
            "result": [{
                "SourceCode": "pragma solidity ...\nGNU GENERAL PUBLIC LICENSE\nfooter",
                "ContractName": "WETH9"
            }]
        })))
        .expect(1)
        .mount(&etherscan)
        .await;

    mount_completion(&openai, "This contract wraps Ether into an ERC-20 token.", 1).await;

    let addr = spawn_server(
        &etherscan.uri(),
        &hiro.uri(),
        &openai.uri(),
        Arc::new(MemoryStore::new()),
    )
    .await;

    let response = post_interpret(addr, &json!({ "address": WETH_ADDRESS })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["requestedContractAddress"], WETH_ADDRESS);
    assert_eq!(body["blockchain"], "ethereum");
    // The license banner and everything after it is stripped
    assert_eq!(body["sourceCode"], "pragma solidity ...");
    assert_eq!(
        body["interpretation"],
        "This contract wraps Ether into an ERC-20 token."
    );
}

#[tokio::test]
async fn interpret_stacks_contract_end_to_end() {
    let etherscan = MockServer::start().await;
    let hiro = MockServer::start().await;
    let openai = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/extended/v1/contract/{ORACLE_CONTRACT}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "contract_id": ORACLE_CONTRACT,
            "source_code": "(define-public (get-price) (ok u100))"
        })))
        .expect(1)
        .mount(&hiro)
        .await;

    mount_completion(&openai, "An on-chain price oracle.", 1).await;

    let addr = spawn_server(
        &etherscan.uri(),
        &hiro.uri(),
        &openai.uri(),
        Arc::new(MemoryStore::new()),
    )
    .await;

    let response = post_interpret(addr, &json!({ "address": ORACLE_CONTRACT })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["blockchain"], "stacks");
    assert_eq!(body["sourceCode"], "(define-public (get-price) (ok u100))");
    assert_eq!(body["interpretation"], "An on-chain price oracle.");
}

#[tokio::test]
async fn empty_address_is_rejected() {
    let etherscan = MockServer::start().await;
    let hiro = MockServer::start().await;
    let openai = MockServer::start().await;

    let addr = spawn_server(
        &etherscan.uri(),
        &hiro.uri(),
        &openai.uri(),
        Arc::new(MemoryStore::new()),
    )
    .await;

    let response = post_interpret(addr, &json!({ "address": "" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["error"], "Contract address is required");
}

#[tokio::test]
async fn missing_address_field_is_rejected_the_same_way() {
    let etherscan = MockServer::start().await;
    let hiro = MockServer::start().await;
    let openai = MockServer::start().await;

    let addr = spawn_server(
        &etherscan.uri(),
        &hiro.uri(),
        &openai.uri(),
        Arc::new(MemoryStore::new()),
    )
    .await;

    let response = post_interpret(addr, &json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["error"], "Contract address is required");
}

#[tokio::test]
async fn unsupported_chain_is_rejected_without_explorer_calls() {
    let etherscan = MockServer::start().await;
    let hiro = MockServer::start().await;
    let openai = MockServer::start().await;

    // Neither explorer nor the completion service may be contacted
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&etherscan)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&hiro)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&openai)
        .await;

    let addr = spawn_server(
        &etherscan.uri(),
        &hiro.uri(),
        &openai.uri(),
        Arc::new(MemoryStore::new()),
    )
    .await;

    let response = post_interpret(addr, &json!({ "address": "not-a-valid-id" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["error"], "Unsupported blockchain");
}

#[tokio::test]
async fn explorer_not_found_is_400_without_completion_calls() {
    let etherscan = MockServer::start().await;
    let hiro = MockServer::start().await;
    let openai = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "0",
            "message": "NOTOK",
            "result": []
        })))
        .expect(1)
        .mount(&etherscan)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&openai)
        .await;

    let addr = spawn_server(
        &etherscan.uri(),
        &hiro.uri(),
        &openai.uri(),
        Arc::new(MemoryStore::new()),
    )
    .await;

    let response = post_interpret(addr, &json!({ "address": WETH_ADDRESS })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("json body");
    let error = body["error"].as_str().expect("error string");
    assert!(error.contains(WETH_ADDRESS), "error was: {error}");
}

#[tokio::test]
async fn explorer_transport_failure_is_500() {
    let hiro = MockServer::start().await;
    let openai = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&openai)
        .await;

    // Etherscan base URL points at a closed port: the connection is refused
    let addr = spawn_server(
        "http://127.0.0.1:9",
        &hiro.uri(),
        &openai.uri(),
        Arc::new(MemoryStore::new()),
    )
    .await;

    let response = post_interpret(addr, &json!({ "address": WETH_ADDRESS })).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json().await.expect("json body");
    assert!(!body["error"].as_str().expect("error string").is_empty());
}

#[tokio::test]
async fn source_cache_hit_bypasses_the_explorer() {
    let etherscan = MockServer::start().await;
    let hiro = MockServer::start().await;
    let openai = MockServer::start().await;

    // The explorer must never be asked about a previously seen identifier
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&etherscan)
        .await;

    mount_completion(&openai, "A cached contract, freshly interpreted.", 1).await;

    let store = Arc::new(MemoryStore::new());
    SourceCache::new(Arc::clone(&store))
        .set(WETH_ADDRESS, "contract Cached {}\nGNU GENERAL PUBLIC LICENSE\nfooter")
        .await
        .expect("cache write");

    let addr = spawn_server(&etherscan.uri(), &hiro.uri(), &openai.uri(), store).await;

    let response = post_interpret(addr, &json!({ "address": WETH_ADDRESS })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("json body");
    // The cached value is used unchanged, then sanitized for the response
    assert_eq!(body["sourceCode"], "contract Cached {}");
    assert_eq!(
        body["interpretation"],
        "A cached contract, freshly interpreted."
    );
}

#[tokio::test]
async fn interpretation_cache_hit_bypasses_the_completion_service() {
    let etherscan = MockServer::start().await;
    let hiro = MockServer::start().await;
    let openai = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&openai)
        .await;

    let store = Arc::new(MemoryStore::new());
    SourceCache::new(Arc::clone(&store))
        .set(WETH_ADDRESS, "contract Cached {}")
        .await
        .expect("cache write");
    InterpretationCache::new(Arc::clone(&store))
        .set(WETH_ADDRESS, "A previously generated synopsis.")
        .await
        .expect("cache write");

    let addr = spawn_server(&etherscan.uri(), &hiro.uri(), &openai.uri(), store).await;

    let response = post_interpret(addr, &json!({ "address": WETH_ADDRESS })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["interpretation"], "A previously generated synopsis.");
}

#[tokio::test]
async fn completion_failure_is_500() {
    let etherscan = MockServer::start().await;
    let hiro = MockServer::start().await;
    let openai = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "1",
            "message": "OK",
            "result": [{ "SourceCode": "contract T {}", "ContractName": "T" }]
        })))
        .mount(&etherscan)
        .await;

    // One attempt only; the pipeline never retries a failed interpretation
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .expect(1)
        .mount(&openai)
        .await;

    let addr = spawn_server(
        &etherscan.uri(),
        &hiro.uri(),
        &openai.uri(),
        Arc::new(MemoryStore::new()),
    )
    .await;

    let response = post_interpret(addr, &json!({ "address": WETH_ADDRESS })).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json().await.expect("json body");
    assert!(
        body["error"]
            .as_str()
            .expect("error string")
            .starts_with("Server error:")
    );
}

#[tokio::test]
async fn second_request_is_served_entirely_from_cache() {
    let etherscan = MockServer::start().await;
    let hiro = MockServer::start().await;
    let openai = MockServer::start().await;

    // Exactly one explorer call and one completion call across two requests
    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "1",
            "message": "OK",
            "result": [{ "SourceCode": "contract Once {}", "ContractName": "Once" }]
        })))
        .expect(1)
        .mount(&etherscan)
        .await;

    mount_completion(&openai, "Interpreted exactly once.", 1).await;

    let addr = spawn_server(
        &etherscan.uri(),
        &hiro.uri(),
        &openai.uri(),
        Arc::new(MemoryStore::new()),
    )
    .await;

    let first = post_interpret(addr, &json!({ "address": WETH_ADDRESS })).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_interpret(addr, &json!({ "address": WETH_ADDRESS })).await;
    assert_eq!(second.status(), StatusCode::OK);

    let body: Value = second.json().await.expect("json body");
    assert_eq!(body["interpretation"], "Interpreted exactly once.");
    assert_eq!(body["sourceCode"], "contract Once {}");
}

#[tokio::test]
async fn health_endpoint_reports_clients() {
    let etherscan = MockServer::start().await;
    let hiro = MockServer::start().await;
    let openai = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "1", "message": "OK", "result": "120000000"
        })))
        .mount(&etherscan)
        .await;
    Mock::given(method("GET"))
        .and(path("/extended/v1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ready" })))
        .mount(&hiro)
        .await;
    mount_completion(&openai, "ok", 1).await;

    let addr = spawn_server(
        &etherscan.uri(),
        &hiro.uri(),
        &openai.uri(),
        Arc::new(MemoryStore::new()),
    )
    .await;

    let response = reqwest::Client::new()
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["status"], "Up");
    assert!(body["api_clients"].get("etherscan").is_some());
    assert!(body["api_clients"].get("hiro").is_some());
    assert!(body["api_clients"].get("openai").is_some());
}
