// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! OpenAI API client for contract interpretation
//!
//! This module provides an async client for the OpenAI chat-completions API.
//! Each interpretation is exactly one request: any transport or API failure
//! ends the surrounding pipeline run, there is no retry.

use std::time::{Duration, Instant};

use reqwest::{
    Client, ClientBuilder,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Deserialize, Serialize};
use tracing::{Span, debug, error, info, instrument};
use url::Url;
use uuid::Uuid;

use crate::error::{InterpreterError, InterpreterResult};

/// Model every interpretation request is sent to
pub const COMPLETION_MODEL: &str = "gpt-4";

/// OpenAI Chat Completion API request
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatCompletionRequest {
    /// The model to use for completion
    model: String,
    /// List of messages for the conversation
    messages: Vec<ChatMessage>,
    /// Whether to stream the response
    stream: bool,
}

/// A single message in the chat conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    /// Role of the message sender
    role: String,
    /// Content of the message
    content: String,
}

/// OpenAI Chat Completion API response
#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    /// List of completion choices
    choices: Vec<ChatChoice>,
    /// Token usage information
    usage: Option<TokenUsage>,
}

/// A single completion choice
#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    /// The completion message
    message: ChatMessage,
    /// Reason the completion finished
    #[allow(dead_code)]
    finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Deserialize)]
struct TokenUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// OpenAI API error response
#[derive(Debug, Clone, Deserialize)]
struct OpenAiErrorResponse {
    /// Error details
    error: OpenAiErrorBody,
}

/// OpenAI API error details
#[derive(Debug, Clone, Deserialize)]
struct OpenAiErrorBody {
    /// Error message
    message: String,
    /// Error type
    r#type: Option<String>,
    /// Error code
    code: Option<String>,
}

/// OpenAI API client for contract interpretation
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    /// HTTP client for API requests
    client: Client,
    /// Base URL for the OpenAI API
    base_url: Url,
    /// Request timeout
    timeout: Duration,
}

impl OpenAiClient {
    /// Create a new OpenAI client
    ///
    /// The API key is taken as provided, empty or not: a missing key shows
    /// up as an authentication failure from the API at call time rather
    /// than a pre-flight error here.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created or the key
    /// contains characters that cannot be placed in a header
    pub fn new(
        api_key: String,
        base_url: Option<Url>,
        timeout_seconds: u64,
    ) -> InterpreterResult<Self> {
        const DEFAULT_API_URL: &str = "https://api.openai.com/v1/";
        #[allow(clippy::expect_used)]
        let base_url = base_url
            .unwrap_or_else(|| Url::parse(DEFAULT_API_URL).expect("default OpenAI URL is valid"));

        let timeout = Duration::from_secs(timeout_seconds);

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| InterpreterError::config(format!("Invalid API key format: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = ClientBuilder::new()
            .timeout(timeout)
            .default_headers(headers)
            .user_agent("contract-lens/0.1.0")
            .build()
            .map_err(|e| InterpreterError::http(format!("Failed to create HTTP client: {e}")))?;

        info!(
            "Created OpenAI client with base URL: {} and timeout: {}s",
            base_url, timeout_seconds
        );

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// Generate a natural-language interpretation from the two prompts
    ///
    /// Sends a single chat-completion request with the fixed model and the
    /// system/user message pair, and returns the first choice's text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API rejects it, or the
    /// response carries no choices; the one attempt is never retried
    #[instrument(skip(self, system_prompt, user_prompt), fields(request_id))]
    pub async fn interpret(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> InterpreterResult<String> {
        let request_id = Uuid::new_v4();
        Span::current().record("request_id", request_id.to_string());

        info!(
            request_id = %request_id,
            model = COMPLETION_MODEL,
            prompt_length = user_prompt.len(),
            "Starting interpretation request"
        );

        let request = ChatCompletionRequest {
            model: COMPLETION_MODEL.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            stream: false,
        };

        let url = self.completions_url()?;

        let start_time = Instant::now();
        let response = tokio::time::timeout(self.timeout, self.client.post(url).json(&request).send())
            .await
            .map_err(|_| InterpreterError::timeout(self.timeout.as_secs()))?
            .map_err(InterpreterError::from)?;
        let request_duration = start_time.elapsed();

        debug!(
            request_id = %request_id,
            duration_ms = request_duration.as_millis(),
            "API request completed"
        );

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(Self::error_from_response(status.as_u16(), &response_text));
        }

        let completion: ChatCompletionResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                InterpreterError::invalid_response(format!("Failed to parse response: {e}"))
            })?;

        Self::extract_interpretation(completion, request_id)
    }

    /// Join the completions path onto the configured base URL
    fn completions_url(&self) -> InterpreterResult<Url> {
        let mut base_url = self.base_url.clone();
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }
        base_url
            .join("chat/completions")
            .map_err(|e| InterpreterError::config(format!("Invalid base URL: {e}")))
    }

    /// Map error responses from the OpenAI API onto the error taxonomy
    fn error_from_response(status_code: u16, response_text: &str) -> InterpreterError {
        let detail = match serde_json::from_str::<OpenAiErrorResponse>(response_text) {
            Ok(body) => format!(
                "OpenAI API error ({}): {} (type: {:?}, code: {:?})",
                status_code, body.error.message, body.error.r#type, body.error.code
            ),
            Err(_) => format!("HTTP {status_code} error: {response_text}"),
        };

        error!("{detail}");

        match status_code {
            401 | 403 => InterpreterError::authentication(detail),
            429 => InterpreterError::rate_limit(60),
            500..=599 => InterpreterError::service_unavailable(detail),
            _ => InterpreterError::http(detail),
        }
    }

    /// Pull the generated text out of a successful completion
    fn extract_interpretation(
        completion: ChatCompletionResponse,
        request_id: Uuid,
    ) -> InterpreterResult<String> {
        let Some(choice) = completion.choices.into_iter().next() else {
            return Err(InterpreterError::invalid_response(
                "No choices in completion response",
            ));
        };

        if let Some(ref usage) = completion.usage {
            debug!(
                request_id = %request_id,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Token usage statistics"
            );
        }

        info!(
            request_id = %request_id,
            response_length = choice.message.content.len(),
            "Received interpretation from OpenAI API"
        );

        Ok(choice.message.content)
    }

    /// Test the connection to the OpenAI API
    ///
    /// # Errors
    ///
    /// Returns an error if the completions URL cannot be constructed
    pub async fn health_check(&self) -> InterpreterResult<bool> {
        debug!("Performing OpenAI API health check");

        let request = ChatCompletionRequest {
            model: COMPLETION_MODEL.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "test".to_string(),
            }],
            stream: false,
        };

        let url = self.completions_url()?;

        match self.client.post(url).json(&request).send().await {
            Ok(response) => {
                // 400 is acceptable for a health check, it means the API is
                // responding
                let is_healthy = response.status().is_success() || response.status() == 400;
                if !is_healthy {
                    debug!(
                        "OpenAI API health check failed with status: {}",
                        response.status()
                    );
                }
                Ok(is_healthy)
            }
            Err(e) => {
                debug!("OpenAI API health check failed: {e}");
                Ok(false)
            }
        }
    }
}
