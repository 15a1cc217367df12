// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! LLM-backed natural-language interpretation of smart contract source
//!
//! This crate turns sanitized contract source code into a natural-language
//! synopsis by prompting an external chat-completion service.
//!
//! # Architecture
//!
//! - [`prompt`]: prompt construction, including the character-budget
//!   truncation that keeps the source inside the model's context window
//! - [`openai`]: chat-completion client; one request per interpretation,
//!   never retried
//! - [`error`]: error types for completion-service failures
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use interpreter::{OpenAiClient, prompt};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::new("sk-your-api-key".to_string(), None, 60)?;
//!
//! let source = "pragma solidity ^0.8.0;\ncontract Token {}";
//! let interpretation = client
//!     .interpret(prompt::system_prompt(), &prompt::user_prompt(source))
//!     .await?;
//!
//! println!("{interpretation}");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod openai;
pub mod prompt;

pub use error::{InterpreterError, InterpreterResult};
pub use openai::OpenAiClient;
pub use prompt::{MAX_SOURCE_CHARS, limit_source_chars, system_prompt, user_prompt};
