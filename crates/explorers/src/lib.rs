// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Chain explorer integrations for contract source retrieval
//!
//! This crate provides implementations of the `SourceClient` trait for the
//! explorers of the supported chains, along with chain-tag dispatch through
//! the registry pattern.
//!
//! # Architecture
//!
//! - **Client Implementations**: [`etherscan`] (Ethereum), [`hiro`] (Stacks)
//! - **Registry Pattern**: [`registry::ExplorerRegistry`] - dispatches a
//!   fetch to the right client based on the classified chain tag
//! - **Validation Utilities**: [`non_empty_string::NonEmptyString`] - ensures
//!   non-empty string constraints on configuration values
//!
//! A fetch is attempted exactly once; failures are never retried here (a
//! single failed attempt ends the surrounding request).

pub mod etherscan;
pub mod hiro;
pub mod non_empty_string;
pub mod registry;

pub use etherscan::*;
pub use hiro::*;
pub use non_empty_string::NonEmptyString;
pub use registry::*;
