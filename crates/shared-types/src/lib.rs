// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Shared types for the contract interpretation service
//!
//! This crate provides common types that are shared across multiple crates
//! in the contract-lens workspace, avoiding circular dependencies.

pub mod chains;
pub mod sanitize;

pub use chains::{Chain, ChainParseError};
pub use sanitize::strip_license_boilerplate;
