// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Non-empty string validation utilities
//!
//! This module provides [`NonEmptyString`], a wrapper that makes empty
//! configuration values unrepresentable by construction. Explorer base URLs
//! and similar settings are validated once, at the edge, instead of being
//! re-checked at every use site.
//!
//! # Examples
//!
//! ```rust
//! use explorers::NonEmptyString;
//!
//! let base_url = NonEmptyString::new("https://api.mainnet.hiro.so").expect("valid URL");
//! assert_eq!(base_url.as_str(), "https://api.mainnet.hiro.so");
//!
//! assert!(NonEmptyString::new("").is_err());
//! assert!(NonEmptyString::new("   \t\n  ").is_err());
//! ```

use core::fmt;
use std::str::FromStr;

/// A non-empty string wrapper that ensures validity at construction
///
/// Guarantees that the contained string has at least one non-whitespace
/// character and is immutable after construction. Uses `Box<str>` internally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyString(Box<str>);

impl NonEmptyString {
    /// Create a new `NonEmptyString` from any string-like input
    ///
    /// Whitespace-only input is rejected; leading/trailing whitespace around
    /// otherwise valid content is preserved.
    ///
    /// # Errors
    ///
    /// Returns a descriptive message when the input is empty or
    /// whitespace-only
    pub fn new(s: impl Into<String>) -> Result<Self, String> {
        let s = s.into();
        if s.trim().is_empty() {
            Err("String cannot be empty or whitespace-only".to_string())
        } else {
            Ok(NonEmptyString(s.into_boxed_str()))
        }
    }

    /// Get a string slice of the contained value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NonEmptyString {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
