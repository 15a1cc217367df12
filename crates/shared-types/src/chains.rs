// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Blockchain chain tags and identifier classification
//!
//! This module provides the `Chain` tag for supported blockchain networks
//! and the lexical classifier that derives a tag from a contract identifier.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

/// Ethereum contract addresses are `0x` plus 40 hex characters.
const ETHEREUM_ADDRESS_LEN: usize = 42;

/// Blockchain a contract identifier belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ToSchema)]
pub enum Chain {
    /// Ethereum mainnet, source code served by Etherscan
    Ethereum,
    /// Stacks mainnet, source code served by the Hiro API
    Stacks,
    /// Identifier did not match any supported chain
    Unknown,
}

impl Chain {
    /// Classify a contract identifier by its lexical shape alone.
    ///
    /// Rules are applied in order, first match wins:
    /// 1. exactly 42 characters → [`Chain::Ethereum`] (`0x` + 40 hex digits;
    ///    the hex digits themselves are not validated)
    /// 2. contains a `.` → [`Chain::Stacks`] (`<principal>.<contract-name>`)
    /// 3. anything else → [`Chain::Unknown`]
    ///
    /// Total function: no I/O, never fails.
    pub fn classify(identifier: &str) -> Self {
        if identifier.len() == ETHEREUM_ADDRESS_LEN {
            // example contract with verified source:
            // 0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2
            Self::Ethereum
        } else if identifier.contains('.') {
            // example Stacks contract:
            // SP2C2YFP12AJZB4MABJBAJ55XECVS7E4PMMZ89YZR.arkadiko-oracle-v2-2
            Self::Stacks
        } else {
            Self::Unknown
        }
    }

    /// Returns the lowercase wire name of the chain
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Stacks => "stacks",
            Self::Unknown => "unknown",
        }
    }

    /// Returns whether a source explorer exists for this chain
    pub const fn is_supported(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Returns the chains an explorer adapter exists for
    pub const fn supported() -> &'static [Self] {
        &[Self::Ethereum, Self::Stacks]
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Chain {
    type Err = ChainParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ethereum" | "eth" => Ok(Self::Ethereum),
            "stacks" | "stx" => Ok(Self::Stacks),
            "unknown" => Ok(Self::Unknown),
            _ => Err(ChainParseError::InvalidName(s.to_string())),
        }
    }
}

impl Serialize for Chain {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Chain {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Self::from_str(&name).map_err(|_| {
            serde::de::Error::invalid_value(
                serde::de::Unexpected::Str(&name),
                &"a chain name (ethereum, stacks, unknown)",
            )
        })
    }
}

/// Error type for chain name parsing
#[derive(Debug, thiserror::Error)]
pub enum ChainParseError {
    /// Invalid chain name
    #[error("unsupported chain name: {0}. Supported chain names are: ethereum, stacks")]
    InvalidName(String),
}
