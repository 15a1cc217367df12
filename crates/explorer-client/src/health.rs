// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Health check types for explorer and completion-service clients

use serde::{Deserialize, Serialize};

/// Health status of an external client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    /// Service is healthy and operational
    Up,
    /// Service is degraded but still functional
    Degraded {
        /// Human-readable explanation of the degradation
        reason: String,
    },
    /// Service is down and not functional
    Down {
        /// Human-readable explanation of why the service is down
        reason: String,
    },
}

impl HealthStatus {
    /// Check if this health status indicates the service is available
    pub fn is_available(&self) -> bool {
        matches!(self, HealthStatus::Up | HealthStatus::Degraded { .. })
    }

    /// Check if this health status indicates the service is completely down
    pub fn is_down(&self) -> bool {
        matches!(self, HealthStatus::Down { .. })
    }

    /// Get a human-readable description of the status
    pub fn description(&self) -> &str {
        match self {
            HealthStatus::Up => "Service is healthy",
            HealthStatus::Degraded { reason } | HealthStatus::Down { reason } => reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_status_availability() {
        assert!(HealthStatus::Up.is_available());
        assert!(
            HealthStatus::Degraded {
                reason: "slow".to_string()
            }
            .is_available()
        );
        assert!(
            !HealthStatus::Down {
                reason: "offline".to_string()
            }
            .is_available()
        );
    }

    #[test]
    fn health_status_down_check() {
        assert!(!HealthStatus::Up.is_down());
        assert!(
            HealthStatus::Down {
                reason: "offline".to_string()
            }
            .is_down()
        );
    }

    #[test]
    fn health_status_description() {
        assert_eq!(HealthStatus::Up.description(), "Service is healthy");
        assert_eq!(
            HealthStatus::Degraded {
                reason: "rate limited".to_string()
            }
            .description(),
            "rate limited"
        );
    }
}
