// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration loading from environment variables.

use std::time::Duration;

/// Control-plane configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Container registry host, used to derive registered-process image refs.
    pub registry_host: String,
    /// Registry scope for public process registrations.
    pub global_registry: String,
    /// Bound on background workload-scheduler calls (start/stop).
    pub version_status_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `KILN_REGISTRY_HOST`: container registry host
    ///
    /// Optional (with defaults):
    /// - `KILN_GLOBAL_REGISTRY`: public registry scope name (default: `kiln`)
    /// - `KILN_VERSION_STATUS_TIMEOUT_SECS`: scheduler call bound (default: 180)
    pub fn from_env() -> Result<Self, ConfigError> {
        let registry_host = std::env::var("KILN_REGISTRY_HOST")
            .map_err(|_| ConfigError::Missing("KILN_REGISTRY_HOST"))?;

        let global_registry =
            std::env::var("KILN_GLOBAL_REGISTRY").unwrap_or_else(|_| "kiln".to_string());

        let timeout_secs: u64 = std::env::var("KILN_VERSION_STATUS_TIMEOUT_SECS")
            .unwrap_or_else(|_| "180".to_string())
            .parse()
            .map_err(|_| {
                ConfigError::Invalid(
                    "KILN_VERSION_STATUS_TIMEOUT_SECS",
                    "must be a positive integer number of seconds",
                )
            })?;

        Ok(Self {
            registry_host,
            global_registry,
            version_status_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    /// An environment variable has an invalid value.
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}
