// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Version entity and its lifecycle state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::process::Process;

/// A key/value configuration variable attached to a version, workflow or
/// process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationVariable {
    /// Variable name, injected as an environment variable downstream.
    pub key: String,
    /// Variable value.
    pub value: String,
}

/// A deployable unit of a product, created from a KRT manifest.
///
/// The tag is the immutable business key: unique within the owning product.
/// Versions are never deleted; they move through the lifecycle state machine
/// driven by the version handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    /// Unique tag within the product, e.g. `v1.2.0`.
    pub tag: String,
    /// Human description from the manifest.
    pub description: String,
    /// Version-scoped configuration.
    pub config: Vec<ConfigurationVariable>,
    /// Workflows in manifest declaration order.
    pub workflows: Vec<Workflow>,
    /// When the version record was created.
    pub creation_date: DateTime<Utc>,
    /// User that uploaded the manifest.
    pub creation_author: String,
    /// When the version was last published, if ever.
    pub publication_date: Option<DateTime<Utc>>,
    /// User that published the version, if published.
    pub publication_author: Option<String>,
    /// Current lifecycle status.
    pub status: VersionStatus,
    /// Last fatal error message, cleared on a successful start.
    pub error: Option<String>,
}

/// Lifecycle status of a version.
///
/// ```text
///            ┌─────────┐
///            │ CREATED │
///            └────┬────┘
///                 │ start
///                 ▼
///            ┌──────────┐   failure    ┌───────┐
///            │ STARTING │─────────────▶│ ERROR │
///            └────┬─────┘              └───┬───┘
///                 │                        │ start
///                 ▼                        │
///   unpublish ┌─────────┐  publish        │
///      ┌─────▶│ STARTED │────────┐        │
///      │      └──┬───┬──┘        ▼        │
///      │         │   ▲     ┌───────────┐  │
///      │    stop │   └─────│ PUBLISHED │  │
///      │         ▼         └───────────┘  │
///      │    ┌──────────┐   failure        │
///      └────│ STOPPING │─────────────────▶│
///           └────┬─────┘                (ERROR)
///                │
///                ▼
///           ┌─────────┐
///           │ STOPPED │──── start ───▶ (STARTING)
///           └─────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VersionStatus {
    /// Registered from a manifest, never started.
    Created,
    /// Streaming resources provisioned, workload start in flight.
    Starting,
    /// Workload running.
    Started,
    /// Workload running and exposed as the product's published version.
    Published,
    /// Workload stop in flight.
    Stopping,
    /// Workload stopped, resources released.
    Stopped,
    /// A start or stop failed; see [`Version::error`].
    Error,
}

impl VersionStatus {
    /// Canonical uppercase name, as persisted and logged.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Starting => "STARTING",
            Self::Started => "STARTED",
            Self::Published => "PUBLISHED",
            Self::Stopping => "STOPPING",
            Self::Stopped => "STOPPED",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Version {
    /// A version can be started from the states that hold no running
    /// workload.
    pub fn can_be_started(&self) -> bool {
        matches!(
            self.status,
            VersionStatus::Created | VersionStatus::Stopped | VersionStatus::Error
        )
    }

    /// A version can only be stopped while its workload runs unpublished.
    pub fn can_be_stopped(&self) -> bool {
        self.status == VersionStatus::Started
    }

    /// Mark the version as started and clear any previous error.
    pub fn set_started_status(&mut self) {
        self.status = VersionStatus::Started;
        self.error = None;
    }

    /// Mark the version as failed with the given message.
    pub fn set_error_status(&mut self, message: impl Into<String>) {
        self.status = VersionStatus::Error;
        self.error = Some(message.into());
    }

    /// Mark the version as published by the given author, now.
    pub fn set_publish_status(&mut self, author: &str) {
        self.status = VersionStatus::Published;
        self.publication_author = Some(author.to_string());
        self.publication_date = Some(Utc::now());
    }

    /// Clear publication state, returning to started.
    pub fn unset_publish_status(&mut self) {
        self.status = VersionStatus::Started;
        self.publication_author = None;
        self.publication_date = None;
    }
}

/// A workflow within a version: a named process graph of one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    /// Unique name within the version.
    pub name: String,
    /// Workflow classification.
    pub workflow_type: WorkflowType,
    /// Workflow-scoped configuration.
    pub config: Vec<ConfigurationVariable>,
    /// Processes in manifest declaration order.
    pub processes: Vec<Process>,
}

/// Workflow classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowType {
    /// Streaming data pipeline.
    Data,
    /// Model training pipeline.
    Training,
    /// Feedback ingestion pipeline.
    Feedback,
    /// Online serving pipeline.
    Serving,
}

impl WorkflowType {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Training => "training",
            Self::Feedback => "feedback",
            Self::Serving => "serving",
        }
    }
}

impl std::fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
