// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Registered process entity: an independently versioned, buildable unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::process::ProcessType;

/// A process registered in the platform registry, independent of any version.
///
/// The ID is deterministic: `scope_name:version`, where scope is either the
/// owning product ID or the global registry name for public processes. The
/// image reference is derived from the registry host and the ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredProcess {
    /// Deterministic identifier, `scope_name:version`.
    pub id: String,
    /// Process name.
    pub name: String,
    /// Process version label; `latest` marks a floating tag.
    pub version: String,
    /// Role the process plays when wired into a workflow.
    pub process_type: ProcessType,
    /// Full container image reference, `registry-host/id`.
    pub image: String,
    /// When the sources were uploaded.
    pub upload_date: DateTime<Utc>,
    /// Email of the registering user.
    pub owner: String,
    /// Build pipeline status.
    pub status: RegisteredProcessStatus,
    /// Last build error text, when the pipeline failed.
    pub logs: Option<String>,
    /// Whether the process is visible to every product.
    pub is_public: bool,
}

impl RegisteredProcess {
    /// Whether a re-registration may overwrite this record.
    ///
    /// Only floating `latest` tags and failed builds may be replaced; any
    /// other existing record blocks re-registration.
    pub fn can_be_overwritten(&self) -> bool {
        self.version == "latest" || self.status == RegisteredProcessStatus::Failed
    }
}

/// Build pipeline status of a registered process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegisteredProcessStatus {
    /// Sources accepted, image build in flight.
    Creating,
    /// Image built and pushed.
    Created,
    /// Build pipeline failed; see [`RegisteredProcess::logs`].
    Failed,
}

impl std::fmt::Display for RegisteredProcessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Creating => "CREATING",
            Self::Created => "CREATED",
            Self::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered(version: &str, status: RegisteredProcessStatus) -> RegisteredProcess {
        RegisteredProcess {
            id: format!("demo_parser:{version}"),
            name: "parser".to_string(),
            version: version.to_string(),
            process_type: ProcessType::Task,
            image: format!("registry.local/demo_parser:{version}"),
            upload_date: Utc::now(),
            owner: "owner@kiln.dev".to_string(),
            status,
            logs: None,
            is_public: false,
        }
    }

    #[test]
    fn test_latest_tag_can_be_overwritten() {
        assert!(registered("latest", RegisteredProcessStatus::Created).can_be_overwritten());
    }

    #[test]
    fn test_failed_build_can_be_overwritten() {
        assert!(registered("v1.0.0", RegisteredProcessStatus::Failed).can_be_overwritten());
    }

    #[test]
    fn test_pinned_versions_are_immutable() {
        assert!(!registered("v1.0.0", RegisteredProcessStatus::Created).can_be_overwritten());
        assert!(!registered("v1.0.0", RegisteredProcessStatus::Creating).can_be_overwritten());
    }
}
