// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Streaming resources provisioned for one version start.
//!
//! Built fresh on every start from the three independent provisioning calls
//! (streams, object stores, key-value stores) and never persisted. Every
//! accessor has defined-or-error semantics: a missing workflow or process key
//! is a [`ResourceConfigError`] naming the missing scope, never a silent
//! default.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::version::Version;

/// Lookup failure in a provisioned resource map.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceConfigError {
    /// No stream configuration exists for the workflow.
    #[error("stream configuration for workflow {workflow:?} not found")]
    WorkflowStreamNotFound {
        /// The missing workflow name.
        workflow: String,
    },

    /// No object-store configuration exists for the workflow.
    #[error("object store configuration for workflow {workflow:?} not found")]
    WorkflowObjectStoreNotFound {
        /// The missing workflow name.
        workflow: String,
    },

    /// No key-value-store configuration exists for the workflow.
    #[error("key-value store configuration for workflow {workflow:?} not found")]
    WorkflowKeyValueStoreNotFound {
        /// The missing workflow name.
        workflow: String,
    },

    /// No stream configuration exists for the process.
    #[error("stream configuration for process {process:?} not found")]
    ProcessStreamNotFound {
        /// The missing process name.
        process: String,
    },

    /// No key-value store exists for the process.
    #[error("key-value store for process {process:?} not found")]
    ProcessKeyValueStoreNotFound {
        /// The missing process name.
        process: String,
    },
}

/// The aggregate of the three independently provisioned resource maps for one
/// version start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionStreamingResources {
    /// Per-workflow stream wiring.
    pub streams: VersionStreams,
    /// Per-workflow per-process object stores.
    pub object_stores: VersionObjectStores,
    /// Global, version, workflow and process key-value stores.
    pub key_value_stores: KeyValueStores,
}

impl VersionStreamingResources {
    /// Combine the three provisioning results.
    pub fn new(
        streams: VersionStreams,
        object_stores: VersionObjectStores,
        key_value_stores: KeyValueStores,
    ) -> Self {
        Self {
            streams,
            object_stores,
            key_value_stores,
        }
    }

    /// Stream wiring for one workflow.
    pub fn workflow_stream(
        &self,
        workflow: &str,
    ) -> Result<&WorkflowStreamConfig, ResourceConfigError> {
        self.streams.workflows.get(workflow).ok_or_else(|| {
            ResourceConfigError::WorkflowStreamNotFound {
                workflow: workflow.to_string(),
            }
        })
    }

    /// Object stores for one workflow.
    pub fn workflow_object_stores(
        &self,
        workflow: &str,
    ) -> Result<&WorkflowObjectStores, ResourceConfigError> {
        self.object_stores.workflows.get(workflow).ok_or_else(|| {
            ResourceConfigError::WorkflowObjectStoreNotFound {
                workflow: workflow.to_string(),
            }
        })
    }

    /// Key-value stores for one workflow.
    pub fn workflow_key_value_stores(
        &self,
        workflow: &str,
    ) -> Result<&WorkflowKeyValueStores, ResourceConfigError> {
        self.key_value_stores.workflows.get(workflow).ok_or_else(|| {
            ResourceConfigError::WorkflowKeyValueStoreNotFound {
                workflow: workflow.to_string(),
            }
        })
    }

    /// Check that every workflow and process of the version has an entry in
    /// each resource map.
    ///
    /// Run before handing the version to the workload scheduler, so an
    /// incomplete provisioning result aborts the start instead of surfacing
    /// as a half-wired deployment.
    pub fn ensure_covers(&self, version: &Version) -> Result<(), ResourceConfigError> {
        for workflow in &version.workflows {
            let stream = self.workflow_stream(&workflow.name)?;
            self.workflow_object_stores(&workflow.name)?;
            let kv = self.workflow_key_value_stores(&workflow.name)?;

            for process in &workflow.processes {
                stream.process_config(&process.name)?;
                kv.process_store(&process.name)?;
            }
        }

        Ok(())
    }
}

/// Per-workflow stream wiring returned by the streaming-resource provisioner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionStreams {
    /// Stream configuration keyed by workflow name.
    pub workflows: HashMap<String, WorkflowStreamConfig>,
}

/// Stream wiring for one workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStreamConfig {
    /// Stream name backing the workflow.
    pub stream: String,
    /// Per-process subjects and subscriptions, keyed by process name.
    pub processes: HashMap<String, ProcessStreamConfig>,
}

impl WorkflowStreamConfig {
    /// Stream wiring for one process.
    pub fn process_config(
        &self,
        process: &str,
    ) -> Result<&ProcessStreamConfig, ResourceConfigError> {
        self.processes.get(process).ok_or_else(|| {
            ResourceConfigError::ProcessStreamNotFound {
                process: process.to_string(),
            }
        })
    }
}

/// Stream wiring for one process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessStreamConfig {
    /// Subject the process publishes on.
    pub subject: String,
    /// Subjects the process consumes from.
    pub subscriptions: Vec<String>,
}

/// Per-workflow object stores returned by the streaming-resource provisioner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionObjectStores {
    /// Object stores keyed by workflow name.
    pub workflows: HashMap<String, WorkflowObjectStores>,
}

/// Object stores for one workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowObjectStores {
    /// Object-store name per process; processes without one are absent.
    pub processes: HashMap<String, String>,
}

impl WorkflowObjectStores {
    /// Object-store name for one process, when it requested one.
    pub fn process_store(&self, process: &str) -> Option<&str> {
        self.processes.get(process).map(String::as_str)
    }
}

/// Key-value stores returned by the streaming-resource provisioner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValueStores {
    /// Product-global store.
    pub global: String,
    /// Version-scoped store.
    pub version: String,
    /// Workflow and process stores, keyed by workflow name.
    pub workflows: HashMap<String, WorkflowKeyValueStores>,
}

/// Key-value stores for one workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowKeyValueStores {
    /// Workflow-scoped store.
    pub store: String,
    /// Process-scoped stores, keyed by process name.
    pub processes: HashMap<String, String>,
}

impl WorkflowKeyValueStores {
    /// Key-value store for one process.
    pub fn process_store(&self, process: &str) -> Result<&str, ResourceConfigError> {
        self.processes
            .get(process)
            .map(String::as_str)
            .ok_or_else(|| ResourceConfigError::ProcessKeyValueStoreNotFound {
                process: process.to_string(),
            })
    }
}
