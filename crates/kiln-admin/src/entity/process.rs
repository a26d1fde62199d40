// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Process entity: a single container within a workflow's graph.

use serde::{Deserialize, Serialize};

use super::version::ConfigurationVariable;

/// A process within a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    /// Unique name within the workflow.
    pub name: String,
    /// Role in the execution graph.
    pub process_type: ProcessType,
    /// Container image reference.
    pub image: String,
    /// Desired replica count.
    pub replicas: i32,
    /// Whether the process requests a GPU.
    pub gpu: bool,
    /// Process-scoped configuration.
    pub config: Vec<ConfigurationVariable>,
    /// Object store requested by the process, if any.
    pub object_store: Option<ProcessObjectStore>,
    /// Secret variables, resolved by the scheduler at start time.
    pub secrets: Vec<ConfigurationVariable>,
    /// Names of upstream processes this one consumes from.
    pub subscriptions: Vec<String>,
    /// Inbound networking, for trigger processes that expose a port.
    pub networking: Option<ProcessNetworking>,
    /// CPU/memory requests and limits.
    pub resource_limits: Option<ProcessResourceLimits>,
    /// Runtime status, reported by the workload scheduler.
    pub status: ProcessStatus,
}

/// Role of a process within a workflow's execution graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessType {
    /// Entry point: receives external requests.
    Trigger,
    /// Intermediate worker.
    Task,
    /// Exit point: produces the workflow's responses.
    Exit,
}

impl ProcessType {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trigger => "trigger",
            Self::Task => "task",
            Self::Exit => "exit",
        }
    }
}

impl std::fmt::Display for ProcessType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Object store reference carried by a process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessObjectStore {
    /// Store name.
    pub name: String,
    /// Lifetime scope of the store.
    pub scope: ObjectStoreScope,
}

/// Lifetime scope of an object store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectStoreScope {
    /// Shared across the whole product.
    Product,
    /// Scoped to the owning workflow.
    Workflow,
}

/// Inbound networking exposed by a process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessNetworking {
    /// Port the container listens on.
    pub target_port: u16,
    /// Port exposed to callers.
    pub destination_port: u16,
    /// Protocol spoken on the port.
    pub protocol: NetworkingProtocol,
}

/// Protocol spoken on an exposed port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NetworkingProtocol {
    /// Plain HTTP.
    Http,
    /// gRPC.
    Grpc,
}

/// A single request/limit pair, in Kubernetes quantity notation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLimit {
    /// Requested amount, e.g. `100m` or `128Mi`.
    pub request: String,
    /// Hard limit, e.g. `200m` or `256Mi`.
    pub limit: String,
}

/// CPU/memory requests and limits for a process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResourceLimits {
    /// CPU request/limit.
    pub cpu: Option<ResourceLimit>,
    /// Memory request/limit.
    pub memory: Option<ResourceLimit>,
}

/// Runtime status of a process, as reported by the workload scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessStatus {
    /// Container scheduled, not yet ready.
    Starting,
    /// Container running and ready.
    Started,
    /// Container stopped.
    Stopped,
    /// Container failed.
    Error,
}

impl std::fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Starting => "STARTING",
            Self::Started => "STARTED",
            Self::Stopped => "STOPPED",
            Self::Error => "ERROR",
        };
        f.write_str(name)
    }
}
