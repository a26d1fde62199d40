// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! KRT manifest data model and parsing.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors produced while reading a KRT manifest into memory.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The manifest could not be read from its source.
    #[error("reading KRT manifest: {0}")]
    Io(#[from] std::io::Error),

    /// The manifest is not well-formed YAML or does not match the schema.
    #[error("decoding KRT manifest yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Parse a KRT manifest from a reader.
pub fn parse<R: Read>(reader: R) -> Result<Manifest, ParseError> {
    Ok(serde_yaml::from_reader(reader)?)
}

/// Parse a KRT manifest from a file on disk.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Manifest, ParseError> {
    let file = std::fs::File::open(path)?;
    parse(file)
}

/// A parsed KRT deployment manifest.
///
/// `version` is the tag of the Version this bundle deploys; it must be unique
/// within the target product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Version tag, e.g. `v1.2.0`.
    pub version: String,
    /// Human description shown in listings.
    pub description: String,
    /// Version-scoped configuration variables.
    #[serde(default)]
    pub config: BTreeMap<String, String>,
    /// Workflows deployed by this bundle, in declaration order.
    pub workflows: Vec<Workflow>,
}

/// A workflow declaration inside a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub name: String,
    #[serde(rename = "type")]
    pub workflow_type: WorkflowType,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
    pub processes: Vec<Process>,
}

/// Workflow classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowType {
    Data,
    Training,
    Feedback,
    Serving,
}

/// A process declaration inside a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    pub name: String,
    #[serde(rename = "type")]
    pub process_type: ProcessType,
    pub image: String,
    /// Defaults to 1 when omitted.
    pub replicas: Option<u32>,
    /// Defaults to false when omitted.
    pub gpu: Option<bool>,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
    pub object_store: Option<ObjectStore>,
    #[serde(default)]
    pub secrets: BTreeMap<String, String>,
    /// Names of upstream processes this one consumes from.
    #[serde(default)]
    pub subscriptions: Vec<String>,
    pub networking: Option<Networking>,
    pub resource_limits: Option<ResourceLimits>,
}

/// Process role within a workflow's execution graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessType {
    Trigger,
    Task,
    Exit,
}

/// Object store requested by a process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectStore {
    pub name: String,
    #[serde(default)]
    pub scope: ObjectStoreScope,
}

/// Lifetime scope of a process' object store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectStoreScope {
    #[default]
    Product,
    Workflow,
}

/// Inbound networking exposed by a trigger process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Networking {
    pub target_port: u16,
    pub destination_port: u16,
    #[serde(default)]
    pub protocol: NetworkingProtocol,
}

/// Protocol spoken on a trigger's network port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NetworkingProtocol {
    #[default]
    Http,
    Grpc,
}

/// CPU/memory requests and limits for a process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceLimits {
    pub cpu: Option<ResourceLimit>,
    pub memory: Option<ResourceLimit>,
}

/// A single request/limit pair, in Kubernetes quantity notation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceLimit {
    pub request: String,
    pub limit: String,
}
