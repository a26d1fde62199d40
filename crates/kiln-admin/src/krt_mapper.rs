// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Mapping from a validated KRT manifest to the internal version model.
//!
//! Pure translation, no I/O: the manifest must already have passed
//! [`kiln_krt::Manifest::validate`]. The produced version always enters the
//! lifecycle at `Created`.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::entity::{
    ConfigurationVariable, NetworkingProtocol, ObjectStoreScope, Process, ProcessNetworking,
    ProcessObjectStore, ProcessResourceLimits, ProcessStatus, ProcessType, ResourceLimit, Version,
    VersionStatus, Workflow, WorkflowType,
};

/// Map a validated manifest into a fresh `Created` version authored by the
/// given user.
pub fn map_manifest_to_version(manifest: &kiln_krt::Manifest, author: &str) -> Version {
    Version {
        tag: manifest.version.clone(),
        description: manifest.description.clone(),
        config: map_config(&manifest.config),
        workflows: manifest.workflows.iter().map(map_workflow).collect(),
        creation_date: Utc::now(),
        creation_author: author.to_string(),
        publication_date: None,
        publication_author: None,
        status: VersionStatus::Created,
        error: None,
    }
}

fn map_config(config: &BTreeMap<String, String>) -> Vec<ConfigurationVariable> {
    config
        .iter()
        .map(|(key, value)| ConfigurationVariable {
            key: key.clone(),
            value: value.clone(),
        })
        .collect()
}

fn map_workflow(workflow: &kiln_krt::Workflow) -> Workflow {
    Workflow {
        name: workflow.name.clone(),
        workflow_type: map_workflow_type(workflow.workflow_type),
        config: map_config(&workflow.config),
        processes: workflow.processes.iter().map(map_process).collect(),
    }
}

fn map_workflow_type(workflow_type: kiln_krt::WorkflowType) -> WorkflowType {
    match workflow_type {
        kiln_krt::WorkflowType::Data => WorkflowType::Data,
        kiln_krt::WorkflowType::Training => WorkflowType::Training,
        kiln_krt::WorkflowType::Feedback => WorkflowType::Feedback,
        kiln_krt::WorkflowType::Serving => WorkflowType::Serving,
    }
}

fn map_process(process: &kiln_krt::Process) -> Process {
    Process {
        name: process.name.clone(),
        process_type: map_process_type(process.process_type),
        image: process.image.clone(),
        replicas: process.replicas.unwrap_or(1) as i32,
        gpu: process.gpu.unwrap_or(false),
        config: map_config(&process.config),
        object_store: process.object_store.as_ref().map(map_object_store),
        secrets: map_config(&process.secrets),
        subscriptions: process.subscriptions.clone(),
        networking: process.networking.as_ref().map(map_networking),
        resource_limits: process.resource_limits.as_ref().map(map_resource_limits),
        status: ProcessStatus::Stopped,
    }
}

fn map_process_type(process_type: kiln_krt::ProcessType) -> ProcessType {
    match process_type {
        kiln_krt::ProcessType::Trigger => ProcessType::Trigger,
        kiln_krt::ProcessType::Task => ProcessType::Task,
        kiln_krt::ProcessType::Exit => ProcessType::Exit,
    }
}

fn map_object_store(store: &kiln_krt::ObjectStore) -> ProcessObjectStore {
    ProcessObjectStore {
        name: store.name.clone(),
        scope: match store.scope {
            kiln_krt::ObjectStoreScope::Product => ObjectStoreScope::Product,
            kiln_krt::ObjectStoreScope::Workflow => ObjectStoreScope::Workflow,
        },
    }
}

fn map_networking(networking: &kiln_krt::Networking) -> ProcessNetworking {
    ProcessNetworking {
        target_port: networking.target_port,
        destination_port: networking.destination_port,
        protocol: match networking.protocol {
            kiln_krt::NetworkingProtocol::Http => NetworkingProtocol::Http,
            kiln_krt::NetworkingProtocol::Grpc => NetworkingProtocol::Grpc,
        },
    }
}

fn map_resource_limits(limits: &kiln_krt::ResourceLimits) -> ProcessResourceLimits {
    ProcessResourceLimits {
        cpu: limits.cpu.as_ref().map(map_resource_limit),
        memory: limits.memory.as_ref().map(map_resource_limit),
    }
}

fn map_resource_limit(limit: &kiln_krt::ResourceLimit) -> ResourceLimit {
    ResourceLimit {
        request: limit.request.clone(),
        limit: limit.limit.clone(),
    }
}
