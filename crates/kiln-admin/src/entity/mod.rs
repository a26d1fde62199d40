// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Domain entities for the control plane.

/// Product records and their published-version pointer.
pub mod product;

/// Processes within a workflow: typing, wiring, and runtime status.
pub mod process;

/// Independently versioned, buildable process records.
pub mod registered_process;

/// Per-version streaming resources and their lookup accessors.
pub mod streaming_resources;

/// Authenticated platform users.
pub mod user;

/// Versions, workflows, and the lifecycle state machine.
pub mod version;

pub use product::Product;
pub use process::{
    NetworkingProtocol, ObjectStoreScope, Process, ProcessNetworking, ProcessObjectStore,
    ProcessResourceLimits, ProcessStatus, ProcessType, ResourceLimit,
};
pub use registered_process::{RegisteredProcess, RegisteredProcessStatus};
pub use streaming_resources::{
    KeyValueStores, ProcessStreamConfig, ResourceConfigError, VersionObjectStores, VersionStreams,
    VersionStreamingResources, WorkflowKeyValueStores, WorkflowObjectStores, WorkflowStreamConfig,
};
pub use user::User;
pub use version::{ConfigurationVariable, Version, VersionStatus, Workflow, WorkflowType};
