// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Kiln Admin - Control-Plane Core
//!
//! This crate is the control-plane core of the kiln platform: it accepts
//! versioned KRT deployment bundles, registers them as product Versions, and
//! orchestrates distributed resource provisioning across the backing
//! services while driving each Version through its lifecycle.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Delivery Layer                                  │
//! │                 (HTTP/GraphQL adapters, out of tree)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//!                                    │
//!                                    ▼
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        kiln-admin (this crate)                           │
//! │              VersionHandler          ProcessHandler                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//!        │                │                  │                  │
//!        ▼                ▼                  ▼                  ▼
//! ┌────────────┐  ┌──────────────┐  ┌───────────────┐  ┌───────────────────┐
//! │ Repositories│ │   Workload   │  │  Streaming-   │  │  Object Storage + │
//! │ (documents) │ │  Scheduler   │  │  Resource     │  │  Container        │
//! │             │ │              │  │  Provisioner  │  │  Registry         │
//! └────────────┘  └──────────────┘  └───────────────┘  └───────────────────┘
//! ```
//!
//! Every collaborator below the handlers is a trait contract
//! ([`repository`], [`service`], [`auth`]); adapters implement them out of
//! tree and the handlers consume them as `Arc<dyn Trait>`.
//!
//! # Operations
//!
//! | Operation | Mode | Outcome |
//! |-----------|------|---------|
//! | `create` | synchronous | Version persisted at `CREATED` |
//! | `start` | sync prefix + background task | channel delivers `STARTED` or `ERROR` |
//! | `stop` | sync prefix + background task | channel delivers `STOPPED` or `ERROR` |
//! | `publish` | synchronous | trigger URL map, Version `PUBLISHED` |
//! | `unpublish` | synchronous | Version back to `STARTED` |
//! | `register_process` | sync prefix + fire-and-forget task | record settles to `CREATED`/`FAILED` |
//! | `delete_process` | synchronous | record and image tag removed |
//!
//! # Concurrency model
//!
//! Start, stop and process registration spawn exactly one detached
//! `tokio::spawn` task after their synchronous prefix. The task bounds its
//! scheduler call with [`config::Config::version_status_timeout`] and is
//! never tied to the caller's future: a disconnected request does not cancel
//! provisioning in flight. Start/stop notification channels have capacity 1,
//! receive exactly one Version, and close.
//!
//! Remote calls are never retried here. A failure in the synchronous prefix
//! aborts the operation; a failure in a background task becomes a status
//! transition (`ERROR`/`FAILED`) plus a persisted message. Best-effort
//! bookkeeping (audit entries, status mirrors after the outcome is decided)
//! logs and continues: the returned/delivered state is authoritative for the
//! caller even if a mirror write failed.
//!
//! # Configuration
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `KILN_REGISTRY_HOST` | Yes | - | Container registry host |
//! | `KILN_GLOBAL_REGISTRY` | No | `kiln` | Public process registry scope |
//! | `KILN_VERSION_STATUS_TIMEOUT_SECS` | No | `180` | Scheduler call bound |
//!
//! # Modules
//!
//! - [`auth`]: access-control contract and actions
//! - [`config`]: configuration from environment variables
//! - [`entity`]: domain entities and the lifecycle state machine
//! - [`error`]: error taxonomy callers branch on
//! - [`krt_mapper`]: manifest to Version mapping
//! - [`process_handlers`]: process registration pipeline
//! - [`repository`]: durable storage contracts
//! - [`service`]: remote service contracts
//! - [`version_handlers`]: version lifecycle orchestration

#![deny(missing_docs)]

/// Access-control contract and the actions it gates.
pub mod auth;

/// Configuration loaded from environment variables.
pub mod config;

/// Domain entities: versions, workflows, processes, streaming resources.
pub mod entity;

/// Error types for lifecycle and registry operations.
pub mod error;

/// Pure mapping from a validated KRT manifest to the Version model.
pub mod krt_mapper;

/// Process registration, deletion and search.
pub mod process_handlers;

/// Repository contracts for durable storage.
pub mod repository;

/// Remote service contracts (scheduler, provisioner, registry, audit).
pub mod service;

/// Version lifecycle orchestration (create/start/stop/publish/unpublish).
pub mod version_handlers;

pub use config::Config;
pub use error::{RegistryError, RepositoryError, VersionError};
pub use process_handlers::{
    DeleteProcessOpts, ProcessHandler, ProcessHandlerParams, RegisterProcessOpts,
};
pub use version_handlers::{VersionHandler, VersionHandlerParams};
