// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Remote service contracts the orchestrator coordinates.
//!
//! Each trait fronts an independent external service. Their failures are
//! opaque `anyhow::Error` causes; the handlers wrap them with version/process
//! context before surfacing them.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::entity::{
    KeyValueStores, Process, Version, VersionObjectStores, VersionStreamingResources,
    VersionStreams,
};

/// Workload scheduler: runs, exposes and tears down version workloads.
#[async_trait]
pub trait VersionScheduler: Send + Sync {
    /// Start the version's workload with the provisioned resources.
    async fn start(
        &self,
        product_id: &str,
        version: &Version,
        resources: &VersionStreamingResources,
    ) -> anyhow::Result<()>;

    /// Stop the version's workload.
    async fn stop(&self, product_id: &str, version: &Version) -> anyhow::Result<()>;

    /// Expose the version publicly. Returns trigger name to external URL.
    async fn publish(
        &self,
        product_id: &str,
        version_tag: &str,
    ) -> anyhow::Result<HashMap<String, String>>;

    /// Withdraw the version's public exposure.
    async fn unpublish(&self, product_id: &str, version: &Version) -> anyhow::Result<()>;

    /// Stream per-process status events for a running version.
    async fn watch_process_status(
        &self,
        product_id: &str,
        version_tag: &str,
    ) -> anyhow::Result<mpsc::Receiver<Process>>;

    /// Build and push a registered process image from uploaded sources.
    /// Returns the pushed image reference.
    async fn register_process(
        &self,
        product_id: &str,
        process_id: &str,
        process_image: &str,
    ) -> anyhow::Result<String>;
}

/// Streaming-resource provisioner: creates and deletes the message streams,
/// object stores and key-value stores backing a version.
#[async_trait]
pub trait NatsManager: Send + Sync {
    /// Create the version's streams. Returns per-workflow wiring.
    async fn create_streams(
        &self,
        product_id: &str,
        version: &Version,
    ) -> anyhow::Result<VersionStreams>;

    /// Create the version's object stores.
    async fn create_object_stores(
        &self,
        product_id: &str,
        version: &Version,
    ) -> anyhow::Result<VersionObjectStores>;

    /// Create the version's key-value stores.
    async fn create_key_value_stores(
        &self,
        product_id: &str,
        version: &Version,
    ) -> anyhow::Result<KeyValueStores>;

    /// Delete the version's streams.
    async fn delete_streams(&self, product_id: &str, version_tag: &str) -> anyhow::Result<()>;

    /// Delete the version's object stores.
    async fn delete_object_stores(
        &self,
        product_id: &str,
        version_tag: &str,
    ) -> anyhow::Result<()>;
}

/// Container registry operations outside the build pipeline.
#[async_trait]
pub trait ProcessRegistry: Send + Sync {
    /// Delete a published image tag from the registry.
    async fn delete_process(&self, image_name: &str, version: &str) -> anyhow::Result<()>;
}

/// Best-effort audit log of lifecycle actions.
///
/// Recording failures never roll back the action they describe; callers log
/// and continue, except where an operation explicitly requires the record.
#[async_trait]
pub trait UserActivityRecorder: Send + Sync {
    /// Record a version creation.
    async fn register_create_action(
        &self,
        user_id: &str,
        product_id: &str,
        version: &Version,
    ) -> anyhow::Result<()>;

    /// Record a version start, with an operator comment.
    async fn register_start_action(
        &self,
        user_id: &str,
        product_id: &str,
        version: &Version,
        comment: &str,
    ) -> anyhow::Result<()>;

    /// Record a version stop, with an operator comment.
    async fn register_stop_action(
        &self,
        user_id: &str,
        product_id: &str,
        version: &Version,
        comment: &str,
    ) -> anyhow::Result<()>;

    /// Record a version publish, with an operator comment.
    async fn register_publish_action(
        &self,
        user_id: &str,
        product_id: &str,
        version: &Version,
        comment: &str,
    ) -> anyhow::Result<()>;

    /// Record a version unpublish, with an operator comment.
    async fn register_unpublish_action(
        &self,
        user_id: &str,
        product_id: &str,
        version: &Version,
        comment: &str,
    ) -> anyhow::Result<()>;
}
