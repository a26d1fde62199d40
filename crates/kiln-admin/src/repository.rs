// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Repository contracts for durable storage.
//!
//! The core consumes these as `Arc<dyn Trait>`; adapters (document database,
//! object storage) implement them out of tree. `RepositoryError::NotFound` is
//! the sentinel for absent records.

use async_trait::async_trait;

use crate::entity::{Product, RegisteredProcess, Version, VersionStatus};
use crate::entity::ProcessType;
use crate::error::RepositoryError;

/// Filter for version listings.
#[derive(Debug, Clone, Default)]
pub struct ListVersionsFilter {
    /// Only return versions in this status.
    pub status: Option<VersionStatus>,
}

/// Filter for registered-process searches.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Only return processes of this type.
    pub process_type: Option<ProcessType>,
    /// Only return processes with this exact name.
    pub process_name: Option<String>,
}

/// Durable storage of version records, keyed by product and tag.
#[async_trait]
pub trait VersionRepository: Send + Sync {
    /// Persist a new version for the product, authored by the user.
    async fn create(
        &self,
        user_id: &str,
        product_id: &str,
        version: &Version,
    ) -> Result<Version, RepositoryError>;

    /// Look up a version by tag. `NotFound` when absent.
    async fn get_by_tag(&self, product_id: &str, tag: &str) -> Result<Version, RepositoryError>;

    /// List the product's versions matching the filter.
    async fn list_by_product(
        &self,
        product_id: &str,
        filter: &ListVersionsFilter,
    ) -> Result<Vec<Version>, RepositoryError>;

    /// Replace the stored version record.
    async fn update(&self, product_id: &str, version: &Version) -> Result<(), RepositoryError>;

    /// Update the status of a version and clear its error message.
    async fn set_status(
        &self,
        product_id: &str,
        tag: &str,
        status: VersionStatus,
    ) -> Result<(), RepositoryError>;

    /// Set the version's error message and move it to the error status.
    /// Returns the updated record.
    async fn set_error(
        &self,
        product_id: &str,
        version: &Version,
        error_message: &str,
    ) -> Result<Version, RepositoryError>;
}

/// Durable storage of product records.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Look up a product by ID. `NotFound` when absent.
    async fn get_by_id(&self, product_id: &str) -> Result<Product, RepositoryError>;

    /// Replace the stored product record.
    async fn update(&self, product: &Product) -> Result<(), RepositoryError>;
}

/// Durable storage of registered-process records, keyed by scope and ID.
///
/// The scope is the owning product ID, or the global registry name for
/// public processes.
#[async_trait]
pub trait ProcessRepository: Send + Sync {
    /// Look up a registered process by ID. `NotFound` when absent.
    async fn get_by_id(
        &self,
        scope: &str,
        process_id: &str,
    ) -> Result<RegisteredProcess, RepositoryError>;

    /// Persist a new registered process.
    async fn create(
        &self,
        scope: &str,
        process: &RegisteredProcess,
    ) -> Result<(), RepositoryError>;

    /// Replace the stored registered-process record.
    async fn update(
        &self,
        scope: &str,
        process: &RegisteredProcess,
    ) -> Result<(), RepositoryError>;

    /// Delete a registered process by ID.
    async fn delete(&self, scope: &str, process_id: &str) -> Result<(), RepositoryError>;

    /// Search one product's registered processes.
    async fn search_by_product(
        &self,
        product_id: &str,
        filter: &SearchFilter,
    ) -> Result<Vec<RegisteredProcess>, RepositoryError>;

    /// Search public registered processes.
    async fn global_search(
        &self,
        filter: &SearchFilter,
    ) -> Result<Vec<RegisteredProcess>, RepositoryError>;
}

/// Object storage for uploaded process build contexts.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload a compressed build context under `(scope, image)`.
    async fn upload_image_sources(
        &self,
        scope: &str,
        image: &str,
        sources: &[u8],
    ) -> anyhow::Result<()>;

    /// Delete the build context stored under `(scope, image)`.
    async fn delete_image_sources(&self, scope: &str, image: &str) -> anyhow::Result<()>;
}
