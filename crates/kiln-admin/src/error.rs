// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for the control-plane core.
//!
//! Callers branch on variants: validation and not-found failures are
//! distinct, sentinel-like variants; remote-call failures carry their opaque
//! cause and the version tag they concern.

use crate::auth::AuthError;
use crate::entity::ResourceConfigError;

/// Failure of a repository operation.
///
/// `NotFound` is the sentinel the handlers compare against; everything else
/// is an opaque storage failure.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The requested record does not exist.
    #[error("record not found")]
    NotFound,

    /// The underlying store failed.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Failure of a version lifecycle operation.
#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    /// The user is not allowed to perform the operation.
    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    /// No version with the requested tag exists in the product.
    #[error("version not found")]
    NotFound,

    /// The target product does not exist.
    #[error("product not found")]
    ProductNotFound,

    /// A version with the same tag already exists in the product.
    #[error("version duplicated")]
    Duplicated,

    /// The uploaded manifest stream could not be buffered to disk.
    #[error("buffering KRT manifest: {0}")]
    BufferingManifest(std::io::Error),

    /// The manifest is not well-formed.
    #[error("parsing KRT manifest: {0}")]
    ManifestParsing(#[from] kiln_krt::ParseError),

    /// The manifest is well-formed but invalid; carries every violation.
    #[error("invalid KRT manifest:\n{0}")]
    ManifestValidation(#[from] kiln_krt::ValidationErrors),

    /// Start requested from a status that holds a running workload.
    #[error("version cannot be started, status must be 'created', 'stopped' or 'error'")]
    CannotBeStarted,

    /// Stop requested while the workload is not running unpublished.
    #[error("version cannot be stopped, status must be 'started'")]
    CannotBeStopped,

    /// Publish requested while the version is not started.
    #[error("version cannot be published, status must be 'started'")]
    CannotBePublished,

    /// Unpublish requested while the version is not published.
    #[error("version cannot be unpublished, status must be 'published'")]
    CannotBeUnpublished,

    /// The streaming-resource provisioner failed to create streams.
    #[error("creating streams for version {tag:?}: {cause}")]
    CreatingStreams {
        /// Version tag being started.
        tag: String,
        /// Provisioner failure.
        cause: anyhow::Error,
    },

    /// The streaming-resource provisioner failed to create object stores.
    #[error("creating object stores for version {tag:?}: {cause}")]
    CreatingObjectStores {
        /// Version tag being started.
        tag: String,
        /// Provisioner failure.
        cause: anyhow::Error,
    },

    /// The streaming-resource provisioner failed to create key-value stores.
    #[error("creating key-value stores for version {tag:?}: {cause}")]
    CreatingKeyValueStores {
        /// Version tag being started.
        tag: String,
        /// Provisioner failure.
        cause: anyhow::Error,
    },

    /// Provisioning returned maps missing a workflow or process entry.
    #[error("provisioned streaming resources are incomplete: {0}")]
    IncompleteStreamingResources(#[from] ResourceConfigError),

    /// The streaming-resource provisioner failed to delete resources.
    #[error("deleting streaming resources for version {tag:?}: {cause}")]
    DeletingStreamingResources {
        /// Version tag being stopped.
        tag: String,
        /// Provisioner failure.
        cause: anyhow::Error,
    },

    /// The workload scheduler rejected the publish call.
    #[error("publishing version {tag:?}: {cause}")]
    Publishing {
        /// Version tag being published.
        tag: String,
        /// Scheduler failure.
        cause: anyhow::Error,
    },

    /// The workload scheduler rejected the unpublish call.
    #[error("unpublishing version {tag:?}: {cause}")]
    Unpublishing {
        /// Version tag being unpublished.
        tag: String,
        /// Scheduler failure.
        cause: anyhow::Error,
    },

    /// The workload scheduler could not open a process status watch.
    #[error("watching process status for version {tag:?}: {cause}")]
    WatchingProcessStatus {
        /// Version tag being watched.
        tag: String,
        /// Scheduler failure.
        cause: anyhow::Error,
    },

    /// The audit recorder failed on a synchronous, mandatory record.
    #[error("recording user activity: {0}")]
    RecordingActivity(anyhow::Error),

    /// The version repository failed.
    #[error(transparent)]
    Repository(RepositoryError),
}

impl VersionError {
    /// Map a repository failure, turning the not-found sentinel into the
    /// domain-level [`VersionError::NotFound`].
    pub(crate) fn from_version_repo(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            other => Self::Repository(other),
        }
    }

    /// Map a product repository failure to the domain-level variant.
    pub(crate) fn from_product_repo(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::ProductNotFound,
            other => Self::Repository(other),
        }
    }
}

/// Failure of a process registry operation.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The user is not allowed to perform the operation.
    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    /// A non-public registration needs an owning product.
    #[error("missing product in params")]
    MissingProduct,

    /// A registration cannot be public and product-owned at the same time.
    #[error("a process cannot be public and come from a product at the same time")]
    PublicAndProduct,

    /// The process version label is empty.
    #[error("missing version in params")]
    MissingVersion,

    /// The process name is empty.
    #[error("missing process in params")]
    MissingProcess,

    /// No registered process with the requested ID exists in the scope.
    #[error("registered process not found")]
    NotFound,

    /// A non-overwritable record with the same ID already exists.
    #[error("process already registered")]
    AlreadyRegistered,

    /// The container registry failed to delete the image.
    #[error("deleting process image {image:?}: {cause}")]
    DeletingImage {
        /// Image name being deleted.
        image: String,
        /// Registry failure.
        cause: anyhow::Error,
    },

    /// The process repository failed.
    #[error(transparent)]
    Repository(RepositoryError),
}

impl RegistryError {
    /// Map a repository failure, turning the not-found sentinel into the
    /// domain-level [`RegistryError::NotFound`].
    pub(crate) fn from_process_repo(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            other => Self::Repository(other),
        }
    }
}
