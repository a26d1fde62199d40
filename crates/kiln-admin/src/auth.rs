// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Access-control contract consumed by the handlers.
//!
//! Policy evaluation lives behind [`AccessControl`]; the core only names the
//! action it is about to perform and fails closed on denial.

use crate::entity::User;

/// Actions gated by access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Read product data, versions and process status.
    ViewProduct,
    /// Upload a manifest and create a version.
    CreateVersion,
    /// Start a version's workload.
    StartVersion,
    /// Stop a version's workload.
    StopVersion,
    /// Publish a started version.
    PublishVersion,
    /// Unpublish a published version.
    UnpublishVersion,
    /// Register a product-scoped process.
    RegisterProcess,
    /// Register a public process, visible to every product.
    RegisterPublicProcess,
    /// Delete a product-scoped process.
    DeleteProcess,
    /// Delete a public process.
    DeletePublicProcess,
}

impl Action {
    /// Canonical snake_case name, as grants are stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewProduct => "view_product",
            Self::CreateVersion => "create_version",
            Self::StartVersion => "start_version",
            Self::StopVersion => "stop_version",
            Self::PublishVersion => "publish_version",
            Self::UnpublishVersion => "unpublish_version",
            Self::RegisterProcess => "register_process",
            Self::RegisterPublicProcess => "register_public_process",
            Self::DeleteProcess => "delete_process",
            Self::DeletePublicProcess => "delete_public_process",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access denial.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The user lacks the product-scoped grant for the action.
    #[error("user not authorized: missing grant {action} on product {product:?}")]
    MissingProductGrant {
        /// Product the action targeted.
        product: String,
        /// Action that was denied.
        action: Action,
    },

    /// The user lacks the platform-wide role grant for the action.
    #[error("user not authorized: missing role grant {action}")]
    MissingRoleGrant {
        /// Action that was denied.
        action: Action,
    },
}

/// Policy check consumed by every handler method.
///
/// Implementations fail closed: any uncertainty is a denial.
pub trait AccessControl: Send + Sync {
    /// Check a product-scoped grant.
    fn check_product_grants(
        &self,
        user: &User,
        product_id: &str,
        action: Action,
    ) -> Result<(), AuthError>;

    /// Check a platform-wide role grant.
    fn check_role_grants(&self, user: &User, action: Action) -> Result<(), AuthError>;
}
