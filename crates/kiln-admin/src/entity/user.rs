// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! User entity, as resolved by the delivery layer's authentication.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// An authenticated platform user.
///
/// Grants are carried on the user and evaluated by the access-control
/// implementation; the core only forwards them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable user identifier.
    pub id: String,
    /// User email, recorded as author/owner on created records.
    pub email: String,
    /// Platform-wide roles.
    pub roles: Vec<String>,
    /// Product-scoped grants: product ID to granted action names.
    pub product_grants: HashMap<String, Vec<String>>,
}
