// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Product entity: the unit of ownership for versions and processes.

use serde::{Deserialize, Serialize};

/// A product groups versions, processes and grants under one identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Human description.
    pub description: String,
    /// Tag of the currently published version, if any.
    pub published_version: Option<String>,
}

impl Product {
    /// Whether the product currently exposes a published version.
    pub fn has_version_published(&self) -> bool {
        self.published_version.is_some()
    }

    /// Point the product at a newly published version tag.
    pub fn update_published_version(&mut self, tag: &str) {
        self.published_version = Some(tag.to_string());
    }

    /// Clear the published-version pointer.
    pub fn remove_published_version(&mut self) {
        self.published_version = None;
    }
}
