// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! KRT manifest library for the kiln platform.
//!
//! A KRT file is the versioned deployment bundle descriptor: a YAML document
//! declaring a version tag, configuration, and the workflow/process graph to
//! deploy. This crate owns the wire format: parsing a reader or file into a
//! [`Manifest`] and validating it as a whole.
//!
//! Validation is aggregate: [`Manifest::validate`] walks the entire document
//! and returns every violation it finds in one [`ValidationErrors`] value,
//! so a user fixing a manifest sees the full list instead of one error per
//! upload attempt.
//!
//! ```
//! let manifest = kiln_krt::parse(
//!     br#"
//! version: v1.0.0
//! description: Demo bundle
//! workflows:
//!   - name: ingest
//!     type: data
//!     processes:
//!       - name: entrypoint
//!         type: trigger
//!         image: registry.local/entrypoint:v1
//!         subscriptions:
//!           - sink
//!       - name: sink
//!         type: exit
//!         image: registry.local/sink:v1
//!         subscriptions:
//!           - entrypoint
//! "#
//!     .as_slice(),
//! )
//! .unwrap();
//!
//! manifest.validate().unwrap();
//! assert_eq!(manifest.version, "v1.0.0");
//! ```

mod manifest;
mod validate;

pub use manifest::{
    Manifest, Networking, NetworkingProtocol, ObjectStore, ObjectStoreScope, ParseError, Process,
    ProcessType, ResourceLimit, ResourceLimits, Workflow, WorkflowType, parse, parse_file,
};
pub use validate::{ValidationError, ValidationErrors};
