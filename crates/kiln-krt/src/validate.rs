// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Aggregate validation of a parsed KRT manifest.
//!
//! Everything wrong with a manifest is reported in one pass. The checks are
//! structural (resource naming, uniqueness, graph references); filesystem
//! content checks belong to the caller that unpacked the bundle.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::manifest::{Manifest, Process, ProcessType, Workflow};

// Resource names end up as stream/store/deployment names downstream, so they
// follow the DNS-label shape: name-valid123.
static RESOURCE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").unwrap());

// Config and secret keys are injected as environment variables: NAME_VALID123.
static ENV_VAR_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Z0-9]([_A-Z0-9]*[A-Z0-9])?$").unwrap());

/// A single violation found while validating a manifest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing version tag")]
    MissingVersionTag,

    #[error("invalid version tag {tag:?}, must match {pattern:?}", pattern = RESOURCE_NAME.as_str())]
    InvalidVersionTag { tag: String },

    #[error("missing description")]
    MissingDescription,

    #[error("manifest declares no workflows")]
    NoWorkflows,

    #[error("invalid workflow name {workflow:?}, must match {pattern:?}", pattern = RESOURCE_NAME.as_str())]
    InvalidWorkflowName { workflow: String },

    #[error("duplicated workflow {workflow:?}")]
    DuplicatedWorkflow { workflow: String },

    #[error("workflow {workflow:?} declares no processes")]
    NoProcesses { workflow: String },

    #[error("workflow {workflow:?} needs at least one trigger process")]
    NoTriggerProcess { workflow: String },

    #[error("workflow {workflow:?} needs at least one exit process")]
    NoExitProcess { workflow: String },

    #[error("invalid process name {process:?} in workflow {workflow:?}")]
    InvalidProcessName { workflow: String, process: String },

    #[error("duplicated process {process:?} in workflow {workflow:?}")]
    DuplicatedProcess { workflow: String, process: String },

    #[error("process {process:?} in workflow {workflow:?} has no image")]
    MissingImage { workflow: String, process: String },

    #[error("process {process:?} in workflow {workflow:?} cannot have zero replicas")]
    ZeroReplicas { workflow: String, process: String },

    #[error("invalid configuration key {key:?} in {scope}, must match {pattern:?}", pattern = ENV_VAR_NAME.as_str())]
    InvalidConfigKey { scope: String, key: String },

    #[error(
        "process {process:?} in workflow {workflow:?} subscribes to unknown process {subscription:?}"
    )]
    UnknownSubscription {
        workflow: String,
        process: String,
        subscription: String,
    },

    #[error("process {process:?} in workflow {workflow:?} subscribes to itself")]
    SelfSubscription { workflow: String, process: String },

    #[error("invalid object store name {name:?} for process {process:?} in workflow {workflow:?}")]
    InvalidObjectStoreName {
        workflow: String,
        process: String,
        name: String,
    },
}

/// Every violation found in a manifest, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    /// Number of violations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no violations were collected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the collected violations.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl Manifest {
    /// Validate the manifest as a whole, collecting every violation.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        if self.version.is_empty() {
            errors.push(ValidationError::MissingVersionTag);
        } else if !RESOURCE_NAME.is_match(&self.version.to_lowercase()) {
            // Tags like v1.0.0 are normalized downstream; only reject shapes
            // that cannot become a resource name at all.
            if !is_normalizable_tag(&self.version) {
                errors.push(ValidationError::InvalidVersionTag {
                    tag: self.version.clone(),
                });
            }
        }

        if self.description.trim().is_empty() {
            errors.push(ValidationError::MissingDescription);
        }

        validate_config_keys(&self.config, "version config", &mut errors);

        if self.workflows.is_empty() {
            errors.push(ValidationError::NoWorkflows);
        }

        let mut seen_workflows = HashSet::new();
        for workflow in &self.workflows {
            if !seen_workflows.insert(workflow.name.as_str()) {
                errors.push(ValidationError::DuplicatedWorkflow {
                    workflow: workflow.name.clone(),
                });
            }
            validate_workflow(workflow, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }
}

fn validate_workflow(workflow: &Workflow, errors: &mut Vec<ValidationError>) {
    if !RESOURCE_NAME.is_match(&workflow.name) {
        errors.push(ValidationError::InvalidWorkflowName {
            workflow: workflow.name.clone(),
        });
    }

    validate_config_keys(
        &workflow.config,
        &format!("workflow {:?} config", workflow.name),
        errors,
    );

    if workflow.processes.is_empty() {
        errors.push(ValidationError::NoProcesses {
            workflow: workflow.name.clone(),
        });
        return;
    }

    let has_trigger = workflow
        .processes
        .iter()
        .any(|p| p.process_type == ProcessType::Trigger);
    if !has_trigger {
        errors.push(ValidationError::NoTriggerProcess {
            workflow: workflow.name.clone(),
        });
    }

    let has_exit = workflow
        .processes
        .iter()
        .any(|p| p.process_type == ProcessType::Exit);
    if !has_exit {
        errors.push(ValidationError::NoExitProcess {
            workflow: workflow.name.clone(),
        });
    }

    let process_names: HashSet<&str> = workflow
        .processes
        .iter()
        .map(|p| p.name.as_str())
        .collect();

    let mut seen_processes = HashSet::new();
    for process in &workflow.processes {
        if !seen_processes.insert(process.name.as_str()) {
            errors.push(ValidationError::DuplicatedProcess {
                workflow: workflow.name.clone(),
                process: process.name.clone(),
            });
        }
        validate_process(workflow, process, &process_names, errors);
    }
}

fn validate_process(
    workflow: &Workflow,
    process: &Process,
    process_names: &HashSet<&str>,
    errors: &mut Vec<ValidationError>,
) {
    if !RESOURCE_NAME.is_match(&process.name) {
        errors.push(ValidationError::InvalidProcessName {
            workflow: workflow.name.clone(),
            process: process.name.clone(),
        });
    }

    if process.image.trim().is_empty() {
        errors.push(ValidationError::MissingImage {
            workflow: workflow.name.clone(),
            process: process.name.clone(),
        });
    }

    if process.replicas == Some(0) {
        errors.push(ValidationError::ZeroReplicas {
            workflow: workflow.name.clone(),
            process: process.name.clone(),
        });
    }

    validate_config_keys(
        &process.config,
        &format!(
            "process {:?} config in workflow {:?}",
            process.name, workflow.name
        ),
        errors,
    );
    validate_config_keys(
        &process.secrets,
        &format!(
            "process {:?} secrets in workflow {:?}",
            process.name, workflow.name
        ),
        errors,
    );

    for subscription in &process.subscriptions {
        if subscription == &process.name {
            errors.push(ValidationError::SelfSubscription {
                workflow: workflow.name.clone(),
                process: process.name.clone(),
            });
        } else if !process_names.contains(subscription.as_str()) {
            errors.push(ValidationError::UnknownSubscription {
                workflow: workflow.name.clone(),
                process: process.name.clone(),
                subscription: subscription.clone(),
            });
        }
    }

    if let Some(store) = &process.object_store {
        if !RESOURCE_NAME.is_match(&store.name) {
            errors.push(ValidationError::InvalidObjectStoreName {
                workflow: workflow.name.clone(),
                process: process.name.clone(),
                name: store.name.clone(),
            });
        }
    }
}

fn validate_config_keys(
    config: &std::collections::BTreeMap<String, String>,
    scope: &str,
    errors: &mut Vec<ValidationError>,
) {
    for key in config.keys() {
        if !ENV_VAR_NAME.is_match(key) {
            errors.push(ValidationError::InvalidConfigKey {
                scope: scope.to_string(),
                key: key.clone(),
            });
        }
    }
}

// Version tags commonly look like v1.0.0; dots are replaced with dashes when
// the tag is used as a resource name. Accept the tag when that normalized
// form is a valid resource name.
fn is_normalizable_tag(tag: &str) -> bool {
    RESOURCE_NAME.is_match(&tag.to_lowercase().replace('.', "-"))
}
