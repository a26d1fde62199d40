// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Process registration pipeline.
//!
//! Registration accepts a compressed build context, persists a `Creating`
//! record, and returns immediately; a fire-and-forget background task
//! uploads the sources, triggers the image build, and settles the record to
//! `Created` or `Failed`. There is no notification channel: callers poll or
//! watch the record.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::{error, info, instrument, warn};

use crate::auth::{AccessControl, Action};
use crate::config::Config;
use crate::entity::{ProcessType, RegisteredProcess, RegisteredProcessStatus, User};
use crate::error::{RegistryError, RepositoryError};
use crate::repository::{ObjectStorage, ProcessRepository, SearchFilter};
use crate::service::{ProcessRegistry, VersionScheduler};

/// Parameters of a process registration.
pub struct RegisterProcessOpts {
    /// Owning product; must be absent for public registrations.
    pub product: Option<String>,
    /// Process version label; `latest` marks an overwritable floating tag.
    pub version: String,
    /// Process name.
    pub process: String,
    /// Role the process plays when wired into a workflow.
    pub process_type: ProcessType,
    /// Register into the global registry, visible to every product.
    pub is_public: bool,
    /// Compressed build context stream.
    pub sources: Box<dyn AsyncRead + Send + Unpin>,
}

impl RegisterProcessOpts {
    fn validate(&self) -> Result<(), RegistryError> {
        validate_scope_params(self.product.as_deref(), self.is_public)?;

        if self.version.is_empty() {
            return Err(RegistryError::MissingVersion);
        }

        if self.process.is_empty() {
            return Err(RegistryError::MissingProcess);
        }

        Ok(())
    }
}

/// Parameters of a process deletion.
#[derive(Debug, Clone)]
pub struct DeleteProcessOpts {
    /// Owning product; must be absent for public processes.
    pub product: Option<String>,
    /// Process version label.
    pub version: String,
    /// Process name.
    pub process: String,
    /// Whether the process lives in the global registry.
    pub is_public: bool,
}

impl DeleteProcessOpts {
    fn validate(&self) -> Result<(), RegistryError> {
        validate_scope_params(self.product.as_deref(), self.is_public)?;

        if self.version.is_empty() {
            return Err(RegistryError::MissingVersion);
        }

        if self.process.is_empty() {
            return Err(RegistryError::MissingProcess);
        }

        Ok(())
    }
}

fn validate_scope_params(product: Option<&str>, is_public: bool) -> Result<(), RegistryError> {
    match (product, is_public) {
        (None, false) => Err(RegistryError::MissingProduct),
        (Some(_), true) => Err(RegistryError::PublicAndProduct),
        _ => Ok(()),
    }
}

/// Collaborators for [`ProcessHandler::new`].
pub struct ProcessHandlerParams {
    /// Control-plane configuration.
    pub config: Config,
    /// Durable registered-process storage.
    pub process_repo: Arc<dyn ProcessRepository>,
    /// Workload scheduler, which also fronts the image build.
    pub scheduler: Arc<dyn VersionScheduler>,
    /// Object storage for uploaded build contexts.
    pub object_storage: Arc<dyn ObjectStorage>,
    /// Container registry.
    pub process_registry: Arc<dyn ProcessRegistry>,
    /// Policy check.
    pub access_control: Arc<dyn AccessControl>,
}

/// Registers, deletes and searches buildable process records.
#[derive(Clone)]
pub struct ProcessHandler {
    config: Config,
    process_repo: Arc<dyn ProcessRepository>,
    scheduler: Arc<dyn VersionScheduler>,
    object_storage: Arc<dyn ObjectStorage>,
    process_registry: Arc<dyn ProcessRegistry>,
    access_control: Arc<dyn AccessControl>,
}

impl ProcessHandler {
    /// Create a new handler over the given collaborators.
    pub fn new(params: ProcessHandlerParams) -> Self {
        Self {
            config: params.config,
            process_repo: params.process_repo,
            scheduler: params.scheduler,
            object_storage: params.object_storage,
            process_registry: params.process_registry,
            access_control: params.access_control,
        }
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a process from an uploaded build context.
    ///
    /// Returns the record at `Creating`; the build continues in a detached
    /// background task that settles the record to `Created` or `Failed`.
    /// An existing record with the same ID blocks re-registration unless its
    /// version is `latest` or its last build failed.
    #[instrument(skip(self, user, opts), fields(user_id = %user.id, process = %opts.process, version = %opts.version))]
    pub async fn register_process(
        &self,
        user: &User,
        opts: RegisterProcessOpts,
    ) -> Result<RegisteredProcess, RegistryError> {
        info!("Registering new process");

        opts.validate()?;
        self.check_register_grants(user, &opts)?;

        let scope = self.register_scope(opts.product.as_deref(), opts.is_public);
        let record = self.process_to_register(user, &opts, &scope);

        match self.process_repo.get_by_id(&scope, &record.id).await {
            Ok(existing) => {
                if !existing.can_be_overwritten() {
                    return Err(RegistryError::AlreadyRegistered);
                }
                self.process_repo
                    .update(&scope, &record)
                    .await
                    .map_err(RegistryError::Repository)?;
            }
            Err(RepositoryError::NotFound) => {
                self.process_repo
                    .create(&scope, &record)
                    .await
                    .map_err(RegistryError::Repository)?;
            }
            Err(other) => return Err(RegistryError::Repository(other)),
        }

        let handler = self.clone();
        let task_scope = scope.clone();
        let task_record = record.clone();
        let sources = opts.sources;
        tokio::spawn(async move {
            handler
                .upload_process_to_registry(task_scope, task_record, sources)
                .await;
        });

        Ok(record)
    }

    /// Background half of [`ProcessHandler::register_process`]: buffer the
    /// sources, upload them, trigger the build, clean up, settle the record.
    async fn upload_process_to_registry(
        &self,
        scope: String,
        mut record: RegisteredProcess,
        mut sources: Box<dyn AsyncRead + Send + Unpin>,
    ) {
        info!(process_id = %record.id, "Building process image");

        let tmp = match tempfile::NamedTempFile::new() {
            Ok(tmp) => tmp,
            Err(err) => {
                let cause =
                    anyhow::Error::new(err).context("creating temp file for process sources");
                self.register_failure(&scope, &mut record, cause).await;
                return;
            }
        };

        let buffered = async {
            let mut file = tokio::fs::File::create(tmp.path())
                .await
                .context("opening temp file for process sources")?;
            tokio::io::copy(&mut sources, &mut file)
                .await
                .context("copying process sources")?;
            file.flush().await.context("flushing process sources")?;
            tokio::fs::read(tmp.path())
                .await
                .context("reading buffered process sources")
        }
        .await;

        let compressed = match buffered {
            Ok(compressed) => compressed,
            Err(cause) => {
                self.register_failure(&scope, &mut record, cause).await;
                return;
            }
        };

        if let Err(cause) = self
            .object_storage
            .upload_image_sources(&scope, &record.image, &compressed)
            .await
        {
            self.register_failure(&scope, &mut record, cause.context("uploading sources"))
                .await;
            return;
        }

        let register_result = self
            .scheduler
            .register_process(&scope, &record.id, &record.image)
            .await;

        // The uploaded sources are transient build input: delete them
        // whether or not the build succeeded.
        if let Err(err) = self
            .object_storage
            .delete_image_sources(&scope, &record.image)
            .await
        {
            warn!(
                error = %err,
                scope = %scope,
                image = %record.image,
                "Failed to delete uploaded image sources"
            );
        }

        match register_result {
            Err(cause) => {
                self.register_failure(&scope, &mut record, cause.context("registering process"))
                    .await;
            }
            Ok(reference) => {
                record.status = RegisteredProcessStatus::Created;
                if let Err(err) = self.process_repo.update(&scope, &record).await {
                    error!(
                        error = %err,
                        process_id = %record.id,
                        "Failed to update registered process"
                    );
                    return;
                }
                info!(
                    process_id = %record.id,
                    reference = %reference,
                    "Process successfully registered"
                );
            }
        }
    }

    /// Shared failure funnel for the background build: log, mark the record
    /// `Failed` with the error text, persist best-effort.
    async fn register_failure(
        &self,
        scope: &str,
        record: &mut RegisteredProcess,
        cause: anyhow::Error,
    ) {
        error!(
            error = %cause,
            process_id = %record.id,
            "Error uploading process to registry"
        );

        record.status = RegisteredProcessStatus::Failed;
        record.logs = Some(format!("{cause:#}"));

        if let Err(err) = self.process_repo.update(scope, record).await {
            error!(
                error = %err,
                process_id = %record.id,
                "Failed to update registered process"
            );
        }
    }

    // ========================================================================
    // Deletion
    // ========================================================================

    /// Delete a registered process and its image tag.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn delete_process(
        &self,
        user: &User,
        opts: DeleteProcessOpts,
    ) -> Result<String, RegistryError> {
        info!("Deleting process");

        opts.validate()?;
        self.check_delete_grants(user, &opts)?;

        let scope = self.register_scope(opts.product.as_deref(), opts.is_public);
        let process_id = process_id(&scope, &opts.process, &opts.version);

        self.process_repo
            .get_by_id(&scope, &process_id)
            .await
            .map_err(RegistryError::from_process_repo)?;

        let image_name = image_name(&scope, &opts.process);
        self.process_registry
            .delete_process(&image_name, &opts.version)
            .await
            .map_err(|cause| RegistryError::DeletingImage {
                image: image_name.clone(),
                cause,
            })?;

        self.process_repo
            .delete(&scope, &process_id)
            .await
            .map_err(RegistryError::Repository)?;

        Ok(process_id)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Search the product's registered processes, merged with the public
    /// ones from the global registry.
    pub async fn search(
        &self,
        user: &User,
        product_id: &str,
        filter: &SearchFilter,
    ) -> Result<Vec<RegisteredProcess>, RegistryError> {
        self.access_control
            .check_product_grants(user, product_id, Action::ViewProduct)?;

        let mut processes = self
            .process_repo
            .search_by_product(product_id, filter)
            .await
            .map_err(RegistryError::Repository)?;

        let public = self
            .process_repo
            .global_search(filter)
            .await
            .map_err(RegistryError::Repository)?;

        processes.extend(public);
        Ok(processes)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn check_register_grants(
        &self,
        user: &User,
        opts: &RegisterProcessOpts,
    ) -> Result<(), RegistryError> {
        if opts.is_public {
            self.access_control
                .check_role_grants(user, Action::RegisterPublicProcess)?;
        } else if let Some(product) = opts.product.as_deref() {
            self.access_control
                .check_product_grants(user, product, Action::RegisterProcess)?;
        }
        Ok(())
    }

    fn check_delete_grants(
        &self,
        user: &User,
        opts: &DeleteProcessOpts,
    ) -> Result<(), RegistryError> {
        if opts.is_public {
            self.access_control
                .check_role_grants(user, Action::DeletePublicProcess)?;
        } else if let Some(product) = opts.product.as_deref() {
            self.access_control
                .check_product_grants(user, product, Action::DeleteProcess)?;
        }
        Ok(())
    }

    fn register_scope(&self, product: Option<&str>, is_public: bool) -> String {
        match product {
            Some(product) if !is_public => product.to_string(),
            _ => self.config.global_registry.clone(),
        }
    }

    fn process_to_register(
        &self,
        user: &User,
        opts: &RegisterProcessOpts,
        scope: &str,
    ) -> RegisteredProcess {
        let id = process_id(scope, &opts.process, &opts.version);
        let image = format!("{}/{}", self.config.registry_host, id);

        RegisteredProcess {
            id,
            name: opts.process.clone(),
            version: opts.version.clone(),
            process_type: opts.process_type,
            image,
            upload_date: Utc::now(),
            owner: user.email.clone(),
            status: RegisteredProcessStatus::Creating,
            logs: None,
            is_public: opts.is_public,
        }
    }
}

fn process_id(scope: &str, process: &str, version: &str) -> String {
    format!("{scope}_{process}:{version}")
}

fn image_name(scope: &str, process: &str) -> String {
    format!("{scope}_{process}")
}
