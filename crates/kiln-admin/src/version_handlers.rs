// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Version lifecycle orchestration.
//!
//! Every public method follows the same shape: authorize, load, validate the
//! transition, mutate state, then either finish synchronously (create,
//! publish, unpublish) or hand the slow remote work to a detached background
//! task (start, stop) and return a capacity-1 notification channel that
//! receives the final version exactly once before closing.
//!
//! Background tasks own their lifetime: they run under the configured
//! scheduler timeout on a fresh task, so a caller dropping its future (or a
//! disconnected request) never cancels provisioning in flight.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};

use crate::auth::{AccessControl, Action};
use crate::config::Config;
use crate::entity::{Process, User, Version, VersionStatus, VersionStreamingResources};
use crate::error::{RepositoryError, VersionError};
use crate::krt_mapper::map_manifest_to_version;
use crate::repository::{ListVersionsFilter, ProductRepository, VersionRepository};
use crate::service::{NatsManager, UserActivityRecorder, VersionScheduler};

/// Audit comment recorded when an operation is denied by access control.
pub const COMMENT_USER_NOT_AUTHORIZED: &str = "user not authorized";
/// Audit comment recorded when the target version does not exist.
pub const COMMENT_VERSION_NOT_FOUND: &str = "version not found";
/// Audit comment recorded when the version status forbids the transition.
pub const COMMENT_INVALID_VERSION_STATUS: &str = "invalid version status";
/// Audit comment recorded when streaming-resource provisioning fails.
pub const COMMENT_ERROR_CREATING_STREAMING_RESOURCES: &str =
    "error creating streaming resources";
/// Audit comment recorded when streaming-resource deletion fails.
pub const COMMENT_ERROR_DELETING_STREAMING_RESOURCES: &str =
    "error deleting streaming resources";
/// Audit comment recorded when the scheduler fails to start the workload.
pub const COMMENT_ERROR_STARTING_VERSION: &str = "error starting version";
/// Audit comment recorded when the scheduler fails to stop the workload.
pub const COMMENT_ERROR_STOPPING_VERSION: &str = "error stopping version";

/// Which lifecycle action a failed-action audit entry belongs to.
#[derive(Debug, Clone, Copy)]
enum LifecycleAction {
    Start,
    Stop,
}

/// Collaborators for [`VersionHandler::new`].
pub struct VersionHandlerParams {
    /// Control-plane configuration.
    pub config: Config,
    /// Durable version storage.
    pub version_repo: Arc<dyn VersionRepository>,
    /// Durable product storage.
    pub product_repo: Arc<dyn ProductRepository>,
    /// Workload scheduler.
    pub scheduler: Arc<dyn VersionScheduler>,
    /// Streaming-resource provisioner.
    pub nats_manager: Arc<dyn NatsManager>,
    /// Best-effort audit recorder.
    pub user_activity: Arc<dyn UserActivityRecorder>,
    /// Policy check.
    pub access_control: Arc<dyn AccessControl>,
}

/// Orchestrates the version lifecycle against the external collaborators.
///
/// Stateless across calls: safe to share and to invoke concurrently for
/// different versions. Concurrent conflicting transitions on the *same*
/// version are not serialized here; the repository's status write is the only
/// consistency guard.
#[derive(Clone)]
pub struct VersionHandler {
    config: Config,
    version_repo: Arc<dyn VersionRepository>,
    product_repo: Arc<dyn ProductRepository>,
    scheduler: Arc<dyn VersionScheduler>,
    nats_manager: Arc<dyn NatsManager>,
    user_activity: Arc<dyn UserActivityRecorder>,
    access_control: Arc<dyn AccessControl>,
}

impl VersionHandler {
    /// Create a new handler over the given collaborators.
    pub fn new(params: VersionHandlerParams) -> Self {
        Self {
            config: params.config,
            version_repo: params.version_repo,
            product_repo: params.product_repo,
            scheduler: params.scheduler,
            nats_manager: params.nats_manager,
            user_activity: params.user_activity,
            access_control: params.access_control,
        }
    }

    // ========================================================================
    // Create
    // ========================================================================

    /// Create a version from an uploaded KRT manifest stream.
    ///
    /// The stream is buffered to a temp file, parsed and validated as a
    /// whole; a tag collision with an existing version of the product is a
    /// [`VersionError::Duplicated`]. The created version enters the
    /// lifecycle at `Created`.
    #[instrument(skip(self, user, manifest), fields(user_id = %user.id))]
    pub async fn create(
        &self,
        user: &User,
        product_id: &str,
        manifest: impl AsyncRead + Send + Unpin,
    ) -> Result<Version, VersionError> {
        self.access_control
            .check_product_grants(user, product_id, Action::CreateVersion)?;

        let product = self
            .product_repo
            .get_by_id(product_id)
            .await
            .map_err(VersionError::from_product_repo)?;

        let manifest_file = buffer_manifest(manifest).await?;
        let parsed = kiln_krt::parse_file(manifest_file.path())?;
        parsed.validate()?;

        match self.version_repo.get_by_tag(product_id, &parsed.version).await {
            Ok(_) => return Err(VersionError::Duplicated),
            Err(RepositoryError::NotFound) => {}
            Err(other) => return Err(VersionError::Repository(other)),
        }

        let version = map_manifest_to_version(&parsed, &user.id);
        let created = self
            .version_repo
            .create(&user.id, &product.id, &version)
            .await
            .map_err(VersionError::Repository)?;

        info!(version_tag = %created.tag, "Version created");

        if let Err(err) = self
            .user_activity
            .register_create_action(&user.id, &product.id, &created)
            .await
        {
            warn!(
                error = %err,
                product_id = %product.id,
                version_tag = %created.tag,
                "Failed to record create action"
            );
        }

        Ok(created)
    }

    // ========================================================================
    // Start
    // ========================================================================

    /// Start a previously created version.
    ///
    /// Streaming resources are provisioned synchronously; the workload
    /// scheduler call runs in a detached background task. Returns the version
    /// snapshot at `Starting` and a channel that receives the final version
    /// (`Started` or `Error`) exactly once before closing.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn start(
        &self,
        user: &User,
        product_id: &str,
        version_tag: &str,
        comment: &str,
    ) -> Result<(Version, mpsc::Receiver<Version>), VersionError> {
        info!("Starting version");

        if let Err(denied) =
            self.access_control
                .check_product_grants(user, product_id, Action::StartVersion)
        {
            let stub = version_stub(version_tag);
            self.register_action_failed(
                &user.id,
                product_id,
                &stub,
                COMMENT_USER_NOT_AUTHORIZED,
                LifecycleAction::Start,
            )
            .await;
            return Err(denied.into());
        }

        let mut version = match self.version_repo.get_by_tag(product_id, version_tag).await {
            Ok(version) => version,
            Err(err) => {
                let stub = version_stub(version_tag);
                self.register_action_failed(
                    &user.id,
                    product_id,
                    &stub,
                    COMMENT_VERSION_NOT_FOUND,
                    LifecycleAction::Start,
                )
                .await;
                return Err(VersionError::from_version_repo(err));
            }
        };

        if !version.can_be_started() {
            self.register_action_failed(
                &user.id,
                product_id,
                &version,
                COMMENT_INVALID_VERSION_STATUS,
                LifecycleAction::Start,
            )
            .await;
            return Err(VersionError::CannotBeStarted);
        }

        self.user_activity
            .register_start_action(&user.id, product_id, &version, comment)
            .await
            .map_err(VersionError::RecordingActivity)?;

        let resources = match self.provision_streaming_resources(product_id, &version).await {
            Ok(resources) => resources,
            Err(err) => {
                self.register_action_failed(
                    &user.id,
                    product_id,
                    &version,
                    COMMENT_ERROR_CREATING_STREAMING_RESOURCES,
                    LifecycleAction::Start,
                )
                .await;
                return Err(err);
            }
        };

        let previous_status = version.status;
        version.status = VersionStatus::Starting;

        if let Err(err) = self
            .version_repo
            .set_status(product_id, &version.tag, VersionStatus::Starting)
            .await
        {
            error!(
                error = %err,
                version_tag = %version.tag,
                previous_status = %previous_status,
                new_status = %VersionStatus::Starting,
                "CRITICAL: failed to persist version status"
            );
        }

        let (tx, rx) = mpsc::channel(1);
        let handler = self.clone();
        let task_user = user.id.clone();
        let task_product = product_id.to_string();
        let task_version = version.clone();
        tokio::spawn(async move {
            handler
                .start_and_notify(task_user, task_product, task_version, resources, tx)
                .await;
        });

        Ok((version, rx))
    }

    /// Provision streams, object stores and key-value stores for a start,
    /// then check the result covers the whole version graph.
    async fn provision_streaming_resources(
        &self,
        product_id: &str,
        version: &Version,
    ) -> Result<VersionStreamingResources, VersionError> {
        let streams = self
            .nats_manager
            .create_streams(product_id, version)
            .await
            .map_err(|cause| VersionError::CreatingStreams {
                tag: version.tag.clone(),
                cause,
            })?;

        let object_stores = self
            .nats_manager
            .create_object_stores(product_id, version)
            .await
            .map_err(|cause| VersionError::CreatingObjectStores {
                tag: version.tag.clone(),
                cause,
            })?;

        let key_value_stores = self
            .nats_manager
            .create_key_value_stores(product_id, version)
            .await
            .map_err(|cause| VersionError::CreatingKeyValueStores {
                tag: version.tag.clone(),
                cause,
            })?;

        let resources =
            VersionStreamingResources::new(streams, object_stores, key_value_stores);
        resources.ensure_covers(version)?;

        Ok(resources)
    }

    /// Background half of [`VersionHandler::start`].
    async fn start_and_notify(
        &self,
        user_id: String,
        product_id: String,
        mut version: Version,
        resources: VersionStreamingResources,
        tx: mpsc::Sender<Version>,
    ) {
        let result = match tokio::time::timeout(
            self.config.version_status_timeout,
            self.scheduler.start(&product_id, &version, &resources),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!(
                "workload scheduler start timed out after {:?}",
                self.config.version_status_timeout
            )),
        };

        if let Err(cause) = result {
            self.register_action_failed(
                &user_id,
                &product_id,
                &version,
                COMMENT_ERROR_STARTING_VERSION,
                LifecycleAction::Start,
            )
            .await;
            self.notify_scheduler_action_error(&product_id, version, cause, &tx)
                .await;
            return;
        }

        if let Err(err) = self
            .version_repo
            .set_status(&product_id, &version.tag, VersionStatus::Started)
            .await
        {
            error!(
                error = %err,
                product_id = %product_id,
                version_tag = %version.tag,
                new_status = %VersionStatus::Started,
                "CRITICAL: failed to persist version status"
            );
        }

        info!(product_id = %product_id, version_tag = %version.tag, "Version started");

        version.set_started_status();
        let _ = tx.send(version).await;
    }

    // ========================================================================
    // Stop
    // ========================================================================

    /// Stop a started version, releasing its streaming resources.
    ///
    /// Streams and object stores are deleted synchronously; the workload
    /// scheduler call runs in a detached background task. Returns the version
    /// snapshot at `Stopping` and a channel that receives the final version
    /// (`Stopped` or `Error`) exactly once before closing.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn stop(
        &self,
        user: &User,
        product_id: &str,
        version_tag: &str,
        comment: &str,
    ) -> Result<(Version, mpsc::Receiver<Version>), VersionError> {
        info!("Stopping version");

        if let Err(denied) =
            self.access_control
                .check_product_grants(user, product_id, Action::StopVersion)
        {
            let stub = version_stub(version_tag);
            self.register_action_failed(
                &user.id,
                product_id,
                &stub,
                COMMENT_USER_NOT_AUTHORIZED,
                LifecycleAction::Stop,
            )
            .await;
            return Err(denied.into());
        }

        let mut version = match self.version_repo.get_by_tag(product_id, version_tag).await {
            Ok(version) => version,
            Err(err) => {
                let stub = version_stub(version_tag);
                self.register_action_failed(
                    &user.id,
                    product_id,
                    &stub,
                    COMMENT_VERSION_NOT_FOUND,
                    LifecycleAction::Stop,
                )
                .await;
                return Err(VersionError::from_version_repo(err));
            }
        };

        if !version.can_be_stopped() {
            self.register_action_failed(
                &user.id,
                product_id,
                &version,
                COMMENT_INVALID_VERSION_STATUS,
                LifecycleAction::Stop,
            )
            .await;
            return Err(VersionError::CannotBeStopped);
        }

        if let Err(err) = self.delete_streaming_resources(product_id, &version).await {
            self.register_action_failed(
                &user.id,
                product_id,
                &version,
                COMMENT_ERROR_DELETING_STREAMING_RESOURCES,
                LifecycleAction::Stop,
            )
            .await;
            return Err(err);
        }

        let previous_status = version.status;
        version.status = VersionStatus::Stopping;

        if let Err(err) = self
            .version_repo
            .set_status(product_id, &version.tag, VersionStatus::Stopping)
            .await
        {
            error!(
                error = %err,
                version_tag = %version.tag,
                previous_status = %previous_status,
                new_status = %VersionStatus::Stopping,
                "CRITICAL: failed to persist version status"
            );
        }

        let (tx, rx) = mpsc::channel(1);
        let handler = self.clone();
        let task_user = user.id.clone();
        let task_product = product_id.to_string();
        let task_comment = comment.to_string();
        let task_version = version.clone();
        tokio::spawn(async move {
            handler
                .stop_and_notify(task_user, task_product, task_comment, task_version, tx)
                .await;
        });

        Ok((version, rx))
    }

    async fn delete_streaming_resources(
        &self,
        product_id: &str,
        version: &Version,
    ) -> Result<(), VersionError> {
        self.nats_manager
            .delete_streams(product_id, &version.tag)
            .await
            .map_err(|cause| VersionError::DeletingStreamingResources {
                tag: version.tag.clone(),
                cause,
            })?;

        self.nats_manager
            .delete_object_stores(product_id, &version.tag)
            .await
            .map_err(|cause| VersionError::DeletingStreamingResources {
                tag: version.tag.clone(),
                cause,
            })?;

        Ok(())
    }

    /// Background half of [`VersionHandler::stop`].
    async fn stop_and_notify(
        &self,
        user_id: String,
        product_id: String,
        comment: String,
        mut version: Version,
        tx: mpsc::Sender<Version>,
    ) {
        let result = match tokio::time::timeout(
            self.config.version_status_timeout,
            self.scheduler.stop(&product_id, &version),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!(
                "workload scheduler stop timed out after {:?}",
                self.config.version_status_timeout
            )),
        };

        if let Err(cause) = result {
            self.register_action_failed(
                &user_id,
                &product_id,
                &version,
                COMMENT_ERROR_STOPPING_VERSION,
                LifecycleAction::Stop,
            )
            .await;
            self.notify_scheduler_action_error(&product_id, version, cause, &tx)
                .await;
            return;
        }

        if let Err(err) = self
            .version_repo
            .set_status(&product_id, &version.tag, VersionStatus::Stopped)
            .await
        {
            error!(
                error = %err,
                product_id = %product_id,
                version_tag = %version.tag,
                new_status = %VersionStatus::Stopped,
                "CRITICAL: failed to persist version status"
            );
        }

        if let Err(err) = self
            .user_activity
            .register_stop_action(&user_id, &product_id, &version, &comment)
            .await
        {
            warn!(
                error = %err,
                product_id = %product_id,
                version_tag = %version.tag,
                comment = %comment,
                "Failed to record stop action"
            );
        }

        info!(product_id = %product_id, version_tag = %version.tag, "Version stopped");

        version.status = VersionStatus::Stopped;
        let _ = tx.send(version).await;
    }

    // ========================================================================
    // Publish / Unpublish
    // ========================================================================

    /// Publish a started version, exposing its triggers publicly.
    ///
    /// Synchronous: the scheduler publish is a fast control-plane call.
    /// Returns the published version and the trigger name to URL map.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn publish(
        &self,
        user: &User,
        product_id: &str,
        version_tag: &str,
        comment: &str,
    ) -> Result<(Version, HashMap<String, String>), VersionError> {
        self.access_control
            .check_product_grants(user, product_id, Action::PublishVersion)?;

        info!("Publishing version");

        let mut version = self
            .version_repo
            .get_by_tag(product_id, version_tag)
            .await
            .map_err(VersionError::from_version_repo)?;

        if version.status != VersionStatus::Started {
            return Err(VersionError::CannotBePublished);
        }

        let triggers = self
            .scheduler
            .publish(product_id, version_tag)
            .await
            .map_err(|cause| VersionError::Publishing {
                tag: version.tag.clone(),
                cause,
            })?;

        version.set_publish_status(&user.id);

        if let Err(err) = self.version_repo.update(product_id, &version).await {
            warn!(
                error = %err,
                version_tag = %version.tag,
                "Failed to persist published version"
            );
        }

        match self.product_repo.get_by_id(product_id).await {
            Ok(mut product) => {
                product.update_published_version(&version.tag);
                if let Err(err) = self.product_repo.update(&product).await {
                    warn!(
                        error = %err,
                        version_tag = %version.tag,
                        "Failed to persist product published version"
                    );
                }
            }
            Err(err) => {
                warn!(error = %err, "Failed to load product for published version update");
            }
        }

        if let Err(err) = self
            .user_activity
            .register_publish_action(&user.id, product_id, &version, comment)
            .await
        {
            warn!(
                error = %err,
                version_tag = %version.tag,
                "Failed to record publish action"
            );
        }

        Ok((version, triggers))
    }

    /// Unpublish a published version, returning it to started.
    ///
    /// The scheduler unpublish is fatal on failure; every later persistence
    /// step is best-effort and logs its own error independently.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn unpublish(
        &self,
        user: &User,
        product_id: &str,
        version_tag: &str,
        comment: &str,
    ) -> Result<Version, VersionError> {
        self.access_control
            .check_product_grants(user, product_id, Action::UnpublishVersion)?;

        info!("Unpublishing version");

        let mut version = self
            .version_repo
            .get_by_tag(product_id, version_tag)
            .await
            .map_err(VersionError::from_version_repo)?;

        if version.status != VersionStatus::Published {
            return Err(VersionError::CannotBeUnpublished);
        }

        self.scheduler
            .unpublish(product_id, &version)
            .await
            .map_err(|cause| VersionError::Unpublishing {
                tag: version.tag.clone(),
                cause,
            })?;

        version.unset_publish_status();

        if let Err(err) = self.version_repo.update(product_id, &version).await {
            warn!(
                error = %err,
                version_tag = %version.tag,
                "Failed to persist unpublished version"
            );
        }

        match self.product_repo.get_by_id(product_id).await {
            Ok(mut product) => {
                product.remove_published_version();
                if let Err(err) = self.product_repo.update(&product).await {
                    warn!(
                        error = %err,
                        version_tag = %version.tag,
                        "Failed to clear product published version"
                    );
                }
            }
            Err(err) => {
                warn!(error = %err, "Failed to load product for published version clear");
            }
        }

        if let Err(err) = self
            .user_activity
            .register_unpublish_action(&user.id, product_id, &version, comment)
            .await
        {
            warn!(
                error = %err,
                version_tag = %version.tag,
                "Failed to record unpublish action"
            );
        }

        Ok(version)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Look up one version by tag.
    pub async fn get_by_tag(
        &self,
        user: &User,
        product_id: &str,
        version_tag: &str,
    ) -> Result<Version, VersionError> {
        self.access_control
            .check_product_grants(user, product_id, Action::ViewProduct)?;

        self.version_repo
            .get_by_tag(product_id, version_tag)
            .await
            .map_err(VersionError::from_version_repo)
    }

    /// List a product's versions, optionally filtered by status.
    pub async fn list_by_product(
        &self,
        user: &User,
        product_id: &str,
        filter: &ListVersionsFilter,
    ) -> Result<Vec<Version>, VersionError> {
        self.access_control
            .check_product_grants(user, product_id, Action::ViewProduct)?;

        self.version_repo
            .list_by_product(product_id, filter)
            .await
            .map_err(VersionError::Repository)
    }

    /// Stream per-process status events for a version.
    pub async fn watch_process_status(
        &self,
        user: &User,
        product_id: &str,
        version_tag: &str,
    ) -> Result<mpsc::Receiver<Process>, VersionError> {
        self.access_control
            .check_product_grants(user, product_id, Action::ViewProduct)?;

        let version = self
            .version_repo
            .get_by_tag(product_id, version_tag)
            .await
            .map_err(VersionError::from_version_repo)?;

        self.scheduler
            .watch_process_status(product_id, &version.tag)
            .await
            .map_err(|cause| VersionError::WatchingProcessStatus {
                tag: version.tag,
                cause,
            })
    }

    // ========================================================================
    // Shared failure paths
    // ========================================================================

    /// Record a failed lifecycle action, tagged with the failure comment.
    /// Recording itself is best-effort.
    async fn register_action_failed(
        &self,
        user_id: &str,
        product_id: &str,
        version: &Version,
        comment: &str,
        action: LifecycleAction,
    ) {
        let result = match action {
            LifecycleAction::Start => {
                self.user_activity
                    .register_start_action(user_id, product_id, version, comment)
                    .await
            }
            LifecycleAction::Stop => {
                self.user_activity
                    .register_stop_action(user_id, product_id, version, comment)
                    .await
            }
        };

        if let Err(err) = result {
            warn!(
                error = %err,
                product_id = %product_id,
                version_tag = %version.tag,
                comment = %comment,
                "Failed to record failed action"
            );
        }
    }

    /// Convert a failed scheduler call into the error status, persist it
    /// best-effort, and deliver the errored version on the channel.
    async fn notify_scheduler_action_error(
        &self,
        product_id: &str,
        mut version: Version,
        cause: anyhow::Error,
        tx: &mpsc::Sender<Version>,
    ) {
        error!(
            error = %cause,
            product_id = %product_id,
            version_tag = %version.tag,
            "Workload scheduler action failed"
        );

        if let Err(err) = self
            .version_repo
            .set_error(product_id, &version, &cause.to_string())
            .await
        {
            error!(
                error = %err,
                product_id = %product_id,
                version_tag = %version.tag,
                "Failed to persist version error"
            );
        }

        version.set_error_status(cause.to_string());
        let _ = tx.send(version).await;
    }
}

/// Placeholder carrying only the tag, for audit entries on versions that
/// could not be loaded.
fn version_stub(tag: &str) -> Version {
    Version {
        tag: tag.to_string(),
        description: String::new(),
        config: vec![],
        workflows: vec![],
        creation_date: Utc::now(),
        creation_author: String::new(),
        publication_date: None,
        publication_author: None,
        status: VersionStatus::Created,
        error: None,
    }
}

/// Buffer an uploaded manifest stream to a temp file.
async fn buffer_manifest(
    mut manifest: impl AsyncRead + Send + Unpin,
) -> Result<tempfile::NamedTempFile, VersionError> {
    let tmp = tempfile::NamedTempFile::new().map_err(VersionError::BufferingManifest)?;

    let mut file = tokio::fs::File::create(tmp.path())
        .await
        .map_err(VersionError::BufferingManifest)?;
    tokio::io::copy(&mut manifest, &mut file)
        .await
        .map_err(VersionError::BufferingManifest)?;
    file.flush().await.map_err(VersionError::BufferingManifest)?;

    Ok(tmp)
}
