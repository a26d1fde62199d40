// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Common test infrastructure: in-memory fakes for every collaborator the
//! handlers consume, plus fixtures and a harness wiring them together.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use kiln_admin::auth::{AccessControl, Action, AuthError};
use kiln_admin::config::Config;
use kiln_admin::entity::{
    KeyValueStores, Process, ProcessStatus, ProcessStreamConfig, ProcessType, Product,
    RegisteredProcess, RegisteredProcessStatus, User, Version, VersionObjectStores, VersionStatus,
    VersionStreamingResources, VersionStreams, Workflow, WorkflowKeyValueStores,
    WorkflowObjectStores, WorkflowStreamConfig, WorkflowType,
};
use kiln_admin::repository::{
    ListVersionsFilter, ObjectStorage, ProcessRepository, ProductRepository, SearchFilter,
    VersionRepository,
};
use kiln_admin::service::{NatsManager, ProcessRegistry, UserActivityRecorder, VersionScheduler};
use kiln_admin::{
    ProcessHandler, ProcessHandlerParams, RepositoryError, VersionHandler, VersionHandlerParams,
};

// ============================================================================
// Fixtures
// ============================================================================

pub const PRODUCT_ID: &str = "demo";

pub fn test_user() -> User {
    User {
        id: "user-1".to_string(),
        email: "user-1@kiln.dev".to_string(),
        roles: vec![],
        product_grants: HashMap::new(),
    }
}

pub fn test_config() -> Config {
    Config {
        registry_host: "registry.test".to_string(),
        global_registry: "kiln".to_string(),
        version_status_timeout: Duration::from_secs(5),
    }
}

/// A version with a minimal trigger/exit workflow graph.
pub fn version_fixture(tag: &str, status: VersionStatus) -> Version {
    let process = |name: &str, process_type: ProcessType, subscriptions: Vec<&str>| Process {
        name: name.to_string(),
        process_type,
        image: format!("registry.test/{name}:v1"),
        replicas: 1,
        gpu: false,
        config: vec![],
        object_store: None,
        secrets: vec![],
        subscriptions: subscriptions.into_iter().map(str::to_string).collect(),
        networking: None,
        resource_limits: None,
        status: ProcessStatus::Stopped,
    };

    Version {
        tag: tag.to_string(),
        description: "fixture".to_string(),
        config: vec![],
        workflows: vec![Workflow {
            name: "ingest".to_string(),
            workflow_type: WorkflowType::Data,
            config: vec![],
            processes: vec![
                process("entrypoint", ProcessType::Trigger, vec!["sink"]),
                process("sink", ProcessType::Exit, vec!["entrypoint"]),
            ],
        }],
        creation_date: chrono::Utc::now(),
        creation_author: "user-1".to_string(),
        publication_date: None,
        publication_author: None,
        status,
        error: None,
    }
}

pub fn product_fixture() -> Product {
    Product {
        id: PRODUCT_ID.to_string(),
        name: "Demo".to_string(),
        description: "demo product".to_string(),
        published_version: None,
    }
}

pub const VALID_MANIFEST: &str = r#"
version: v1.0.0
description: Fixture bundle
workflows:
  - name: ingest
    type: data
    processes:
      - name: entrypoint
        type: trigger
        image: registry.test/entrypoint:v1
        subscriptions:
          - sink
      - name: sink
        type: exit
        image: registry.test/sink:v1
        subscriptions:
          - entrypoint
"#;

// ============================================================================
// Repositories
// ============================================================================

#[derive(Default)]
pub struct InMemoryVersionRepository {
    versions: Mutex<HashMap<String, Version>>,
    /// Every `set_status` call, in order.
    pub status_calls: Mutex<Vec<(String, VersionStatus)>>,
    /// Every `set_error` call, in order.
    pub error_calls: Mutex<Vec<(String, String)>>,
    pub fail_set_status: AtomicBool,
}

fn version_key(product_id: &str, tag: &str) -> String {
    format!("{product_id}/{tag}")
}

impl InMemoryVersionRepository {
    pub fn seed(&self, product_id: &str, version: Version) {
        self.versions
            .lock()
            .unwrap()
            .insert(version_key(product_id, &version.tag), version);
    }

    pub fn stored(&self, product_id: &str, tag: &str) -> Option<Version> {
        self.versions
            .lock()
            .unwrap()
            .get(&version_key(product_id, tag))
            .cloned()
    }
}

#[async_trait]
impl VersionRepository for InMemoryVersionRepository {
    async fn create(
        &self,
        _user_id: &str,
        product_id: &str,
        version: &Version,
    ) -> Result<Version, RepositoryError> {
        self.versions
            .lock()
            .unwrap()
            .insert(version_key(product_id, &version.tag), version.clone());
        Ok(version.clone())
    }

    async fn get_by_tag(&self, product_id: &str, tag: &str) -> Result<Version, RepositoryError> {
        self.versions
            .lock()
            .unwrap()
            .get(&version_key(product_id, tag))
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_by_product(
        &self,
        product_id: &str,
        filter: &ListVersionsFilter,
    ) -> Result<Vec<Version>, RepositoryError> {
        let prefix = format!("{product_id}/");
        Ok(self
            .versions
            .lock()
            .unwrap()
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(_, version)| version.clone())
            .filter(|version| filter.status.is_none_or(|status| version.status == status))
            .collect())
    }

    async fn update(&self, product_id: &str, version: &Version) -> Result<(), RepositoryError> {
        self.versions
            .lock()
            .unwrap()
            .insert(version_key(product_id, &version.tag), version.clone());
        Ok(())
    }

    async fn set_status(
        &self,
        product_id: &str,
        tag: &str,
        status: VersionStatus,
    ) -> Result<(), RepositoryError> {
        self.status_calls
            .lock()
            .unwrap()
            .push((tag.to_string(), status));

        if self.fail_set_status.load(Ordering::SeqCst) {
            return Err(RepositoryError::Storage(anyhow::anyhow!(
                "status write rejected"
            )));
        }

        let mut versions = self.versions.lock().unwrap();
        let version = versions
            .get_mut(&version_key(product_id, tag))
            .ok_or(RepositoryError::NotFound)?;
        version.status = status;
        version.error = None;
        Ok(())
    }

    async fn set_error(
        &self,
        product_id: &str,
        version: &Version,
        error_message: &str,
    ) -> Result<Version, RepositoryError> {
        self.error_calls
            .lock()
            .unwrap()
            .push((version.tag.clone(), error_message.to_string()));

        let mut versions = self.versions.lock().unwrap();
        let stored = versions
            .get_mut(&version_key(product_id, &version.tag))
            .ok_or(RepositoryError::NotFound)?;
        stored.status = VersionStatus::Error;
        stored.error = Some(error_message.to_string());
        Ok(stored.clone())
    }
}

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: Mutex<HashMap<String, Product>>,
}

impl InMemoryProductRepository {
    pub fn seed(&self, product: Product) {
        self.products
            .lock()
            .unwrap()
            .insert(product.id.clone(), product);
    }

    pub fn stored(&self, product_id: &str) -> Option<Product> {
        self.products.lock().unwrap().get(product_id).cloned()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn get_by_id(&self, product_id: &str) -> Result<Product, RepositoryError> {
        self.products
            .lock()
            .unwrap()
            .get(product_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn update(&self, product: &Product) -> Result<(), RepositoryError> {
        self.products
            .lock()
            .unwrap()
            .insert(product.id.clone(), product.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryProcessRepository {
    processes: Mutex<HashMap<String, RegisteredProcess>>,
}

fn process_key(scope: &str, process_id: &str) -> String {
    format!("{scope}/{process_id}")
}

impl InMemoryProcessRepository {
    pub fn seed(&self, scope: &str, process: RegisteredProcess) {
        self.processes
            .lock()
            .unwrap()
            .insert(process_key(scope, &process.id), process);
    }

    pub fn stored(&self, scope: &str, process_id: &str) -> Option<RegisteredProcess> {
        self.processes
            .lock()
            .unwrap()
            .get(&process_key(scope, process_id))
            .cloned()
    }

    /// Poll until the record reaches the expected status. Panics after two
    /// seconds: background settlement should be near-instant with fakes.
    pub async fn wait_for_status(
        &self,
        scope: &str,
        process_id: &str,
        expected: RegisteredProcessStatus,
    ) -> RegisteredProcess {
        for _ in 0..200 {
            if let Some(record) = self.stored(scope, process_id) {
                if record.status == expected {
                    return record;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("process {process_id} never reached {expected}");
    }
}

#[async_trait]
impl ProcessRepository for InMemoryProcessRepository {
    async fn get_by_id(
        &self,
        scope: &str,
        process_id: &str,
    ) -> Result<RegisteredProcess, RepositoryError> {
        self.processes
            .lock()
            .unwrap()
            .get(&process_key(scope, process_id))
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn create(
        &self,
        scope: &str,
        process: &RegisteredProcess,
    ) -> Result<(), RepositoryError> {
        self.processes
            .lock()
            .unwrap()
            .insert(process_key(scope, &process.id), process.clone());
        Ok(())
    }

    async fn update(
        &self,
        scope: &str,
        process: &RegisteredProcess,
    ) -> Result<(), RepositoryError> {
        self.processes
            .lock()
            .unwrap()
            .insert(process_key(scope, &process.id), process.clone());
        Ok(())
    }

    async fn delete(&self, scope: &str, process_id: &str) -> Result<(), RepositoryError> {
        self.processes
            .lock()
            .unwrap()
            .remove(&process_key(scope, process_id))
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn search_by_product(
        &self,
        product_id: &str,
        filter: &SearchFilter,
    ) -> Result<Vec<RegisteredProcess>, RepositoryError> {
        let prefix = format!("{product_id}/");
        Ok(self
            .processes
            .lock()
            .unwrap()
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(_, process)| process.clone())
            .filter(|process| matches_filter(process, filter))
            .collect())
    }

    async fn global_search(
        &self,
        filter: &SearchFilter,
    ) -> Result<Vec<RegisteredProcess>, RepositoryError> {
        Ok(self
            .processes
            .lock()
            .unwrap()
            .values()
            .filter(|process| process.is_public)
            .filter(|process| matches_filter(process, filter))
            .cloned()
            .collect())
    }
}

fn matches_filter(process: &RegisteredProcess, filter: &SearchFilter) -> bool {
    filter
        .process_type
        .is_none_or(|process_type| process.process_type == process_type)
        && filter
            .process_name
            .as_deref()
            .is_none_or(|name| process.name == name)
}

// ============================================================================
// Object storage
// ============================================================================

#[derive(Default)]
pub struct FakeObjectStorage {
    pub uploads: Mutex<Vec<(String, String, usize)>>,
    pub deletes: Mutex<Vec<(String, String)>>,
    pub fail_upload: Mutex<Option<String>>,
}

#[async_trait]
impl ObjectStorage for FakeObjectStorage {
    async fn upload_image_sources(
        &self,
        scope: &str,
        image: &str,
        sources: &[u8],
    ) -> anyhow::Result<()> {
        if let Some(message) = self.fail_upload.lock().unwrap().clone() {
            return Err(anyhow::anyhow!(message));
        }
        self.uploads
            .lock()
            .unwrap()
            .push((scope.to_string(), image.to_string(), sources.len()));
        Ok(())
    }

    async fn delete_image_sources(&self, scope: &str, image: &str) -> anyhow::Result<()> {
        self.deletes
            .lock()
            .unwrap()
            .push((scope.to_string(), image.to_string()));
        Ok(())
    }
}

// ============================================================================
// Remote services
// ============================================================================

#[derive(Default)]
pub struct FakeScheduler {
    pub fail_start: Mutex<Option<String>>,
    pub fail_stop: Mutex<Option<String>>,
    pub fail_publish: Mutex<Option<String>>,
    pub fail_unpublish: Mutex<Option<String>>,
    pub fail_register: Mutex<Option<String>>,
    pub start_calls: Mutex<Vec<String>>,
    pub stop_calls: Mutex<Vec<String>>,
    pub publish_calls: Mutex<Vec<String>>,
    pub unpublish_calls: Mutex<Vec<String>>,
    pub register_calls: Mutex<Vec<(String, String, String)>>,
}

fn maybe_fail(slot: &Mutex<Option<String>>) -> anyhow::Result<()> {
    match slot.lock().unwrap().clone() {
        Some(message) => Err(anyhow::anyhow!(message)),
        None => Ok(()),
    }
}

#[async_trait]
impl VersionScheduler for FakeScheduler {
    async fn start(
        &self,
        _product_id: &str,
        version: &Version,
        _resources: &VersionStreamingResources,
    ) -> anyhow::Result<()> {
        self.start_calls.lock().unwrap().push(version.tag.clone());
        maybe_fail(&self.fail_start)
    }

    async fn stop(&self, _product_id: &str, version: &Version) -> anyhow::Result<()> {
        self.stop_calls.lock().unwrap().push(version.tag.clone());
        maybe_fail(&self.fail_stop)
    }

    async fn publish(
        &self,
        _product_id: &str,
        version_tag: &str,
    ) -> anyhow::Result<HashMap<String, String>> {
        self.publish_calls
            .lock()
            .unwrap()
            .push(version_tag.to_string());
        maybe_fail(&self.fail_publish)?;

        let mut triggers = HashMap::new();
        triggers.insert(
            "entrypoint".to_string(),
            format!("https://{version_tag}.demo.kiln.dev"),
        );
        Ok(triggers)
    }

    async fn unpublish(&self, _product_id: &str, version: &Version) -> anyhow::Result<()> {
        self.unpublish_calls
            .lock()
            .unwrap()
            .push(version.tag.clone());
        maybe_fail(&self.fail_unpublish)
    }

    async fn watch_process_status(
        &self,
        _product_id: &str,
        _version_tag: &str,
    ) -> anyhow::Result<mpsc::Receiver<Process>> {
        let (_tx, rx) = mpsc::channel(1);
        Ok(rx)
    }

    async fn register_process(
        &self,
        product_id: &str,
        process_id: &str,
        process_image: &str,
    ) -> anyhow::Result<String> {
        self.register_calls.lock().unwrap().push((
            product_id.to_string(),
            process_id.to_string(),
            process_image.to_string(),
        ));
        maybe_fail(&self.fail_register)?;
        Ok(format!("{process_image}@sha256:deadbeef"))
    }
}

#[derive(Default)]
pub struct FakeNatsManager {
    pub fail_streams: Mutex<Option<String>>,
    pub fail_object_stores: Mutex<Option<String>>,
    pub fail_key_value_stores: Mutex<Option<String>>,
    /// Return stream maps missing every workflow, to exercise resource
    /// resolution failures.
    pub omit_stream_workflows: AtomicBool,
    pub delete_stream_calls: Mutex<Vec<String>>,
    pub delete_object_store_calls: Mutex<Vec<String>>,
    pub fail_delete_streams: Mutex<Option<String>>,
}

#[async_trait]
impl NatsManager for FakeNatsManager {
    async fn create_streams(
        &self,
        product_id: &str,
        version: &Version,
    ) -> anyhow::Result<VersionStreams> {
        maybe_fail(&self.fail_streams)?;

        if self.omit_stream_workflows.load(Ordering::SeqCst) {
            return Ok(VersionStreams {
                workflows: HashMap::new(),
            });
        }

        let workflows = version
            .workflows
            .iter()
            .map(|workflow| {
                let processes = workflow
                    .processes
                    .iter()
                    .map(|process| {
                        (
                            process.name.clone(),
                            ProcessStreamConfig {
                                subject: format!(
                                    "{product_id}.{}.{}",
                                    workflow.name, process.name
                                ),
                                subscriptions: process.subscriptions.clone(),
                            },
                        )
                    })
                    .collect();
                (
                    workflow.name.clone(),
                    WorkflowStreamConfig {
                        stream: format!("{product_id}-{}-{}", version.tag, workflow.name),
                        processes,
                    },
                )
            })
            .collect();

        Ok(VersionStreams { workflows })
    }

    async fn create_object_stores(
        &self,
        _product_id: &str,
        version: &Version,
    ) -> anyhow::Result<VersionObjectStores> {
        maybe_fail(&self.fail_object_stores)?;

        let workflows = version
            .workflows
            .iter()
            .map(|workflow| {
                (
                    workflow.name.clone(),
                    WorkflowObjectStores {
                        processes: HashMap::new(),
                    },
                )
            })
            .collect();

        Ok(VersionObjectStores { workflows })
    }

    async fn create_key_value_stores(
        &self,
        product_id: &str,
        version: &Version,
    ) -> anyhow::Result<KeyValueStores> {
        maybe_fail(&self.fail_key_value_stores)?;

        let workflows = version
            .workflows
            .iter()
            .map(|workflow| {
                let processes = workflow
                    .processes
                    .iter()
                    .map(|process| {
                        (
                            process.name.clone(),
                            format!("kv_{product_id}_{}_{}", workflow.name, process.name),
                        )
                    })
                    .collect();
                (
                    workflow.name.clone(),
                    WorkflowKeyValueStores {
                        store: format!("kv_{product_id}_{}", workflow.name),
                        processes,
                    },
                )
            })
            .collect();

        Ok(KeyValueStores {
            global: format!("kv_{product_id}"),
            version: format!("kv_{product_id}_{}", version.tag),
            workflows,
        })
    }

    async fn delete_streams(&self, _product_id: &str, version_tag: &str) -> anyhow::Result<()> {
        maybe_fail(&self.fail_delete_streams)?;
        self.delete_stream_calls
            .lock()
            .unwrap()
            .push(version_tag.to_string());
        Ok(())
    }

    async fn delete_object_stores(
        &self,
        _product_id: &str,
        version_tag: &str,
    ) -> anyhow::Result<()> {
        self.delete_object_store_calls
            .lock()
            .unwrap()
            .push(version_tag.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeProcessRegistry {
    pub delete_calls: Mutex<Vec<(String, String)>>,
    pub fail_delete: Mutex<Option<String>>,
}

#[async_trait]
impl ProcessRegistry for FakeProcessRegistry {
    async fn delete_process(&self, image_name: &str, version: &str) -> anyhow::Result<()> {
        maybe_fail(&self.fail_delete)?;
        self.delete_calls
            .lock()
            .unwrap()
            .push((image_name.to_string(), version.to_string()));
        Ok(())
    }
}

// ============================================================================
// Audit + access control
// ============================================================================

/// One recorded audit entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub action: &'static str,
    pub user_id: String,
    pub product_id: String,
    pub version_tag: String,
    pub comment: String,
}

#[derive(Default)]
pub struct FakeUserActivity {
    pub entries: Mutex<Vec<ActivityEntry>>,
    pub fail: Mutex<Option<String>>,
}

impl FakeUserActivity {
    fn record(
        &self,
        action: &'static str,
        user_id: &str,
        product_id: &str,
        version: &Version,
        comment: &str,
    ) -> anyhow::Result<()> {
        if let Some(message) = self.fail.lock().unwrap().clone() {
            return Err(anyhow::anyhow!(message));
        }
        self.entries.lock().unwrap().push(ActivityEntry {
            action,
            user_id: user_id.to_string(),
            product_id: product_id.to_string(),
            version_tag: version.tag.clone(),
            comment: comment.to_string(),
        });
        Ok(())
    }

    pub fn entries_for(&self, action: &str) -> Vec<ActivityEntry> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.action == action)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl UserActivityRecorder for FakeUserActivity {
    async fn register_create_action(
        &self,
        user_id: &str,
        product_id: &str,
        version: &Version,
    ) -> anyhow::Result<()> {
        self.record("create", user_id, product_id, version, "")
    }

    async fn register_start_action(
        &self,
        user_id: &str,
        product_id: &str,
        version: &Version,
        comment: &str,
    ) -> anyhow::Result<()> {
        self.record("start", user_id, product_id, version, comment)
    }

    async fn register_stop_action(
        &self,
        user_id: &str,
        product_id: &str,
        version: &Version,
        comment: &str,
    ) -> anyhow::Result<()> {
        self.record("stop", user_id, product_id, version, comment)
    }

    async fn register_publish_action(
        &self,
        user_id: &str,
        product_id: &str,
        version: &Version,
        comment: &str,
    ) -> anyhow::Result<()> {
        self.record("publish", user_id, product_id, version, comment)
    }

    async fn register_unpublish_action(
        &self,
        user_id: &str,
        product_id: &str,
        version: &Version,
        comment: &str,
    ) -> anyhow::Result<()> {
        self.record("unpublish", user_id, product_id, version, comment)
    }
}

#[derive(Default)]
pub struct FakeAccessControl {
    pub denied: Mutex<Vec<Action>>,
}

impl FakeAccessControl {
    pub fn deny(&self, action: Action) {
        self.denied.lock().unwrap().push(action);
    }
}

impl AccessControl for FakeAccessControl {
    fn check_product_grants(
        &self,
        _user: &User,
        product_id: &str,
        action: Action,
    ) -> Result<(), AuthError> {
        if self.denied.lock().unwrap().contains(&action) {
            return Err(AuthError::MissingProductGrant {
                product: product_id.to_string(),
                action,
            });
        }
        Ok(())
    }

    fn check_role_grants(&self, _user: &User, action: Action) -> Result<(), AuthError> {
        if self.denied.lock().unwrap().contains(&action) {
            return Err(AuthError::MissingRoleGrant { action });
        }
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

/// Wires every fake into the two handlers under test.
pub struct TestHarness {
    pub version_repo: Arc<InMemoryVersionRepository>,
    pub product_repo: Arc<InMemoryProductRepository>,
    pub process_repo: Arc<InMemoryProcessRepository>,
    pub scheduler: Arc<FakeScheduler>,
    pub nats_manager: Arc<FakeNatsManager>,
    pub object_storage: Arc<FakeObjectStorage>,
    pub process_registry: Arc<FakeProcessRegistry>,
    pub user_activity: Arc<FakeUserActivity>,
    pub access_control: Arc<FakeAccessControl>,
}

impl TestHarness {
    /// Fresh harness with the demo product seeded.
    pub fn new() -> Self {
        let harness = Self {
            version_repo: Arc::new(InMemoryVersionRepository::default()),
            product_repo: Arc::new(InMemoryProductRepository::default()),
            process_repo: Arc::new(InMemoryProcessRepository::default()),
            scheduler: Arc::new(FakeScheduler::default()),
            nats_manager: Arc::new(FakeNatsManager::default()),
            object_storage: Arc::new(FakeObjectStorage::default()),
            process_registry: Arc::new(FakeProcessRegistry::default()),
            user_activity: Arc::new(FakeUserActivity::default()),
            access_control: Arc::new(FakeAccessControl::default()),
        };
        harness.product_repo.seed(product_fixture());
        harness
    }

    pub fn version_handler(&self) -> VersionHandler {
        VersionHandler::new(VersionHandlerParams {
            config: test_config(),
            version_repo: self.version_repo.clone(),
            product_repo: self.product_repo.clone(),
            scheduler: self.scheduler.clone(),
            nats_manager: self.nats_manager.clone(),
            user_activity: self.user_activity.clone(),
            access_control: self.access_control.clone(),
        })
    }

    pub fn process_handler(&self) -> ProcessHandler {
        ProcessHandler::new(ProcessHandlerParams {
            config: test_config(),
            process_repo: self.process_repo.clone(),
            scheduler: self.scheduler.clone(),
            object_storage: self.object_storage.clone(),
            process_registry: self.process_registry.clone(),
            access_control: self.access_control.clone(),
        })
    }
}
