//! Integration tests for the sync store
//!
//! These tests drive `SyncStore` end to end against in-memory collaborators:
//! - Sync / upload / download state machine
//! - Last sync time bookkeeping
//! - Backup export and import
//! - Config persistence and events

use async_trait::async_trait;
use bridge_desktop::{DesktopFileExchange, SqliteSettingsStore};
use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    host::{AppLifecycle, Notifier},
    storage::{FileExchange, SettingsStore, SyncClient},
    time::FixedClock,
};
use chrono::{TimeZone, Utc};
use core_runtime::events::{BackupEvent, CoreEvent, EventBus, EventStream, SyncEvent};
use core_sync::{
    AppState, AppStateMerger, AppStateStore, ImportOutcome, LastUpdateWinsMerger, ProviderType,
    SyncAction, SyncClientFactory, SyncConfig, SyncConfigRepository, SyncError, SyncMessages,
    SyncOutcome, SyncStore, SyncStoreDeps,
};
use mockall::mock;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// In-memory collaborators
// ============================================================================

#[derive(Default)]
struct MemoryRemote {
    values: Mutex<HashMap<String, String>>,
    gets: AtomicUsize,
    sets: AtomicUsize,
}

impl MemoryRemote {
    fn with_value(key: &str, value: &str) -> Self {
        let remote = Self::default();
        remote
            .values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        remote
    }

    fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl SyncClient for MemoryRemote {
    async fn get(&self, key: &str) -> BridgeResult<Option<String>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> BridgeResult<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn check(&self) -> BridgeResult<bool> {
        Ok(true)
    }
}

mock! {
    Remote {}

    #[async_trait]
    impl SyncClient for Remote {
        async fn get(&self, key: &str) -> BridgeResult<Option<String>>;
        async fn set(&self, key: &str, value: &str) -> BridgeResult<()>;
        async fn check(&self) -> BridgeResult<bool>;
    }
}

struct StaticFactory {
    client: Arc<dyn SyncClient>,
    created: AtomicUsize,
}

impl SyncClientFactory for StaticFactory {
    fn create(&self, _config: &SyncConfig) -> core_sync::Result<Arc<dyn SyncClient>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::clone(&self.client))
    }
}

struct MemoryAppState {
    state: Mutex<AppState>,
    stores: AtomicUsize,
}

impl MemoryAppState {
    fn new(value: serde_json::Value) -> Self {
        Self {
            state: Mutex::new(AppState::new(value)),
            stores: AtomicUsize::new(0),
        }
    }

    fn current(&self) -> AppState {
        self.state.lock().unwrap().clone()
    }
}

#[async_trait]
impl AppStateStore for MemoryAppState {
    async fn load(&self) -> core_sync::Result<AppState> {
        Ok(self.current())
    }

    async fn store(&self, state: &AppState) -> core_sync::Result<()> {
        self.stores.fetch_add(1, Ordering::SeqCst);
        *self.state.lock().unwrap() = state.clone();
        Ok(())
    }
}

#[derive(Default)]
struct CountingMerger {
    calls: AtomicUsize,
}

impl AppStateMerger for CountingMerger {
    fn merge(&self, target: &mut AppState, source: &AppState) -> core_sync::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        LastUpdateWinsMerger.merge(target, source)
    }
}

#[derive(Default)]
struct MemoryFiles {
    exported: Mutex<Vec<(String, String)>>,
    pending_import: Mutex<Option<String>>,
    fail_read: bool,
}

#[async_trait]
impl FileExchange for MemoryFiles {
    async fn download_as(&self, content: &str, file_name: &str) -> BridgeResult<()> {
        self.exported
            .lock()
            .unwrap()
            .push((file_name.to_string(), content.to_string()));
        Ok(())
    }

    async fn read_from_file(&self) -> BridgeResult<Option<String>> {
        if self.fail_read {
            return Err(BridgeError::OperationFailed("permission denied".to_string()));
        }
        Ok(self.pending_import.lock().unwrap().take())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    toasts: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn show_toast(&self, message: &str) {
        self.toasts.lock().unwrap().push(message.to_string());
    }
}

#[derive(Default)]
struct CountingLifecycle {
    reloads: AtomicUsize,
}

#[async_trait]
impl AppLifecycle for CountingLifecycle {
    async fn reload(&self) -> BridgeResult<()> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

const NOW_MILLIS: i64 = 1_700_000_000_000;
const IMPORT_FAILED: &str = "Failed to import from file";

struct Harness<F = MemoryFiles> {
    store: SyncStore,
    settings: Arc<dyn SettingsStore>,
    app_state: Arc<MemoryAppState>,
    merger: Arc<CountingMerger>,
    factory: Arc<StaticFactory>,
    files: Arc<F>,
    notifier: Arc<RecordingNotifier>,
    lifecycle: Arc<CountingLifecycle>,
    events: EventStream,
}

async fn harness<F: FileExchange + 'static>(
    client: Arc<dyn SyncClient>,
    local: serde_json::Value,
    files: F,
) -> Harness<F> {
    let settings: Arc<dyn SettingsStore> =
        Arc::new(SqliteSettingsStore::in_memory().await.unwrap());
    let app_state = Arc::new(MemoryAppState::new(local));
    let merger = Arc::new(CountingMerger::default());
    let factory = Arc::new(StaticFactory {
        client,
        created: AtomicUsize::new(0),
    });
    let files = Arc::new(files);
    let notifier = Arc::new(RecordingNotifier::default());
    let lifecycle = Arc::new(CountingLifecycle::default());
    let event_bus = EventBus::new(32);
    let events = EventStream::new(event_bus.subscribe());

    let store = SyncStore::load(SyncStoreDeps {
        repository: SyncConfigRepository::new(settings.clone()),
        app_state: app_state.clone(),
        merger: merger.clone(),
        clients: factory.clone(),
        files: files.clone(),
        notifier: notifier.clone(),
        lifecycle: lifecycle.clone(),
        clock: Arc::new(FixedClock(Utc.timestamp_millis_opt(NOW_MILLIS).unwrap())),
        event_bus,
        messages: SyncMessages {
            import_failed: IMPORT_FAILED.to_string(),
        },
    })
    .await
    .unwrap();

    Harness {
        store,
        settings,
        app_state,
        merger,
        factory,
        files,
        notifier,
        lifecycle,
        events,
    }
}

async fn with_webdav_account<F>(h: &Harness<F>) {
    h.store
        .update_config(|c| {
            c.provider = ProviderType::WebDav;
            c.webdav.endpoint = "https://dav.example.com".to_string();
            c.webdav.username = "alice".to_string();
            c.webdav.password = "secret".to_string();
        })
        .await
        .unwrap();
}

fn local_state() -> serde_json::Value {
    json!({
        "chat": {"sessions": [{"id": "a", "lastUpdate": 1, "topic": "local"}]},
        "config": {"theme": "light", "lastUpdateTime": 10}
    })
}

fn remote_state() -> serde_json::Value {
    json!({
        "chat": {"sessions": [{"id": "b", "lastUpdate": 2, "topic": "remote"}]},
        "config": {"theme": "dark", "lastUpdateTime": 20}
    })
}

fn drain(events: &mut EventStream) -> Vec<CoreEvent> {
    let mut out = Vec::new();
    while let Some(Ok(event)) = events.try_recv() {
        out.push(event);
    }
    out
}

// ============================================================================
// Guard
// ============================================================================

#[tokio::test]
async fn test_without_account_every_action_is_skipped() {
    let mut remote = MockRemote::new();
    remote.expect_get().never();
    remote.expect_set().never();
    let mut h = harness(Arc::new(remote), local_state(), MemoryFiles::default()).await;

    for action in [SyncAction::Sync, SyncAction::Upload, SyncAction::Download] {
        assert_eq!(h.store.sync(action).await.unwrap(), SyncOutcome::Skipped);
    }

    assert_eq!(h.factory.created.load(Ordering::SeqCst), 0);
    assert_eq!(h.store.config().await.last_sync_time, 0);
    assert_eq!(h.app_state.current(), AppState::new(local_state()));
    assert!(drain(&mut h.events).is_empty());
}

// ============================================================================
// SYNC
// ============================================================================

#[tokio::test]
async fn test_sync_with_empty_remote_uploads_local_verbatim() {
    let remote = Arc::new(MemoryRemote::default());
    let h = harness(remote.clone(), local_state(), MemoryFiles::default()).await;
    with_webdav_account(&h).await;

    let outcome = h.store.sync(SyncAction::Sync).await.unwrap();

    assert_eq!(outcome, SyncOutcome::Bootstrapped);
    assert_eq!(
        remote.value("alice"),
        Some(AppState::new(local_state()).to_json().unwrap())
    );
    assert_eq!(remote.gets.load(Ordering::SeqCst), 1);
    assert_eq!(h.merger.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.store.config().await.last_sync_time, 0);
}

#[tokio::test]
async fn test_sync_treats_empty_string_as_no_data() {
    let remote = Arc::new(MemoryRemote::with_value("alice", ""));
    let h = harness(remote.clone(), local_state(), MemoryFiles::default()).await;
    with_webdav_account(&h).await;

    assert_eq!(
        h.store.sync(SyncAction::Sync).await.unwrap(),
        SyncOutcome::Bootstrapped
    );
    assert_eq!(h.merger.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_sync_converges_local_and_remote_on_merge() {
    let remote_json = AppState::new(remote_state()).to_json().unwrap();
    let remote = Arc::new(MemoryRemote::with_value("alice", &remote_json));
    let mut h = harness(remote.clone(), local_state(), MemoryFiles::default()).await;
    with_webdav_account(&h).await;

    let outcome = h.store.sync(SyncAction::Sync).await.unwrap();

    let mut expected = AppState::new(local_state());
    LastUpdateWinsMerger
        .merge(&mut expected, &AppState::new(remote_state()))
        .unwrap();

    assert_eq!(outcome, SyncOutcome::Merged);
    assert_eq!(h.merger.calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.app_state.current(), expected);
    assert_eq!(remote.value("alice"), Some(expected.to_json().unwrap()));
    assert_eq!(remote.gets.load(Ordering::SeqCst), 1);
    assert_eq!(remote.sets.load(Ordering::SeqCst), 1);

    let config = h.store.config().await;
    assert_eq!(config.last_sync_time, NOW_MILLIS);
    assert_eq!(config.last_provider, "webdav");

    let events = drain(&mut h.events);
    assert_eq!(events.len(), 2);
    let (CoreEvent::Sync(SyncEvent::Started { run_id: started, .. }), CoreEvent::Sync(SyncEvent::Completed { run_id: completed, outcome, .. })) =
        (&events[0], &events[1])
    else {
        panic!("unexpected events: {:?}", events);
    };
    assert_eq!(started, completed);
    assert_eq!(outcome, "merged");
}

#[tokio::test]
async fn test_sync_fetch_failure_aborts_without_touching_state() {
    let mut remote = MockRemote::new();
    remote
        .expect_get()
        .times(1)
        .returning(|_| Err(BridgeError::Http { status: 401, message: "Unauthorized".to_string() }));
    remote.expect_set().never();
    let mut h = harness(Arc::new(remote), local_state(), MemoryFiles::default()).await;
    with_webdav_account(&h).await;

    let result = h.store.sync(SyncAction::Sync).await;

    assert!(matches!(result, Err(SyncError::Remote(BridgeError::Http { status: 401, .. }))));
    assert_eq!(h.app_state.current(), AppState::new(local_state()));
    assert_eq!(h.app_state.stores.load(Ordering::SeqCst), 0);
    assert_eq!(h.store.config().await.last_sync_time, 0);

    let events = drain(&mut h.events);
    assert!(matches!(events.last(), Some(CoreEvent::Sync(SyncEvent::Failed { .. }))));
}

#[tokio::test]
async fn test_sync_with_malformed_remote_is_parse_error() {
    let mut remote = MockRemote::new();
    remote
        .expect_get()
        .times(1)
        .returning(|_| Ok(Some("{not json".to_string())));
    remote.expect_set().never();
    let h = harness(Arc::new(remote), local_state(), MemoryFiles::default()).await;
    with_webdav_account(&h).await;

    let result = h.store.sync(SyncAction::Sync).await;

    assert!(matches!(result, Err(SyncError::Parse(_))));
    assert_eq!(h.merger.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.app_state.current(), AppState::new(local_state()));
}

// ============================================================================
// UPLOAD
// ============================================================================

#[tokio::test]
async fn test_upload_overwrites_remote_without_reading() {
    let remote = Arc::new(MemoryRemote::with_value("alice", r#"{"stale":true}"#));
    let h = harness(remote.clone(), local_state(), MemoryFiles::default()).await;
    with_webdav_account(&h).await;

    assert_eq!(h.store.upload().await.unwrap(), SyncOutcome::Uploaded);

    assert_eq!(
        remote.value("alice"),
        Some(AppState::new(local_state()).to_json().unwrap())
    );
    assert_eq!(remote.gets.load(Ordering::SeqCst), 0);
    assert_eq!(h.merger.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.store.config().await.last_sync_time, NOW_MILLIS);
}

#[tokio::test]
async fn test_upload_failure_propagates() {
    let mut remote = MockRemote::new();
    remote.expect_get().never();
    remote
        .expect_set()
        .times(1)
        .returning(|_, _| Err(BridgeError::OperationFailed("connection reset".to_string())));
    let h = harness(Arc::new(remote), local_state(), MemoryFiles::default()).await;
    with_webdav_account(&h).await;

    assert!(matches!(h.store.upload().await, Err(SyncError::Remote(_))));
    assert_eq!(h.store.config().await.last_sync_time, 0);
}

// ============================================================================
// DOWNLOAD
// ============================================================================

#[tokio::test]
async fn test_download_with_empty_remote_writes_nothing() {
    let remote = Arc::new(MemoryRemote::default());
    let h = harness(remote.clone(), local_state(), MemoryFiles::default()).await;
    with_webdav_account(&h).await;

    assert_eq!(h.store.download().await.unwrap(), SyncOutcome::RemoteEmpty);

    assert_eq!(h.app_state.stores.load(Ordering::SeqCst), 0);
    assert_eq!(remote.sets.load(Ordering::SeqCst), 0);
    assert_eq!(h.app_state.current(), AppState::new(local_state()));
    assert_eq!(h.store.config().await.last_sync_time, 0);
}

#[tokio::test]
async fn test_download_replaces_local_without_merging() {
    let remote_json = AppState::new(remote_state()).to_json().unwrap();
    let remote = Arc::new(MemoryRemote::with_value("alice", &remote_json));
    let h = harness(remote.clone(), local_state(), MemoryFiles::default()).await;
    with_webdav_account(&h).await;

    assert_eq!(h.store.download().await.unwrap(), SyncOutcome::Downloaded);

    assert_eq!(h.app_state.current(), AppState::new(remote_state()));
    assert_eq!(h.merger.calls.load(Ordering::SeqCst), 0);
    assert_eq!(remote.sets.load(Ordering::SeqCst), 0);
    assert_eq!(h.store.config().await.last_sync_time, NOW_MILLIS);
}

#[tokio::test]
async fn test_download_rejects_remote_that_is_not_an_object() {
    for raw in ["null", "42", "[1, 2]", r#""text""#] {
        let remote = Arc::new(MemoryRemote::with_value("alice", raw));
        let h = harness(remote.clone(), local_state(), MemoryFiles::default()).await;
        with_webdav_account(&h).await;

        let result = h.store.download().await;

        assert!(matches!(result, Err(SyncError::Parse(_))), "{} was accepted", raw);
        assert_eq!(h.app_state.current(), AppState::new(local_state()));
        assert_eq!(h.app_state.stores.load(Ordering::SeqCst), 0);
        assert_eq!(h.store.config().await.last_sync_time, 0);
    }
}

#[tokio::test]
async fn test_sync_rejects_remote_that_is_not_an_object() {
    let remote = Arc::new(MemoryRemote::with_value("alice", "null"));
    let h = harness(remote.clone(), local_state(), MemoryFiles::default()).await;
    with_webdav_account(&h).await;

    assert!(matches!(h.store.sync(SyncAction::Sync).await, Err(SyncError::Parse(_))));
    assert_eq!(h.merger.calls.load(Ordering::SeqCst), 0);
    assert_eq!(remote.sets.load(Ordering::SeqCst), 0);
    assert_eq!(h.app_state.current(), AppState::new(local_state()));
}

#[tokio::test]
async fn test_download_uses_upstash_username_as_key() {
    let remote = Arc::new(MemoryRemote::with_value("bob", r#"{"from":"upstash"}"#));
    let h = harness(remote.clone(), local_state(), MemoryFiles::default()).await;
    h.store
        .update_config(|c| {
            c.provider = ProviderType::Upstash;
            c.upstash.endpoint = "https://kv.example.com".to_string();
            c.upstash.username = "bob".to_string();
            c.upstash.api_key = "token".to_string();
        })
        .await
        .unwrap();

    assert_eq!(h.store.download().await.unwrap(), SyncOutcome::Downloaded);
    assert_eq!(h.app_state.current(), AppState::new(json!({"from": "upstash"})));
    assert_eq!(h.store.config().await.last_provider, "upstash");
}

// ============================================================================
// check / get_client
// ============================================================================

#[tokio::test]
async fn test_check_delegates_to_client() {
    let mut remote = MockRemote::new();
    remote.expect_check().times(1).returning(|| Ok(false));
    let h = harness(Arc::new(remote), local_state(), MemoryFiles::default()).await;

    assert!(!h.store.check().await.unwrap());
}

#[tokio::test]
async fn test_check_propagates_failure() {
    let mut remote = MockRemote::new();
    remote
        .expect_check()
        .times(1)
        .returning(|| Err(BridgeError::NotAvailable("offline".to_string())));
    let h = harness(Arc::new(remote), local_state(), MemoryFiles::default()).await;

    assert!(matches!(h.store.check().await, Err(SyncError::Remote(_))));
}

#[tokio::test]
async fn test_get_client_builds_a_fresh_client_each_call() {
    let h = harness(Arc::new(MemoryRemote::default()), local_state(), MemoryFiles::default()).await;

    h.store.get_client().await.unwrap();
    h.store.get_client().await.unwrap();

    assert_eq!(h.factory.created.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Config
// ============================================================================

#[tokio::test]
async fn test_config_changes_survive_reload() {
    let h = harness(Arc::new(MemoryRemote::default()), local_state(), MemoryFiles::default()).await;
    with_webdav_account(&h).await;
    h.store.mark_sync_time().await;

    let reloaded = SyncConfigRepository::new(h.settings.clone()).load().await.unwrap();

    assert_eq!(reloaded, h.store.config().await);
    assert!(reloaded.cloud_sync());
    assert!(h.store.cloud_sync().await);
    assert!(h.store.has_account().await);
    assert_eq!(reloaded.last_sync_time, NOW_MILLIS);
}

// ============================================================================
// Export / Import
// ============================================================================

#[tokio::test]
async fn test_export_downloads_state_as_backup_file() {
    let mut h = harness(Arc::new(MemoryRemote::default()), local_state(), MemoryFiles::default()).await;

    h.store.export().await.unwrap();

    let exported = h.files.exported.lock().unwrap().clone();
    assert_eq!(exported.len(), 1);
    let (file_name, content) = &exported[0];
    assert!(file_name.starts_with("Backup-2023_11_"));
    assert!(file_name.ends_with(".json"));
    assert_eq!(AppState::from_json(content).unwrap(), AppState::new(local_state()));

    assert!(matches!(
        drain(&mut h.events).as_slice(),
        [CoreEvent::Backup(BackupEvent::Exported { .. })]
    ));
}

#[tokio::test]
async fn test_import_merges_persists_and_reloads() {
    let files = MemoryFiles::default();
    *files.pending_import.lock().unwrap() = Some(AppState::new(remote_state()).to_json().unwrap());
    let h = harness(Arc::new(MemoryRemote::default()), local_state(), files).await;

    assert_eq!(h.store.import().await.unwrap(), ImportOutcome::Imported);

    let mut expected = AppState::new(local_state());
    LastUpdateWinsMerger
        .merge(&mut expected, &AppState::new(remote_state()))
        .unwrap();
    assert_eq!(h.app_state.current(), expected);
    assert_eq!(h.merger.calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.lifecycle.reloads.load(Ordering::SeqCst), 1);
    assert!(h.notifier.toasts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_import_malformed_file_notifies_and_keeps_state() {
    let files = MemoryFiles::default();
    *files.pending_import.lock().unwrap() = Some("{definitely not json".to_string());
    let mut h = harness(Arc::new(MemoryRemote::default()), local_state(), files).await;

    assert_eq!(h.store.import().await.unwrap(), ImportOutcome::Failed);

    assert_eq!(h.app_state.current(), AppState::new(local_state()));
    assert_eq!(h.app_state.stores.load(Ordering::SeqCst), 0);
    assert_eq!(h.lifecycle.reloads.load(Ordering::SeqCst), 0);
    assert_eq!(h.notifier.toasts.lock().unwrap().as_slice(), [IMPORT_FAILED]);
    assert!(matches!(
        drain(&mut h.events).as_slice(),
        [CoreEvent::Backup(BackupEvent::ImportFailed { .. })]
    ));
}

#[tokio::test]
async fn test_import_unmergeable_document_fails_softly() {
    let files = MemoryFiles::default();
    *files.pending_import.lock().unwrap() = Some("[1, 2, 3]".to_string());
    let h = harness(Arc::new(MemoryRemote::default()), local_state(), files).await;

    assert_eq!(h.store.import().await.unwrap(), ImportOutcome::Failed);
    assert_eq!(h.app_state.current(), AppState::new(local_state()));
    assert_eq!(h.lifecycle.reloads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_import_cancelled_is_noop() {
    let h = harness(Arc::new(MemoryRemote::default()), local_state(), MemoryFiles::default()).await;

    assert_eq!(h.store.import().await.unwrap(), ImportOutcome::Cancelled);
    assert_eq!(h.lifecycle.reloads.load(Ordering::SeqCst), 0);
    assert!(h.notifier.toasts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_import_read_failure_propagates() {
    let files = MemoryFiles {
        fail_read: true,
        ..MemoryFiles::default()
    };
    let h = harness(Arc::new(MemoryRemote::default()), local_state(), files).await;

    assert!(matches!(h.store.import().await, Err(SyncError::Bridge(_))));
    assert!(h.notifier.toasts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_import_non_utf8_file_notifies_and_keeps_state() {
    let dir = std::env::temp_dir().join(format!("chat-sync-import-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let source = dir.join("backup.json");
    std::fs::write(&source, b"\xff\xfe{\"chat\":").unwrap();

    let files = DesktopFileExchange::with_export_dir(&dir);
    files.select_import_file(&source).await;
    let mut h = harness(Arc::new(MemoryRemote::default()), local_state(), files).await;

    assert_eq!(h.store.import().await.unwrap(), ImportOutcome::Failed);

    assert_eq!(h.app_state.current(), AppState::new(local_state()));
    assert_eq!(h.lifecycle.reloads.load(Ordering::SeqCst), 0);
    assert_eq!(h.notifier.toasts.lock().unwrap().as_slice(), [IMPORT_FAILED]);
    assert!(matches!(
        drain(&mut h.events).as_slice(),
        [CoreEvent::Backup(BackupEvent::ImportFailed { .. })]
    ));

    let _ = std::fs::remove_dir_all(&dir);
}
