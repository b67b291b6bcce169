use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use symlinker::errors::{LinkerError, Result};
use symlinker::host::{LinkHost, PathDialog, PresetDialog};
use symlinker::link::{
    CreateLinkRequest, DialogOptions, DialogSelection, FileBreakdown, FileLinkKind,
    LinkConfigStore, LinkFile, LinkRecord, LinkTypeVariant, ResetPolicy,
};

// =============================================================================
// Mock host
// =============================================================================

/// 记录所有调用的宿主，可以模拟失败
#[derive(Default)]
struct MockHost {
    link_requests: Mutex<Vec<CreateLinkRequest>>,
    removed: Mutex<Vec<Vec<LinkRecord>>>,
    read_links_calls: AtomicUsize,
    read_files_calls: AtomicUsize,
    fail_link: AtomicBool,
    fail_remove: AtomicBool,
    fail_read: AtomicBool,
    link_delay: Mutex<Option<Duration>>,
}

impl MockHost {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn reads(&self) -> usize {
        self.read_links_calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> CreateLinkRequest {
        self.link_requests
            .lock()
            .last()
            .cloned()
            .expect("no link request recorded")
    }
}

fn record(id: &str) -> LinkRecord {
    LinkRecord {
        id: id.to_string(),
        name: String::new(),
        source: vec!["/src".to_string()],
        target: "/out".to_string(),
        link_type: LinkTypeVariant::File,
        time: "2024-01-01 00:00:00".to_string(),
        files: Vec::new(),
        files_id: String::new(),
    }
}

#[async_trait]
impl LinkHost for MockHost {
    async fn link(&self, request: CreateLinkRequest) -> Result<()> {
        let delay = *self.link_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.link_requests.lock().push(request);
        if self.fail_link.load(Ordering::SeqCst) {
            return Err(LinkerError::link_failed("simulated link failure"));
        }
        Ok(())
    }

    async fn read_links(&self) -> Result<Vec<LinkRecord>> {
        let n = self.read_links_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_read.load(Ordering::SeqCst) {
            return Err(LinkerError::host_call("simulated listing failure"));
        }
        // 每次返回不同的列表，用来检查缓存是否整体替换
        Ok((0..n).map(|i| record(&format!("gen{}-{}", n, i))).collect())
    }

    async fn read_link_files(&self, id: &str, all: bool) -> Result<FileBreakdown> {
        self.read_files_calls.fetch_add(1, Ordering::SeqCst);
        Ok(FileBreakdown {
            record: all.then(|| record(id)),
            files: vec![LinkFile {
                id: 10000001,
                kind: FileLinkKind::File,
                source: "/src/a".to_string(),
                target: "/out/a".to_string(),
            }],
        })
    }

    async fn remove_links(&self, records: Vec<LinkRecord>) -> Result<()> {
        self.removed.lock().push(records);
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(LinkerError::file_operation("simulated remove failure"));
        }
        Ok(())
    }

    async fn backend_name(&self) -> String {
        "mock".to_string()
    }
}

/// 选择器后端出错的对话框
struct FailingDialog;

#[async_trait]
impl PathDialog for FailingDialog {
    async fn open(&self, _options: DialogOptions) -> Result<Option<DialogSelection>> {
        Err(LinkerError::dialog("picker backend unavailable"))
    }
}

fn setup() -> (Arc<MockHost>, Arc<PresetDialog>, LinkConfigStore) {
    let host = MockHost::new();
    let dialog = Arc::new(PresetDialog::new());
    let store = LinkConfigStore::new(host.clone(), dialog.clone());
    (host, dialog, store)
}

// =============================================================================
// Variant selection
// =============================================================================

#[cfg(test)]
mod variant_selection_tests {
    use super::*;
    use LinkTypeVariant::*;

    #[test]
    fn test_every_variant_yields_its_flags_and_clears_sources() {
        // (variant, name_disabled, source_is_directory, allows_multiple_sources)
        let table = [
            (File, false, false, false),
            (Files, true, false, true),
            (Dir, false, true, false),
            (Dirs, true, true, true),
            (DirAllFiles, true, true, false),
            (DirSurface, true, true, false),
            (Hard, false, false, false),
            (Hards, true, false, true),
            (HardsDirAllFiles, true, true, false),
        ];

        let (_host, _dialog, store) = setup();
        for (variant, name_disabled, is_dir, multiple) in table {
            store.set_source_paths(vec!["/stale".to_string()]);
            store.select_variant(variant);

            let draft = store.draft();
            assert_eq!(draft.variant, variant);
            assert_eq!(draft.name_disabled, name_disabled, "{:?}", variant);
            assert_eq!(draft.source_is_directory, is_dir, "{:?}", variant);
            assert_eq!(draft.allows_multiple_sources, multiple, "{:?}", variant);
            assert!(draft.source_paths.is_empty(), "{:?}", variant);
        }
    }

    #[test]
    fn test_variant_change_keeps_target_and_names() {
        let (_host, _dialog, store) = setup();
        store.set_target_path("/out");
        store.set_display_name("x");
        store.set_link_name("y");

        store.select_variant(Dirs);
        let draft = store.draft();
        assert_eq!(draft.target_path, "/out");
        assert_eq!(draft.display_name, "x");
        assert_eq!(draft.link_name, "y");
    }

    #[test]
    fn test_catalog_lists_all_variants_in_wire_order() {
        let (_host, _dialog, store) = setup();
        let tags: Vec<u8> = store.catalog().iter().map(|e| e.variant.wire_tag()).collect();
        assert_eq!(tags, (0..=8).collect::<Vec<u8>>());
    }
}

// =============================================================================
// Path selection
// =============================================================================

#[cfg(test)]
mod selection_tests {
    use super::*;

    #[tokio::test]
    async fn test_single_string_becomes_one_element_sequence() {
        let (_host, dialog, store) = setup();
        dialog.push(Some(DialogSelection::Single("/a".to_string())));

        assert!(store.select_source().await.unwrap());
        assert_eq!(store.draft().source_paths, vec!["/a".to_string()]);
    }

    #[tokio::test]
    async fn test_dialog_receives_variant_flags() {
        let (_host, dialog, store) = setup();
        store.select_variant(LinkTypeVariant::Dirs);
        dialog.push_paths(vec!["/a".into(), "/b".into()]);

        store.select_source().await.unwrap();
        store.select_target().await.unwrap();

        let requests = dialog.requests();
        assert_eq!(
            requests[0],
            DialogOptions {
                directory: true,
                multiple: true
            }
        );
        // 目标永远是单个目录
        assert_eq!(
            requests[1],
            DialogOptions {
                directory: true,
                multiple: false
            }
        );
        assert_eq!(store.draft().source_paths.len(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_dialog_leaves_values_unchanged() {
        let (_host, dialog, store) = setup();
        store.set_source_paths(vec!["/keep".to_string()]);
        store.set_target_path("/keep-out");

        dialog.push_cancel();
        dialog.push_cancel();
        assert!(!store.select_source().await.unwrap());
        assert!(!store.select_target().await.unwrap());

        let draft = store.draft();
        assert_eq!(draft.source_paths, vec!["/keep".to_string()]);
        assert_eq!(draft.target_path, "/keep-out");
    }

    #[tokio::test]
    async fn test_dialog_failure_propagates_and_keeps_draft() {
        let store = LinkConfigStore::new(MockHost::new(), Arc::new(FailingDialog));
        store.set_source_paths(vec!["/keep".to_string()]);
        store.set_target_path("/keep-out");

        let err = store.select_source().await.unwrap_err();
        assert!(matches!(err, LinkerError::Dialog(_)));
        assert_eq!(err.code(), "E007");
        assert!(matches!(
            store.select_target().await,
            Err(LinkerError::Dialog(_))
        ));

        let draft = store.draft();
        assert_eq!(draft.source_paths, vec!["/keep".to_string()]);
        assert_eq!(draft.target_path, "/keep-out");
    }

    #[tokio::test]
    async fn test_select_target_overwrites() {
        let (_host, dialog, store) = setup();
        store.set_target_path("/old");
        dialog.push_paths(vec!["/new".into()]);

        assert!(store.select_target().await.unwrap());
        assert_eq!(store.draft().target_path, "/new");
    }
}

// =============================================================================
// Create
// =============================================================================

#[cfg(test)]
mod create_tests {
    use super::*;

    #[tokio::test]
    async fn test_multi_source_request_omits_name() {
        let (host, _dialog, store) = setup();
        store.select_variant(LinkTypeVariant::Files);
        store.set_source_paths(vec!["/a".into(), "/b".into()]);
        store.set_target_path("/out");
        store.set_display_name("x");

        store.create_link().await.unwrap();

        assert_eq!(
            host.last_request(),
            CreateLinkRequest {
                source: vec!["/a".into(), "/b".into()],
                target: "/out".into(),
                t: LinkTypeVariant::Files,
                name: None,
                lname: String::new(),
            }
        );
        let json = serde_json::to_value(host.last_request()).unwrap();
        assert!(json.get("name").is_none());
        assert_eq!(json["t"], 1);
    }

    #[tokio::test]
    async fn test_single_file_request_carries_name() {
        let (host, _dialog, store) = setup();
        store.select_variant(LinkTypeVariant::File);
        store.set_source_paths(vec!["/a".into()]);
        store.set_target_path("/out");
        store.set_display_name("x");

        store.create_link().await.unwrap();

        let request = host.last_request();
        assert_eq!(request.name.as_deref(), Some("x"));
        assert_eq!(request.t, LinkTypeVariant::File);
    }

    #[tokio::test]
    async fn test_blank_name_is_omitted_and_lname_passes_through() {
        let (host, _dialog, store) = setup();
        store.set_source_paths(vec!["/a".into()]);
        store.set_target_path("/out");
        store.set_display_name("   ");
        store.set_link_name("  spaced  ");

        store.create_link().await.unwrap();

        let request = host.last_request();
        assert_eq!(request.name, None);
        assert_eq!(request.lname, "  spaced  ");
    }

    #[tokio::test]
    async fn test_refresh_runs_once_after_success() {
        let (host, _dialog, store) = setup();
        store.set_source_paths(vec!["/a".into()]);

        store.create_link().await.unwrap();
        assert_eq!(host.reads(), 1);
        assert_eq!(store.listing().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_runs_once_after_failure_and_host_error_wins() {
        let (host, _dialog, store) = setup();
        host.fail_link.store(true, Ordering::SeqCst);
        host.fail_read.store(true, Ordering::SeqCst);

        let err = store.create_link().await.unwrap_err();
        assert!(matches!(err, LinkerError::LinkFailed(_)));
        assert_eq!(host.reads(), 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_reported_after_successful_create() {
        let (host, _dialog, store) = setup();
        host.fail_read.store(true, Ordering::SeqCst);

        let err = store.create_link().await.unwrap_err();
        assert!(matches!(err, LinkerError::HostCall(_)));
        assert_eq!(host.link_requests.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_draft_kept_by_default() {
        let (_host, _dialog, store) = setup();
        store.set_source_paths(vec!["/a".into()]);
        store.set_display_name("x");

        store.create_link().await.unwrap();
        let draft = store.draft();
        assert_eq!(draft.source_paths, vec!["/a".to_string()]);
        assert_eq!(draft.display_name, "x");
    }

    #[tokio::test]
    async fn test_reset_on_success_policy() {
        let host = MockHost::new();
        let store = LinkConfigStore::new(host.clone(), Arc::new(PresetDialog::new()))
            .with_reset_policy(ResetPolicy::ResetOnSuccess);
        store.select_variant(LinkTypeVariant::Dirs);
        store.set_source_paths(vec!["/a".into()]);
        store.set_target_path("/out");

        store.create_link().await.unwrap();
        let draft = store.draft();
        assert!(draft.source_paths.is_empty());
        assert!(draft.target_path.is_empty());
        // 重置后保留当前类型
        assert_eq!(draft.variant, LinkTypeVariant::Dirs);

        // 失败时不重置
        host.fail_link.store(true, Ordering::SeqCst);
        store.set_source_paths(vec!["/b".into()]);
        assert!(store.create_link().await.is_err());
        assert_eq!(store.draft().source_paths, vec!["/b".to_string()]);
    }

    #[tokio::test]
    async fn test_concurrent_creates_each_refresh_once() {
        let (host, _dialog, store) = setup();
        *host.link_delay.lock() = Some(Duration::from_millis(20));
        let store = Arc::new(store);
        store.set_source_paths(vec!["/a".into()]);

        let first = tokio::spawn({
            let store = store.clone();
            async move { store.create_link().await }
        });
        let second = tokio::spawn({
            let store = store.clone();
            async move { store.create_link().await }
        });
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        assert_eq!(host.link_requests.lock().len(), 2);
        assert_eq!(host.reads(), 2);
        // 最后完成的刷新决定缓存内容
        assert_eq!(store.listing().len(), 2);
    }
}

// =============================================================================
// Listing and deletion
// =============================================================================

#[cfg(test)]
mod listing_tests {
    use super::*;

    #[tokio::test]
    async fn test_refresh_replaces_cache_wholesale() {
        let (_host, _dialog, store) = setup();

        store.refresh_listing().await.unwrap();
        let first = store.listing();
        assert_eq!(first.len(), 1);

        store.refresh_listing().await.unwrap();
        let second = store.listing();
        assert_eq!(second.len(), 2);
        assert!(second.iter().all(|r| r.id.starts_with("gen2-")));
        // 旧快照不受影响
        assert_eq!(first[0].id, "gen1-0");
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_cache() {
        let (host, _dialog, store) = setup();
        store.refresh_listing().await.unwrap();

        host.fail_read.store(true, Ordering::SeqCst);
        assert!(store.refresh_listing().await.is_err());
        assert_eq!(store.listing()[0].id, "gen1-0");
    }

    #[tokio::test]
    async fn test_fetch_children_is_never_cached() {
        let (host, _dialog, store) = setup();

        let without = store.fetch_children("abc", false).await.unwrap();
        assert!(without.record.is_none());
        let with = store.fetch_children("abc", true).await.unwrap();
        assert_eq!(with.record.unwrap().id, "abc");
        assert_eq!(with.files.len(), 1);

        assert_eq!(host.read_files_calls.load(Ordering::SeqCst), 2);
        assert_eq!(host.reads(), 0);
    }

    #[tokio::test]
    async fn test_delete_refreshes_once_on_success_and_failure() {
        let (host, _dialog, store) = setup();

        store.delete_links(&[record("a"), record("b")]).await.unwrap();
        assert_eq!(host.reads(), 1);
        assert_eq!(host.removed.lock()[0].len(), 2);

        host.fail_remove.store(true, Ordering::SeqCst);
        let err = store.delete_links(&[record("c")]).await.unwrap_err();
        assert!(matches!(err, LinkerError::FileOperation(_)));
        assert_eq!(host.reads(), 2);
        assert_eq!(store.listing().len(), 2);
    }
}
