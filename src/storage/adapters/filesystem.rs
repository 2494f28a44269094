//! Filesystem-backed document store.
//!
//! Documents are written below a root directory opened with `cap-std`, so
//! every path is resolved relative to that capability and cannot escape it.
//! Writes go to a sibling temporary file which is synced and then renamed
//! over the destination, which makes each `put` atomic. The containing
//! directory is synced after every rename, directory creation, and removal
//! so the change survives a crash once the call returns.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io::{ErrorKind, Write};
use std::sync::Arc;

use crate::review::domain::TargetId;
use crate::storage::{
    domain::DocumentKey,
    ports::{DocumentStore, StorageError, StorageResult},
};

/// Suffix for in-flight writes.
const TEMP_SUFFIX: &str = ".tmp";

/// Document store rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    root: Arc<Dir>,
    root_path: Utf8PathBuf,
}

impl FileDocumentStore {
    /// Opens (creating if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Persistence`] when the directory cannot be
    /// created or opened.
    pub fn open(root: impl AsRef<Utf8Path>) -> StorageResult<Self> {
        let root_path = root.as_ref().to_path_buf();
        std::fs::create_dir_all(root_path.as_std_path()).map_err(StorageError::persistence)?;
        let dir =
            Dir::open_ambient_dir(&root_path, ambient_authority()).map_err(StorageError::persistence)?;
        Ok(Self {
            root: Arc::new(dir),
            root_path,
        })
    }

    /// Returns the root directory path.
    #[must_use]
    pub fn root_path(&self) -> &Utf8Path {
        &self.root_path
    }
}

/// Runs a blocking filesystem operation off the async executor.
async fn run_blocking<F, T>(f: F) -> StorageResult<T>
where
    F: FnOnce() -> StorageResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(StorageError::persistence)?
}

fn read_document(dir: &Dir, key: DocumentKey) -> StorageResult<Option<Vec<u8>>> {
    match dir.read(key.relative_path()) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(StorageError::persistence(err)),
    }
}

/// Directory holding `path`, relative to the store root.
fn parent_of(path: &Utf8Path) -> &Utf8Path {
    path.parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."))
}

/// Flushes the entries of directory `path` to stable storage.
#[cfg(unix)]
fn sync_dir(dir: &Dir, path: &Utf8Path) -> StorageResult<()> {
    dir.open(path)
        .map_err(StorageError::persistence)?
        .sync_all()
        .map_err(StorageError::persistence)
}

/// No-op on platforms whose directory handles cannot be synced.
#[cfg(not(unix))]
fn sync_dir(_dir: &Dir, _path: &Utf8Path) -> StorageResult<()> {
    Ok(())
}

fn write_document(dir: &Dir, key: DocumentKey, contents: &[u8]) -> StorageResult<()> {
    let path = Utf8PathBuf::from(key.relative_path());
    let parent = parent_of(&path);
    if !dir.exists(parent) {
        dir.create_dir_all(parent).map_err(StorageError::persistence)?;
        sync_dir(dir, parent_of(parent))?;
    }

    let temp_path = Utf8PathBuf::from(format!("{path}{TEMP_SUFFIX}"));
    let mut file = dir.create(&temp_path).map_err(StorageError::persistence)?;
    file.write_all(contents).map_err(StorageError::persistence)?;
    file.sync_all().map_err(StorageError::persistence)?;
    drop(file);

    dir.rename(&temp_path, dir, &path)
        .map_err(StorageError::persistence)?;
    sync_dir(dir, parent)
}

fn delete_document(dir: &Dir, key: DocumentKey) -> StorageResult<bool> {
    let path = Utf8PathBuf::from(key.relative_path());
    match dir.remove_file(&path) {
        Ok(()) => {
            sync_dir(dir, parent_of(&path))?;
            Ok(true)
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(StorageError::persistence(err)),
    }
}

fn scan_targets(dir: &Dir) -> StorageResult<Vec<TargetId>> {
    let mut targets = Vec::new();
    for entry_result in dir.entries().map_err(StorageError::persistence)? {
        let entry = entry_result.map_err(StorageError::persistence)?;
        let is_dir = entry
            .file_type()
            .map_err(StorageError::persistence)?
            .is_dir();
        if !is_dir {
            continue;
        }
        let name = entry.file_name().map_err(StorageError::persistence)?;
        if let Ok(target) = TargetId::parse_storage_key(&name) {
            targets.push(target);
        }
    }
    targets.sort_unstable();
    Ok(targets)
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn get(&self, key: DocumentKey) -> StorageResult<Option<Vec<u8>>> {
        let dir = Arc::clone(&self.root);
        run_blocking(move || read_document(&dir, key)).await
    }

    async fn put(&self, key: DocumentKey, contents: Vec<u8>) -> StorageResult<()> {
        let dir = Arc::clone(&self.root);
        run_blocking(move || write_document(&dir, key, &contents)).await
    }

    async fn delete(&self, key: DocumentKey) -> StorageResult<bool> {
        let dir = Arc::clone(&self.root);
        run_blocking(move || delete_document(&dir, key)).await
    }

    async fn list_targets(&self) -> StorageResult<Vec<TargetId>> {
        let dir = Arc::clone(&self.root);
        run_blocking(move || scan_targets(&dir)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct TempStore {
        _dir: TempDir,
        store: FileDocumentStore,
    }

    #[fixture]
    fn temp_store() -> TempStore {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().join("store")).expect("utf-8 temp path");
        let store = FileDocumentStore::open(root).expect("open store");
        TempStore { _dir: dir, store }
    }

    fn target(value: u64) -> TargetId {
        TargetId::new(value).expect("valid target")
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn put_then_get_round_trips_bytes(temp_store: TempStore) {
        let key = DocumentKey::Checkpoint(target(3));

        temp_store
            .store
            .put(key, b"{\"processed\":1}".to_vec())
            .await
            .expect("put should succeed");
        let stored = temp_store.store.get(key).await.expect("get should succeed");

        assert_eq!(stored.as_deref(), Some(b"{\"processed\":1}".as_slice()));
        let leftover = temp_store
            .store
            .root_path()
            .join("PR-3/checkpoint.json.tmp");
        assert!(!leftover.as_std_path().exists());
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn missing_document_reads_as_none(temp_store: TempStore) {
        let stored = temp_store
            .store
            .get(DocumentKey::Tasks(target(8)))
            .await
            .expect("get should succeed");
        assert!(stored.is_none());
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn delete_reports_whether_document_existed(temp_store: TempStore) {
        let key = DocumentKey::Cache(target(4));
        temp_store
            .store
            .put(key, b"{}".to_vec())
            .await
            .expect("put should succeed");

        assert!(temp_store.store.delete(key).await.expect("first delete"));
        assert!(!temp_store.store.delete(key).await.expect("second delete"));
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn root_level_document_is_written_and_removed(temp_store: TempStore) {
        let key = DocumentKey::UpdateCheckState;

        temp_store
            .store
            .put(key, b"{\"last_checked\":null}".to_vec())
            .await
            .expect("put should succeed");
        let written = temp_store.store.root_path().join("update_check.json");
        assert!(written.as_std_path().exists());

        assert!(temp_store.store.delete(key).await.expect("delete should succeed"));
        assert!(!written.as_std_path().exists());
    }

    #[rstest]
    fn parent_of_root_level_path_is_the_root() {
        assert_eq!(parent_of(Utf8Path::new("update_check.json")), Utf8Path::new("."));
        assert_eq!(parent_of(Utf8Path::new("PR-3/tasks.json")), Utf8Path::new("PR-3"));
    }

    #[cfg(unix)]
    #[rstest]
    fn syncing_a_missing_directory_is_a_persistence_error(temp_store: TempStore) {
        assert!(sync_dir(&temp_store.store.root, Utf8Path::new(".")).is_ok());
        assert!(matches!(
            sync_dir(&temp_store.store.root, Utf8Path::new("PR-99")),
            Err(StorageError::Persistence(_))
        ));
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn list_targets_ignores_foreign_entries(temp_store: TempStore) {
        temp_store
            .store
            .put(DocumentKey::Tasks(target(12)), b"[]".to_vec())
            .await
            .expect("put tasks");
        temp_store
            .store
            .put(DocumentKey::Tasks(target(2)), b"[]".to_vec())
            .await
            .expect("put tasks");
        temp_store
            .store
            .put(DocumentKey::UpdateCheckState, b"{}".to_vec())
            .await
            .expect("put update state");
        std::fs::create_dir_all(temp_store.store.root_path().join("scratch").as_std_path())
            .expect("create foreign dir");

        let targets = temp_store
            .store
            .list_targets()
            .await
            .expect("list should succeed");

        assert_eq!(targets, vec![target(2), target(12)]);
    }
}
