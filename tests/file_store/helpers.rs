//! Shared fixtures for file-backed store tests.

use camino::Utf8PathBuf;
use mockable::DefaultClock;
use reviewtask::{
    extraction::{
        adapters::{DocumentCacheStore, DocumentCheckpointStore, ScriptedAnalysisService},
        domain::ExtractionConfig,
        services::ExtractionPipeline,
    },
    review::domain::{CommentId, ReviewComment, ReviewId, TargetId},
    storage::adapters::FileDocumentStore,
    task::adapters::DocumentTaskRepository,
};
use rstest::fixture;
use std::sync::Arc;
use tempfile::TempDir;

/// Pipeline over the filesystem store.
pub type FilePipeline = ExtractionPipeline<
    ScriptedAnalysisService,
    DocumentCacheStore<FileDocumentStore>,
    DocumentCheckpointStore<FileDocumentStore>,
    DocumentTaskRepository<FileDocumentStore>,
    DefaultClock,
>;

/// Temporary data directory that outlives individual store handles.
pub struct Workspace {
    _dir: TempDir,
    pub root: Utf8PathBuf,
}

impl Workspace {
    /// Opens a fresh store handle, as a new process would.
    pub fn open(&self) -> Arc<FileDocumentStore> {
        Arc::new(FileDocumentStore::open(&self.root).expect("store should open"))
    }

    /// Builds a pipeline over a fresh store handle.
    pub fn pipeline(
        &self,
        analysis: &Arc<ScriptedAnalysisService>,
        config: ExtractionConfig,
    ) -> FilePipeline {
        let store = self.open();
        ExtractionPipeline::new(
            Arc::clone(analysis),
            Arc::new(DocumentCacheStore::new(Arc::clone(&store))),
            Arc::new(DocumentCheckpointStore::new(Arc::clone(&store))),
            Arc::new(DocumentTaskRepository::new(store)),
            Arc::new(DefaultClock),
            config,
        )
    }
}

/// Fixture providing an empty data directory.
#[fixture]
pub fn workspace() -> Workspace {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().join("data")).expect("utf-8 temp path");
    Workspace { _dir: dir, root }
}

/// Target used throughout these tests.
pub fn target() -> TargetId {
    TargetId::new(42).expect("valid target")
}

/// Comments numbered `1..=count`.
pub fn comments(count: u64) -> Vec<ReviewComment> {
    (1..=count)
        .map(|id| {
            ReviewComment::new(
                CommentId::new(id),
                ReviewId::new(1),
                "reviewer",
                format!("Please fix issue {id}"),
            )
            .with_location("src/main.rs", u32::try_from(id).ok())
        })
        .collect()
}
