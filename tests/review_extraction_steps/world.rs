//! Shared world state for review extraction BDD scenarios.

use std::collections::BTreeMap;
use std::sync::Arc;

use mockable::DefaultClock;
use reviewtask::{
    extraction::{
        adapters::{DocumentCacheStore, DocumentCheckpointStore, ScriptedAnalysisService},
        domain::ExtractionConfig,
        services::{ExtractionPipeline, PipelineOutcome, PipelineResult},
    },
    review::domain::{CommentId, ReviewComment, ReviewId, TargetId},
    storage::adapters::InMemoryDocumentStore,
    task::{adapters::DocumentTaskRepository, domain::TaskDraft},
};
use rstest::fixture;

/// Repository type used by the BDD world.
pub type TestRepository = DocumentTaskRepository<InMemoryDocumentStore>;

/// Pipeline type used by the BDD world.
pub type TestPipeline = ExtractionPipeline<
    ScriptedAnalysisService,
    DocumentCacheStore<InMemoryDocumentStore>,
    DocumentCheckpointStore<InMemoryDocumentStore>,
    TestRepository,
    DefaultClock,
>;

/// Scenario world for review extraction behaviour tests.
pub struct ExtractionWorld {
    pub store: Arc<InMemoryDocumentStore>,
    pub analysis: Arc<ScriptedAnalysisService>,
    pub repository: Arc<TestRepository>,
    pub config: ExtractionConfig,
    pub target: Option<TargetId>,
    pub comments: Vec<ReviewComment>,
    pub drafts: BTreeMap<u64, Vec<TaskDraft>>,
    pub last_result: Option<PipelineResult<PipelineOutcome>>,
}

impl ExtractionWorld {
    /// Creates a world over an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryDocumentStore::new());
        Self {
            analysis: Arc::new(ScriptedAnalysisService::new()),
            repository: Arc::new(DocumentTaskRepository::new(Arc::clone(&store))),
            store,
            config: ExtractionConfig::immediate(),
            target: None,
            comments: Vec::new(),
            drafts: BTreeMap::new(),
            last_result: None,
        }
    }

    /// Builds a pipeline over the world's shared store and analysis fake.
    #[must_use]
    pub fn pipeline(&self) -> TestPipeline {
        ExtractionPipeline::new(
            Arc::clone(&self.analysis),
            Arc::new(DocumentCacheStore::new(Arc::clone(&self.store))),
            Arc::new(DocumentCheckpointStore::new(Arc::clone(&self.store))),
            Arc::clone(&self.repository),
            Arc::new(DefaultClock),
            self.config,
        )
    }

    /// Returns the scenario's target.
    pub fn target(&self) -> Result<TargetId, eyre::Report> {
        self.target
            .ok_or_else(|| eyre::eyre!("missing review target in scenario world"))
    }

    /// Adds a comment on review 1 anchored to `src/lib.rs`.
    pub fn add_comment(&mut self, id: u64, body: &str) {
        let line = u32::try_from(id).ok();
        self.comments.push(
            ReviewComment::new(CommentId::new(id), ReviewId::new(1), "reviewer", body)
                .with_location("src/lib.rs", line),
        );
    }

    /// Runs the pipeline over the world's comments and records the result.
    pub fn extract_and_merge(&mut self) -> Result<(), eyre::Report> {
        let target = self.target()?;
        let pipeline = self.pipeline();
        let result = run_async(pipeline.extract_and_merge(target, &self.comments, false));
        self.last_result = Some(result);
        Ok(())
    }
}

impl Default for ExtractionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ExtractionWorld {
    ExtractionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
