//! Unit tests for task services over the in-memory document store.

use super::{comment, draft, extracted, stored_task, target};
use crate::review::domain::{CommentId, ReviewId};
use crate::storage::adapters::InMemoryDocumentStore;
use crate::storage::domain::DocumentKey;
use crate::task::{
    adapters::DocumentTaskRepository,
    domain::{
        ImplementationStatus, Priority, StaleTaskPolicy, TaskDomainError, TaskId, TaskStatus,
        VerificationResult, VerificationStatus,
    },
    ports::{TaskRepository, TaskRepositoryError},
    services::{
        RecommendationService, TaskLifecycleError, TaskLifecycleService, ThreadStatusService,
        TransitionTaskRequest,
    },
};
use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};
use std::sync::Arc;

type TestRepository = DocumentTaskRepository<InMemoryDocumentStore>;

struct Harness {
    store: Arc<InMemoryDocumentStore>,
    repository: Arc<TestRepository>,
    lifecycle: TaskLifecycleService<TestRepository, DefaultClock>,
}

#[fixture]
fn harness() -> Harness {
    let store = Arc::new(InMemoryDocumentStore::new());
    let repository = Arc::new(DocumentTaskRepository::new(Arc::clone(&store)));
    let lifecycle = TaskLifecycleService::new(Arc::clone(&repository), Arc::new(DefaultClock));
    Harness {
        store,
        repository,
        lifecycle,
    }
}

async fn seed_single_task(harness: &Harness) -> TaskId {
    let items = extracted(&comment(1, "Fix it"), &[draft("Fix the bug", Priority::High)]);
    let outcome = harness
        .lifecycle
        .merge(target(), &items, StaleTaskPolicy::Retain)
        .await
        .expect("merge should succeed");
    outcome.tasks.first().expect("one task").id()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transition_persists_new_status(harness: Harness) {
    let task_id = seed_single_task(&harness).await;

    let updated = harness
        .lifecycle
        .transition(TransitionTaskRequest::new(target(), task_id, "doing"))
        .await
        .expect("transition should succeed");
    let stored = harness
        .lifecycle
        .find(target(), task_id)
        .await
        .expect("lookup should succeed")
        .expect("task should exist");

    assert_eq!(updated.status(), TaskStatus::Doing);
    assert_eq!(stored, updated);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_status_string_is_rejected(harness: Harness) {
    let task_id = seed_single_task(&harness).await;

    let result = harness
        .lifecycle
        .transition(TransitionTaskRequest::new(target(), task_id, "in_review"))
        .await;

    assert!(matches!(result, Err(TaskLifecycleError::InvalidStatus(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn illegal_transition_is_rejected_and_not_persisted(harness: Harness) {
    let task_id = seed_single_task(&harness).await;

    let result = harness
        .lifecycle
        .transition(TransitionTaskRequest::new(target(), task_id, "done"))
        .await;
    let stored = harness
        .lifecycle
        .find(target(), task_id)
        .await
        .expect("lookup should succeed")
        .expect("task should exist");

    assert!(matches!(
        result,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::InvalidStatusTransition { .. }
        ))
    ));
    assert_eq!(stored.status(), TaskStatus::Todo);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transition_of_unknown_task_returns_not_found(harness: Harness) {
    let result = harness
        .lifecycle
        .transition(TransitionTaskRequest::new(target(), TaskId::new(), "doing"))
        .await;

    assert!(matches!(result, Err(TaskLifecycleError::NotFound { .. })));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn verification_and_implementation_updates_are_recorded(harness: Harness) {
    let task_id = seed_single_task(&harness).await;
    let clock = DefaultClock;

    harness
        .lifecycle
        .set_implementation_status(target(), task_id, ImplementationStatus::Implemented)
        .await
        .expect("implementation update should succeed");
    let verified = harness
        .lifecycle
        .record_verification(
            target(),
            task_id,
            VerificationResult::passed(clock.utc(), vec!["build".to_owned(), "test".to_owned()]),
        )
        .await
        .expect("verification should succeed");

    assert_eq!(
        verified.implementation_status(),
        ImplementationStatus::Implemented
    );
    assert_eq!(verified.verification_status(), VerificationStatus::Verified);
    assert_eq!(verified.verification_history().len(), 1);
    assert!(verified.last_verified_at().is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_save_leaves_stored_collection_untouched(harness: Harness) {
    let task_id = seed_single_task(&harness).await;
    harness
        .store
        .fail_writes_to(DocumentKey::Tasks(target()))
        .expect("inject failure");

    let result = harness
        .lifecycle
        .transition(TransitionTaskRequest::new(target(), task_id, "doing"))
        .await;
    let stored = harness
        .lifecycle
        .find(target(), task_id)
        .await
        .expect("lookup should succeed")
        .expect("task should exist");

    assert!(matches!(result, Err(TaskLifecycleError::Repository(_))));
    assert_eq!(stored.status(), TaskStatus::Todo);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repository_rejects_duplicate_provenance(harness: Harness) {
    let tasks = vec![
        stored_task(1, 0, Priority::Low, TaskStatus::Todo),
        stored_task(1, 0, Priority::High, TaskStatus::Todo),
    ];

    let result = harness.repository.save(target(), &tasks).await;

    assert!(matches!(
        result,
        Err(TaskRepositoryError::DuplicateProvenance(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn queries_read_through_the_repository(harness: Harness) {
    let mut items = extracted(&comment(1, "A"), &[draft("High item", Priority::High)]);
    items.extend(extracted(
        &comment(2, "B"),
        &[
            draft("Critical item", Priority::Critical),
            draft("Low item", Priority::Low),
        ],
    ));
    harness
        .lifecycle
        .merge(target(), &items, StaleTaskPolicy::Retain)
        .await
        .expect("merge should succeed");
    let recommendations = RecommendationService::new(Arc::clone(&harness.repository));
    let threads = ThreadStatusService::new(Arc::clone(&harness.repository));

    let recommendation = recommendations
        .recommend(target())
        .await
        .expect("recommend should succeed");
    let completion = threads
        .thread_status(target(), ReviewId::new(7), CommentId::new(2))
        .await
        .expect("thread status should succeed");

    let next = recommendation.next.expect("next task");
    assert_eq!(next.priority(), Priority::Critical);
    assert_eq!(next.source().comment_id, CommentId::new(2));
    assert_eq!(next.source().task_index, 0);
    assert_eq!(completion.total, 2);
    assert!(!completion.is_resolved_eligible());
}
