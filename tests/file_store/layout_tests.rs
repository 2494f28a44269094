//! On-disk layout and reopen behaviour.

use super::helpers::{Workspace, comments, target, workspace};
use reviewtask::extraction::{adapters::ScriptedAnalysisService, domain::ExtractionConfig};
use reviewtask::storage::ports::DocumentStore;
use reviewtask::task::services::TransitionTaskRequest;
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_and_cache_land_under_the_target_directory(workspace: Workspace) {
    let analysis = Arc::new(ScriptedAnalysisService::new());
    let pipeline = workspace.pipeline(&analysis, ExtractionConfig::immediate());

    pipeline
        .extract_and_merge(target(), &comments(2), false)
        .await
        .expect("run should succeed");

    let target_dir = workspace.root.join("PR-42");
    assert!(target_dir.join("tasks.json").is_file());
    assert!(target_dir.join("cache.json").is_file());
    assert!(!target_dir.join("checkpoint.json").exists());
    let raw = std::fs::read_to_string(target_dir.join("tasks.json")).expect("readable tasks");
    let parsed: serde_json::Value = serde_json::from_str(&raw).expect("tasks are JSON");
    assert_eq!(parsed.as_array().map(Vec::len), Some(2));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reopened_store_sees_operator_changes(workspace: Workspace) {
    let analysis = Arc::new(ScriptedAnalysisService::new());
    let first = workspace.pipeline(&analysis, ExtractionConfig::immediate());
    let outcome = first
        .extract_and_merge(target(), &comments(1), false)
        .await
        .expect("run should succeed");
    let task_id = outcome.merge.tasks.first().expect("one task").id();
    first
        .tasks()
        .transition(TransitionTaskRequest::new(target(), task_id, "doing"))
        .await
        .expect("transition should succeed");

    let reopened = workspace.pipeline(&analysis, ExtractionConfig::immediate());
    let task = reopened
        .tasks()
        .find(target(), task_id)
        .await
        .expect("lookup should succeed")
        .expect("task should persist");

    assert_eq!(task.status().as_str(), "doing");
    let targets = workspace
        .open()
        .list_targets()
        .await
        .expect("targets should list");
    assert_eq!(targets, vec![target()]);
}
