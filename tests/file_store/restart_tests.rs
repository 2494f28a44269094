//! Cache and checkpoint reuse across process restarts.

use super::helpers::{Workspace, comments, target, workspace};
use reviewtask::extraction::{
    adapters::ScriptedAnalysisService,
    domain::{AnalysisError, ExtractionConfig},
    services::PipelineError,
};
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cache_survives_a_restart(workspace: Workspace) {
    let analysis = Arc::new(ScriptedAnalysisService::new());
    let input = comments(3);
    workspace
        .pipeline(&analysis, ExtractionConfig::immediate())
        .extract_and_merge(target(), &input, false)
        .await
        .expect("first run should succeed");

    let rerun = workspace
        .pipeline(&analysis, ExtractionConfig::immediate())
        .extract_and_merge(target(), &input, false)
        .await
        .expect("rerun should succeed");

    assert_eq!(analysis.invocations(), 1);
    assert_eq!(rerun.cache_hits, 3);
    assert_eq!(rerun.merge.created, 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn interrupted_run_resumes_after_a_restart(workspace: Workspace) {
    let config = ExtractionConfig::immediate()
        .with_batch_size(2)
        .with_single_batch_limit(0);
    let input = comments(6);
    let crashed = Arc::new(ScriptedAnalysisService::new());
    crashed.fail_after(2, AnalysisError::TimedOut(std::time::Duration::from_secs(120)));

    let error = workspace
        .pipeline(&crashed, config)
        .extract_and_merge(target(), &input, false)
        .await
        .expect_err("run should stop early");
    assert!(matches!(error, PipelineError::Incomplete { .. }));
    let checkpoint = workspace.root.join("PR-42").join("checkpoint.json");
    assert!(checkpoint.is_file());

    let restarted = Arc::new(ScriptedAnalysisService::new());
    let resumed = workspace
        .pipeline(&restarted, config)
        .extract_and_merge(target(), &input, false)
        .await
        .expect("resumed run should succeed");

    assert_eq!(restarted.analyzed_comments().len(), 2);
    assert_eq!(resumed.cache_hits, 4);
    assert_eq!(resumed.merge.tasks.len(), 6);
    assert!(!checkpoint.exists());
}
