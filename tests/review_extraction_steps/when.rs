//! When steps for review extraction BDD scenarios.

use super::world::{ExtractionWorld, run_async};
use eyre::WrapErr;
use reviewtask::task::services::TransitionTaskRequest;
use rstest_bdd_macros::when;

/// Transitions the `index`-th task of comment `id` to `status`.
pub fn move_task(
    world: &mut ExtractionWorld,
    index: u32,
    id: u64,
    status: &str,
) -> Result<(), eyre::Report> {
    let target = world.target()?;
    let pipeline = world.pipeline();
    let tasks = run_async(pipeline.tasks().list(target)).wrap_err("list tasks")?;
    let task = tasks
        .iter()
        .find(|task| task.source().comment_id.value() == id && task.source().task_index == index)
        .ok_or_else(|| eyre::eyre!("no task {index} for comment {id}"))?;
    let request = TransitionTaskRequest::new(target, task.id(), status);
    run_async(pipeline.tasks().transition(request)).wrap_err("transition task")?;
    Ok(())
}

#[when("I extract and merge the comments")]
fn extract_and_merge(world: &mut ExtractionWorld) -> Result<(), eyre::Report> {
    world.extract_and_merge()
}

#[when("the analysis service recovers")]
fn analysis_recovers(world: &mut ExtractionWorld) {
    world.analysis.recover();
}

#[when(r#"task {index:u32} of comment {id:u64} is moved to "{status}""#)]
fn task_is_moved(
    world: &mut ExtractionWorld,
    index: u32,
    id: u64,
    status: String,
) -> Result<(), eyre::Report> {
    move_task(world, index, id, &status)
}
