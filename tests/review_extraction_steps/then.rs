//! Then steps for review extraction BDD scenarios.

use super::world::{ExtractionWorld, run_async};
use eyre::WrapErr;
use reviewtask::{
    extraction::services::{PipelineError, PipelineOutcome},
    review::domain::{CommentId, ReviewId},
    task::{
        domain::{Priority, Task, TaskStatus},
        services::{RecommendationService, ThreadStatusService},
    },
};
use rstest_bdd_macros::then;
use std::sync::Arc;

fn stored_tasks(world: &ExtractionWorld) -> Result<Vec<Task>, eyre::Report> {
    let target = world.target()?;
    run_async(world.pipeline().tasks().list(target)).wrap_err("list tasks")
}

fn last_outcome(world: &ExtractionWorld) -> Result<&PipelineOutcome, eyre::Report> {
    match world.last_result.as_ref() {
        Some(Ok(outcome)) => Ok(outcome),
        Some(Err(PipelineError::Incomplete { outcome, .. })) => Ok(outcome.as_ref()),
        Some(Err(err)) => Err(eyre::eyre!("last run failed: {err}")),
        None => Err(eyre::eyre!("no run recorded")),
    }
}

#[then("the store holds {count:usize} tasks")]
fn store_holds(world: &ExtractionWorld, count: usize) -> Result<(), eyre::Report> {
    let tasks = stored_tasks(world)?;
    eyre::ensure!(tasks.len() == count, "expected {count} tasks, found {}", tasks.len());
    Ok(())
}

#[then(r#"every task has status "{status}""#)]
fn every_task_has_status(world: &ExtractionWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let tasks = stored_tasks(world)?;
    eyre::ensure!(
        tasks.iter().all(|task| task.status() == expected),
        "not every task is {expected}"
    );
    Ok(())
}

#[then(r#"task {index:u32} of comment {id:u64} has status "{status}""#)]
fn task_has_status(
    world: &ExtractionWorld,
    index: u32,
    id: u64,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let tasks = stored_tasks(world)?;
    let task = tasks
        .iter()
        .find(|task| task.source().comment_id.value() == id && task.source().task_index == index)
        .ok_or_else(|| eyre::eyre!("no task {index} for comment {id}"))?;
    eyre::ensure!(
        task.status() == expected,
        "expected {expected}, found {}",
        task.status()
    );
    Ok(())
}

#[then(r#"the next task is "{priority}" from comment {id:u64} index {index:u32}"#)]
fn next_task_is(
    world: &ExtractionWorld,
    priority: String,
    id: u64,
    index: u32,
) -> Result<(), eyre::Report> {
    let expected = Priority::try_from(priority.as_str())
        .map_err(|err| eyre::eyre!("invalid priority in scenario: {err}"))?;
    let target = world.target()?;
    let recommendation =
        run_async(RecommendationService::new(Arc::clone(&world.repository)).recommend(target))
            .wrap_err("recommend")?;
    let next = recommendation
        .next
        .ok_or_else(|| eyre::eyre!("no next task recommended"))?;
    eyre::ensure!(next.priority() == expected, "next task is {}", next.priority());
    eyre::ensure!(next.source().comment_id.value() == id);
    eyre::ensure!(next.source().task_index == index);
    Ok(())
}

#[then("the analysis service was called {count:usize} times")]
fn analysis_called(world: &ExtractionWorld, count: usize) -> Result<(), eyre::Report> {
    let calls = world.analysis.invocations();
    eyre::ensure!(calls == count, "expected {count} calls, found {calls}");
    Ok(())
}

#[then("the run created {count:usize} tasks")]
fn run_created(world: &ExtractionWorld, count: usize) -> Result<(), eyre::Report> {
    let created = last_outcome(world)?.merge.created;
    eyre::ensure!(created == count, "expected {count} created, found {created}");
    Ok(())
}

#[then("the run stopped after {processed:usize} of {total:usize} comments")]
fn run_stopped(
    world: &ExtractionWorld,
    processed: usize,
    total: usize,
) -> Result<(), eyre::Report> {
    let Some(Err(PipelineError::Incomplete { outcome, .. })) = world.last_result.as_ref() else {
        return Err(eyre::eyre!("expected an incomplete run"));
    };
    eyre::ensure!(outcome.progress.processed == processed);
    eyre::ensure!(outcome.progress.total == total);
    Ok(())
}

#[then("the analysis service analysed comments {ids}")]
fn analysed_comments(world: &ExtractionWorld, ids: String) -> Result<(), eyre::Report> {
    let expected = ids
        .split(',')
        .map(|id| id.trim().parse::<u64>().map(CommentId::new))
        .collect::<Result<Vec<_>, _>>()
        .wrap_err("comment ids in scenario")?;
    let analysed = world.analysis.analyzed_comments();
    eyre::ensure!(analysed == expected, "analysed {analysed:?}");
    Ok(())
}

fn thread_eligibility(world: &ExtractionWorld, id: u64) -> Result<bool, eyre::Report> {
    let target = world.target()?;
    let completion = run_async(
        ThreadStatusService::new(Arc::clone(&world.repository)).thread_status(
            target,
            ReviewId::new(1),
            CommentId::new(id),
        ),
    )
    .wrap_err("thread status")?;
    Ok(completion.is_resolved_eligible())
}

#[then("the thread of comment {id:u64} is resolvable")]
fn thread_resolvable(world: &ExtractionWorld, id: u64) -> Result<(), eyre::Report> {
    eyre::ensure!(thread_eligibility(world, id)?, "thread {id} is not resolvable");
    Ok(())
}

#[then("the thread of comment {id:u64} is not resolvable")]
fn thread_not_resolvable(world: &ExtractionWorld, id: u64) -> Result<(), eyre::Report> {
    eyre::ensure!(!thread_eligibility(world, id)?, "thread {id} is resolvable");
    Ok(())
}
