//! Given steps for review extraction BDD scenarios.

use super::world::ExtractionWorld;
use eyre::WrapErr;
use reviewtask::{
    extraction::domain::AnalysisError,
    review::domain::{CommentId, TargetId},
    task::domain::{Priority, TaskDraft},
};
use rstest_bdd_macros::given;

#[given("review target {number:u64}")]
fn review_target(world: &mut ExtractionWorld, number: u64) -> Result<(), eyre::Report> {
    let target = TargetId::new(number).wrap_err("scenario target must be valid")?;
    world.target = Some(target);
    Ok(())
}

#[given(r#"comment {id:u64} says "{body}""#)]
fn comment_says(world: &mut ExtractionWorld, id: u64, body: String) {
    world.add_comment(id, &body);
}

#[given(r#"comment {id:u64} yields a "{priority}" task "{description}""#)]
fn comment_yields_task(
    world: &mut ExtractionWorld,
    id: u64,
    priority: String,
    description: String,
) -> Result<(), eyre::Report> {
    let parsed = Priority::try_from(priority.as_str())
        .map_err(|err| eyre::eyre!("invalid priority in scenario: {err}"))?;
    let draft = TaskDraft::new(description, parsed).wrap_err("scenario draft must be valid")?;
    let drafts = world.drafts.entry(id).or_default();
    drafts.push(draft);
    world.analysis.respond(CommentId::new(id), drafts.clone());
    Ok(())
}

#[given("extraction runs in batches of {size:usize}")]
fn extraction_batches(world: &mut ExtractionWorld, size: usize) {
    world.config = world
        .config
        .with_batch_size(size)
        .with_single_batch_limit(0);
}

#[given("the analysis service fails after {count:usize} successful calls")]
fn analysis_fails_after(world: &mut ExtractionWorld, count: usize) {
    world.analysis.fail_after(
        count,
        AnalysisError::Unavailable("backend overloaded".to_owned()),
    );
}

#[given("extraction has already run")]
fn extraction_has_run(world: &mut ExtractionWorld) -> Result<(), eyre::Report> {
    world.extract_and_merge()?;
    match world.last_result.take() {
        Some(Ok(_)) => Ok(()),
        Some(Err(err)) => Err(eyre::Report::new(err)).wrap_err("initial extraction failed"),
        None => Err(eyre::eyre!("initial extraction produced no result")),
    }
}

#[given(r#"task {index:u32} of comment {id:u64} is moved to "{status}""#)]
fn task_was_moved(
    world: &mut ExtractionWorld,
    index: u32,
    id: u64,
    status: String,
) -> Result<(), eyre::Report> {
    super::when::move_task(world, index, id, &status)
}
