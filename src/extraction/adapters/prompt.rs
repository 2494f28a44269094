//! Prompt-driven analysis over a text completion backend.

use crate::extraction::{
    domain::{AnalysisError, MalformedExtraction},
    ports::{AnalysisResult, AnalysisService, CommentAnalysis, TextCompletion},
};
use crate::review::domain::{CommentId, ReviewComment, TargetId};
use crate::task::domain::{Priority, TaskDraft};
use async_trait::async_trait;
use minijinja::Environment;
use serde_json::{Map, Value, json};
use std::sync::Arc;

/// Default prompt sent to the completion backend.
pub const DEFAULT_PROMPT_TEMPLATE: &str = r#"You turn code review comments on pull request {{ target }} into actionable tasks.

For every comment below, list the concrete changes the reviewer is asking for.
A comment that asks for nothing yields an empty task list.
Priorities are one of: critical, high, medium, low.

Reply with JSON only, in this shape:
{"comments": [{"comment_id": <id>, "tasks": [{"description": "<task>", "priority": "<priority>"}]}]}

{% for comment in comments %}
--- comment {{ comment.comment_id }} by {{ comment.author }}{% if comment.file %} on {{ comment.file }}{% if comment.line %}:{{ comment.line }}{% endif %}{% endif %}
{{ comment.body }}
{% endfor %}"#;

/// Analysis service that renders a prompt and parses a JSON reply.
///
/// A reply with no parsable JSON object fails the whole batch as
/// [`AnalysisError::Unavailable`] so it is retried. Defects confined to one
/// comment's entry are reported as malformed for that comment only.
#[derive(Debug)]
pub struct PromptAnalysisService<B> {
    backend: Arc<B>,
    template: String,
}

impl<B: TextCompletion> PromptAnalysisService<B> {
    /// Creates a service using [`DEFAULT_PROMPT_TEMPLATE`].
    #[must_use]
    pub fn new(backend: Arc<B>) -> Self {
        Self::with_template(backend, DEFAULT_PROMPT_TEMPLATE)
    }

    /// Creates a service with a custom `minijinja` template.
    ///
    /// The template receives `target` and a `comments` list whose items
    /// carry `comment_id`, `author`, `body`, `file`, and `line`.
    #[must_use]
    pub fn with_template(backend: Arc<B>, template: impl Into<String>) -> Self {
        Self {
            backend,
            template: template.into(),
        }
    }

    /// Renders the prompt for one batch.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Rejected`] when the template fails to render.
    pub fn render_prompt(
        &self,
        target: TargetId,
        comments: &[ReviewComment],
    ) -> AnalysisResult<String> {
        let environment = Environment::new();
        environment
            .render_str(&self.template, build_prompt_context(target, comments))
            .map_err(|err| AnalysisError::Rejected(format!("prompt template failed: {err}")))
    }
}

#[async_trait]
impl<B: TextCompletion> AnalysisService for PromptAnalysisService<B> {
    async fn analyze(
        &self,
        target: TargetId,
        comments: &[ReviewComment],
    ) -> AnalysisResult<Vec<CommentAnalysis>> {
        let prompt = self.render_prompt(target, comments)?;
        let reply = self.backend.complete(prompt).await?;
        parse_reply(&reply)
    }
}

fn build_prompt_context(target: TargetId, comments: &[ReviewComment]) -> Map<String, Value> {
    let items: Vec<Value> = comments
        .iter()
        .map(|comment| {
            let location = comment.location();
            json!({
                "comment_id": comment.id().value(),
                "author": comment.author(),
                "body": comment.body(),
                "file": location.map(|loc| loc.file.clone()),
                "line": location.and_then(|loc| loc.line),
            })
        })
        .collect();
    let mut context = Map::new();
    context.insert("target".to_owned(), Value::from(target.value()));
    context.insert("comments".to_owned(), Value::Array(items));
    context
}

/// Parses a completion reply into per-comment outcomes.
///
/// The first JSON object in the reply that carries a `comments` array is
/// used; prose, code fences, and stray braces around it are ignored.
///
/// # Errors
///
/// Returns [`AnalysisError::Unavailable`] when the reply holds no JSON
/// object with a `comments` array.
pub fn parse_reply(reply: &str) -> AnalysisResult<Vec<CommentAnalysis>> {
    let entries = reply
        .match_indices('{')
        .find_map(|(start, _)| comments_at(reply, start))
        .ok_or_else(|| {
            AnalysisError::Unavailable(
                "reply held no JSON object with a comments array".to_owned(),
            )
        })?;
    Ok(entries.iter().filter_map(parse_entry).collect())
}

/// Reads one JSON value starting at byte `start` and returns its
/// `comments` array, if it is an object that has one.
fn comments_at(reply: &str, start: usize) -> Option<Vec<Value>> {
    let candidate = reply.get(start..)?;
    let value = serde_json::Deserializer::from_str(candidate)
        .into_iter::<Value>()
        .next()?
        .ok()?;
    let Value::Object(mut object) = value else {
        return None;
    };
    let Value::Array(entries) = object.remove("comments")? else {
        return None;
    };
    Some(entries)
}

fn parse_entry(entry: &Value) -> Option<CommentAnalysis> {
    let Some(raw_id) = entry.get("comment_id").and_then(Value::as_u64) else {
        tracing::warn!(entry = %entry, "dropping reply entry without a comment id");
        return None;
    };
    let comment_id = CommentId::new(raw_id);
    Some(parse_tasks(entry.get("tasks")).map_or_else(
        |reason| CommentAnalysis::Malformed(MalformedExtraction::new(comment_id, reason)),
        |drafts| CommentAnalysis::Extracted { comment_id, drafts },
    ))
}

fn parse_tasks(tasks: Option<&Value>) -> Result<Vec<TaskDraft>, String> {
    let items = tasks
        .and_then(Value::as_array)
        .ok_or_else(|| "tasks is missing or not a list".to_owned())?;
    items.iter().map(parse_task).collect()
}

fn parse_task(task: &Value) -> Result<TaskDraft, String> {
    let description = task
        .get("description")
        .and_then(Value::as_str)
        .ok_or_else(|| "task has no description".to_owned())?;
    let priority_text = task
        .get("priority")
        .and_then(Value::as_str)
        .ok_or_else(|| "task has no priority".to_owned())?;
    let priority = Priority::try_from(priority_text).map_err(|err| err.to_string())?;
    TaskDraft::new(description, priority).map_err(|err| err.to_string())
}
