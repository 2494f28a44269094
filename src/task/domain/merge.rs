//! Reconciliation of freshly extracted drafts with persisted tasks.

use super::{ExtractedTask, ProvenanceKey, Task};
use mockable::Clock;
use std::collections::{HashMap, HashSet};

/// What to do with stored tasks whose provenance key is absent from a
/// complete extraction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StaleTaskPolicy {
    /// Leave them untouched.
    #[default]
    Retain,
    /// Cancel them unless they are already terminal.
    Cancel,
}

/// Result of merging an extraction into a task collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Full merged collection in store order.
    pub tasks: Vec<Task>,
    /// Number of tasks created for previously unseen provenance keys.
    pub created: usize,
    /// Number of existing tasks whose content changed.
    pub updated: usize,
    /// Number of stored tasks with no matching draft.
    pub stale: usize,
}

/// Merges `extracted` into `existing`.
///
/// Existing tasks keep their position and identifier; new tasks are
/// appended in extraction order with status `todo`. Content-owned fields of
/// matched tasks are refreshed and operator-owned fields are preserved.
/// Tasks with no matching draft are handled according to `policy`.
#[must_use]
pub fn reconcile(
    existing: Vec<Task>,
    extracted: &[ExtractedTask],
    policy: StaleTaskPolicy,
    clock: &impl Clock,
) -> MergeOutcome {
    let mut tasks = existing;
    let mut index: HashMap<ProvenanceKey, usize> = tasks
        .iter()
        .enumerate()
        .map(|(position, task)| (*task.source(), position))
        .collect();
    let mut seen: HashSet<ProvenanceKey> = HashSet::with_capacity(extracted.len());
    let mut created = 0;
    let mut updated = 0;

    for item in extracted {
        let key = *item.provenance();
        seen.insert(key);
        if let Some(task) = index.get(&key).and_then(|&position| tasks.get_mut(position)) {
            if task.refresh_content(item, clock) {
                updated += 1;
            }
            continue;
        }
        index.insert(key, tasks.len());
        tasks.push(Task::new_from_extraction(item, clock));
        created += 1;
    }

    let mut stale = 0;
    for task in tasks.iter_mut().filter(|task| !seen.contains(task.source())) {
        stale += 1;
        if policy == StaleTaskPolicy::Cancel {
            task.cancel_as_stale(clock);
        }
    }

    MergeOutcome {
        tasks,
        created,
        updated,
        stale,
    }
}
