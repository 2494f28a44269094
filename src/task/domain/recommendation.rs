//! Current/next task recommendation over a task collection.

use super::{Task, TaskStatus};

/// Count of tasks per workflow status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    /// Tasks with status `todo`.
    pub todo: usize,
    /// Tasks with status `doing`.
    pub doing: usize,
    /// Tasks with status `pending`.
    pub pending: usize,
    /// Tasks with status `done`.
    pub done: usize,
    /// Tasks with status `cancel`.
    pub cancel: usize,
}

impl TaskStats {
    /// Tallies a task collection.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut stats, task| {
            match task.status() {
                TaskStatus::Todo => stats.todo += 1,
                TaskStatus::Doing => stats.doing += 1,
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::Done => stats.done += 1,
                TaskStatus::Cancel => stats.cancel += 1,
            }
            stats
        })
    }

    /// Returns the total number of tasks.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.todo + self.doing + self.pending + self.done + self.cancel
    }

    /// Returns the number of tasks in a terminal status.
    #[must_use]
    pub const fn finished(&self) -> usize {
        self.done + self.cancel
    }
}

/// Recommendation derived from a task collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    /// First task in store order with status `doing`.
    pub current: Option<Task>,
    /// Most urgent `todo` task; ties resolve to store order.
    pub next: Option<Task>,
    /// Status counts.
    pub stats: TaskStats,
}

impl Recommendation {
    /// Computes the recommendation for `tasks` (in store order).
    ///
    /// Having several `doing` tasks is legal; the first is reported.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let current = tasks
            .iter()
            .find(|task| task.status() == TaskStatus::Doing)
            .cloned();
        let next = tasks
            .iter()
            .filter(|task| task.status() == TaskStatus::Todo)
            .min_by_key(|task| task.priority().rank())
            .cloned();
        Self {
            current,
            next,
            stats: TaskStats::from_tasks(tasks),
        }
    }
}

/// Returns the `todo` tasks in recommended order.
///
/// Sorted by priority, most urgent first; the sort is stable so store order
/// breaks ties.
#[must_use]
pub fn todo_queue(tasks: &[Task]) -> Vec<&Task> {
    let mut queue: Vec<&Task> = tasks
        .iter()
        .filter(|task| task.status() == TaskStatus::Todo)
        .collect();
    queue.sort_by_key(|task| task.priority().rank());
    queue
}
