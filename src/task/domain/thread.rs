//! Completion tracking for source comment threads.

use super::{Task, ThreadKey};

/// Completion state of one source comment thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadCompletion {
    /// Tasks from the thread in `done` or `cancel`.
    pub completed: usize,
    /// All tasks from the thread.
    pub total: usize,
}

impl ThreadCompletion {
    /// Tallies the tasks belonging to `thread`.
    #[must_use]
    pub fn for_thread(tasks: &[Task], thread: ThreadKey) -> Self {
        tasks
            .iter()
            .filter(|task| task.source().thread() == thread)
            .fold(Self::default(), |mut completion, task| {
                completion.total += 1;
                if task.status().is_terminal() {
                    completion.completed += 1;
                }
                completion
            })
    }

    /// Returns whether the thread may be resolved on the platform.
    ///
    /// A thread with no tasks is never eligible.
    #[must_use]
    pub const fn is_resolved_eligible(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Returns the threads whose tasks are all terminal, in store order of
/// their first task.
#[must_use]
pub fn resolvable_threads(tasks: &[Task]) -> Vec<ThreadKey> {
    let mut threads: Vec<ThreadKey> = Vec::new();
    for task in tasks {
        let thread = task.source().thread();
        if !threads.contains(&thread) {
            threads.push(thread);
        }
    }
    threads.retain(|&thread| ThreadCompletion::for_thread(tasks, thread).is_resolved_eligible());
    threads
}
