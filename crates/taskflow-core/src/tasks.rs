use chrono::{DateTime, Utc};
use clap::ValueEnum;
use tracing::debug;
use uuid::Uuid;

use crate::task::{Priority, Task};

/// Status dimension of the list view. Transient view state, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

/// Derived counters over the whole collection, ignoring the active view
/// filters. `high_priority` counts only incomplete high-priority tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    pub high_priority: usize,
}

/// Owned, single-threaded container for the task collection plus the
/// transient view state (status filter and search text).
///
/// The collection keeps insertion order with the newest task first; no
/// operation here reorders it. Mutations are purely in-memory — the caller
/// decides when to hand the collection to [`crate::store::Store::save`],
/// which keeps persistence an explicit step rather than a hidden side
/// effect of every change.
#[derive(Debug, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
    filter: StatusFilter,
    search: String,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            filter: StatusFilter::All,
            search: String::new(),
        }
    }

    /// The full collection in storage order, for persistence and stats.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Creates a task at the front of the collection and returns its id.
    ///
    /// The title is trimmed first; an empty or whitespace-only title is
    /// rejected here and the collection is left untouched — validation lives
    /// in the container, not only at the input surface, so the invariant
    /// "no empty titles" holds no matter who calls.
    pub fn add(
        &mut self,
        title: &str,
        description: &str,
        priority: Priority,
        now: DateTime<Utc>,
    ) -> Option<Uuid> {
        let title = title.trim();
        if title.is_empty() {
            debug!("rejected task with empty title");
            return None;
        }

        let task = Task::new(title.to_string(), description.to_string(), priority, now);
        let id = task.id;
        self.tasks.insert(0, task);
        debug!(%id, count = self.tasks.len(), "added task");
        Some(id)
    }

    /// Flips `completed` on the matching task, keeping `completed_at`
    /// present exactly while the task is completed. Returns false when no
    /// task matches; absence is not exceptional.
    pub fn toggle(&mut self, id: Uuid, now: DateTime<Utc>) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!(%id, "toggle: no such task");
            return false;
        };

        task.completed = !task.completed;
        task.completed_at = task.completed.then_some(now);
        debug!(%id, completed = task.completed, "toggled task");
        true
    }

    /// Removes the matching task. Returns false when no task matches.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() < before;
        debug!(%id, removed, "removed task");
        removed
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// The current view: status filter first, then a case-insensitive
    /// substring match of the trimmed search text against title and
    /// description. Recomputed on every call; collection order is preserved.
    pub fn filtered(&self) -> Vec<&Task> {
        let query = self.search.trim().to_lowercase();

        self.tasks
            .iter()
            .filter(|task| match self.filter {
                StatusFilter::All => true,
                StatusFilter::Active => !task.completed,
                StatusFilter::Completed => task.completed,
            })
            .filter(|task| {
                query.is_empty()
                    || task.title.to_lowercase().contains(&query)
                    || task.description.to_lowercase().contains(&query)
            })
            .collect()
    }

    pub fn stats(&self) -> Stats {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        let high_priority = self
            .tasks
            .iter()
            .filter(|t| t.priority == Priority::High && !t.completed)
            .count();

        Stats {
            total,
            completed,
            active: total - completed,
            high_priority,
        }
    }
}
