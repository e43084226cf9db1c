use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Priority of a task, fixed at creation. Declaration order doubles as the
/// fixed grouping order for list output: high before medium before low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High Priority",
            Priority::Medium => "Medium Priority",
            Priority::Low => "Low Priority",
        }
    }
}

/// A single task record.
///
/// The serde layout is the on-disk wire format: camelCase field names,
/// RFC 3339 timestamps, and `completedAt` omitted entirely while the task is
/// open. `completed_at` is `Some` if and only if `completed` is true; the
/// toggle path in [`crate::tasks::TaskList`] maintains that invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(title: String, description: String, priority: Priority, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            priority,
            completed: false,
            created_at: now,
            completed_at: None,
        }
    }

    /// First eight hex digits of the id, enough to address a personal-sized
    /// list unambiguously in CLI output.
    pub fn short_id(&self) -> String {
        let simple = self.id.simple().to_string();
        simple[..8].to_string()
    }
}
