//! Persistent data model.
//!
//! The whole application state is one value: an ordered list of members and
//! an ordered list of tasks. Views never hold their own copy; they are
//! projected from this struct on every render.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A household member who can be assigned to tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
}

/// A chore record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: String,
    /// Member ids in assignment order; duplicates are not removed
    #[serde(default)]
    pub participants: Vec<String>,
}

impl Task {
    pub fn has_participant(&self, member_id: &str) -> bool {
        self.participants.iter().any(|id| id == member_id)
    }
}

/// Everything that gets persisted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl AppState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.tasks.is_empty()
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|member| member.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Number of tasks the member takes part in
    pub fn task_count_for(&self, member_id: &str) -> usize {
        self.tasks
            .iter()
            .filter(|task| task.has_participant(member_id))
            .count()
    }
}

/// Input for creating a task
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub date: Option<NaiveDate>,
    pub notes: String,
    pub participants: Vec<String>,
}
