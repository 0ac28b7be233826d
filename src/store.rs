//! State store
//!
//! `StateStore` owns the canonical `AppState`. All writes go through its
//! mutation methods; each mutation persists the full state through the
//! backend before returning. Persisting is fire-and-forget: a failed save is
//! logged and the in-memory state stays authoritative.

use crate::error::{Error, Result};
use crate::id;
use crate::model::{AppState, Member, NewTask, Task};
use crate::storage::StateBackend;

pub struct StateStore<B: StateBackend> {
    state: AppState,
    backend: B,
}

impl<B: StateBackend> StateStore<B> {
    /// Hydrate the store from its backend
    pub fn open(backend: B) -> Self {
        let state = backend.load();
        Self { state, backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn members(&self) -> &[Member] {
        &self.state.members
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn has_members(&self) -> bool {
        !self.state.members.is_empty()
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.state.member(id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.state.task(id)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Append a member with a trimmed name
    pub fn add_member(&mut self, name: &str) -> Result<Member> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyMemberName);
        }

        let member = Member {
            id: id::new_id(),
            name: name.to_string(),
        };
        self.state.members.push(member.clone());
        tracing::debug!(member_id = %member.id, "member added");
        self.persist();
        Ok(member)
    }

    /// Remove a member and drop its id from every task's participants
    ///
    /// Titles, dates and notes of the affected tasks are left untouched.
    pub fn remove_member(&mut self, member_id: &str) -> Option<Member> {
        let idx = self
            .state
            .members
            .iter()
            .position(|member| member.id == member_id)?;
        let removed = self.state.members.remove(idx);

        let mut touched = 0usize;
        for task in &mut self.state.tasks {
            let before = task.participants.len();
            task.participants.retain(|id| id != member_id);
            if task.participants.len() != before {
                touched += 1;
            }
        }

        tracing::debug!(member_id = %removed.id, tasks = touched, "member removed");
        self.persist();
        Some(removed)
    }

    /// Append a task
    ///
    /// Fails with `NoMembers` before any other check when the household is
    /// empty, then with `MissingTitleOrDate` for a blank title or no date.
    pub fn add_task(&mut self, input: NewTask) -> Result<Task> {
        if !self.has_members() {
            return Err(Error::NoMembers);
        }

        let title = input.title.trim();
        let Some(date) = input.date else {
            return Err(Error::MissingTitleOrDate);
        };
        if title.is_empty() {
            return Err(Error::MissingTitleOrDate);
        }

        let task = Task {
            id: id::new_id(),
            title: title.to_string(),
            date,
            notes: input.notes.trim().to_string(),
            participants: input.participants,
        };
        self.state.tasks.push(task.clone());
        tracing::debug!(task_id = %task.id, participants = task.participants.len(), "task added");
        self.persist();
        Ok(task)
    }

    /// Remove a task
    pub fn remove_task(&mut self, task_id: &str) -> Option<Task> {
        let idx = self
            .state
            .tasks
            .iter()
            .position(|task| task.id == task_id)?;
        let removed = self.state.tasks.remove(idx);
        tracing::debug!(task_id = %removed.id, "task removed");
        self.persist();
        Some(removed)
    }

    /// Replace the participants of a task
    ///
    /// Ids are taken as given. Ids without a member are kept and skipped
    /// when the task is displayed.
    pub fn set_task_participants(
        &mut self,
        task_id: &str,
        participants: Vec<String>,
    ) -> Option<&Task> {
        let idx = self
            .state
            .tasks
            .iter()
            .position(|task| task.id == task_id)?;
        self.state.tasks[idx].participants = participants;
        tracing::debug!(task_id = %task_id, "participants replaced");
        self.persist();
        self.state.tasks.get(idx)
    }

    fn persist(&self) {
        if let Err(err) = self.backend.save(&self.state) {
            tracing::error!(error = %err, "failed to persist state");
        }
    }

    // =========================================================================
    // Reference resolution
    // =========================================================================

    /// Resolve a member reference: exact id, unique id prefix, or name
    pub fn resolve_member(&self, input: &str) -> Result<String> {
        let candidates = self
            .state
            .members
            .iter()
            .map(|member| (member.id.as_str(), member.name.as_str()));
        resolve_reference(input, candidates, "member").map_err(|err| match err {
            ResolveError::Empty => {
                Error::InvalidArgument("member reference cannot be empty".to_string())
            }
            ResolveError::NotFound => Error::MemberNotFound(input.trim().to_string()),
            ResolveError::Ambiguous(message) => Error::InvalidArgument(message),
        })
    }

    /// Resolve a task reference: exact id, unique id prefix, or title
    pub fn resolve_task(&self, input: &str) -> Result<String> {
        let candidates = self
            .state
            .tasks
            .iter()
            .map(|task| (task.id.as_str(), task.title.as_str()));
        resolve_reference(input, candidates, "task").map_err(|err| match err {
            ResolveError::Empty => {
                Error::InvalidArgument("task reference cannot be empty".to_string())
            }
            ResolveError::NotFound => Error::TaskNotFound(input.trim().to_string()),
            ResolveError::Ambiguous(message) => Error::InvalidArgument(message),
        })
    }
}

/// Shortest id prefix accepted as a reference
const MIN_PREFIX_LEN: usize = 4;

enum ResolveError {
    Empty,
    NotFound,
    Ambiguous(String),
}

fn resolve_reference<'a>(
    input: &str,
    candidates: impl Iterator<Item = (&'a str, &'a str)>,
    kind: &str,
) -> std::result::Result<String, ResolveError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ResolveError::Empty);
    }
    let needle = trimmed.to_lowercase();

    let mut by_id: Vec<String> = Vec::new();
    let mut by_prefix: Vec<String> = Vec::new();
    let mut by_label: Vec<String> = Vec::new();

    for (id, label) in candidates {
        if id == trimmed {
            by_id.push(id.to_string());
            continue;
        }
        if needle.len() >= MIN_PREFIX_LEN && id.starts_with(&needle) {
            by_prefix.push(id.to_string());
        }
        if label.trim().to_lowercase() == needle {
            by_label.push(id.to_string());
        }
    }

    if let Some(id) = by_id.into_iter().next() {
        return Ok(id);
    }

    for group in [by_label, by_prefix] {
        match group.len() {
            0 => continue,
            1 => return Ok(group.into_iter().next().unwrap_or_default()),
            _ => {
                let ids: Vec<&str> = group.iter().map(|id| crate::id::short_id(id)).collect();
                return Err(ResolveError::Ambiguous(format!(
                    "ambiguous {kind} '{trimmed}': {}",
                    ids.join(", ")
                )));
            }
        }
    }

    Err(ResolveError::NotFound)
}
