//! Interaction controller
//!
//! Maps user actions to store mutations, resets the inputs an action
//! consumed and re-renders. Every successful mutation is followed by a full
//! `render_all`; search input and picker bulk actions only repaint the
//! picker.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;

use crate::error::Error;
use crate::model::{AppState, NewTask};
use crate::projection::{self, Projections};
use crate::prompt::{Confirm, Notify};
use crate::render::{self, Surface};
use crate::storage::StateBackend;
use crate::store::StateStore;
use crate::transient::{self, Focus, ViewState};

pub const REMOVE_MEMBER_QUESTION: &str = "Remove member? Their task history is kept.";
pub const REMOVE_TASK_QUESTION: &str = "Delete task?";

/// Result of a single user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The action took effect
    Applied(String),
    /// The user was alerted and nothing changed
    Rejected(Rejection),
    /// The user declined the confirmation
    Cancelled,
    /// Nothing to do (blank input, unknown id, pure input edits)
    Unchanged,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }
}

/// Why an action was turned down; displays as the alert text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    EmptyMemberName,
    NoMembers,
    MissingTitleOrDate,
    /// Any other failure, carrying its message
    Failed(String),
}

impl Rejection {
    fn from_error(err: Error) -> Self {
        match err {
            Error::EmptyMemberName => Rejection::EmptyMemberName,
            Error::NoMembers => Rejection::NoMembers,
            Error::MissingTitleOrDate => Rejection::MissingTitleOrDate,
            other => Rejection::Failed(other.to_string()),
        }
    }

    /// The error a command reports for this rejection
    pub fn into_error(self) -> Error {
        match self {
            Rejection::EmptyMemberName => Error::EmptyMemberName,
            Rejection::NoMembers => Error::NoMembers,
            Rejection::MissingTitleOrDate => Error::MissingTitleOrDate,
            Rejection::Failed(message) => Error::OperationFailed(message),
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Failed(message) => f.write_str(message),
            other => write!(f, "{}", other.clone().into_error()),
        }
    }
}

/// Every user action the controller understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetMemberName(String),
    SubmitMember,
    RemoveMember(String),
    SetTaskTitle(String),
    SetTaskDate(String),
    SetTaskNotes(String),
    SubmitTask,
    RemoveTask(String),
    SetSearch(String),
    ToggleParticipant(String),
    SelectAllVisible,
    ClearVisible,
    ToggleTaskParticipant { task_id: String, member_id: String },
    SaveParticipants(String),
    DiscardParticipantEdits(String),
    Focus(Focus),
}

pub struct Controller<B: StateBackend, S: Surface> {
    store: StateStore<B>,
    view: ViewState,
    surface: S,
    confirm: Box<dyn Confirm>,
    notify: Box<dyn Notify>,
    today: fn() -> NaiveDate,
    projections: Projections,
}

impl<B: StateBackend, S: Surface> Controller<B, S> {
    /// Wire up a controller and paint the initial views
    pub fn new(
        store: StateStore<B>,
        surface: S,
        confirm: Box<dyn Confirm>,
        notify: Box<dyn Notify>,
    ) -> Self {
        Self::with_clock(store, surface, confirm, notify, transient::today)
    }

    /// Like `new`, with a custom source for "today"
    pub fn with_clock(
        store: StateStore<B>,
        mut surface: S,
        confirm: Box<dyn Confirm>,
        notify: Box<dyn Notify>,
        today: fn() -> NaiveDate,
    ) -> Self {
        let mut view = ViewState::new(today());
        let projections = render::render_all(store.state(), &mut view, &mut surface);
        Self {
            store,
            view,
            surface,
            confirm,
            notify,
            today,
            projections,
        }
    }

    pub fn store(&self) -> &StateStore<B> {
        &self.store
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Projections from the most recent render
    pub fn projections(&self) -> &Projections {
        &self.projections
    }

    pub fn dispatch(&mut self, action: Action) -> Outcome {
        match action {
            Action::SetMemberName(value) => {
                self.view.member_name = value;
                Outcome::Unchanged
            }
            Action::SubmitMember => self.submit_member(),
            Action::RemoveMember(id) => self.remove_member(&id),
            Action::SetTaskTitle(value) => {
                self.view.task_form.title = value;
                Outcome::Unchanged
            }
            Action::SetTaskDate(value) => {
                self.view.task_form.date = value;
                Outcome::Unchanged
            }
            Action::SetTaskNotes(value) => {
                self.view.task_form.notes = value;
                Outcome::Unchanged
            }
            Action::SubmitTask => self.submit_task(),
            Action::RemoveTask(id) => self.remove_task(&id),
            Action::SetSearch(value) => self.set_search(value),
            Action::ToggleParticipant(id) => self.toggle_participant(&id),
            Action::SelectAllVisible => self.set_visible_checked(true),
            Action::ClearVisible => self.set_visible_checked(false),
            Action::ToggleTaskParticipant { task_id, member_id } => {
                self.toggle_task_participant(&task_id, &member_id)
            }
            Action::SaveParticipants(task_id) => self.save_participants(&task_id),
            Action::DiscardParticipantEdits(task_id) => self.discard_participant_edits(&task_id),
            Action::Focus(focus) => {
                self.view.focus = focus;
                Outcome::Unchanged
            }
        }
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// Submit the new-member input; a blank name is ignored
    pub fn submit_member(&mut self) -> Outcome {
        if self.view.member_name.trim().is_empty() {
            return Outcome::Unchanged;
        }

        match self.store.add_member(&self.view.member_name) {
            Ok(member) => {
                self.view.member_name.clear();
                self.view.focus = Focus::MemberName;
                self.render_all();
                Outcome::Applied(format!("Added {}", member.name))
            }
            Err(err) => self.reject(err),
        }
    }

    pub fn remove_member(&mut self, member_id: &str) -> Outcome {
        if self.store.member(member_id).is_none() {
            return Outcome::Unchanged;
        }
        if !self.confirm.confirm(REMOVE_MEMBER_QUESTION) {
            return Outcome::Cancelled;
        }

        match self.store.remove_member(member_id) {
            Some(member) => {
                self.render_all();
                Outcome::Applied(format!("Removed {}", member.name))
            }
            None => Outcome::Unchanged,
        }
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    /// Submit the new-task form with the current picker selection
    pub fn submit_task(&mut self) -> Outcome {
        render::absorb_ticks(&mut self.view, &mut self.surface);

        if !self.store.has_members() {
            return self.reject(Error::NoMembers);
        }

        let form = &self.view.task_form;
        let input = NewTask {
            title: form.title.clone(),
            date: form.parsed_date(),
            notes: form.notes.clone(),
            participants: projection::selected_participants(self.store.state(), &self.view.selection),
        };

        match self.store.add_task(input) {
            Ok(task) => {
                self.view.task_form.reset((self.today)());
                self.view.search.clear();
                self.view.selection.clear();
                self.render_all();
                Outcome::Applied(format!("Added {}", task.title))
            }
            Err(err) => self.reject(err),
        }
    }

    pub fn remove_task(&mut self, task_id: &str) -> Outcome {
        if self.store.task(task_id).is_none() {
            return Outcome::Unchanged;
        }
        if !self.confirm.confirm(REMOVE_TASK_QUESTION) {
            return Outcome::Cancelled;
        }

        match self.store.remove_task(task_id) {
            Some(task) => {
                self.render_all();
                Outcome::Applied(format!("Deleted {}", task.title))
            }
            None => Outcome::Unchanged,
        }
    }

    /// Tick or untick a member in a task's participant editor
    pub fn toggle_task_participant(&mut self, task_id: &str, member_id: &str) -> Outcome {
        let Some(task) = self.store.task(task_id) else {
            return Outcome::Unchanged;
        };
        if self.store.member(member_id).is_none() {
            return Outcome::Unchanged;
        }

        let selected = self
            .view
            .task_edits
            .entry(task_id.to_string())
            .or_insert_with(|| task.participants.iter().cloned().collect());
        if !selected.remove(member_id) {
            selected.insert(member_id.to_string());
        }
        self.render_all();
        Outcome::Unchanged
    }

    /// Replace the editor selection of a task wholesale
    pub fn set_task_edit(&mut self, task_id: &str, member_ids: impl IntoIterator<Item = String>) {
        if self.store.task(task_id).is_none() {
            return;
        }
        self.view
            .task_edits
            .insert(task_id.to_string(), member_ids.into_iter().collect());
        self.render_all();
    }

    /// Save the ids ticked in a task's participant editor
    pub fn save_participants(&mut self, task_id: &str) -> Outcome {
        let Some(summary) = self
            .projections
            .tasks
            .tasks()
            .iter()
            .find(|summary| summary.id == task_id)
        else {
            return Outcome::Unchanged;
        };
        let checked = summary.checked_ids();

        match self.store.set_task_participants(task_id, checked) {
            Some(task) => {
                let title = task.title.clone();
                self.view.task_edits.remove(task_id);
                self.render_all();
                Outcome::Applied(format!("Saved participants for {title}"))
            }
            None => Outcome::Unchanged,
        }
    }

    pub fn discard_participant_edits(&mut self, task_id: &str) -> Outcome {
        if self.view.task_edits.remove(task_id).is_some() {
            self.render_all();
        }
        Outcome::Unchanged
    }

    // =========================================================================
    // Participant picker
    // =========================================================================

    /// Update the search text and repaint the picker
    pub fn set_search(&mut self, search: impl Into<String>) -> Outcome {
        self.view.search = search.into();
        self.render_picker();
        Outcome::Unchanged
    }

    pub fn toggle_participant(&mut self, member_id: &str) -> Outcome {
        render::absorb_ticks(&mut self.view, &mut self.surface);
        if self.store.member(member_id).is_none() {
            return Outcome::Unchanged;
        }
        if !self.view.selection.remove(member_id) {
            self.view.selection.insert(member_id.to_string());
        }
        self.render_picker();
        Outcome::Unchanged
    }

    /// Replace the picker selection
    pub fn select_participants(&mut self, member_ids: impl IntoIterator<Item = String>) {
        render::absorb_ticks(&mut self.view, &mut self.surface);
        self.view.selection = member_ids.into_iter().collect::<HashSet<String>>();
        self.render_picker();
    }

    /// Check or uncheck every option the current search shows
    pub fn set_visible_checked(&mut self, checked: bool) -> Outcome {
        render::absorb_ticks(&mut self.view, &mut self.surface);
        let picker = projection::participant_picker(
            self.store.state(),
            &self.view.search,
            &self.view.selection,
        );
        for option in picker.options.visible() {
            if checked {
                self.view.selection.insert(option.id.clone());
            } else {
                self.view.selection.remove(&option.id);
            }
        }
        self.render_picker();
        Outcome::Unchanged
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Recompute and repaint all views
    pub fn render_all(&mut self) {
        self.projections =
            render::render_all(self.store.state(), &mut self.view, &mut self.surface);
    }

    fn render_picker(&mut self) {
        self.projections.picker =
            render::render_picker(self.store.state(), &mut self.view, &mut self.surface);
    }

    fn reject(&mut self, err: Error) -> Outcome {
        if !err.is_validation() {
            tracing::error!(error = %err, "action failed");
        }
        let rejection = Rejection::from_error(err);
        self.notify.alert(&rejection.to_string());
        Outcome::Rejected(rejection)
    }
}
