//! Transient view state
//!
//! Everything the user has typed or ticked but not yet saved. None of this
//! is persisted; it only feeds the projections.

use std::collections::{HashMap, HashSet};

use chrono::{Local, NaiveDate};

/// Which input currently has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    MemberName,
    TaskTitle,
    TaskDate,
    TaskNotes,
    ParticipantSearch,
}

/// The new-task form fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    /// Raw date input; parsed on submit
    pub date: String,
    pub notes: String,
}

impl TaskForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            title: String::new(),
            date: today.format("%Y-%m-%d").to_string(),
            notes: String::new(),
        }
    }

    /// Clear every field and put the date back to `today`
    pub fn reset(&mut self, today: NaiveDate) {
        *self = Self::new(today);
    }

    /// Parsed date, `None` when blank or not a valid `YYYY-MM-DD`
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let raw = self.date.trim();
        if raw.is_empty() {
            return None;
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub member_name: String,
    pub task_form: TaskForm,
    /// Participant search text
    pub search: String,
    /// Picker selection keyed by member id
    pub selection: HashSet<String>,
    /// Unsaved participant editor selections keyed by task id
    pub task_edits: HashMap<String, HashSet<String>>,
    pub focus: Focus,
}

impl ViewState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            member_name: String::new(),
            task_form: TaskForm::new(today),
            search: String::new(),
            selection: HashSet::new(),
            task_edits: HashMap::new(),
            focus: Focus::default(),
        }
    }

    /// Drop selections that refer to members or tasks which no longer exist
    pub fn prune(&mut self, member_exists: impl Fn(&str) -> bool, task_exists: impl Fn(&str) -> bool) {
        self.selection.retain(|id| member_exists(id));
        self.task_edits.retain(|task_id, _| task_exists(task_id));
        for selected in self.task_edits.values_mut() {
            selected.retain(|id| member_exists(id));
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(today())
    }
}

/// Current local date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
