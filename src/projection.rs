//! Derived-view projections
//!
//! Pure functions from the persisted state plus transient view state to the
//! data each view displays. Nothing in here paints or mutates; the render
//! synchronizer feeds these values to a surface.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::locale;
use crate::model::{AppState, Member, Task};
use crate::transient::ViewState;

pub const NO_MEMBERS_TEXT: &str = "No members yet - add names first.";
pub const NO_MATCHES_TEXT: &str = "No matches for your search.";
pub const NO_TASKS_TEXT: &str = "No entries yet. Record the first task!";
pub const NOBODY_TEXT: &str = "Nobody assigned yet";
pub const NO_NOTES_TEXT: &str = "No notes";

// =========================================================================
// Member list
// =========================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSummary {
    pub id: String,
    pub name: String,
    pub task_count: usize,
}

impl MemberSummary {
    pub fn task_count_label(&self) -> String {
        match self.task_count {
            1 => "1 task".to_string(),
            n => format!("{n} tasks"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberList {
    pub entries: Vec<MemberSummary>,
    pub total: usize,
}

/// Members in de-DE order with the number of tasks each takes part in
pub fn member_list(state: &AppState) -> MemberList {
    let entries = sorted_members(state)
        .into_iter()
        .map(|member| MemberSummary {
            id: member.id.clone(),
            name: member.name.clone(),
            task_count: state.task_count_for(&member.id),
        })
        .collect();
    MemberList {
        entries,
        total: state.members.len(),
    }
}

fn sorted_members(state: &AppState) -> Vec<&Member> {
    let mut members: Vec<&Member> = state.members.iter().collect();
    members.sort_by(|left, right| locale::collate(&left.name, &right.name));
    members
}

// =========================================================================
// Participant picker
// =========================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantOption {
    pub id: String,
    pub name: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParticipantOptions {
    /// The household has no members at all
    NoMembers,
    /// Members exist but none matches the search text
    NoMatches,
    Options { options: Vec<ParticipantOption> },
}

impl ParticipantOptions {
    pub fn visible(&self) -> &[ParticipantOption] {
        match self {
            ParticipantOptions::Options { options } => options,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantControls {
    pub search_enabled: bool,
    pub search_text: String,
    pub select_all_enabled: bool,
    pub clear_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantPicker {
    pub options: ParticipantOptions,
    pub controls: ParticipantControls,
}

/// Picker options for the new-task form
///
/// Checked state comes from the id-keyed selection, so an option hidden by
/// the search keeps its selection and shows it again once visible.
pub fn participant_picker(
    state: &AppState,
    search: &str,
    selection: &HashSet<String>,
) -> ParticipantPicker {
    let total = state.members.len();
    if total == 0 {
        return ParticipantPicker {
            options: ParticipantOptions::NoMembers,
            controls: participant_controls(false, 0, 0, search),
        };
    }

    let options: Vec<ParticipantOption> = sorted_members(state)
        .into_iter()
        .filter(|member| locale::matches_search(&member.name, search))
        .map(|member| ParticipantOption {
            id: member.id.clone(),
            name: member.name.clone(),
            checked: selection.contains(&member.id),
        })
        .collect();

    let controls = participant_controls(true, options.len(), total, search);
    let options = if options.is_empty() {
        ParticipantOptions::NoMatches
    } else {
        ParticipantOptions::Options { options }
    };

    ParticipantPicker { options, controls }
}

/// Enabled state of the picker affordances and the match caption
pub fn participant_controls(
    has_members: bool,
    visible: usize,
    total: usize,
    search: &str,
) -> ParticipantControls {
    let actions_enabled = has_members && visible > 0;
    ParticipantControls {
        search_enabled: has_members,
        search_text: if has_members {
            search.to_string()
        } else {
            String::new()
        },
        select_all_enabled: actions_enabled,
        clear_enabled: actions_enabled,
        caption: has_members.then(|| format!("Showing {visible} of {total}")),
    }
}

/// Ids of selected members that still exist, in picker order
pub fn selected_participants(state: &AppState, selection: &HashSet<String>) -> Vec<String> {
    sorted_members(state)
        .into_iter()
        .filter(|member| selection.contains(&member.id))
        .map(|member| member.id.clone())
        .collect()
}

// =========================================================================
// Task list
// =========================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Participants {
    /// The task has no participant ids at all
    Nobody,
    /// Names of the participants that still exist, in assignment order
    Names { names: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub date_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub participants: Participants,
    /// Checkbox per member for the participant editor, in member order
    pub edit_options: Vec<ParticipantOption>,
}

impl TaskSummary {
    pub fn notes_label(&self) -> &str {
        self.notes.as_deref().unwrap_or(NO_NOTES_TEXT)
    }

    pub fn participants_label(&self) -> String {
        match &self.participants {
            Participants::Nobody => NOBODY_TEXT.to_string(),
            Participants::Names { names } => names.join(", "),
        }
    }

    /// Ids checked in the participant editor, in member order
    pub fn checked_ids(&self) -> Vec<String> {
        self.edit_options
            .iter()
            .filter(|option| option.checked)
            .map(|option| option.id.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskList {
    Empty,
    Tasks { tasks: Vec<TaskSummary> },
}

impl TaskList {
    pub fn tasks(&self) -> &[TaskSummary] {
        match self {
            TaskList::Tasks { tasks } => tasks,
            TaskList::Empty => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.tasks().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks().is_empty()
    }
}

/// Tasks, most recent date first
///
/// `pending_edit` returns the unsaved editor selection for a task, if any.
pub fn task_list<'a>(
    state: &AppState,
    pending_edit: impl Fn(&str) -> Option<&'a HashSet<String>>,
) -> TaskList {
    if state.tasks.is_empty() {
        return TaskList::Empty;
    }

    let mut tasks: Vec<&Task> = state.tasks.iter().collect();
    tasks.sort_by(|left, right| right.date.cmp(&left.date));

    let tasks = tasks
        .into_iter()
        .map(|task| summarize_task(state, task, pending_edit(&task.id)))
        .collect();
    TaskList::Tasks { tasks }
}

fn summarize_task(
    state: &AppState,
    task: &Task,
    pending: Option<&HashSet<String>>,
) -> TaskSummary {
    let participants = if task.participants.is_empty() {
        Participants::Nobody
    } else {
        let names = task
            .participants
            .iter()
            .filter_map(|id| state.member(id))
            .map(|member| member.name.clone())
            .collect();
        Participants::Names { names }
    };

    let edit_options = state
        .members
        .iter()
        .map(|member| ParticipantOption {
            id: member.id.clone(),
            name: member.name.clone(),
            checked: match pending {
                Some(selected) => selected.contains(&member.id),
                None => task.has_participant(&member.id),
            },
        })
        .collect();

    TaskSummary {
        id: task.id.clone(),
        title: task.title.clone(),
        date: task.date,
        date_label: locale::format_date(task.date),
        notes: (!task.notes.is_empty()).then(|| task.notes.clone()),
        participants,
        edit_options,
    }
}

// =========================================================================
// All views
// =========================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projections {
    pub members: MemberList,
    pub picker: ParticipantPicker,
    pub tasks: TaskList,
}

pub fn project_all(state: &AppState, view: &ViewState) -> Projections {
    Projections {
        members: member_list(state),
        picker: participant_picker(state, &view.search, &view.selection),
        tasks: task_list(state, |task_id| view.task_edits.get(task_id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str, name: &str) -> Member {
        Member {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn task(id: &str, title: &str, date: (i32, u32, u32), participants: &[&str]) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).expect("date"),
            notes: String::new(),
            participants: participants.iter().map(|id| id.to_string()).collect(),
        }
    }

    fn household() -> AppState {
        AppState {
            members: vec![member("a", "Anna"), member("b", "Ben"), member("c", "Anja")],
            tasks: Vec::new(),
        }
    }

    fn names(picker: &ParticipantPicker) -> Vec<&str> {
        picker
            .options
            .visible()
            .iter()
            .map(|option| option.name.as_str())
            .collect()
    }

    #[test]
    fn member_list_is_sorted_with_counts() {
        let mut state = household();
        state.tasks.push(task("t1", "Trash", (2024, 1, 10), &["a", "b"]));
        state.tasks.push(task("t2", "Dishes", (2024, 1, 11), &["a"]));

        let list = member_list(&state);
        let rows: Vec<(&str, usize)> = list
            .entries
            .iter()
            .map(|entry| (entry.name.as_str(), entry.task_count))
            .collect();
        assert_eq!(rows, vec![("Anja", 0), ("Anna", 2), ("Ben", 1)]);
        assert_eq!(list.total, 3);
        assert_eq!(list.entries[1].task_count_label(), "2 tasks");
        assert_eq!(list.entries[2].task_count_label(), "1 task");
    }

    #[test]
    fn picker_without_members_is_a_marker() {
        let picker = participant_picker(&AppState::empty(), "an", &HashSet::new());
        assert_eq!(picker.options, ParticipantOptions::NoMembers);
        assert!(!picker.controls.search_enabled);
        assert!(!picker.controls.select_all_enabled);
        assert!(!picker.controls.clear_enabled);
        assert_eq!(picker.controls.search_text, "");
        assert_eq!(picker.controls.caption, None);
    }

    #[test]
    fn picker_filters_case_insensitively() {
        let picker = participant_picker(&household(), "an", &HashSet::new());
        assert_eq!(names(&picker), vec!["Anja", "Anna"]);
        assert_eq!(picker.controls.caption.as_deref(), Some("Showing 2 of 3"));
        assert!(picker.controls.select_all_enabled);

        let picker = participant_picker(&household(), "BEN", &HashSet::new());
        assert_eq!(names(&picker), vec!["Ben"]);
    }

    #[test]
    fn picker_without_matches_is_distinct_marker() {
        let picker = participant_picker(&household(), "zz", &HashSet::new());
        assert_eq!(picker.options, ParticipantOptions::NoMatches);
        assert!(picker.controls.search_enabled);
        assert!(!picker.controls.select_all_enabled);
        assert!(!picker.controls.clear_enabled);
        assert_eq!(picker.controls.caption.as_deref(), Some("Showing 0 of 3"));
    }

    #[test]
    fn selection_survives_filtering() {
        let selection: HashSet<String> = ["b".to_string()].into_iter().collect();
        let filtered = participant_picker(&household(), "an", &selection);
        assert!(filtered.options.visible().iter().all(|option| !option.checked));

        let cleared = participant_picker(&household(), "", &selection);
        assert_eq!(names(&cleared), vec!["Anja", "Anna", "Ben"]);
        let checked: Vec<&str> = cleared
            .options
            .visible()
            .iter()
            .filter(|option| option.checked)
            .map(|option| option.id.as_str())
            .collect();
        assert_eq!(checked, vec!["b"]);
    }

    #[test]
    fn selected_participants_skip_removed_members() {
        let selection: HashSet<String> = ["a", "b", "ghost"].iter().map(|id| id.to_string()).collect();
        assert_eq!(
            selected_participants(&household(), &selection),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn empty_task_list_is_a_marker() {
        assert_eq!(task_list(&household(), |_| None), TaskList::Empty);
    }

    #[test]
    fn tasks_sorted_newest_first_with_names() {
        let mut state = household();
        state.tasks.push(task("t1", "Old", (2024, 1, 1), &["b", "ghost", "a"]));
        state.tasks.push(task("t2", "New", (2024, 2, 1), &[]));
        state.tasks.push(task("t3", "Middle", (2024, 1, 15), &["ghost"]));

        let list = task_list(&state, |_| None);
        let titles: Vec<&str> = list.tasks().iter().map(|task| task.title.as_str()).collect();
        assert_eq!(titles, vec!["New", "Middle", "Old"]);

        assert_eq!(list.tasks()[0].participants, Participants::Nobody);
        assert_eq!(list.tasks()[0].participants_label(), NOBODY_TEXT);
        assert_eq!(
            list.tasks()[1].participants,
            Participants::Names { names: Vec::new() }
        );
        assert_eq!(
            list.tasks()[2].participants,
            Participants::Names {
                names: vec!["Ben".to_string(), "Anna".to_string()]
            }
        );
        assert_eq!(list.tasks()[2].date_label, "01. Jan. 2024");
        assert_eq!(list.tasks()[2].notes_label(), NO_NOTES_TEXT);
    }

    #[test]
    fn edit_options_follow_member_order_and_pending_edits() {
        let mut state = household();
        state.tasks.push(task("t1", "Trash", (2024, 1, 10), &["b"]));

        let list = task_list(&state, |_| None);
        let options = &list.tasks()[0].edit_options;
        let ids: Vec<&str> = options.iter().map(|option| option.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(list.tasks()[0].checked_ids(), vec!["b".to_string()]);

        let pending: HashSet<String> = ["a".to_string(), "c".to_string()].into_iter().collect();
        let list = task_list(&state, |id| (id == "t1").then_some(&pending));
        assert_eq!(
            list.tasks()[0].checked_ids(),
            vec!["a".to_string(), "c".to_string()]
        );
    }
}
