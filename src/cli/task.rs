//! hausplan task command implementation
//!
//! Records, deletes, lists and reassigns chores.

use chrono::NaiveDate;
use serde::Serialize;

use super::{rejection, Session};
use crate::controller::{Action, Outcome};
use crate::error::{Error, Result};
use crate::id::short_id;
use crate::locale;
use crate::model::Task;
use crate::output::{emit_success, HumanOutput};
use crate::projection::{self, TaskList, TaskSummary};
use crate::store::StateStore;

/// Options for `hausplan task add`
pub struct AddOptions {
    pub title: String,
    pub date: Option<String>,
    pub notes: Option<String>,
    pub with: Vec<String>,
}

/// Options for `hausplan task rm`
pub struct RmOptions {
    pub reference: String,
}

/// Options for `hausplan task assign`
pub struct AssignOptions {
    pub reference: String,
    pub with: Vec<String>,
}

#[derive(Serialize)]
struct TaskRemoveReport {
    removed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<Task>,
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(raw.to_string()))
}

pub fn run_add(session: &Session, options: AddOptions) -> Result<()> {
    if let Some(raw) = options.date.as_deref() {
        parse_date(raw)?;
    }

    let mut controller = session.controller();
    let participants = options
        .with
        .iter()
        .map(|reference| controller.store().resolve_member(reference))
        .collect::<Result<Vec<_>>>()?;

    controller.dispatch(Action::SetTaskTitle(options.title));
    if let Some(date) = options.date {
        controller.dispatch(Action::SetTaskDate(date.trim().to_string()));
    }
    controller.dispatch(Action::SetTaskNotes(options.notes.unwrap_or_default()));
    controller.select_participants(participants);
    rejection(controller.dispatch(Action::SubmitTask))?;

    let task = controller
        .state()
        .tasks
        .last()
        .cloned()
        .ok_or_else(|| Error::OperationFailed("task was not added".to_string()))?;
    let summary = summary_for(controller.projections().tasks.tasks(), &task.id);

    let mut human = HumanOutput::new(format!("hausplan task add: {}", task.title));
    human.push_summary("id", short_id(&task.id).to_string());
    human.push_summary("date", locale::format_date(task.date));
    if let Some(summary) = &summary {
        human.push_summary("participants", summary.participants_label());
    }

    emit_success(session.output, "task add", &task, Some(&human))?;
    Ok(())
}

pub fn run_rm(session: &Session, options: RmOptions) -> Result<()> {
    let mut controller = session.controller();
    let task_id = controller.store().resolve_task(&options.reference)?;
    let task = controller.store().task(&task_id).cloned();

    let outcome = rejection(controller.dispatch(Action::RemoveTask(task_id)))?;
    let removed = outcome.is_applied();
    let title = task.as_ref().map(|task| task.title.clone()).unwrap_or_default();

    let report = TaskRemoveReport { removed, task };
    let human = match outcome {
        Outcome::Cancelled => HumanOutput::new(format!("hausplan task rm: kept {title}")),
        _ => HumanOutput::new(format!("hausplan task rm: {title}")),
    };

    emit_success(session.output, "task rm", &report, Some(&human))?;
    Ok(())
}

pub fn run_ls(session: &Session) -> Result<()> {
    let store = StateStore::open(session.persistence());
    let list: TaskList = projection::task_list(store.state(), |_| None);

    let mut human = HumanOutput::new(format!("hausplan task ls: {} tasks", list.len()));
    for task in list.tasks() {
        human.push_detail(format!(
            "{}  {}  {}  [{}]  {}",
            short_id(&task.id),
            task.date_label,
            task.title,
            task.participants_label(),
            task.notes_label()
        ));
    }
    if list.is_empty() {
        human.push_next_step("hausplan task add <TITLE> --with <MEMBER>");
    }

    emit_success(session.output, "task ls", &list, Some(&human))?;
    Ok(())
}

pub fn run_assign(session: &Session, options: AssignOptions) -> Result<()> {
    let mut controller = session.controller();
    let task_id = controller.store().resolve_task(&options.reference)?;
    let participants = options
        .with
        .iter()
        .map(|reference| controller.store().resolve_member(reference))
        .collect::<Result<Vec<_>>>()?;

    controller.set_task_edit(&task_id, participants);
    rejection(controller.dispatch(Action::SaveParticipants(task_id.clone())))?;

    let summary = summary_for(controller.projections().tasks.tasks(), &task_id)
        .ok_or_else(|| Error::TaskNotFound(options.reference.clone()))?;

    let mut human = HumanOutput::new(format!("hausplan task assign: {}", summary.title));
    human.push_summary("participants", summary.participants_label());

    emit_success(session.output, "task assign", &summary, Some(&human))?;
    Ok(())
}

fn summary_for(tasks: &[TaskSummary], task_id: &str) -> Option<TaskSummary> {
    tasks.iter().find(|summary| summary.id == task_id).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_must_be_iso() {
        assert_eq!(
            parse_date(" 2024-01-10 ").expect("date"),
            NaiveDate::from_ymd_opt(2024, 1, 10).expect("date")
        );
        assert!(matches!(parse_date("10.01.2024"), Err(Error::InvalidDate(_))));
        assert!(matches!(parse_date("2024-02-30"), Err(Error::InvalidDate(_))));
    }
}
