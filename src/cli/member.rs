//! hausplan member command implementation
//!
//! Adds, removes and lists household members.

use serde::Serialize;

use super::{rejection, Session};
use crate::controller::{Action, Outcome};
use crate::error::{Error, Result};
use crate::id::short_id;
use crate::model::Member;
use crate::output::{emit_success, HumanOutput};
use crate::projection::{self, MemberList};

/// Options for `hausplan member add`
pub struct AddOptions {
    pub name: String,
}

/// Options for `hausplan member rm`
pub struct RmOptions {
    pub reference: String,
}

#[derive(Serialize)]
struct MemberRemoveReport {
    removed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    member: Option<Member>,
    tasks_touched: usize,
}

pub fn run_add(session: &Session, options: AddOptions) -> Result<()> {
    if options.name.trim().is_empty() {
        return Err(Error::EmptyMemberName);
    }

    let mut controller = session.controller();
    controller.dispatch(Action::SetMemberName(options.name));
    rejection(controller.dispatch(Action::SubmitMember))?;

    let member = controller
        .state()
        .members
        .last()
        .cloned()
        .ok_or_else(|| Error::OperationFailed("member was not added".to_string()))?;

    let mut human = HumanOutput::new(format!("hausplan member add: {}", member.name));
    human.push_summary("id", short_id(&member.id).to_string());
    human.push_summary("members", controller.state().members.len().to_string());
    human.push_next_step(format!("hausplan task add <TITLE> --with \"{}\"", member.name));

    emit_success(session.output, "member add", &member, Some(&human))?;
    Ok(())
}

pub fn run_rm(session: &Session, options: RmOptions) -> Result<()> {
    let mut controller = session.controller();
    let member_id = controller.store().resolve_member(&options.reference)?;
    let member = controller.store().member(&member_id).cloned();
    let tasks_touched = controller.state().task_count_for(&member_id);

    let outcome = rejection(controller.dispatch(Action::RemoveMember(member_id)))?;
    let removed = outcome.is_applied();

    let report = MemberRemoveReport {
        removed,
        member: member.clone(),
        tasks_touched: if removed { tasks_touched } else { 0 },
    };

    let name = member.map(|member| member.name).unwrap_or_default();
    let mut human = match outcome {
        Outcome::Cancelled => HumanOutput::new(format!("hausplan member rm: kept {name}")),
        _ => HumanOutput::new(format!("hausplan member rm: {name}")),
    };
    if removed {
        human.push_summary("tasks updated", tasks_touched.to_string());
    }

    emit_success(session.output, "member rm", &report, Some(&human))?;
    Ok(())
}

pub fn run_ls(session: &Session) -> Result<()> {
    let store = crate::store::StateStore::open(session.persistence());
    let list: MemberList = projection::member_list(store.state());

    let mut human = HumanOutput::new(format!("hausplan member ls: {} members", list.total));
    for entry in &list.entries {
        human.push_detail(format!(
            "{}  {} ({})",
            short_id(&entry.id),
            entry.name,
            entry.task_count_label()
        ));
    }
    if list.entries.is_empty() {
        human.push_next_step("hausplan member add <NAME>");
    }

    emit_success(session.output, "member ls", &list, Some(&human))?;
    Ok(())
}
