//! Render synchronizer
//!
//! A `Surface` is anything that can paint the three views. `render_all`
//! recomputes every projection from the current state and repaints each view
//! wholesale; there is no diffing. Before repainting, checkbox changes the
//! user made on the painted picker are read back into the id-keyed selection
//! so a rebuild never loses what the user ticked.

use std::collections::HashSet;

use crate::id::short_id;
use crate::model::AppState;
use crate::projection::{
    self, MemberList, ParticipantOption, ParticipantOptions, ParticipantPicker, Projections,
    TaskList, NO_MATCHES_TEXT, NO_MEMBERS_TEXT, NO_TASKS_TEXT,
};
use crate::transient::ViewState;

/// Paints projections into some concrete view
pub trait Surface {
    fn paint_members(&mut self, members: &MemberList);
    fn paint_picker(&mut self, picker: &ParticipantPicker);
    fn paint_tasks(&mut self, tasks: &TaskList);

    /// Drain checkbox changes the user made on the painted picker since the
    /// last paint, as `(member id, checked)` in the order they happened
    ///
    /// Surfaces that route every toggle through the controller keep the
    /// default.
    fn take_ticks(&mut self) -> Vec<(String, bool)> {
        Vec::new()
    }
}

/// Recompute and repaint all three views
pub fn render_all(state: &AppState, view: &mut ViewState, surface: &mut dyn Surface) -> Projections {
    sync_selection(state, view, surface);
    let projections = projection::project_all(state, view);
    surface.paint_members(&projections.members);
    surface.paint_picker(&projections.picker);
    surface.paint_tasks(&projections.tasks);
    projections
}

/// Recompute and repaint only the participant picker
pub fn render_picker(
    state: &AppState,
    view: &mut ViewState,
    surface: &mut dyn Surface,
) -> ParticipantPicker {
    sync_selection(state, view, surface);
    let picker = projection::participant_picker(state, &view.search, &view.selection);
    surface.paint_picker(&picker);
    picker
}

/// Fold the surface's pending checkbox changes into the selection
pub fn absorb_ticks(view: &mut ViewState, surface: &mut dyn Surface) {
    for (member_id, checked) in surface.take_ticks() {
        if checked {
            view.selection.insert(member_id);
        } else {
            view.selection.remove(&member_id);
        }
    }
}

fn sync_selection(state: &AppState, view: &mut ViewState, surface: &mut dyn Surface) {
    absorb_ticks(view, surface);
    // An empty household has no filter; stale text would hide the next member
    if state.members.is_empty() {
        view.search.clear();
    }
    view.prune(
        |id| state.member(id).is_some(),
        |id| state.task(id).is_some(),
    );
}

// =========================================================================
// Plain-text surface
// =========================================================================

/// Renders each view into lines of text
///
/// Picker checkboxes can be ticked directly on the painted view with
/// `tick`, like checkboxes in a form; the next render picks them up.
#[derive(Debug, Clone, Default)]
pub struct TextSurface {
    members: Vec<String>,
    picker: Vec<String>,
    tasks: Vec<String>,
    picker_options: Vec<ParticipantOption>,
    pending_ticks: Vec<(String, bool)>,
    paints: usize,
}

impl TextSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn members_text(&self) -> String {
        self.members.join("\n")
    }

    pub fn picker_text(&self) -> String {
        self.picker.join("\n")
    }

    pub fn tasks_text(&self) -> String {
        self.tasks.join("\n")
    }

    /// All three views separated by blank lines
    pub fn text(&self) -> String {
        [self.members_text(), self.picker_text(), self.tasks_text()].join("\n\n")
    }

    /// Number of individual view repaints so far
    pub fn paints(&self) -> usize {
        self.paints
    }

    /// Options currently painted in the picker
    pub fn picker_options(&self) -> &[ParticipantOption] {
        &self.picker_options
    }

    /// Tick or untick a painted picker checkbox; returns false if not shown
    pub fn tick(&mut self, member_id: &str, checked: bool) -> bool {
        match self
            .picker_options
            .iter_mut()
            .find(|option| option.id == member_id)
        {
            Some(option) => {
                option.checked = checked;
                self.pending_ticks.push((member_id.to_string(), checked));
                true
            }
            None => false,
        }
    }

    /// Ids ticked in the painted picker
    pub fn ticked(&self) -> HashSet<String> {
        self.picker_options
            .iter()
            .filter(|option| option.checked)
            .map(|option| option.id.clone())
            .collect()
    }
}

impl Surface for TextSurface {
    fn paint_members(&mut self, members: &MemberList) {
        self.paints += 1;
        self.members.clear();
        self.members.push(format!("Members ({})", members.total));
        for entry in &members.entries {
            self.members.push(format!(
                "  {} ({})  [{}]",
                entry.name,
                entry.task_count_label(),
                short_id(&entry.id)
            ));
        }
    }

    fn paint_picker(&mut self, picker: &ParticipantPicker) {
        self.paints += 1;
        self.picker.clear();
        self.picker_options.clear();
        self.pending_ticks.clear();

        let mut header = "Participants".to_string();
        if let Some(caption) = picker.controls.caption.as_deref() {
            header.push_str(&format!("  {caption}"));
        }
        if !picker.controls.search_text.trim().is_empty() {
            header.push_str(&format!("  search: \"{}\"", picker.controls.search_text));
        }
        self.picker.push(header);

        match &picker.options {
            ParticipantOptions::NoMembers => self.picker.push(format!("  {NO_MEMBERS_TEXT}")),
            ParticipantOptions::NoMatches => self.picker.push(format!("  {NO_MATCHES_TEXT}")),
            ParticipantOptions::Options { options } => {
                for option in options {
                    let mark = if option.checked { "x" } else { " " };
                    self.picker.push(format!("  [{mark}] {}", option.name));
                }
                self.picker_options = options.clone();
            }
        }
    }

    fn paint_tasks(&mut self, tasks: &TaskList) {
        self.paints += 1;
        self.tasks.clear();
        self.tasks.push(format!("Tasks ({})", tasks.len()));

        if tasks.is_empty() {
            self.tasks.push(format!("  {NO_TASKS_TEXT}"));
            return;
        }

        for task in tasks.tasks() {
            self.tasks.push(format!(
                "  {}  {}  [{}]",
                task.date_label,
                task.title,
                short_id(&task.id)
            ));
            self.tasks
                .push(format!("      Participants: {}", task.participants_label()));
            self.tasks.push(format!("      Notes: {}", task.notes_label()));
        }
    }

    fn take_ticks(&mut self) -> Vec<(String, bool)> {
        std::mem::take(&mut self.pending_ticks)
    }
}
