use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::controller::{Action, Controller, Outcome};
use crate::error::Result;
use crate::projection::{MemberList, ParticipantOption, ParticipantPicker, TaskList, TaskSummary};
use crate::prompt::{AlertLog, ScriptedConfirm};
use crate::render::Surface;
use crate::storage::StateBackend;
use crate::store::StateStore;
use crate::transient::Focus;

use super::view;

const EVENT_POLL_MS: u64 = 120;

/// Surface that keeps the latest projections for the next frame
#[derive(Debug, Clone, Default)]
pub struct TuiSurface {
    pub(crate) members: Option<MemberList>,
    pub(crate) picker: Option<ParticipantPicker>,
    pub(crate) tasks: Option<TaskList>,
}

impl Surface for TuiSurface {
    fn paint_members(&mut self, members: &MemberList) {
        self.members = Some(members.clone());
    }

    fn paint_picker(&mut self, picker: &ParticipantPicker) {
        self.picker = Some(picker.clone());
    }

    fn paint_tasks(&mut self, tasks: &TaskList) {
        self.tasks = Some(tasks.clone());
    }
}

impl TuiSurface {
    pub(crate) fn member_ids(&self) -> Vec<String> {
        self.members
            .as_ref()
            .map(|list| list.entries.iter().map(|entry| entry.id.clone()).collect())
            .unwrap_or_default()
    }

    pub(crate) fn visible_options(&self) -> &[ParticipantOption] {
        self.picker
            .as_ref()
            .map(|picker| picker.options.visible())
            .unwrap_or(&[])
    }

    pub(crate) fn task_summaries(&self) -> &[TaskSummary] {
        self.tasks.as_ref().map(|tasks| tasks.tasks()).unwrap_or(&[])
    }
}

/// Focusable areas, in Tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pane {
    MemberInput,
    MemberList,
    TaskTitle,
    TaskDate,
    TaskNotes,
    Search,
    Picker,
    TaskList,
}

const PANE_ORDER: [Pane; 8] = [
    Pane::MemberInput,
    Pane::MemberList,
    Pane::TaskTitle,
    Pane::TaskDate,
    Pane::TaskNotes,
    Pane::Search,
    Pane::Picker,
    Pane::TaskList,
];

impl Pane {
    fn next(self) -> Self {
        self.step(1)
    }

    fn prev(self) -> Self {
        self.step(PANE_ORDER.len() - 1)
    }

    fn step(self, by: usize) -> Self {
        let idx = PANE_ORDER.iter().position(|pane| *pane == self).unwrap_or(0);
        PANE_ORDER[(idx + by) % PANE_ORDER.len()]
    }

    pub(crate) fn is_text_input(self) -> bool {
        self.focus().is_some()
    }

    fn focus(self) -> Option<Focus> {
        match self {
            Pane::MemberInput => Some(Focus::MemberName),
            Pane::TaskTitle => Some(Focus::TaskTitle),
            Pane::TaskDate => Some(Focus::TaskDate),
            Pane::TaskNotes => Some(Focus::TaskNotes),
            Pane::Search => Some(Focus::ParticipantSearch),
            Pane::MemberList | Pane::Picker | Pane::TaskList => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Error,
    Info,
}

/// Removal waiting for a y/n answer
#[derive(Debug, Clone)]
pub(crate) enum PendingDelete {
    Member { id: String, name: String },
    Task { id: String, title: String },
}

/// Per-task participant editor
#[derive(Debug, Clone)]
pub(crate) struct ParticipantEditor {
    pub(crate) task_id: String,
    pub(crate) cursor: usize,
}

pub struct App<B: StateBackend> {
    pub(crate) controller: Controller<B, TuiSurface>,
    confirm: ScriptedConfirm,
    alerts: AlertLog,
    pub(crate) pane: Pane,
    pub(crate) member_cursor: usize,
    pub(crate) picker_cursor: usize,
    pub(crate) task_cursor: usize,
    pub(crate) pending_delete: Option<PendingDelete>,
    pub(crate) editor: Option<ParticipantEditor>,
    status: Option<(String, StatusKind)>,
}

impl<B: StateBackend> App<B> {
    pub fn new(store: StateStore<B>) -> Self {
        let confirm = ScriptedConfirm::default();
        let alerts = AlertLog::new();
        let controller = Controller::new(
            store,
            TuiSurface::default(),
            Box::new(confirm.clone()),
            Box::new(alerts.clone()),
        );
        Self {
            controller,
            confirm,
            alerts,
            pane: Pane::MemberInput,
            member_cursor: 0,
            picker_cursor: 0,
            task_cursor: 0,
            pending_delete: None,
            editor: None,
            status: None,
        }
    }

    pub(crate) fn surface(&self) -> &TuiSurface {
        self.controller.surface()
    }

    pub(crate) fn status_line(&self) -> Option<(&str, StatusKind)> {
        self.status
            .as_ref()
            .map(|(message, kind)| (message.as_str(), *kind))
    }

    pub(crate) fn footer_hint(&self) -> &'static str {
        if self.pending_delete.is_some() {
            return "y confirm  n/esc cancel";
        }
        if self.editor.is_some() {
            return "space toggle  enter save  esc discard";
        }
        match self.pane {
            Pane::MemberInput => "type a name  enter add  tab next  esc quit",
            Pane::MemberList => "up/down move  d remove  / search  tab next  q quit",
            Pane::TaskTitle | Pane::TaskDate | Pane::TaskNotes => {
                "type  enter record task  tab next  esc quit"
            }
            Pane::Search => "type to filter  enter pick  tab next  esc quit",
            Pane::Picker => "space toggle  a all  c clear  enter record task  q quit",
            Pane::TaskList => "up/down move  e participants  d delete  / search  q quit",
        }
    }

    fn set_pane(&mut self, pane: Pane) {
        self.pane = pane;
        if let Some(focus) = pane.focus() {
            self.controller.dispatch(Action::Focus(focus));
        }
    }

    fn dispatch(&mut self, action: Action) {
        let outcome = self.controller.dispatch(action);
        let alerts = self.alerts.drain();
        match outcome {
            Outcome::Applied(message) => self.status = Some((message, StatusKind::Info)),
            Outcome::Rejected(rejection) => {
                self.status = Some((rejection.to_string(), StatusKind::Error))
            }
            Outcome::Cancelled => self.status = Some(("cancelled".to_string(), StatusKind::Info)),
            Outcome::Unchanged => {}
        }
        if let Some(alert) = alerts.last() {
            self.status = Some((alert.clone(), StatusKind::Error));
        }
        if self.controller.view().focus == Focus::MemberName && self.pane.is_text_input() {
            self.pane = Pane::MemberInput;
        }
        self.clamp_cursors();
    }

    fn clamp_cursors(&mut self) {
        let surface = self.controller.surface();
        self.member_cursor = clamp(self.member_cursor, surface.member_ids().len());
        self.picker_cursor = clamp(self.picker_cursor, surface.visible_options().len());
        self.task_cursor = clamp(self.task_cursor, surface.task_summaries().len());
        if let Some(editor) = self.editor.as_mut() {
            let members = self.controller.state().members.len();
            editor.cursor = clamp(editor.cursor, members);
        }
    }

    fn input_value(&self) -> Option<&str> {
        let view = self.controller.view();
        match self.pane {
            Pane::MemberInput => Some(view.member_name.as_str()),
            Pane::TaskTitle => Some(view.task_form.title.as_str()),
            Pane::TaskDate => Some(view.task_form.date.as_str()),
            Pane::TaskNotes => Some(view.task_form.notes.as_str()),
            Pane::Search => Some(view.search.as_str()),
            Pane::MemberList | Pane::Picker | Pane::TaskList => None,
        }
    }

    fn set_input_value(&mut self, value: String) {
        let action = match self.pane {
            Pane::MemberInput => Action::SetMemberName(value),
            Pane::TaskTitle => Action::SetTaskTitle(value),
            Pane::TaskDate => Action::SetTaskDate(value),
            Pane::TaskNotes => Action::SetTaskNotes(value),
            Pane::Search => Action::SetSearch(value),
            Pane::MemberList | Pane::Picker | Pane::TaskList => return,
        };
        self.dispatch(action);
    }

    /// Handle a key; returns true when the app should quit
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        if let Some(pending) = self.pending_delete.take() {
            self.handle_delete_confirm(pending, key);
            return false;
        }

        if let Some(editor) = self.editor.take() {
            self.handle_editor_key(editor, key);
            return false;
        }

        match key.code {
            KeyCode::Tab => {
                self.set_pane(self.pane.next());
                return false;
            }
            KeyCode::BackTab => {
                self.set_pane(self.pane.prev());
                return false;
            }
            KeyCode::Esc => return true,
            _ => {}
        }

        if self.pane.is_text_input() {
            self.handle_text_key(key);
            false
        } else {
            self.handle_list_key(key)
        }
    }

    fn handle_text_key(&mut self, key: KeyEvent) {
        let Some(current) = self.input_value().map(str::to_string) else {
            return;
        };
        match key.code {
            KeyCode::Char(ch) => {
                let mut value = current;
                value.push(ch);
                self.set_input_value(value);
            }
            KeyCode::Backspace => {
                let mut value = current;
                value.pop();
                self.set_input_value(value);
            }
            KeyCode::Enter => match self.pane {
                Pane::MemberInput => self.dispatch(Action::SubmitMember),
                Pane::Search => self.set_pane(Pane::Picker),
                _ => self.dispatch(Action::SubmitTask),
            },
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('/') => self.set_pane(Pane::Search),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            _ => match self.pane {
                Pane::MemberList => self.handle_member_list_key(key),
                Pane::Picker => self.handle_picker_key(key),
                Pane::TaskList => self.handle_task_list_key(key),
                _ => {}
            },
        }
        false
    }

    fn move_cursor(&mut self, delta: isize) {
        let surface = self.controller.surface();
        let (cursor, len) = match self.pane {
            Pane::MemberList => (&mut self.member_cursor, surface.member_ids().len()),
            Pane::Picker => (&mut self.picker_cursor, surface.visible_options().len()),
            Pane::TaskList => (&mut self.task_cursor, surface.task_summaries().len()),
            _ => return,
        };
        *cursor = step_cursor(*cursor, len, delta);
    }

    fn handle_member_list_key(&mut self, key: KeyEvent) {
        if key.code != KeyCode::Char('d') {
            return;
        }
        let Some((id, name)) = self
            .surface()
            .members
            .as_ref()
            .and_then(|list| list.entries.get(self.member_cursor))
            .map(|entry| (entry.id.clone(), entry.name.clone()))
        else {
            return;
        };
        self.pending_delete = Some(PendingDelete::Member { id, name });
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(' ') => {
                let Some(option) = self.surface().visible_options().get(self.picker_cursor) else {
                    return;
                };
                let id = option.id.clone();
                self.dispatch(Action::ToggleParticipant(id));
            }
            KeyCode::Char('a') => self.dispatch(Action::SelectAllVisible),
            KeyCode::Char('c') => self.dispatch(Action::ClearVisible),
            KeyCode::Enter => self.dispatch(Action::SubmitTask),
            _ => {}
        }
    }

    fn handle_task_list_key(&mut self, key: KeyEvent) {
        let Some(task) = self.surface().task_summaries().get(self.task_cursor) else {
            return;
        };
        let (id, title) = (task.id.clone(), task.title.clone());
        match key.code {
            KeyCode::Char('d') => {
                self.pending_delete = Some(PendingDelete::Task { id, title });
            }
            KeyCode::Char('e') => {
                self.editor = Some(ParticipantEditor {
                    task_id: id,
                    cursor: 0,
                });
            }
            _ => {}
        }
    }

    fn handle_delete_confirm(&mut self, pending: PendingDelete, key: KeyEvent) {
        let answer = match key.code {
            KeyCode::Char('y') | KeyCode::Char('j') | KeyCode::Enter => true,
            KeyCode::Char('n') | KeyCode::Char('q') | KeyCode::Esc => false,
            _ => {
                self.pending_delete = Some(pending);
                return;
            }
        };

        self.confirm.push_answer(answer);
        match pending {
            PendingDelete::Member { id, .. } => self.dispatch(Action::RemoveMember(id)),
            PendingDelete::Task { id, .. } => self.dispatch(Action::RemoveTask(id)),
        }
    }

    fn handle_editor_key(&mut self, mut editor: ParticipantEditor, key: KeyEvent) {
        let members = self.controller.state().members.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                editor.cursor = step_cursor(editor.cursor, members, -1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                editor.cursor = step_cursor(editor.cursor, members, 1);
            }
            KeyCode::Char(' ') => {
                let Some(member) = self.controller.state().members.get(editor.cursor) else {
                    self.editor = Some(editor);
                    return;
                };
                let member_id = member.id.clone();
                let task_id = editor.task_id.clone();
                self.editor = Some(editor);
                self.dispatch(Action::ToggleTaskParticipant { task_id, member_id });
                return;
            }
            KeyCode::Enter => {
                self.dispatch(Action::SaveParticipants(editor.task_id));
                return;
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                self.dispatch(Action::DiscardParticipantEdits(editor.task_id));
                return;
            }
            _ => {}
        }
        self.editor = Some(editor);
    }
}

fn clamp(cursor: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        cursor.min(len - 1)
    }
}

fn step_cursor(cursor: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = cursor as isize + delta;
    next.clamp(0, len as isize - 1) as usize
}

pub fn run<B: StateBackend>(store: StateStore<B>) -> Result<()> {
    let mut app = App::new(store);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop<B: StateBackend>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<B>,
) -> Result<()> {
    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|frame| view::render(frame, app))?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            match event::read()? {
                Event::Key(key) => {
                    if handle_key_event(app, key) {
                        break;
                    }
                    dirty = true;
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }
    }
    Ok(())
}

fn handle_key_event<B: StateBackend>(app: &mut App<B>, key: KeyEvent) -> bool {
    if key.kind != event::KeyEventKind::Press {
        return false;
    }
    app.handle_key(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, Persistence};

    fn app() -> App<Persistence<MemoryStore>> {
        App::new(StateStore::open(Persistence::with_default_key(MemoryStore::new())))
    }

    fn press(app: &mut App<Persistence<MemoryStore>>, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App<Persistence<MemoryStore>>, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn focus(app: &mut App<Persistence<MemoryStore>>, pane: Pane) {
        while app.pane != pane {
            press(app, KeyCode::Tab);
        }
    }

    #[test]
    fn typing_and_enter_adds_members() {
        let mut app = app();
        type_text(&mut app, "Anna");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Ben");
        press(&mut app, KeyCode::Enter);

        let names: Vec<_> = app
            .controller
            .state()
            .members
            .iter()
            .map(|member| member.name.as_str())
            .collect();
        assert_eq!(names, vec!["Anna", "Ben"]);
        assert_eq!(app.controller.view().member_name, "");
        assert_eq!(app.pane, Pane::MemberInput);
    }

    #[test]
    fn task_without_members_shows_alert() {
        let mut app = app();
        focus(&mut app, Pane::TaskTitle);
        type_text(&mut app, "Trash");
        press(&mut app, KeyCode::Enter);

        assert!(app.controller.state().tasks.is_empty());
        let (message, kind) = app.status_line().expect("status");
        assert_eq!(message, "Create members first.");
        assert!(kind == StatusKind::Error);
    }

    #[test]
    fn picker_selection_flows_into_new_task() {
        let mut app = app();
        type_text(&mut app, "Anna");
        press(&mut app, KeyCode::Enter);

        focus(&mut app, Pane::TaskTitle);
        type_text(&mut app, "Dishes");
        focus(&mut app, Pane::Picker);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);

        let state = app.controller.state();
        assert_eq!(state.tasks.len(), 1);
        assert_eq!(state.tasks[0].participants, vec![state.members[0].id.clone()]);
    }

    #[test]
    fn delete_modal_respects_answer() {
        let mut app = app();
        type_text(&mut app, "Anna");
        press(&mut app, KeyCode::Enter);
        focus(&mut app, Pane::MemberList);

        press(&mut app, KeyCode::Char('d'));
        assert!(app.pending_delete.is_some());
        press(&mut app, KeyCode::Char('n'));
        assert!(app.pending_delete.is_none());
        assert_eq!(app.controller.state().members.len(), 1);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.controller.state().members.is_empty());
    }

    #[test]
    fn q_only_quits_outside_text_inputs() {
        let mut app = app();
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.controller.view().member_name, "q");
        focus(&mut app, Pane::MemberList);
        assert!(press(&mut app, KeyCode::Char('q')));
    }
}
