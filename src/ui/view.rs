use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::id::short_id;
use crate::projection::{
    ParticipantOptions, TaskSummary, NO_MATCHES_TEXT, NO_MEMBERS_TEXT, NO_TASKS_TEXT,
};
use crate::storage::StateBackend;

use super::app::{App, Pane, ParticipantEditor, PendingDelete, StatusKind};

const COLOR_TEXT: Color = Color::Rgb(234, 236, 239);
const COLOR_MUTED: Color = Color::Rgb(160, 165, 172);
const COLOR_MUTED_DARK: Color = Color::Rgb(118, 124, 130);
const COLOR_INFO: Color = Color::Rgb(116, 198, 219);
const COLOR_WARNING: Color = Color::Rgb(244, 200, 98);
const COLOR_ERROR: Color = Color::Rgb(255, 107, 107);
const COLOR_SUCCESS: Color = Color::Rgb(126, 210, 146);
const COLOR_ACCENT: Color = Color::Rgb(122, 170, 255);
const COLOR_BORDER: Color = Color::Rgb(92, 126, 166);
const COLOR_BORDER_FOCUS: Color = Color::Rgb(180, 156, 92);

pub fn render<B: StateBackend>(frame: &mut Frame, app: &App<B>) {
    let area = frame.size();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage(28),
                Constraint::Percentage(36),
                Constraint::Percentage(36),
            ]
            .as_ref(),
        )
        .split(rows[0]);

    render_members(frame, app, columns[0]);
    render_form(frame, app, columns[1]);
    render_tasks(frame, app, columns[2]);
    render_footer(frame, app, rows[1]);

    if let Some(pending) = app.pending_delete.as_ref() {
        render_delete_confirm_modal(frame, area, pending);
    }
    if let Some(editor) = app.editor.as_ref() {
        render_participant_editor(frame, area, app, editor);
    }
}

fn pane_block(title: &str, focused: bool) -> Block<'static> {
    let color = if focused { COLOR_BORDER_FOCUS } else { COLOR_BORDER };
    Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .border_style(Style::default().fg(color))
}

fn render_members<B: StateBackend>(frame: &mut Frame, app: &App<B>, area: Rect) {
    let mut lines = vec![
        input_line("Name", &app.controller.view().member_name, app.pane == Pane::MemberInput),
        Line::from(""),
    ];

    match app.surface().members.as_ref() {
        Some(list) if !list.entries.is_empty() => {
            for (idx, entry) in list.entries.iter().enumerate() {
                let selected = app.pane == Pane::MemberList && idx == app.member_cursor;
                lines.push(Line::from(vec![
                    Span::styled(
                        if selected { "> " } else { "  " },
                        Style::default().fg(COLOR_ACCENT),
                    ),
                    Span::styled(entry.name.clone(), row_style(selected)),
                    Span::raw(" "),
                    Span::styled(
                        entry.task_count_label(),
                        Style::default().fg(COLOR_MUTED_DARK),
                    ),
                ]));
            }
        }
        _ => lines.push(muted_line(NO_MEMBERS_TEXT)),
    }

    let total = app.surface().members.as_ref().map(|list| list.total).unwrap_or(0);
    let focused = matches!(app.pane, Pane::MemberInput | Pane::MemberList);
    let widget = Paragraph::new(lines)
        .block(pane_block(&format!("Members ({total})"), focused))
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn render_form<B: StateBackend>(frame: &mut Frame, app: &App<B>, area: Rect) {
    let view = app.controller.view();
    let mut lines = vec![
        input_line("Title", &view.task_form.title, app.pane == Pane::TaskTitle),
        input_line("Date", &view.task_form.date, app.pane == Pane::TaskDate),
        input_line("Notes", &view.task_form.notes, app.pane == Pane::TaskNotes),
        Line::from(""),
    ];

    if let Some(picker) = app.surface().picker.as_ref() {
        let controls = &picker.controls;
        let mut header = vec![Span::styled(
            "Participants",
            Style::default().fg(COLOR_INFO).add_modifier(Modifier::BOLD),
        )];
        if let Some(caption) = controls.caption.as_deref() {
            header.push(Span::raw("  "));
            header.push(Span::styled(caption.to_string(), Style::default().fg(COLOR_MUTED)));
        }
        lines.push(Line::from(header));

        if controls.search_enabled {
            lines.push(input_line("Search", &controls.search_text, app.pane == Pane::Search));
        }

        match &picker.options {
            ParticipantOptions::NoMembers => lines.push(muted_line(NO_MEMBERS_TEXT)),
            ParticipantOptions::NoMatches => lines.push(muted_line(NO_MATCHES_TEXT)),
            ParticipantOptions::Options { options } => {
                for (idx, option) in options.iter().enumerate() {
                    let selected = app.pane == Pane::Picker && idx == app.picker_cursor;
                    lines.push(checkbox_line(&option.name, option.checked, selected));
                }
            }
        }

        if controls.select_all_enabled || controls.clear_enabled {
            lines.push(muted_line("a select all  c clear"));
        }
    }

    let focused = matches!(
        app.pane,
        Pane::TaskTitle | Pane::TaskDate | Pane::TaskNotes | Pane::Search | Pane::Picker
    );
    let widget = Paragraph::new(lines)
        .block(pane_block("New Task", focused))
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn render_tasks<B: StateBackend>(frame: &mut Frame, app: &App<B>, area: Rect) {
    let tasks = app.surface().task_summaries();
    let mut lines = Vec::new();

    if tasks.is_empty() {
        lines.push(muted_line(NO_TASKS_TEXT));
    }
    for (idx, task) in tasks.iter().enumerate() {
        let selected = app.pane == Pane::TaskList && idx == app.task_cursor;
        lines.extend(task_lines(task, selected));
    }

    let widget = Paragraph::new(lines)
        .block(pane_block(&format!("Tasks ({})", tasks.len()), app.pane == Pane::TaskList))
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn task_lines(task: &TaskSummary, selected: bool) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled(
                if selected { "> " } else { "  " },
                Style::default().fg(COLOR_ACCENT),
            ),
            Span::styled(task.date_label.clone(), Style::default().fg(COLOR_WARNING)),
            Span::raw("  "),
            Span::styled(task.title.clone(), row_style(selected)),
            Span::raw(" "),
            Span::styled(short_id(&task.id).to_string(), id_style()),
        ]),
        Line::from(vec![
            Span::raw("    "),
            Span::styled(task.participants_label(), Style::default().fg(COLOR_SUCCESS)),
        ]),
        Line::from(vec![
            Span::raw("    "),
            Span::styled(
                task.notes_label().to_string(),
                Style::default().fg(COLOR_MUTED),
            ),
        ]),
    ]
}

fn render_footer<B: StateBackend>(frame: &mut Frame, app: &App<B>, area: Rect) {
    let hint_span = Span::styled(app.footer_hint(), Style::default().fg(COLOR_INFO));
    let line = if let Some((status, kind)) = app.status_line() {
        let status_style = match kind {
            StatusKind::Error => Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
            StatusKind::Info => Style::default().fg(COLOR_WARNING),
        };
        Line::from(vec![
            hint_span,
            Span::raw("  |  "),
            Span::styled(status.to_string(), status_style),
        ])
    } else {
        Line::from(hint_span)
    };
    let widget = Paragraph::new(vec![line])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(COLOR_BORDER)),
        );
    frame.render_widget(widget, area);
}

fn render_delete_confirm_modal(frame: &mut Frame, area: Rect, pending: &PendingDelete) {
    let content_width = area.width.saturating_sub(8).min(56);
    let modal = centered_rect(content_width, 7, area);
    frame.render_widget(Clear, modal);

    let (question, label, value) = match pending {
        PendingDelete::Member { name, .. } => (
            crate::controller::REMOVE_MEMBER_QUESTION,
            "Member: ",
            name.clone(),
        ),
        PendingDelete::Task { title, .. } => {
            (crate::controller::REMOVE_TASK_QUESTION, "Task: ", title.clone())
        }
    };

    let lines = vec![
        Line::from(Span::styled(
            question,
            Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(label, Style::default().fg(COLOR_MUTED_DARK)),
            Span::styled(
                truncate_text(&value, (content_width as usize).saturating_sub(12)),
                Style::default().fg(COLOR_TEXT),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "y/enter confirm  n/esc cancel",
            Style::default().fg(COLOR_MUTED_DARK),
        )),
    ];

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Confirm"))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn render_participant_editor<B: StateBackend>(
    frame: &mut Frame,
    area: Rect,
    app: &App<B>,
    editor: &ParticipantEditor,
) {
    let Some(task) = app
        .surface()
        .task_summaries()
        .iter()
        .find(|task| task.id == editor.task_id)
    else {
        return;
    };

    let height = (task.edit_options.len() as u16 + 5).min(area.height.saturating_sub(4));
    let modal = centered_rect(area.width.saturating_sub(8).min(48), height, area);
    frame.render_widget(Clear, modal);

    let mut lines = vec![
        Line::from(Span::styled(
            task.title.clone(),
            Style::default().fg(COLOR_TEXT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    if task.edit_options.is_empty() {
        lines.push(muted_line(NO_MEMBERS_TEXT));
    }
    for (idx, option) in task.edit_options.iter().enumerate() {
        lines.push(checkbox_line(&option.name, option.checked, idx == editor.cursor));
    }

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Participants")
                .border_style(Style::default().fg(COLOR_BORDER_FOCUS)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn input_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{label}: "),
        Style::default().fg(COLOR_MUTED_DARK),
    )];
    spans.push(Span::styled(value.to_string(), Style::default().fg(COLOR_TEXT)));
    if focused {
        spans.push(Span::styled(
            " ",
            Style::default().add_modifier(Modifier::REVERSED),
        ));
    }
    Line::from(spans)
}

fn checkbox_line(name: &str, checked: bool, selected: bool) -> Line<'static> {
    let mark = if checked { "[x] " } else { "[ ] " };
    Line::from(vec![
        Span::styled(
            if selected { "> " } else { "  " },
            Style::default().fg(COLOR_ACCENT),
        ),
        Span::styled(mark, Style::default().fg(COLOR_SUCCESS)),
        Span::styled(name.to_string(), row_style(selected)),
    ])
}

fn muted_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(COLOR_MUTED),
    ))
}

fn row_style(selected: bool) -> Style {
    if selected {
        Style::default().fg(COLOR_TEXT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(COLOR_TEXT)
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn truncate_text(value: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= max {
        return value.to_string();
    }
    if max <= 3 {
        return chars[..max].iter().collect();
    }
    let mut out: String = chars[..(max - 3)].iter().collect();
    out.push_str("...");
    out
}

fn id_style() -> Style {
    Style::default()
        .fg(COLOR_MUTED)
        .add_modifier(Modifier::BOLD)
}
