use chrono::{Local, NaiveDate};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::{App, AuthField, DraftField, Mode};
use crate::application::dashboard::{AuthPhase, CreatePhase};
use crate::domain::{storage::TokenStore, todo::{Priority, Todo}};

pub fn draw<S: TokenStore>(f: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(3)])
        .split(f.size());

    let state = if app.dashboard.is_authenticated() { "signed in" } else { "signed out" };
    let header = Paragraph::new(format!("Todo Dashboard  |  {state}"))
        .block(Block::default().borders(Borders::ALL).title("todo-dashboard"));
    f.render_widget(header, chunks[0]);

    match app.mode {
        Mode::Auth => draw_auth(f, app, chunks[1]),
        Mode::Browse | Mode::Compose => draw_todos(f, app, chunks[1]),
    }

    let help = match app.mode {
        Mode::Auth => "Tab: switch field  Enter: log in  Ctrl-R: register  Esc: quit",
        Mode::Browse => "n: new  Enter: toggle  d: delete  f/p/o: filters  r: reload  L: log out  q: quit",
        Mode::Compose => "Tab: next field  Left/Right: priority  Enter: add  Esc: back",
    };
    let footer = Paragraph::new(help).block(Block::default().borders(Borders::ALL).title("keys"));
    f.render_widget(footer, chunks[2]);
}

fn draw_auth<S: TokenStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let dash = &app.dashboard;
    let busy = match dash.auth_phase() {
        AuthPhase::Idle => None,
        AuthPhase::Registering => Some("Registering..."),
        AuthPhase::LoggingIn => Some("Logging in..."),
    };
    let mut lines = vec![
        field_line("username", dash.username(), app.auth_field == AuthField::Username),
        field_line("password", &"*".repeat(dash.password().chars().count()), app.auth_field == AuthField::Password),
        Line::default(),
    ];
    if let Some(busy) = busy { lines.push(Line::from(Span::styled(busy, Style::default().fg(Color::Yellow)))); }
    if let Some(message) = dash.auth_message() { lines.push(Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Gray)))); }

    let form = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Authentication"));
    f.render_widget(form, area);
}

fn draw_todos<S: TokenStore>(f: &mut Frame, app: &mut App<S>, area: Rect) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let composing = app.mode == Mode::Compose;
    let dash = &app.dashboard;
    let draft = dash.draft();
    let active = |field: DraftField| composing && app.draft_field == field;
    let title = if dash.create_phase() == CreatePhase::Submitting { "New task (adding...)" } else { "New task" };
    let form = Paragraph::new(vec![
        field_line("title", &draft.title, active(DraftField::Title)),
        field_line("description", &draft.description, active(DraftField::Description)),
        field_line("priority", &format!("< {} >", priority_label(draft.priority)), active(DraftField::Priority)),
        field_line("due date", &draft.due_date, active(DraftField::DueDate)),
    ])
    .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(form, parts[0]);

    let filters = dash.filters();
    let mut status = vec![Span::raw(format!(
        "done: {}  priority: {}  due date: {}",
        filters.done.label(),
        filters.priority.label(),
        filters.order.as_str(),
    ))];
    if dash.is_loading() { status.push(Span::styled("  loading...", Style::default().fg(Color::Yellow))); }
    if let Some(message) = dash.todo_message() {
        status.push(Span::styled(format!("  {message}"), Style::default().fg(Color::Red)));
    }
    let status = Paragraph::new(Line::from(status)).block(Block::default().borders(Borders::ALL).title("filters"));
    f.render_widget(status, parts[1]);

    let today = Local::now().date_naive();
    let mut items: Vec<ListItem> = dash.todos().iter().map(|t| todo_item(t, today)).collect();
    if items.is_empty() && !dash.is_loading() { items.push(ListItem::new("No tasks yet.")); }
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!("Todos [{}]", dash.todos().len())))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .highlight_symbol(">> ");
    f.render_stateful_widget(list, parts[2], &mut app.list_state);
}

fn field_line(label: &str, value: &str, active: bool) -> Line<'static> {
    let label_style = if active { Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD) } else { Style::default() };
    let cursor = if active { "_" } else { "" };
    Line::from(vec![Span::styled(format!("{label:>12}: "), label_style), Span::raw(format!("{value}{cursor}"))])
}

fn todo_item(todo: &Todo, today: NaiveDate) -> ListItem<'static> {
    let title_style = if todo.done { Style::default().add_modifier(Modifier::CROSSED_OUT | Modifier::DIM) } else { Style::default() };
    let mut head = vec![
        Span::raw(if todo.done { "[x] " } else { "[ ] " }),
        Span::styled(todo.title.clone(), title_style.add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(format!(" {} ", priority_label(todo.priority)), Style::default().fg(Color::Black).bg(priority_color(todo.priority))),
    ];
    if let Some(due) = todo.due_date.as_deref() {
        head.push(Span::raw(format!("  due {due}")));
        if is_overdue(todo, today) { head.push(Span::styled(" (overdue)", Style::default().fg(Color::Red))); }
    }
    let mut lines = vec![Line::from(head)];
    if let Some(description) = todo.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(Line::from(Span::styled(format!("    {description}"), Style::default().fg(Color::Gray))));
    }
    ListItem::new(lines)
}

pub fn priority_label(priority: Priority) -> &'static str {
    match priority { Priority::High => "HIGH", Priority::Normal => "NORMAL", Priority::Low => "LOW" }
}

fn priority_color(priority: Priority) -> Color {
    match priority { Priority::High => Color::Red, Priority::Normal => Color::Green, Priority::Low => Color::Cyan }
}

/// Open tasks whose due date lies before `today`. Unparseable dates never count.
pub fn is_overdue(todo: &Todo, today: NaiveDate) -> bool {
    !todo.done
        && todo.due_date.as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .is_some_and(|due| due < today)
}
