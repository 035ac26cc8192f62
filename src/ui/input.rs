use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{App, AuthField, DraftField, Mode};
use crate::application::dashboard::Request;
use crate::domain::storage::TokenStore;

/// Maps one key press onto the dashboard. Returns the request the press
/// started, if any.
pub fn handle_key<S: TokenStore>(app: &mut App<S>, key: KeyEvent) -> Option<Request> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit = true;
        return None;
    }
    match app.mode {
        Mode::Auth => auth_key(app, key),
        Mode::Browse => browse_key(app, key),
        Mode::Compose => compose_key(app, key),
    }
}

fn auth_key<S: TokenStore>(app: &mut App<S>, key: KeyEvent) -> Option<Request> {
    let dash = &mut app.dashboard;
    match key.code {
        KeyCode::Esc => { app.quit = true; None }
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => dash.submit_register(),
        KeyCode::Enter => dash.submit_login(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.auth_field = match app.auth_field { AuthField::Username => AuthField::Password, AuthField::Password => AuthField::Username };
            None
        }
        KeyCode::Backspace => {
            match app.auth_field {
                AuthField::Username => { let mut v = dash.username().to_string(); v.pop(); dash.set_username(v); }
                AuthField::Password => { let mut v = dash.password().to_string(); v.pop(); dash.set_password(v); }
            }
            None
        }
        KeyCode::Char(c) => {
            match app.auth_field {
                AuthField::Username => { let v = format!("{}{c}", dash.username()); dash.set_username(v); }
                AuthField::Password => { let v = format!("{}{c}", dash.password()); dash.set_password(v); }
            }
            None
        }
        _ => None,
    }
}

fn browse_key<S: TokenStore>(app: &mut App<S>, key: KeyEvent) -> Option<Request> {
    match key.code {
        KeyCode::Char('q') => { app.quit = true; None }
        KeyCode::Up | KeyCode::Char('k') => { app.select_prev(); None }
        KeyCode::Down | KeyCode::Char('j') => { app.select_next(); None }
        KeyCode::Enter | KeyCode::Char(' ') => app.selected_id().and_then(|id| app.dashboard.toggle(id)),
        KeyCode::Delete | KeyCode::Char('d') => app.selected_id().and_then(|id| app.dashboard.delete(id)),
        KeyCode::Char('n') | KeyCode::Char('i') => {
            app.mode = Mode::Compose;
            app.draft_field = DraftField::Title;
            None
        }
        KeyCode::Char('f') => { let next = app.dashboard.filters().done.next(); app.dashboard.set_done_filter(next) }
        KeyCode::Char('p') => { let next = app.dashboard.filters().priority.next(); app.dashboard.set_priority_filter(next) }
        KeyCode::Char('o') => { let next = app.dashboard.filters().order.flipped(); app.dashboard.set_order(next) }
        KeyCode::Char('r') => app.dashboard.refresh(),
        KeyCode::Char('L') => { app.dashboard.logout(); None }
        _ => None,
    }
}

fn compose_key<S: TokenStore>(app: &mut App<S>, key: KeyEvent) -> Option<Request> {
    let field = app.draft_field;
    match key.code {
        KeyCode::Esc => { app.mode = Mode::Browse; None }
        KeyCode::Tab | KeyCode::Down => { app.draft_field = field.next(); None }
        KeyCode::BackTab | KeyCode::Up => { app.draft_field = field.prev(); None }
        KeyCode::Enter => {
            let request = app.dashboard.submit_create();
            if request.is_some() { app.draft_field = DraftField::Title; }
            request
        }
        KeyCode::Left if field == DraftField::Priority => { app.dashboard.edit_draft(|d| d.priority = d.priority.prev()); None }
        KeyCode::Right if field == DraftField::Priority => { app.dashboard.edit_draft(|d| d.priority = d.priority.next()); None }
        KeyCode::Backspace => {
            app.dashboard.edit_draft(|d| { if let Some(text) = text_field(d, field) { text.pop(); } });
            None
        }
        KeyCode::Char(c) => {
            app.dashboard.edit_draft(|d| { if let Some(text) = text_field(d, field) { text.push(c); } });
            None
        }
        _ => None,
    }
}

fn text_field(draft: &mut crate::application::dashboard::Draft, field: DraftField) -> Option<&mut String> {
    match field {
        DraftField::Title => Some(&mut draft.title),
        DraftField::Description => Some(&mut draft.description),
        DraftField::DueDate => Some(&mut draft.due_date),
        DraftField::Priority => None,
    }
}
