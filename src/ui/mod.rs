pub mod input;
pub mod render;

use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::Backend, widgets::ListState, Terminal};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::application::{
    dashboard::{Completion, Dashboard, Request},
    dispatcher::Dispatcher,
};
use crate::domain::{api::TodoApi, storage::TokenStore, todo::TodoId};

const TICK: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode { Auth, Browse, Compose }

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AuthField { Username, Password }

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DraftField { Title, Description, Priority, DueDate }

impl DraftField {
    pub fn next(self) -> Self {
        match self { DraftField::Title => DraftField::Description, DraftField::Description => DraftField::Priority, DraftField::Priority => DraftField::DueDate, DraftField::DueDate => DraftField::Title }
    }

    pub fn prev(self) -> Self {
        match self { DraftField::Title => DraftField::DueDate, DraftField::Description => DraftField::Title, DraftField::Priority => DraftField::Description, DraftField::DueDate => DraftField::Priority }
    }
}

pub struct App<S: TokenStore> {
    pub dashboard: Dashboard<S>,
    pub mode: Mode,
    pub auth_field: AuthField,
    pub draft_field: DraftField,
    pub list_state: ListState,
    pub quit: bool,
}

impl<S: TokenStore> App<S> {
    pub fn new(dashboard: Dashboard<S>) -> Self {
        let mode = if dashboard.is_authenticated() { Mode::Browse } else { Mode::Auth };
        Self { dashboard, mode, auth_field: AuthField::Username, draft_field: DraftField::Title, list_state: ListState::default(), quit: false }
    }

    pub fn selected_id(&self) -> Option<TodoId> {
        self.list_state.selected().and_then(|i| self.dashboard.todos().get(i)).map(|t| t.id)
    }

    pub fn select_next(&mut self) {
        let len = self.dashboard.todos().len();
        if len == 0 { return; }
        let next = self.list_state.selected().map_or(0, |i| (i + 1).min(len - 1));
        self.list_state.select(Some(next));
    }

    pub fn select_prev(&mut self) {
        let prev = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
        if !self.dashboard.todos().is_empty() { self.list_state.select(Some(prev)); }
    }

    /// Keeps the mode and selection consistent with the dashboard after the
    /// session or the list changed underneath.
    pub fn sync(&mut self) {
        match (self.dashboard.is_authenticated(), self.mode) {
            (false, Mode::Browse | Mode::Compose) => {
                self.mode = Mode::Auth;
                self.auth_field = AuthField::Username;
            }
            (true, Mode::Auth) => {
                self.mode = Mode::Browse;
                self.draft_field = DraftField::Title;
            }
            _ => {}
        }
        let len = self.dashboard.todos().len();
        match self.list_state.selected() {
            _ if len == 0 => self.list_state.select(None),
            None => self.list_state.select(Some(0)),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            Some(_) => {}
        }
    }
}

/// Drives the dashboard until the user quits. Requests run on their own
/// tasks; the loop only ever touches the dashboard to apply completions.
pub async fn run<S, A, B>(terminal: &mut Terminal<B>, mut app: App<S>, dispatcher: Dispatcher<A>) -> anyhow::Result<()>
where
    S: TokenStore,
    A: TodoApi,
    B: Backend,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();
    if let Some(request) = app.dashboard.start() { spawn_request(&dispatcher, &tx, request); }

    while !app.quit {
        terminal.draw(|f| render::draw(f, &mut app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                // Only act on key presses; repeats and releases would duplicate input
                if key.kind == KeyEventKind::Press {
                    if let Some(request) = input::handle_key(&mut app, key) { spawn_request(&dispatcher, &tx, request); }
                }
            }
        }

        while let Ok(completion) = rx.try_recv() {
            if let Some(request) = app.dashboard.apply(completion) { spawn_request(&dispatcher, &tx, request); }
        }
        app.sync();
    }
    tracing::info!("quit");
    Ok(())
}

fn spawn_request<A: TodoApi>(dispatcher: &Dispatcher<A>, tx: &UnboundedSender<Completion>, request: Request) {
    let dispatcher = dispatcher.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let completion = dispatcher.execute(request).await;
        // The receiver only goes away when the UI has quit
        let _ = tx.send(completion);
    });
}
