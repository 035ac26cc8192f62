use super::session::Session;
use crate::domain::{
    envelope::Envelope,
    storage::TokenStore,
    todo::{AccessToken, CreateTodo, Credentials, DoneFilter, Filters, Priority, PriorityFilter, SortOrder, Todo, TodoId, TodoQuery},
};
use crate::error::ApiError;

pub mod messages {
    pub const CREDENTIALS_REQUIRED: &str = "username and password are required";
    pub const REGISTERED: &str = "Registration succeeded. Please log in.";
    pub const REGISTER_FAILED: &str = "registration failed";
    pub const REGISTER_ERROR: &str = "An error occurred during registration.";
    pub const LOGGED_IN: &str = "Login succeeded.";
    pub const LOGIN_FAILED: &str = "login failed";
    pub const LOGIN_ERROR: &str = "An error occurred during login.";
    pub const FETCH_FAILED: &str = "failed to fetch todos";
    pub const TITLE_REQUIRED: &str = "Enter a title for the task.";
    pub const CREATE_FAILED: &str = "failed to create task";
    pub const CREATE_ERROR: &str = "An error occurred while creating the task.";
    pub const UPDATE_FAILED: &str = "failed to update task";
    pub const UPDATE_ERROR: &str = "An error occurred while updating the task.";
    pub const DELETE_FAILED: &str = "failed to delete task";
    pub const DELETE_ERROR: &str = "An error occurred while deleting the task.";
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthPhase {
    #[default]
    Idle,
    Registering,
    LoggingIn,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListPhase {
    #[default]
    Idle,
    /// Only the fetch stamped `seq` may replace the list.
    Loading { seq: u64 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CreatePhase {
    #[default]
    Idle,
    Submitting,
}

/// Inputs of the new-task form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: String,
}

/// An API call the dashboard wants made. Task requests carry the session
/// epoch they were issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Register(Credentials),
    Login(Credentials),
    FetchTodos { epoch: u64, seq: u64, token: String, query: TodoQuery },
    CreateTodo { epoch: u64, token: String, input: CreateTodo },
    SetDone { epoch: u64, token: String, todo: Todo },
    DeleteTodo { epoch: u64, token: String, id: TodoId },
}

/// The outcome of a [`Request`], handed back to [`Dashboard::apply`].
#[derive(Debug)]
pub enum Completion {
    Registered(Result<Envelope<()>, ApiError>),
    LoggedIn(Result<Envelope<AccessToken>, ApiError>),
    Fetched { epoch: u64, seq: u64, result: Result<Envelope<Vec<Todo>>, ApiError> },
    Created { epoch: u64, result: Result<Envelope<Todo>, ApiError> },
    Updated { epoch: u64, id: TodoId, result: Result<Envelope<Todo>, ApiError> },
    Deleted { epoch: u64, id: TodoId, result: Result<Envelope<()>, ApiError> },
}

/// All user-facing state of the todo front end.
///
/// User actions return the [`Request`] to run, if any; results come back
/// through [`Dashboard::apply`]. The task list only ever changes from a
/// successful response, and is empty whenever nobody is signed in.
pub struct Dashboard<S: TokenStore> {
    session: Session<S>,
    username: String,
    password: String,
    auth_phase: AuthPhase,
    auth_message: Option<String>,
    todos: Vec<Todo>,
    list_phase: ListPhase,
    last_seq: u64,
    todo_message: Option<String>,
    draft: Draft,
    create_phase: CreatePhase,
    filters: Filters,
}

impl<S: TokenStore> Dashboard<S> {
    pub fn new(session: Session<S>) -> Self {
        Self {
            session,
            username: String::new(),
            password: String::new(),
            auth_phase: AuthPhase::Idle,
            auth_message: None,
            todos: Vec::new(),
            list_phase: ListPhase::Idle,
            last_seq: 0,
            todo_message: None,
            draft: Draft::default(),
            create_phase: CreatePhase::Idle,
            filters: Filters::default(),
        }
    }

    /// The initial fetch for a restored session.
    pub fn start(&mut self) -> Option<Request> { self.refresh() }

    pub fn session(&self) -> &Session<S> { &self.session }
    pub fn is_authenticated(&self) -> bool { self.session.is_authenticated() }
    pub fn todos(&self) -> &[Todo] { &self.todos }
    pub fn filters(&self) -> Filters { self.filters }
    pub fn draft(&self) -> &Draft { &self.draft }
    pub fn username(&self) -> &str { &self.username }
    pub fn password(&self) -> &str { &self.password }
    pub fn auth_phase(&self) -> AuthPhase { self.auth_phase }
    pub fn list_phase(&self) -> ListPhase { self.list_phase }
    pub fn create_phase(&self) -> CreatePhase { self.create_phase }
    pub fn auth_message(&self) -> Option<&str> { self.auth_message.as_deref() }
    pub fn todo_message(&self) -> Option<&str> { self.todo_message.as_deref() }
    pub fn is_loading(&self) -> bool { matches!(self.list_phase, ListPhase::Loading { .. }) }

    pub fn set_username(&mut self, value: impl Into<String>) {
        if self.auth_phase == AuthPhase::Idle { self.username = value.into(); }
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        if self.auth_phase == AuthPhase::Idle { self.password = value.into(); }
    }

    /// Applies `edit` to the draft unless a create is in flight.
    pub fn edit_draft(&mut self, edit: impl FnOnce(&mut Draft)) -> bool {
        if self.create_phase == CreatePhase::Submitting { return false; }
        edit(&mut self.draft);
        true
    }

    pub fn submit_register(&mut self) -> Option<Request> {
        let credentials = self.begin_auth(AuthPhase::Registering)?;
        Some(Request::Register(credentials))
    }

    pub fn submit_login(&mut self) -> Option<Request> {
        let credentials = self.begin_auth(AuthPhase::LoggingIn)?;
        Some(Request::Login(credentials))
    }

    /// Register and login are only offered while signed out.
    fn begin_auth(&mut self, phase: AuthPhase) -> Option<Credentials> {
        if self.session.is_authenticated() || self.auth_phase != AuthPhase::Idle { return None; }
        if self.username.trim().is_empty() || self.password.trim().is_empty() {
            self.auth_message = Some(messages::CREDENTIALS_REQUIRED.to_string());
            return None;
        }
        self.auth_message = None;
        self.auth_phase = phase;
        Some(Credentials { username: self.username.clone(), password: self.password.clone() })
    }

    pub fn logout(&mut self) {
        self.session.sign_out();
        self.todos.clear();
        self.list_phase = ListPhase::Idle;
        self.create_phase = CreatePhase::Idle;
        self.auth_message = None;
        self.todo_message = None;
        tracing::info!("logged out");
    }

    pub fn set_done_filter(&mut self, done: DoneFilter) -> Option<Request> {
        if self.filters.done == done { return None; }
        self.filters.done = done;
        self.refresh()
    }

    pub fn set_priority_filter(&mut self, priority: PriorityFilter) -> Option<Request> {
        if self.filters.priority == priority { return None; }
        self.filters.priority = priority;
        self.refresh()
    }

    pub fn set_order(&mut self, order: SortOrder) -> Option<Request> {
        if self.filters.order == order { return None; }
        self.filters.order = order;
        self.refresh()
    }

    /// Starts a list fetch for the current filters, superseding any fetch
    /// still in flight. Nothing happens while signed out.
    pub fn refresh(&mut self) -> Option<Request> {
        let token = self.session.token()?.to_string();
        self.last_seq += 1;
        self.list_phase = ListPhase::Loading { seq: self.last_seq };
        Some(Request::FetchTodos { epoch: self.session.epoch(), seq: self.last_seq, token, query: self.filters.to_query() })
    }

    pub fn submit_create(&mut self) -> Option<Request> {
        let token = self.session.token()?.to_string();
        if self.create_phase == CreatePhase::Submitting { return None; }
        let title = self.draft.title.trim();
        if title.is_empty() {
            self.todo_message = Some(messages::TITLE_REQUIRED.to_string());
            return None;
        }
        let input = CreateTodo {
            title: title.to_string(),
            description: non_empty(&self.draft.description),
            priority: Some(self.draft.priority),
            due_date: non_empty(&self.draft.due_date),
        };
        self.create_phase = CreatePhase::Submitting;
        Some(Request::CreateTodo { epoch: self.session.epoch(), token, input })
    }

    pub fn toggle(&mut self, id: TodoId) -> Option<Request> {
        let token = self.session.token()?.to_string();
        let todo = self.todos.iter().find(|t| t.id == id)?.clone();
        Some(Request::SetDone { epoch: self.session.epoch(), token, todo })
    }

    pub fn delete(&mut self, id: TodoId) -> Option<Request> {
        let token = self.session.token()?.to_string();
        Some(Request::DeleteTodo { epoch: self.session.epoch(), token, id })
    }

    /// Folds a finished request into the state. A successful login yields the
    /// list fetch for the new session.
    pub fn apply(&mut self, completion: Completion) -> Option<Request> {
        match completion {
            Completion::Registered(result) => {
                self.auth_phase = AuthPhase::Idle;
                self.auth_message = Some(match result {
                    Ok(envelope) => match envelope.into_result(messages::REGISTER_FAILED) {
                        Ok(_) => messages::REGISTERED.to_string(),
                        Err(message) => message,
                    },
                    Err(e) => {
                        tracing::error!(error = %e, "register request failed");
                        messages::REGISTER_ERROR.to_string()
                    }
                });
                None
            }
            Completion::LoggedIn(result) => {
                self.auth_phase = AuthPhase::Idle;
                let token = match result {
                    Ok(envelope) => match envelope.into_result(messages::LOGIN_FAILED) {
                        Ok(Some(AccessToken { access_token })) if !access_token.is_empty() => Ok(access_token),
                        Ok(_) => Err(messages::LOGIN_FAILED.to_string()),
                        Err(message) => Err(message),
                    },
                    Err(e) => {
                        tracing::error!(error = %e, "login request failed");
                        Err(messages::LOGIN_ERROR.to_string())
                    }
                };
                match token {
                    Ok(token) => {
                        tracing::info!(username = %self.username, "logged in");
                        self.session.sign_in(token);
                        self.todos.clear();
                        self.create_phase = CreatePhase::Idle;
                        self.auth_message = Some(messages::LOGGED_IN.to_string());
                        self.refresh()
                    }
                    Err(message) => {
                        tracing::warn!(%message, "login rejected");
                        self.auth_message = Some(message);
                        None
                    }
                }
            }
            Completion::Fetched { epoch, seq, result } => {
                if !self.is_current(epoch) || self.list_phase != (ListPhase::Loading { seq }) {
                    tracing::debug!(seq, "discarding superseded list response");
                    return None;
                }
                self.list_phase = ListPhase::Idle;
                match result {
                    Ok(envelope) => match envelope.into_result(messages::FETCH_FAILED) {
                        Ok(todos) => {
                            self.todos = todos.unwrap_or_default();
                            self.todo_message = None;
                        }
                        Err(message) => self.fail_todo(message),
                    },
                    Err(e) => {
                        tracing::error!(error = %e, "list request failed");
                        self.todo_message = Some(messages::FETCH_FAILED.to_string());
                    }
                }
                None
            }
            Completion::Created { epoch, result } => {
                if !self.is_current(epoch) { return None; }
                self.create_phase = CreatePhase::Idle;
                match result {
                    Ok(envelope) => match envelope.into_result(messages::CREATE_FAILED) {
                        Ok(Some(todo)) => {
                            tracing::info!(id = %todo.id, "task created");
                            self.todos.insert(0, todo);
                            self.draft = Draft::default();
                            self.todo_message = None;
                        }
                        Ok(None) => self.fail_todo(messages::CREATE_FAILED.to_string()),
                        Err(message) => self.fail_todo(message),
                    },
                    Err(e) => {
                        tracing::error!(error = %e, "create request failed");
                        self.todo_message = Some(messages::CREATE_ERROR.to_string());
                    }
                }
                None
            }
            Completion::Updated { epoch, id, result } => {
                if !self.is_current(epoch) { return None; }
                match result {
                    Ok(envelope) => match envelope.into_result(messages::UPDATE_FAILED) {
                        Ok(Some(updated)) => {
                            tracing::info!(%id, done = updated.done, "task updated");
                            if let Some(slot) = self.todos.iter_mut().find(|t| t.id == id) { *slot = updated; }
                        }
                        Ok(None) => self.fail_todo(messages::UPDATE_FAILED.to_string()),
                        Err(message) => self.fail_todo(message),
                    },
                    Err(e) => {
                        tracing::error!(error = %e, "update request failed");
                        self.todo_message = Some(messages::UPDATE_ERROR.to_string());
                    }
                }
                None
            }
            Completion::Deleted { epoch, id, result } => {
                if !self.is_current(epoch) { return None; }
                match result {
                    Ok(envelope) => match envelope.into_result(messages::DELETE_FAILED) {
                        Ok(_) => {
                            tracing::info!(%id, "task deleted");
                            self.todos.retain(|t| t.id != id);
                        }
                        Err(message) => self.fail_todo(message),
                    },
                    Err(e) => {
                        tracing::error!(error = %e, "delete request failed");
                        self.todo_message = Some(messages::DELETE_ERROR.to_string());
                    }
                }
                None
            }
        }
    }

    fn is_current(&self, epoch: u64) -> bool {
        let current = self.session.is_authenticated() && epoch == self.session.epoch();
        if !current { tracing::debug!(epoch, "discarding response from an ended session"); }
        current
    }

    fn fail_todo(&mut self, message: String) {
        tracing::warn!(%message, "server rejected task request");
        self.todo_message = Some(message);
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
