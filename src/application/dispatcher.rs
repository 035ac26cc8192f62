use std::sync::Arc;

use super::dashboard::{Completion, Dashboard, Request};
use crate::domain::{api::TodoApi, storage::TokenStore};

/// Runs dashboard requests against a [`TodoApi`], one call per request.
pub struct Dispatcher<A: TodoApi> {
    api: Arc<A>,
}

impl<A: TodoApi> Clone for Dispatcher<A> {
    fn clone(&self) -> Self { Self { api: Arc::clone(&self.api) } }
}

impl<A: TodoApi> Dispatcher<A> {
    pub fn new(api: A) -> Self { Self { api: Arc::new(api) } }

    #[tracing::instrument(skip_all)]
    pub async fn execute(&self, request: Request) -> Completion {
        match request {
            Request::Register(credentials) => {
                tracing::debug!(username = %credentials.username, "register");
                Completion::Registered(self.api.register(&credentials).await)
            }
            Request::Login(credentials) => {
                tracing::debug!(username = %credentials.username, "login");
                Completion::LoggedIn(self.api.login(&credentials).await)
            }
            Request::FetchTodos { epoch, seq, token, query } => {
                tracing::debug!(seq, ?query, "list todos");
                Completion::Fetched { epoch, seq, result: self.api.list_todos(&token, &query).await }
            }
            Request::CreateTodo { epoch, token, input } => {
                tracing::debug!(title = %input.title, "create todo");
                Completion::Created { epoch, result: self.api.create_todo(&token, &input).await }
            }
            Request::SetDone { epoch, token, todo } => {
                tracing::debug!(id = %todo.id, done = !todo.done, "set done");
                Completion::Updated { epoch, id: todo.id, result: self.api.set_done(&token, &todo).await }
            }
            Request::DeleteTodo { epoch, token, id } => {
                tracing::debug!(%id, "delete todo");
                Completion::Deleted { epoch, id, result: self.api.delete_todo(&token, id).await }
            }
        }
    }

    /// Executes `request` and every follow-up it produces, in order.
    pub async fn settle<S: TokenStore>(&self, dashboard: &mut Dashboard<S>, request: Option<Request>) {
        let mut next = request;
        while let Some(request) = next {
            let completion = self.execute(request).await;
            next = dashboard.apply(completion);
        }
    }
}
