use async_trait::async_trait;

use super::envelope::Envelope;
use super::todo::{AccessToken, CreateTodo, Credentials, Todo, TodoId, TodoQuery};
use crate::error::ApiError;

/// The remote todo service. Every call answers with the server's envelope,
/// whatever the HTTP status; `Err` means no envelope could be obtained.
#[async_trait]
pub trait TodoApi: Send + Sync + 'static {
    async fn register(&self, credentials: &Credentials) -> Result<Envelope<()>, ApiError>;
    async fn login(&self, credentials: &Credentials) -> Result<Envelope<AccessToken>, ApiError>;
    async fn list_todos(&self, token: &str, query: &TodoQuery) -> Result<Envelope<Vec<Todo>>, ApiError>;
    async fn create_todo(&self, token: &str, input: &CreateTodo) -> Result<Envelope<Todo>, ApiError>;
    /// Sends the negation of `todo.done`.
    async fn set_done(&self, token: &str, todo: &Todo) -> Result<Envelope<Todo>, ApiError>;
    async fn delete_todo(&self, token: &str, id: TodoId) -> Result<Envelope<()>, ApiError>;
}
