use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::domain::{
    api::TodoApi,
    envelope::Envelope,
    todo::{AccessToken, CreateTodo, Credentials, Todo, TodoId, TodoQuery, UpdateTodo},
};
use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api/v1";

#[derive(Clone)]
pub struct HttpTodoApi {
    client: Client,
    base_url: String,
}

impl HttpTodoApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        Url::parse(trimmed).map_err(|e| ApiError::BaseUrl { url: base_url.to_string(), reason: e.to_string() })?;
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base_url: trimmed.to_string() })
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    fn url(&self, path: &str) -> String { format!("{}{}", self.base_url, path) }

    /// The server answers with an envelope on 2xx and 4xx alike, so the status
    /// only matters for diagnostics.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Envelope<T>, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, "request failed");
            ApiError::Transport(e)
        })?;
        let status = response.status();
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| {
            tracing::error!(status = status.as_u16(), error = %source, "response is not an envelope");
            ApiError::Decode { status: status.as_u16(), source }
        })
    }
}

#[async_trait]
impl TodoApi for HttpTodoApi {
    async fn register(&self, credentials: &Credentials) -> Result<Envelope<()>, ApiError> {
        self.send(self.client.post(self.url("/auth/register")).json(credentials)).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<Envelope<AccessToken>, ApiError> {
        self.send(self.client.post(self.url("/auth/login")).json(credentials)).await
    }

    async fn list_todos(&self, token: &str, query: &TodoQuery) -> Result<Envelope<Vec<Todo>>, ApiError> {
        let mut request = self.client.get(self.url("/todos")).bearer_auth(token);
        let pairs = query.pairs();
        if !pairs.is_empty() { request = request.query(&pairs); }
        self.send(request).await
    }

    async fn create_todo(&self, token: &str, input: &CreateTodo) -> Result<Envelope<Todo>, ApiError> {
        self.send(self.client.post(self.url("/todos")).bearer_auth(token).json(input)).await
    }

    async fn set_done(&self, token: &str, todo: &Todo) -> Result<Envelope<Todo>, ApiError> {
        let body = UpdateTodo::toggled(todo);
        self.send(self.client.put(self.url(&format!("/todos/{}", todo.id))).bearer_auth(token).json(&body)).await
    }

    async fn delete_todo(&self, token: &str, id: TodoId) -> Result<Envelope<()>, ApiError> {
        self.send(self.client.delete(self.url(&format!("/todos/{id}"))).bearer_auth(token)).await
    }
}
