use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    routing::{post, put},
    Json, Router,
};
use serde_json::{json, Value};

/// One request as the fake server saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    #[allow(dead_code)]
    pub method: &'static str,
    #[allow(dead_code)]
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    #[allow(dead_code)]
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct ServerState {
    users: HashMap<String, String>,
    todos: Vec<Value>,
    next_id: i64,
    pub requests: Vec<Recorded>,
}

type Shared = Arc<Mutex<ServerState>>;
type Reply = (StatusCode, Json<Value>);

/// In-memory stand-in for the todo REST API, mounted under `/api/v1`.
pub struct FakeServer {
    pub base_url: String,
    #[allow(dead_code)]
    pub addr: SocketAddr,
    state: Shared,
}

impl FakeServer {
    pub async fn start() -> Self {
        let state: Shared = Arc::default();
        let api = Router::new()
            .route("/auth/register", post(register))
            .route("/auth/login", post(login))
            .route("/todos", post(create_todo).get(list_todos))
            .route("/todos/:id", put(update_todo).delete(delete_todo))
            .with_state(state.clone());
        let app = Router::new()
            .nest("/api/v1", api)
            .route("/broken/auth/login", post(|| async { (StatusCode::BAD_GATEWAY, "<html>bad gateway</html>") }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        Self { base_url: format!("http://{addr}/api/v1"), addr, state }
    }

    pub fn requests(&self) -> Vec<Recorded> { self.state.lock().unwrap().requests.clone() }

    pub fn last_request(&self) -> Recorded { self.requests().pop().expect("no request recorded") }
}

/// A base URL nothing listens on.
#[allow(dead_code)]
pub async fn dead_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/v1")
}

fn ok(status: StatusCode, message: &str, data: Value) -> Reply {
    (status, Json(json!({ "success": true, "message": message, "data": data })))
}

fn error(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({ "success": false, "message": message, "data": null })))
}

fn record(state: &Shared, method: &'static str, path: String, query: Option<String>, headers: &HeaderMap, body: Option<Value>) {
    let authorization = headers.get("authorization").and_then(|v| v.to_str().ok()).map(str::to_string);
    state.lock().unwrap().requests.push(Recorded { method, path, query, authorization, body });
}

fn owner(headers: &HeaderMap) -> Result<String, Reply> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer token-"))
        .map(str::to_string)
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Missing Authorization Header"))
}

async fn register(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    record(&state, "POST", "/auth/register".into(), None, &headers, Some(body.clone()));
    let (Some(username), Some(password)) = (body["username"].as_str(), body["password"].as_str()) else {
        return error(StatusCode::BAD_REQUEST, "username and password are required");
    };
    let mut s = state.lock().unwrap();
    if s.users.contains_key(username) { return error(StatusCode::BAD_REQUEST, "user already exists"); }
    s.users.insert(username.to_string(), password.to_string());
    ok(StatusCode::CREATED, "user created", Value::Null)
}

async fn login(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    record(&state, "POST", "/auth/login".into(), None, &headers, Some(body.clone()));
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    let s = state.lock().unwrap();
    match s.users.get(username) {
        Some(stored) if stored == password => ok(StatusCode::OK, "login success", json!({ "access_token": format!("token-{username}") })),
        _ => error(StatusCode::UNAUTHORIZED, "invalid credentials"),
    }
}

async fn list_todos(State(state): State<Shared>, headers: HeaderMap, RawQuery(query): RawQuery) -> Reply {
    record(&state, "GET", "/todos".into(), query.clone(), &headers, None);
    let user = match owner(&headers) { Ok(u) => u, Err(reply) => return reply };
    let params: HashMap<String, String> = query
        .as_deref()
        .unwrap_or_default()
        .split('&')
        .filter_map(|kv| kv.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let s = state.lock().unwrap();
    let mut items: Vec<Value> = s.todos.iter()
        .filter(|t| t["user"] == user.as_str())
        .filter(|t| params.get("done").map_or(true, |d| t["done"].to_string() == *d))
        .filter(|t| params.get("priority").map_or(true, |p| t["priority"] == p.as_str()))
        .cloned()
        .collect();
    items.reverse();
    match params.get("order").map(String::as_str) {
        Some("asc") => items.sort_by(|a, b| a["due_date"].as_str().cmp(&b["due_date"].as_str())),
        Some("desc") => items.sort_by(|a, b| b["due_date"].as_str().cmp(&a["due_date"].as_str())),
        _ => {}
    }
    ok(StatusCode::OK, "todos fetched", Value::Array(items.into_iter().map(public).collect()))
}

async fn create_todo(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    record(&state, "POST", "/todos".into(), None, &headers, Some(body.clone()));
    let user = match owner(&headers) { Ok(u) => u, Err(reply) => return reply };
    let Some(title) = body["title"].as_str().filter(|t| !t.is_empty()) else {
        return error(StatusCode::BAD_REQUEST, "title is required and must be a string");
    };
    let mut s = state.lock().unwrap();
    s.next_id += 1;
    let todo = json!({
        "id": s.next_id,
        "title": title,
        "done": false,
        "user_id": 1,
        "user": user,
        "created_at": "2024-05-01T10:00:00",
        "description": body.get("description").cloned().unwrap_or(Value::Null),
        "priority": body.get("priority").cloned().unwrap_or(json!("normal")),
        "due_date": body.get("due_date").cloned().unwrap_or(Value::Null),
    });
    s.todos.push(todo.clone());
    ok(StatusCode::CREATED, "todo created", public(todo))
}

async fn update_todo(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>, Json(body): Json<Value>) -> Reply {
    record(&state, "PUT", format!("/todos/{id}"), None, &headers, Some(body.clone()));
    let user = match owner(&headers) { Ok(u) => u, Err(reply) => return reply };
    let mut s = state.lock().unwrap();
    let Some(todo) = s.todos.iter_mut().find(|t| t["id"] == id && t["user"] == user.as_str()) else {
        return error(StatusCode::NOT_FOUND, "todo not found");
    };
    if let Some(done) = body.get("done") {
        let Some(done) = done.as_bool() else { return error(StatusCode::BAD_REQUEST, "done must be a boolean") };
        todo["done"] = json!(done);
    }
    ok(StatusCode::OK, "todo updated", public(todo.clone()))
}

async fn delete_todo(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Reply {
    record(&state, "DELETE", format!("/todos/{id}"), None, &headers, None);
    let user = match owner(&headers) { Ok(u) => u, Err(reply) => return reply };
    let mut s = state.lock().unwrap();
    let before = s.todos.len();
    s.todos.retain(|t| !(t["id"] == id && t["user"] == user.as_str()));
    if s.todos.len() == before { return error(StatusCode::NOT_FOUND, "todo not found"); }
    ok(StatusCode::OK, "todo deleted", Value::Null)
}

fn public(mut todo: Value) -> Value {
    if let Some(obj) = todo.as_object_mut() { obj.remove("user"); }
    todo
}
