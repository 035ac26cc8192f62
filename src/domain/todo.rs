use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TodoId(pub i64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self { Priority::Low => "low", Priority::Normal => "normal", Priority::High => "high" }
    }

    pub fn next(self) -> Self {
        match self { Priority::Low => Priority::Normal, Priority::Normal => Priority::High, Priority::High => Priority::Low }
    }

    pub fn prev(self) -> Self {
        match self { Priority::Low => Priority::High, Priority::Normal => Priority::Low, Priority::High => Priority::Normal }
    }
}

/// A task as the server returns it. Optional columns the server may leave out
/// decode to their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
}

/// Body of `POST /todos`. Absent optionals are left out of the JSON entirely.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreateTodo {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct UpdateTodo {
    pub done: bool,
}

impl UpdateTodo {
    pub fn toggled(todo: &Todo) -> Self { Self { done: !todo.done } }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DoneFilter {
    #[default]
    All,
    Done,
    Undone,
}

impl DoneFilter {
    pub fn next(self) -> Self {
        match self { DoneFilter::All => DoneFilter::Undone, DoneFilter::Undone => DoneFilter::Done, DoneFilter::Done => DoneFilter::All }
    }

    pub fn label(self) -> &'static str {
        match self { DoneFilter::All => "all", DoneFilter::Done => "done", DoneFilter::Undone => "undone" }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn next(self) -> Self {
        match self {
            PriorityFilter::All => PriorityFilter::Only(Priority::High),
            PriorityFilter::Only(Priority::High) => PriorityFilter::Only(Priority::Normal),
            PriorityFilter::Only(Priority::Normal) => PriorityFilter::Only(Priority::Low),
            PriorityFilter::Only(Priority::Low) => PriorityFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self { PriorityFilter::All => "all", PriorityFilter::Only(p) => p.as_str() }
    }
}

/// Due-date ordering of the list. Descending is what the server does when
/// no order is requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self { SortOrder::Asc => SortOrder::Desc, SortOrder::Desc => SortOrder::Asc }
    }

    pub fn as_str(self) -> &'static str {
        match self { SortOrder::Asc => "asc", SortOrder::Desc => "desc" }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Filters {
    pub done: DoneFilter,
    pub priority: PriorityFilter,
    pub order: SortOrder,
}

impl Filters {
    /// Only criteria that differ from the defaults end up in the query.
    pub fn to_query(self) -> TodoQuery {
        TodoQuery {
            done: match self.done { DoneFilter::All => None, DoneFilter::Done => Some(true), DoneFilter::Undone => Some(false) },
            priority: match self.priority { PriorityFilter::All => None, PriorityFilter::Only(p) => Some(p) },
            order: (self.order != SortOrder::default()).then_some(self.order),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoQuery {
    pub done: Option<bool>,
    pub priority: Option<Priority>,
    pub order: Option<SortOrder>,
}

impl TodoQuery {
    pub fn pairs(&self) -> Vec<(&'static str, &'static str)> {
        let mut pairs = Vec::new();
        if let Some(done) = self.done { pairs.push(("done", if done { "true" } else { "false" })); }
        if let Some(p) = self.priority { pairs.push(("priority", p.as_str())); }
        if let Some(o) = self.order { pairs.push(("order", o.as_str())); }
        pairs
    }
}
