use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const PRIORITIES: [&str; 3] = ["High", "Medium", "Low"];

pub const TYPES: [&str; 9] = [
    "Personal",
    "Work",
    "Academic",
    "Health",
    "Social",
    "Household",
    "Hobbies",
    "Self-Improvement",
    "Other",
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub todo_type: String,
    pub priority: String,
    pub due_date: DateTime<Utc>,
    pub description: String,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(rename = "type")]
    pub todo_type: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub todo_type: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Deserialize)]
pub struct BatchEdit {
    pub id: Uuid,
    #[serde(flatten)]
    pub changes: UpdateTodo,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    DueDateAsc,
    DueDateDesc,
    TitleAsc,
    TitleDesc,
}

#[derive(Debug, Default, Deserialize)]
pub struct Filters {
    #[serde(default)]
    pub search_key: String,
    #[serde(default)]
    pub sort_by: SortBy,
    pub priorities: Option<Vec<String>>,
    pub types: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub filters: Filters,
    pub page_number: usize,
    pub page_size: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageResult {
    pub records: Vec<Todo>,
    pub total_item_count: usize,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PicklistValue {
    pub label: String,
    pub value: String,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Todo>>>;

type ApiResult<T> = Result<T, (StatusCode, String)>;

/// Server settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub seed_demo: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            seed_demo: false,
        }
    }
}

impl ServerConfig {
    /// `PORT` (default 3000) and `TODO_SEED_DEMO` ("1" or "true").
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let port = match lookup("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(port = %raw, "invalid PORT, using default");
                defaults.port
            }),
            None => defaults.port,
        };
        let seed_demo = lookup("TODO_SEED_DEMO")
            .map(|raw| matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true"))
            .unwrap_or(defaults.seed_demo);
        Self { port, seed_demo }
    }
}

pub fn app() -> Router {
    app_with_db(Arc::new(RwLock::new(HashMap::new())))
}

pub fn app_with_db(db: Db) -> Router {
    Router::new()
        .route("/todos", post(create_todo))
        .route("/todos/query", post(query_todos))
        .route("/todos/batch", post(batch_update))
        .route("/todos/{id}", get(get_todo).put(update_todo))
        .route("/picklists/{field}", get(picklist))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_db(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_db(db)).await
}

/// A store pre-filled with one record per type, due on consecutive days.
pub fn demo_db(now: DateTime<Utc>) -> Db {
    let todos = TYPES.iter().enumerate().map(|(i, todo_type)| {
        let todo = Todo {
            id: Uuid::new_v4(),
            title: format!("{todo_type} task"),
            todo_type: todo_type.to_string(),
            priority: PRIORITIES[i % PRIORITIES.len()].to_string(),
            due_date: now + Duration::days(i as i64 + 1),
            description: String::new(),
            completed: false,
        };
        (todo.id, todo)
    });
    Arc::new(RwLock::new(todos.collect()))
}

fn unprocessable(message: impl Into<String>) -> (StatusCode, String) {
    (StatusCode::UNPROCESSABLE_ENTITY, message.into())
}

fn check_picklist(field: &str, value: Option<&String>, allowed: &[&str]) -> ApiResult<()> {
    match value {
        Some(value) if !allowed.contains(&value.as_str()) => {
            Err(unprocessable(format!("{value} is not a valid {field}")))
        }
        _ => Ok(()),
    }
}

fn validate_changes(changes: &UpdateTodo) -> ApiResult<()> {
    if let Some(title) = &changes.title {
        if title.trim().is_empty() {
            return Err(unprocessable("title must not be empty"));
        }
    }
    check_picklist("type", changes.todo_type.as_ref(), &TYPES)?;
    check_picklist("priority", changes.priority.as_ref(), &PRIORITIES)
}

fn apply_changes(todo: &mut Todo, changes: UpdateTodo) {
    if let Some(title) = changes.title {
        todo.title = title;
    }
    if let Some(todo_type) = changes.todo_type {
        todo.todo_type = todo_type;
    }
    if let Some(priority) = changes.priority {
        todo.priority = priority;
    }
    if let Some(due_date) = changes.due_date {
        todo.due_date = due_date;
    }
    if let Some(description) = changes.description {
        todo.description = description;
    }
    if let Some(completed) = changes.completed {
        todo.completed = completed;
    }
}

fn matches_filters(todo: &Todo, filters: &Filters) -> bool {
    let search = filters.search_key.to_lowercase();
    if !search.is_empty() && !todo.title.to_lowercase().contains(&search) {
        return false;
    }
    let in_facet = |facet: &Option<Vec<String>>, value: &str| {
        facet.as_ref().is_none_or(|allowed| allowed.iter().any(|v| v == value))
    };
    in_facet(&filters.priorities, &todo.priority) && in_facet(&filters.types, &todo.todo_type)
}

async fn query_todos(State(db): State<Db>, Json(query): Json<PageQuery>) -> ApiResult<Json<PageResult>> {
    if query.page_number == 0 || query.page_size == 0 {
        return Err(unprocessable("page_number and page_size must be at least 1"));
    }
    let todos = db.read().await;
    let mut matching: Vec<&Todo> = todos.values().filter(|t| matches_filters(t, &query.filters)).collect();
    matching.sort_by(|a, b| {
        let order = match query.filters.sort_by {
            SortBy::DueDateAsc => a.due_date.cmp(&b.due_date),
            SortBy::DueDateDesc => b.due_date.cmp(&a.due_date),
            SortBy::TitleAsc => a.title.cmp(&b.title),
            SortBy::TitleDesc => b.title.cmp(&a.title),
        };
        order.then_with(|| a.id.cmp(&b.id))
    });

    let total_item_count = matching.len();
    let records = matching
        .into_iter()
        .skip((query.page_number - 1).saturating_mul(query.page_size))
        .take(query.page_size)
        .cloned()
        .collect();
    tracing::debug!(
        page_number = query.page_number,
        page_size = query.page_size,
        total_item_count,
        "query"
    );
    Ok(Json(PageResult {
        records,
        total_item_count,
    }))
}

async fn batch_update(State(db): State<Db>, Json(edits): Json<Vec<BatchEdit>>) -> ApiResult<Json<Vec<Todo>>> {
    let mut todos = db.write().await;
    for edit in &edits {
        if !todos.contains_key(&edit.id) {
            return Err((StatusCode::NOT_FOUND, format!("todo {} not found", edit.id)));
        }
        validate_changes(&edit.changes)?;
    }
    let mut updated = Vec::with_capacity(edits.len());
    for edit in edits {
        if let Some(todo) = todos.get_mut(&edit.id) {
            apply_changes(todo, edit.changes);
            updated.push(todo.clone());
        }
    }
    tracing::debug!(rows = updated.len(), "batch update");
    Ok(Json(updated))
}

async fn create_todo(State(db): State<Db>, Json(input): Json<CreateTodo>) -> ApiResult<(StatusCode, Json<Todo>)> {
    if input.title.trim().is_empty() {
        return Err(unprocessable("title must not be empty"));
    }
    check_picklist("type", input.todo_type.as_ref(), &TYPES)?;
    check_picklist("priority", input.priority.as_ref(), &PRIORITIES)?;
    let todo = Todo {
        id: Uuid::new_v4(),
        title: input.title,
        todo_type: input.todo_type.unwrap_or_else(|| "Other".to_string()),
        priority: input.priority.unwrap_or_else(|| "Medium".to_string()),
        due_date: input.due_date.unwrap_or_else(Utc::now),
        description: input.description.unwrap_or_default(),
        completed: input.completed,
    };
    db.write().await.insert(todo.id, todo.clone());
    tracing::debug!(id = %todo.id, "created");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn get_todo(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<Json<Todo>, StatusCode> {
    let todos = db.read().await;
    todos.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTodo>,
) -> ApiResult<Json<Todo>> {
    let mut todos = db.write().await;
    let todo = todos
        .get_mut(&id)
        .ok_or((StatusCode::NOT_FOUND, format!("todo {id} not found")))?;
    validate_changes(&input)?;
    apply_changes(todo, input);
    tracing::debug!(%id, "updated");
    Ok(Json(todo.clone()))
}

async fn picklist(Path(field): Path<String>) -> Result<Json<Vec<PicklistValue>>, StatusCode> {
    let values: &[&str] = match field.as_str() {
        "priority" => &PRIORITIES,
        "type" => &TYPES,
        _ => return Err(StatusCode::NOT_FOUND),
    };
    Ok(Json(
        values
            .iter()
            .map(|v| PicklistValue {
                label: v.to_string(),
                value: v.to_string(),
            })
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(title: &str, priority: &str, todo_type: &str) -> Todo {
        Todo {
            id: Uuid::new_v4(),
            title: title.to_string(),
            todo_type: todo_type.to_string(),
            priority: priority.to_string(),
            due_date: Utc::now(),
            description: String::new(),
            completed: false,
        }
    }

    #[test]
    fn todo_serializes_type_field() {
        let json = serde_json::to_value(todo("Test", "High", "Work")).unwrap();
        assert_eq!(json["title"], "Test");
        assert_eq!(json["type"], "Work");
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let filters = Filters {
            search_key: "MILK".to_string(),
            ..Filters::default()
        };
        assert!(matches_filters(&todo("Buy milk", "Low", "Household"), &filters));
        assert!(!matches_filters(&todo("Buy bread", "Low", "Household"), &filters));
    }

    #[test]
    fn absent_facet_matches_all_but_empty_facet_matches_none() {
        let t = todo("Gym", "High", "Health");
        assert!(matches_filters(&t, &Filters::default()));

        let empty = Filters {
            priorities: Some(Vec::new()),
            types: Some(TYPES.iter().map(|s| s.to_string()).collect()),
            ..Filters::default()
        };
        assert!(!matches_filters(&t, &empty));
    }

    #[test]
    fn filters_default_missing_fields() {
        let filters: Filters = serde_json::from_str(r#"{"priorities":["High"]}"#).unwrap();
        assert_eq!(filters.sort_by, SortBy::DueDateAsc);
        assert!(filters.types.is_none());
    }

    #[test]
    fn batch_edit_flattens_changes() {
        let edit: BatchEdit =
            serde_json::from_str(r#"{"id":"00000000-0000-0000-0000-000000000000","completed":true}"#).unwrap();
        assert_eq!(edit.changes.completed, Some(true));
        assert!(edit.changes.title.is_none());
    }

    #[test]
    fn validation_rejects_blank_title_and_unknown_picklist_values() {
        let blank = UpdateTodo {
            title: Some("  ".to_string()),
            ..UpdateTodo::default()
        };
        assert_eq!(validate_changes(&blank).unwrap_err().0, StatusCode::UNPROCESSABLE_ENTITY);

        let bad_priority = UpdateTodo {
            priority: Some("Urgent".to_string()),
            ..UpdateTodo::default()
        };
        assert!(validate_changes(&bad_priority).is_err());
    }

    #[test]
    fn config_reads_lookup() {
        let config = ServerConfig::from_lookup(|key| match key {
            "PORT" => Some("4100".to_string()),
            "TODO_SEED_DEMO" => Some("TRUE".to_string()),
            _ => None,
        });
        assert_eq!(config, ServerConfig { port: 4100, seed_demo: true });

        let fallback = ServerConfig::from_lookup(|key| (key == "PORT").then(|| "nope".to_string()));
        assert_eq!(fallback, ServerConfig::default());
    }

    #[test]
    fn demo_db_has_one_record_per_type() {
        let db = demo_db(Utc::now());
        assert_eq!(db.try_read().unwrap().len(), TYPES.len());
    }
}
