//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::filter::FilterState;

/// A single todo record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub todo_type: String,
    pub priority: String,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    pub completed: bool,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub todo_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Field changes for an existing todo. Only the fields present in the JSON
/// are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub todo_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoChanges {
    pub fn is_empty(&self) -> bool {
        *self == TodoChanges::default()
    }

    /// Write every set field into `todo`.
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(todo_type) = &self.todo_type {
            todo.todo_type = todo_type.clone();
        }
        if let Some(priority) = &self.priority {
            todo.priority = priority.clone();
        }
        if let Some(due_date) = self.due_date {
            todo.due_date = due_date;
        }
        if let Some(description) = &self.description {
            todo.description = description.clone();
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
    }

    /// Overlay `newer` on top of `self`; fields set in `newer` win.
    pub fn merge(&mut self, newer: TodoChanges) {
        if newer.title.is_some() {
            self.title = newer.title;
        }
        if newer.todo_type.is_some() {
            self.todo_type = newer.todo_type;
        }
        if newer.priority.is_some() {
            self.priority = newer.priority;
        }
        if newer.due_date.is_some() {
            self.due_date = newer.due_date;
        }
        if newer.description.is_some() {
            self.description = newer.description;
        }
        if newer.completed.is_some() {
            self.completed = newer.completed;
        }
    }
}

/// One row of a batch write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordEdit {
    pub id: Uuid,
    #[serde(flatten)]
    pub changes: TodoChanges,
}

impl RecordEdit {
    pub fn new(id: Uuid, changes: TodoChanges) -> Self {
        Self { id, changes }
    }
}

/// The ids touched by a batch, deduplicated.
pub fn edited_ids(edits: &[RecordEdit]) -> BTreeSet<Uuid> {
    edits.iter().map(|edit| edit.id).collect()
}

/// A page query for the data source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageRequest {
    pub filters: FilterState,
    pub page_number: usize,
    pub page_size: usize,
}

/// One page of records and the total number of matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageResult {
    pub records: Vec<Todo>,
    pub total_item_count: usize,
}

/// One allowed value of a picklist field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PicklistValue {
    pub label: String,
    pub value: String,
}
