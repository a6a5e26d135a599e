//! Collaborator contracts consumed by the core.
//!
//! # Design
//! The list view, publisher and card presenter never talk to the network
//! themselves. They call these traits, and `RemoteBackend` implements the
//! request/response ones by pairing `TodoClient` with a host `Transport`.
//! Cache notifications and toasts are fire-and-forget sinks.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::client::TodoClient;
use crate::error::{DataAccessError, MetadataError, WriteError};
use crate::filter::FacetField;
use crate::http::Transport;
use crate::types::{PageRequest, PageResult, PicklistValue, RecordEdit, Todo, TodoChanges};

/// Paginated query service.
pub trait ListDataSource {
    fn query(&mut self, request: &PageRequest) -> Result<PageResult, DataAccessError>;
}

/// Record writes.
pub trait WriteService {
    /// Apply every edit or none of them.
    fn write_batch(&mut self, edits: &[RecordEdit]) -> Result<(), WriteError>;

    fn update_record(&mut self, id: Uuid, changes: &TodoChanges) -> Result<Todo, WriteError>;
}

/// Tells other readers of the same records that they changed.
pub trait CacheNotifier {
    fn notify_changed(&mut self, ids: &BTreeSet<Uuid>);
}

/// Supplies the full universe of values for a picklist field.
pub trait PicklistProvider {
    fn allowed_values(&mut self, field: FacetField) -> Result<Vec<PicklistValue>, MetadataError>;
}

/// User-visible notifications.
pub trait ToastSink {
    fn notify(&mut self, toast: Toast);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToastMode {
    #[default]
    Dismissible,
    Sticky,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub mode: ToastMode,
}

impl Toast {
    pub fn new(title: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity,
            mode: ToastMode::Dismissible,
        }
    }

    pub fn sticky(mut self) -> Self {
        self.mode = ToastMode::Sticky;
        self
    }
}

/// Toast sink that keeps everything it receives, newest last.
#[derive(Debug, Default)]
pub struct ToastLog {
    pub toasts: Vec<Toast>,
}

impl ToastSink for ToastLog {
    fn notify(&mut self, toast: Toast) {
        self.toasts.push(toast);
    }
}

/// Remote implementation of the request/response collaborators.
#[derive(Debug)]
pub struct RemoteBackend<T> {
    client: TodoClient,
    transport: T,
}

impl<T: Transport> RemoteBackend<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

impl<T: Transport> ListDataSource for RemoteBackend<T> {
    fn query(&mut self, request: &PageRequest) -> Result<PageResult, DataAccessError> {
        let req = self.client.build_query_page(request)?;
        let response = self.transport.execute(req)?;
        Ok(self.client.parse_query_page(response)?)
    }
}

impl<T: Transport> WriteService for RemoteBackend<T> {
    fn write_batch(&mut self, edits: &[RecordEdit]) -> Result<(), WriteError> {
        let req = self.client.build_write_batch(edits)?;
        let response = self.transport.execute(req)?;
        self.client.parse_write_batch(response)?;
        Ok(())
    }

    fn update_record(&mut self, id: Uuid, changes: &TodoChanges) -> Result<Todo, WriteError> {
        let req = self.client.build_update_todo(id, changes)?;
        let response = self.transport.execute(req)?;
        Ok(self.client.parse_update_todo(response)?)
    }
}

impl<T: Transport> PicklistProvider for RemoteBackend<T> {
    fn allowed_values(&mut self, field: FacetField) -> Result<Vec<PicklistValue>, MetadataError> {
        let unavailable = |reason: String| MetadataError::Unavailable {
            field: field.as_str().to_string(),
            reason,
        };
        let req = self.client.build_picklist(field);
        let response = self.transport.execute(req).map_err(|e| unavailable(e.to_string()))?;
        self.client
            .parse_picklist(response)
            .map_err(|e| unavailable(e.to_string()))
    }
}
