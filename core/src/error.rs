//! Error types for the todo core.
//!
//! # Design
//! `ApiError` describes what went wrong while interpreting an HTTP response.
//! The collaborator-facing errors (`DataAccessError`, `WriteError`,
//! `MetadataError`) are what components catch at their own boundary; none of
//! them propagate past the component that issued the call.

use thiserror::Error;

/// Errors returned by `TodoClient` parse methods.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The server returned 404: the requested todo or picklist does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

/// The host could not complete an HTTP round-trip.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("transport failure: {0}")]
pub struct TransportError(pub String);

/// A page query failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DataAccessError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A batch or single-record write failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WriteError {
    /// The server rejected the edits; retrying unchanged will fail again.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("transport failure: {0}")]
    Transport(String),
}

impl From<ApiError> for WriteError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound => WriteError::Validation("record not found".to_string()),
            ApiError::HttpError { status: 400 | 404 | 422, body } => WriteError::Validation(body),
            other => WriteError::Transport(other.to_string()),
        }
    }
}

impl From<TransportError> for WriteError {
    fn from(err: TransportError) -> Self {
        WriteError::Transport(err.0)
    }
}

/// Picklist metadata could not be loaded.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MetadataError {
    #[error("picklist values for {field} unavailable: {reason}")]
    Unavailable { field: String, reason: String },
}

/// Rejected filter edits.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("facet filtering is unavailable: picklist values were not loaded")]
    FacetsUnavailable,
}

/// Rejected list view interactions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("a save is already in progress")]
    Busy,

    #[error("there are no pending edits to save")]
    NothingToSave,

    #[error("page size {0} is not one of the offered options")]
    InvalidPageSize(usize),

    #[error("this view has a fixed page size")]
    FixedPageSize,

    #[error("this view does not support inline editing")]
    ReadOnly,
}

/// A view configuration document could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("view config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid view config: {0}")]
    Invalid(String),
}
