//! Client core for the todo manager: filter publishing, list consumers and
//! the API client they sit on.
//!
//! # Overview
//! A filter editor (`FilterPublisher`), any number of list views
//! (`ListView`, table or card variant) and a paginated data source stay
//! consistent without referencing each other. The publisher broadcasts
//! full `FilterState` snapshots on a `MessageBus` topic; a `FilterSubscriber`
//! relays them to its views, which reset to page 1 and re-query.
//!
//! # Design
//! - Single-threaded and host-driven. The core never sleeps, spawns or does
//!   I/O: the host passes in the current time, runs the queries views ask
//!   for, and executes `HttpRequest`s built by `TodoClient`.
//! - Collaborators (query, write, cache notification, picklists, toasts)
//!   are traits in `service`; `RemoteBackend` implements the remote ones.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod bus;
pub mod card;
pub mod client;
pub mod config;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod header;
pub mod http;
pub mod presentation;
pub mod publisher;
pub mod service;
pub mod subscriber;
pub mod types;
pub mod view;

/// Topic carrying filter snapshots from the filter panel to list views.
pub const TODOS_FILTERED: &str = "todos-filtered";

pub use bus::{MessageBus, Subscription};
pub use card::CardModel;
pub use client::TodoClient;
pub use config::{FormFactor, ViewConfig};
pub use debounce::Debouncer;
pub use error::{
    ApiError, ConfigError, DataAccessError, FilterError, MetadataError, TransportError, ViewError, WriteError,
};
pub use filter::{FacetField, FilterState, SortBy};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use presentation::TableRow;
pub use publisher::{FacetUniverse, FilterPublisher};
pub use service::{
    CacheNotifier, ListDataSource, PicklistProvider, RemoteBackend, Severity, Toast, ToastLog, ToastMode, ToastSink,
    WriteService,
};
pub use subscriber::{FilterSubscriber, SharedListView};
pub use types::{CreateTodo, PageRequest, PageResult, PicklistValue, RecordEdit, Todo, TodoChanges};
pub use view::{ListVariant, ListView, LoadOutcome, PageQuery, Phase, SaveBatch, SaveOutcome};
