//! Paginated list consumer: table and card variants.
//!
//! # Design
//! A `ListView` never calls the data source on its own. Any change to its
//! filters, page number or page size marks it dirty, and the host pulls the
//! resulting query with `poll_query`. Each query carries a ticket; only the
//! response to the most recently issued ticket is applied, so a slow stale
//! response can never overwrite a newer page.
//!
//! Inline edits (table only) accumulate in a draft buffer. Saving moves the
//! buffer into an in-flight batch and sets the busy flag; the outcome either
//! clears it for good (success) or puts it back (failure). The busy flag is
//! cleared on both paths.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::config::{FormFactor, ViewConfig};
use crate::error::{DataAccessError, ViewError, WriteError};
use crate::filter::FilterState;
use crate::presentation::TableRow;
use crate::service::{CacheNotifier, ListDataSource, Severity, Toast, ToastSink, WriteService};
use crate::types::{edited_ids, PageRequest, PageResult, RecordEdit, Todo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListVariant {
    Table,
    Cards(FormFactor),
}

/// Coarse view state, derived from the view's fields.
///
/// `Idle → Loading → Ready ⇄ Editing → Saving → {Ready | Editing}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Editing,
    Saving,
}

/// A query the host should run against the data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub ticket: u64,
    pub request: PageRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer query was issued after this one; the response was dropped.
    Stale,
}

/// Edits handed to the write collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveBatch {
    pub edits: Vec<RecordEdit>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { ids: BTreeSet<Uuid> },
    /// The write failed and the edits are back in the draft buffer.
    Restored { error: WriteError },
    /// No save was in progress.
    Ignored,
}

#[derive(Debug)]
pub struct ListView {
    variant: ListVariant,
    page_size_options: Vec<usize>,
    filters: FilterState,
    page_number: usize,
    page_size: usize,
    records: Vec<Todo>,
    total_item_count: Option<usize>,
    error: Option<DataAccessError>,
    drafts: Vec<RecordEdit>,
    saving: Option<Vec<RecordEdit>>,
    dirty: bool,
    next_ticket: u64,
    in_flight: Option<u64>,
    loaded: bool,
}

impl ListView {
    pub fn table(config: &ViewConfig) -> Self {
        Self::new(
            ListVariant::Table,
            config.table_page_sizes.clone(),
            config.default_table_page_size,
        )
    }

    pub fn cards(config: &ViewConfig, form_factor: FormFactor) -> Self {
        let size = config.card_page_sizes.for_form_factor(form_factor);
        Self::new(ListVariant::Cards(form_factor), vec![size], size)
    }

    fn new(variant: ListVariant, page_size_options: Vec<usize>, page_size: usize) -> Self {
        Self {
            variant,
            page_size_options,
            filters: FilterState::default(),
            page_number: 1,
            page_size: page_size.max(1),
            records: Vec::new(),
            total_item_count: None,
            error: None,
            drafts: Vec::new(),
            saving: None,
            dirty: true,
            next_ticket: 0,
            in_flight: None,
            loaded: false,
        }
    }

    pub fn variant(&self) -> ListVariant {
        self.variant
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    pub fn records(&self) -> &[Todo] {
        &self.records
    }

    pub fn total_item_count(&self) -> Option<usize> {
        self.total_item_count
    }

    pub fn error(&self) -> Option<&DataAccessError> {
        self.error.as_ref()
    }

    pub fn drafts(&self) -> &[RecordEdit] {
        &self.drafts
    }

    pub fn is_busy(&self) -> bool {
        self.saving.is_some()
    }

    pub fn phase(&self) -> Phase {
        if self.saving.is_some() {
            Phase::Saving
        } else if self.in_flight.is_some() {
            Phase::Loading
        } else if !self.drafts.is_empty() {
            Phase::Editing
        } else if self.loaded {
            Phase::Ready
        } else {
            Phase::Idle
        }
    }

    /// Index of the first row on the current page.
    pub fn row_offset(&self) -> usize {
        (self.page_number - 1) * self.page_size
    }

    /// The current page as display rows, numbered from `row_offset() + 1`.
    pub fn rows(&self) -> Vec<TableRow> {
        let offset = self.row_offset();
        self.records
            .iter()
            .enumerate()
            .map(|(i, todo)| TableRow::from_todo(offset + i + 1, todo))
            .collect()
    }

    /// Known only once a page has loaded.
    pub fn total_pages(&self) -> Option<usize> {
        self.total_item_count
            .map(|total| total.div_ceil(self.page_size).max(1))
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    /// False until a total for the current filters has loaded.
    pub fn has_next(&self) -> bool {
        self.total_pages().is_some_and(|last| self.page_number < last)
    }

    /// Replace the filters wholesale and go back to page 1. The previous
    /// total belonged to the old filters and is dropped.
    pub fn receive_filters(&mut self, filters: FilterState) {
        tracing::debug!(previous_page = self.page_number, "filters received, page reset");
        self.filters = filters;
        self.page_number = 1;
        self.total_item_count = None;
        self.dirty = true;
    }

    /// Go back one page. Stays on page 1.
    pub fn previous_page(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.page_number -= 1;
        self.dirty = true;
        true
    }

    /// Advance one page. Stays put on the last page, and until the total
    /// for the current filters is known.
    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page_number += 1;
        self.dirty = true;
        true
    }

    pub fn set_page_size(&mut self, size: usize) -> Result<(), ViewError> {
        if let ListVariant::Cards(_) = self.variant {
            return Err(ViewError::FixedPageSize);
        }
        if !self.page_size_options.contains(&size) {
            return Err(ViewError::InvalidPageSize(size));
        }
        self.page_size = size;
        self.page_number = 1;
        self.dirty = true;
        Ok(())
    }

    /// Re-fetch the current page.
    pub fn refresh(&mut self) {
        self.dirty = true;
    }

    /// The query for the current state, if anything changed since the last
    /// one was issued. Issuing supersedes any query still in flight.
    pub fn poll_query(&mut self) -> Option<PageQuery> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        if let Some(superseded) = self.in_flight.replace(ticket) {
            tracing::trace!(superseded, ticket, "query superseded");
        }
        let request = PageRequest {
            filters: self.filters.clone(),
            page_number: self.page_number,
            page_size: self.page_size,
        };
        tracing::debug!(
            ticket,
            page_number = request.page_number,
            page_size = request.page_size,
            "page query issued"
        );
        Some(PageQuery { ticket, request })
    }

    pub fn on_page_loaded(&mut self, ticket: u64, result: Result<PageResult, DataAccessError>) -> LoadOutcome {
        if self.in_flight != Some(ticket) {
            tracing::trace!(ticket, latest = ?self.in_flight, "stale page response dropped");
            return LoadOutcome::Stale;
        }
        self.in_flight = None;
        self.loaded = true;
        match result {
            Ok(page) => {
                self.total_item_count = Some(page.total_item_count);
                self.records = page.records;
                self.error = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, ticket, "page query failed");
                self.records.clear();
                self.error = Some(err);
            }
        }
        LoadOutcome::Applied
    }

    /// Add a row edit to the draft buffer, merging with any earlier draft for
    /// the same record.
    pub fn stage_edit(&mut self, edit: RecordEdit) -> Result<(), ViewError> {
        if let ListVariant::Cards(_) = self.variant {
            return Err(ViewError::ReadOnly);
        }
        if self.is_busy() {
            return Err(ViewError::Busy);
        }
        match self.drafts.iter_mut().find(|draft| draft.id == edit.id) {
            Some(draft) => draft.changes.merge(edit.changes),
            None => self.drafts.push(edit),
        }
        Ok(())
    }

    pub fn discard_drafts(&mut self) -> Result<(), ViewError> {
        if self.is_busy() {
            return Err(ViewError::Busy);
        }
        self.drafts.clear();
        Ok(())
    }

    /// Hand the draft buffer to the writer and mark the view busy.
    pub fn begin_save(&mut self) -> Result<SaveBatch, ViewError> {
        if self.is_busy() {
            return Err(ViewError::Busy);
        }
        if self.drafts.is_empty() {
            return Err(ViewError::NothingToSave);
        }
        let edits = std::mem::take(&mut self.drafts);
        self.saving = Some(edits.clone());
        tracing::debug!(rows = edits.len(), "save started");
        Ok(SaveBatch { edits })
    }

    pub fn finish_save<N, S>(&mut self, result: Result<(), WriteError>, notifier: &mut N, toasts: &mut S) -> SaveOutcome
    where
        N: CacheNotifier + ?Sized,
        S: ToastSink + ?Sized,
    {
        let Some(batch) = self.saving.take() else {
            tracing::warn!("save finished with no save in progress");
            return SaveOutcome::Ignored;
        };
        match result {
            Ok(()) => {
                let ids = edited_ids(&batch);
                for edit in &batch {
                    if let Some(todo) = self.records.iter_mut().find(|todo| todo.id == edit.id) {
                        edit.changes.apply_to(todo);
                    }
                }
                notifier.notify_changed(&ids);
                toasts.notify(Toast::new(
                    "Records Updated",
                    "To-do Records were updated successfully!",
                    Severity::Success,
                ));
                self.dirty = true;
                tracing::debug!(rows = batch.len(), "save succeeded");
                SaveOutcome::Saved { ids }
            }
            Err(error) => {
                tracing::error!(error = %error, rows = batch.len(), "save failed, drafts restored");
                self.drafts = batch;
                toasts.notify(Toast::new(
                    "Error updating or refreshing the record!",
                    format!("An unexpected error occurred: {error}"),
                    Severity::Error,
                ));
                SaveOutcome::Restored { error }
            }
        }
    }

    /// Run the pending query, if any, to completion.
    pub fn fetch_with<D: ListDataSource + ?Sized>(&mut self, source: &mut D) -> Option<LoadOutcome> {
        let query = self.poll_query()?;
        let result = source.query(&query.request);
        Some(self.on_page_loaded(query.ticket, result))
    }

    /// Save the draft buffer through `writer` and handle the outcome.
    pub fn save_with<W, N, S>(&mut self, writer: &mut W, notifier: &mut N, toasts: &mut S) -> Result<SaveOutcome, ViewError>
    where
        W: WriteService + ?Sized,
        N: CacheNotifier + ?Sized,
        S: ToastSink + ?Sized,
    {
        let batch = self.begin_save()?;
        let result = writer.write_batch(&batch.edits);
        Ok(self.finish_save(result, notifier, toasts))
    }
}
