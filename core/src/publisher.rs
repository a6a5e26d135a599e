//! Filter editor: owns the `FilterState` and broadcasts snapshots.
//!
//! # Design
//! The publisher is the only writer of the filter state. Keystroke-driven
//! search edits are debounced; sort and facet edits are discrete and go out
//! immediately. Every broadcast carries the whole state, never a diff.
//!
//! Time is an input. The host calls `poll(now)` once `next_deadline()` has
//! passed, which keeps the publisher free of any timer or runtime.

use std::time::Instant;

use crate::bus::MessageBus;
use crate::config::ViewConfig;
use crate::debounce::Debouncer;
use crate::error::FilterError;
use crate::filter::{FacetField, FilterState, SortBy};
use crate::service::PicklistProvider;
use crate::types::PicklistValue;

/// The full set of allowed values for both facets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetUniverse {
    pub priorities: Vec<PicklistValue>,
    pub types: Vec<PicklistValue>,
}

impl FacetUniverse {
    pub fn values(&self, field: FacetField) -> &[PicklistValue] {
        match field {
            FacetField::Priority => &self.priorities,
            FacetField::Type => &self.types,
        }
    }
}

#[derive(Debug)]
pub struct FilterPublisher {
    bus: MessageBus<FilterState>,
    topic: String,
    filters: FilterState,
    universe: Option<FacetUniverse>,
    debounce: Debouncer,
    broadcasts: u64,
}

impl FilterPublisher {
    pub fn new(bus: MessageBus<FilterState>, config: &ViewConfig) -> Self {
        Self {
            bus,
            topic: config.filter_topic.clone(),
            filters: FilterState::default(),
            universe: None,
            debounce: Debouncer::new(config.debounce_delay()),
            broadcasts: 0,
        }
    }

    /// Install an already-loaded facet universe.
    pub fn with_universe(mut self, universe: FacetUniverse) -> Self {
        self.universe = Some(universe);
        self
    }

    /// Fetch both picklists. On failure facet filtering becomes unavailable;
    /// search and sort keep working.
    pub fn load_facet_universe<P: PicklistProvider + ?Sized>(&mut self, provider: &mut P) -> bool {
        let loaded = provider
            .allowed_values(FacetField::Priority)
            .and_then(|priorities| {
                let types = provider.allowed_values(FacetField::Type)?;
                Ok(FacetUniverse { priorities, types })
            });
        match loaded {
            Ok(universe) => {
                self.universe = Some(universe);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "facet filtering unavailable");
                self.universe = None;
                false
            }
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn universe(&self) -> Option<&FacetUniverse> {
        self.universe.as_ref()
    }

    pub fn facets_available(&self) -> bool {
        self.universe.is_some()
    }

    /// The labelled sort choices, in display order.
    pub fn sort_options() -> Vec<(&'static str, SortBy)> {
        SortBy::ALL.iter().map(|sort| (sort.label(), *sort)).collect()
    }

    /// Number of snapshots published so far.
    pub fn broadcasts(&self) -> u64 {
        self.broadcasts
    }

    pub fn set_search_key(&mut self, text: impl Into<String>, now: Instant) {
        self.filters.search_key = text.into();
        let deadline = self.debounce.schedule(now);
        tracing::trace!(?deadline, "search broadcast rescheduled");
    }

    pub fn set_sort_by(&mut self, sort_by: SortBy) {
        self.filters.sort_by = sort_by;
        self.debounce.cancel();
        self.broadcast();
    }

    /// Include or exclude `value` in a facet. The first toggle seeds both
    /// facets from the full universe.
    pub fn toggle_facet(&mut self, field: FacetField, value: &str, included: bool) -> Result<(), FilterError> {
        if !self.filters.facets_initialized() {
            let Some(universe) = &self.universe else {
                tracing::warn!(facet = field.as_str(), value, "facet toggle ignored, no picklist values");
                return Err(FilterError::FacetsUnavailable);
            };
            let all = |values: &[PicklistValue]| values.iter().map(|v| v.value.clone()).collect::<Vec<_>>();
            self.filters
                .seed_facets(all(&universe.priorities), all(&universe.types));
        }
        self.filters.set_facet_member(field, value, included);
        self.debounce.cancel();
        self.broadcast();
        Ok(())
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Deliver the pending search broadcast if its quiet period is over.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.debounce.fire_if_due(now) {
            self.broadcast();
            return true;
        }
        false
    }

    fn broadcast(&mut self) {
        self.broadcasts += 1;
        let delivered = self.bus.publish(&self.topic, &self.filters);
        tracing::debug!(
            topic = %self.topic,
            delivered,
            search_key = %self.filters.search_key,
            sort_by = ?self.filters.sort_by,
            "filters broadcast"
        );
    }
}
