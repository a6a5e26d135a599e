//! The shared shape of search, sort and facet filters.
//!
//! # Design
//! `FilterState` is a value object. The publisher is its only writer; every
//! broadcast hands subscribers a full snapshot, which they replace wholesale.
//!
//! Facets distinguish "no facet filter" (`None`) from "match nothing"
//! (`Some` of an empty set). Both facets are seeded together the first time
//! either one is toggled, so they are always both `None` or both `Some`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Sort order requested from the data source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    DueDateAsc,
    DueDateDesc,
    TitleAsc,
    TitleDesc,
}

impl SortBy {
    pub const ALL: [SortBy; 4] = [
        SortBy::DueDateAsc,
        SortBy::DueDateDesc,
        SortBy::TitleAsc,
        SortBy::TitleDesc,
    ];

    /// Label shown in the sort picker.
    pub fn label(self) -> &'static str {
        match self {
            SortBy::DueDateAsc => "Due Date (Early First)",
            SortBy::DueDateDesc => "Due Date (Later First)",
            SortBy::TitleAsc => "To-Do Title (A to Z)",
            SortBy::TitleDesc => "To-Do Title (Z to A)",
        }
    }
}

/// An enumerated record field that can be used as a facet filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetField {
    Priority,
    Type,
}

impl FacetField {
    pub fn as_str(self) -> &'static str {
        match self {
            FacetField::Priority => "priority",
            FacetField::Type => "type",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub search_key: String,
    #[serde(default)]
    pub sort_by: SortBy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priorities: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<BTreeSet<String>>,
}

impl FilterState {
    pub fn facets_initialized(&self) -> bool {
        self.priorities.is_some()
    }

    pub fn facet(&self, field: FacetField) -> Option<&BTreeSet<String>> {
        match field {
            FacetField::Priority => self.priorities.as_ref(),
            FacetField::Type => self.types.as_ref(),
        }
    }

    /// Seed both facets from their full universes, unless already seeded.
    pub(crate) fn seed_facets<P, T>(&mut self, priorities: P, types: T)
    where
        P: IntoIterator<Item = String>,
        T: IntoIterator<Item = String>,
    {
        if self.facets_initialized() {
            return;
        }
        self.priorities = Some(priorities.into_iter().collect());
        self.types = Some(types.into_iter().collect());
    }

    /// Set the membership of `value` in an initialized facet.
    ///
    /// Returns false when facets have not been seeded yet.
    pub(crate) fn set_facet_member(&mut self, field: FacetField, value: &str, included: bool) -> bool {
        let set = match field {
            FacetField::Priority => self.priorities.as_mut(),
            FacetField::Type => self.types.as_mut(),
        };
        let Some(set) = set else {
            return false;
        };
        if included {
            set.insert(value.to_string());
        } else {
            set.remove(value);
        }
        true
    }
}
