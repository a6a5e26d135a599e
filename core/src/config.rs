//! View and filter configuration.
//!
//! Every key has a compiled default, so a host can pass a partial JSON
//! document (or nothing at all).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Client form factor; decides how many cards fit on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormFactor {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardPageSizes {
    pub small: usize,
    pub medium: usize,
    pub large: usize,
}

impl Default for CardPageSizes {
    fn default() -> Self {
        Self {
            small: 3,
            medium: 6,
            large: 9,
        }
    }
}

impl CardPageSizes {
    pub fn for_form_factor(&self, form_factor: FormFactor) -> usize {
        match form_factor {
            FormFactor::Small => self.small,
            FormFactor::Medium => self.medium,
            FormFactor::Large => self.large,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Quiet period before a search-key edit is broadcast.
    pub debounce_ms: u64,
    /// Page sizes offered by the table view.
    pub table_page_sizes: Vec<usize>,
    pub default_table_page_size: usize,
    pub card_page_sizes: CardPageSizes,
    /// Bus topic carrying filter snapshots.
    pub filter_topic: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 350,
            table_page_sizes: vec![5, 10, 15, 20, 30],
            default_table_page_size: 10,
            card_page_sizes: CardPageSizes::default(),
            filter_topic: crate::TODOS_FILTERED.to_string(),
        }
    }
}

impl ViewConfig {
    /// Parse a partial document over the defaults and validate the result.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Page sizes must be non-zero and the table default must be one of
    /// the offered options.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table_page_sizes.is_empty() {
            return Err(ConfigError::Invalid("table_page_sizes is empty".to_string()));
        }
        if self.table_page_sizes.contains(&0) {
            return Err(ConfigError::Invalid("table_page_sizes contains 0".to_string()));
        }
        if !self.table_page_sizes.contains(&self.default_table_page_size) {
            return Err(ConfigError::Invalid(format!(
                "default_table_page_size {} is not in table_page_sizes",
                self.default_table_page_size
            )));
        }
        let cards = &self.card_page_sizes;
        for (form_factor, size) in [("small", cards.small), ("medium", cards.medium), ("large", cards.large)] {
            if size == 0 {
                return Err(ConfigError::Invalid(format!("card page size for {form_factor} is 0")));
            }
        }
        if self.filter_topic.is_empty() {
            return Err(ConfigError::Invalid("filter_topic is empty".to_string()));
        }
        Ok(())
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
