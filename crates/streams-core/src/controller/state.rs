use std::time::Duration;

use crate::query::FilterCriterion;
use crate::sort::OrderBy;

/// What the list view is currently doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    /// Explicit load; the table shows skeleton rows.
    Loading,
    /// Background refresh; previous rows stay visible.
    Polling,
    /// The user may not see any instances.
    Unauthorized,
    /// The last fetch failed; previous rows stay visible.
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Explicit,
    Poll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub page: u32,
    pub per_page: u32,
    pub order_by: OrderBy,
    pub filters: Vec<FilterCriterion>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
            order_by: OrderBy::default(),
            filters: Vec::new(),
        }
    }
}

impl ListParams {
    pub fn is_filtered(&self) -> bool {
        self.filters.iter().any(|f| !f.values.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub poll_interval: Duration,
    pub per_page: u32,
    pub size_lookup_concurrency: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(5000),
            per_page: 10,
            size_lookup_concurrency: 4,
        }
    }
}
