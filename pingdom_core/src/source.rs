use crate::{check::Check, error::Result, outage::OutageInterval};
use async_trait::async_trait;
use std::sync::Arc;

/// Filter applied when listing checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckQuery {
    /// Only checks carrying at least one of these tags. Empty means all checks.
    pub tags: Vec<String>,
}

impl CheckQuery {
    pub fn with_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result of one inventory fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckListing {
    pub checks: Vec<Check>,
    /// Smallest remaining request budget reported by the upstream, if any.
    pub rate_limit_remaining: Option<f64>,
}

impl CheckListing {
    pub fn new(checks: Vec<Check>) -> Self {
        Self {
            checks,
            rate_limit_remaining: None,
        }
    }
}

/// Source of the check inventory.
#[async_trait]
pub trait CheckSource: Send + Sync {
    async fn list_checks(&self, query: CheckQuery) -> Result<CheckListing>;
}

/// Source of per-check outage history.
#[async_trait]
pub trait OutageSource: Send + Sync {
    /// Status intervals recorded for `check_id` within `[from, to]` epoch seconds.
    async fn list_outages(&self, check_id: u64, from: i64, to: i64) -> Result<Vec<OutageInterval>>;
}

pub type DynCheckSource = Arc<dyn CheckSource>;
pub type DynOutageSource = Arc<dyn OutageSource>;
