//! Record selection by store, status, and free-text search.

use std::collections::BTreeSet;

use ddmrp_model::{BufferRecord, BufferStatus};

/// Conjunction of optional criteria; an empty criterion accepts everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub stores: BTreeSet<String>,
    pub statuses: BTreeSet<BufferStatus>,
    /// Case-insensitive substring matched against `Article` or `Describe`.
    pub search: Option<String>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_stores<I, S>(mut self, stores: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stores = stores
            .into_iter()
            .map(|store| store.into().trim().to_string())
            .filter(|store| !store.is_empty())
            .collect();
        self
    }

    #[must_use]
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = BufferStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let needle = search.into().trim().to_lowercase();
        self.search = (!needle.is_empty()).then_some(needle);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty() && self.statuses.is_empty() && self.search.is_none()
    }

    pub fn matches(&self, record: &BufferRecord) -> bool {
        if !self.stores.is_empty() && !self.stores.contains(&record.store_id) {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&record.buffer_status) {
            return false;
        }
        match &self.search {
            Some(needle) => {
                record.article.to_lowercase().contains(needle)
                    || record.describe.to_lowercase().contains(needle)
            }
            None => true,
        }
    }

    /// Matching records in their original order.
    pub fn apply<'a>(&self, records: &'a [BufferRecord]) -> Vec<&'a BufferRecord> {
        records.iter().filter(|record| self.matches(record)).collect()
    }
}
