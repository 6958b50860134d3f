//! Aggregate figures over a computed buffer table.

use std::collections::BTreeMap;

use ddmrp_model::{BufferRecord, BufferStatus};
use serde::Serialize;

use crate::engine::BufferTable;

/// Per-store totals.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StoreSummary {
    pub store_id: String,
    pub items: usize,
    pub red: usize,
    pub yellow: usize,
    pub order_qty: u64,
}

/// Status counts within one ABC class.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AbcSummary {
    pub class: String,
    pub items: usize,
    pub by_status: BTreeMap<BufferStatus, usize>,
}

/// Overview of one computation.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BufferSummary {
    pub total_items: usize,
    pub by_status: BTreeMap<BufferStatus, usize>,
    pub total_order_qty: u64,
    pub total_stock_value: f64,
    /// Sorted by store id.
    pub stores: Vec<StoreSummary>,
    /// Present only when the inputs carried an ABC class column.
    pub abc_classes: Option<Vec<AbcSummary>>,
}

impl BufferSummary {
    pub fn from_table(buffers: &BufferTable) -> Self {
        let mut summary = Self::from_records(&buffers.records);
        if !buffers.enrichments.abc_class {
            summary.abc_classes = None;
        }
        summary
    }

    /// Summarizes any record slice, such as a filtered selection.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a BufferRecord>) -> Self {
        let mut summary = Self::default();
        let mut stores: BTreeMap<String, StoreSummary> = BTreeMap::new();
        let mut classes: BTreeMap<String, AbcSummary> = BTreeMap::new();

        for record in records {
            summary.total_items += 1;
            *summary.by_status.entry(record.buffer_status).or_default() += 1;
            summary.total_order_qty += record.order_qty;
            summary.total_stock_value += record.stock_value;

            let store = stores
                .entry(record.store_id.clone())
                .or_insert_with(|| StoreSummary {
                    store_id: record.store_id.clone(),
                    ..StoreSummary::default()
                });
            store.items += 1;
            store.order_qty += record.order_qty;
            match record.buffer_status {
                BufferStatus::Red => store.red += 1,
                BufferStatus::Yellow => store.yellow += 1,
                _ => {}
            }

            if let Some(class) = &record.abc_class {
                let entry = classes.entry(class.clone()).or_insert_with(|| AbcSummary {
                    class: class.clone(),
                    ..AbcSummary::default()
                });
                entry.items += 1;
                *entry.by_status.entry(record.buffer_status).or_default() += 1;
            }
        }

        summary.stores = stores.into_values().collect();
        summary.abc_classes = (!classes.is_empty()).then(|| classes.into_values().collect());
        summary
    }

    pub fn count(&self, status: BufferStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    /// Items with status RED or YELLOW.
    pub fn needing_order(&self) -> usize {
        self.count(BufferStatus::Red) + self.count(BufferStatus::Yellow)
    }
}
