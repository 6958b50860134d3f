//! Order report: the actionable reorder list.

use std::cmp::Ordering;

use ddmrp_model::columns;
use ddmrp_model::{BufferRecord, EnrichmentColumns};

use crate::engine::BufferTable;

/// Report columns in display order; optional ones are kept only when present upstream.
const REPORT_COLUMNS: [&str; 11] = [
    columns::STORE_ID,
    columns::ARTICLE,
    columns::DESCRIBE,
    columns::BRAND,
    columns::MODEL,
    columns::CURRENT_STOCK,
    columns::TOP_OF_GREEN,
    columns::ORDER_QTY,
    columns::BUFFER_STATUS,
    columns::PRIORITY,
    columns::DAYS_UNTIL_STOCKOUT,
];

fn column_present(name: &str, enrichments: &EnrichmentColumns) -> bool {
    match name {
        columns::BRAND => enrichments.brand,
        columns::MODEL => enrichments.model,
        columns::DAYS_UNTIL_STOCKOUT => enrichments.avg_daily_usage,
        _ => true,
    }
}

/// Projected columns of the order report for the given enrichments.
pub fn report_columns(enrichments: &EnrichmentColumns) -> Vec<&'static str> {
    REPORT_COLUMNS
        .iter()
        .copied()
        .filter(|name| column_present(name, enrichments))
        .collect()
}

/// Records that need ordering, most urgent first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderReport {
    pub lines: Vec<BufferRecord>,
    pub columns: Vec<&'static str>,
}

impl OrderReport {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_order_qty(&self) -> u64 {
        self.lines.iter().map(|line| line.order_qty).sum()
    }

    /// The `n` lines with the largest order quantity; ties keep report order.
    pub fn top(&self, n: usize) -> Vec<&BufferRecord> {
        largest_orders(&self.lines, n)
    }

    /// Same report restricted to lines accepted by `keep`.
    #[must_use]
    pub fn retain(&self, mut keep: impl FnMut(&BufferRecord) -> bool) -> Self {
        Self {
            lines: self.lines.iter().filter(|line| keep(line)).cloned().collect(),
            columns: self.columns.clone(),
        }
    }
}

/// The `n` records with the largest order quantity; ties keep input order.
pub fn largest_orders<'a>(
    lines: impl IntoIterator<Item = &'a BufferRecord>,
    n: usize,
) -> Vec<&'a BufferRecord> {
    let mut ranked: Vec<&BufferRecord> = lines.into_iter().collect();
    ranked.sort_by(|a, b| b.order_qty.cmp(&a.order_qty));
    ranked.truncate(n);
    ranked
}

fn report_order(a: &BufferRecord, b: &BufferRecord) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| a.store_id.cmp(&b.store_id))
        .then_with(|| a.article.cmp(&b.article))
}

/// Selects records with a positive order quantity, sorted by
/// `(Priority, Store_ID, Article)`.
///
/// Store and article compare as strings, so `"10"` sorts before `"6"`.
/// An empty report is a normal outcome.
pub fn build_order_report(buffers: &BufferTable) -> OrderReport {
    let mut lines: Vec<BufferRecord> = buffers
        .records
        .iter()
        .filter(|record| record.order_qty > 0)
        .cloned()
        .collect();
    lines.sort_by(report_order);
    OrderReport {
        lines,
        columns: report_columns(&buffers.enrichments),
    }
}
