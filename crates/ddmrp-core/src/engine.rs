//! Buffer engine: merges the trade matrix with stock and derives buffer signals.

use std::collections::{HashMap, HashSet};

use ddmrp_ingest::{RawTable, clean_key, parse_f64};
use ddmrp_model::columns;
use ddmrp_model::{BufferRecord, EnrichmentColumns, SourceRole, ZoneBoundaries, non_negative};
use tracing::{debug, info, info_span};

use crate::classify::{classify, days_until_stockout, fill_percent, order_quantity};
use crate::error::EngineError;

/// Full result set of one computation.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferTable {
    /// One record per matrix row, in matrix order.
    pub records: Vec<BufferRecord>,
    /// Optional columns present in either input.
    pub enrichments: EnrichmentColumns,
    /// Matrix rows without a stock line (stock taken as 0).
    pub unmatched_rows: usize,
    /// Distinct stock keys that are not in the matrix.
    pub ignored_stock_pairs: usize,
    /// Stock lines folded into an earlier line with the same key.
    pub merged_stock_duplicates: usize,
}

impl BufferTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when the stockout horizon can be computed.
    pub fn has_usage(&self) -> bool {
        self.enrichments.avg_daily_usage
    }
}

/// Column positions of the optional enrichments in one table.
#[derive(Debug, Clone, Copy, Default)]
struct EnrichmentIndex {
    brand: Option<usize>,
    model: Option<usize>,
    abc_class: Option<usize>,
    retail_price: Option<usize>,
    avg_daily_usage: Option<usize>,
}

impl EnrichmentIndex {
    fn of(table: &RawTable) -> Self {
        Self {
            brand: table.column_index(columns::BRAND),
            model: table.column_index(columns::MODEL),
            abc_class: table.column_index(columns::ABC_CLASS),
            retail_price: table.column_index(columns::RETAIL_PRICE),
            avg_daily_usage: table.column_index(columns::AVG_DAILY_USAGE),
        }
    }

    fn presence(&self) -> EnrichmentColumns {
        EnrichmentColumns {
            brand: self.brand.is_some(),
            model: self.model.is_some(),
            retail_price: self.retail_price.is_some(),
            avg_daily_usage: self.avg_daily_usage.is_some(),
            abc_class: self.abc_class.is_some(),
        }
    }
}

/// Optional values carried by one row.
#[derive(Debug, Clone, Default)]
struct Enrichment {
    brand: Option<String>,
    model: Option<String>,
    abc_class: Option<String>,
    retail_price: Option<f64>,
    avg_daily_usage: Option<f64>,
}

impl Enrichment {
    fn read(row: &[String], index: &EnrichmentIndex) -> Self {
        let text = |idx: Option<usize>| {
            idx.and_then(|idx| row.get(idx))
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        let number = |idx: Option<usize>| {
            idx.and_then(|idx| row.get(idx))
                .and_then(|value| parse_f64(value))
                .map(non_negative)
        };
        Self {
            brand: text(index.brand),
            model: text(index.model),
            abc_class: text(index.abc_class),
            retail_price: number(index.retail_price),
            avg_daily_usage: number(index.avg_daily_usage),
        }
    }

    /// Keeps own values, filling gaps from `other`.
    fn or(self, other: &Enrichment) -> Self {
        Self {
            brand: self.brand.or_else(|| other.brand.clone()),
            model: self.model.or_else(|| other.model.clone()),
            abc_class: self.abc_class.or_else(|| other.abc_class.clone()),
            retail_price: self.retail_price.or(other.retail_price),
            avg_daily_usage: self.avg_daily_usage.or(other.avg_daily_usage),
        }
    }
}

#[derive(Debug, Clone)]
struct StockLine {
    quantity: f64,
    enrichment: Enrichment,
}

type Key = (String, String);

fn row_key(row: &[String], article: Option<usize>, store: Option<usize>) -> Key {
    let cell = |idx: Option<usize>| {
        idx.and_then(|idx| row.get(idx))
            .map(|value| clean_key(value))
            .unwrap_or_default()
    };
    (cell(article), cell(store))
}

fn numeric_cell(row: &[String], idx: Option<usize>) -> f64 {
    idx.and_then(|idx| row.get(idx))
        .and_then(|value| parse_f64(value))
        .map_or(0.0, non_negative)
}

/// Sums stock per key; later duplicates only fill enrichment gaps.
fn index_stock(stock: &RawTable) -> (HashMap<Key, StockLine>, usize) {
    let article = stock.column_index(columns::ARTICLE);
    let store = stock.column_index(columns::STORE_ID);
    let quantity = stock.column_index(columns::CURRENT_STOCK);
    let enrichment_index = EnrichmentIndex::of(stock);
    let mut lines: HashMap<Key, StockLine> = HashMap::with_capacity(stock.row_count());
    let mut duplicates = 0usize;
    for row in &stock.rows {
        let key = row_key(row, article, store);
        let amount = numeric_cell(row, quantity);
        let enrichment = Enrichment::read(row, &enrichment_index);
        match lines.get_mut(&key) {
            Some(line) => {
                duplicates += 1;
                line.quantity += amount;
                line.enrichment = std::mem::take(&mut line.enrichment).or(&enrichment);
            }
            None => {
                lines.insert(
                    key,
                    StockLine {
                        quantity: amount,
                        enrichment,
                    },
                );
            }
        }
    }
    (lines, duplicates)
}

/// Merges the matrix with stock and derives every buffer signal.
///
/// Both tables are expected to be normalized and sanitized; zone and stock
/// values are clipped again regardless. The matrix decides which pairs
/// exist: unmatched matrix rows get zero stock, stock-only pairs are left
/// out. The result has exactly one record per matrix row, also when stock
/// has no rows at all. Only an empty matrix is an error.
pub fn compute_buffers(matrix: &RawTable, stock: &RawTable) -> Result<BufferTable, EngineError> {
    if matrix.is_empty() {
        return Err(EngineError::EmptyInput {
            role: SourceRole::Matrix,
        });
    }
    let span = info_span!("compute_buffers", matrix_rows = matrix.row_count(), stock_rows = stock.row_count());
    let _guard = span.enter();

    let (stock_lines, merged_stock_duplicates) = index_stock(stock);
    if merged_stock_duplicates > 0 {
        info!(merged_stock_duplicates, "summed stock lines sharing a key");
    }

    let article = matrix.column_index(columns::ARTICLE);
    let store = matrix.column_index(columns::STORE_ID);
    let describe = matrix.column_index(columns::DESCRIBE);
    let red = matrix.column_index(columns::RED_ZONE);
    let yellow = matrix.column_index(columns::YELLOW_ZONE);
    let green = matrix.column_index(columns::GREEN_ZONE);
    let matrix_enrichment = EnrichmentIndex::of(matrix);
    let enrichments = matrix_enrichment
        .presence()
        .union(EnrichmentIndex::of(stock).presence());

    let mut records = Vec::with_capacity(matrix.row_count());
    let mut matrix_keys: HashSet<Key> = HashSet::with_capacity(matrix.row_count());
    let mut unmatched_rows = 0usize;
    for row in &matrix.rows {
        let key = row_key(row, article, store);
        let red_zone = numeric_cell(row, red);
        let yellow_zone = numeric_cell(row, yellow);
        let green_zone = numeric_cell(row, green);
        let zones = ZoneBoundaries::from_sizes(red_zone, yellow_zone, green_zone);

        let own = Enrichment::read(row, &matrix_enrichment);
        let (current_stock, enrichment) = match stock_lines.get(&key) {
            Some(line) => (non_negative(line.quantity), own.or(&line.enrichment)),
            None => {
                unmatched_rows += 1;
                (0.0, own)
            }
        };

        // A column present in either table always yields a value; missing cells read as 0.
        let retail_price = enrichments
            .retail_price
            .then(|| enrichment.retail_price.unwrap_or(0.0));
        let avg_daily_usage = enrichments
            .avg_daily_usage
            .then(|| enrichment.avg_daily_usage.unwrap_or(0.0));

        let top_of_green = zones.top_of_green();
        let buffer_status = classify(current_stock, &zones);
        let describe = describe
            .and_then(|idx| row.get(idx))
            .map(|value| value.trim().to_string())
            .unwrap_or_default();

        records.push(BufferRecord {
            article: key.0.clone(),
            store_id: key.1.clone(),
            describe,
            red_zone,
            yellow_zone,
            green_zone,
            top_of_green,
            red_zone_max: zones.red_max,
            yellow_zone_max: zones.yellow_max,
            green_zone_max: zones.green_max,
            current_stock,
            buffer_status,
            buffer_fill_percent: fill_percent(current_stock, top_of_green),
            order_qty: order_quantity(buffer_status, current_stock, top_of_green),
            priority: buffer_status.priority(),
            days_until_stockout: days_until_stockout(current_stock, avg_daily_usage),
            stock_value: retail_price.unwrap_or(0.0) * current_stock,
            brand: enrichment.brand,
            model: enrichment.model,
            retail_price,
            avg_daily_usage,
            abc_class: enrichment.abc_class,
        });
        matrix_keys.insert(key);
    }

    let ignored_stock_pairs = stock_lines
        .keys()
        .filter(|key| !matrix_keys.contains(*key))
        .count();
    debug!(ignored_stock_pairs, "stock pairs outside the trade matrix");
    info!(
        records = records.len(),
        unmatched_rows,
        ignored_stock_pairs,
        "buffers computed"
    );

    Ok(BufferTable {
        records,
        enrichments,
        unmatched_rows,
        ignored_stock_pairs,
        merged_stock_duplicates,
    })
}
