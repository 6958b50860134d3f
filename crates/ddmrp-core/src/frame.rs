//! DataFrame construction for export.
//!
//! Frames use the canonical column names, so a written file is a direct
//! tabular dump of the records.

use polars::prelude::{Column, DataFrame, NamedFrom, PolarsResult, Series};

use ddmrp_model::columns;
use ddmrp_model::{BufferRecord, EnrichmentColumns};

/// Columns of the full record table, in export order.
pub fn record_columns(enrichments: &EnrichmentColumns) -> Vec<&'static str> {
    let mut names = vec![columns::ARTICLE, columns::STORE_ID, columns::DESCRIBE];
    if enrichments.brand {
        names.push(columns::BRAND);
    }
    if enrichments.model {
        names.push(columns::MODEL);
    }
    if enrichments.abc_class {
        names.push(columns::ABC_CLASS);
    }
    names.extend([
        columns::RED_ZONE,
        columns::YELLOW_ZONE,
        columns::GREEN_ZONE,
        columns::TOP_OF_GREEN,
        columns::RED_ZONE_MAX,
        columns::YELLOW_ZONE_MAX,
        columns::GREEN_ZONE_MAX,
        columns::CURRENT_STOCK,
        columns::BUFFER_STATUS,
        columns::BUFFER_FILL_PERCENT,
        columns::ORDER_QTY,
        columns::PRIORITY,
    ]);
    if enrichments.retail_price {
        names.push(columns::RETAIL_PRICE);
    }
    names.push(columns::STOCK_VALUE);
    if enrichments.avg_daily_usage {
        names.push(columns::AVG_DAILY_USAGE);
        names.push(columns::DAYS_UNTIL_STOCKOUT);
    }
    names
}

fn text<'a, F>(name: &str, records: &'a [BufferRecord], value: F) -> Column
where
    F: Fn(&'a BufferRecord) -> &'a str,
{
    let values: Vec<&str> = records.iter().map(value).collect();
    Series::new(name.into(), values).into()
}

fn optional_text<F>(name: &str, records: &[BufferRecord], value: F) -> Column
where
    F: Fn(&BufferRecord) -> Option<&str>,
{
    let values: Vec<Option<&str>> = records.iter().map(value).collect();
    Series::new(name.into(), values).into()
}

fn number<F>(name: &str, records: &[BufferRecord], value: F) -> Column
where
    F: Fn(&BufferRecord) -> f64,
{
    let values: Vec<f64> = records.iter().map(value).collect();
    Series::new(name.into(), values).into()
}

fn optional_number<F>(name: &str, records: &[BufferRecord], value: F) -> Column
where
    F: Fn(&BufferRecord) -> Option<f64>,
{
    let values: Vec<Option<f64>> = records.iter().map(value).collect();
    Series::new(name.into(), values).into()
}

/// Builds one canonical column; `None` for names that are not record fields.
fn record_column(name: &str, records: &[BufferRecord]) -> Option<Column> {
    let column = match name {
        columns::ARTICLE => text(name, records, |r| r.article.as_str()),
        columns::STORE_ID => text(name, records, |r| r.store_id.as_str()),
        columns::DESCRIBE => text(name, records, |r| r.describe.as_str()),
        columns::BRAND => optional_text(name, records, |r| r.brand.as_deref()),
        columns::MODEL => optional_text(name, records, |r| r.model.as_deref()),
        columns::ABC_CLASS => optional_text(name, records, |r| r.abc_class.as_deref()),
        columns::BUFFER_STATUS => text(name, records, |r| r.buffer_status.as_str()),
        columns::RED_ZONE => number(name, records, |r| r.red_zone),
        columns::YELLOW_ZONE => number(name, records, |r| r.yellow_zone),
        columns::GREEN_ZONE => number(name, records, |r| r.green_zone),
        columns::TOP_OF_GREEN => number(name, records, |r| r.top_of_green),
        columns::RED_ZONE_MAX => number(name, records, |r| r.red_zone_max),
        columns::YELLOW_ZONE_MAX => number(name, records, |r| r.yellow_zone_max),
        columns::GREEN_ZONE_MAX => number(name, records, |r| r.green_zone_max),
        columns::CURRENT_STOCK => number(name, records, |r| r.current_stock),
        columns::BUFFER_FILL_PERCENT => number(name, records, |r| r.buffer_fill_percent),
        columns::STOCK_VALUE => number(name, records, |r| r.stock_value),
        columns::RETAIL_PRICE => optional_number(name, records, |r| r.retail_price),
        columns::AVG_DAILY_USAGE => optional_number(name, records, |r| r.avg_daily_usage),
        columns::DAYS_UNTIL_STOCKOUT => {
            optional_number(name, records, |r| r.days_until_stockout)
        }
        columns::ORDER_QTY => {
            let values: Vec<u64> = records.iter().map(|r| r.order_qty).collect();
            Series::new(name.into(), values).into()
        }
        columns::PRIORITY => {
            let values: Vec<u32> = records.iter().map(|r| u32::from(r.priority)).collect();
            Series::new(name.into(), values).into()
        }
        _ => return None,
    };
    Some(column)
}

/// Projects `records` onto `names`, one frame column per listed name.
pub fn records_frame(records: &[BufferRecord], names: &[&str]) -> PolarsResult<DataFrame> {
    let columns: Vec<Column> = names
        .iter()
        .filter_map(|name| record_column(name, records))
        .collect();
    DataFrame::new(columns)
}
