//! Cell-level repair of normalized tables.
//!
//! Sanitizing never fails. Bad values are replaced with safe defaults and
//! every replacement is counted in a [`SanitizeReport`]. Running the
//! sanitizer on its own output returns the same table.

use std::collections::BTreeMap;

use ddmrp_model::columns;
use ddmrp_model::{SanitizeReport, SourceRole};
use tracing::warn;

use crate::table::RawTable;
use crate::values::{clean_key, format_numeric, parse_f64};

/// Description written into stock rows that have none.
pub const MISSING_DESCRIPTION: &str = "no description";

/// A repaired table and the repairs made to it.
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedTable {
    pub table: RawTable,
    pub report: SanitizeReport,
}

enum NumericRepair {
    Kept(String),
    Filled,
    Coerced,
    Clipped,
}

fn repair_numeric(raw: &str) -> NumericRepair {
    if raw.trim().is_empty() {
        return NumericRepair::Filled;
    }
    match parse_f64(raw) {
        None => NumericRepair::Coerced,
        Some(value) if value < 0.0 => NumericRepair::Clipped,
        Some(value) => NumericRepair::Kept(format_numeric(value)),
    }
}

fn bump(counter: &mut BTreeMap<String, usize>, column: &str) {
    *counter.entry(column.to_string()).or_insert(0) += 1;
}

/// Repairs a normalized table for the given role.
///
/// - numeric columns: empty, non-numeric, and negative values become `0`
/// - key columns: trimmed, literal `nan` treated as empty; stock rows with an
///   empty key are dropped, matrix rows are kept and counted
/// - stock descriptions: empty values get [`MISSING_DESCRIPTION`]
/// - matrix rows with all three zones at zero are kept and counted
pub fn sanitize(table: &RawTable, role: SourceRole) -> SanitizedTable {
    let mut report = SanitizeReport::new(role, table.row_count());
    let numeric: Vec<(usize, &str)> = columns::NUMERIC_COLUMNS
        .iter()
        .filter_map(|name| table.column_index(name).map(|idx| (idx, *name)))
        .collect();
    let keys: Vec<usize> = columns::KEY_COLUMNS
        .iter()
        .filter_map(|name| table.column_index(name))
        .collect();
    let describe = table.column_index(columns::DESCRIBE);
    let zones: Vec<usize> = columns::ZONE_COLUMNS
        .iter()
        .filter_map(|name| table.column_index(name))
        .collect();

    let width = table.headers.len();
    let mut rows = Vec::with_capacity(table.row_count());
    for row in &table.rows {
        let mut row = row.clone();
        row.resize(width, String::new());
        for &(idx, name) in &numeric {
            row[idx] = match repair_numeric(&row[idx]) {
                NumericRepair::Kept(value) => value,
                NumericRepair::Filled => {
                    bump(&mut report.filled_missing, name);
                    "0".to_string()
                }
                NumericRepair::Coerced => {
                    bump(&mut report.coerced_non_numeric, name);
                    "0".to_string()
                }
                NumericRepair::Clipped => {
                    bump(&mut report.clipped_negative, name);
                    "0".to_string()
                }
            };
        }

        for &idx in &keys {
            row[idx] = clean_key(&row[idx]);
        }
        let empty_key = keys.len() < columns::KEY_COLUMNS.len()
            || keys.iter().any(|&idx| row[idx].is_empty());

        if let Some(idx) = describe {
            let trimmed = row[idx].trim().to_string();
            row[idx] = if trimmed.is_empty() && role == SourceRole::Stock {
                report.defaulted_description += 1;
                MISSING_DESCRIPTION.to_string()
            } else {
                trimmed
            };
        }

        match role {
            SourceRole::Stock if empty_key => {
                report.dropped_empty_key += 1;
                continue;
            }
            SourceRole::Matrix if empty_key => report.empty_key_rows += 1,
            _ => {}
        }

        if role == SourceRole::Matrix
            && !zones.is_empty()
            && zones.iter().all(|&idx| parse_f64(&row[idx]).unwrap_or(0.0) == 0.0)
        {
            report.all_zero_zones += 1;
        }
        rows.push(row);
    }

    report.output_rows = rows.len();
    for message in report.messages() {
        warn!(role = %role, "{message}");
    }
    SanitizedTable {
        table: RawTable {
            headers: table.headers.clone(),
            rows,
        },
        report,
    }
}
