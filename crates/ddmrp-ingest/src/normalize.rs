//! Header normalization onto canonical column names.
//!
//! Both inputs arrive with loose, partly localized headers (`Art`, `Магазин`,
//! `к-во`). [`COLUMN_ALIASES`] lists, per canonical column, the accepted
//! spellings in priority order. Matching ignores case and treats `_`, `-`,
//! `.` and repeated whitespace as a single space.

use ddmrp_model::columns;
use ddmrp_model::{ColumnMapping, ColumnResolution, SourceRole};
use tracing::{debug, info};

use crate::error::SchemaError;
use crate::table::RawTable;

/// Accepted spellings for one canonical column.
#[derive(Debug, Clone, Copy)]
pub struct ColumnAlias {
    pub canonical: &'static str,
    /// Tried in order after the canonical name itself.
    pub aliases: &'static [&'static str],
}

pub const COLUMN_ALIASES: &[ColumnAlias] = &[
    ColumnAlias {
        canonical: columns::ARTICLE,
        aliases: &["Art", "Артикул", "Арт", "SKU"],
    },
    ColumnAlias {
        canonical: columns::STORE_ID,
        aliases: &["Magazin", "Магазин", "Store", "Shop"],
    },
    ColumnAlias {
        canonical: columns::DESCRIBE,
        aliases: &["Description", "Описание", "Наименование"],
    },
    ColumnAlias {
        canonical: columns::RED_ZONE,
        aliases: &["Red", "Красная зона", "Красная"],
    },
    ColumnAlias {
        canonical: columns::YELLOW_ZONE,
        aliases: &["Yellow", "Желтая зона", "Жёлтая зона", "Желтая"],
    },
    ColumnAlias {
        canonical: columns::GREEN_ZONE,
        aliases: &["Green", "Зеленая зона", "Зелёная зона", "Зеленая"],
    },
    ColumnAlias {
        canonical: columns::CURRENT_STOCK,
        aliases: &["к-во", "кво", "Количество", "Qty", "Stock", "Остаток"],
    },
    ColumnAlias {
        canonical: columns::BRAND,
        aliases: &["Бренд", "Марка"],
    },
    ColumnAlias {
        canonical: columns::MODEL,
        aliases: &["Модель"],
    },
    ColumnAlias {
        canonical: columns::RETAIL_PRICE,
        aliases: &["Price", "Розничная цена", "Цена"],
    },
    ColumnAlias {
        canonical: columns::AVG_DAILY_USAGE,
        aliases: &["ADU", "Daily Usage", "Среднедневной расход"],
    },
    ColumnAlias {
        canonical: columns::ABC_CLASS,
        aliases: &["ABC", "ABC класс"],
    },
];

/// Lowercases and collapses separators so `Red Zone`, `red_zone` and `RED-ZONE` compare equal.
pub fn alias_key(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['_', '-', '.'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// A table whose headers use canonical names, with the resolution that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    pub table: RawTable,
    pub resolution: ColumnResolution,
}

/// Assigns a canonical name to header positions.
///
/// For each canonical column the first accepted spelling present among the
/// unclaimed headers wins; a header is claimed at most once.
fn claim_columns(headers: &[String]) -> Vec<Option<&'static str>> {
    let keys: Vec<String> = headers.iter().map(|header| alias_key(header)).collect();
    let mut claimed: Vec<Option<&'static str>> = vec![None; headers.len()];
    for entry in COLUMN_ALIASES {
        let candidates = std::iter::once(entry.canonical).chain(entry.aliases.iter().copied());
        for candidate in candidates {
            let wanted = alias_key(candidate);
            let found = keys
                .iter()
                .enumerate()
                .find(|(idx, key)| claimed[*idx].is_none() && **key == wanted)
                .map(|(idx, _)| idx);
            if let Some(idx) = found {
                claimed[idx] = Some(entry.canonical);
                break;
            }
        }
    }
    claimed
}

fn claim_and_resolve(
    headers: &[String],
    role: SourceRole,
) -> (ColumnResolution, Vec<Option<&'static str>>) {
    let claimed = claim_columns(headers);
    let mut resolution = ColumnResolution::new(role);
    for (header, canonical) in headers.iter().zip(&claimed) {
        match canonical {
            Some(canonical) => resolution.mapped.push(ColumnMapping {
                source: header.clone(),
                canonical: (*canonical).to_string(),
            }),
            None => resolution.passthrough.push(header.clone()),
        }
    }
    (resolution, claimed)
}

/// Resolves raw headers onto canonical names without touching any data.
pub fn resolve_columns(headers: &[String], role: SourceRole) -> ColumnResolution {
    claim_and_resolve(headers, role).0
}

/// Renames headers to canonical names and checks the role's required columns.
///
/// Unknown columns pass through unchanged. Fails without returning a partial
/// table when any required column is still missing.
pub fn normalize_columns(table: RawTable, role: SourceRole) -> Result<NormalizedTable, SchemaError> {
    let (resolution, claimed) = claim_and_resolve(&table.headers, role);
    let RawTable { headers, rows } = table;
    let headers: Vec<String> = headers
        .into_iter()
        .zip(claimed)
        .map(|(header, canonical)| canonical.map_or(header, str::to_string))
        .collect();

    let missing: Vec<String> = role
        .required_columns()
        .iter()
        .filter(|required| !headers.iter().any(|header| header == *required))
        .map(|required| (*required).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SchemaError {
            role,
            missing,
            available: headers,
        });
    }

    info!(
        role = %role,
        columns = ?headers,
        "resolved columns"
    );
    if !resolution.passthrough.is_empty() {
        debug!(
            role = %role,
            unmapped = ?resolution.passthrough,
            "columns kept without canonical name"
        );
    }
    Ok(NormalizedTable {
        table: RawTable { headers, rows },
        resolution,
    })
}
