//! Reports surfaced by the ingestion stages.
//!
//! Neither report is an error: they exist so the caller can show the user
//! what was resolved or repaired on the way in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::SourceRole;

/// One raw header resolved onto a canonical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub source: String,
    pub canonical: String,
}

/// Outcome of header normalization for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnResolution {
    pub role: SourceRole,
    /// Raw headers renamed to a canonical name (including identity matches).
    pub mapped: Vec<ColumnMapping>,
    /// Headers with no canonical counterpart, kept unchanged.
    pub passthrough: Vec<String>,
}

impl ColumnResolution {
    pub fn new(role: SourceRole) -> Self {
        Self {
            role,
            mapped: Vec::new(),
            passthrough: Vec::new(),
        }
    }

    /// Returns the raw header that resolved to `canonical`, if any.
    pub fn source_for(&self, canonical: &str) -> Option<&str> {
        self.mapped
            .iter()
            .find(|mapping| mapping.canonical == canonical)
            .map(|mapping| mapping.source.as_str())
    }
}

/// Counts of every repair the sanitizer performed on one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeReport {
    pub role: SourceRole,
    pub input_rows: usize,
    pub output_rows: usize,
    /// Non-numeric (or non-finite) values replaced by 0, per column.
    pub coerced_non_numeric: BTreeMap<String, usize>,
    /// Empty numeric cells filled with 0, per column.
    pub filled_missing: BTreeMap<String, usize>,
    /// Negative values clipped to 0, per column.
    pub clipped_negative: BTreeMap<String, usize>,
    /// Stock rows removed because `Article` or `Store_ID` was empty.
    pub dropped_empty_key: usize,
    /// Matrix rows kept despite an empty key.
    pub empty_key_rows: usize,
    /// Stock rows whose empty description got the placeholder.
    pub defaulted_description: usize,
    /// Matrix rows with all three zones equal to zero.
    pub all_zero_zones: usize,
}

impl SanitizeReport {
    pub fn new(role: SourceRole, input_rows: usize) -> Self {
        Self {
            role,
            input_rows,
            output_rows: input_rows,
            coerced_non_numeric: BTreeMap::new(),
            filled_missing: BTreeMap::new(),
            clipped_negative: BTreeMap::new(),
            dropped_empty_key: 0,
            empty_key_rows: 0,
            defaulted_description: 0,
            all_zero_zones: 0,
        }
    }

    /// Total number of cell-level and row-level repairs.
    pub fn total_repairs(&self) -> usize {
        self.coerced_non_numeric.values().sum::<usize>()
            + self.filled_missing.values().sum::<usize>()
            + self.clipped_negative.values().sum::<usize>()
            + self.dropped_empty_key
            + self.defaulted_description
    }

    /// True when nothing was repaired and nothing needs a warning.
    pub fn is_clean(&self) -> bool {
        self.total_repairs() == 0 && self.empty_key_rows == 0 && self.all_zero_zones == 0
    }

    /// Human-readable repair lines, one per non-zero counter.
    pub fn messages(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (column, count) in &self.coerced_non_numeric {
            lines.push(format!(
                "{}: {count} non-numeric value(s) in {column} replaced by 0",
                self.role
            ));
        }
        for (column, count) in &self.filled_missing {
            lines.push(format!(
                "{}: {count} empty value(s) in {column} filled with 0",
                self.role
            ));
        }
        for (column, count) in &self.clipped_negative {
            lines.push(format!(
                "{}: {count} negative value(s) in {column} clipped to 0",
                self.role
            ));
        }
        if self.dropped_empty_key > 0 {
            lines.push(format!(
                "{}: {} row(s) with empty Article or Store_ID dropped",
                self.role, self.dropped_empty_key
            ));
        }
        if self.empty_key_rows > 0 {
            lines.push(format!(
                "{}: {} row(s) with empty Article or Store_ID kept",
                self.role, self.empty_key_rows
            ));
        }
        if self.defaulted_description > 0 {
            lines.push(format!(
                "{}: {} empty description(s) replaced by placeholder",
                self.role, self.defaulted_description
            ));
        }
        if self.all_zero_zones > 0 {
            lines.push(format!(
                "{}: {} row(s) with all zones 0 (no buffer configured)",
                self.role, self.all_zero_zones
            ));
        }
        lines
    }
}
