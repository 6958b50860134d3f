//! Type-safe enumerations for buffer classification and input roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::columns;
use crate::error::ModelError;

/// Buffer status of one SKU at one store.
///
/// Variants are declared in priority order, so the derived `Ord` matches
/// [`BufferStatus::priority`]: RED is the most urgent, N/A the least.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BufferStatus {
    /// Stock at or below the top of the red zone.
    #[serde(rename = "RED")]
    Red,
    /// Stock inside the yellow band (replenishment zone).
    #[serde(rename = "YELLOW")]
    Yellow,
    /// Stock inside the green band.
    #[serde(rename = "GREEN")]
    Green,
    /// Stock above top of green.
    #[serde(rename = "EXCESS")]
    Excess,
    /// No buffer configured (all three zones are zero).
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl BufferStatus {
    /// All statuses in priority order.
    pub const ALL: [BufferStatus; 5] = [
        BufferStatus::Red,
        BufferStatus::Yellow,
        BufferStatus::Green,
        BufferStatus::Excess,
        BufferStatus::NotApplicable,
    ];

    /// Returns the label used in exported tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            BufferStatus::Red => "RED",
            BufferStatus::Yellow => "YELLOW",
            BufferStatus::Green => "GREEN",
            BufferStatus::Excess => "EXCESS",
            BufferStatus::NotApplicable => "N/A",
        }
    }

    /// Reorder priority, lower is more urgent.
    pub fn priority(&self) -> u8 {
        match self {
            BufferStatus::Red => 1,
            BufferStatus::Yellow => 2,
            BufferStatus::Green => 3,
            BufferStatus::Excess => 4,
            BufferStatus::NotApplicable => 5,
        }
    }

    /// Returns true for statuses that trigger a replenishment order.
    pub fn needs_order(&self) -> bool {
        matches!(self, BufferStatus::Red | BufferStatus::Yellow)
    }

    /// Short human description for legends.
    pub fn description(&self) -> &'static str {
        match self {
            BufferStatus::Red => "Critical level, order urgently",
            BufferStatus::Yellow => "Replenishment zone, order required",
            BufferStatus::Green => "Normal level",
            BufferStatus::Excess => "Stock above top of green",
            BufferStatus::NotApplicable => "No buffer configured",
        }
    }
}

impl fmt::Display for BufferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for BufferStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_uppercase().as_str() {
            "RED" => Ok(BufferStatus::Red),
            "YELLOW" => Ok(BufferStatus::Yellow),
            "GREEN" => Ok(BufferStatus::Green),
            "EXCESS" => Ok(BufferStatus::Excess),
            "N/A" | "NA" => Ok(BufferStatus::NotApplicable),
            _ => Err(ModelError::UnknownStatus(trimmed.to_string())),
        }
    }
}

/// Which of the two input sources a table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceRole {
    /// Trade matrix: configured zone sizes per SKU and store.
    Matrix,
    /// On-hand stock snapshot.
    Stock,
}

impl SourceRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceRole::Matrix => "matrix",
            SourceRole::Stock => "stock",
        }
    }

    /// Canonical columns that must exist after normalization.
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            SourceRole::Matrix => &[
                columns::ARTICLE,
                columns::DESCRIBE,
                columns::STORE_ID,
                columns::RED_ZONE,
                columns::YELLOW_ZONE,
                columns::GREEN_ZONE,
            ],
            SourceRole::Stock => &[
                columns::ARTICLE,
                columns::STORE_ID,
                columns::DESCRIBE,
                columns::CURRENT_STOCK,
            ],
        }
    }
}

impl fmt::Display for SourceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// File format for exported tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.extension())
    }
}
