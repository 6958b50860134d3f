//! Buffer record produced by the buffer engine.

use serde::{Deserialize, Serialize};

use crate::enums::BufferStatus;

/// Cumulative zone boundaries of one buffer.
///
/// Built from clipped non-negative zone sizes, so
/// `red_max <= yellow_max <= green_max` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoneBoundaries {
    pub red_max: f64,
    pub yellow_max: f64,
    pub green_max: f64,
}

impl ZoneBoundaries {
    /// Builds boundaries from zone sizes. Negative or non-finite sizes count as zero.
    pub fn from_sizes(red: f64, yellow: f64, green: f64) -> Self {
        let red = non_negative(red);
        let yellow = non_negative(yellow);
        let green = non_negative(green);
        Self {
            red_max: red,
            yellow_max: red + yellow,
            green_max: red + yellow + green,
        }
    }

    /// Replenishment target: sum of all three zones.
    pub fn top_of_green(&self) -> f64 {
        self.green_max
    }

    /// Returns true when no buffer is configured.
    pub fn is_unconfigured(&self) -> bool {
        self.green_max == 0.0
    }
}

/// Clamps a value to the non-negative finite range, mapping NaN and negatives to zero.
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// One SKU at one store after merge and classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferRecord {
    #[serde(rename = "Article")]
    pub article: String,
    #[serde(rename = "Store_ID")]
    pub store_id: String,
    #[serde(rename = "Describe")]
    pub describe: String,
    #[serde(rename = "Red_Zone")]
    pub red_zone: f64,
    #[serde(rename = "Yellow_Zone")]
    pub yellow_zone: f64,
    #[serde(rename = "Green_Zone")]
    pub green_zone: f64,
    #[serde(rename = "Top_of_Green")]
    pub top_of_green: f64,
    #[serde(rename = "Red_Zone_Max")]
    pub red_zone_max: f64,
    #[serde(rename = "Yellow_Zone_Max")]
    pub yellow_zone_max: f64,
    #[serde(rename = "Green_Zone_Max")]
    pub green_zone_max: f64,
    #[serde(rename = "Current_Stock")]
    pub current_stock: f64,
    #[serde(rename = "Buffer_Status")]
    pub buffer_status: BufferStatus,
    #[serde(rename = "Buffer_Fill_Percent")]
    pub buffer_fill_percent: f64,
    #[serde(rename = "Order_Qty")]
    pub order_qty: u64,
    #[serde(rename = "Priority")]
    pub priority: u8,
    /// `None` when no usage column was supplied, `+inf` when usage is zero.
    #[serde(rename = "Days_Until_Stockout")]
    pub days_until_stockout: Option<f64>,
    #[serde(rename = "Stock_Value")]
    pub stock_value: f64,
    #[serde(rename = "Brand", skip_serializing_if = "Option::is_none", default)]
    pub brand: Option<String>,
    #[serde(rename = "Model", skip_serializing_if = "Option::is_none", default)]
    pub model: Option<String>,
    #[serde(rename = "Retail_Price", skip_serializing_if = "Option::is_none", default)]
    pub retail_price: Option<f64>,
    #[serde(rename = "Avg_Daily_Usage", skip_serializing_if = "Option::is_none", default)]
    pub avg_daily_usage: Option<f64>,
    #[serde(rename = "ABC_Class", skip_serializing_if = "Option::is_none", default)]
    pub abc_class: Option<String>,
}

/// Which optional enrichment columns were present in either input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnrichmentColumns {
    pub brand: bool,
    pub model: bool,
    pub retail_price: bool,
    pub avg_daily_usage: bool,
    pub abc_class: bool,
}

impl EnrichmentColumns {
    /// Combines presence flags from two sources.
    pub fn union(self, other: Self) -> Self {
        Self {
            brand: self.brand || other.brand,
            model: self.model || other.model,
            retail_price: self.retail_price || other.retail_price,
            avg_daily_usage: self.avg_daily_usage || other.avg_daily_usage,
            abc_class: self.abc_class || other.abc_class,
        }
    }
}
