//! Canonical column names shared by every stage of the pipeline.
//!
//! Raw spreadsheet headers are resolved onto these names once at ingestion;
//! nothing downstream looks at the raw names again.

pub const ARTICLE: &str = "Article";
pub const STORE_ID: &str = "Store_ID";
pub const DESCRIBE: &str = "Describe";
pub const RED_ZONE: &str = "Red_Zone";
pub const YELLOW_ZONE: &str = "Yellow_Zone";
pub const GREEN_ZONE: &str = "Green_Zone";
pub const CURRENT_STOCK: &str = "Current_Stock";

pub const BRAND: &str = "Brand";
pub const MODEL: &str = "Model";
pub const RETAIL_PRICE: &str = "Retail_Price";
pub const AVG_DAILY_USAGE: &str = "Avg_Daily_Usage";
pub const ABC_CLASS: &str = "ABC_Class";

pub const TOP_OF_GREEN: &str = "Top_of_Green";
pub const RED_ZONE_MAX: &str = "Red_Zone_Max";
pub const YELLOW_ZONE_MAX: &str = "Yellow_Zone_Max";
pub const GREEN_ZONE_MAX: &str = "Green_Zone_Max";
pub const STOCK_VALUE: &str = "Stock_Value";
pub const BUFFER_STATUS: &str = "Buffer_Status";
pub const BUFFER_FILL_PERCENT: &str = "Buffer_Fill_Percent";
pub const ORDER_QTY: &str = "Order_Qty";
pub const PRIORITY: &str = "Priority";
pub const DAYS_UNTIL_STOCKOUT: &str = "Days_Until_Stockout";

/// Key columns forming the natural `(Article, Store_ID)` key.
pub const KEY_COLUMNS: [&str; 2] = [ARTICLE, STORE_ID];

/// Columns coerced to non-negative numbers by the sanitizer.
pub const NUMERIC_COLUMNS: [&str; 6] = [
    RED_ZONE,
    YELLOW_ZONE,
    GREEN_ZONE,
    CURRENT_STOCK,
    RETAIL_PRICE,
    AVG_DAILY_USAGE,
];

/// Zone size columns of the trade matrix.
pub const ZONE_COLUMNS: [&str; 3] = [RED_ZONE, YELLOW_ZONE, GREEN_ZONE];
