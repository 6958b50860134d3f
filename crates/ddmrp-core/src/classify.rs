//! Pure per-row buffer signals.
//!
//! # Boundary inclusion
//!
//! Each band includes its upper boundary: a stock level exactly equal to a
//! boundary belongs to the lower, more urgent band.
//!
//! | stock                              | status |
//! |------------------------------------|--------|
//! | top of green is 0                  | N/A    |
//! | `stock <= red_max`                 | RED    |
//! | `red_max < stock <= yellow_max`    | YELLOW |
//! | `yellow_max < stock <= green_max`  | GREEN  |
//! | `stock > green_max`                | EXCESS |
//!
//! So stock equal to top of green is GREEN, and an unconfigured buffer is
//! N/A even at zero stock.

use ddmrp_model::{BufferStatus, ZoneBoundaries};

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Classifies a stock level against the zone boundaries.
pub fn classify(stock: f64, zones: &ZoneBoundaries) -> BufferStatus {
    if zones.is_unconfigured() {
        BufferStatus::NotApplicable
    } else if stock <= zones.red_max {
        BufferStatus::Red
    } else if stock <= zones.yellow_max {
        BufferStatus::Yellow
    } else if stock <= zones.green_max {
        BufferStatus::Green
    } else {
        BufferStatus::Excess
    }
}

/// Stock as a percentage of top of green, one decimal; 0 without a buffer.
pub fn fill_percent(stock: f64, top_of_green: f64) -> f64 {
    if top_of_green > 0.0 {
        round1(stock / top_of_green * 100.0)
    } else {
        0.0
    }
}

/// Whole units needed to refill to top of green; 0 unless RED or YELLOW.
pub fn order_quantity(status: BufferStatus, stock: f64, top_of_green: f64) -> u64 {
    if !status.needs_order() {
        return 0;
    }
    let missing = (top_of_green - stock).round();
    if missing > 0.0 { missing as u64 } else { 0 }
}

/// Days of stock left at the given usage rate, one decimal.
///
/// `None` when no usage figure exists, `+inf` when usage is zero.
pub fn days_until_stockout(stock: f64, avg_daily_usage: Option<f64>) -> Option<f64> {
    let usage = avg_daily_usage?;
    if usage > 0.0 {
        Some(round1(stock / usage))
    } else {
        Some(f64::INFINITY)
    }
}
