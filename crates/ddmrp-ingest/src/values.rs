//! Cell value helpers.
//!
//! Spreadsheet exports mix decimal points and decimal commas, and pandas-style
//! exports write missing keys as the literal `nan`; these helpers give every
//! stage the same reading of a raw cell.

/// Parses a cell as a finite f64.
///
/// Accepts a single decimal comma followed by one or two digits (`"12,5"`)
/// when the value has no decimal point. `"1,234"` reads as a thousands
/// separator and is rejected.
/// Returns None for empty, non-numeric, or non-finite input.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = match trimmed.parse::<f64>() {
        Ok(number) => Some(number),
        Err(_) if is_decimal_comma(trimmed) => trimmed.replace(',', ".").parse::<f64>().ok(),
        Err(_) => None,
    };
    parsed.filter(|number| number.is_finite())
}

fn is_decimal_comma(value: &str) -> bool {
    if value.contains('.') {
        return false;
    }
    match value.split_once(',') {
        Some((_, fraction)) => {
            (1..=2).contains(&fraction.len()) && fraction.bytes().all(|byte| byte.is_ascii_digit())
        }
        None => false,
    }
}

/// Formats a number in its shortest round-trip form (`10`, `2.5`).
///
/// Negative zero is written as `0`.
pub fn format_numeric(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

/// Returns true for cells that represent a missing value.
pub fn is_missing_token(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan")
}

/// Trims a key cell, mapping missing tokens to the empty string.
pub fn clean_key(value: &str) -> String {
    if is_missing_token(value) {
        String::new()
    } else {
        value.trim().to_string()
    }
}
