//! Terminal tables for computation results.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ddmrp_core::{BufferSummary, OrderReport};
use ddmrp_model::{BufferRecord, BufferStatus, SanitizeReport, columns};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn status_color(status: BufferStatus) -> Color {
    match status {
        BufferStatus::Red => Color::Red,
        BufferStatus::Yellow => Color::Yellow,
        BufferStatus::Green => Color::Green,
        BufferStatus::Excess => Color::Blue,
        BufferStatus::NotApplicable => Color::DarkGrey,
    }
}

fn status_cell(status: BufferStatus) -> Cell {
    Cell::new(status.as_str())
        .fg(status_color(status))
        .add_attribute(Attribute::Bold)
}

/// Whole numbers without a fraction, others with up to two decimals.
pub fn format_quantity(value: f64) -> String {
    if value.is_infinite() {
        "∞".to_string()
    } else if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Display text of one canonical column of a record.
pub fn column_text(record: &BufferRecord, column: &str) -> String {
    let optional = |value: Option<&str>| value.unwrap_or("").to_string();
    match column {
        columns::ARTICLE => record.article.clone(),
        columns::STORE_ID => record.store_id.clone(),
        columns::DESCRIBE => record.describe.clone(),
        columns::BRAND => optional(record.brand.as_deref()),
        columns::MODEL => optional(record.model.as_deref()),
        columns::ABC_CLASS => optional(record.abc_class.as_deref()),
        columns::CURRENT_STOCK => format_quantity(record.current_stock),
        columns::TOP_OF_GREEN => format_quantity(record.top_of_green),
        columns::ORDER_QTY => record.order_qty.to_string(),
        columns::BUFFER_STATUS => record.buffer_status.to_string(),
        columns::BUFFER_FILL_PERCENT => format!("{:.1}%", record.buffer_fill_percent),
        columns::PRIORITY => record.priority.to_string(),
        columns::DAYS_UNTIL_STOCKOUT => record
            .days_until_stockout
            .map(format_quantity)
            .unwrap_or_default(),
        columns::STOCK_VALUE => format!("{:.2}", record.stock_value),
        _ => String::new(),
    }
}

/// Headline figures of one run.
pub fn overview_table(summary: &BufferSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Total items"), Cell::new(summary.total_items)]);
    for status in BufferStatus::ALL {
        table.add_row(vec![
            status_cell(status),
            count_cell(summary.count(status), status_color(status)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Units to order").add_attribute(Attribute::Bold),
        Cell::new(summary.total_order_qty).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Stock value"),
        Cell::new(format!("{:.2}", summary.total_stock_value)),
    ]);
    table
}

/// Items, urgent counts, and units to order per store.
pub fn store_table(summary: &BufferSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Store"),
        header_cell("Items"),
        header_cell("RED"),
        header_cell("YELLOW"),
        header_cell("To order"),
    ]);
    apply_table_style(&mut table);
    for index in 1..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for store in &summary.stores {
        table.add_row(vec![
            Cell::new(&store.store_id).add_attribute(Attribute::Bold),
            Cell::new(store.items),
            count_cell(store.red, Color::Red),
            count_cell(store.yellow, Color::Yellow),
            Cell::new(store.order_qty),
        ]);
    }
    table
}

/// Status counts per ABC class; `None` without a class column.
pub fn abc_table(summary: &BufferSummary) -> Option<Table> {
    let classes = summary.abc_classes.as_ref()?;
    let mut table = Table::new();
    let mut header = vec![header_cell("ABC"), header_cell("Items")];
    header.extend(BufferStatus::ALL.iter().map(|status| header_cell(status.as_str())));
    table.set_header(header);
    apply_table_style(&mut table);
    for class in classes {
        let mut row = vec![
            Cell::new(&class.class).add_attribute(Attribute::Bold),
            Cell::new(class.items),
        ];
        row.extend(BufferStatus::ALL.iter().map(|status| {
            let count = class.by_status.get(status).copied().unwrap_or(0);
            count_cell(count, status_color(*status))
        }));
        table.add_row(row);
    }
    Some(table)
}

/// Order lines with the report's columns.
pub fn orders_table(report: &OrderReport, lines: &[&BufferRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(report.columns.iter().map(|name| header_cell(name)));
    apply_table_style(&mut table);
    for (index, name) in report.columns.iter().enumerate() {
        if matches!(
            *name,
            columns::CURRENT_STOCK
                | columns::TOP_OF_GREEN
                | columns::ORDER_QTY
                | columns::PRIORITY
                | columns::DAYS_UNTIL_STOCKOUT
        ) {
            align_column(&mut table, index, CellAlignment::Right);
        }
    }
    for line in lines {
        let row: Vec<Cell> = report
            .columns
            .iter()
            .map(|name| match *name {
                columns::BUFFER_STATUS => status_cell(line.buffer_status),
                columns::ORDER_QTY => {
                    Cell::new(line.order_qty).add_attribute(Attribute::Bold)
                }
                _ => Cell::new(column_text(line, name)),
            })
            .collect();
        table.add_row(row);
    }
    table
}

/// Input repairs of both sources, one row per message.
pub fn repairs_table(reports: &[&SanitizeReport]) -> Option<Table> {
    let messages: Vec<String> = reports.iter().flat_map(|report| report.messages()).collect();
    if messages.is_empty() {
        return None;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Repair")]);
    apply_table_style(&mut table);
    for message in messages {
        table.add_row(vec![Cell::new(message).fg(Color::Yellow)]);
    }
    Some(table)
}

/// Status legend with priorities.
pub fn status_legend_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Status"),
        header_cell("Priority"),
        header_cell("Orders"),
        header_cell("Meaning"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Center);
    for status in BufferStatus::ALL {
        table.add_row(vec![
            status_cell(status),
            Cell::new(status.priority()),
            if status.needs_order() {
                Cell::new("yes").fg(Color::Red)
            } else {
                dim_cell("no")
            },
            Cell::new(status.description()),
        ]);
    }
    table
}
