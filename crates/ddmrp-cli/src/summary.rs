use ddmrp_cli::render::{
    abc_table, orders_table, overview_table, repairs_table, status_legend_table, store_table,
};

use crate::commands::ComputeOutcome;

pub fn print_summary(outcome: &ComputeOutcome) {
    let result = &outcome.result;
    let buffers = &result.buffers;
    println!(
        "Computed {} buffers in {:.2}s ({} without stock, {} stock-only pairs ignored)",
        buffers.len(),
        outcome.elapsed.as_secs_f64(),
        buffers.unmatched_rows,
        buffers.ignored_stock_pairs
    );
    if !outcome.filter.is_empty() {
        println!("Filter applied: figures below cover the selected records only");
    }

    let summary = outcome.selected_summary();
    println!("{}", overview_table(&summary));
    if !summary.stores.is_empty() {
        println!("{}", store_table(&summary));
    }
    if let Some(table) = abc_table(&summary) {
        println!("{table}");
    }
    if let Some(table) = repairs_table(&[&result.matrix_report, &result.stock_report]) {
        println!("Input repairs:");
        println!("{table}");
    }

    let orders = outcome.selected_orders();
    if orders.is_empty() {
        println!("All buffers are healthy, nothing to order.");
    } else {
        match outcome.top {
            Some(n) => println!("Largest {} orders:", orders.len().min(n)),
            None => println!("Order list ({} lines):", orders.len()),
        }
        println!("{}", orders_table(&result.orders, &orders));
    }

    for file in &outcome.exported {
        println!("Wrote {} ({} rows)", file.path.display(), file.rows);
    }
}

pub fn print_statuses() {
    println!("{}", status_legend_table());
}
