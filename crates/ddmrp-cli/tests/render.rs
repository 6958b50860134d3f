//! Terminal rendering of pipeline results.

use ddmrp_cli::render::{
    abc_table, column_text, orders_table, overview_table, repairs_table, status_legend_table,
    store_table,
};
use ddmrp_core::{PipelineResult, run_pipeline};
use ddmrp_ingest::RawTable;

const MATRIX: &str = "\
Art,Описание,Magazin,Red,Yellow,Green,ABC
A1,Widget,6,10,20,30,A
A2,Gadget,6,5,5,5,B
A3,Gizmo,7,0,0,0,C
";

const STOCK: &str = "\
Art;Magazin;Describe;к-во;Avg_Daily_Usage
A1;6;Widget;15;2
A2;6;Gadget;-4;0
A3;7;Gizmo;3;1
";

fn result() -> PipelineResult {
    let matrix = RawTable::from_csv_bytes(MATRIX.as_bytes()).expect("matrix");
    let stock = RawTable::from_csv_bytes(STOCK.as_bytes()).expect("stock");
    run_pipeline(matrix, stock).expect("pipeline")
}

#[test]
fn order_lines_render_report_columns() {
    let result = result();
    let rendered: Vec<String> = result
        .orders
        .lines
        .iter()
        .map(|line| {
            result
                .orders
                .columns
                .iter()
                .map(|column| column_text(line, column))
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect();
    insta::assert_snapshot!(rendered.join("\n"), @r"
    6 | A2 | Gadget | 0 | 15 | 15 | RED | 1 | ∞
    6 | A1 | Widget | 15 | 60 | 45 | YELLOW | 2 | 7.5
    ");
}

#[test]
fn tables_mention_every_store_and_status() {
    let result = result();
    let summary = result.summary();

    let overview = overview_table(&summary).to_string();
    for label in ["Total items", "RED", "YELLOW", "N/A", "Units to order"] {
        assert!(overview.contains(label), "overview lacks {label}");
    }

    let stores = store_table(&summary).to_string();
    assert!(stores.contains('6') && stores.contains('7'));

    let abc = abc_table(&summary).expect("abc column present").to_string();
    assert!(abc.contains("ABC"));

    let lines: Vec<_> = result.orders.lines.iter().collect();
    let orders = orders_table(&result.orders, &lines).to_string();
    assert!(orders.contains("Gadget"));
    assert!(orders.contains("∞"));

    let legend = status_legend_table().to_string();
    assert!(legend.contains("EXCESS"));
}

#[test]
fn repairs_are_listed_per_source() {
    let result = result();
    let table = repairs_table(&[&result.matrix_report, &result.stock_report])
        .expect("negative stock was clipped")
        .to_string();
    assert!(table.contains("stock"));
}
