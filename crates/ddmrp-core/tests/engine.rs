use ddmrp_core::{build_order_report, compute_buffers, run_pipeline};
use ddmrp_ingest::RawTable;
use ddmrp_model::{BufferRecord, BufferStatus};
use proptest::prelude::*;

const MATRIX_HEADERS: [&str; 6] = [
    "Article",
    "Describe",
    "Store_ID",
    "Red_Zone",
    "Yellow_Zone",
    "Green_Zone",
];

const STOCK_HEADERS: [&str; 4] = ["Article", "Store_ID", "Describe", "Current_Stock"];

fn table(headers: &[&str], rows: Vec<Vec<String>>) -> RawTable {
    RawTable::new(headers.iter().map(|h| (*h).to_string()).collect(), rows)
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| (*c).to_string()).collect()
}

fn single(matrix_row: &[&str], stock_rows: Vec<Vec<String>>) -> BufferRecord {
    let matrix = table(&MATRIX_HEADERS, vec![row(matrix_row)]);
    let stock = table(&STOCK_HEADERS, stock_rows);
    let result = compute_buffers(&matrix, &stock).expect("compute");
    assert_eq!(result.len(), 1);
    result.records.into_iter().next().expect("one record")
}

#[test]
fn matched_row_in_yellow_band() {
    let record = single(
        &["A1", "Widget", "6", "10", "20", "30"],
        vec![row(&["A1", "6", "Widget", "15"])],
    );
    assert_eq!(record.top_of_green, 60.0);
    assert_eq!(record.buffer_status, BufferStatus::Yellow);
    assert_eq!(record.buffer_fill_percent, 25.0);
    assert_eq!(record.order_qty, 45);
    assert_eq!(record.priority, 2);
}

#[test]
fn unmatched_row_is_red_with_full_order() {
    let record = single(
        &["A1", "Widget", "6", "10", "20", "30"],
        vec![row(&["B9", "6", "Other", "15"])],
    );
    assert_eq!(record.current_stock, 0.0);
    assert_eq!(record.buffer_status, BufferStatus::Red);
    assert_eq!(record.order_qty, 60);
    assert_eq!(record.priority, 1);
}

#[test]
fn unconfigured_buffer_is_not_applicable_regardless_of_stock() {
    for stock in ["0", "7", "1000"] {
        let record = single(
            &["A1", "Widget", "6", "0", "0", "0"],
            vec![row(&["A1", "6", "Widget", stock])],
        );
        assert_eq!(record.buffer_status, BufferStatus::NotApplicable);
        assert_eq!(record.order_qty, 0);
        assert_eq!(record.priority, 5);
        assert_eq!(record.buffer_fill_percent, 0.0);
    }
}

#[test]
fn stock_equal_to_top_of_green_is_green() {
    let record = single(
        &["A1", "Widget", "6", "10", "20", "30"],
        vec![row(&["A1", "6", "Widget", "60"])],
    );
    assert_eq!(record.buffer_status, BufferStatus::Green);
    assert_eq!(record.buffer_fill_percent, 100.0);
}

#[test]
fn keys_are_opaque_strings() {
    let matrix = table(&MATRIX_HEADERS, vec![row(&["007", "x", "06", "1", "1", "1"])]);
    let stock = table(&STOCK_HEADERS, vec![row(&["7", "6", "x", "5"])]);
    let result = compute_buffers(&matrix, &stock).expect("compute");
    assert_eq!(result.unmatched_rows, 1);
    assert_eq!(result.records[0].article, "007");
    assert_eq!(result.records[0].store_id, "06");
}

#[test]
fn duplicate_matrix_rows_are_kept() {
    let matrix = table(
        &MATRIX_HEADERS,
        vec![
            row(&["A1", "x", "6", "1", "1", "1"]),
            row(&["A1", "x", "6", "1", "1", "1"]),
        ],
    );
    let stock = table(&STOCK_HEADERS, vec![row(&["A1", "6", "x", "2"])]);
    let result = compute_buffers(&matrix, &stock).expect("compute");
    assert_eq!(result.len(), 2);
    assert!(result.records.iter().all(|r| r.current_stock == 2.0));
}

#[test]
fn usage_column_drives_stockout_horizon() {
    let matrix = RawTable::from_csv_bytes(
        b"Article,Describe,Store_ID,Red_Zone,Yellow_Zone,Green_Zone,Avg_Daily_Usage\n\
          A1,x,6,10,20,30,4\n\
          A2,y,6,10,20,30,0\n",
    )
    .expect("matrix");
    let stock =
        RawTable::from_csv_bytes(b"Article,Store_ID,Describe,Current_Stock\nA1,6,x,10\nA2,6,y,10\n")
            .expect("stock");
    let result = run_pipeline(matrix, stock).expect("pipeline");
    assert!(result.buffers.has_usage());
    assert_eq!(result.buffers.records[0].days_until_stockout, Some(2.5));
    assert_eq!(
        result.buffers.records[1].days_until_stockout,
        Some(f64::INFINITY)
    );
}

#[test]
fn stock_without_usable_keys_leaves_matrix_unmatched() {
    let matrix = RawTable::from_csv_bytes(
        b"Article,Describe,Store_ID,Red_Zone,Yellow_Zone,Green_Zone\nA1,x,6,10,20,30\n",
    )
    .expect("matrix");
    let stock =
        RawTable::from_csv_bytes(b"Article,Store_ID,Describe,Current_Stock\nnan,6,x,5\n,7,y,3\n")
            .expect("stock");
    let result = run_pipeline(matrix, stock).expect("pipeline");

    assert_eq!(result.stock_report.dropped_empty_key, 2);
    assert_eq!(result.buffers.len(), 1);
    assert_eq!(result.buffers.unmatched_rows, 1);
    let record = &result.buffers.records[0];
    assert_eq!(record.current_stock, 0.0);
    assert_eq!(record.buffer_status, BufferStatus::Red);
    assert_eq!(record.order_qty, 60);
    assert_eq!(result.orders.len(), 1);
}

#[test]
fn dirty_inputs_are_repaired_before_merge() {
    let matrix = RawTable::from_csv_bytes(
        "Артикул;Описание;Магазин;Красная зона;Желтая зона;Зеленая зона\n\
         A1;Widget;6;-5;abc;12,5\n\
         ;Orphan;6;1;1;1\n"
            .as_bytes(),
    )
    .expect("matrix");
    let stock = RawTable::from_csv_bytes(b"Art,Magazin,Describe,Qty\nA1,6,,nan\n,6,x,3\n")
        .expect("stock");
    let result = run_pipeline(matrix, stock).expect("pipeline");

    assert_eq!(result.buffers.len(), 2);
    let first = &result.buffers.records[0];
    assert_eq!(first.red_zone, 0.0);
    assert_eq!(first.yellow_zone, 0.0);
    assert_eq!(first.green_zone, 12.5);
    assert_eq!(first.current_stock, 0.0);
    assert_eq!(first.buffer_status, BufferStatus::Red);
    assert_eq!(result.stock_report.dropped_empty_key, 1);
    assert_eq!(result.matrix_report.empty_key_rows, 1);
    assert!(result.total_repairs() > 0);
}

fn zone_value() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), 0.0f64..500.0, (0u32..200).prop_map(f64::from)]
}

fn matrix_rows() -> impl Strategy<Value = Vec<(String, String, f64, f64, f64)>> {
    prop::collection::vec(
        (
            "[A-C][0-9]",
            "[1-3]",
            zone_value(),
            zone_value(),
            zone_value(),
        ),
        1..20,
    )
}

fn stock_rows() -> impl Strategy<Value = Vec<(String, String, f64)>> {
    prop::collection::vec(("[A-C][0-9]", "[1-3]", zone_value()), 0..30)
}

fn build_inputs(
    matrix: &[(String, String, f64, f64, f64)],
    stock: &[(String, String, f64)],
) -> (RawTable, RawTable) {
    let matrix = table(
        &MATRIX_HEADERS,
        matrix
            .iter()
            .map(|(article, store, red, yellow, green)| {
                vec![
                    article.clone(),
                    "item".to_string(),
                    store.clone(),
                    red.to_string(),
                    yellow.to_string(),
                    green.to_string(),
                ]
            })
            .collect(),
    );
    let stock_rows: Vec<Vec<String>> = stock
        .iter()
        .map(|(article, store, qty)| {
            vec![article.clone(), store.clone(), "item".to_string(), qty.to_string()]
        })
        .collect();
    (matrix, table(&STOCK_HEADERS, stock_rows))
}

proptest! {
    #[test]
    fn record_invariants_hold(matrix in matrix_rows(), stock in stock_rows()) {
        let (matrix_table, stock_table) = build_inputs(&matrix, &stock);
        let result = compute_buffers(&matrix_table, &stock_table).expect("compute");

        prop_assert_eq!(result.len(), matrix.len());
        for record in &result.records {
            prop_assert!(record.red_zone_max <= record.yellow_zone_max);
            prop_assert!(record.yellow_zone_max <= record.green_zone_max);
            prop_assert_eq!(record.green_zone_max, record.top_of_green);
            prop_assert!(record.current_stock >= 0.0);
            prop_assert_eq!(
                record.buffer_status == BufferStatus::NotApplicable,
                record.top_of_green == 0.0
            );
            prop_assert_eq!(record.priority, record.buffer_status.priority());
            if record.order_qty > 0 {
                prop_assert!(record.buffer_status.needs_order());
            }
            if record.buffer_status.needs_order() {
                let expected = (record.top_of_green - record.current_stock).round().max(0.0);
                prop_assert_eq!(record.order_qty as f64, expected);
            } else {
                prop_assert_eq!(record.order_qty, 0);
            }
            match record.buffer_status {
                BufferStatus::Red => prop_assert!(record.current_stock <= record.red_zone_max),
                BufferStatus::Yellow => prop_assert!(
                    record.current_stock > record.red_zone_max
                        && record.current_stock <= record.yellow_zone_max
                ),
                BufferStatus::Green => prop_assert!(
                    record.current_stock > record.yellow_zone_max
                        && record.current_stock <= record.green_zone_max
                ),
                BufferStatus::Excess => prop_assert!(record.current_stock > record.green_zone_max),
                BufferStatus::NotApplicable => {}
            }
        }
    }

    #[test]
    fn order_report_is_sorted_and_actionable(matrix in matrix_rows(), stock in stock_rows()) {
        let (matrix_table, stock_table) = build_inputs(&matrix, &stock);
        let buffers = compute_buffers(&matrix_table, &stock_table).expect("compute");
        let report = build_order_report(&buffers);

        let expected = buffers.records.iter().filter(|r| r.order_qty > 0).count();
        prop_assert_eq!(report.len(), expected);
        for pair in report.lines.windows(2) {
            let a = (pair[0].priority, &pair[0].store_id, &pair[0].article);
            let b = (pair[1].priority, &pair[1].store_id, &pair[1].article);
            prop_assert!(a <= b);
        }
    }
}
