use ddmrp_ingest::{RawTable, SchemaError, normalize_columns, sanitize};
use ddmrp_model::SourceRole;
use proptest::prelude::*;

#[test]
fn stock_export_with_localized_headers_normalizes() {
    let csv = "Art;Magazin;Describe;к-во;Model\nA1;6;Widget;15;W-1\n";
    let table = RawTable::from_csv_bytes(csv.as_bytes()).expect("parse stock");
    let normalized = normalize_columns(table, SourceRole::Stock).expect("normalize stock");

    assert_eq!(
        normalized.table.headers,
        vec!["Article", "Store_ID", "Describe", "Current_Stock", "Model"]
    );
    assert_eq!(normalized.table.cell(0, "Current_Stock"), Some("15"));
    assert!(normalized.resolution.passthrough.is_empty());
}

#[test]
fn missing_required_columns_fail_with_names() {
    let table = RawTable::from_csv_bytes(b"Art,Magazin,Red_Zone\nA1,6,1\n").expect("parse");
    let err: SchemaError = normalize_columns(table, SourceRole::Matrix).unwrap_err();

    assert_eq!(err.role, SourceRole::Matrix);
    assert_eq!(err.missing, vec!["Describe", "Yellow_Zone", "Green_Zone"]);
    assert!(err.available.contains(&"Article".to_string()));
}

#[test]
fn unknown_columns_pass_through() {
    let table = RawTable::from_csv_bytes(
        b"Article,Store_ID,Describe,Red_Zone,Yellow_Zone,Green_Zone,Supplier\nA1,6,x,1,2,3,ACME\n",
    )
    .expect("parse");
    let normalized = normalize_columns(table, SourceRole::Matrix).expect("normalize");

    assert_eq!(normalized.resolution.passthrough, vec!["Supplier"]);
    assert_eq!(normalized.table.cell(0, "Supplier"), Some("ACME"));
}

fn cell_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("nan".to_string()),
        Just(" ".to_string()),
        "-?[0-9]{1,4}(\\.[0-9]{1,2})?",
        "[0-9]{1,3},[0-9]{1,2}",
        "[a-zA-Z ]{1,6}",
    ]
}

fn stock_table_strategy() -> impl Strategy<Value = RawTable> {
    prop::collection::vec(prop::collection::vec(cell_strategy(), 5), 0..12).prop_map(|rows| {
        RawTable::new(
            ["Article", "Store_ID", "Describe", "Current_Stock", "Retail_Price"]
                .iter()
                .map(|h| (*h).to_string())
                .collect(),
            rows,
        )
    })
}

proptest! {
    #[test]
    fn sanitize_is_idempotent(table in stock_table_strategy(), matrix in any::<bool>()) {
        let role = if matrix { SourceRole::Matrix } else { SourceRole::Stock };
        let once = sanitize(&table, role);
        let twice = sanitize(&once.table, role);
        prop_assert_eq!(&once.table, &twice.table);
        prop_assert_eq!(twice.report.total_repairs(), 0);
    }

    #[test]
    fn sanitized_numbers_are_non_negative(table in stock_table_strategy()) {
        let result = sanitize(&table, SourceRole::Stock);
        for row in 0..result.table.row_count() {
            for column in ["Current_Stock", "Retail_Price"] {
                let value: f64 = result.table.cell(row, column).unwrap().parse().unwrap();
                prop_assert!(value >= 0.0);
            }
            prop_assert!(!result.table.cell(row, "Article").unwrap().is_empty());
        }
        prop_assert_eq!(
            result.report.output_rows + result.report.dropped_empty_key,
            result.report.input_rows
        );
    }
}
