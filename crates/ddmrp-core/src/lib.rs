pub mod classify;
pub mod engine;
pub mod error;
pub mod export;
pub mod filter;
pub mod frame;
pub mod pipeline;
pub mod report;
pub mod summary;

pub use classify::{classify, days_until_stockout, fill_percent, order_quantity};
pub use engine::{BufferTable, compute_buffers};
pub use error::{EngineError, ExportError, PipelineError};
pub use export::{
    ALL_ITEMS_STEM, ExportedFile, ORDERS_STEM, export_file_name, export_records, records_json,
};
pub use filter::RecordFilter;
pub use frame::{record_columns, records_frame};
pub use pipeline::{PipelineResult, fetch_and_run, run_pipeline};
pub use report::{OrderReport, build_order_report, largest_orders, report_columns};
pub use summary::{AbcSummary, BufferSummary, StoreSummary};
