//! Pipeline entry points: normalize, sanitize, compute, report.

use ddmrp_ingest::{
    HttpTransport, MatrixFetcher, RawTable, SanitizedTable, Sleeper, normalize_columns, sanitize,
};
use ddmrp_model::{ColumnResolution, SanitizeReport, SourceRole};
use tracing::{info, info_span};

use crate::engine::{BufferTable, compute_buffers};
use crate::error::PipelineError;
use crate::report::{OrderReport, build_order_report};
use crate::summary::BufferSummary;

/// Immutable outcome of one run, held by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult {
    pub matrix_columns: ColumnResolution,
    pub stock_columns: ColumnResolution,
    pub matrix_report: SanitizeReport,
    pub stock_report: SanitizeReport,
    pub buffers: BufferTable,
    pub orders: OrderReport,
}

impl PipelineResult {
    pub fn summary(&self) -> BufferSummary {
        BufferSummary::from_table(&self.buffers)
    }

    /// Repairs applied to both inputs.
    pub fn total_repairs(&self) -> usize {
        self.matrix_report.total_repairs() + self.stock_report.total_repairs()
    }
}

fn prepare(
    table: RawTable,
    role: SourceRole,
) -> Result<(ColumnResolution, SanitizedTable), PipelineError> {
    let normalized = normalize_columns(table, role)?;
    let sanitized = sanitize(&normalized.table, role);
    Ok((normalized.resolution, sanitized))
}

/// Runs the computation over two raw tables.
pub fn run_pipeline(matrix: RawTable, stock: RawTable) -> Result<PipelineResult, PipelineError> {
    let span = info_span!("pipeline");
    let _guard = span.enter();

    let (matrix_columns, matrix) = prepare(matrix, SourceRole::Matrix)?;
    let (stock_columns, stock) = prepare(stock, SourceRole::Stock)?;
    let buffers = compute_buffers(&matrix.table, &stock.table)?;
    let orders = build_order_report(&buffers);
    info!(
        records = buffers.len(),
        order_lines = orders.len(),
        order_qty = orders.total_order_qty(),
        "pipeline complete"
    );

    Ok(PipelineResult {
        matrix_columns,
        stock_columns,
        matrix_report: matrix.report,
        stock_report: stock.report,
        buffers,
        orders,
    })
}

/// Downloads the matrix from `url`, then runs the computation.
pub fn fetch_and_run<T, S>(
    fetcher: &MatrixFetcher<T, S>,
    url: &str,
    stock: RawTable,
) -> Result<PipelineResult, PipelineError>
where
    T: HttpTransport,
    S: Sleeper,
{
    let matrix = fetcher.fetch(url)?;
    run_pipeline(matrix, stock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddmrp_ingest::TableError;

    fn parse(text: &str) -> RawTable {
        RawTable::from_csv_bytes(text.as_bytes()).expect("table")
    }

    #[test]
    fn localized_inputs_run_end_to_end() {
        let matrix = parse(
            "Артикул,Описание,Магазин,Красная зона,Желтая зона,Зеленая зона\n\
             A1,Widget,6,10,20,30\n\
             A2,Gadget,6,0,0,0\n",
        );
        let stock = parse("Art;Magazin;Describe;к-во\nA1;6;Widget;15\n");
        let result = run_pipeline(matrix, stock).expect("pipeline");
        assert_eq!(result.buffers.len(), 2);
        assert_eq!(result.orders.len(), 1);
        assert_eq!(result.orders.lines[0].order_qty, 45);
        assert_eq!(result.matrix_report.all_zero_zones, 1);
        assert_eq!(result.summary().total_items, 2);
    }

    #[test]
    fn missing_stock_columns_stop_the_run() {
        let matrix = parse("Article,Describe,Store_ID,Red_Zone,Yellow_Zone,Green_Zone\nA1,x,6,1,1,1\n");
        let stock = parse("Article,Store_ID\nA1,6\n");
        let err = run_pipeline(matrix, stock).unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
        assert!(err.user_message().contains("Current_Stock"));
    }

    #[test]
    fn table_errors_convert() {
        let err: PipelineError = TableError::Empty.into();
        assert!(matches!(err, PipelineError::Table(_)));
    }
}
