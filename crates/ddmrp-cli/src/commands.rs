use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use tracing::{info, info_span};

use ddmrp_core::{
    ALL_ITEMS_STEM, BufferSummary, ExportedFile, ORDERS_STEM, PipelineError, PipelineResult,
    RecordFilter, export_records, fetch_and_run, largest_orders, record_columns, run_pipeline,
};
use ddmrp_ingest::{FetchOptions, MatrixFetcher, RawTable, export_url};
use ddmrp_model::{BufferRecord, ExportFormat};

use crate::cli::{ComputeArgs, FetchArgs};

/// Everything `compute` produced, ready for printing.
pub struct ComputeOutcome {
    pub result: PipelineResult,
    pub filter: RecordFilter,
    pub top: Option<usize>,
    pub exported: Vec<ExportedFile>,
    pub elapsed: Duration,
}

impl ComputeOutcome {
    /// Records accepted by the filter.
    pub fn selected_records(&self) -> Vec<&BufferRecord> {
        self.filter.apply(&self.result.buffers.records)
    }

    /// Order lines accepted by the filter, limited to the largest `top` when set.
    pub fn selected_orders(&self) -> Vec<&BufferRecord> {
        let lines = self.filter.apply(&self.result.orders.lines);
        match self.top {
            Some(n) => largest_orders(lines, n),
            None => lines,
        }
    }

    pub fn selected_summary(&self) -> BufferSummary {
        if self.filter.is_empty() {
            self.result.summary()
        } else {
            BufferSummary::from_records(self.selected_records())
        }
    }
}

impl From<&FetchArgs> for FetchOptions {
    fn from(args: &FetchArgs) -> Self {
        FetchOptions::default()
            .with_max_retries(args.max_retries)
            .with_timeout(Duration::from_secs(args.timeout_secs))
            .with_backoff_base(args.backoff_base)
    }
}

fn read_table(path: &Path, what: &str) -> Result<RawTable> {
    RawTable::from_csv_path(path).with_context(|| format!("read {what} file {}", path.display()))
}

fn user_facing(error: &PipelineError) -> anyhow::Error {
    anyhow!(error.user_message())
}

pub fn run_compute(args: &ComputeArgs) -> Result<ComputeOutcome> {
    let started = Instant::now();
    let span = info_span!("compute");
    let _guard = span.enter();

    let stock = read_table(&args.stock, "stock")?;
    let result = match (&args.matrix.url, &args.matrix.file) {
        (Some(url), _) => {
            let options = FetchOptions::from(&args.fetch);
            let fetcher = MatrixFetcher::new(options)
                .map_err(|err| anyhow!("{} ({err})", err.user_message()))?;
            fetch_and_run(&fetcher, url, stock).map_err(|err| user_facing(&err))?
        }
        (None, Some(path)) => {
            let matrix = read_table(path, "matrix")?;
            run_pipeline(matrix, stock).map_err(|err| user_facing(&err))?
        }
        (None, None) => return Err(anyhow!("either --matrix-url or --matrix-file is required")),
    };

    let filter = RecordFilter::new()
        .with_stores(args.stores.iter().cloned())
        .with_statuses(args.statuses.iter().copied())
        .with_search(args.search.clone().unwrap_or_default());

    let mut outcome = ComputeOutcome {
        result,
        filter,
        top: args.top,
        exported: Vec::new(),
        elapsed: Duration::ZERO,
    };

    if args.dry_run {
        info!("dry run, no files written");
    } else {
        let output_dir = args
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        outcome.exported = export_outcome(&outcome, &output_dir, args.format.into())?;
    }
    outcome.elapsed = started.elapsed();
    Ok(outcome)
}

fn export_outcome(
    outcome: &ComputeOutcome,
    output_dir: &Path,
    format: ExportFormat,
) -> Result<Vec<ExportedFile>> {
    let today = Local::now().date_naive();
    let orders: Vec<BufferRecord> = outcome.selected_orders().into_iter().cloned().collect();
    let records: Vec<BufferRecord> = outcome.selected_records().into_iter().cloned().collect();
    let all_columns = record_columns(&outcome.result.buffers.enrichments);

    let orders_file = export_records(
        &orders,
        &outcome.result.orders.columns,
        output_dir,
        ORDERS_STEM,
        today,
        format,
    )
    .with_context(|| format!("write order report to {}", output_dir.display()))?;
    let all_file = export_records(
        &records,
        &all_columns,
        output_dir,
        ALL_ITEMS_STEM,
        today,
        format,
    )
    .with_context(|| format!("write record table to {}", output_dir.display()))?;
    Ok(vec![orders_file, all_file])
}

pub fn run_export_url(url: &str) -> Result<String> {
    export_url(url).map_err(|err| anyhow!("{} ({err})", err.user_message()))
}
