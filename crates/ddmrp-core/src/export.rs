//! Writing record tables to dated CSV or JSON files.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use polars::prelude::{CsvWriter, SerWriter};
use serde_json::{Map, Value};
use tracing::info;

use ddmrp_model::{BufferRecord, ExportFormat};

use crate::error::ExportError;
use crate::frame::records_frame;

/// File stem of the order report export.
pub const ORDERS_STEM: &str = "orders";

/// File stem of the full record export.
pub const ALL_ITEMS_STEM: &str = "all_items";

/// `<stem>_YYYYMMDD.<ext>`.
pub fn export_file_name(stem: &str, date: NaiveDate, format: ExportFormat) -> String {
    format!("{stem}_{}.{}", date.format("%Y%m%d"), format.extension())
}

/// One file written by [`export_records`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub path: PathBuf,
    pub rows: usize,
}

/// Records as JSON objects holding only the given columns.
///
/// Infinite stockout horizons have no JSON number and are written as `null`.
pub fn records_json(records: &[BufferRecord], columns: &[&str]) -> Result<Vec<Value>, ExportError> {
    records
        .iter()
        .map(|record| {
            let mut full = match serde_json::to_value(record)? {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            let projected: Map<String, Value> = columns
                .iter()
                .map(|name| {
                    let value = full.remove(*name).unwrap_or(Value::Null);
                    ((*name).to_string(), value)
                })
                .collect();
            Ok(Value::Object(projected))
        })
        .collect()
}

/// Writes `records` restricted to `columns` into `dir`, creating it if needed.
pub fn export_records(
    records: &[BufferRecord],
    columns: &[&str],
    dir: &Path,
    stem: &str,
    date: NaiveDate,
    format: ExportFormat,
) -> Result<ExportedFile, ExportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(stem, date, format));
    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    match format {
        ExportFormat::Csv => {
            let mut frame = records_frame(records, columns)?;
            CsvWriter::new(&mut writer)
                .include_header(true)
                .finish(&mut frame)?;
        }
        ExportFormat::Json => {
            let rows = records_json(records, columns)?;
            serde_json::to_writer_pretty(&mut writer, &rows)?;
            writer.write_all(b"\n")?;
        }
    }
    writer.flush()?;
    info!(path = %path.display(), rows = records.len(), %format, "export written");
    Ok(ExportedFile {
        path,
        rows: records.len(),
    })
}
