use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::TableError;

/// A header row plus string cells, every row padded to the header width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Picks `;` or tab over `,` when the first line clearly uses it.
fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let first_line = bytes
        .split(|byte| *byte == b'\n')
        .next()
        .unwrap_or_default();
    let count = |needle: u8| first_line.iter().filter(|byte| **byte == needle).count();
    let commas = count(b',');
    let semicolons = count(b';');
    let tabs = count(b'\t');
    if semicolons > commas && semicolons >= tabs {
        b';'
    } else if tabs > commas {
        b'\t'
    } else {
        b','
    }
}

impl RawTable {
    /// Builds a table, padding or truncating rows to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Parses delimited text, sniffing the delimiter from the header line.
    ///
    /// Blank lines are skipped. The first non-blank line is the header row.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, TableError> {
        let delimiter = sniff_delimiter(bytes);
        Self::from_csv_reader(bytes, delimiter)
    }

    /// Reads and parses a delimited file.
    pub fn from_csv_path(path: &Path) -> Result<Self, TableError> {
        let mut bytes = Vec::new();
        File::open(path)
            .and_then(|mut file| file.read_to_end(&mut bytes))
            .map_err(|err| TableError::Io {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;
        Self::from_csv_bytes(&bytes)
    }

    /// Parses delimited text with an explicit delimiter.
    pub fn from_csv_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self, TableError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(reader);
        let mut headers: Option<Vec<String>> = None;
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|err| TableError::Malformed {
                line: err.position().map(csv::Position::line),
                message: err.to_string(),
            })?;
            let row: Vec<String> = record.iter().map(normalize_cell).collect();
            if row.iter().all(String::is_empty) {
                continue;
            }
            match headers {
                None => headers = Some(record.iter().map(normalize_header).collect()),
                Some(_) => rows.push(row),
            }
        }
        let headers = headers.ok_or(TableError::Empty)?;
        Ok(Self::new(headers, rows))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first header equal to `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at `row` in column `name`, if both exist.
    pub fn cell(&self, row: usize, name: &str) -> Option<&str> {
        let index = self.column_index(name)?;
        self.rows
            .get(row)
            .and_then(|cells| cells.get(index))
            .map(String::as_str)
    }
}
