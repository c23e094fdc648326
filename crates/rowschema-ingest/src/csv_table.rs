//! Headered CSV files as raw records.
//!
//! Headers are normalized (BOM stripped, whitespace collapsed); cells are
//! kept verbatim so that field transforms decide what to trim. A row
//! shorter than the header leaves the trailing columns absent rather than
//! empty, which lets field defaults apply. Rows of empty cells are kept;
//! only blank lines are skipped by the reader.

use std::collections::BTreeSet;
use std::path::Path;

use csv::ReaderBuilder;
use rowschema_model::RawRecord;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Reader settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvOptions {
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// A CSV file read into raw records.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl CsvTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Read a CSV file with default options.
pub fn read_csv_records(path: &Path) -> Result<CsvTable> {
    read_csv_records_with_options(path, CsvOptions::default())
}

/// Read a CSV file into raw records keyed by header.
pub fn read_csv_records_with_options(path: &Path, options: CsvOptions) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter)
        .from_path(path)
        .map_err(|err| IngestError::from_csv(path.to_path_buf(), err))?;

    let mut rows = reader.records();
    let header_row = match rows.next() {
        Some(row) => row.map_err(|err| IngestError::from_csv(path.to_path_buf(), err))?,
        None => {
            return Err(IngestError::EmptyCsv {
                path: path.to_path_buf(),
            });
        }
    };

    let headers: Vec<String> = header_row.iter().map(normalize_header).collect();
    let mut seen = BTreeSet::new();
    for header in &headers {
        if !seen.insert(header.as_str()) {
            return Err(IngestError::DuplicateHeader {
                path: path.to_path_buf(),
                header: header.clone(),
            });
        }
    }

    let mut records = Vec::new();
    for row in rows {
        let row = row.map_err(|err| IngestError::from_csv(path.to_path_buf(), err))?;
        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .map(|(header, cell)| (header.clone(), cell.to_string()))
            .collect();
        records.push(record);
    }

    debug!(
        path = %path.display(),
        columns = headers.len(),
        rows = records.len(),
        "read csv records"
    );
    Ok(CsvTable { headers, records })
}
