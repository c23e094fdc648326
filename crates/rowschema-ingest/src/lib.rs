//! Raw record ingestion: CSV files into string-keyed records.

pub mod csv_table;
pub mod error;

pub use csv_table::{CsvOptions, CsvTable, read_csv_records, read_csv_records_with_options};
pub use error::{IngestError, Result};
