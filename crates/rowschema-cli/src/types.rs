use std::collections::BTreeMap;
use std::path::PathBuf;

use rowschema_compile::{FieldError, ParseErrorKind, ValidationErrors};

/// Outcome of validating one CSV file.
#[derive(Debug)]
pub struct ValidationRun {
    pub dataset: String,
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    /// Output keys in declaration order.
    pub fields: Vec<String>,
    pub records: usize,
    pub valid: usize,
    pub invalid: usize,
    /// Error counts per output key and kind.
    pub error_counts: BTreeMap<String, BTreeMap<ParseErrorKind, usize>>,
    /// The first failing records, up to the configured limit.
    pub failures: Vec<RecordFailure>,
    pub max_failures: usize,
}

/// A rejected record, numbered from 1 in file order.
#[derive(Debug, Clone)]
pub struct RecordFailure {
    pub record: usize,
    pub errors: Vec<FieldError>,
}

impl ValidationRun {
    pub fn new(dataset: String, input: PathBuf, fields: Vec<String>, max_failures: usize) -> Self {
        Self {
            dataset,
            input,
            output: None,
            fields,
            records: 0,
            valid: 0,
            invalid: 0,
            error_counts: BTreeMap::new(),
            failures: Vec::new(),
            max_failures,
        }
    }

    pub fn record_success(&mut self) {
        self.records += 1;
        self.valid += 1;
    }

    pub fn record_failure(&mut self, record: usize, errors: ValidationErrors) {
        self.records += 1;
        self.invalid += 1;
        for error in &errors {
            *self
                .error_counts
                .entry(error.field.clone())
                .or_default()
                .entry(error.kind)
                .or_insert(0) += 1;
        }
        if self.failures.len() < self.max_failures {
            self.failures.push(RecordFailure {
                record,
                errors: errors.into_errors(),
            });
        }
    }

    pub fn has_errors(&self) -> bool {
        self.invalid > 0
    }

    /// Error counts ordered by field declaration, then kind.
    pub fn ordered_error_counts(&self) -> Vec<(&str, ParseErrorKind, usize)> {
        let mut rows = Vec::new();
        let declared = self.fields.iter().map(String::as_str);
        let undeclared = self
            .error_counts
            .keys()
            .map(String::as_str)
            .filter(|field| !self.fields.iter().any(|known| known == field));
        for field in declared.chain(undeclared) {
            if let Some(kinds) = self.error_counts.get(field) {
                for (kind, count) in kinds {
                    rows.push((field, *kind, *count));
                }
            }
        }
        rows
    }
}
