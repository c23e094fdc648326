//! Error types for schema compilation and record validation.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// A field type that cannot be turned into a parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldTypeError {
    #[error("unknown string transform '{0}'")]
    UnknownTransform(String),
    #[error("invalid date format '{format}': {reason}")]
    InvalidDateFormat { format: String, reason: String },
    #[error("mapping declares no values")]
    EmptyMapping,
}

/// A broken dataset definition. Compilation stops at the first one found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("field '{field}': {source}")]
    Field {
        field: String,
        #[source]
        source: FieldTypeError,
    },
    #[error("raw name '{raw_name}' is declared more than once")]
    DuplicateRawName { raw_name: String },
    #[error("output key '{key}' is produced by both '{first}' and '{second}'")]
    DuplicateOutputKey {
        key: String,
        first: String,
        second: String,
    },
    #[error("field '{field}': sentinel '{from_value}' is declared more than once")]
    DuplicateSentinel { field: String, from_value: String },
}

impl ConfigError {
    pub(crate) fn field(field: &str, source: FieldTypeError) -> Self {
        ConfigError::Field {
            field: field.to_string(),
            source,
        }
    }
}

/// Why a single value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseErrorKind {
    /// Integer coercion failed.
    TypeMismatch,
    /// Date did not match its format or is not a real calendar date.
    InvalidDate,
    /// No literal mapping matched.
    UnmappedValue,
    /// Value absent and no default declared.
    MissingValue,
    /// Key not declared by a strict object shape.
    UnrecognizedKey,
}

impl ParseErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ParseErrorKind::TypeMismatch => "type_mismatch",
            ParseErrorKind::InvalidDate => "invalid_date",
            ParseErrorKind::UnmappedValue => "unmapped_value",
            ParseErrorKind::MissingValue => "missing_value",
            ParseErrorKind::UnrecognizedKey => "unrecognized_key",
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single-value parser.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// A parse failure attributed to one output key.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub kind: ParseErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, error: ParseError) -> Self {
        Self {
            field: field.into(),
            kind: error.kind,
            message: error.message,
        }
    }
}

/// Every field error produced for one record, in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub(crate) fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The first error reported for `field`, if any.
    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.field == field)
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} field(s) failed validation", self.errors.len())?;
        for (index, error) in self.errors.iter().enumerate() {
            let separator = if index == 0 { ": " } else { "; " };
            write!(f, "{separator}{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
