//! Minimal parser combinators.
//!
//! A [`Parser`] is a pure function from a raw string to a [`Value`] or a
//! [`ParseError`]. Parsers are cheap to clone and safe to share across
//! threads. The compiler builds every field out of the primitives here:
//! literal match, map, refine, first-match union, default wrapping and a
//! strict object shape.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use rowschema_model::{Record, Value};

use crate::error::{FieldError, ParseError, ParseErrorKind, ValidationErrors};
use crate::transform::RenamedRecord;

type ParseFn = dyn Fn(&str) -> Result<Value, ParseError> + Send + Sync;

/// Single-value parser.
#[derive(Clone)]
pub struct Parser {
    run: Arc<ParseFn>,
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser").finish_non_exhaustive()
    }
}

impl Parser {
    pub fn new<F>(run: F) -> Self
    where
        F: Fn(&str) -> Result<Value, ParseError> + Send + Sync + 'static,
    {
        Self { run: Arc::new(run) }
    }

    pub fn parse(&self, input: &str) -> Result<Value, ParseError> {
        (self.run)(input)
    }

    /// Accepts any string unchanged.
    pub fn text() -> Self {
        Self::new(|input| Ok(Value::Text(input.to_string())))
    }

    /// Accepts only `expected`, producing `mapped_to`.
    pub fn literal(expected: impl Into<String>, mapped_to: Value) -> Self {
        let expected = expected.into();
        Self::new(move |input| {
            if input == expected {
                Ok(mapped_to.clone())
            } else {
                Err(ParseError::new(
                    ParseErrorKind::UnmappedValue,
                    format!("expected '{expected}', got '{input}'"),
                ))
            }
        })
    }

    /// Always fails with an error built from the input.
    pub fn reject<F>(error: F) -> Self
    where
        F: Fn(&str) -> ParseError + Send + Sync + 'static,
    {
        Self::new(move |input| Err(error(input)))
    }

    /// Transforms a successful value.
    #[must_use]
    pub fn map<F>(self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        let run = self.run;
        Self::new(move |input| run(input).map(&f))
    }

    /// Transforms a successful value with a step that may itself fail.
    #[must_use]
    pub fn try_map<F>(self, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, ParseError> + Send + Sync + 'static,
    {
        let run = self.run;
        Self::new(move |input| run(input).and_then(&f))
    }

    /// Rejects successful values for which `predicate` is false.
    #[must_use]
    pub fn refine<F>(self, predicate: F, kind: ParseErrorKind, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let run = self.run;
        let message = message.into();
        Self::new(move |input| {
            let value = run(input)?;
            if predicate(&value) {
                Ok(value)
            } else {
                Err(ParseError::new(kind, message.clone()))
            }
        })
    }

    /// Rewrites the error of a failed parse.
    #[must_use]
    pub fn map_err<F>(self, f: F) -> Self
    where
        F: Fn(ParseError) -> ParseError + Send + Sync + 'static,
    {
        let run = self.run;
        Self::new(move |input| run(input).map_err(&f))
    }

    /// Tries each alternative in order and returns the first success.
    ///
    /// When every alternative fails the error of the last one is returned,
    /// so the most general parser belongs at the end.
    pub fn union(alternatives: Vec<Parser>) -> Self {
        if alternatives.len() == 1 {
            return alternatives.into_iter().next().unwrap_or_else(Parser::text);
        }
        Self::new(move |input| {
            let mut last_error = None;
            for alternative in &alternatives {
                match alternative.parse(input) {
                    Ok(value) => return Ok(value),
                    Err(error) => last_error = Some(error),
                }
            }
            Err(last_error.unwrap_or_else(|| {
                ParseError::new(
                    ParseErrorKind::UnmappedValue,
                    format!("no alternative accepts '{input}'"),
                )
            }))
        })
    }

    /// Wraps the parser so an absent input falls back to `default`.
    pub fn with_default(self, default: Option<String>) -> DefaultedParser {
        DefaultedParser {
            inner: self,
            default,
        }
    }
}

/// Parser over an optional input.
///
/// The default is raw text: it passes through the wrapped parser exactly
/// like a value read from the record would. Records validated through a
/// compiled schema already carry the default from the renaming stage, so
/// the fallback here only fires when the parser is used on its own.
#[derive(Debug, Clone)]
pub struct DefaultedParser {
    inner: Parser,
    default: Option<String>,
}

impl DefaultedParser {
    pub fn parse(&self, input: Option<&str>) -> Result<Value, ParseError> {
        match input.or(self.default.as_deref()) {
            Some(raw) => self.inner.parse(raw),
            None => Err(ParseError::new(
                ParseErrorKind::MissingValue,
                "value is required",
            )),
        }
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }
}

/// Keyed collection of field parsers applied to a renamed record.
#[derive(Debug, Clone, Default)]
pub struct ObjectShape {
    entries: Vec<(String, DefaultedParser)>,
    keys: BTreeSet<String>,
    strict: bool,
}

impl ObjectShape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field. Keys are expected to be unique; a repeated key replaces
    /// the earlier parser.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, parser: DefaultedParser) -> Self {
        let key = key.into();
        if self.keys.insert(key.clone()) {
            self.entries.push((key, parser));
        } else if let Some(entry) = self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            entry.1 = parser;
        }
        self
    }

    /// Rejects records carrying keys that were not declared.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Parses every declared key, collecting all failures.
    pub fn validate(&self, input: &RenamedRecord) -> Result<Record, ValidationErrors> {
        let mut record = Record::new();
        let mut errors = Vec::new();

        for (key, parser) in &self.entries {
            let raw = input.get(key).and_then(Option::as_deref);
            match parser.parse(raw) {
                Ok(value) => {
                    record.insert(key.clone(), value);
                }
                Err(error) => errors.push(FieldError::new(key.as_str(), error)),
            }
        }

        if self.strict {
            for key in input.keys().filter(|key| !self.keys.contains(*key)) {
                errors.push(FieldError::new(
                    key.as_str(),
                    ParseError::new(
                        ParseErrorKind::UnrecognizedKey,
                        format!("unrecognized key '{key}'"),
                    ),
                ));
            }
        }

        if errors.is_empty() {
            Ok(record)
        } else {
            Err(ValidationErrors::new(errors))
        }
    }
}
