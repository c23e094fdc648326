//! Field type resolution: one declared type to one single-value parser.

use std::str::FromStr;

use rowschema_model::{FieldType, Value, ValueMapping};
use tracing::warn;

use crate::datetime::DatePattern;
use crate::error::{FieldTypeError, ParseError, ParseErrorKind};
use crate::parser::Parser;

/// Named text transform for string fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringTransform {
    /// Strip leading and trailing whitespace.
    Trim,
    /// Remove every line break.
    RemoveNewLines,
}

impl StringTransform {
    pub fn as_str(self) -> &'static str {
        match self {
            StringTransform::Trim => "trim",
            StringTransform::RemoveNewLines => "remove-new-lines",
        }
    }

    pub fn apply(self, text: &str) -> String {
        match self {
            StringTransform::Trim => text.trim().to_string(),
            StringTransform::RemoveNewLines => text.replace(['\n', '\r'], ""),
        }
    }
}

impl FromStr for StringTransform {
    type Err = FieldTypeError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "trim" => Ok(StringTransform::Trim),
            "remove-new-lines" => Ok(StringTransform::RemoveNewLines),
            other => Err(FieldTypeError::UnknownTransform(other.to_string())),
        }
    }
}

/// Build the parser for a field type.
///
/// Configuration problems (unknown transform, bad date pattern, empty
/// mapping) surface here, never while parsing a record.
pub fn resolve(field_type: &FieldType) -> Result<Parser, FieldTypeError> {
    match field_type {
        FieldType::String {
            additional_transformations,
        } => string_parser(additional_transformations),
        FieldType::Integer => Ok(integer_parser()),
        FieldType::PrimaryKey | FieldType::GroupKey { .. } => Ok(Parser::text()),
        FieldType::Date { format } => date_parser(format),
        FieldType::Mapping { mapping } => mapping_parser(mapping),
    }
}

fn string_parser(names: &[String]) -> Result<Parser, FieldTypeError> {
    let transforms = names
        .iter()
        .map(|name| name.parse::<StringTransform>())
        .collect::<Result<Vec<_>, _>>()?;
    if transforms.is_empty() {
        return Ok(Parser::text());
    }
    Ok(Parser::text().map(move |value| match value {
        Value::Text(text) => Value::Text(
            transforms
                .iter()
                .fold(text, |text, transform| transform.apply(&text)),
        ),
        other => other,
    }))
}

fn integer_parser() -> Parser {
    Parser::text().try_map(|value| match value {
        Value::Text(text) => text.parse::<i64>().map(Value::Integer).map_err(|_| {
            ParseError::new(
                ParseErrorKind::TypeMismatch,
                format!("expected an integer, got '{text}'"),
            )
        }),
        other => Ok(other),
    })
}

fn date_parser(format: &str) -> Result<Parser, FieldTypeError> {
    let pattern = DatePattern::compile(format)?;
    Ok(Parser::text().try_map(move |value| match value {
        Value::Text(text) => pattern.parse(&text).map(Value::Date).ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::InvalidDate,
                format!(
                    "expected a date matching '{}', got '{text}'",
                    pattern.pattern()
                ),
            )
        }),
        other => Ok(other),
    }))
}

fn mapping_parser(mapping: &[ValueMapping]) -> Result<Parser, FieldTypeError> {
    if mapping.is_empty() {
        return Err(FieldTypeError::EmptyMapping);
    }

    let mut seen = Vec::with_capacity(mapping.len());
    let mut alternatives = Vec::with_capacity(mapping.len() + 1);
    for entry in mapping {
        if seen.contains(&entry.from_value.as_str()) {
            warn!(
                from_value = %entry.from_value,
                "duplicate mapping value; the first declaration wins"
            );
            continue;
        }
        seen.push(entry.from_value.as_str());
        alternatives.push(Parser::literal(
            entry.from_value.clone(),
            Value::from_json(&entry.mapped_to),
        ));
    }

    let allowed = seen
        .iter()
        .map(|value| format!("'{value}'"))
        .collect::<Vec<_>>()
        .join(", ");
    alternatives.push(Parser::reject(move |input| {
        ParseError::new(
            ParseErrorKind::UnmappedValue,
            format!("value '{input}' is not one of {allowed}"),
        )
    }));
    Ok(Parser::union(alternatives))
}
