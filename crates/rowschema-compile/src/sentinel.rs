//! Sentinel substitution.
//!
//! Raw sources use sentinel literals such as `-9` for "empty". A sentinel
//! is matched exactly and short-circuits the field type, so `-9` on an
//! integer or date field yields its mapped value rather than a type error.

use rowschema_model::{Value, ValueMapping};

use crate::parser::Parser;

/// Wrap `base` with literal substitutions tried in declaration order.
///
/// If no sentinel matches, `base` decides and its error is the one
/// reported.
pub fn with_sentinels(mappings: &[ValueMapping], base: Parser) -> Parser {
    if mappings.is_empty() {
        return base;
    }
    let mut alternatives: Vec<Parser> = mappings
        .iter()
        .map(|mapping| {
            Parser::literal(
                mapping.from_value.clone(),
                Value::from_json(&mapping.mapped_to),
            )
        })
        .collect();
    alternatives.push(base);
    Parser::union(alternatives)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;
    use crate::resolver::resolve;
    use rowschema_model::FieldType;
    use serde_json::json;

    #[test]
    fn sentinel_takes_precedence_over_type() {
        let parser = with_sentinels(
            &[ValueMapping::new("-9", "")],
            resolve(&FieldType::Integer).unwrap(),
        );
        assert_eq!(parser.parse("-9"), Ok(Value::from("")));
        assert_eq!(parser.parse("12"), Ok(Value::Integer(12)));
    }

    #[test]
    fn base_error_is_reported_when_nothing_matches() {
        let parser = with_sentinels(
            &[ValueMapping::new("-9", json!(null))],
            resolve(&FieldType::Date {
                format: "yyyy-MM-dd".to_string(),
            })
            .unwrap(),
        );
        assert_eq!(parser.parse("-9"), Ok(Value::Null));
        assert_eq!(
            parser.parse("-8").unwrap_err().kind,
            ParseErrorKind::InvalidDate
        );
    }

    #[test]
    fn first_sentinel_wins() {
        let parser = with_sentinels(
            &[
                ValueMapping::new("NA", json!(null)),
                ValueMapping::new("N/A", json!(null)),
                ValueMapping::new("?", "unknown"),
            ],
            Parser::text(),
        );
        assert_eq!(parser.parse("N/A"), Ok(Value::Null));
        assert_eq!(parser.parse("?"), Ok(Value::from("unknown")));
        assert_eq!(parser.parse("na"), Ok(Value::from("na")));
    }
}
