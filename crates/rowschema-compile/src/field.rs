//! Per-field compilation.

use rowschema_model::Field;

use crate::error::ConfigError;
use crate::parser::DefaultedParser;
use crate::resolver::resolve;
use crate::sentinel::with_sentinels;

/// Compile one field into a parser over its (possibly absent) raw value.
///
/// Pipeline: default substitution, then sentinels, then the field type.
pub fn compile_field(field: &Field) -> Result<DefaultedParser, ConfigError> {
    let mappings = &field.additional_mappings;
    for (index, mapping) in mappings.iter().enumerate() {
        if mappings[..index]
            .iter()
            .any(|earlier| earlier.from_value == mapping.from_value)
        {
            return Err(ConfigError::DuplicateSentinel {
                field: field.output_key().to_string(),
                from_value: mapping.from_value.clone(),
            });
        }
    }

    let base = resolve(&field.field_type)
        .map_err(|source| ConfigError::field(field.output_key(), source))?;
    Ok(with_sentinels(mappings, base).with_default(field.default_value.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FieldTypeError, ParseErrorKind};
    use rowschema_model::{FieldType, Value, ValueMapping};

    #[test]
    fn default_is_parsed_through_pipeline() {
        let field = Field::new("guid", FieldType::Integer).with_default("7");
        let parser = compile_field(&field).unwrap();
        assert_eq!(parser.parse(None), Ok(Value::Integer(7)));

        let bad_default = Field::new("guid", FieldType::Integer).with_default("seven");
        let parser = compile_field(&bad_default).unwrap();
        assert_eq!(
            parser.parse(None).unwrap_err().kind,
            ParseErrorKind::TypeMismatch
        );
    }

    #[test]
    fn default_can_hit_a_sentinel() {
        let field = Field::new("AGE", FieldType::Integer)
            .with_mapping(ValueMapping::new("-9", serde_json::Value::Null))
            .with_default("-9");
        let parser = compile_field(&field).unwrap();
        assert_eq!(parser.parse(None), Ok(Value::Null));
    }

    #[test]
    fn empty_string_is_not_absent() {
        let field = Field::new("note", FieldType::string()).with_default("fallback");
        let parser = compile_field(&field).unwrap();
        assert_eq!(parser.parse(Some("")), Ok(Value::from("")));
    }

    #[test]
    fn duplicate_sentinels_are_rejected() {
        let field = Field::new("AGE", FieldType::Integer)
            .with_alias("age")
            .with_mapping(ValueMapping::new("-9", ""))
            .with_mapping(ValueMapping::new("-9", "missing"));
        assert_eq!(
            compile_field(&field).unwrap_err(),
            ConfigError::DuplicateSentinel {
                field: "age".to_string(),
                from_value: "-9".to_string(),
            }
        );
    }

    #[test]
    fn type_errors_name_the_field() {
        let field = Field::new("dob", FieldType::Date {
            format: "dd-QQ-yyyy".to_string(),
        });
        let err = compile_field(&field).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Field {
                ref field,
                source: FieldTypeError::InvalidDateFormat { .. },
            } if field == "dob"
        ));
    }
}
