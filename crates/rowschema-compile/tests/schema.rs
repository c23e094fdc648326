//! End-to-end tests for compiled dataset validators.

use chrono::NaiveDate;
use rowschema_compile::{
    ConfigError, FieldTypeError, ParseErrorKind, RecordValidator, compile_field, compile_schema,
};
use rowschema_model::{DatasetDefinition, Field, FieldType, RawRecord, Value, ValueMapping};
use serde_json::json;

const HESA: &str = include_str!("../../../datasets/hesa.json");

fn hesa() -> RecordValidator {
    let dataset = DatasetDefinition::from_json_str(HESA).expect("parse hesa definition");
    compile_schema(&dataset).expect("compile hesa definition")
}

fn raw(pairs: &[(&str, &str)]) -> RawRecord {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}

fn hesa_row(date_of_birth: &str) -> RawRecord {
    raw(&[
        ("ONS_ID", "2"),
        ("Data_Source", "HESA"),
        ("guid", "123"),
        ("HESA_ID", "123"),
        ("forename_clean", "First Name SAHIOF   \nheeee"),
        ("date of birth", date_of_birth),
    ])
}

fn single_field(field: Field) -> RecordValidator {
    compile_schema(&DatasetDefinition::new("single", vec![field])).expect("compile")
}

#[test]
fn hesa_record_is_coerced_and_renamed() {
    let record = hesa().validate(&hesa_row("10-10-2022")).expect("valid record");

    assert_eq!(record.len(), 6);
    assert_eq!(record["ONS_ID"], Value::from("2"));
    assert_eq!(record["data_source"], Value::from("HESA"));
    assert_eq!(record["guid"], Value::Integer(123));
    assert_eq!(record["HESA_ID"], Value::from("123"));
    assert_eq!(
        record["forename_clean"],
        Value::from("First Name SAHIOF   heeee")
    );
    assert_eq!(
        record["dob"],
        Value::Date(NaiveDate::from_ymd_opt(2022, 10, 10).unwrap())
    );
    assert!(!record.contains_key("Data_Source"));
    assert!(!record.contains_key("date of birth"));
}

#[test]
fn hesa_sentinel_without_declaration_is_an_invalid_date() {
    let errors = hesa().validate(&hesa_row("-9")).unwrap_err();
    assert_eq!(errors.len(), 1);
    let error = errors.for_field("dob").expect("dob error");
    assert_eq!(error.kind, ParseErrorKind::InvalidDate);
}

#[test]
fn hesa_dates_reject_padding_and_signs() {
    let validator = hesa();
    for input in [" 10-10-2022", "10- 10-2022", "10-10-+2022", "10-10-2022 "] {
        let errors = validator.validate(&hesa_row(input)).unwrap_err();
        let error = errors.for_field("dob").expect("dob error");
        assert_eq!(error.kind, ParseErrorKind::InvalidDate, "input {input:?}");
    }
}

#[test]
fn hesa_record_serializes_with_iso_dates() {
    let record = hesa().validate(&hesa_row("01-02-2000")).unwrap();
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["dob"], json!("2000-02-01"));
    assert_eq!(json["guid"], json!(123));
}

#[test]
fn integer_fields_coerce_or_mismatch() {
    let validator = single_field(Field::new("n", FieldType::Integer));
    let record = validator.validate(&raw(&[("n", "42")])).unwrap();
    assert_eq!(record["n"], Value::Integer(42));

    for bad in ["4a", ""] {
        let errors = validator.validate(&raw(&[("n", bad)])).unwrap_err();
        assert_eq!(errors.errors()[0].kind, ParseErrorKind::TypeMismatch);
    }
}

#[test]
fn sentinel_beats_integer_coercion() {
    let validator = single_field(
        Field::new("n", FieldType::Integer).with_mapping(ValueMapping::new("-9", "")),
    );
    let record = validator.validate(&raw(&[("n", "-9")])).unwrap();
    assert_eq!(record["n"], Value::from(""));
}

#[test]
fn dates_follow_declared_format() {
    let validator = single_field(Field::new(
        "d",
        FieldType::Date {
            format: "dd-MM-yyyy".to_string(),
        },
    ));
    let record = validator.validate(&raw(&[("d", "10-10-2022")])).unwrap();
    assert_eq!(record["d"].as_date(), NaiveDate::from_ymd_opt(2022, 10, 10));

    let errors = validator.validate(&raw(&[("d", "31-02-2022")])).unwrap_err();
    assert_eq!(errors.errors()[0].kind, ParseErrorKind::InvalidDate);
}

#[test]
fn mapping_fields_reject_unknown_values() {
    let validator = single_field(Field::new(
        "sex",
        FieldType::Mapping {
            mapping: vec![ValueMapping::new("1", "Female"), ValueMapping::new("2", "Male")],
        },
    ));
    assert_eq!(
        validator.validate(&raw(&[("sex", "2")])).unwrap()["sex"],
        Value::from("Male")
    );
    let errors = validator.validate(&raw(&[("sex", "3")])).unwrap_err();
    assert_eq!(errors.errors()[0].kind, ParseErrorKind::UnmappedValue);
}

#[test]
fn raw_key_appears_only_under_output_key() {
    let plain = single_field(Field::new("ONS_ID", FieldType::string()));
    let record = plain.validate(&raw(&[("ONS_ID", "5")])).unwrap();
    assert_eq!(record.keys().collect::<Vec<_>>(), vec!["ONS_ID"]);

    let aliased = single_field(Field::new("ONS_ID", FieldType::string()).with_alias("ons_id"));
    let record = aliased.validate(&raw(&[("ONS_ID", "5")])).unwrap();
    assert_eq!(record.keys().collect::<Vec<_>>(), vec!["ons_id"]);
}

#[test]
fn default_runs_through_the_field_pipeline() {
    let validator = single_field(
        Field::new("Data_Source", FieldType::Mapping {
            mapping: vec![ValueMapping::new("HESA", "Higher Education Statistics Agency")],
        })
        .with_default("HESA"),
    );
    let record = validator.validate(&RawRecord::new()).unwrap();
    assert_eq!(
        record["Data_Source"],
        Value::from("Higher Education Statistics Agency")
    );
}

#[test]
fn renaming_and_field_parser_agree_on_defaults() {
    let field = Field::new("guid", FieldType::Integer)
        .with_mapping(ValueMapping::new("-9", serde_json::Value::Null))
        .with_default("-9");
    let standalone = compile_field(&field).unwrap();
    assert_eq!(standalone.default_value(), Some("-9"));

    let record = single_field(field).validate(&RawRecord::new()).unwrap();
    assert_eq!(Ok(record["guid"].clone()), standalone.parse(None));
    assert_eq!(record["guid"], Value::Null);
}

#[test]
fn missing_value_without_default_fails() {
    let validator = single_field(Field::new("guid", FieldType::Integer));
    let errors = validator.validate(&RawRecord::new()).unwrap_err();
    assert_eq!(errors.errors()[0].kind, ParseErrorKind::MissingValue);
    assert_eq!(errors.errors()[0].field, "guid");
}

#[test]
fn unreferenced_raw_keys_are_ignored() {
    let mut row = hesa_row("10-10-2022");
    row.insert("postcode".to_string(), "AB1 2CD".to_string());
    row.insert("dob".to_string(), "not a date".to_string());
    let record = hesa().validate(&row).expect("extra keys are dropped");
    assert!(!record.contains_key("postcode"));
    assert_eq!(record.len(), 6);
}

#[test]
fn every_failing_field_is_reported_in_order() {
    let mut row = hesa_row("99-99-2022");
    row.insert("guid".to_string(), "abc".to_string());
    row.remove("HESA_ID");

    let errors = hesa().validate(&row).unwrap_err();
    let summary: Vec<(&str, ParseErrorKind)> = errors
        .errors()
        .iter()
        .map(|error| (error.field.as_str(), error.kind))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("guid", ParseErrorKind::TypeMismatch),
            ("HESA_ID", ParseErrorKind::MissingValue),
            ("dob", ParseErrorKind::InvalidDate),
        ]
    );
}

#[test]
fn validation_is_repeatable() {
    let validator = hesa();
    let row = hesa_row("10-10-2022");
    let first = validator.validate(&row).unwrap();
    let second = validator.validate(&row).unwrap();
    assert_eq!(first, second);
}

#[test]
fn validate_all_keeps_input_order() {
    let rows = vec![hesa_row("10-10-2022"), hesa_row("-9"), hesa_row("01-01-1999")];
    let results = hesa().validate_all(&rows);
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert_eq!(
        results[2].as_ref().unwrap()["dob"].as_date(),
        NaiveDate::from_ymd_opt(1999, 1, 1)
    );
}

#[test]
fn validator_is_shareable_across_threads() {
    let validator = hesa();
    let rows: Vec<RawRecord> = (1..=28)
        .map(|day| hesa_row(&format!("{day:02}-02-2021")))
        .collect();
    let expected = validator.validate_all(&rows);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| validator.validate_all(&rows)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn unknown_transform_fails_compilation() {
    let dataset = DatasetDefinition::new(
        "bad",
        vec![Field::new(
            "forename_clean",
            FieldType::String {
                additional_transformations: vec!["upper".to_string()],
            },
        )],
    );
    let err = compile_schema(&dataset).unwrap_err();
    assert_eq!(
        err,
        ConfigError::Field {
            field: "forename_clean".to_string(),
            source: FieldTypeError::UnknownTransform("upper".to_string()),
        }
    );
    insta::assert_snapshot!(err.to_string(), @"field 'forename_clean': unknown string transform 'upper'");
}

#[test]
fn config_error_messages() {
    let err = ConfigError::DuplicateOutputKey {
        key: "name".to_string(),
        first: "forename".to_string(),
        second: "name".to_string(),
    };
    insta::assert_snapshot!(err.to_string(), @"output key 'name' is produced by both 'forename' and 'name'");

    let err = ConfigError::Field {
        field: "dob".to_string(),
        source: FieldTypeError::InvalidDateFormat {
            format: "dd-MM".to_string(),
            reason: "pattern must contain a year, a month and a day".to_string(),
        },
    };
    insta::assert_snapshot!(err.to_string(), @"field 'dob': invalid date format 'dd-MM': pattern must contain a year, a month and a day");
}

#[test]
fn validation_error_message_lists_fields() {
    let mut row = hesa_row("-9");
    row.insert("guid".to_string(), "4a".to_string());
    let errors = hesa().validate(&row).unwrap_err();
    insta::assert_snapshot!(errors.to_string(), @"2 field(s) failed validation: guid: expected an integer, got '4a'; dob: expected a date matching 'dd-MM-yyyy', got '-9'");
}

#[test]
fn errors_serialize_as_a_list() {
    let errors = hesa().validate(&hesa_row("-9")).unwrap_err();
    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(
        json,
        json!([{
            "field": "dob",
            "kind": "invalid_date",
            "message": "expected a date matching 'dd-MM-yyyy', got '-9'"
        }])
    );
}
