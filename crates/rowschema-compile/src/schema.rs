//! Dataset schema compilation.
//!
//! [`compile_schema`] turns a [`DatasetDefinition`] into a
//! [`RecordValidator`]: renaming first, then a strict object shape whose
//! entries are the compiled fields.

use std::collections::{BTreeMap, BTreeSet};

use rowschema_model::{DatasetDefinition, Field, RawRecord, Record};
use tracing::{debug, trace};

use crate::error::{ConfigError, ValidationErrors};
use crate::field::compile_field;
use crate::parser::ObjectShape;
use crate::transform::RecordTransformer;

/// Stateless validator for one dataset shape.
///
/// Cheap to clone and safe to share between threads; every call to
/// [`RecordValidator::validate`] is independent.
#[derive(Debug, Clone)]
pub struct RecordValidator {
    name: String,
    transformer: RecordTransformer,
    shape: ObjectShape,
}

/// Compile a dataset definition.
///
/// Fails on the first configuration problem; no validator is produced for a
/// broken definition.
pub fn compile_schema(dataset: &DatasetDefinition) -> Result<RecordValidator, ConfigError> {
    check_unique_names(&dataset.fields)?;

    let mut shape = ObjectShape::new();
    for field in &dataset.fields {
        shape = shape.field(field.output_key(), compile_field(field)?);
    }

    debug!(
        dataset = %dataset.name,
        fields = dataset.fields.len(),
        "compiled dataset schema"
    );

    Ok(RecordValidator {
        name: dataset.name.clone(),
        transformer: RecordTransformer::new(&dataset.fields),
        shape: shape.strict(),
    })
}

fn check_unique_names(fields: &[Field]) -> Result<(), ConfigError> {
    let mut raw_names = BTreeSet::new();
    let mut output_keys: BTreeMap<&str, &str> = BTreeMap::new();
    for field in fields {
        if !raw_names.insert(field.raw_name.as_str()) {
            return Err(ConfigError::DuplicateRawName {
                raw_name: field.raw_name.clone(),
            });
        }
        if let Some(first) = output_keys.insert(field.output_key(), field.raw_name.as_str()) {
            return Err(ConfigError::DuplicateOutputKey {
                key: field.output_key().to_string(),
                first: first.to_string(),
                second: field.raw_name.clone(),
            });
        }
    }
    Ok(())
}

impl RecordValidator {
    /// Name of the dataset this validator was compiled from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Output keys in field declaration order.
    pub fn output_keys(&self) -> impl Iterator<Item = &str> {
        self.shape.keys()
    }

    /// Validate one raw record.
    ///
    /// Every field is evaluated; on failure all field errors are returned
    /// and no partial record is produced.
    pub fn validate(&self, raw: &RawRecord) -> Result<Record, ValidationErrors> {
        let renamed = self.transformer.transform(raw);
        let result = self.shape.validate(&renamed);
        if let Err(errors) = &result {
            trace!(
                dataset = %self.name,
                errors = errors.len(),
                "record failed validation"
            );
        }
        result
    }

    /// Validate a batch, one result per record in input order.
    pub fn validate_all<'a, I>(&self, records: I) -> Vec<Result<Record, ValidationErrors>>
    where
        I: IntoIterator<Item = &'a RawRecord>,
    {
        records.into_iter().map(|raw| self.validate(raw)).collect()
    }
}
