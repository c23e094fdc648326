//! Data model for rowschema: field descriptors, dataset definitions and
//! coerced values.

pub mod dataset;
pub mod error;
pub mod field;
pub mod value;

pub use dataset::{DatasetDefinition, SecondaryDatasetDefinition};
pub use error::{ModelError, Result};
pub use field::{Field, FieldType, ValueMapping};
pub use value::{RawRecord, Record, Value};
