//! Dataset definitions.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::field::Field;

/// The named, ordered list of field descriptors for one tabular source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDefinition {
    pub name: String,
    pub fields: Vec<Field>,
}

/// Name used by the configuration tooling for definitions of secondary
/// (non-primary) data sources.
pub type SecondaryDatasetDefinition = DatasetDefinition;

impl DatasetDefinition {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Parse a definition from its JSON representation.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a definition from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Find a field by its raw column name.
    pub fn field_by_raw_name(&self, raw_name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.raw_name == raw_name)
    }

    /// Output keys in declaration order.
    pub fn output_keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(Field::output_key)
    }
}
