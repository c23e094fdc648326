//! Field descriptors.
//!
//! A [`Field`] describes one column of a tabular source: where to read it
//! from, what to call it in the output and how to coerce its raw text.

use serde::{Deserialize, Serialize};

/// Exact-literal substitution rule: a raw value equal to `from_value` is
/// replaced by `mapped_to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueMapping {
    pub from_value: String,
    #[serde(default)]
    pub mapped_to: serde_json::Value,
}

impl ValueMapping {
    pub fn new(from_value: impl Into<String>, mapped_to: impl Into<serde_json::Value>) -> Self {
        Self {
            from_value: from_value.into(),
            mapped_to: mapped_to.into(),
        }
    }
}

/// The declared type of a field.
///
/// Serialized with an internal `"type"` tag, e.g.
/// `{"type": "date", "format": "dd-MM-yyyy"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum FieldType {
    /// Calendar date parsed with a Unicode date pattern (`dd-MM-yyyy`).
    Date { format: String },
    /// Free text with optional named transforms applied in order.
    String {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        additional_transformations: Vec<String>,
    },
    /// Base-10 signed integer.
    Integer,
    /// Closed set of raw literals, each mapped to an output value.
    Mapping { mapping: Vec<ValueMapping> },
    /// Record identifier. Uniqueness is enforced outside the compiler.
    PrimaryKey,
    /// Grouping attribute.
    ///
    /// `is_matching_group` marks groups whose members are matched together;
    /// it is carried for downstream consumers only.
    GroupKey { is_matching_group: bool },
}

impl FieldType {
    /// Plain text field without transforms.
    pub fn string() -> Self {
        FieldType::String {
            additional_transformations: Vec::new(),
        }
    }

    /// The serialized tag of this type.
    pub fn tag(&self) -> &'static str {
        match self {
            FieldType::Date { .. } => "date",
            FieldType::String { .. } => "string",
            FieldType::Integer => "integer",
            FieldType::Mapping { .. } => "mapping",
            FieldType::PrimaryKey => "primary-key",
            FieldType::GroupKey { .. } => "group-key",
        }
    }

    /// Short human-readable description, used in listings.
    pub fn describe(&self) -> String {
        match self {
            FieldType::Date { format } => format!("date ({format})"),
            FieldType::String {
                additional_transformations,
            } if !additional_transformations.is_empty() => {
                format!("string [{}]", additional_transformations.join(", "))
            }
            FieldType::Mapping { mapping } => format!("mapping ({} values)", mapping.len()),
            FieldType::GroupKey {
                is_matching_group: true,
            } => "group-key (matching)".to_string(),
            other => other.tag().to_string(),
        }
    }
}

/// One column of a dataset definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Column name in the raw source, e.g. `ONS_ID`.
    pub raw_name: String,
    /// Output name; the raw name is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Sentinel substitutions checked before the field type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_mappings: Vec<ValueMapping>,
    pub field_type: FieldType,
    #[serde(default)]
    pub should_display: bool,
    #[serde(default)]
    pub description: String,
    /// Raw value used when the column is missing from a record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl Field {
    pub fn new(raw_name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            raw_name: raw_name.into(),
            alias: None,
            additional_mappings: Vec::new(),
            field_type,
            should_display: true,
            description: String::new(),
            default_value: None,
        }
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub fn with_mapping(mut self, mapping: ValueMapping) -> Self {
        self.additional_mappings.push(mapping);
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.should_display = false;
        self
    }

    /// Key under which this field appears in validated output.
    pub fn output_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.raw_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_key_prefers_alias() {
        let field = Field::new("date of birth", FieldType::Integer);
        assert_eq!(field.output_key(), "date of birth");
        assert_eq!(field.with_alias("dob").output_key(), "dob");
    }

    #[test]
    fn describe_includes_details() {
        let date = FieldType::Date {
            format: "dd-MM-yyyy".to_string(),
        };
        assert_eq!(date.describe(), "date (dd-MM-yyyy)");
        assert_eq!(FieldType::string().describe(), "string");
        assert_eq!(FieldType::PrimaryKey.describe(), "primary-key");
    }
}
