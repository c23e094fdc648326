//! Record renaming.
//!
//! Maps a raw record onto output keys before any typing happens. Raw keys
//! that no field reads are dropped here, so they never reach the strict
//! shape check.

use std::collections::BTreeMap;
use std::sync::Arc;

use rowschema_model::{Field, RawRecord};
use tracing::trace;

/// A raw record after renaming: output key to raw value, `None` when the
/// column was absent and the field has no default.
pub type RenamedRecord = BTreeMap<String, Option<String>>;

#[derive(Debug, Clone, PartialEq, Eq)]
struct KeyBinding {
    raw_name: String,
    output_key: String,
    default: Option<String>,
}

/// Renaming stage bound to a field list.
///
/// Absent columns are filled with the field's default here, so the field
/// parsers downstream always see the default as a present value.
#[derive(Debug, Clone)]
pub struct RecordTransformer {
    bindings: Arc<[KeyBinding]>,
}

impl RecordTransformer {
    pub fn new(fields: &[Field]) -> Self {
        let bindings = fields
            .iter()
            .map(|field| KeyBinding {
                raw_name: field.raw_name.clone(),
                output_key: field.output_key().to_string(),
                default: field.default_value.clone(),
            })
            .collect();
        Self { bindings }
    }

    pub fn transform(&self, raw: &RawRecord) -> RenamedRecord {
        let mut renamed = RenamedRecord::new();
        let mut matched = 0usize;
        for binding in self.bindings.iter() {
            let value = match raw.get(&binding.raw_name) {
                Some(value) => {
                    matched += 1;
                    Some(value.clone())
                }
                None => binding.default.clone(),
            };
            renamed.insert(binding.output_key.clone(), value);
        }
        if matched < raw.len() {
            trace!(dropped = raw.len() - matched, "dropped unreferenced raw keys");
        }
        renamed
    }
}

/// Rename `raw` according to `fields`.
///
/// Convenience over [`RecordTransformer`] for one-off use.
pub fn transform(fields: &[Field], raw: &RawRecord) -> RenamedRecord {
    RecordTransformer::new(fields).transform(raw)
}
