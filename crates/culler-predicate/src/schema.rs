//! Compiled JSON Schema predicate.

use std::fmt;

use culler_torrent_core::{TorrentPredicate, TorrentRecord};
use jsonschema::Validator;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::PredicateError;

/// Predicate that matches records whose document validates against a schema.
pub struct SchemaPredicate {
    label: String,
    validator: Validator,
}

impl fmt::Debug for SchemaPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaPredicate")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl SchemaPredicate {
    /// Compile `schema` into a predicate named `label`.
    ///
    /// # Errors
    ///
    /// Returns [`PredicateError::InvalidRoot`] when the root is not an object or
    /// boolean and [`PredicateError::Compile`] when the schema is rejected.
    pub fn compile(label: impl Into<String>, schema: &Value) -> Result<Self, PredicateError> {
        let label = label.into();
        if !matches!(schema, Value::Object(_) | Value::Bool(_)) {
            return Err(PredicateError::InvalidRoot {
                label,
                found: json_type(schema),
            });
        }
        let validator = Validator::new(schema).map_err(|err| PredicateError::Compile {
            label: label.clone(),
            detail: err.to_string(),
        })?;
        Ok(Self { label, validator })
    }
}

impl TorrentPredicate for SchemaPredicate {
    fn label(&self) -> &str {
        &self.label
    }

    fn evaluate(&self, record: &TorrentRecord) -> anyhow::Result<bool> {
        let document = record.to_document();
        match self.validator.validate(&document) {
            Ok(()) => {
                trace!(predicate = %self.label, torrent_id = %record.id, "schema matched");
                Ok(true)
            }
            Err(reason) => {
                debug!(
                    predicate = %self.label,
                    torrent_id = %record.id,
                    reason = %reason,
                    "schema did not match"
                );
                Ok(false)
            }
        }
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
