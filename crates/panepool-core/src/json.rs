//! JSON output envelope shared by every command that supports `--json`.

use serde::{Deserialize, Serialize};

/// Wraps a payload with its schema name and cardinality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaEnvelope<T> {
    /// Schema identifier, e.g. `status-response`
    pub schema: String,
    /// `single` or `array`
    #[serde(rename = "type")]
    pub kind: String,
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> SchemaEnvelope<T> {
    pub fn new(schema: impl Into<String>, kind: impl Into<String>, data: T) -> Self {
        Self {
            schema: schema.into(),
            kind: kind.into(),
            success: true,
            data,
        }
    }

    /// Serialize to a single-line JSON string.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
