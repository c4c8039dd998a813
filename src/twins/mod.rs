// @file: twin_distributor/src/twins/mod.rs
// @description: Twin updater implementations and the shared twin identity rules.
// @author: LAS.

pub mod http;
pub mod registry;

pub use http::HttpTwinClient;
pub use registry::TwinRegistry;

use serde_json::{json, Map, Value};
use crate::core::error::{DistributorError, Result};


//
// TWIN IDENTITY
//

/// `{type_tag}-{key}` with every non-alphanumeric character folded to '-' and lowercased.
///
/// Folding is lossy: keys differing only in case or punctuation (`AA:BB`, `aa-bb`) share
/// one id, and their updates merge into one twin. Key fields are MACs, BSSIDs and numeric
/// global ids, which only vary in separator and case across collectors.
pub fn twin_id(type_tag: Option<&str>, key_value: &str) -> String {
    let key: String = key_value
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();

    match type_tag {
        Some(tag) => format!("{}-{}", tag, key),
        None => key,
    }
}

/// Reads the key field of an instance as text. Strings are taken verbatim, numbers rendered.
pub fn key_value(instance: &Map<String, Value>, key_field: &str) -> Result<String> {
    match instance.get(key_field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(DistributorError::MissingKeyField { field: key_field.to_string() }),
    }
}

/// Instance properties plus the model stamp expected by the twin service.
pub fn twin_document(instance: &Map<String, Value>, schema_id: Option<&str>) -> Map<String, Value> {
    let mut document: Map<String, Value> = instance.clone();
    if let Some(model) = schema_id {
        document.insert("$metadata".to_string(), json!({ "$model": model }));
    }
    document
}
