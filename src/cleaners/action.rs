// @file: twin_distributor/src/cleaners/action.rs
// @description: Accepts JSON action events (object or array of objects).
// @author: LAS.

use serde_json::Value;
use crate::core::error::{DistributorError, Result};
use crate::core::interfaces::Cleaner;
use crate::core::models::{CleanedRecord, SensorType};

pub struct ActionCleaner;

impl Cleaner for ActionCleaner {
    fn clean(&self, raw: &str) -> Result<CleanedRecord> {
        let value: Value = serde_json::from_str(raw.trim())
            .map_err(|e| DistributorError::malformed(SensorType::Action, e.to_string()))?;

        let valid: bool = match &value {
            Value::Object(_) => true,
            Value::Array(items) => items.iter().all(Value::is_object),
            _ => false,
        };

        if !valid {
            return Err(DistributorError::malformed(
                SensorType::Action,
                "expected a JSON object or an array of objects",
            ));
        }

        Ok(CleanedRecord::new(value))
    }
}
