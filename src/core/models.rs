// @file: twin_distributor/src/core/models.rs
// @description: Sensor types, per-type twin descriptors and the canonical update request.
// @author: LAS.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;


//
// SENSOR TYPES
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SensorType {
    Wifi,
    Cell,
    Action,
    Bluetooth,
}

impl SensorType {
    pub const ALL: [SensorType; 4] = [
        SensorType::Wifi,
        SensorType::Cell,
        SensorType::Action,
        SensorType::Bluetooth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SensorType::Wifi => "wifi",
            SensorType::Cell => "cell",
            SensorType::Action => "action",
            SensorType::Bluetooth => "bluetooth",
        }
    }

    // #1. Routing table
    // The action route carries no descriptor at all.
    pub fn descriptor(&self) -> TwinDescriptor {
        match self {
            SensorType::Wifi => TwinDescriptor::keyed("BSSID", "dtmi:network:wifi;1", "wifi"),
            SensorType::Cell => TwinDescriptor::keyed("globalId", "dtmi:network:cell;1", "cell"),
            SensorType::Action => TwinDescriptor::EMPTY,
            SensorType::Bluetooth => TwinDescriptor::keyed("MAC", "dtmi:network:bluetooth;1", "bluetooth"),
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wifi" => Ok(SensorType::Wifi),
            "cell" => Ok(SensorType::Cell),
            "action" => Ok(SensorType::Action),
            "bluetooth" => Ok(SensorType::Bluetooth),
            other => Err(format!("unknown sensor type: {}", other)),
        }
    }
}


//
// TWIN DESCRIPTORS
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwinDescriptor {
    pub key_field: Option<&'static str>,
    pub schema_id: Option<&'static str>,
    pub type_tag: Option<&'static str>,
}

impl TwinDescriptor {
    pub const EMPTY: TwinDescriptor = TwinDescriptor {
        key_field: None,
        schema_id: None,
        type_tag: None,
    };

    pub const fn keyed(key_field: &'static str, schema_id: &'static str, type_tag: &'static str) -> Self {
        TwinDescriptor {
            key_field: Some(key_field),
            schema_id: Some(schema_id),
            type_tag: Some(type_tag),
        }
    }
}


//
// CLEANED DATA
//

/// Output of a cleaner. The shape belongs to the cleaner; the dispatcher never looks inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CleanedRecord(pub Value);

impl CleanedRecord {
    pub fn new(value: Value) -> Self {
        CleanedRecord(value)
    }

    pub fn from_instances(instances: Vec<Map<String, Value>>) -> Self {
        CleanedRecord(Value::Array(instances.into_iter().map(Value::Object).collect()))
    }

    /// Twin instances carried by the record: a lone object, or every object of an array.
    pub fn instances(&self) -> Vec<&Map<String, Value>> {
        match &self.0 {
            Value::Object(map) => vec![map],
            Value::Array(items) => items.iter().filter_map(Value::as_object).collect(),
            _ => Vec::new(),
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub record: CleanedRecord,
    pub key_field: Option<&'static str>,
    pub schema_id: Option<&'static str>,
    pub type_tag: Option<&'static str>,
}

impl UpdateRequest {
    pub fn new(record: CleanedRecord, descriptor: TwinDescriptor) -> Self {
        UpdateRequest {
            record,
            key_field: descriptor.key_field,
            schema_id: descriptor.schema_id,
            type_tag: descriptor.type_tag,
        }
    }
}


//
// NETWORKING
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestMessage {
    #[serde(rename = "type")]
    pub sensor_type: SensorType,
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum IngestReply {
    Ok {
        #[serde(rename = "type")]
        sensor_type: SensorType,
    },
    Error {
        message: String,
    },
}
