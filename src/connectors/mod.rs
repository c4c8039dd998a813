// @file: twin_distributor/src/connectors/mod.rs
// @description: Inbound feeds and the payload sniffing used when a feed carries no type.
// @author: LAS.

pub mod mqtt;

use serde_json::Value;
use crate::cleaners::bracket_groups;
use crate::core::models::SensorType;

//
// PAYLOAD CLASSIFICATION
//

/// Guesses the sensor type of an untagged payload from its shape.
pub fn classify_payload(payload: &str) -> Option<SensorType> {
    let text: &str = payload.trim();

    // #1. JSON events
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        match value {
            Value::Object(_) => return Some(SensorType::Action),
            Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
                return Some(SensorType::Action);
            }
            _ => {}
        }
    }

    // #2. Wifi scans always carry a BSSID
    if text.contains("BSSID") {
        return Some(SensorType::Wifi);
    }

    // #3. NetMonster renderings: CellLte(...), CellGsm(...)
    if let Some(rest) = text.strip_prefix("Cell") {
        let class_len: usize = rest.find(|c: char| !c.is_ascii_alphanumeric()).unwrap_or(rest.len());
        if class_len > 0 && rest[class_len..].starts_with('(') {
            return Some(SensorType::Cell);
        }
    }

    // #4. Bluetooth discovery groups
    let groups: Vec<&str> = bracket_groups(text)?;
    let first: &str = groups.first()?;
    let fields: Vec<&str> = first.split(',').map(str::trim).collect();
    if fields.len() >= 5 && looks_like_mac(fields[fields.len() - 4]) {
        return Some(SensorType::Bluetooth);
    }

    None
}

/// Topic routing: `dt/wifi` names the type, anything else (`dt/message`) is sniffed.
pub fn route_message(topic: &str, payload: &str) -> Option<SensorType> {
    topic
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse::<SensorType>().ok())
        .or_else(|| classify_payload(payload))
}

fn looks_like_mac(text: &str) -> bool {
    let octets: Vec<&str> = text.split(':').collect();
    octets.len() == 6 && octets.iter().all(|o| o.len() == 2 && o.chars().all(|c| c.is_ascii_hexdigit()))
}
