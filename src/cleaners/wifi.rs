// @file: twin_distributor/src/cleaners/wifi.rs
// @description: Parses Android ScanResult / WifiInfo renderings into wifi twin instances.
// @author: LAS.

use serde_json::{Map, Value};
use crate::cleaners::{bracket_groups, loose_int};
use crate::core::error::{DistributorError, Result};
use crate::core::interfaces::Cleaner;
use crate::core::models::{CleanedRecord, SensorType};


const CONNECTED_PREFIX: &str = "WifiList(wifiInfo=";

//
// CLEANER
//

pub struct WifiCleaner;

impl Cleaner for WifiCleaner {
    fn clean(&self, raw: &str) -> Result<CleanedRecord> {
        let groups: Vec<&str> = bracket_groups(raw)
            .ok_or_else(|| DistributorError::malformed(SensorType::Wifi, "expected a bracketed scan list"))?;

        let mut scans: Vec<Map<String, Value>> = Vec::with_capacity(groups.len());
        let mut connected: Vec<Map<String, Value>> = Vec::new();

        for group in groups {
            let entry: &str = group.trim();
            if entry.is_empty() {
                continue;
            }

            let (fields, is_connected) = parse_entry(entry);
            let Some(instance) = to_instance(&fields, is_connected) else {
                continue;
            };

            if is_connected {
                connected.push(instance);
            } else {
                scans.push(instance);
            }
        }

        // #1. Fold the connection entry into its scan result when both exist
        for link in connected {
            let bssid = link.get("BSSID").cloned();
            match scans.iter_mut().find(|scan| scan.get("BSSID") == bssid.as_ref()) {
                Some(scan) => {
                    scan.insert("connected".to_string(), Value::Bool(true));
                }
                None => scans.push(link),
            }
        }

        Ok(CleanedRecord::from_instances(scans))
    }
}


//
// ENTRY PARSING
//

// Returns "key: value" pairs in order, plus whether the entry is the connected network.
fn parse_entry(entry: &str) -> (Vec<(String, String)>, bool) {
    let mut body: &str = entry;
    let mut is_connected: bool = false;

    if let Some(rest) = body.strip_prefix(CONNECTED_PREFIX) {
        body = rest.strip_suffix(')').unwrap_or(rest);
        is_connected = true;
    }

    let mut fields: Vec<(String, String)> = Vec::new();

    for part in body.split(", ") {
        if let Some(flag) = part.strip_prefix("isConnected=") {
            is_connected = flag.trim() == "true";
            continue;
        }

        match part.split_once(": ") {
            Some((key, value)) if !key.contains(',') => {
                fields.push((key.trim().to_string(), value.trim().to_string()));
            }
            _ => {
                // Continuation of a value that itself contained ", "
                if let Some((_, last)) = fields.last_mut() {
                    last.push_str(", ");
                    last.push_str(part.trim());
                }
            }
        }
    }

    (fields, is_connected)
}

fn lookup<'a>(fields: &'a [(String, String)], keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| fields.iter().find(|(k, _)| k.as_str() == *key))
        .map(|(_, v)| v.as_str())
}

fn to_instance(fields: &[(String, String)], is_connected: bool) -> Option<Map<String, Value>> {
    let bssid: &str = lookup(fields, &["BSSID"])?;
    if bssid.is_empty() || bssid == "null" {
        return None;
    }

    let mut instance: Map<String, Value> = Map::new();

    let ssid: Value = lookup(fields, &["SSID"])
        .map(|s| Value::String(s.trim_matches('"').to_string()))
        .unwrap_or(Value::Null);
    instance.insert("SSID".to_string(), ssid);
    instance.insert("BSSID".to_string(), Value::String(bssid.to_string()));

    let capabilities: Value = lookup(fields, &["capabilities"])
        .map(|c| Value::String(c.to_string()))
        .unwrap_or(Value::Null);
    instance.insert("capabilities".to_string(), capabilities);

    let level: Value = lookup(fields, &["level", "RSSI"])
        .and_then(loose_int)
        .map(Value::from)
        .unwrap_or(Value::Null);
    instance.insert("level".to_string(), level);

    let frequency: Value = lookup(fields, &["frequency", "Frequency"])
        .and_then(loose_int)
        .map(Value::from)
        .unwrap_or(Value::Null);
    instance.insert("frequency".to_string(), frequency);

    instance.insert("connected".to_string(), Value::Bool(is_connected));
    Some(instance)
}
