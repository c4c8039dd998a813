// @file: twin_distributor/src/cleaners/bluetooth.rs
// @description: Parses discovery groups of [name, address, rssi, class, connected].
// @author: LAS.

use serde_json::{Map, Value};
use crate::cleaners::{bracket_groups, loose_int};
use crate::core::error::{DistributorError, Result};
use crate::core::interfaces::Cleaner;
use crate::core::models::{CleanedRecord, SensorType};


const FIELDS_PER_DEVICE: usize = 5;

pub struct BluetoothCleaner;

impl Cleaner for BluetoothCleaner {
    fn clean(&self, raw: &str) -> Result<CleanedRecord> {
        let groups: Vec<&str> = bracket_groups(raw)
            .ok_or_else(|| DistributorError::malformed(SensorType::Bluetooth, "expected a bracketed device list"))?;

        let mut devices: Vec<Map<String, Value>> = Vec::with_capacity(groups.len());
        for group in groups {
            devices.push(parse_device(group)?);
        }

        Ok(CleanedRecord::from_instances(devices))
    }
}

fn parse_device(group: &str) -> Result<Map<String, Value>> {
    let parts: Vec<&str> = group.split(',').map(str::trim).collect();
    if parts.len() < FIELDS_PER_DEVICE {
        return Err(DistributorError::malformed(
            SensorType::Bluetooth,
            format!("expected {} fields, got {} in '{}'", FIELDS_PER_DEVICE, parts.len(), group),
        ));
    }

    // #1. Take the fixed fields from the right, the name may contain commas
    let split: usize = parts.len() - (FIELDS_PER_DEVICE - 1);
    let name: String = parts[..split].join(", ");
    let tail: &[&str] = &parts[split..];

    let mut device: Map<String, Value> = Map::new();
    device.insert("name".to_string(), Value::String(name));
    device.insert("MAC".to_string(), Value::String(tail[0].to_string()));
    device.insert("rssi".to_string(), loose_int(tail[1]).map(Value::from).unwrap_or(Value::Null));
    device.insert("deviceClass".to_string(), loose_int(tail[2]).map(Value::from).unwrap_or(Value::Null));
    device.insert("connected".to_string(), Value::Bool(tail[3].eq_ignore_ascii_case("true")));
    Ok(device)
}
