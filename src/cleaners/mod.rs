// @file: twin_distributor/src/cleaners/mod.rs
// @description: Default cleaners for the payloads published by the Android collector.
// @author: LAS.

pub mod action;
pub mod bluetooth;
pub mod cell;
pub mod wifi;

pub use action::ActionCleaner;
pub use bluetooth::BluetoothCleaner;
pub use cell::CellCleaner;
pub use wifi::WifiCleaner;

use serde_json::{Number, Value};


//
// SHARED PARSING HELPERS
//

/// Splits a `[[a], [b], ...]` list rendering into the inner text of each top-level group.
/// Groups end only at a `]` followed by `, [`, so brackets inside values (`[ESS]`, an SSID
/// like `Cafe [Guest`) stay part of their entry. Returns None when the text is not a list of groups.
pub(crate) fn bracket_groups(text: &str) -> Option<Vec<&str>> {
    let inner: &str = text.trim().strip_prefix('[')?.strip_suffix(']')?.trim();
    if inner.is_empty() {
        return Some(Vec::new());
    }

    let body: &str = inner.strip_prefix('[')?.strip_suffix(']')?;
    let mut groups: Vec<&str> = Vec::new();
    let mut start: usize = 0;

    for (idx, _) in body.match_indices(']') {
        if idx < start {
            continue;
        }
        let Some(next) = body[idx + 1..].trim_start().strip_prefix(',') else {
            continue;
        };
        let next: &str = next.trim_start();
        if next.starts_with('[') {
            groups.push(&body[start..idx]);
            start = body.len() - next.len() + 1;
        }
    }

    groups.push(&body[start..]);
    Some(groups)
}

/// Converts a textual scalar into the closest JSON value.
/// Integers with a leading zero ("03") stay strings so codes keep their width.
pub(crate) fn scalar_value(raw: &str) -> Value {
    let text: &str = raw.trim();

    match text {
        "null" => return Value::Null,
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    let digits: &str = text.strip_prefix('-').unwrap_or(text);
    let leading_zero: bool = digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0.");

    if !leading_zero && !digits.is_empty() {
        if let Ok(int) = text.parse::<i64>() {
            return Value::Number(int.into());
        }
        if text.contains('.') {
            if let Some(num) = text.parse::<f64>().ok().and_then(Number::from_f64) {
                return Value::Number(num);
            }
        }
    }

    Value::String(text.to_string())
}

/// Integer view of a loosely typed field ("-45", "2437MHz", 2437).
pub(crate) fn loose_int(value: &str) -> Option<i64> {
    let digits: &str = value
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_alphabetic())
        .trim();
    digits.parse::<i64>().ok()
}
