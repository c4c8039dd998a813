// @file: twin_distributor/src/cleaners/cell.rs
// @description: Parses NetMonster cell renderings and derives the global cell identity.
// @author: LAS.

use log::debug;
use serde_json::{Map, Value};
use crate::cleaners::scalar_value;
use crate::core::error::{DistributorError, Result};
use crate::core::interfaces::Cleaner;
use crate::core::models::{CleanedRecord, SensorType};


//
// CLEANER
//

pub struct CellCleaner;

impl Cleaner for CellCleaner {
    fn clean(&self, raw: &str) -> Result<CleanedRecord> {
        let mut parser = RenderingParser::new(raw);
        let mut cells: Vec<Map<String, Value>> = Vec::new();

        while let Some((class, fields)) = parser.next_rendering()? {
            let mut cell: Map<String, Value> = fields;
            let technology: String = technology_of(&class);

            match global_id(&technology, &cell) {
                Some(id) => {
                    cell.insert("technology".to_string(), Value::String(technology));
                    cell.insert("globalId".to_string(), Value::String(id));
                    cells.push(cell);
                }
                None => debug!("Dropping {} without a derivable global id", class),
            }
        }

        if parser.rendered == 0 {
            return Err(DistributorError::malformed(SensorType::Cell, "no cell rendering found"));
        }

        Ok(CleanedRecord::from_instances(cells))
    }
}

fn technology_of(class: &str) -> String {
    class.strip_prefix("Cell").unwrap_or(class).to_ascii_lowercase()
}


//
// GLOBAL IDENTITY
//

/// PLMN followed by the zero padded identity fields of the technology.
pub fn global_id(technology: &str, cell: &Map<String, Value>) -> Option<String> {
    match technology {
        "lte" => Some(format!("{}{}", plmn(cell)?, padded(cell, "eci", 10)?)),
        "gsm" => Some(format!(
            "{}{}{}",
            plmn(cell)?,
            padded(cell, "lac", 5)?,
            padded(cell, "cid", 5)?
        )),
        // 3G renderings carry the 28-bit ci; the CGI uses its low 16 bits.
        "wcdma" | "tdscdma" => Some(format!(
            "{}{}{:05}",
            plmn(cell)?,
            padded(cell, "lac", 5)?,
            cell.get("ci")?.as_u64()? & 0xFFFF
        )),
        "nr" => Some(format!("{}{}", plmn(cell)?, padded(cell, "nci", 11)?)),
        "cdma" => Some(format!(
            "{}{}{}",
            padded(cell, "sid", 5)?,
            padded(cell, "nid", 5)?,
            padded(cell, "bid", 5)?
        )),
        _ => None,
    }
}

fn plmn(cell: &Map<String, Value>) -> Option<String> {
    let network: &Map<String, Value> = cell.get("network")?.as_object()?;
    Some(format!("{}{}", text_of(network.get("mcc")?)?, text_of(network.get("mnc")?)?))
}

fn padded(cell: &Map<String, Value>, field: &str, width: usize) -> Option<String> {
    let digits: String = text_of(cell.get(field)?)?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(format!("{:0>width$}", digits, width = width))
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}


//
// RENDERING PARSER
//

// Reads `Name(key=value, key=Nested(...), ...)` renderings one after another.
struct RenderingParser<'a> {
    src: &'a str,
    pos: usize,
    rendered: usize,
}

impl<'a> RenderingParser<'a> {
    fn new(src: &'a str) -> Self {
        RenderingParser { src, pos: 0, rendered: 0 }
    }

    fn next_rendering(&mut self) -> Result<Option<(String, Map<String, Value>)>> {
        self.skip_whitespace();
        if self.pos >= self.src.len() {
            return Ok(None);
        }

        let class: String = self.identifier();
        if class.is_empty() || !self.eat('(') {
            return Err(self.error("expected a cell rendering"));
        }

        let fields: Map<String, Value> = self.fields()?;
        self.rendered += 1;
        Ok(Some((class, fields)))
    }

    // Parses `key=value, ...)` with the opening parenthesis already consumed.
    fn fields(&mut self) -> Result<Map<String, Value>> {
        let mut fields: Map<String, Value> = Map::new();

        self.skip_whitespace();
        if self.eat(')') {
            return Ok(fields);
        }

        loop {
            self.skip_whitespace();
            let key: String = self.identifier();
            if key.is_empty() || !self.eat('=') {
                return Err(self.error("expected key=value"));
            }

            let value: Value = self.value()?;
            fields.insert(key, value);

            self.skip_whitespace();
            if self.eat(',') {
                continue;
            }
            if self.eat(')') {
                return Ok(fields);
            }
            return Err(self.error("expected ',' or ')'"));
        }
    }

    fn value(&mut self) -> Result<Value> {
        self.skip_whitespace();
        let start: usize = self.pos;

        // #1. Nested rendering
        let class: String = self.identifier();
        if !class.is_empty() && self.eat('(') {
            let mut nested: Map<String, Value> = self.fields()?;
            nested.entry("type".to_string()).or_insert(Value::String(class));
            return Ok(Value::Object(nested));
        }

        // #2. Scalar up to the next delimiter at this level
        self.pos = start;
        let rest: &str = &self.src[self.pos..];
        let end: usize = rest.find([',', ')']).unwrap_or(rest.len());
        self.pos += end;
        Ok(scalar_value(&rest[..end]))
    }

    fn identifier(&mut self) -> String {
        let rest: &str = &self.src[self.pos..];
        let len: usize = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        self.pos += len;
        rest[..len].to_string()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.src[self.pos..].starts_with(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        let rest: &str = &self.src[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn error(&self, reason: &str) -> DistributorError {
        DistributorError::malformed(SensorType::Cell, format!("{} at offset {}", reason, self.pos))
    }
}
