//! Best-effort reading of loosely typed tool arguments.

use log::warn;
use serde_json::{Map, Value};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PAGE: u32 = 1;

/// Raw argument mapping from a `tools/call` request.
#[derive(Debug, Clone, Default)]
pub struct ArgumentMap(Map<String, Value>);

impl ArgumentMap {
    /// Missing, null, or non-object arguments become an empty map.
    pub fn from_value(arguments: Option<Value>) -> Self {
        match arguments {
            Some(Value::Object(map)) => Self(map),
            None | Some(Value::Null) => Self::default(),
            Some(other) => {
                warn!("ignoring non-object tool arguments: {}", type_name(&other));
                Self::default()
            }
        }
    }

    /// A non-blank string value. Numbers and booleans are stringified.
    pub fn string(&self, key: &str) -> Option<String> {
        let text = match self.0.get(key)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        (!text.is_empty()).then_some(text)
    }

    /// An integer value. Floats truncate and numeric strings are parsed.
    pub fn integer(&self, key: &str) -> Option<i64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// `page_size`, defaulted and clamped to the upstream's accepted range.
    pub fn page_size(&self) -> u32 {
        self.integer("page_size")
            .map(|n| n.clamp(1, MAX_PAGE_SIZE as i64) as u32)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// `page`, defaulted and clamped to at least 1.
    pub fn page(&self) -> u32 {
        self.integer("page")
            .map(|n| n.clamp(1, u32::MAX as i64) as u32)
            .unwrap_or(DEFAULT_PAGE)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
