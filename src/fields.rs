//! Key/value arguments of structured logging calls
//!
//! Structured calls take a flat, alternating sequence `key, value, key, value`.
//! Keys must be strings. Pairs with a non-string key and a trailing key without a
//! value are not dropped silently: they are reported in a separate error entry.

use serde::Serialize;
use serde_json::{Map, Value};

/// Convert any serializable value into a structured field value.
///
/// Values that fail to serialize are kept as a descriptive string.
pub fn value<T: Serialize + ?Sized>(v: &T) -> Value {
    serde_json::to_value(v).unwrap_or_else(|err| Value::String(format!("<unserializable: {err}>")))
}

/// Problems found while pairing structured arguments
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Malformed {
    /// Odd-length sequence; the last element had no value
    DanglingKey(Value),
    /// Pairs whose key is not a string, with their position in the sequence
    NonStringKeys(Vec<(usize, Value, Value)>),
}

impl Malformed {
    pub(crate) fn message(&self) -> &'static str {
        match self {
            Malformed::DanglingKey(_) => "Ignored key without a value.",
            Malformed::NonStringKeys(_) => "Ignored key-value pairs with non-string keys.",
        }
    }

    pub(crate) fn into_fields(self) -> Map<String, Value> {
        let mut fields = Map::new();
        match self {
            Malformed::DanglingKey(key) => {
                fields.insert("ignored".to_string(), key);
            }
            Malformed::NonStringKeys(pairs) => {
                let pairs = pairs
                    .into_iter()
                    .map(|(position, key, value)| {
                        serde_json::json!({ "position": position, "key": key, "value": value })
                    })
                    .collect();
                fields.insert("invalid".to_string(), Value::Array(pairs));
            }
        }
        fields
    }
}

/// Pair up `args` into `fields`, returning what could not be paired
pub(crate) fn sweeten(args: &[Value], fields: &mut Map<String, Value>) -> Vec<Malformed> {
    let mut problems = Vec::new();
    let mut invalid = Vec::new();

    for (i, chunk) in args.chunks(2).enumerate() {
        match chunk {
            [Value::String(key), value] => {
                fields.insert(key.clone(), value.clone());
            }
            [key, value] => invalid.push((i * 2, key.clone(), value.clone())),
            [key] => problems.push(Malformed::DanglingKey(key.clone())),
            _ => {}
        }
    }

    if !invalid.is_empty() {
        problems.insert(0, Malformed::NonStringKeys(invalid));
    }
    problems
}
