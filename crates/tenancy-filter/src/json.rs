//! JSON interop, enabled by the `serde` feature.
//!
//! API responses arrive as JSON objects. They can be filtered directly, or
//! converted into [`Record`]s.

use serde_json::{Map, Number};

use crate::traits::Filterable;
use crate::value::{AttrValue, Value};
use crate::Record;

fn number_value(n: &Number) -> Value<'static> {
    match (n.as_i64(), n.as_f64()) {
        (Some(i), _) => Value::Int(i),
        (None, Some(f)) => Value::Float(f),
        (None, None) => Value::Unsupported("number"),
    }
}

fn json_view(value: &serde_json::Value) -> Value<'_> {
    match value {
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => number_value(n),
        serde_json::Value::Array(items) => items
            .iter()
            .map(serde_json::Value::as_str)
            .collect::<Option<Vec<_>>>()
            .map_or(Value::Unsupported("list"), Value::Strings),
        serde_json::Value::Object(_) => Value::Unsupported("map"),
        serde_json::Value::Null => Value::Unsupported("null"),
    }
}

impl Filterable for Map<String, serde_json::Value> {
    fn attribute(&self, name: &str) -> Option<Value<'_>> {
        self.get(name).map(json_view)
    }
}

impl From<serde_json::Value> for AttrValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => AttrValue::String(s),
            serde_json::Value::Bool(b) => AttrValue::Bool(b),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => AttrValue::Int(i),
                (None, Some(f)) => AttrValue::Float(f),
                (None, None) => AttrValue::String(n.to_string()),
            },
            serde_json::Value::Array(items) => {
                if items.iter().all(serde_json::Value::is_string) {
                    AttrValue::StringList(
                        items
                            .into_iter()
                            .filter_map(|item| match item {
                                serde_json::Value::String(s) => Some(s),
                                _ => None,
                            })
                            .collect(),
                    )
                } else {
                    AttrValue::List(items.into_iter().map(AttrValue::from).collect())
                }
            }
            serde_json::Value::Object(map) => AttrValue::Map(
                map.into_iter()
                    .map(|(key, value)| (key, AttrValue::from(value)))
                    .collect(),
            ),
            serde_json::Value::Null => AttrValue::Null,
        }
    }
}

impl From<AttrValue> for serde_json::Value {
    fn from(value: AttrValue) -> Self {
        match value {
            AttrValue::String(s) => serde_json::Value::String(s),
            AttrValue::Bool(b) => serde_json::Value::Bool(b),
            AttrValue::Int(i) => serde_json::Value::from(i),
            AttrValue::Float(f) => serde_json::Value::from(f),
            AttrValue::StringList(items) => serde_json::Value::from(items),
            AttrValue::List(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            AttrValue::Map(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, serde_json::Value::from(value)))
                    .collect(),
            ),
            AttrValue::Null => serde_json::Value::Null,
        }
    }
}

/// Converts a JSON object into a record.
pub fn record_from_json(object: Map<String, serde_json::Value>) -> Record {
    object
        .into_iter()
        .map(|(key, value)| (key, AttrValue::from(value)))
        .collect()
}
