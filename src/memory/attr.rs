//! Attribute storage for in-memory nodes.
//!
//! In a document description an attribute value is plain JSON or one of the
//! sentinel objects below:
//!
//! | JSON                       | read result                  |
//! |----------------------------|------------------------------|
//! | `{"_undefined": true}`     | `Ok(HostValue::Undefined)`   |
//! | `{"_error": "msg"}`        | `Err(ReadError("msg"))`      |
//! | `{"_object": "Type"}`      | `Ok(HostValue::Object)`      |
//! | `{"_function": "name"}`    | `Ok(HostValue::Callable)`    |

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::host::{HostObject, HostValue, ReadError};

/// Stored attribute: a value, or the message its read fails with.
#[derive(Debug, Clone, PartialEq)]
pub enum MemAttr {
    Value(HostValue),
    Fails(String),
}

impl Default for MemAttr {
    fn default() -> Self {
        MemAttr::Value(HostValue::Undefined)
    }
}

impl MemAttr {
    pub fn value(v: impl Into<HostValue>) -> Self {
        MemAttr::Value(v.into())
    }

    pub fn fails(message: impl Into<String>) -> Self {
        MemAttr::Fails(message.into())
    }

    pub fn read(&self) -> Result<HostValue, ReadError> {
        match self {
            MemAttr::Value(v) => Ok(v.clone()),
            MemAttr::Fails(msg) => Err(ReadError::new(msg.clone())),
        }
    }

    /// Read as a number; other simple values fail like a host type error.
    pub fn read_f64(&self) -> Result<f64, ReadError> {
        let value = self.read()?;
        value
            .as_f64()
            .ok_or_else(|| ReadError::new(format!("expected a number, found {}", value.describe())))
    }

    fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) if map.len() == 1 && map.contains_key("_error") => {
                MemAttr::Fails(map.get("_error").map(text).unwrap_or_default())
            }
            other => MemAttr::Value(host_value(other)),
        }
    }
}

impl<'de> Deserialize<'de> for MemAttr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(MemAttr::from_json)
    }
}

/// Convert description JSON into a host value, honoring sentinels.
///
/// A plain JSON object that is not a sentinel stands for an arbitrary host
/// object.
pub fn host_value(value: Value) -> HostValue {
    match value {
        Value::Null => HostValue::Null,
        Value::Bool(b) => HostValue::Bool(b),
        Value::Number(n) => HostValue::Number(n.as_f64().unwrap_or(f64::NAN)),
        Value::String(s) => HostValue::String(s),
        Value::Array(items) => HostValue::Array(items.into_iter().map(host_value).collect()),
        Value::Object(map) => {
            sentinel(&map).unwrap_or_else(|| HostValue::Object("Object".to_string()))
        }
    }
}

fn sentinel(map: &Map<String, Value>) -> Option<HostValue> {
    if map.len() != 1 {
        return None;
    }
    let (key, value) = map.iter().next()?;
    match key.as_str() {
        "_undefined" => Some(HostValue::Undefined),
        "_object" => Some(HostValue::Object(text(value))),
        "_function" => Some(HostValue::Callable(text(value))),
        _ => None,
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Named attributes of one node, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct MemObject {
    attrs: IndexMap<String, MemAttr>,
}

impl MemObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<HostValue>) -> Self {
        self.set(name, MemAttr::value(value));
        self
    }

    pub fn with_failure(mut self, name: &str, message: &str) -> Self {
        self.set(name, MemAttr::fails(message));
        self
    }

    pub fn set(&mut self, name: &str, attr: MemAttr) {
        self.attrs.insert(name.to_string(), attr);
    }

    pub fn get(&self, name: &str) -> Option<&MemAttr> {
        self.attrs.get(name)
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

impl HostObject for MemObject {
    fn attribute_names(&self) -> Vec<String> {
        self.attrs.keys().cloned().collect()
    }

    fn read(&self, name: &str) -> Result<HostValue, ReadError> {
        self.attrs.get(name).map_or(Ok(HostValue::Undefined), MemAttr::read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sentinels() {
        let obj: MemObject = serde_json::from_value(json!({
            "plain": [1, 2.5],
            "nothing": null,
            "undef": {"_undefined": true},
            "broken": {"_error": "Object is invalid"},
            "owner": {"_object": "CompItem"},
            "method": {"_function": "remove"},
            "struct": {"a": 1, "b": 2}
        }))
        .unwrap();

        let plain = HostValue::Array(vec![HostValue::Number(1.0), HostValue::Number(2.5)]);
        assert_eq!(obj.read("plain").unwrap(), plain);
        assert_eq!(obj.read("nothing").unwrap(), HostValue::Null);
        assert_eq!(obj.read("undef").unwrap(), HostValue::Undefined);
        assert_eq!(obj.read("broken").unwrap_err().message(), "Object is invalid");
        assert_eq!(obj.read("owner").unwrap(), HostValue::Object("CompItem".into()));
        assert_eq!(obj.read("method").unwrap(), HostValue::Callable("remove".into()));
        assert!(!obj.read("struct").unwrap().is_simple());
        assert_eq!(obj.read("unknown").unwrap(), HostValue::Undefined);
    }

    #[test]
    fn test_names_in_order() {
        let obj = MemObject::new().with("b", 1.0).with("a", 2.0).with_failure("c", "x");
        assert_eq!(obj.attribute_names(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_read_f64() {
        assert_eq!(MemAttr::value(2.0).read_f64().unwrap(), 2.0);
        assert!(MemAttr::value("2").read_f64().is_err());
        assert!(MemAttr::fails("gone").read_f64().is_err());
    }
}
