//! Attribute values as the host object model hands them out.
//!
//! The host is dynamically typed: any attribute may hold a primitive, an
//! array, a live reference to another host object, or a method. Only the
//! "simple" subset can be written into a snapshot directly; everything else
//! is either skipped or replaced by a sentinel by the export layer.

use serde_json::{Number, Value};

/// Largest integer an f64 represents exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Value read from a host attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    /// Attribute exists but holds no value.
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<HostValue>),
    /// Live reference to another host object (layer, item, file, text document...).
    /// The payload is the host's type name, kept for diagnostics only.
    Object(String),
    /// Method or other callable member.
    Callable(String),
}

impl HostValue {
    /// Whether the value can be written to JSON as-is.
    ///
    /// Primitives, null, undefined and arrays of simple values are simple.
    /// Object references and callables are not.
    pub fn is_simple(&self) -> bool {
        match self {
            HostValue::Undefined
            | HostValue::Null
            | HostValue::Bool(_)
            | HostValue::Number(_)
            | HostValue::String(_) => true,
            HostValue::Array(items) => items.iter().all(HostValue::is_simple),
            HostValue::Object(_) | HostValue::Callable(_) => false,
        }
    }

    /// JSON rendition of a simple value, `None` for non-simple values.
    ///
    /// `Undefined` nested in an array becomes `null`, which is what the host's
    /// own JSON writer does. A top-level `Undefined` is the caller's business
    /// (see `FieldValue::Undefined`); here it also maps to `null`.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            HostValue::Undefined | HostValue::Null => Some(Value::Null),
            HostValue::Bool(b) => Some(Value::Bool(*b)),
            HostValue::Number(n) => Some(number_to_json(*n)),
            HostValue::String(s) => Some(Value::String(s.clone())),
            HostValue::Array(items) => items
                .iter()
                .map(HostValue::to_json)
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
            HostValue::Object(_) | HostValue::Callable(_) => None,
        }
    }

    /// Short description used in sentinel messages.
    pub fn describe(&self) -> String {
        match self {
            HostValue::Object(type_name) => format!("object of type {}", type_name),
            HostValue::Callable(name) => format!("function {}", name),
            HostValue::Array(_) => "array with non-simple elements".to_string(),
            other => format!("{:?}", other),
        }
    }

    /// Numeric payload, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HostValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Convert a host number the way the host's JSON writer prints it.
///
/// Integral values print without a fractional part, non-finite values
/// become `null`.
pub fn number_to_json(n: f64) -> Value {
    if !n.is_finite() {
        return Value::Null;
    }
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

impl From<bool> for HostValue {
    fn from(v: bool) -> Self {
        HostValue::Bool(v)
    }
}

impl From<f64> for HostValue {
    fn from(v: f64) -> Self {
        HostValue::Number(v)
    }
}

impl From<i32> for HostValue {
    fn from(v: i32) -> Self {
        HostValue::Number(v as f64)
    }
}

impl From<i64> for HostValue {
    fn from(v: i64) -> Self {
        HostValue::Number(v as f64)
    }
}

impl From<&str> for HostValue {
    fn from(v: &str) -> Self {
        HostValue::String(v.to_string())
    }
}

impl From<String> for HostValue {
    fn from(v: String) -> Self {
        HostValue::String(v)
    }
}

impl From<Vec<f64>> for HostValue {
    fn from(v: Vec<f64>) -> Self {
        HostValue::Array(v.into_iter().map(HostValue::Number).collect())
    }
}

impl<const N: usize> From<[f64; N]> for HostValue {
    fn from(v: [f64; N]) -> Self {
        HostValue::Array(v.iter().copied().map(HostValue::Number).collect())
    }
}

impl From<Vec<HostValue>> for HostValue {
    fn from(v: Vec<HostValue>) -> Self {
        HostValue::Array(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitives_are_simple() {
        assert!(HostValue::Undefined.is_simple());
        assert!(HostValue::Null.is_simple());
        assert!(HostValue::from(true).is_simple());
        assert!(HostValue::from(1.5).is_simple());
        assert!(HostValue::from("comp").is_simple());
    }

    #[test]
    fn test_nested_arrays() {
        let nested = HostValue::Array(vec![
            HostValue::from([1.0, 2.0]),
            HostValue::Array(vec![HostValue::Null, HostValue::from("x")]),
        ]);
        assert!(nested.is_simple());

        let poisoned = HostValue::Array(vec![
            HostValue::from(1.0),
            HostValue::Array(vec![HostValue::Object("Layer".into())]),
        ]);
        assert!(!poisoned.is_simple());
        assert_eq!(poisoned.to_json(), None);
    }

    #[test]
    fn test_references_are_not_simple() {
        assert!(!HostValue::Object("CompItem".into()).is_simple());
        assert!(!HostValue::Callable("layer".into()).is_simple());
    }

    #[test]
    fn test_number_printing() {
        assert_eq!(number_to_json(5.0), json!(5));
        assert_eq!(number_to_json(-0.0), json!(0));
        assert_eq!(number_to_json(29.97), json!(29.97));
        assert_eq!(number_to_json(f64::NAN), Value::Null);
        assert_eq!(number_to_json(f64::INFINITY), Value::Null);
        assert_eq!(number_to_json(1e300), json!(1e300));
    }

    #[test]
    fn test_undefined_in_array_becomes_null() {
        let v = HostValue::Array(vec![HostValue::Undefined, HostValue::from(2.0)]);
        assert_eq!(v.to_json(), Some(json!([null, 2])));
    }
}
