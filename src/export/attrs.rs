//! Attribute collection with per-field failure isolation.
//!
//! A node's generic attributes are gathered into an [`Attributes`] map by one
//! of two strategies:
//! - allow-list: read the names listed in the node's [`AttrSchema`]s
//! - reflective: read every name the node enumerates, minus the skip set
//!
//! Each read is its own failure boundary. A read that fails becomes an
//! error sentinel for that one name; an undefined value becomes the
//! undefined sentinel; references and callables are left out.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::attr_schemas::AttrSchema;
use crate::config::{CollectionStrategy, ExportConfig};
use crate::host::{HostObject, HostValue, ReadError};

/// Sentinel key for undefined values.
pub const UNDEFINED_KEY: &str = "_undefined";
/// Sentinel key for failed reads.
pub const ERROR_KEY: &str = "_error";

/// One exported field.
///
/// `Value(Null)` is a genuine null. `Undefined` and `Error` serialize as
/// `{"_undefined": true}` and `{"_error": "<text>"}` so the three never
/// collapse into one representation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Value(Value),
    Undefined,
    Error(String),
}

impl FieldValue {
    /// Field for an optional attribute: non-simple values yield `None`.
    pub fn from_read(result: Result<HostValue, ReadError>) -> Option<FieldValue> {
        match result {
            Err(e) => Some(FieldValue::Error(e.to_string())),
            Ok(HostValue::Undefined) => Some(FieldValue::Undefined),
            Ok(value) => value.to_json().map(FieldValue::Value),
        }
    }

    /// Field for a mandatory slot: always produces a value.
    ///
    /// A non-simple value cannot be captured, so it is reported through the
    /// error sentinel rather than dropped.
    pub fn required(result: Result<HostValue, ReadError>) -> FieldValue {
        match result {
            Err(e) => FieldValue::Error(e.to_string()),
            Ok(HostValue::Undefined) => FieldValue::Undefined,
            Ok(value) => match value.to_json() {
                Some(json) => FieldValue::Value(json),
                None => FieldValue::Error(format!("cannot serialize {}", value.describe())),
            },
        }
    }

    /// Field for a typed host accessor.
    pub fn from_result<T: Into<HostValue>>(result: Result<T, ReadError>) -> FieldValue {
        FieldValue::required(result.map(Into::into))
    }

    /// Plain JSON payload; `None` for sentinels.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            FieldValue::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FieldValue::Error(_))
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Value(v) => v.serialize(serializer),
            FieldValue::Undefined => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(UNDEFINED_KEY, &true)?;
                map.end()
            }
            FieldValue::Error(msg) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(ERROR_KEY, msg)?;
                map.end()
            }
        }
    }
}

/// Collected attributes: name -> field, in collection order.
///
/// Order follows the host and is not meaningful; compare as a map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Attributes {
    map: IndexMap<String, FieldValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self { map: IndexMap::new() }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        self.map.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.map.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.map.iter()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Drop keys the enclosing record writes itself, so a flattened record
    /// never carries a key twice.
    pub fn without(mut self, reserved: &[&str]) -> Self {
        self.map.retain(|k, _| !reserved.contains(&k.as_str()));
        self
    }
}

/// Read every listed attribute of every schema, in schema order.
pub fn collect_allow_list<N: HostObject + ?Sized>(node: &N, schemas: &[&AttrSchema]) -> Attributes {
    let mut attrs = Attributes::new();
    for schema in schemas {
        for &name in schema.attrs {
            if attrs.contains(name) {
                continue;
            }
            if let Some(field) = FieldValue::from_read(node.read(name)) {
                attrs.insert(name, field);
            }
        }
    }
    attrs
}

/// Read every attribute the node enumerates, minus `config`'s skip set.
pub fn collect_reflective<N: HostObject + ?Sized>(node: &N, config: &ExportConfig) -> Attributes {
    collect_enumerated(node, |name| config.skips(name))
}

/// Read every attribute of a settings object. Setting names are data, so
/// nothing is skipped.
pub fn collect_settings<N: HostObject + ?Sized>(node: &N) -> Attributes {
    collect_enumerated(node, |_| false)
}

fn collect_enumerated<N, F>(node: &N, skip: F) -> Attributes
where
    N: HostObject + ?Sized,
    F: Fn(&str) -> bool,
{
    let mut attrs = Attributes::new();
    for name in node.attribute_names() {
        if skip(&name) || attrs.contains(&name) {
            continue;
        }
        match FieldValue::from_read(node.read(&name)) {
            Some(field) => {
                if field.is_error() {
                    log::trace!("attribute {} failed to read", name);
                }
                attrs.insert(name, field);
            }
            None => log::trace!("attribute {} is not simple, skipped", name),
        }
    }
    attrs
}

/// Collect with the configured strategy. `schemas` is ignored by the
/// reflective strategy.
pub fn collect<N: HostObject + ?Sized>(
    node: &N,
    schemas: &[&AttrSchema],
    config: &ExportConfig,
) -> Attributes {
    match config.collection_strategy {
        CollectionStrategy::AllowList => collect_allow_list(node, schemas),
        CollectionStrategy::Reflective => collect_reflective(node, config),
    }
}
