//! The field value model for constructed instances.
//!
//! [`FieldValue`] mirrors the JSON data model with one addition: [`Ref`],
//! a non-owning handle to another instance in the record store. Converting
//! from `serde_json::Value` never produces a `Ref`; references are
//! substituted by the relationship resolver, and exporting back to JSON
//! renders each reference as a `{"$ref": "<uuid>"}` marker object.
//!
//! [`Ref`]: FieldValue::Ref

use crate::{IdKey, InstanceId};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// Key under which a reference renders in exported JSON, and the marker the
/// relationship resolver accepts back in relation slots.
pub const REF_KEY: &str = "$ref";

/// One field value on a constructed instance.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// JSON null.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON number.
    Number(Number),
    /// JSON string.
    String(String),
    /// JSON array.
    Array(Vec<FieldValue>),
    /// JSON object, keys sorted for deterministic iteration.
    Object(BTreeMap<String, FieldValue>),
    /// Shared handle to another instance in the record store.
    Ref(InstanceId),
}

impl FieldValue {
    /// Returns the boolean value, if this is a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the string value, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an `i64`, if this is an integral number.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Returns the value as an `f64`, if this is a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Returns the referenced instance handle, if this is a reference.
    #[must_use]
    pub fn as_ref_id(&self) -> Option<InstanceId> {
        match self {
            Self::Ref(uid) => Some(*uid),
            _ => None,
        }
    }

    /// Returns the elements, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries, if this is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            Self::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Reads the value as an identity key, under the same rules as
    /// [`IdKey::from_json`]: integral numbers and strings qualify, nothing
    /// else does.
    #[must_use]
    pub fn to_id_key(&self) -> Option<IdKey> {
        match self {
            Self::Number(n) => n.as_i64().map(IdKey::Int),
            Self::String(s) => Some(IdKey::Str(s.clone())),
            _ => None,
        }
    }

    /// True for `FieldValue::Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True for `FieldValue::Ref`.
    #[must_use]
    pub fn is_ref(&self) -> bool {
        matches!(self, Self::Ref(_))
    }

    /// Parses a `{"$ref": "<uuid>"}` marker object back into a handle.
    ///
    /// Only exact markers qualify: a single-entry object whose sole key is
    /// [`REF_KEY`] and whose value parses as a UUID. Anything else returns
    /// `None` and is treated as ordinary data.
    #[must_use]
    pub fn ref_marker(value: &Value) -> Option<InstanceId> {
        let entries = value.as_object()?;
        if entries.len() != 1 {
            return None;
        }
        InstanceId::parse(entries.get(REF_KEY)?.as_str()?).ok()
    }

    /// Renders the value back to JSON, with references as marker objects.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
            Self::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Self::Ref(uid) => {
                let mut marker = Map::with_capacity(1);
                marker.insert(REF_KEY.to_string(), Value::String(uid.to_string()));
                Value::Object(marker)
            }
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(entries) => Self::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Number(Number::from(n))
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<InstanceId> for FieldValue {
    fn from(uid: InstanceId) -> Self {
        Self::Ref(uid)
    }
}
