//! Identifier types used throughout the Normcore engine.
//!
//! [`InstanceId`] is the stable handle the record store hands out for every
//! constructed instance; [`IdKey`] is the caller-supplied identifier an
//! instance is keyed by within its entity type.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable handle to one constructed instance in the record store.
///
/// The store is the sole owner of instance data; relation fields and callers
/// hold this handle instead. Two fields refer to the same entity exactly when
/// their handles compare equal. Uses UUID v7 which embeds a timestamp for
/// natural ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(Uuid);

impl InstanceId {
    /// Creates a new instance handle with the current timestamp.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates an instance handle from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parses an instance handle from a string.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InstanceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Identifier an instance is keyed by within its entity type.
///
/// Payloads supply identifiers as JSON numbers or strings; both forms are
/// accepted and kept distinct, so `IdKey::Int(1)` and `IdKey::Str("1")` name
/// different instances. Any other JSON type cannot serve as a key and is
/// treated as absent (see [`IdKey::from_json`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdKey {
    /// Integral numeric identifier.
    Int(i64),
    /// String identifier.
    Str(String),
}

impl IdKey {
    /// Extracts a key from a JSON value.
    ///
    /// Returns `None` for anything that cannot key an identity registry:
    /// null, booleans, non-integral numbers, arrays, and objects. An
    /// instance whose identifier field holds such a value is constructed
    /// but never committed.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Int),
            Value::String(s) => Some(Self::Str(s.clone())),
            _ => None,
        }
    }

    /// Converts the key back to the JSON value it was read from.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Int(n) => Value::from(*n),
            Self::Str(s) => Value::from(s.as_str()),
        }
    }

    /// Returns the integral value for numeric keys.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Str(_) => None,
        }
    }

    /// Returns the string value for string keys.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Int(_) => None,
            Self::Str(s) => Some(s),
        }
    }
}

impl fmt::Display for IdKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for IdKey {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for IdKey {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for IdKey {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}
