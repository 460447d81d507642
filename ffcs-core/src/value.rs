use std::{cmp::Ordering, collections::BTreeMap};

use bson::oid::ObjectId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::normalize;

pub type Document = BTreeMap<String, Value>;

/// A document value as seen on the client side of the wire.
///
/// Unlike [`serde_json::Value`], this carries timestamps and identifiers as
/// native leaves. [`normalize::serialize`] lowers it back to plain JSON.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Timestamp(NaiveDateTime),
    Identifier(ObjectId),
    Array(Vec<Value>),
    Document(Document),
}

impl Value {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Document(doc) => doc.get(key),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_identifier(&self) -> Option<ObjectId> {
        match self {
            Self::Identifier(id) => Some(*id),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    // Mirrors the cross-type ordering a document store uses for sorting
    fn type_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Number(_) => 1,
            Self::String(_) => 2,
            Self::Document(_) => 3,
            Self::Array(_) => 4,
            Self::Identifier(_) => 5,
            Self::Bool(_) => 6,
            Self::Timestamp(_) => 7,
        }
    }

    /// Total order used by cursor sorting. Values of different kinds order by
    /// kind first; `NaN` compares equal to every number.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        use Value::{Array, Bool, Document, Identifier, Null, Number, String, Timestamp};

        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Number(a), Number(b)) => {
                let (a, b) = (a.as_f64().unwrap_or(f64::NAN), b.as_f64().unwrap_or(f64::NAN));
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            }
            (String(a), String(b)) => a.cmp(b),
            (Identifier(a), Identifier(b)) => a.bytes().cmp(&b.bytes()),
            (Bool(a), Bool(b)) => a.cmp(b),
            (Timestamp(a), Timestamp(b)) => a.cmp(b),
            (Array(a), Array(b)) => a
                .iter()
                .zip(b)
                .map(|(x, y)| x.compare(y))
                .find(|o| o.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            (Document(_), Document(_)) => normalize::serialize(self)
                .to_string()
                .cmp(&normalize::serialize(other).to_string()),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            serde_json::Value::Object(map) => Self::Document(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

/// JSON has no NaN or infinity, so a non-finite number becomes
/// [`Value::Null`], the same as `serde_json::json!` does.
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

impl From<ObjectId> for Value {
    fn from(value: ObjectId) -> Self {
        Self::Identifier(value)
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        Self::Document(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Self::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        normalize::serialize(self).serialize(serializer)
    }
}

// Strings stay strings here; typing them is the job of `normalize` and `identifier`
impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

/// Builds a [`Document`] from `key => value` pairs.
#[macro_export]
macro_rules! document {
    () => { $crate::value::Document::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut doc = $crate::value::Document::new();
        $(doc.insert($key.to_string(), $crate::value::Value::from($value));)+
        doc
    }};
}
