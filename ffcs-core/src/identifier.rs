//! Opaque document identifiers.
//!
//! On the wire an identifier is its 24-character lowercase hex rendering.
//! Typed records name their identifier fields explicitly; [`recursive_restore`]
//! is the fallback for payloads nobody has a schema for.
//!
//! The fallback is a guess based on shape alone: any business string that
//! happens to be 24 lowercase hex characters (a barcode, a hash prefix) is
//! promoted to an identifier as well. Callers that know the schema should use
//! [`crate::normalize::restore_known_identifiers`] instead.

use std::sync::LazyLock;

pub use bson::oid::ObjectId;
use regex::Regex;

use crate::{
    error::{Error, Result},
    value::Value,
};

static OBJECT_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{24}$").unwrap());

const EXPECTED: &str = "24 lowercase hexadecimal characters";

#[must_use]
pub fn is_object_id_like(s: &str) -> bool {
    OBJECT_ID_PATTERN.is_match(s)
}

/// # Errors
/// [`Error::Format`] unless `raw` is exactly 24 lowercase hex characters.
pub fn parse(field: &str, raw: &str) -> Result<ObjectId> {
    if !is_object_id_like(raw) {
        return Err(Error::format(field, raw, EXPECTED));
    }

    ObjectId::parse_str(raw).map_err(|_| Error::format(field, raw, EXPECTED))
}

#[must_use]
pub fn recursive_restore(value: Value) -> Value {
    match value {
        Value::String(s) if is_object_id_like(&s) => match ObjectId::parse_str(&s) {
            Ok(id) => Value::Identifier(id),
            Err(_) => Value::String(s),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(recursive_restore).collect()),
        Value::Document(doc) => Value::Document(
            doc.into_iter()
                .map(|(k, v)| (k, recursive_restore(v)))
                .collect(),
        ),
        scalar => scalar,
    }
}

/// `#[serde(with = "identifier::hex")]`
pub mod hex {
    use bson::oid::ObjectId;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&id.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ObjectId, D::Error> {
        let raw = String::deserialize(deserializer)?;

        super::parse("_id", &raw).map_err(D::Error::custom)
    }
}

/// `#[serde(with = "identifier::hex_option")]`
pub mod hex_option {
    use bson::oid::ObjectId;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(id: &Option<ObjectId>, serializer: S) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => serializer.serialize_some(&id.to_hex()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<ObjectId>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;

        raw.map(|raw| super::parse("identifier", &raw).map_err(D::Error::custom))
            .transpose()
    }
}
