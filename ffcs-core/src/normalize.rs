use serde::de::DeserializeOwned;

use crate::{
    error::{Error, Result},
    identifier, timestamp,
    value::{Document, Value},
};

/// Lowers a client-side value to plain JSON. Timestamps become ISO-8601
/// strings and identifiers their hex form; the input is left untouched.
#[must_use]
pub fn serialize(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => serde_json::Value::Number(n.clone()),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Timestamp(ts) => serde_json::Value::String(timestamp::format(ts)),
        Value::Identifier(id) => serde_json::Value::String(id.to_hex()),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(serialize).collect()),
        Value::Document(doc) => serialize_document(doc),
    }
}

#[must_use]
pub fn serialize_document(doc: &Document) -> serde_json::Value {
    serde_json::Value::Object(doc.iter().map(|(k, v)| (k.clone(), serialize(v))).collect())
}

fn restore_fields(
    record: &mut Document,
    field_names: &[&str],
    restore: impl Fn(&str, &str) -> Result<Value>,
    expected: &str,
) -> Result<()> {
    for &field in field_names {
        let Some(value) = record.get_mut(field) else {
            continue;
        };

        match value {
            Value::Null | Value::Timestamp(_) | Value::Identifier(_) => {}
            Value::String(raw) => *value = restore(field, raw)?,
            other => {
                return Err(Error::format(field, &serialize(other).to_string(), expected));
            }
        }
    }

    Ok(())
}

/// Parses the named timestamp fields of `record` in place.
///
/// # Errors
/// [`Error::Format`] on the first named field whose value is not a valid
/// timestamp string. Absent and null fields are skipped.
pub fn deserialize_known_fields(record: &mut Document, field_names: &[&str]) -> Result<()> {
    restore_fields(
        record,
        field_names,
        |field, raw| timestamp::parse(field, raw).map(Value::Timestamp),
        "an ISO-8601 timestamp",
    )
}

/// Same as [`deserialize_known_fields`], but for identifier fields.
///
/// # Errors
/// [`Error::Format`] on the first named field that is not an identifier.
pub fn restore_known_identifiers(record: &mut Document, field_names: &[&str]) -> Result<()> {
    restore_fields(
        record,
        field_names,
        |field, raw| identifier::parse(field, raw).map(Value::Identifier),
        "an identifier",
    )
}

/// A typed document whose timestamp and identifier fields are known by name.
pub trait Record: DeserializeOwned {
    const TIMESTAMP_FIELDS: &'static [&'static str];
    const IDENTIFIER_FIELDS: &'static [&'static str] = &["_id"];
}

/// Parses a wire document into `T`. Known fields are checked first so that
/// a bad timestamp surfaces as [`Error::Format`] naming the field, and
/// anything else the record cannot accept as [`Error::Contract`].
///
/// # Errors
pub fn decode_record<T: Record>(payload: serde_json::Value) -> Result<T> {
    let Value::Document(mut doc) = Value::from(payload.clone()) else {
        return Err(Error::contract("<document>", &payload));
    };

    deserialize_known_fields(&mut doc, T::TIMESTAMP_FIELDS)?;
    restore_known_identifiers(&mut doc, T::IDENTIFIER_FIELDS)?;

    serde_json::from_value(serialize_document(&doc)).map_err(|err| Error::Contract {
        key: err.to_string(),
        payload: payload.to_string(),
    })
}

/// # Errors
/// See [`decode_record`]; a payload that is not an array is a contract error.
pub fn decode_records<T: Record>(payload: serde_json::Value) -> Result<Vec<T>> {
    let serde_json::Value::Array(items) = payload else {
        return Err(Error::contract("<array>", &payload));
    };

    items.into_iter().map(decode_record).collect()
}
