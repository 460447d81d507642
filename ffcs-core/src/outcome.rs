//! Stable, named wrappers over the write acknowledgements the remote service
//! sends back. Every endpoint that writes answers in one of a handful of
//! shapes; each shape is named here and adapted to one of two outcome types.

use bson::oid::ObjectId;
use serde::Serialize;
use serde_json::{Map, Value as Json};

use crate::{
    error::{Error, Result},
    identifier, normalize,
    value::Value,
};

/// How an insert acknowledgement is laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertShape {
    /// `{"acknowledged": true, "inserted_id": "..."}`
    Acknowledged,
    /// `{"result": {"ok": 1.0, "_id": "..."}}`
    NestedResult,
    /// `{"status": "success", "inserted_id": "..."}`
    Status,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertOutcome {
    pub acknowledged: bool,
    #[serde(with = "identifier::hex")]
    pub inserted_id: ObjectId,
}

fn object<'a>(payload: &'a Json, key: &str) -> Result<&'a Map<String, Json>> {
    payload.as_object().ok_or_else(|| Error::contract(key, payload))
}

fn required<'a>(map: &'a Map<String, Json>, key: &str, payload: &Json) -> Result<&'a Json> {
    map.get(key).ok_or_else(|| Error::contract(key, payload))
}

fn nested<'a>(payload: &'a Json, key: &str) -> Result<&'a Json> {
    required(object(payload, key)?, key, payload)
}

fn identifier_at(map: &Map<String, Json>, key: &str, payload: &Json) -> Result<ObjectId> {
    match required(map, key, payload)? {
        Json::String(raw) => identifier::parse(key, raw),
        other => Err(Error::format(key, &other.to_string(), "an identifier")),
    }
}

fn ok_at(map: &Map<String, Json>, payload: &Json) -> Result<f64> {
    let value = required(map, "ok", payload)?;

    value
        .as_f64()
        .ok_or_else(|| Error::format("ok", &value.to_string(), "a number"))
}

fn bool_at(map: &Map<String, Json>, key: &str, payload: &Json) -> Result<bool> {
    let value = required(map, key, payload)?;

    value
        .as_bool()
        .ok_or_else(|| Error::format(key, &value.to_string(), "a boolean"))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::float_cmp)]
fn count_at(map: &Map<String, Json>, key: &str, payload: &Json) -> Result<u64> {
    let value = required(map, key, payload)?;

    // Counts sometimes come back as floats
    value
        .as_u64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                .map(|f| f as u64)
        })
        .ok_or_else(|| Error::format(key, &value.to_string(), "a non-negative count"))
}

impl InsertOutcome {
    /// # Errors
    /// [`Error::Contract`] when a key the shape requires is missing and
    /// [`Error::Format`] when it holds the wrong kind of value.
    pub fn from_payload(payload: &Json, shape: InsertShape) -> Result<Self> {
        match shape {
            InsertShape::Acknowledged => {
                let map = object(payload, "acknowledged")?;

                Ok(Self {
                    acknowledged: bool_at(map, "acknowledged", payload)?,
                    inserted_id: identifier_at(map, "inserted_id", payload)?,
                })
            }
            InsertShape::NestedResult => {
                let result = nested(payload, "result")?;
                let map = object(result, "result")?;
                let ok = required(map, "ok", payload)?;

                Ok(Self {
                    acknowledged: ok.as_f64() == Some(1.0),
                    inserted_id: identifier_at(map, "_id", payload)?,
                })
            }
            InsertShape::Status => {
                let map = object(payload, "status")?;
                let status = required(map, "status", payload)?;

                Ok(Self {
                    acknowledged: status.as_str() == Some("success"),
                    inserted_id: identifier_at(map, "inserted_id", payload)?,
                })
            }
        }
    }
}

/// How an update acknowledgement is laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateShape {
    /// `{"matched_count", "modified_count", "upserted_id", "raw_result"}`
    Counts,
    /// `{"nModified", "ok", "n"}`
    Legacy,
    /// `{"result": {"nModified", "ok", "n"}}`
    NestedLegacy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
    #[serde(with = "identifier::hex_option")]
    pub upserted_id: Option<ObjectId>,
    pub raw: Value,
}

/// The three-key acknowledgement older callers expect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyUpdate {
    #[serde(rename = "nModified")]
    pub n_modified: u64,
    pub ok: f64,
    pub n: u64,
}

impl UpdateOutcome {
    /// # Errors
    /// [`Error::Contract`] when a key the shape requires is missing and
    /// [`Error::Format`] when it holds the wrong kind of value.
    pub fn from_payload(payload: &Json, shape: UpdateShape) -> Result<Self> {
        match shape {
            UpdateShape::Counts => {
                let map = object(payload, "matched_count")?;
                let upserted_id = match map.get("upserted_id") {
                    None | Some(Json::Null) => None,
                    Some(_) => Some(identifier_at(map, "upserted_id", payload)?),
                };

                Ok(Self {
                    matched_count: count_at(map, "matched_count", payload)?,
                    modified_count: count_at(map, "modified_count", payload)?,
                    upserted_id,
                    raw: Value::from(required(map, "raw_result", payload)?.clone()),
                })
            }
            UpdateShape::Legacy => Self::from_legacy(payload, payload),
            UpdateShape::NestedLegacy => Self::from_legacy(nested(payload, "result")?, payload),
        }
    }

    fn from_legacy(body: &Json, payload: &Json) -> Result<Self> {
        let map = object(body, "nModified")?;
        ok_at(map, payload)?;

        Ok(Self {
            matched_count: count_at(map, "n", payload)?,
            modified_count: count_at(map, "nModified", payload)?,
            upserted_id: None,
            raw: Value::from(body.clone()),
        })
    }

    /// The acknowledgement in its three-key form, with `ok` taken from the
    /// raw reply.
    ///
    /// # Errors
    /// [`Error::Contract`] if the raw reply carries no numeric `ok`.
    pub fn to_legacy(&self) -> Result<LegacyUpdate> {
        let ok = match self.raw.get("ok") {
            Some(Value::Number(n)) => n.as_f64(),
            _ => None,
        }
        .ok_or_else(|| Error::contract("ok", &normalize::serialize(&self.raw)))?;

        Ok(LegacyUpdate {
            n_modified: self.modified_count,
            ok,
            n: self.matched_count,
        })
    }
}
