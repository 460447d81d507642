//! ISO-8601 timestamps as the remote service writes them: naive, second
//! precision, with an optional fractional part of up to six digits.

use chrono::{NaiveDateTime, Timelike, Utc};

use crate::error::{Error, Result};

const SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const WITH_FRACTION: &str = "%Y-%m-%dT%H:%M:%S.%f";

#[must_use]
pub fn format(timestamp: &NaiveDateTime) -> String {
    if timestamp.nanosecond() == 0 {
        timestamp.format(SECONDS_FORMAT).to_string()
    } else {
        timestamp.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

/// Parses `raw`, picking the fractional or whole-second format depending on
/// whether a decimal point is present. `field` only labels the error.
///
/// # Errors
/// [`Error::Format`] if `raw` matches neither format.
pub fn parse(field: &str, raw: &str) -> Result<NaiveDateTime> {
    let (seconds, fraction, expected) = match raw.split_once('.') {
        Some((seconds, fraction)) => (seconds, Some(fraction), WITH_FRACTION),
        None => (raw, None, SECONDS_FORMAT),
    };
    let err = || Error::format(field, raw, expected);

    let whole = NaiveDateTime::parse_from_str(seconds, SECONDS_FORMAT).map_err(|_| err())?;

    let Some(fraction) = fraction else {
        return Ok(whole);
    };

    if fraction.is_empty() || fraction.len() > 6 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err());
    }

    let micros: u32 = format!("{fraction:0<6}").parse().map_err(|_| err())?;

    whole.with_nanosecond(micros * 1_000).ok_or_else(err)
}

/// The current UTC time, truncated to what survives a trip over the wire.
#[must_use]
pub fn now() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    let micros = now.nanosecond() / 1_000;

    now.with_nanosecond(micros * 1_000).unwrap_or(now)
}

/// `#[serde(with = "timestamp::iso")]` for required fields.
pub mod iso {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;

        super::parse("timestamp", &raw).map_err(D::Error::custom)
    }
}

/// `#[serde(with = "timestamp::option")]` for `Option<NaiveDateTime>` fields.
pub mod option {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => serializer.serialize_some(&super::format(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;

        raw.map(|raw| super::parse("timestamp", &raw).map_err(D::Error::custom))
            .transpose()
    }
}
