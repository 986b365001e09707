// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Convert timestamps to and from their JSON representation.
//!
//! Timestamps are written as `YYYY-MM-DDTHH:mm:ss.fffZ`. The value is first
//! converted to UTC, and then any digits beyond milliseconds are discarded.
//! The output never contains a numeric offset.
//!
//! Timestamps are read from JSON strings in
//! [RFC 3339](https://www.ietf.org/rfc/rfc3339.txt) format. The offset is
//! required, but it may be any valid offset, and the fractional seconds may
//! have any number of digits. Any other JSON token, including `null`, is
//! rejected.
//!
//! Applications rarely need to call these functions directly. Use [Timestamp]
//! as the field type, or annotate [OffsetDateTime] fields with
//! `#[serde_as(as = "TimestampCodec")]`.
//!
//! # Example
//! ```
//! # use datasync_json::codec;
//! use serde_json::json;
//! let ts = codec::read(&json!("2021-08-21T20:30:15.1234567+08:00"))?;
//! assert_eq!(codec::write(&ts), "2021-08-21T12:30:15.123Z");
//!
//! assert!(codec::read(&json!(null)).is_err());
//! assert!(codec::read(&json!("foo")).is_err());
//! # Ok::<(), datasync_json::FormatError>(())
//! ```

use crate::{FormatError, Timestamp};
use serde::de::Error as _;
use serde::ser::Error as _;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

const EXPECT_TIMESTAMP_FORMAT_SUCCEEDS: &str = concat!(
    "formatting a Timestamp should always succeed. ",
    "The Timestamp values are always in range, and we use a constant for the format specifier."
);

/// Formats `value` using the JSON wire format.
///
/// # Example
/// ```
/// # use datasync_json::{Timestamp, codec};
/// use time::macros::datetime;
/// let ts = Timestamp::new(datetime!(2021-08-21 20:30:15.1234567 +8))?;
/// assert_eq!(codec::write(&ts), "2021-08-21T12:30:15.123Z");
/// # Ok::<(), datasync_json::FormatError>(())
/// ```
pub fn write(value: &Timestamp) -> String {
    let utc = value.truncate_to_millis().to_utc();
    utc.format(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    ))
    .expect(EXPECT_TIMESTAMP_FORMAT_SUCCEEDS)
}

/// Parses a [Timestamp] from its string representation.
///
/// The result is always expressed in UTC, with the full precision of the
/// input.
pub fn parse(value: &str) -> Result<Timestamp, FormatError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| FormatError::Parse(e.into()))
        .and_then(Timestamp::new)
        .map(Timestamp::into_utc)
        .inspect_err(|e| tracing::debug!("rejecting timestamp {value:?}: {e}"))
}

/// Reads a [Timestamp] from a JSON token.
///
/// Only JSON strings are accepted, see [parse] for the string format.
pub fn read(token: &serde_json::Value) -> Result<Timestamp, FormatError> {
    use serde_json::Value;
    match token {
        Value::String(s) => parse(s),
        Value::Null => Err(FormatError::Null),
        Value::Bool(_) => Err(FormatError::UnexpectedToken("boolean")),
        Value::Number(_) => Err(FormatError::UnexpectedToken("number")),
        Value::Array(_) => Err(FormatError::UnexpectedToken("array")),
        Value::Object(_) => Err(FormatError::UnexpectedToken("object")),
    }
}

/// A [serde_with] adapter to use the timestamp wire format with other types.
///
/// # Example
/// ```
/// # use datasync_json::TimestampCodec;
/// use time::OffsetDateTime;
/// #[serde_with::serde_as]
/// #[derive(serde::Deserialize, serde::Serialize)]
/// #[serde(rename_all = "camelCase")]
/// struct TodoItem {
///     #[serde_as(as = "TimestampCodec")]
///     updated_at: OffsetDateTime,
///     #[serde_as(as = "Option<TimestampCodec>")]
///     #[serde(skip_serializing_if = "Option::is_none")]
///     deleted_at: Option<OffsetDateTime>,
/// }
///
/// let item: TodoItem = serde_json::from_str(r#"{"updatedAt":"2021-08-21T12:30:15.1234567Z"}"#)?;
/// assert!(item.deleted_at.is_none());
/// let json = serde_json::to_string(&item)?;
/// assert_eq!(json, r#"{"updatedAt":"2021-08-21T12:30:15.123Z"}"#);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct TimestampCodec;

impl serde_with::SerializeAs<OffsetDateTime> for TimestampCodec {
    fn serialize_as<S>(source: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        let ts = Timestamp::new(*source).map_err(S::Error::custom)?;
        serializer.serialize_str(&write(&ts))
    }
}

impl<'de> serde_with::DeserializeAs<'de, OffsetDateTime> for TimestampCodec {
    fn deserialize_as<D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        let ts = deserializer.deserialize_any(TimestampVisitor)?;
        Ok(ts.to_utc())
    }
}

#[cfg(feature = "chrono")]
impl serde_with::SerializeAs<chrono::DateTime<chrono::Utc>> for TimestampCodec {
    fn serialize_as<S>(
        source: &chrono::DateTime<chrono::Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        let ts = Timestamp::try_from(*source).map_err(S::Error::custom)?;
        serializer.serialize_str(&write(&ts))
    }
}

#[cfg(feature = "chrono")]
impl<'de> serde_with::DeserializeAs<'de, chrono::DateTime<chrono::Utc>> for TimestampCodec {
    fn deserialize_as<D>(deserializer: D) -> Result<chrono::DateTime<chrono::Utc>, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        let ts = deserializer.deserialize_any(TimestampVisitor)?;
        chrono::DateTime::try_from(ts).map_err(D::Error::custom)
    }
}

// Used with `deserialize_any()`, so all token kinds are reported as a
// `FormatError`, and not as a generic "invalid type" error.
pub(crate) struct TimestampVisitor;

impl<'de> serde::de::Visitor<'de> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a string with a timestamp in RFC 3339 format")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        parse(value).map_err(E::custom)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Err(E::custom(FormatError::Null))
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Err(E::custom(FormatError::Null))
    }

    fn visit_bool<E>(self, _value: bool) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Err(E::custom(FormatError::UnexpectedToken("boolean")))
    }

    fn visit_i64<E>(self, _value: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Err(E::custom(FormatError::UnexpectedToken("number")))
    }

    fn visit_u64<E>(self, _value: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Err(E::custom(FormatError::UnexpectedToken("number")))
    }

    fn visit_f64<E>(self, _value: f64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Err(E::custom(FormatError::UnexpectedToken("number")))
    }

    fn visit_seq<A>(self, _seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        Err(A::Error::custom(FormatError::UnexpectedToken("array")))
    }

    fn visit_map<A>(self, _map: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        Err(A::Error::custom(FormatError::UnexpectedToken("object")))
    }
}
