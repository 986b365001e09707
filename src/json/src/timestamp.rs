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

use crate::FormatError;
use crate::codec;
use time::{OffsetDateTime, UtcOffset};

type Error = FormatError;

/// A point in time, as stored in Datasync entities.
///
/// # Examples
/// ```
/// # use datasync_json::{FormatError, Timestamp};
/// let ts = Timestamp::try_from("2021-08-21T20:30:15.1234567+08:00")?;
/// assert_eq!(ts.seconds(), 1629549015);
/// assert_eq!(ts.nanos(), 123_456_700);
/// assert_eq!(String::from(ts), "2021-08-21T12:30:15.123Z");
/// # Ok::<(), FormatError>(())
/// ```
///
/// A Timestamp represents an instant on the UTC timeline at nanosecond
/// resolution. It also remembers the UTC offset used to create it, for
/// example, when converted from a [OffsetDateTime] in local time. The offset
/// does not participate in comparisons: two timestamps for the same instant
/// are equal, even if their offsets are different.
///
/// The range is from 0001-01-01T00:00:00Z to 9999-12-31T23:59:59.999999999Z,
/// measured on the UTC timeline.
///
/// # JSON Mapping
///
/// In JSON format, the Timestamp type is encoded as a string with the format
/// `YYYY-MM-DDTHH:mm:ss.fffZ`. The value is always converted to UTC, and the
/// fractional seconds are truncated (not rounded) to milliseconds. Any
/// [RFC 3339](https://www.ietf.org/rfc/rfc3339.txt) string with an explicit
/// offset is accepted when reading. See [codec] for details.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub struct Timestamp(OffsetDateTime);

impl Timestamp {
    const NANOS_PER_MILLI: u32 = 1_000_000;

    // Obtained via: `date +%s --date='0001-01-01T00:00:00Z'`
    /// The minimum value for [seconds()][Timestamp::seconds]. Corresponds to '0001-01-01T00:00:00Z'.
    pub const MIN_SECONDS: i64 = -62135596800;

    // Obtained via: `date +%s --date='9999-12-31T23:59:59Z'`
    /// The maximum value for [seconds()][Timestamp::seconds]. Corresponds to '9999-12-31T23:59:59Z'.
    pub const MAX_SECONDS: i64 = 253402300799;

    /// Creates a new [Timestamp] from a [OffsetDateTime].
    ///
    /// The offset of `value` is preserved, but only the instant matters
    /// for comparisons and for the JSON representation.
    ///
    /// # Examples
    /// ```
    /// # use datasync_json::{FormatError, Timestamp};
    /// use time::macros::datetime;
    /// let ts = Timestamp::new(datetime!(2021-08-21 20:30:15 +8))?;
    /// assert_eq!(ts, Timestamp::new(datetime!(2021-08-21 12:30:15 UTC))?);
    ///
    /// let ts = Timestamp::new(datetime!(0000-12-31 23:59:59 UTC));
    /// assert!(matches!(ts, Err(FormatError::OutOfRange)));
    /// # Ok::<(), FormatError>(())
    /// ```
    pub fn new(value: OffsetDateTime) -> Result<Self, Error> {
        if !(Self::MIN_SECONDS..=Self::MAX_SECONDS).contains(&value.unix_timestamp()) {
            return Err(Error::OutOfRange);
        }
        Ok(Self(value))
    }

    /// Creates a new [Timestamp] in UTC from the nanoseconds since the Unix epoch.
    ///
    /// # Examples
    /// ```
    /// # use datasync_json::{FormatError, Timestamp};
    /// let ts = Timestamp::from_unix_timestamp_nanos(1_629_549_015_123_456_700)?;
    /// assert_eq!(ts.to_string(), "2021-08-21T12:30:15.123Z");
    /// # Ok::<(), FormatError>(())
    /// ```
    pub fn from_unix_timestamp_nanos(nanos: i128) -> Result<Self, Error> {
        let odt = OffsetDateTime::from_unix_timestamp_nanos(nanos).map_err(|_| Error::OutOfRange)?;
        Self::new(odt)
    }

    /// The current time, in UTC.
    pub fn now_utc() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    /// Seconds since the Unix epoch (1970-01-01T00:00:00Z).
    ///
    /// # Examples
    /// ```
    /// # use datasync_json::{FormatError, Timestamp};
    /// let ts = Timestamp::try_from("1970-01-01T00:02:00.5Z")?;
    /// assert_eq!(ts.seconds(), 120);
    /// # Ok::<(), FormatError>(())
    /// ```
    pub fn seconds(&self) -> i64 {
        self.0.unix_timestamp()
    }

    /// Non-negative fractions of a second at nanosecond resolution.
    ///
    /// Timestamps before the Unix epoch still have non-negative nanos values
    /// that count forward in time.
    ///
    /// # Examples
    /// ```
    /// # use datasync_json::{FormatError, Timestamp};
    /// let ts = Timestamp::try_from("1970-01-01T00:02:00.5Z")?;
    /// assert_eq!(ts.nanos(), 500_000_000);
    /// # Ok::<(), FormatError>(())
    /// ```
    pub fn nanos(&self) -> i32 {
        self.0.nanosecond() as i32
    }

    /// The UTC offset used to create this timestamp.
    pub fn offset(&self) -> UtcOffset {
        self.0.offset()
    }

    /// Returns the instant as a [OffsetDateTime] in UTC.
    pub fn to_utc(&self) -> OffsetDateTime {
        // Cannot panic, the instant is in range and UTC keeps the same date.
        self.0.to_offset(UtcOffset::UTC)
    }

    /// Returns the same instant, expressed in UTC.
    pub fn into_utc(self) -> Self {
        Self(self.to_utc())
    }

    /// Returns the same instant, expressed in a different offset.
    ///
    /// Fails if the local date for `offset` is past year 9999.
    ///
    /// # Examples
    /// ```
    /// # use datasync_json::{FormatError, Timestamp};
    /// use time::macros::offset;
    /// let ts = Timestamp::try_from("2021-08-21T12:30:15Z")?;
    /// let local = ts.with_offset(offset!(+8))?;
    /// assert_eq!(local, ts);
    /// assert_eq!(local.offset(), offset!(+8));
    ///
    /// let ts = Timestamp::try_from("9999-12-31T23:00:00Z")?;
    /// assert!(ts.with_offset(offset!(+2)).is_err());
    /// # Ok::<(), FormatError>(())
    /// ```
    pub fn with_offset(self, offset: UtcOffset) -> Result<Self, Error> {
        let local = self.seconds() + offset.whole_seconds() as i64;
        if local > Self::MAX_SECONDS {
            return Err(Error::OutOfRange);
        }
        Ok(Self(self.0.to_offset(offset)))
    }

    /// Discards any sub-millisecond digits, rounding toward the past.
    ///
    /// # Examples
    /// ```
    /// # use datasync_json::{FormatError, Timestamp};
    /// let ts = Timestamp::try_from("2021-08-21T12:30:15.1239Z")?;
    /// assert_eq!(ts.truncate_to_millis().nanos(), 123_000_000);
    /// # Ok::<(), FormatError>(())
    /// ```
    pub fn truncate_to_millis(self) -> Self {
        let excess = self.0.nanosecond() % Self::NANOS_PER_MILLI;
        Self(self.0 - time::Duration::nanoseconds(excess as i64))
    }
}

/// The Unix epoch, 1970-01-01T00:00:00Z.
impl Default for Timestamp {
    fn default() -> Self {
        Self(OffsetDateTime::UNIX_EPOCH)
    }
}

/// Uses the JSON wire format, see [codec::write].
impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&codec::write(self))
    }
}

/// Parses a timestamp, see [codec::parse].
impl std::str::FromStr for Timestamp {
    type Err = FormatError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        codec::parse(s)
    }
}

/// Implement [`serde`](::serde) serialization for timestamps.
impl serde::ser::Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&codec::write(self))
    }
}

/// Implement [`serde`](::serde) deserialization for timestamps.
///
/// Any JSON token is accepted by the deserializer, so `null`, numbers, and
/// other non-string tokens are reported as a [FormatError].
impl<'de> serde::de::Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(codec::TimestampVisitor)
    }
}

/// Convert from [OffsetDateTime] to [Timestamp].
///
/// This conversion may fail if the [OffsetDateTime] value is out of range.
///
/// # Examples
/// ```
/// # use datasync_json::Timestamp;
/// use time::macros::datetime;
/// let ts = Timestamp::try_from(datetime!(2025-05-16 09:46:12 UTC))?;
/// assert_eq!(String::from(ts), "2025-05-16T09:46:12.000Z");
/// # Ok::<(), anyhow::Error>(())
/// ```
impl TryFrom<OffsetDateTime> for Timestamp {
    type Error = FormatError;
    fn try_from(value: OffsetDateTime) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Convert from [Timestamp] to [OffsetDateTime], preserving the offset.
impl From<Timestamp> for OffsetDateTime {
    fn from(value: Timestamp) -> Self {
        value.0
    }
}

/// Converts a [Timestamp] to its JSON wire representation.
///
/// # Example
/// ```
/// # use datasync_json::Timestamp;
/// let ts = Timestamp::from_unix_timestamp_nanos(1_747_388_772_500_000_000)?;
/// assert_eq!(String::from(ts), "2025-05-16T09:46:12.500Z");
/// # Ok::<(), anyhow::Error>(())
/// ```
impl From<Timestamp> for String {
    fn from(timestamp: Timestamp) -> Self {
        codec::write(&timestamp)
    }
}

/// Converts the string representation of a timestamp to [Timestamp].
///
/// # Example
/// ```
/// # use datasync_json::Timestamp;
/// let ts = Timestamp::try_from("2025-05-16T09:46:12.500Z")?;
/// assert_eq!(ts.seconds(), 1747388772);
/// assert_eq!(ts.nanos(), 500_000_000);
/// # Ok::<(), anyhow::Error>(())
/// ```
impl TryFrom<&str> for Timestamp {
    type Error = FormatError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        codec::parse(value)
    }
}

impl TryFrom<&String> for Timestamp {
    type Error = FormatError;
    fn try_from(value: &String) -> Result<Self, Self::Error> {
        codec::parse(value.as_str())
    }
}

#[cfg(feature = "chrono")]
mod chrono_conversions {
    use super::{Error, Timestamp};
    use chrono::{DateTime, FixedOffset, Utc};
    use time::UtcOffset;

    /// Converts from [chrono::DateTime] to [Timestamp].
    ///
    /// This conversion may fail if the [chrono::DateTime] value is out of range.
    ///
    /// # Example
    /// ```
    /// # use datasync_json::Timestamp;
    /// use chrono::{DateTime, TimeZone, Utc};
    /// let date: DateTime<Utc> = Utc.with_ymd_and_hms(2025, 5, 16, 10, 15, 00).unwrap();
    /// let ts = Timestamp::try_from(date)?;
    /// assert_eq!(String::from(ts), "2025-05-16T10:15:00.000Z");
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    impl TryFrom<DateTime<Utc>> for Timestamp {
        type Error = Error;
        fn try_from(value: DateTime<Utc>) -> Result<Self, Self::Error> {
            let nanos = value.timestamp() as i128 * 1_000_000_000
                + value.timestamp_subsec_nanos() as i128;
            Timestamp::from_unix_timestamp_nanos(nanos)
        }
    }

    /// Converts from a [chrono::DateTime] with a fixed offset, preserving the offset.
    impl TryFrom<DateTime<FixedOffset>> for Timestamp {
        type Error = Error;
        fn try_from(value: DateTime<FixedOffset>) -> Result<Self, Self::Error> {
            let offset = UtcOffset::from_whole_seconds(value.offset().local_minus_utc())
                .map_err(|_| Error::OutOfRange)?;
            Timestamp::try_from(value.with_timezone(&Utc))?.with_offset(offset)
        }
    }

    /// Converts from [Timestamp] to [chrono::DateTime] in UTC.
    ///
    /// # Example
    /// ```
    /// # use datasync_json::Timestamp;
    /// use chrono::{DateTime, Utc};
    /// let ts = Timestamp::try_from("2025-05-16T10:15:00+02:00")?;
    /// let date = DateTime::<Utc>::try_from(ts)?;
    /// assert_eq!(date.timestamp(), ts.seconds());
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    impl TryFrom<Timestamp> for DateTime<Utc> {
        type Error = Error;
        fn try_from(value: Timestamp) -> Result<Self, Self::Error> {
            DateTime::from_timestamp(value.seconds(), value.nanos() as u32)
                .ok_or(Error::OutOfRange)
        }
    }

    /// Converts from [Timestamp] to [chrono::DateTime], preserving the offset.
    impl TryFrom<Timestamp> for DateTime<FixedOffset> {
        type Error = Error;
        fn try_from(value: Timestamp) -> Result<Self, Self::Error> {
            let offset = FixedOffset::east_opt(value.offset().whole_seconds())
                .ok_or(Error::OutOfRange)?;
            Ok(DateTime::<Utc>::try_from(value)?.with_timezone(&offset))
        }
    }
}
