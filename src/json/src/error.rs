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

/// Represent failures converting JSON tokens or strings to [Timestamp].
///
/// Null tokens are rejected like any other non-string token. Absent values
/// are the responsibility of the surrounding structure, for example, by
/// using `Option<Timestamp>` as the field type.
///
/// # Examples
/// ```
/// # use datasync_json::{FormatError, Timestamp, codec};
/// let ts = Timestamp::try_from("foo");
/// assert!(matches!(ts, Err(FormatError::Parse(_))));
///
/// let ts = codec::read(&serde_json::Value::Null);
/// assert!(matches!(ts, Err(FormatError::Null)));
///
/// let ts = Timestamp::try_from("10000-01-01T00:00:00Z");
/// assert!(ts.is_err());
/// ```
///
/// [Timestamp]: crate::Timestamp
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum FormatError {
    /// The JSON token was `null`.
    #[error("expected a string with an RFC 3339 timestamp, found null")]
    Null,

    /// The JSON token was not a string, the payload names the token kind.
    #[error("expected a string with an RFC 3339 timestamp, found {0}")]
    UnexpectedToken(&'static str),

    /// The string is not an RFC 3339 date-time with an explicit offset.
    #[error("cannot parse timestamp, source={0}")]
    Parse(#[source] BoxedError),

    /// The value is outside the supported range.
    #[error(
        "timestamp out of range, must be between 0001-01-01T00:00:00Z and 9999-12-31T23:59:59.999999999Z"
    )]
    OutOfRange,
}

pub(crate) type BoxedError = Box<dyn std::error::Error + Send + Sync>;
