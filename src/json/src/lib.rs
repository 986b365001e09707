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

//! JSON serialization support for Datasync entities.
//!
//! Datasync services and clients exchange entities as JSON documents. Most
//! fields use the default [serde] encoding, but timestamps need a fixed wire
//! format so both sides agree on the value, regardless of the time zone or
//! precision used by each side:
//!
//! ```text
//! YYYY-MM-DDTHH:mm:ss.fffZ
//! ```
//!
//! That is, timestamps are always written in UTC, with a literal `Z` suffix,
//! and exactly three fractional digits. Sub-millisecond digits are truncated.
//! When reading, any RFC 3339 date-time with an explicit offset is accepted.
//!
//! There are two ways to use the codec:
//!
//! * Use [Timestamp] as the field type. It implements [serde::Serialize] and
//!   [serde::Deserialize] with the wire format above.
//! * Keep [time::OffsetDateTime] (or `chrono::DateTime<Utc>` with the `chrono`
//!   feature) as the field type, and annotate the field with
//!   `#[serde_as(as = "TimestampCodec")]`.
//!
//! # Example
//! ```
//! # use datasync_json::Timestamp;
//! #[derive(serde::Deserialize, serde::Serialize)]
//! #[serde(rename_all = "camelCase")]
//! struct TodoItem {
//!     id: String,
//!     updated_at: Timestamp,
//! }
//!
//! let item: TodoItem =
//!     serde_json::from_str(r#"{"id":"a","updatedAt":"2021-08-21T20:30:15.1234567+08:00"}"#)?;
//! let json = serde_json::to_string(&item)?;
//! assert_eq!(json, r#"{"id":"a","updatedAt":"2021-08-21T12:30:15.123Z"}"#);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod codec;
pub use crate::codec::TimestampCodec;
mod error;
pub use crate::error::*;
mod timestamp;
pub use crate::timestamp::*;
