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

use datasync_json::Timestamp;
use serde_json::json;
use test_case::test_case;
type Result = std::result::Result<(), Box<dyn std::error::Error>>;

#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Helper {
    pub created_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
}

#[test]
fn access() {
    let ts = Timestamp::default();
    assert_eq!(ts.nanos(), 0);
    assert_eq!(ts.seconds(), 0);
}

#[test]
fn serialize_in_struct() -> Result {
    let input = Helper::default();
    let json = serde_json::to_value(input)?;
    assert_eq!(json, json!({}));

    let input = Helper {
        created_at: Some(Timestamp::from_unix_timestamp_nanos(12_345_678_900)?),
        ..Default::default()
    };
    let json = serde_json::to_value(input)?;
    assert_eq!(json, json!({ "createdAt": "1970-01-01T00:00:12.345Z" }));
    Ok(())
}

#[test]
fn deserialize_in_struct() -> Result {
    let input = json!({});
    let got = serde_json::from_value::<Helper>(input)?;
    assert_eq!(got, Helper::default());

    // The surrounding structure owns absent values, `null` is not passed
    // to the codec for `Option<Timestamp>` fields.
    let input = json!({ "createdAt": "1970-01-01T00:00:12.3456789Z", "deletedAt": null });
    let want = Helper {
        created_at: Some(Timestamp::from_unix_timestamp_nanos(12_345_678_900)?),
        deleted_at: None,
    };
    let got = serde_json::from_value::<Helper>(input)?;
    assert_eq!(got, want);
    Ok(())
}

#[test_case(json!({ "createdAt": "foo" }))]
#[test_case(json!({ "createdAt": 12 }))]
#[test_case(json!({ "createdAt": "1970-01-01T00:00:12" }))]
#[test_case(json!({ "createdAt": {} }))]
fn deserialize_in_struct_error(input: serde_json::Value) {
    let got = serde_json::from_value::<Helper>(input);
    assert!(got.is_err(), "{got:?}");
}

// Values with at most millisecond precision survive a roundtrip.
#[test_case("2021-08-21T12:30:15.123Z")]
#[test_case("2021-08-21T12:30:15.000Z")]
#[test_case("1900-01-01T00:00:00.001Z")]
#[test_case("2038-01-19T03:14:08.999Z")]
fn roundtrip(input: &str) -> Result {
    let json = serde_json::Value::String(input.to_string());
    let timestamp = serde_json::from_value::<Timestamp>(json)?;
    let roundtrip = serde_json::to_string(&timestamp)?;
    assert_eq!(format!("\"{input}\""), roundtrip);
    Ok(())
}

// Values with higher precision, or in other offsets, are normalized.
#[test_case("2021-08-21T12:30:15.1234567+00:00", "2021-08-21T12:30:15.123Z")]
#[test_case("2021-08-21T20:30:15.1234567+08:00", "2021-08-21T12:30:15.123Z")]
#[test_case("2021-08-21T12:30:15.9999999Z", "2021-08-21T12:30:15.999Z")]
#[test_case("2021-08-21T12:30:15+00:00", "2021-08-21T12:30:15.000Z")]
#[test_case("2021-08-20T23:59:59.5-12:00", "2021-08-21T11:59:59.500Z")]
fn normalize(input: &str, want: &str) -> Result {
    let timestamp = serde_json::from_value::<Timestamp>(json!(input))?;
    let got = serde_json::to_value(timestamp)?;
    assert_eq!(got, json!(want));
    Ok(())
}

#[test]
fn convert_time() -> Result {
    let ts = time::OffsetDateTime::from_unix_timestamp(123)?
        + time::Duration::nanoseconds(456_789_012);
    let got = Timestamp::try_from(ts)?;
    let want = Timestamp::from_unix_timestamp_nanos(123_456_789_012)?;
    assert_eq!(got, want);
    assert_eq!(time::OffsetDateTime::from(got), ts);
    Ok(())
}
