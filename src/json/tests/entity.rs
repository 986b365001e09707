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
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
type Result = anyhow::Result<()>;

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub updated_at: Timestamp,
}

fn timestamp(input: &str) -> anyhow::Result<Timestamp> {
    let odt = OffsetDateTime::parse(input, &Rfc3339)?;
    Ok(Timestamp::new(odt)?)
}

#[test]
fn reads_json() -> Result {
    let json = r#"{"updatedAt":"2021-08-21T12:30:15.123+00:00"}"#;
    let want = timestamp("2021-08-21T12:30:15.123+00:00")?;

    let entity = serde_json::from_str::<Entity>(json)?;
    assert_eq!(entity.updated_at, want);
    assert_eq!(entity.updated_at.seconds(), want.seconds());
    assert_eq!(entity.updated_at.nanos(), want.nanos());
    Ok(())
}

#[test]
fn writes_json() -> Result {
    let json = r#"{"updatedAt":"2021-08-21T12:30:15.123Z"}"#;
    let entity = Entity {
        updated_at: timestamp("2021-08-21T12:30:15.1234567+00:00")?,
    };
    let got = serde_json::to_string(&entity)?;
    assert_eq!(got, json);
    Ok(())
}

#[test]
fn writes_json_with_time_zone() -> Result {
    let json = r#"{"updatedAt":"2021-08-21T12:30:15.123Z"}"#;
    let entity = Entity {
        updated_at: timestamp("2021-08-21T20:30:15.1234567+08:00")?,
    };
    let got = serde_json::to_string(&entity)?;
    assert_eq!(got, json);
    Ok(())
}

#[test]
fn bad_date_in_input() {
    let json = r#"{"updatedAt":"foo"}"#;
    let got = serde_json::from_str::<Entity>(json);
    let err = got.unwrap_err();
    assert!(err.is_data(), "{err:?}");
    assert!(err.to_string().contains("cannot parse timestamp"), "{err}");
}

#[test]
fn null_date_in_input() {
    let json = r#"{"updatedAt":null}"#;
    let got = serde_json::from_str::<Entity>(json);
    let err = got.unwrap_err();
    assert!(err.is_data(), "{err:?}");
    assert!(err.to_string().contains("found null"), "{err}");
}

#[test]
fn numeric_date_in_input() {
    let json = r#"{"updatedAt":1629549015123}"#;
    let got = serde_json::from_str::<Entity>(json);
    let err = got.unwrap_err();
    assert!(err.to_string().contains("found number"), "{err}");
}

#[test]
fn missing_date_in_input() {
    let got = serde_json::from_str::<Entity>("{}");
    let err = got.unwrap_err();
    assert!(err.to_string().contains("updatedAt"), "{err}");
}

#[test]
fn roundtrip() -> Result {
    let entity = Entity {
        updated_at: timestamp("2021-08-21T12:30:15.123Z")?,
    };
    let json = serde_json::to_string(&entity)?;
    let got = serde_json::from_str::<Entity>(&json)?;
    assert_eq!(got, entity);
    Ok(())
}

#[test]
fn concurrent_use() -> Result {
    let input = timestamp("2021-08-21T20:30:15.1234567+08:00")?;
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(move || {
                    let entity = Entity { updated_at: input };
                    let json = serde_json::to_string(&entity)?;
                    serde_json::from_str::<Entity>(&json)
                })
            })
            .collect();
        for h in handles {
            let got = h.join().expect("thread should not panic")?;
            assert_eq!(got.updated_at, input.truncate_to_millis());
        }
        Ok(())
    })
}
