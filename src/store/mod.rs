//! Ingestion boundary for documents read from the backend.
//!
//! This is the only place that looks at the shape of a timestamp value.
//! Everything past here works on [`RawTimestamp`] variants.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::cmp::Reverse;
use std::fs;
use std::path::Path;

use crate::error::DocumentError;
use crate::time::{DateSource, RawTimestamp};

// 0001-01-01T00:00:00Z and 9999-12-31T23:59:59Z
const MIN_SECONDS: i64 = -62_135_596_800;
const MAX_SECONDS: i64 = 253_402_300_799;
const MAX_NANOS: u32 = 999_999_999;

/// The backend's own timestamp: whole seconds plus nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentTimestamp {
    seconds: i64,
    nanoseconds: u32,
    date: DateTime<Utc>,
}

impl DocumentTimestamp {
    pub fn new(seconds: i64, nanoseconds: u32) -> Option<Self> {
        if !(MIN_SECONDS..=MAX_SECONDS).contains(&seconds) || nanoseconds > MAX_NANOS {
            return None;
        }
        // conversion drops everything below a millisecond
        let millis = seconds * 1000 + i64::from(nanoseconds / 1_000_000);
        let date = DateTime::from_timestamp_millis(millis)?;
        Some(Self {
            seconds,
            nanoseconds,
            date,
        })
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn nanoseconds(&self) -> u32 {
        self.nanoseconds
    }
}

impl DateSource for DocumentTimestamp {
    fn to_date(&self) -> DateTime<Utc> {
        self.date
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn document_timestamp(map: &Map<String, Value>) -> Option<DocumentTimestamp> {
    let seconds = map.get("seconds").or_else(|| map.get("_seconds"))?.as_i64()?;
    let nanos = map
        .get("nanoseconds")
        .or_else(|| map.get("_nanoseconds"))?
        .as_u64()?;
    DocumentTimestamp::new(seconds, u32::try_from(nanos).ok()?)
}

fn from_object(map: &Map<String, Value>) -> RawTimestamp {
    if let Some(ts) = document_timestamp(map) {
        return RawTimestamp::convertible(ts);
    }

    let Some(Value::Number(seconds)) = map.get("seconds") else {
        return RawTimestamp::Unrecognized;
    };

    if let Some(seconds) = seconds.as_i64() {
        return RawTimestamp::EpochSeconds { seconds };
    }

    // fractional seconds land on the truncated millisecond
    seconds
        .as_f64()
        .filter(|s| s.is_finite())
        .and_then(|s| DateTime::from_timestamp_millis((s * 1000.0).trunc() as i64))
        .map(RawTimestamp::Native)
        .unwrap_or(RawTimestamp::Unrecognized)
}

/// Pick the [`RawTimestamp`] variant for a JSON value read from a document.
pub fn raw_from_value(value: &Value) -> RawTimestamp {
    if is_falsy(value) {
        return RawTimestamp::Missing;
    }

    let raw = match value {
        Value::Object(map) => from_object(map),
        _ => RawTimestamp::Unrecognized,
    };

    if raw.is_unrecognized() {
        debug!("Unrecognized timestamp shape: {}", value);
    }
    raw
}

fn deserialize_raw<'de, D>(deserializer: D) -> Result<RawTimestamp, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(raw_from_value(&value))
}

/// One row of the chat list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPreview {
    pub id: String,
    pub peer: String,
    #[serde(default)]
    pub last_message: String,
    #[serde(default, deserialize_with = "deserialize_raw")]
    pub sent_at: RawTimestamp,
}

pub fn parse_chats(json: &str) -> Result<Vec<ChatPreview>, DocumentError> {
    let chats: Vec<ChatPreview> = serde_json::from_str(json)?;
    for chat in chats.iter().filter(|c| c.sent_at.to_instant().is_none()) {
        warn!("Chat {} has no usable timestamp", chat.id);
    }
    Ok(chats)
}

pub fn load_chats(path: &Path) -> Result<Vec<ChatPreview>, DocumentError> {
    let content = fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_chats(&content)
}

/// Newest first; rows without a timestamp go last in their original order.
pub fn sort_newest_first(chats: &mut [ChatPreview]) {
    chats.sort_by_cached_key(|chat| Reverse(chat.sent_at.to_instant()));
}
