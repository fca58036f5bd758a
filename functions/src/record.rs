use chrono::NaiveDateTime;
use flate2::read::GzDecoder;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use std::io::prelude::*;

use crate::error::RelayError;

lazy_static! {
    static ref TIMESTAMP_REGEX: Regex =
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{6}Z$").unwrap();
}

const KEY_TIMESTAMP: &str = "timestamp";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// A single event as sent to the log backend.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub message: String,
}

/// One structured log record read from a stored object.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    fields: Map<String, Value>,
    timestamp: i64,
}

impl LogRecord {
    pub fn parse(text: &str) -> Result<Self, RelayError> {
        let fields = match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => return Err(RelayError::Parse("expected a JSON object".into())),
            Err(err) => return Err(RelayError::Parse(err.to_string())),
        };

        let timestamp = match fields.get(KEY_TIMESTAMP) {
            Some(Value::String(ts)) => parse_timestamp(ts)?,
            Some(other) => return Err(RelayError::TimestampFormat(other.to_string())),
            None => {
                return Err(RelayError::Parse(format!(
                    "missing `{}` field",
                    KEY_TIMESTAMP
                )))
            }
        };

        Ok(LogRecord { fields, timestamp })
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn to_event(&self) -> LogEvent {
        LogEvent {
            timestamp: self.timestamp,
            message: Value::Object(self.fields.clone()).to_string(),
        }
    }
}

/// Inflates a single-member gzip stream into UTF-8 text.
pub fn decompress(bytes: &[u8]) -> Result<String, RelayError> {
    let mut decoder = GzDecoder::new(bytes);
    let mut text = String::new();
    decoder
        .read_to_string(&mut text)
        .map_err(RelayError::Decode)?;
    Ok(text)
}

/// Converts `YYYY-MM-DDTHH:MM:SS.ffffffZ` into epoch milliseconds, dropping
/// the sub-millisecond digits.
pub fn parse_timestamp(value: &str) -> Result<i64, RelayError> {
    if !TIMESTAMP_REGEX.is_match(value) {
        return Err(RelayError::TimestampFormat(value.into()));
    }

    let datetime = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map_err(|_| RelayError::TimestampFormat(value.into()))?;

    Ok(datetime.and_utc().timestamp_millis())
}
