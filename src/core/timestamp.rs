//! Timestamp formatting for the `asctime` field
//!
//! Supports the classic `2025-01-08 10:30:45,123` layout, ISO 8601,
//! RFC 3339, Unix timestamps, and arbitrary strftime patterns.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};

/// Layout of the `asctime` field
///
/// # Examples
///
/// ```
/// use rust_log_router::TimestampFormat;
/// use chrono::Utc;
///
/// let format = TimestampFormat::Iso8601;
/// let timestamp = format.format(&Utc::now());
/// assert!(timestamp.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TimestampFormat {
    /// `2025-01-08 10:30:45,123`
    #[default]
    AscTime,

    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// RFC 3339 format: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    /// Resolve a formatter's `datefmt` setting.
    ///
    /// A handful of names select the built-in layouts; anything else is taken
    /// as a strftime pattern and checked up front so a typo fails at startup
    /// instead of on every record.
    pub fn from_datefmt(datefmt: &str) -> Result<Self, String> {
        let format = match datefmt.to_ascii_lowercase().as_str() {
            "asctime" => TimestampFormat::AscTime,
            "iso8601" => TimestampFormat::Iso8601,
            "iso8601_micros" => TimestampFormat::Iso8601Micros,
            "rfc3339" => TimestampFormat::Rfc3339,
            "unix" => TimestampFormat::Unix,
            "unix_millis" => TimestampFormat::UnixMillis,
            _ => {
                if StrftimeItems::new(datefmt).any(|item| matches!(item, Item::Error)) {
                    return Err(format!("invalid strftime pattern '{}'", datefmt));
                }
                TimestampFormat::Custom(datefmt.to_string())
            }
        };
        Ok(format)
    }

    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::AscTime => datetime.format("%Y-%m-%d %H:%M:%S,%3f").to_string(),
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }

    /// Value for structured (JSON) output: numbers stay numbers
    pub fn format_json(&self, datetime: &DateTime<Utc>) -> serde_json::Value {
        match self {
            TimestampFormat::Unix => serde_json::Value::from(datetime.timestamp()),
            TimestampFormat::UnixMillis => serde_json::Value::from(datetime.timestamp_millis()),
            _ => serde_json::Value::String(self.format(datetime)),
        }
    }
}
