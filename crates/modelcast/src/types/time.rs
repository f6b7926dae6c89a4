use std::fmt::Write;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use crate::error::{CastError, Result};
use crate::value::Value;

/// Timestamps read from and written back with a strftime-style format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeType {
    format: String,
}

impl TimeType {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Parse text with the format.
    ///
    /// Text without an offset is taken as UTC; date-only formats yield midnight.
    pub fn parse(&self, text: &str) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_str(text, &self.format)
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(text, &self.format)
                    .ok()
                    .map(|naive| naive.and_utc().fixed_offset())
            })
            .or_else(|| {
                NaiveDate::parse_from_str(text, &self.format)
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .map(|naive| naive.and_utc().fixed_offset())
            })
    }

    /// Render with the format, falling back to RFC 3339 if the format is unusable.
    pub fn render(&self, time: &DateTime<FixedOffset>) -> String {
        let mut out = String::new();
        if write!(out, "{}", time.format(&self.format)).is_err() {
            return time.to_rfc3339();
        }
        out
    }

    pub(super) fn cast(&self, raw: Value) -> Result<Value> {
        match &raw {
            Value::Time(_) => Ok(raw),
            Value::String(text) | Value::Symbol(text) => match self.parse(text) {
                Some(time) => Ok(Value::Time(time)),
                None => Err(CastError::invalid(&raw, format!("Time[{}]", self.format)).into()),
            },
            _ => Err(CastError::invalid(&raw, format!("Time[{}]", self.format)).into()),
        }
    }
}
