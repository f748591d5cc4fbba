//! # Log Records
//!
//! A record is one emitted log line before formatting.

use std::panic::Location;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::attr::Attr;
use crate::config::Level;

/// Call-site source location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source
{
    /// Source file path as recorded by the compiler
    pub file: String,
    /// Line number
    pub line: u32,
}

impl From<&Location<'_>> for Source
{
    fn from(location: &Location<'_>) -> Self
    {
        Self {
            file: location.file().to_string(),
            line: location.line(),
        }
    }
}

/// A single log record
#[derive(Debug, Clone)]
pub struct Record
{
    /// Time the record was created
    pub time: DateTime<Utc>,
    /// Severity
    pub level: Level,
    /// Log message
    pub message: String,
    /// Source location, present only when the handle annotates sources
    pub source: Option<Source>,
    /// Attributes given with this record only
    pub attrs: Vec<Attr>,
}

impl Record
{
    /// Create a new record stamped with the current time
    pub fn new(level: Level, message: impl Into<String>) -> Self
    {
        Self {
            time: Utc::now(),
            level,
            message: message.into(),
            source: None,
            attrs: Vec::new(),
        }
    }

    /// Set the source location
    #[must_use]
    pub fn with_source(mut self, source: Option<Source>) -> Self
    {
        self.source = source;
        self
    }

    /// Set the record attributes
    #[must_use]
    pub fn with_attrs(mut self, attrs: Vec<Attr>) -> Self
    {
        self.attrs = attrs;
        self
    }

    /// RFC 3339 timestamp with millisecond precision
    #[must_use]
    pub fn timestamp(&self) -> String
    {
        self.time.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[cfg(test)]
mod tests
{
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_record_timestamp_is_utc_millis()
    {
        let mut record = Record::new(Level::Info, "hello");
        record.time = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();

        assert_eq!(record.timestamp(), "2024-05-01T12:30:00.000Z");
    }

    #[test]
    fn test_source_from_location()
    {
        let source = Source::from(Location::caller());
        assert!(source.file.ends_with("record.rs"));
        assert!(source.line > 0);
    }
}
