//! # Record Formatters
//!
//! Two line formats are supported:
//!
//! - **Text**: `time=... level=INFO msg="request done" status=200`
//! - **JSON**: `{"time":"...","level":"INFO","msg":"request done","status":200}`
//!
//! Both write exactly one line per record. When the record carries a source
//! location it follows the level (`source=file:line` in text, an object with
//! `file` and `line` in JSON).
//!
//! Attributes named `time`, `level`, `source` or `msg` are written as
//! `attr.<key>` in both formats, so each line has exactly one of each
//! built-in key.

use std::io::{self, Write};

use serde_json::{Map, Value as JsonValue};

use crate::attr::{Attr, Value, flatten};
use crate::config::Format;
use crate::record::Record;

/// Serializes a record into its final line
pub trait Formatter: Send + Sync
{
    /// Append one formatted line to `buf`
    ///
    /// `attrs` are the handle's attributes; they come before the record's
    /// own attributes.
    ///
    /// ## Errors
    ///
    /// Returns an error if the line cannot be written into `buf`.
    fn format(&self, record: &Record, attrs: &[Attr], buf: &mut Vec<u8>) -> io::Result<()>;
}

/// Build the formatter for a resolved format
#[must_use]
pub fn formatter_for(format: Format) -> Box<dyn Formatter>
{
    match format {
        Format::Text => Box::new(TextFormatter),
        Format::Json => Box::new(JsonFormatter),
    }
}

/// Human-readable `key=value` line formatter
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter;

impl Formatter for TextFormatter
{
    fn format(&self, record: &Record, attrs: &[Attr], buf: &mut Vec<u8>) -> io::Result<()>
    {
        write!(buf, "time={} level={}", record.timestamp(), record.level)?;
        if let Some(source) = &record.source {
            buf.write_all(b" source=")?;
            write_text_value(buf, &format!("{}:{}", source.file, source.line))?;
        }
        buf.write_all(b" msg=")?;
        write_text_value(buf, &record.message)?;

        for (key, value) in flatten(attrs, &record.attrs) {
            buf.write_all(b" ")?;
            write_text_value(buf, &key)?;
            buf.write_all(b"=")?;
            match value {
                Value::Str(s) => write_text_value(buf, s)?,
                other => write!(buf, "{other}")?,
            }
        }
        buf.write_all(b"\n")
    }
}

fn needs_quoting(s: &str) -> bool
{
    s.is_empty() || s.chars().any(|c| c.is_whitespace() || c.is_control() || c == '=' || c == '"')
}

fn write_text_value(buf: &mut Vec<u8>, s: &str) -> io::Result<()>
{
    if needs_quoting(s) {
        write!(buf, "{s:?}")
    } else {
        buf.write_all(s.as_bytes())
    }
}

/// One JSON object per line
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl Formatter for JsonFormatter
{
    fn format(&self, record: &Record, attrs: &[Attr], buf: &mut Vec<u8>) -> io::Result<()>
    {
        let mut object = Map::new();
        object.insert("time".to_string(), JsonValue::String(record.timestamp()));
        object.insert("level".to_string(), JsonValue::String(record.level.to_string()));
        if let Some(source) = &record.source {
            object.insert(
                "source".to_string(),
                serde_json::json!({ "file": source.file, "line": source.line }),
            );
        }
        object.insert("msg".to_string(), JsonValue::String(record.message.clone()));

        for (key, value) in flatten(attrs, &record.attrs) {
            object.insert(key.into_owned(), value.clone().into());
        }

        serde_json::to_writer(&mut *buf, &object)?;
        buf.write_all(b"\n")
    }
}
