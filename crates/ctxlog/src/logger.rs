//! # Logger Handle
//!
//! [`Logger`] is the handle records are emitted through. It bundles a
//! destination writer, a minimum level, a formatter and a list of
//! attributes included in every record.
//!
//! Handles are cheap to clone and never change after construction.
//! [`Logger::with`] returns a new handle that shares the writer, formatter
//! and level of its parent and carries a longer attribute list.
//!
//! ## Example
//!
//! ```rust
//! use ctxlog::{Attr, Config, Logger};
//!
//! let logger = Logger::new(&Config::default().with_format("text"));
//! let logger = logger.with([Attr::new("service", "billing")]);
//! logger.info("started", &[Attr::new("port", 8080)]);
//! ```

use std::fmt;
use std::io::{self, Write};
use std::panic::Location;
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::attr::Attr;
use crate::config::{Config, Format, Level, Output};
use crate::format::{Formatter, formatter_for};
use crate::record::{Record, Source};

/// Process-wide fallback handle, built from [`Config::default`] on first use
static DEFAULT_LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new(&Config::default()));

/// The process-wide default handle
///
/// Every call returns a clone of the same handle.
#[must_use]
pub fn default_logger() -> Logger
{
    DEFAULT_LOGGER.clone()
}

/// Parts shared by a handle and everything derived from it
struct Handler
{
    level: Level,
    add_source: bool,
    format: Format,
    formatter: Box<dyn Formatter>,
    writer: BoxMakeWriter,
}

/// Structured logger handle
#[derive(Clone)]
pub struct Logger
{
    handler: Arc<Handler>,
    attrs: Arc<[Attr]>,
}

impl Logger
{
    /// Build a logger from its configuration
    ///
    /// Never fails: unrecognized settings resolve to their defaults. At
    /// [`Level::Debug`] every record is annotated with its call site.
    #[must_use]
    pub fn new(config: &Config) -> Self
    {
        match config.output() {
            Output::Stdout => Self::with_writer(config, io::stdout),
            Output::Stderr => Self::with_writer(config, io::stderr),
        }
    }

    /// Build a logger that writes to `writer` instead of the configured stream
    ///
    /// The `output` setting is ignored; level and format resolve as in
    /// [`Logger::new`].
    #[must_use]
    pub fn with_writer<W>(config: &Config, writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let level = config.level();
        let format = config.format();

        Self {
            handler: Arc::new(Handler {
                level,
                add_source: level == Level::Debug,
                format,
                formatter: formatter_for(format),
                writer: BoxMakeWriter::new(writer),
            }),
            attrs: Arc::from(Vec::new()),
        }
    }

    /// Minimum level this handle emits
    #[must_use]
    pub fn level(&self) -> Level
    {
        self.handler.level
    }

    /// Record format of this handle
    #[must_use]
    pub fn format(&self) -> Format
    {
        self.handler.format
    }

    /// Whether records carry their source location
    #[must_use]
    pub fn adds_source(&self) -> bool
    {
        self.handler.add_source
    }

    /// Whether a record at `level` would be written
    #[must_use]
    pub fn enabled(&self, level: Level) -> bool
    {
        level >= self.handler.level
    }

    /// Attributes included in every record of this handle
    #[must_use]
    pub fn attrs(&self) -> &[Attr]
    {
        &self.attrs
    }

    /// Derive a handle with additional attributes
    ///
    /// The new attributes follow the existing ones. `self` is unchanged.
    #[must_use]
    pub fn with<I>(&self, attrs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Attr>,
    {
        let mut extended = self.attrs.to_vec();
        extended.extend(attrs.into_iter().map(Into::into));

        Self {
            handler: Arc::clone(&self.handler),
            attrs: Arc::from(extended),
        }
    }

    /// Whether two handles are the same instance
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool
    {
        Arc::ptr_eq(&a.handler, &b.handler) && Arc::ptr_eq(&a.attrs, &b.attrs)
    }

    /// Emit a record at `level`
    #[track_caller]
    pub fn log(&self, level: Level, message: impl Into<String>, attrs: &[Attr])
    {
        if !self.enabled(level) {
            return;
        }

        let caller = Location::caller();
        let source = self.handler.add_source.then(|| Source::from(caller));
        self.emit(&Record::new(level, message).with_source(source).with_attrs(attrs.to_vec()));
    }

    /// Emit at debug level
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>, attrs: &[Attr])
    {
        self.log(Level::Debug, message, attrs);
    }

    /// Emit at info level
    #[track_caller]
    pub fn info(&self, message: impl Into<String>, attrs: &[Attr])
    {
        self.log(Level::Info, message, attrs);
    }

    /// Emit at warn level
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>, attrs: &[Attr])
    {
        self.log(Level::Warn, message, attrs);
    }

    /// Emit at error level
    #[track_caller]
    pub fn error(&self, message: impl Into<String>, attrs: &[Attr])
    {
        self.log(Level::Error, message, attrs);
    }

    /// Format and write a prepared record
    ///
    /// Records below the handle's level are dropped. The source location is
    /// stripped unless the handle annotates sources. Write errors are
    /// ignored.
    pub fn emit(&self, record: &Record)
    {
        if !self.enabled(record.level) {
            return;
        }

        let mut buf = Vec::with_capacity(256);
        let formatted = if self.handler.add_source || record.source.is_none() {
            self.handler.formatter.format(record, &self.attrs, &mut buf)
        } else {
            let stripped = record.clone().with_source(None);
            self.handler.formatter.format(&stripped, &self.attrs, &mut buf)
        };

        if formatted.is_ok() {
            // One write per record keeps concurrent lines whole
            let _ = self.handler.writer.make_writer().write_all(&buf);
        }
    }
}

impl Default for Logger
{
    fn default() -> Self
    {
        default_logger()
    }
}

impl fmt::Debug for Logger
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("Logger")
            .field("level", &self.handler.level)
            .field("format", &self.handler.format)
            .field("add_source", &self.handler.add_source)
            .field("attrs", &self.attrs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::writer::MemoryWriter;

    #[test]
    fn test_new_resolves_config()
    {
        let logger = Logger::new(&Config::default());
        assert_eq!(logger.level(), Level::Info);
        assert_eq!(logger.format(), Format::Json);
        assert!(!logger.adds_source());

        let logger = Logger::new(&Config::default().with_level("Debug").with_format("TEXT").with_output("stderr"));
        assert_eq!(logger.level(), Level::Debug);
        assert_eq!(logger.format(), Format::Text);
        assert!(logger.adds_source());
    }

    #[test]
    fn test_level_filtering()
    {
        let capture = MemoryWriter::new();
        let logger = Logger::with_writer(&Config::default().with_level("warn"), capture.clone());

        logger.debug("d", &[]);
        logger.info("i", &[]);
        logger.warn("w", &[]);
        logger.error("e", &[]);

        let out = capture.contents();
        assert_eq!(out.lines().count(), 2);
        assert!(out.contains("\"msg\":\"w\""));
        assert!(out.contains("\"msg\":\"e\""));
    }

    #[test]
    fn test_debug_adds_call_site()
    {
        let capture = MemoryWriter::new();
        let logger = Logger::with_writer(&Config::default().with_level("debug").with_format("text"), capture.clone());

        logger.debug("here", &[]);

        let line = line!() - 2;
        let out = capture.contents();
        assert!(out.contains(&format!("logger.rs:{line} ")));
    }

    #[test]
    fn test_info_omits_call_site()
    {
        let capture = MemoryWriter::new();
        let logger = Logger::with_writer(&Config::default().with_format("text"), capture.clone());

        logger.info("here", &[]);

        assert!(!capture.contents().contains("source="));
    }

    #[test]
    fn test_with_leaves_parent_unchanged()
    {
        let capture = MemoryWriter::new();
        let parent = Logger::with_writer(&Config::default().with_format("text"), capture.clone());
        let child = parent.with([Attr::new("k", "v")]);

        parent.info("parent", &[]);
        child.info("child", &[]);

        let out = capture.contents();
        let lines: Vec<&str> = out.lines().collect();
        assert!(!lines[0].contains("k=v"));
        assert!(lines[1].contains("k=v"));
        assert!(parent.attrs().is_empty());
    }

    #[test]
    fn test_default_logger_is_shared()
    {
        assert!(Logger::ptr_eq(&default_logger(), &default_logger()));
        assert!(Logger::ptr_eq(&Logger::default(), &default_logger()));
    }

    #[test]
    fn test_emit_strips_source_when_not_debug()
    {
        let capture = MemoryWriter::new();
        let logger = Logger::with_writer(&Config::default(), capture.clone());

        let record = Record::new(Level::Info, "m").with_source(Some(Source {
            file: "a.rs".to_string(),
            line: 1,
        }));
        logger.emit(&record);

        assert!(!capture.contents().contains("source"));
    }
}
