//! # Tracing Bridge
//!
//! [`LoggerLayer`] routes `tracing` events through a [`Logger`], so code
//! written against the `tracing` macros ends up in the same stream and
//! format as records emitted through the handle directly.
//!
//! - The `message` field becomes the record message
//! - Other event fields become record attributes
//! - Fields of enclosing spans come first, outermost span first
//! - `TRACE` events are treated as debug records
//!
//! [`init_logging`] installs the layer as the process-global subscriber.
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Overrides the level filter (e.g. `RUST_LOG=my_crate=debug`)

use std::fmt;

use tracing::field::{Field, Visit};
use tracing::span;
use tracing::{Event, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::{self, Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

use crate::attr::{Attr, Value};
use crate::config::{Config, Level};
use crate::error::Result;
use crate::logger::Logger;
use crate::record::{Record, Source};

/// Span fields stored in the span's extensions
struct SpanAttrs(Vec<Attr>);

/// `tracing_subscriber` layer that emits through a [`Logger`]
#[derive(Debug, Clone)]
pub struct LoggerLayer
{
    logger: Logger,
}

impl LoggerLayer
{
    /// Create a layer emitting through `logger`
    #[must_use]
    pub fn new(logger: Logger) -> Self
    {
        Self { logger }
    }

    /// The logger records are emitted through
    #[must_use]
    pub fn logger(&self) -> &Logger
    {
        &self.logger
    }
}

impl<S> Layer<S> for LoggerLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &span::Id, ctx: layer::Context<'_, S>)
    {
        let mut visitor = AttrVisitor::default();
        attrs.record(&mut visitor);

        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(SpanAttrs(visitor.attrs));
        }
    }

    fn on_record(&self, id: &span::Id, values: &span::Record<'_>, ctx: layer::Context<'_, S>)
    {
        let mut visitor = AttrVisitor::default();
        values.record(&mut visitor);

        if let Some(span) = ctx.span(id) {
            let mut extensions = span.extensions_mut();
            if let Some(existing) = extensions.get_mut::<SpanAttrs>() {
                existing.0.extend(visitor.attrs);
            } else {
                extensions.insert(SpanAttrs(visitor.attrs));
            }
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: layer::Context<'_, S>)
    {
        let metadata = event.metadata();
        let level = Level::from(metadata.level());
        if !self.logger.enabled(level) {
            return;
        }

        let mut attrs = Vec::new();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                if let Some(fields) = span.extensions().get::<SpanAttrs>() {
                    attrs.extend(fields.0.iter().cloned());
                }
            }
        }

        let mut visitor = AttrVisitor::default();
        event.record(&mut visitor);
        attrs.extend(visitor.attrs);

        let source = metadata.file().zip(metadata.line()).map(|(file, line)| Source {
            file: file.to_string(),
            line,
        });

        let record = Record::new(level, visitor.message.unwrap_or_default())
            .with_source(source)
            .with_attrs(attrs);
        self.logger.emit(&record);
    }
}

/// Collects `tracing` fields as attributes
#[derive(Default)]
struct AttrVisitor
{
    message: Option<String>,
    attrs: Vec<Attr>,
}

impl AttrVisitor
{
    fn push(&mut self, field: &Field, value: Value)
    {
        self.attrs.push(Attr::new(field.name(), value));
    }
}

impl Visit for AttrVisitor
{
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug)
    {
        let value = format!("{value:?}");
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.push(field, Value::Str(value));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str)
    {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.push(field, Value::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64)
    {
        self.push(field, Value::Int(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64)
    {
        self.push(field, Value::Uint(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64)
    {
        self.push(field, Value::Float(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool)
    {
        self.push(field, Value::Bool(value));
    }
}

/// Build a logger and install it as the global `tracing` subscriber
///
/// `RUST_LOG` overrides the level filter when set; the logger's own level
/// still applies on top of it. Returns the logger so it can also be
/// attached to a [`Context`](crate::Context).
///
/// ## Example
///
/// ```rust,no_run
/// use ctxlog::{Config, init_logging};
///
/// let logger = init_logging(&Config::from_env()).expect("Failed to initialize logging");
/// tracing::info!(port = 8080, "listening");
/// logger.info("also works directly", &[]);
/// ```
///
/// ## Errors
///
/// Returns [`LoggingError::InitializationFailed`](crate::LoggingError::InitializationFailed)
/// if a global subscriber is already set.
pub fn init_logging(config: &Config) -> Result<Logger>
{
    init_logging_with(Logger::new(config))
}

/// Install an already built logger as the global `tracing` subscriber
///
/// Same as [`init_logging`] for a logger that writes somewhere other than
/// the configured stream (see [`Logger::with_writer`]). The level filter is
/// taken from `RUST_LOG`, or from the logger's level when unset.
///
/// ## Errors
///
/// Returns [`LoggingError::InitializationFailed`](crate::LoggingError::InitializationFailed)
/// if a global subscriber is already set.
pub fn init_logging_with(logger: Logger) -> Result<Logger>
{
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::from(logger.level()).to_string()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(LoggerLayer::new(logger.clone()))
        .try_init()?;

    Ok(logger)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::writer::MemoryWriter;

    fn capture(config: Config) -> (MemoryWriter, impl Subscriber + Send + Sync)
    {
        let writer = MemoryWriter::new();
        let logger = Logger::with_writer(&config, writer.clone());
        (writer, tracing_subscriber::registry().with(LoggerLayer::new(logger)))
    }

    #[test]
    fn test_layer_keeps_its_logger()
    {
        let logger = Logger::with_writer(&Config::default().with_level("warn"), MemoryWriter::new());
        let layer = LoggerLayer::new(logger.clone());

        assert!(Logger::ptr_eq(layer.logger(), &logger));
        assert_eq!(layer.logger().level(), Level::Warn);
    }

    #[test]
    fn test_event_fields_become_attrs()
    {
        let (writer, subscriber) = capture(Config::default());

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(user_id = 12345_u64, action = "login", ok = true, "User logged in");
        });

        let line = writer.contents();
        let parsed: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(parsed["msg"], "User logged in");
        assert_eq!(parsed["level"], "INFO");
        assert_eq!(parsed["user_id"], 12345);
        assert_eq!(parsed["action"], "login");
        assert_eq!(parsed["ok"], true);
        assert!(parsed.get("source").is_none());
    }

    #[test]
    fn test_span_fields_come_first()
    {
        let (writer, subscriber) = capture(Config::default().with_format("text"));

        tracing::subscriber::with_default(subscriber, || {
            let outer = tracing::info_span!("request", request_id = "r-1");
            let _outer = outer.enter();
            let inner = tracing::info_span!("db", table = "users");
            let _inner = inner.enter();
            tracing::warn!(rows = 0_i64, "empty result");
        });

        let line = writer.contents();
        let request_id = line.find("request_id=r-1").unwrap();
        let table = line.find("table=users").unwrap();
        let rows = line.find("rows=0").unwrap();
        assert!(request_id < table && table < rows);
        assert!(line.contains("msg=\"empty result\""));
    }

    #[test]
    fn test_recorded_span_fields_are_kept()
    {
        let (writer, subscriber) = capture(Config::default().with_format("text"));

        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("job", status = tracing::field::Empty);
            span.record("status", "done");
            let _guard = span.enter();
            tracing::info!("finished");
        });

        assert!(writer.contents().contains("status=done"));
    }

    #[test]
    fn test_layer_respects_logger_level()
    {
        let (writer, subscriber) = capture(Config::default().with_level("error"));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("dropped");
            tracing::error!("kept");
        });

        assert_eq!(writer.lines().len(), 1);
        assert!(writer.contents().contains("kept"));
    }

    #[test]
    fn test_trace_maps_to_debug_with_source()
    {
        let (writer, subscriber) = capture(Config::default().with_level("debug"));

        tracing::subscriber::with_default(subscriber, || {
            tracing::trace!("very detailed");
        });

        let parsed: serde_json::Value = serde_json::from_str(writer.contents().trim()).unwrap();
        assert_eq!(parsed["level"], "DEBUG");
        assert!(parsed["source"]["file"].as_str().unwrap().ends_with("layer.rs"));
    }
}
