//! Tests for installing the global subscriber
//!
//! The global subscriber can only be set once per process, so everything
//! lives in a single test inside its own test binary.

use ctxlog::{Config, Level, Logger, LoggingError, MemoryWriter, init_logging, init_logging_with};

#[test]
fn test_init_logging_filters_and_refuses_second_install()
{
    let writer = MemoryWriter::new();
    let logger = Logger::with_writer(&Config::default().with_level("warn").with_format("text"), writer.clone());

    let installed = init_logging_with(logger).unwrap();
    assert_eq!(installed.level(), Level::Warn);

    tracing::info!("should not appear");
    tracing::warn!(disk = "sda1", "should appear");

    let lines = writer.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("level=WARN msg=\"should appear\" disk=sda1"));

    let second = init_logging(&Config::default());
    assert!(matches!(second, Err(LoggingError::InitializationFailed(_))));
}
