//! # Logger Configuration
//!
//! Three string settings pick the minimum level, the record format and the
//! destination stream. Resolution is total: a value that is not recognized
//! falls through to the default for that setting, so a typo never stops a
//! process from logging.
//!
//! | setting  | recognized                       | default  |
//! |----------|----------------------------------|----------|
//! | `level`  | `debug`, `info`, `warn(ing)`, `error` | `info` |
//! | `format` | `text`, `json`                   | `json`   |
//! | `output` | `stdout`, `stderr`               | `stdout` |
//!
//! All matching is case-insensitive. The strict [`FromStr`] impls exist for
//! callers that want to reject bad input themselves.
//!
//! ## Environment Variables
//!
//! [`Config::from_env`] reads:
//! - `LOG_LEVEL`
//! - `LOG_FORMAT`
//! - `LOG_OUTPUT`

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing_subscriber::filter::LevelFilter;

use crate::error::LoggingError;

/// Environment variable holding the level setting
pub const LEVEL_ENV: &str = "LOG_LEVEL";
/// Environment variable holding the format setting
pub const FORMAT_ENV: &str = "LOG_FORMAT";
/// Environment variable holding the output setting
pub const OUTPUT_ENV: &str = "LOG_OUTPUT";

/// Record severity
///
/// Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level
{
    /// Debug level, also enables source locations
    Debug,
    /// Info level (default)
    #[default]
    Info,
    /// Warning level
    Warn,
    /// Error level
    Error,
}

impl Level
{
    /// Resolve a level setting, falling back to [`Level::Info`]
    #[must_use]
    pub fn resolve(s: &str) -> Self
    {
        s.parse().unwrap_or_default()
    }

    /// Upper-case name used in emitted records
    #[must_use]
    pub const fn as_str(self) -> &'static str
    {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(LoggingError::InvalidLevel(s.to_string())),
        }
    }
}

impl From<Level> for tracing::Level
{
    fn from(level: Level) -> Self
    {
        match level {
            Level::Debug => tracing::Level::DEBUG,
            Level::Info => tracing::Level::INFO,
            Level::Warn => tracing::Level::WARN,
            Level::Error => tracing::Level::ERROR,
        }
    }
}

impl From<Level> for LevelFilter
{
    fn from(level: Level) -> Self
    {
        LevelFilter::from_level(level.into())
    }
}

impl From<&tracing::Level> for Level
{
    /// `TRACE` has no counterpart and folds into [`Level::Debug`].
    fn from(level: &tracing::Level) -> Self
    {
        match *level {
            tracing::Level::ERROR => Self::Error,
            tracing::Level::WARN => Self::Warn,
            tracing::Level::INFO => Self::Info,
            _ => Self::Debug,
        }
    }
}

/// Record format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format
{
    /// Human-readable `key=value` line
    Text,
    /// One JSON object per line (default)
    #[default]
    Json,
}

impl Format
{
    /// Resolve a format setting, falling back to [`Format::Json`]
    #[must_use]
    pub fn resolve(s: &str) -> Self
    {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for Format
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(LoggingError::InvalidFormat(s.to_string())),
        }
    }
}

/// Destination stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Output
{
    /// Process standard output (default)
    #[default]
    Stdout,
    /// Process standard error
    Stderr,
}

impl Output
{
    /// Resolve an output setting, falling back to [`Output::Stdout`]
    #[must_use]
    pub fn resolve(s: &str) -> Self
    {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for Output
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "stdout" => Ok(Self::Stdout),
            "stderr" => Ok(Self::Stderr),
            _ => Err(LoggingError::InvalidOutput(s.to_string())),
        }
    }
}

/// Logger settings
///
/// Kept as raw strings so that any config loader can fill it in; the
/// factory resolves them when a logger is built. Missing fields take the
/// defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Minimum level: `debug`, `info`, `warn`, `error`
    pub level: String,
    /// Record format: `text` or `json`
    pub format: String,
    /// Destination: `stdout` or `stderr`
    pub output: String,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
            output: "stdout".to_string(),
        }
    }
}

impl Config
{
    /// Create config from environment variables
    ///
    /// Each unset variable keeps its default value.
    #[must_use]
    pub fn from_env() -> Self
    {
        let defaults = Self::default();
        Self {
            level: env::var(LEVEL_ENV).unwrap_or(defaults.level),
            format: env::var(FORMAT_ENV).unwrap_or(defaults.format),
            output: env::var(OUTPUT_ENV).unwrap_or(defaults.output),
        }
    }

    /// Set the level setting
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self
    {
        self.level = level.into();
        self
    }

    /// Set the format setting
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self
    {
        self.format = format.into();
        self
    }

    /// Set the output setting
    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self
    {
        self.output = output.into();
        self
    }

    /// Resolved minimum level
    #[must_use]
    pub fn level(&self) -> Level
    {
        Level::resolve(&self.level)
    }

    /// Resolved record format
    #[must_use]
    pub fn format(&self) -> Format
    {
        Format::resolve(&self.format)
    }

    /// Resolved destination
    #[must_use]
    pub fn output(&self) -> Output
    {
        Output::resolve(&self.output)
    }
}
