//! # ctxlog
//!
//! Structured logger configuration and request-scoped logger propagation.
//!
//! This crate provides:
//! - A [`Config`] of three string settings (level, format, output) that
//!   never fails to resolve
//! - A [`Logger`] handle writing text or JSON lines to stdout or stderr
//! - A [`Context`] carrier that passes a logger down a call chain, with
//!   [`context::with`] deriving children that log extra attributes
//! - A `tracing` bridge ([`LoggerLayer`], [`init_logging`]) and request
//!   lifecycle logging ([`RequestScope`])
//!
//! ## Quick Start
//!
//! ```rust
//! use ctxlog::{Attr, Config, Context, Logger, context};
//!
//! let logger = Logger::new(&Config::default());
//! let ctx = context::with_logger(&Context::new(), logger);
//!
//! let ctx = context::with(&ctx, [Attr::new("user_id", 42)]);
//! context::from_context(&ctx).info("User logged in", &[Attr::new("action", "login")]);
//! ```

pub mod attr;
pub mod config;
pub mod context;
pub mod error;
pub mod format;
pub mod layer;
pub mod logger;
pub mod record;
pub mod request;
pub mod writer;

// Re-export commonly used types
pub use attr::{Attr, Value};
pub use config::{Config, Format, Level, Output};
pub use context::{Context, from_context, with_logger};
pub use error::{LoggingError, Result};
pub use layer::{LoggerLayer, init_logging, init_logging_with};
pub use logger::{Logger, default_logger};
pub use request::RequestScope;
pub use writer::MemoryWriter;
