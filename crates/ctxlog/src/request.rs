//! # Request Scope
//!
//! Request lifecycle logging. A [`RequestScope`] tags everything logged
//! through its context with a fresh `request_id` plus the request's
//! `method` and `path`, and writes one `request_completed` record when the
//! request ends.
//!
//! ```rust
//! use ctxlog::{Context, RequestScope};
//!
//! # async fn handle() {
//! let scope = RequestScope::begin(&Context::current(), "GET", "/health");
//! let status = scope
//!     .run(async {
//!         Context::current().logger().info("checking", &[]);
//!         200
//!     })
//!     .await;
//! scope.finish(status);
//! # }
//! ```

use std::fmt;
use std::future::Future;
use std::time::Instant;

use uuid::Uuid;

use crate::attr::Attr;
use crate::context::{self, Context};

/// Status reported when a scope is dropped without [`RequestScope::finish`]
pub const UNFINISHED_STATUS: u16 = 500;

/// Logging scope for a single request
#[derive(Debug)]
pub struct RequestScope
{
    ctx: Context,
    request_id: String,
    started: Instant,
    finished: bool,
}

impl RequestScope
{
    /// Start a scope for a request, deriving from `parent`
    #[must_use]
    pub fn begin(parent: &Context, method: &str, path: &str) -> Self
    {
        let request_id = Uuid::new_v4().to_string();
        let ctx = context::with(
            parent,
            [
                Attr::new("request_id", request_id.as_str()),
                Attr::new("method", method),
                Attr::new("path", path),
            ],
        );

        Self {
            ctx,
            request_id,
            started: Instant::now(),
            finished: false,
        }
    }

    /// Context whose logger carries the request attributes
    #[must_use]
    pub fn context(&self) -> &Context
    {
        &self.ctx
    }

    /// Generated request id
    #[must_use]
    pub fn request_id(&self) -> &str
    {
        &self.request_id
    }

    /// Run `fut` with the request context as the ambient context
    pub async fn run<F>(&self, fut: F) -> F::Output
    where
        F: Future,
    {
        self.ctx.clone().scope(fut).await
    }

    /// Log an error that escaped the request handler
    #[track_caller]
    pub fn fail<E>(&self, err: &E)
    where
        E: fmt::Display + ?Sized,
    {
        self.ctx.logger().error("unhandled_error", &[Attr::new("error", err.to_string())]);
    }

    /// Log request completion with the response status
    #[track_caller]
    pub fn finish(mut self, status: u16)
    {
        self.complete(status);
    }

    #[track_caller]
    fn complete(&mut self, status: u16)
    {
        self.finished = true;
        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        let duration_ms = (elapsed_ms * 100.0).round() / 100.0;

        self.ctx.logger().info(
            "request_completed",
            &[Attr::new("status", status), Attr::new("duration_ms", duration_ms)],
        );
    }
}

impl Drop for RequestScope
{
    /// Drop glue cannot report its caller, so at debug level this record
    /// points at this function rather than where the scope went out of scope.
    fn drop(&mut self)
    {
        if !self.finished {
            self.complete(UNFINISHED_STATUS);
        }
    }
}
