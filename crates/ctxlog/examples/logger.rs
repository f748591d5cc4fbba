//! Example demonstrating how to use ctxlog
//!
//! This example shows different ways to build and pass a logger:
//!
//! 1. Building a logger from environment variables
//! 2. Attaching it to a context and enriching it
//! 3. Routing `tracing` macros through the same logger
//! 4. Logging a request lifecycle
//!
//! Try `LOG_FORMAT=text LOG_LEVEL=debug cargo run --example logger`.

use ctxlog::context::{self, Context};
use ctxlog::{Attr, Config, RequestScope, init_logging};

#[tokio::main(flavor = "current_thread")]
async fn main()
{
    // Method 1: Configure from LOG_LEVEL / LOG_FORMAT / LOG_OUTPUT
    // Also installs the logger as the global tracing subscriber
    let logger = init_logging(&Config::from_env()).expect("Failed to initialize logging");

    logger.info("Application started", &[]);

    // Method 2: Carry the logger in a context
    let ctx = context::with_logger(&Context::new(), logger);
    let ctx = context::with(&ctx, [Attr::new("service", "example")]);

    context::from_context(&ctx).debug("Debug information (set LOG_LEVEL=debug to see)", &[]);
    context::from_context(&ctx).info("User logged in", &[Attr::new("user_id", 12345), Attr::new("action", "login")]);

    // Method 3: tracing macros end up in the same stream
    let span = tracing::info_span!("process_job", job_id = 7);
    let _guard = span.enter();
    tracing::info!("Processing job");
    drop(_guard);

    // Method 4: request lifecycle
    let scope = RequestScope::begin(&ctx, "GET", "/users/12345");
    let result: Result<u16, String> = scope
        .run(async {
            Context::current().logger().info("Loading user", &[]);
            Err("Something went wrong".to_string())
        })
        .await;

    match result {
        Ok(status) => scope.finish(status),
        Err(e) => {
            scope.fail(&e);
            scope.finish(500);
        }
    }

    context::from_context(&ctx).info("Application finished", &[]);
}
