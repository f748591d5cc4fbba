//! # Context Propagation
//!
//! [`Context`] is an immutable chain of typed values that travels with a
//! request or operation. Attaching a value never changes an existing
//! context; it returns a new node whose parent is the old one, so a scope
//! can add values visible to itself and its descendants without affecting
//! siblings or ancestors.
//!
//! Values are keyed by a marker type. The logger slot uses a private marker,
//! so no code outside this module can read or overwrite it by accident.
//!
//! ## Ambient context
//!
//! Async code can install a context as the task's current one with
//! [`Context::scope`] and read it back anywhere below with
//! [`Context::current`], without threading it through every call.
//!
//! ```rust
//! use ctxlog::context::{self, Context};
//! use ctxlog::Attr;
//!
//! let ctx = context::with(&Context::new(), [Attr::new("request_id", "abc")]);
//! context::from_context(&ctx).info("handling", &[]);
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::attr::Attr;
use crate::logger::{Logger, default_logger};

tokio::task_local! {
    static CURRENT_CONTEXT: Context;
}

/// Marker key for the logger slot
struct LoggerKey;

struct Node
{
    key: TypeId,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Node>>,
}

/// Immutable, chained request context
#[derive(Clone, Default)]
pub struct Context
{
    head: Option<Arc<Node>>,
}

impl Context
{
    /// The empty root context
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Derive a context carrying `value` under the key type `K`
    ///
    /// A later value under the same key shadows earlier ones for lookups
    /// through the new context only.
    #[must_use]
    pub fn with_value<K, V>(&self, value: V) -> Self
    where
        K: 'static,
        V: Any + Send + Sync,
    {
        Self {
            head: Some(Arc::new(Node {
                key: TypeId::of::<K>(),
                value: Arc::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// Nearest value stored under the key type `K`
    ///
    /// Returns `None` if no value was attached under `K` or the value has a
    /// different type.
    #[must_use]
    pub fn value<K, V>(&self) -> Option<&V>
    where
        K: 'static,
        V: Any,
    {
        let key = TypeId::of::<K>();
        let mut node = self.head.as_deref();
        while let Some(current) = node {
            if current.key == key {
                return current.value.downcast_ref::<V>();
            }
            node = current.parent.as_deref();
        }
        None
    }

    /// Number of values attached along the chain
    #[must_use]
    pub fn depth(&self) -> usize
    {
        std::iter::successors(self.head.as_deref(), |node| node.parent.as_deref()).count()
    }

    /// The logger carried by this context, or the default handle
    #[must_use]
    pub fn logger(&self) -> Logger
    {
        from_context(self)
    }

    /// The task's ambient context
    ///
    /// Outside of [`Context::scope`] or [`Context::sync_scope`] this is the
    /// empty root context.
    #[must_use]
    pub fn current() -> Self
    {
        CURRENT_CONTEXT.try_with(Clone::clone).unwrap_or_default()
    }

    /// Run `fut` with `self` as the ambient context
    pub async fn scope<F>(self, fut: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_CONTEXT.scope(self, fut).await
    }

    /// Run `f` with `self` as the ambient context
    pub fn sync_scope<F, R>(self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        CURRENT_CONTEXT.sync_scope(self, f)
    }
}

impl fmt::Debug for Context
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("Context").field("depth", &self.depth()).finish()
    }
}

/// Derive a context carrying `logger`
///
/// `ctx` is not modified.
#[must_use]
pub fn with_logger(ctx: &Context, logger: Logger) -> Context
{
    ctx.with_value::<LoggerKey, Logger>(logger)
}

/// The logger attached to `ctx`
///
/// Falls back to the process-wide default handle when none is attached.
#[must_use]
pub fn from_context(ctx: &Context) -> Logger
{
    ctx.value::<LoggerKey, Logger>().cloned().unwrap_or_else(default_logger)
}

/// Derive a context whose logger carries additional attributes
///
/// The current logger comes from [`from_context`]. `ctx` is not modified.
#[must_use]
pub fn with<I>(ctx: &Context, attrs: I) -> Context
where
    I: IntoIterator,
    I::Item: Into<Attr>,
{
    with_logger(ctx, from_context(ctx).with(attrs))
}
