//! Middleware list — prioritized steps run before every matched handler.
//!
//! Each entry carries a priority `index` and a set of free-form tags. Entries
//! run one at a time in list order, each receiving the [`Context`] produced by
//! the previous one; call [`MiddlewareList::resort`] after adding entries to
//! order them by ascending `index` (ties keep insertion order).
//!
//! ## Core types
//!
//! - [`Middleware`] — trait implemented by struct middleware.
//! - [`MiddlewareHandler`] — type-erased, cheaply-cloneable middleware function.
//! - [`from_middleware`] / [`from_fn`] — build a [`MiddlewareHandler`].
//! - [`LoggerMiddleware`] — built-in dispatch logger.

use std::{future::Future, pin::Pin, sync::Arc};

use tracing::info;

use crate::context::Context;

/// Boxed, `Send` future used by middleware and handlers.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// A type-erased, reference-counted middleware function.
///
/// The [`Arc`] wrapper lets [`MiddlewareList::merge`] share entries between
/// lists without copying closures.
pub type MiddlewareHandler = Arc<dyn Fn(Context) -> BoxFuture<Context> + Send + Sync + 'static>;

/// The core trait for struct middleware.
///
/// A middleware takes ownership of the [`Context`], may read or write its
/// entries, and hands it back for the next step.
pub trait Middleware: Send + Sync {
    fn handle(&self, ctx: Context) -> BoxFuture<Context>;
}

/// Converts a [`Middleware`] implementation into a [`MiddlewareHandler`].
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use sigroute::middleware::{LoggerMiddleware, from_middleware};
///
/// let handler = from_middleware(Arc::new(LoggerMiddleware));
/// ```
pub fn from_middleware<M>(middleware: Arc<M>) -> MiddlewareHandler
where
    M: Middleware + 'static,
{
    Arc::new(move |ctx: Context| middleware.handle(ctx))
}

/// Converts an async closure into a [`MiddlewareHandler`].
///
/// # Examples
///
/// ```rust
/// use sigroute::middleware::from_fn;
///
/// let handler = from_fn(|mut ctx| async move {
///     ctx.set_custom("seen", true, false);
///     ctx
/// });
/// ```
pub fn from_fn<T, F>(f: T) -> MiddlewareHandler
where
    T: Fn(Context) -> F + Send + Sync + 'static,
    F: Future<Output = Context> + Send + 'static,
{
    Arc::new(move |ctx: Context| -> BoxFuture<Context> { Box::pin(f(ctx)) })
}

// A registered middleware with its priority and tags.
#[derive(Clone)]
struct Entry {
    handler: MiddlewareHandler,
    index: i32,
    tags: Vec<String>,
}

/// Ordered list of middleware.
#[derive(Clone, Default)]
pub struct MiddlewareList {
    entries: Vec<Entry>,
}

impl MiddlewareList {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append `handler` with priority `index`. Lower indices run first after
    /// [`resort`](Self::resort).
    pub fn add(&mut self, handler: MiddlewareHandler, index: i32, tags: &[&str]) {
        self.entries.push(Entry {
            handler,
            index,
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
        });
    }

    /// Stable sort by ascending priority index.
    pub fn resort(&mut self) {
        self.entries.sort_by_key(|e| e.index);
    }

    /// Append every entry of `other`, keeping their priorities and tags.
    pub fn merge(&mut self, other: &MiddlewareList) {
        self.entries.extend(other.entries.iter().cloned());
    }

    /// Run every middleware in list order, threading `ctx` through.
    pub async fn exec(&self, mut ctx: Context) -> Context {
        for entry in &self.entries {
            ctx = (entry.handler)(ctx).await;
        }
        ctx
    }

    /// `(index, tags)` of every entry in list order.
    pub fn entries(&self) -> impl Iterator<Item = (i32, &[String])> {
        self.entries.iter().map(|e| (e.index, e.tags.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Built-in middleware that logs the context id, path and matched route.
///
/// Emits a single `tracing::info!` record and passes the context on unchanged.
pub struct LoggerMiddleware;

impl Middleware for LoggerMiddleware {
    fn handle(&self, ctx: Context) -> BoxFuture<Context> {
        Box::pin(async move {
            info!(
                id = %ctx.id(),
                path = ctx.path(),
                route = ctx.route().unwrap_or("-"),
                "dispatch"
            );
            ctx
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Appends `label` to the custom "trace" entry.
    fn tracer(label: &'static str) -> MiddlewareHandler {
        from_fn(move |mut ctx: Context| async move {
            let mut seen = ctx
                .get_custom::<Vec<&'static str>>("trace")
                .cloned()
                .unwrap_or_default();
            seen.push(label);
            ctx.set_custom("trace", seen, false);
            ctx
        })
    }

    fn trace_of(ctx: &Context) -> Vec<&'static str> {
        ctx.get_custom::<Vec<&'static str>>("trace")
            .cloned()
            .unwrap_or_default()
    }

    #[test]
    fn list_starts_empty() {
        let list = MiddlewareList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
    }

    #[tokio::test]
    async fn exec_runs_in_insertion_order() {
        let mut list = MiddlewareList::new();
        list.add(tracer("a"), 5, &[]);
        list.add(tracer("b"), 1, &[]);

        let ctx = list.exec(Context::new("p")).await;
        assert_eq!(trace_of(&ctx), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn resort_orders_by_index() {
        let mut list = MiddlewareList::new();
        list.add(tracer("late"), 10, &[]);
        list.add(tracer("early"), -1, &[]);
        list.add(tracer("mid-1"), 3, &[]);
        list.add(tracer("mid-2"), 3, &[]);
        list.resort();

        let ctx = list.exec(Context::new("p")).await;
        assert_eq!(trace_of(&ctx), vec!["early", "mid-1", "mid-2", "late"]);
    }

    #[tokio::test]
    async fn exec_empty_list_returns_context() {
        let list = MiddlewareList::new();
        let ctx = list.exec(Context::new("p")).await;
        assert_eq!(ctx.path(), "p");
    }

    #[tokio::test]
    async fn merge_appends_other_entries() {
        let mut a = MiddlewareList::new();
        a.add(tracer("a"), 0, &["core"]);
        let mut b = MiddlewareList::new();
        b.add(tracer("b"), 0, &["extra", "auth"]);

        a.merge(&b);
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 1);

        let tags: Vec<_> = a.entries().map(|(_, t)| t.to_vec()).collect();
        assert_eq!(tags[1], vec!["extra".to_string(), "auth".to_string()]);

        let ctx = a.exec(Context::new("p")).await;
        assert_eq!(trace_of(&ctx), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn logger_passes_context_through() {
        let mut list = MiddlewareList::new();
        list.add(from_middleware(Arc::new(LoggerMiddleware)), 0, &[]);
        let ctx = list.exec(Context::new("get/a")).await;
        assert_eq!(ctx.path(), "get/a");
    }
}
