//! Dispatcher — route a path to its handler through the middleware list.
//!
//! [`App`] owns a [`RouteTable`] of [`Handler`]s and a [`MiddlewareList`].
//! A dispatch runs in this order:
//!
//! 1. Match the path against the route table. No match ends the dispatch.
//! 2. Build a [`Context`] holding the path, matched route and wildcard params,
//!    and record `route`/`path` as read-only inner entries.
//! 3. Run the middleware list.
//! 4. Run the matched handler and return the context it produces.
//!
//! Registration takes `&mut self` and dispatch takes `&self`: finish
//! registration and call [`App::prepare`], then share the app (e.g. behind an
//! `Arc`) for concurrent dispatch.

use std::sync::Arc;

use tokio::time::Instant;
use tracing::debug;

use crate::config::RouterConfig;
use crate::context::Context;
use crate::middleware::{BoxFuture, MiddlewareHandler, MiddlewareList};
use crate::router::{RouteTable, RouterError};

/// Inner-scope key holding the matched route string.
pub const ROUTE_KEY: &str = "route";

/// Inner-scope key holding the dispatched path.
pub const PATH_KEY: &str = "path";

/// Type-erased, heap-allocated async handler that consumes a [`Context`] and
/// returns it after doing its work.
///
/// Stored behind `Arc<dyn Fn(…)>` so the route table can be shared across
/// tasks. You never construct this type directly — use [`App::route`].
pub type Handler = Arc<dyn Fn(Context) -> BoxFuture<Context> + Send + Sync + 'static>;

/// Conversion trait for async handler functions.
///
/// Any `Fn(Context) -> impl Future<Output = Context> + Send` that is also
/// `Send + Sync + 'static` implements this trait via the blanket impl below.
pub trait IntoHandler: Send + Sync + 'static {
    /// Call the handler with the given context, boxing the returned future.
    fn call(&self, ctx: Context) -> BoxFuture<Context>;
}

impl<T, F> IntoHandler for T
where
    T: Fn(Context) -> F + Send + Sync + 'static,
    F: Future<Output = Context> + Send + 'static,
{
    fn call(&self, ctx: Context) -> BoxFuture<Context> {
        Box::pin((self)(ctx))
    }
}

/// Route table plus middleware list.
///
/// # Examples
///
/// ```rust
/// use sigroute::App;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), sigroute::RouterError> {
/// let mut app = App::new();
/// app.route("get/users/:id", |mut ctx: sigroute::Context| async move {
///     let id = ctx.params().get("id").unwrap_or_default().to_owned();
///     ctx.set_custom("body", format!("user {id}"), false);
///     ctx
/// })?;
/// app.prepare();
///
/// let ctx = app.dispatch("get/users/7").await.unwrap();
/// assert_eq!(ctx.get_custom::<String>("body").map(String::as_str), Some("user 7"));
/// assert!(app.dispatch("get/posts/7").await.is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct App {
    routes: RouteTable<Handler>,
    middleware: MiddlewareList,
}

impl App {
    /// An app splitting on `/` with `:` as the wildcard marker.
    pub fn new() -> Self {
        Self::default()
    }

    /// An app whose route table follows `config`.
    pub fn with_config(config: &RouterConfig) -> Result<Self, RouterError> {
        Ok(Self {
            routes: RouteTable::from_config(config)?,
            middleware: MiddlewareList::new(),
        })
    }

    /// Register `handler` for `route`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicateRoute`] if `route` is already registered.
    pub fn route(&mut self, route: &str, handler: impl IntoHandler) -> Result<(), RouterError> {
        let handler: Handler = Arc::new(move |ctx| handler.call(ctx));
        self.routes.add_rule(route, handler)
    }

    /// Unregister `route`.
    pub fn remove(&mut self, route: &str) -> Result<(), RouterError> {
        self.routes.remove_rule(route).map(|_| ())
    }

    /// Add a middleware with priority `index` and `tags`.
    pub fn middleware(&mut self, handler: MiddlewareHandler, index: i32, tags: &[&str]) {
        self.middleware.add(handler, index, tags);
    }

    /// Append every middleware of `other`.
    pub fn merge_middleware(&mut self, other: &MiddlewareList) {
        self.middleware.merge(other);
    }

    /// Sort routes and middleware. Call after registration and before dispatch.
    pub fn prepare(&mut self) {
        self.routes.resort_rules();
        self.middleware.resort();
    }

    pub fn routes(&self) -> &RouteTable<Handler> {
        &self.routes
    }

    pub fn middleware_list(&self) -> &MiddlewareList {
        &self.middleware
    }

    /// Dispatch `path` to its handler.
    ///
    /// # Returns
    ///
    /// The context produced by the handler, or `None` when no route matches.
    pub async fn dispatch(&self, path: &str) -> Option<Context> {
        let start = Instant::now();

        let matched = self.routes.match_path(path)?;
        let route = matched.route();
        let handler = Arc::clone(matched.handler());

        let mut ctx = Context::with_route(path, route, matched.into_params());
        ctx.set_inner(ROUTE_KEY, route.to_owned(), true);
        ctx.set_inner(PATH_KEY, path.to_owned(), true);

        let ctx = self.middleware.exec(ctx).await;
        let ctx = handler(ctx).await;

        debug!(path, route, elapsed = ?start.elapsed(), "dispatch complete");
        Some(ctx)
    }
}
