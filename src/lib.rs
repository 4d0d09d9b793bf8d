//! # sigroute
//!
//! Signature-indexed route matching with a per-dispatch context store and an
//! async middleware list.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sigroute::{App, Context};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut app = App::new();
//!     app.route("get/hello/:name", |mut ctx: Context| async move {
//!         let name = ctx.params().get("name").unwrap_or("world").to_owned();
//!         ctx.set_custom("greeting", format!("Hello, {name}!"), false);
//!         ctx
//!     })?;
//!     app.prepare();
//!
//!     if let Some(ctx) = app.dispatch("get/hello/rust").await {
//!         println!("{}", ctx.get_custom::<String>("greeting").unwrap());
//!     }
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
pub mod router;
pub mod time;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use app::App;
pub use config::RouterConfig;
pub use context::{Context, Scope};
pub use middleware::{LoggerMiddleware, Middleware, MiddlewareList};
pub use router::{RouteTable, RouterError};
