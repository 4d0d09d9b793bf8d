//! Registers a few routes and dispatches paths through a logging middleware.
//!
//! Run with `RUST_LOG=debug cargo run --example dispatch`.

use std::sync::Arc;

use sigroute::middleware::{from_fn, from_middleware};
use sigroute::{App, Context, LoggerMiddleware, RouterConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = RouterConfig::from_json(r#"{ "separator": "/", "wildcard_marker": ":" }"#)?;
    let mut app = App::with_config(&config)?;

    app.middleware(from_middleware(Arc::new(LoggerMiddleware)), 10, &["log"]);
    app.middleware(
        from_fn(|mut ctx: Context| async move {
            ctx.set_custom("user", "guest".to_string(), true);
            ctx
        }),
        0,
        &["auth"],
    );

    app.route("get/users", |mut ctx: Context| async move {
        ctx.set_custom("body", "all users".to_string(), false);
        ctx
    })?;
    app.route("get/users/:id", |mut ctx: Context| async move {
        let id = ctx.params().get("id").unwrap_or_default().to_owned();
        ctx.set_custom("body", format!("user {id}"), false);
        ctx
    })?;
    app.prepare();

    for path in ["get/users", "get/users/42", "post/users"] {
        match app.dispatch(path).await {
            Some(ctx) => {
                let body = ctx.get_custom::<String>("body").cloned().unwrap_or_default();
                println!("{path} -> {body}");
            }
            None => println!("{path} -> no route"),
        }
    }

    Ok(())
}
