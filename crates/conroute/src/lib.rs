//! # conroute
//!
//! Convention routing: the route table of an axum application is derived
//! from the shape of plain Rust types.
//!
//! - Method names pick the HTTP verb and path: `GetUser_1id` serves
//!   `GET /user/:id`
//! - `Static*` methods return the arguments of a static file or directory
//!   mount
//! - A method named `Use` installs middleware for its level
//! - Named fields become sub-groups, tuple fields share the parent group,
//!   `#[router("path")]` picks the sub-group and `#[router("-")]` skips it
//!
//! ## Example
//!
//! ```no_run
//! use conroute::{routes, Context, Routable, StatusCode};
//!
//! #[derive(Clone, Routable)]
//! struct Auth;
//!
//! #[routes]
//! impl Auth {
//!     fn Use(&self, c: &mut Context) {
//!         let uid = c.query("uid").unwrap_or("visitor").to_string();
//!         c.set("uid", uid);
//!     }
//!
//!     fn GetPing(&self, c: &mut Context) {
//!         let msg = format!("hello {}", c.get_string("uid"));
//!         c.json(StatusCode::OK, &serde_json::json!({ "msg": msg }));
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = conroute::default(&Auth)?;
//!     engine.run("127.0.0.1:9000").await?;
//!     Ok(())
//! }
//! ```

// Lets the derive output's `::conroute` paths resolve inside this crate
extern crate self as conroute;

pub mod binder;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod facade;
pub mod handler;
pub mod middleware;
pub mod routable;

pub use binder::{bind, SKIP_TAG};
pub use config::{Config, EngineConfig, ServerConfig};
pub use context::{Context, QueryParams};
pub use engine::{Engine, RouteInfo, RouterGroup};
pub use error::{BindError, ConfigError, InvocationError, RegisterError};
pub use facade::{FileSystem, Registrar, RouteGroup, StaticArgs, StaticRoute};
pub use handler::{handler_fn, HandlerFunc, HandlersChain};
pub use routable::{FieldEntry, IntoStaticArgs, MethodEntry, MethodKind, RouteMethods, Routable};

pub use conroute_macro::{routes, Routable};
pub use conroute_naming::{classify, parse_name, Action, ActionToken, StaticKind, Verb};

pub use axum;
pub use axum::http::StatusCode;

/// Bind `value` onto `engine`, returning the engine together with the
/// outcome
///
/// Routes registered before a failure stay on the engine.
pub fn bind_engine(mut engine: Engine, value: &dyn Routable) -> (Engine, Result<(), BindError>) {
    let result = engine.bind(value);
    (engine, result)
}

/// Bind `value` onto `engine`, logging and otherwise ignoring a failure
pub fn must_bind(mut engine: Engine, value: &dyn Routable) -> Engine {
    if let Err(err) = engine.bind(value) {
        tracing::error!(method = err.method(), error = %err, "binding stopped early");
    }
    engine
}

/// Default engine (request logger, panic catching) with `value` bound
pub fn default(value: &dyn Routable) -> Result<Engine, BindError> {
    let mut engine = Engine::default();
    engine.bind(value)?;
    Ok(engine)
}

/// Default engine with `value` bound, ignoring a binding failure
pub fn must_default(value: &dyn Routable) -> Engine {
    must_bind(Engine::default(), value)
}
