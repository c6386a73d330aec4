// File: src/engine/mod.rs
// Purpose: axum backend: route groups over a shared table, served by axum

use axum::Router;
use std::cell::RefCell;
use std::rc::Rc;
use tower_http::catch_panic::CatchPanicLayer;

use crate::binder;
use crate::config::EngineConfig;
use crate::error::BindError;
use crate::facade::RouteGroup;
use crate::handler::HandlerFunc;
use crate::middleware::logger;
use crate::routable::Routable;

mod group;
pub mod path;
mod table;

pub use group::RouterGroup;
pub use table::RouteInfo;

use table::RouteTable;

/// Routing backend: collects routes through its root group, then turns
/// into an [`axum::Router`]
///
/// Binding is single-threaded and happens before serving; the engine is
/// consumed by [`Engine::into_router`] or [`Engine::run`].
pub struct Engine {
    root: RouterGroup,
    table: Rc<RefCell<RouteTable>>,
    config: EngineConfig,
}

impl Engine {
    /// Engine without logger or panic catching
    pub fn new() -> Self {
        Self::with_config(EngineConfig::bare())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let table = Rc::new(RefCell::new(RouteTable::default()));
        let mut root = RouterGroup::root(Rc::clone(&table));
        if config.request_log {
            root.use_handlers(vec![logger()]);
        }

        Self { root, table, config }
    }

    /// Root group at `/`
    pub fn group(&mut self) -> &mut RouterGroup {
        &mut self.root
    }

    /// Middleware for every route registered afterwards
    pub fn use_handlers(&mut self, handlers: impl IntoIterator<Item = HandlerFunc>) -> &mut Self {
        self.root.use_handlers(handlers.into_iter().collect());
        self
    }

    /// Bind a routable value onto the root group
    pub fn bind(&mut self, value: &dyn Routable) -> Result<(), BindError> {
        binder::bind(&mut self.root, value)
    }

    /// Routes registered so far, in registration order
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.table.borrow().routes().to_vec()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn into_router(self) -> Router {
        let table = self.table.take();
        let router = table.into_router(self.config.body_limit);

        if self.config.catch_panic {
            router.layer(CatchPanicLayer::new())
        } else {
            router
        }
    }

    /// Serve on `addr` until the listener fails
    pub async fn run(self, addr: &str) -> std::io::Result<()> {
        let router = self.into_router();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(addr = %listener.local_addr()?, "listening");
        axum::serve(listener, router).await
    }
}

impl Default for Engine {
    /// Engine with request logger and panic catching
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}
