// File: src/engine/table.rs
// Purpose: Validated route table and its conversion into an axum Router

use axum::body::to_bytes;
use axum::extract::{RawPathParams, Request};
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use conroute_naming::Verb;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};

use crate::context::Context;
use crate::error::RegisterError;
use crate::handler::HandlersChain;

/// Wildcard appended to directory mounts
const FILEPATH_WILDCARD: &str = "*filepath";

/// A registered route, as listed by [`crate::Engine::routes`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub method: String,
    pub path: String,
}

impl RouteInfo {
    fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }
}

/// What a static mount serves
#[derive(Debug, Clone)]
pub(crate) enum StaticTarget {
    File(PathBuf),
    Dir { root: PathBuf, index: bool },
}

struct StaticMount {
    path: String,
    target: StaticTarget,
    chain: HandlersChain,
}

type Endpoint = HashMap<Method, HandlersChain>;

#[derive(Debug, Clone, Copy)]
enum Owner {
    Dynamic(usize),
    Static,
}

impl Owner {
    fn describe(self) -> &'static str {
        match self {
            Owner::Dynamic(_) => "dynamic",
            Owner::Static => "static",
        }
    }
}

/// Every route registered through an engine's groups
///
/// Paths go through a `matchit` router on insert, the same matcher axum
/// uses, so anything axum would panic on is rejected here as a
/// [`RegisterError`].
pub(crate) struct RouteTable {
    matcher: matchit::Router<()>,
    owners: HashMap<String, Owner>,
    endpoints: Vec<(String, Endpoint)>,
    statics: Vec<StaticMount>,
    routes: Vec<RouteInfo>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            matcher: matchit::Router::new(),
            owners: HashMap::new(),
            endpoints: Vec::new(),
            statics: Vec::new(),
            routes: Vec::new(),
        }
    }
}

impl RouteTable {
    pub(crate) fn add_route(&mut self, verb: Verb, path: String, chain: HandlersChain) -> Result<(), RegisterError> {
        require_absolute(&path)?;
        let method = method_of(verb);

        let index = match self.owners.get(&path) {
            Some(Owner::Static) => {
                return Err(RegisterError::Conflict {
                    path,
                    existing: Owner::Static.describe(),
                })
            }
            Some(Owner::Dynamic(index)) => {
                if self.endpoints[*index].1.contains_key(&method) {
                    return Err(RegisterError::Duplicate {
                        method: verb.to_string(),
                        path,
                    });
                }
                *index
            }
            None => {
                self.insert_path(&path)?;
                self.endpoints.push((path.clone(), HashMap::new()));
                let index = self.endpoints.len() - 1;
                self.owners.insert(path.clone(), Owner::Dynamic(index));
                index
            }
        };

        self.endpoints[index].1.insert(method, chain);
        self.routes.push(RouteInfo::new(verb.as_str(), path));
        Ok(())
    }

    pub(crate) fn add_static(&mut self, path: String, target: StaticTarget, chain: HandlersChain) -> Result<(), RegisterError> {
        require_absolute(&path)?;
        if path.contains([':', '*']) {
            return Err(RegisterError::StaticParams(path));
        }

        let listed = match &target {
            StaticTarget::File(_) => {
                self.claim_static(&path)?;
                path.clone()
            }
            StaticTarget::Dir { .. } => {
                let tail = super::path::join_paths(&path, FILEPATH_WILDCARD);
                // axum nests the service at the mount, the mount with a
                // trailing slash, and everything below it. matchit cannot hold
                // `<mount>/` next to the tail wildcard, so that path is only
                // reserved in `owners`.
                let slash = (path != "/" && !path.ends_with('/')).then(|| format!("{path}/"));
                if let Some(owner) = slash.as_ref().and_then(|slash| self.owners.get(slash)) {
                    return Err(RegisterError::Conflict {
                        path: format!("{path}/"),
                        existing: owner.describe(),
                    });
                }

                if path != "/" {
                    self.claim_static(&path)?;
                }
                self.claim_static(&tail)?;
                if let Some(slash) = slash {
                    self.owners.insert(slash, Owner::Static);
                }
                tail
            }
        };

        self.routes.push(RouteInfo::new(Method::GET.as_str(), listed.clone()));
        self.routes.push(RouteInfo::new(Method::HEAD.as_str(), listed));
        self.statics.push(StaticMount { path, target, chain });
        Ok(())
    }

    pub(crate) fn routes(&self) -> &[RouteInfo] {
        &self.routes
    }

    fn claim_static(&mut self, path: &str) -> Result<(), RegisterError> {
        if let Some(owner) = self.owners.get(path) {
            return Err(RegisterError::Conflict {
                path: path.to_string(),
                existing: owner.describe(),
            });
        }
        self.insert_path(path)?;
        self.owners.insert(path.to_string(), Owner::Static);
        Ok(())
    }

    fn insert_path(&mut self, path: &str) -> Result<(), RegisterError> {
        self.matcher
            .insert(path, ())
            .map_err(|source| RegisterError::InvalidPath {
                path: path.to_string(),
                source,
            })
    }

    /// Build the axum router serving this table
    pub(crate) fn into_router(self, body_limit: usize) -> Router {
        let mut router = Router::new();

        for (path, endpoint) in self.endpoints {
            let endpoint = Arc::new(endpoint);
            router = router.route(
                &path,
                any(move |params: RawPathParams, request: Request| {
                    dispatch(Arc::clone(&endpoint), params, request, body_limit)
                }),
            );
        }

        for mount in self.statics {
            router = router.merge(mount.into_router());
        }

        router
    }
}

impl StaticMount {
    fn into_router(self) -> Router {
        let router = match self.target {
            StaticTarget::File(file) => Router::new().route_service(&self.path, ServeFile::new(file)),
            StaticTarget::Dir { root, index } => {
                let service = ServeDir::new(root).append_index_html_on_directories(index);
                if self.path == "/" {
                    Router::new().fallback_service(service)
                } else {
                    Router::new().nest_service(&self.path, service)
                }
            }
        };

        if self.chain.is_empty() {
            return router;
        }

        let chain = Arc::new(self.chain);
        router.layer(middleware::from_fn(move |request: Request, next: Next| {
            guard(Arc::clone(&chain), request, next)
        }))
    }
}

/// Run the group chain in front of a static service
async fn guard(chain: Arc<HandlersChain>, request: Request, next: Next) -> Response {
    let mut context = Context::new(
        request.method().clone(),
        request.uri().clone(),
        request.headers().clone(),
    );
    context.run(chain.as_ref().clone());
    if context.is_aborted() {
        return context.into_response();
    }
    drop(context);

    next.run(request).await
}

async fn dispatch(endpoint: Arc<Endpoint>, params: RawPathParams, request: Request, body_limit: usize) -> Response {
    let params: Vec<(String, String)> = params
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    let (parts, body) = request.into_parts();

    let Some(chain) = endpoint.get(&parts.method).cloned() else {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    };

    let body = match to_bytes(body, body_limit).await {
        Ok(body) => body,
        Err(err) => {
            tracing::warn!(error = %err, path = parts.uri.path(), "failed to read request body");
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
    };

    let mut context = Context::new(parts.method, parts.uri, parts.headers)
        .with_body(body)
        .with_params(params);
    context.run(chain);
    context.into_response()
}

fn require_absolute(path: &str) -> Result<(), RegisterError> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(RegisterError::RelativePath(path.to_string()))
    }
}

fn method_of(verb: Verb) -> Method {
    match verb {
        Verb::Get => Method::GET,
        Verb::Head => Method::HEAD,
        Verb::Post => Method::POST,
        Verb::Put => Method::PUT,
        Verb::Patch => Method::PATCH,
        Verb::Delete => Method::DELETE,
        Verb::Connect => Method::CONNECT,
        Verb::Options => Method::OPTIONS,
        Verb::Trace => Method::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_duplicate_route() {
        let mut table = RouteTable::default();
        table.add_route(Verb::Get, "/ping".into(), Vec::new()).unwrap();
        table.add_route(Verb::Post, "/ping".into(), Vec::new()).unwrap();

        let err = table.add_route(Verb::Get, "/ping".into(), Vec::new()).unwrap_err();
        assert!(matches!(err, RegisterError::Duplicate { .. }));
        assert_eq!(err.to_string(), "handler for GET \"/ping\" is already registered");
        assert_eq!(table.routes().len(), 2);
    }

    #[test]
    fn test_invalid_wildcards() {
        let mut table = RouteTable::default();
        assert!(matches!(
            table.add_route(Verb::Get, "/user/*".into(), Vec::new()),
            Err(RegisterError::InvalidPath { .. })
        ));
        assert!(matches!(
            table.add_route(Verb::Get, "/user/:/name".into(), Vec::new()),
            Err(RegisterError::InvalidPath { .. })
        ));
        assert!(table.add_route(Verb::Get, "/user/:id".into(), Vec::new()).is_ok());
        assert!(table.routes().iter().all(|route| route.path == "/user/:id"));
    }

    #[test]
    fn test_relative_path_rejected() {
        let mut table = RouteTable::default();
        assert!(matches!(
            table.add_route(Verb::Get, "ping".into(), Vec::new()),
            Err(RegisterError::RelativePath(_))
        ));
    }

    fn assets_dir() -> StaticTarget {
        StaticTarget::Dir {
            root: "public".into(),
            index: false,
        }
    }

    #[test]
    fn test_dir_mount_reserves_trailing_slash() {
        let mut table = RouteTable::default();
        table.add_static("/assets".into(), assets_dir(), Vec::new()).unwrap();

        let err = table.add_route(Verb::Get, "/assets/".into(), Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            RegisterError::Conflict {
                existing: "static",
                ..
            }
        ));
        assert_eq!(err.to_string(), "\"/assets/\" is already registered as a static route");
    }

    #[test]
    fn test_trailing_slash_route_blocks_dir_mount() {
        let mut table = RouteTable::default();
        table.add_route(Verb::Get, "/assets/".into(), Vec::new()).unwrap();

        let err = table.add_static("/assets".into(), assets_dir(), Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            RegisterError::Conflict {
                existing: "dynamic",
                ..
            }
        ));
        assert_eq!(table.routes(), &[RouteInfo::new("GET", "/assets/")]);

        // Nothing of the refused mount is left behind
        assert!(table.add_route(Verb::Get, "/assets".into(), Vec::new()).is_ok());
    }

    #[test]
    fn test_static_rules() {
        let mut table = RouteTable::default();
        table
            .add_static("/code".into(), StaticTarget::File("./src/lib.rs".into()), Vec::new())
            .unwrap();

        assert!(matches!(
            table.add_route(Verb::Get, "/code".into(), Vec::new()),
            Err(RegisterError::Conflict { existing: "static", .. })
        ));
        assert!(matches!(
            table.add_static("/file/:name".into(), StaticTarget::File("x".into()), Vec::new()),
            Err(RegisterError::StaticParams(_))
        ));

        table
            .add_static(
                "/assets".into(),
                StaticTarget::Dir {
                    root: "public".into(),
                    index: false,
                },
                Vec::new(),
            )
            .unwrap();
        assert_eq!(
            table.routes(),
            &[
                RouteInfo::new("GET", "/code"),
                RouteInfo::new("HEAD", "/code"),
                RouteInfo::new("GET", "/assets/*filepath"),
                RouteInfo::new("HEAD", "/assets/*filepath"),
            ]
        );
    }
}
