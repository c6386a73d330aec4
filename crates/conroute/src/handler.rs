// File: src/handler.rs
// Purpose: Handler function types shared by the binder and the backend

use std::sync::Arc;

use crate::context::Context;

/// A request handler or middleware
///
/// Handlers and middleware share one shape: both receive the request
/// context, and middleware decides whether the rest of the chain runs via
/// [`Context::next`] / [`Context::abort`].
pub type HandlerFunc = Arc<dyn Fn(&mut Context) + Send + Sync + 'static>;

/// Ordered handler chain: group middleware first, route handler last
pub type HandlersChain = Vec<HandlerFunc>;

/// Wraps a closure as a [`HandlerFunc`]
///
/// # Examples
///
/// ```
/// use conroute::{handler_fn, Context, StatusCode};
///
/// let auth = handler_fn(|c: &mut Context| {
///     if c.header("authorization").is_none() {
///         c.abort_with_status(StatusCode::UNAUTHORIZED);
///     }
/// });
/// # let _ = auth;
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFunc
where
    F: Fn(&mut Context) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Appends `handler` to a copy of `chain`
pub(crate) fn combine(chain: &[HandlerFunc], handler: HandlerFunc) -> HandlersChain {
    let mut combined = Vec::with_capacity(chain.len() + 1);
    combined.extend(chain.iter().cloned());
    combined.push(handler);
    combined
}
