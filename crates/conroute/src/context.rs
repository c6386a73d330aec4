// File: src/context.rs
// Purpose: Per-request context handed to every handler and middleware

use axum::body::{Body, Bytes};
use axum::http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;

use crate::handler::HandlersChain;

/// Request context passed along a handler chain
///
/// Carries the request (method, path, headers, query, path params, body),
/// a key/value store middleware uses to hand data to later handlers, and
/// the response being built.
pub struct Context {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    params: Vec<(String, String)>,
    query: QueryParams,
    cookies: HashMap<String, String>,
    keys: HashMap<String, JsonValue>,

    handlers: HandlersChain,
    index: usize,
    aborted: bool,

    status: StatusCode,
    response_headers: HeaderMap,
    response_body: Option<Bytes>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("method", &self.method)
            .field("path", &self.uri.path())
            .field("status", &self.status)
            .field("aborted", &self.aborted)
            .finish()
    }
}

impl Context {
    /// Create a context for a request without body or path params
    pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        let query = QueryParams::parse(uri.query().unwrap_or_default());
        let cookies = Self::parse_cookies(&headers);

        Self {
            method,
            uri,
            headers,
            body: Bytes::new(),
            params: Vec::new(),
            query,
            cookies,
            keys: HashMap::new(),
            handlers: Vec::new(),
            index: 0,
            aborted: false,
            status: StatusCode::OK,
            response_headers: HeaderMap::new(),
            response_body: None,
        }
    }

    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    pub fn with_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Parse cookies from Cookie header
    fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
        headers
            .get_all("cookie")
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|header| header.split(';'))
            .filter_map(|cookie| cookie.trim().split_once('='))
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    // ========================================================================
    // Request
    // ========================================================================

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get a request header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Get a query parameter value
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key)
    }

    pub fn query_params(&self) -> &QueryParams {
        &self.query
    }

    /// Get a path parameter captured by `:name` or `*name`
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Deserialize the request body as JSON
    pub fn bind_json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    // ========================================================================
    // Key/value store
    // ========================================================================

    /// Store a value for handlers later in the chain
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
        self.keys.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.keys.get(key)
    }

    /// String value stored under `key`, or empty when absent or not a string
    pub fn get_string(&self, key: &str) -> String {
        self.keys
            .get(key)
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
            .to_string()
    }

    // ========================================================================
    // Chain control
    // ========================================================================

    /// Run `chain` from the start
    pub fn run(&mut self, chain: HandlersChain) {
        self.handlers = chain;
        self.index = 0;
        self.next();
    }

    /// Run the remaining handlers of the chain
    ///
    /// Middleware that wants to act after the handler (timing, logging)
    /// calls this and then inspects the response.
    pub fn next(&mut self) {
        while self.index < self.handlers.len() {
            let handler = Arc::clone(&self.handlers[self.index]);
            self.index += 1;
            handler(self);
        }
    }

    /// Stop the chain: handlers after the current one are not called
    pub fn abort(&mut self) {
        self.aborted = true;
        self.index = self.handlers.len();
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn abort_with_status(&mut self, status: StatusCode) {
        self.status = status;
        self.abort();
    }

    pub fn abort_with_json<T: Serialize>(&mut self, status: StatusCode, value: &T) {
        self.json(status, value);
        self.abort();
    }

    // ========================================================================
    // Response
    // ========================================================================

    pub fn status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn response_status(&self) -> StatusCode {
        self.status
    }

    pub fn response_body(&self) -> Option<&Bytes> {
        self.response_body.as_ref()
    }

    /// Set a response header; invalid names or values are dropped
    pub fn set_header(&mut self, name: &str, value: &str) {
        match (
            HeaderName::try_from(name),
            HeaderValue::try_from(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.response_headers.insert(name, value);
            }
            _ => tracing::warn!(name, "dropping invalid response header"),
        }
    }

    /// Write a plain text response
    pub fn string(&mut self, status: StatusCode, text: impl Into<String>) {
        self.write(
            status,
            HeaderValue::from_static("text/plain; charset=utf-8"),
            Bytes::from(text.into()),
        );
    }

    /// Write a JSON response
    pub fn json<T: Serialize>(&mut self, status: StatusCode, value: &T) {
        match serde_json::to_vec(value) {
            Ok(body) => self.write(
                status,
                HeaderValue::from_static("application/json"),
                Bytes::from(body),
            ),
            Err(err) => {
                tracing::error!(error = %err, path = self.path(), "failed to serialize JSON response");
                self.status = StatusCode::INTERNAL_SERVER_ERROR;
                self.response_body = None;
            }
        }
    }

    fn write(&mut self, status: StatusCode, content_type: HeaderValue, body: Bytes) {
        self.status = status;
        self.response_headers.insert(CONTENT_TYPE, content_type);
        self.response_body = Some(body);
    }
}

impl IntoResponse for Context {
    fn into_response(self) -> Response {
        let body = self.response_body.map(Body::from).unwrap_or_else(Body::empty);
        let mut response = Response::new(body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.response_headers;
        response
    }
}

/// Query parameters from URL
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    params: HashMap<String, String>,
}

impl QueryParams {
    /// Parse a raw query string (`a=1&b=two+words`)
    pub fn parse(raw: &str) -> Self {
        let params = raw
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
            .map(|(key, value)| (decode_component(key), decode_component(value)))
            .collect();
        Self { params }
    }

    /// Get a query parameter value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Get a query parameter as a specific type
    pub fn get_as<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.params.get(key)?.parse().ok()
    }

    pub fn has(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.params
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .unwrap_or(spaced)
}
