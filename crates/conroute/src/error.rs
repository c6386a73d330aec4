// File: src/error.rs
// Purpose: Error types for binding, registration and configuration

use thiserror::Error;

/// A routing backend refused a registration
#[derive(Debug, Error)]
pub enum RegisterError {
    /// The path is not a valid route (unnamed wildcard, misplaced catch-all, ...)
    #[error("invalid route path \"{path}\": {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: matchit::InsertError,
    },

    #[error("route path \"{0}\" must begin with '/'")]
    RelativePath(String),

    #[error("handler for {method} \"{path}\" is already registered")]
    Duplicate { method: String, path: String },

    #[error("\"{path}\" is already registered as a {existing} route")]
    Conflict { path: String, existing: &'static str },

    #[error("URL parameters can not be used when serving a static file: \"{0}\"")]
    StaticParams(String),

    /// The method's shape does not fit the action its name selects
    #[error("expected {expected}, found {found}")]
    Signature {
        expected: &'static str,
        found: &'static str,
    },
}

/// A static action failed to produce its route arguments
#[derive(Debug, Error)]
#[error("{0}")]
pub struct InvocationError(pub String);

/// Binding aborted on the first failing method
///
/// Routes registered before the failure stay registered.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("method \"{method}\" error: {source}")]
    Registration {
        method: String,
        #[source]
        source: RegisterError,
    },

    #[error("method \"{method}\" error: {source}")]
    Invocation {
        method: String,
        #[source]
        source: InvocationError,
    },
}

impl BindError {
    /// Name of the method that aborted binding
    pub fn method(&self) -> &str {
        match self {
            BindError::Registration { method, .. } | BindError::Invocation { method, .. } => method,
        }
    }
}

/// Configuration could not be loaded
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
