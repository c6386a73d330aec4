// File: src/facade.rs
// Purpose: Router facade between the binder and a routing backend

use std::path::PathBuf;

use conroute_naming::{classify, parse_name, Action, StaticKind, Verb};

use crate::error::{BindError, RegisterError};
use crate::handler::{HandlerFunc, HandlersChain};
use crate::routable::{MethodEntry, MethodKind};

/// A backend routing scope: a path prefix plus its middleware chain
///
/// The binder only talks to backends through this trait. Implementations
/// report rejected registrations as [`RegisterError`]s instead of
/// panicking.
pub trait RouteGroup {
    /// Absolute path prefix of this group
    fn base_path(&self) -> &str;

    /// Child group at `relative`, inheriting this group's middleware
    fn group(&self, relative: &str) -> Box<dyn RouteGroup>;

    /// Append middleware for routes registered afterwards
    fn use_handlers(&mut self, handlers: HandlersChain);

    /// Register `handler` for `verb` at `relative`; an empty path is the group root
    fn handle(&mut self, verb: Verb, relative: &str, handler: HandlerFunc) -> Result<(), RegisterError>;

    fn register_static(&mut self, route: StaticRoute) -> Result<(), RegisterError>;
}

/// Directory served by a filesystem-backed static route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystem {
    pub root: PathBuf,
    /// Serve `index.html` for directory requests
    pub index: bool,
}

impl FileSystem {
    pub fn dir(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            index: false,
        }
    }

    pub fn with_index(mut self, index: bool) -> Self {
        self.index = index;
        self
    }
}

/// Arguments returned by a static action, before they are checked
/// against the action's kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticArgs {
    /// `(mount, path)`
    Paths(String, String),
    /// `(mount, filesystem)`
    Fs(String, FileSystem),
    /// `(mount, file, filesystem)`
    FileInFs(String, String, FileSystem),
}

impl StaticArgs {
    fn describe(&self) -> &'static str {
        match self {
            StaticArgs::Paths(..) => "(mount, path)",
            StaticArgs::Fs(..) => "(mount, filesystem)",
            StaticArgs::FileInFs(..) => "(mount, file, filesystem)",
        }
    }
}

/// A static route ready for the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticRoute {
    /// A single file
    File { mount: String, file: PathBuf },
    /// A single file inside a filesystem
    FileFs {
        mount: String,
        file: String,
        fs: FileSystem,
    },
    /// A directory tree
    Dir { mount: String, root: PathBuf },
    /// A filesystem
    Fs { mount: String, fs: FileSystem },
}

impl StaticRoute {
    /// Check returned arguments against the kind the method name selected
    pub fn from_args(kind: StaticKind, args: StaticArgs) -> Result<Self, RegisterError> {
        match (kind, args) {
            (StaticKind::File, StaticArgs::Paths(mount, file)) => Ok(StaticRoute::File {
                mount,
                file: file.into(),
            }),
            (StaticKind::Dir, StaticArgs::Paths(mount, root)) => Ok(StaticRoute::Dir {
                mount,
                root: root.into(),
            }),
            (StaticKind::Fs, StaticArgs::Fs(mount, fs)) => Ok(StaticRoute::Fs { mount, fs }),
            (StaticKind::FileFs, StaticArgs::FileInFs(mount, file, fs)) => {
                Ok(StaticRoute::FileFs { mount, file, fs })
            }
            (kind, args) => Err(RegisterError::Signature {
                expected: expected_args(kind),
                found: args.describe(),
            }),
        }
    }

    pub fn kind(&self) -> StaticKind {
        match self {
            StaticRoute::File { .. } => StaticKind::File,
            StaticRoute::FileFs { .. } => StaticKind::FileFs,
            StaticRoute::Dir { .. } => StaticKind::Dir,
            StaticRoute::Fs { .. } => StaticKind::Fs,
        }
    }

    pub fn mount(&self) -> &str {
        match self {
            StaticRoute::File { mount, .. }
            | StaticRoute::FileFs { mount, .. }
            | StaticRoute::Dir { mount, .. }
            | StaticRoute::Fs { mount, .. } => mount,
        }
    }
}

fn expected_args(kind: StaticKind) -> &'static str {
    match kind {
        StaticKind::File | StaticKind::Dir => "(mount, path)",
        StaticKind::Fs => "(mount, filesystem)",
        StaticKind::FileFs => "(mount, file, filesystem)",
    }
}

/// Registers classified methods on one group
///
/// Turns a method entry into either `handle(verb, path, handler)` or
/// `register_static(route)`, attaching the method name to any failure.
pub struct Registrar<'g> {
    group: &'g mut dyn RouteGroup,
}

impl<'g> Registrar<'g> {
    pub fn new(group: &'g mut dyn RouteGroup) -> Self {
        Self { group }
    }

    /// Bind one method; names outside the action vocabulary are skipped
    ///
    /// Returns whether a route was registered.
    pub fn bind(&mut self, entry: MethodEntry) -> Result<bool, BindError> {
        let Some(token) = classify(entry.name) else {
            tracing::trace!(method = entry.name, "not an action, skipping");
            return Ok(false);
        };
        let name = entry.name;

        match (token.action, entry.kind) {
            (Action::Verb(verb), MethodKind::Handler(handler)) => {
                let path = parse_name(token.remainder);
                tracing::debug!(
                    method = name,
                    verb = %verb,
                    path = %path,
                    base = self.group.base_path(),
                    "registering route"
                );
                self.group
                    .handle(verb, &path, handler)
                    .map_err(|source| registration(name, source))?;
            }
            (Action::Static(kind), MethodKind::Thunk(thunk)) => {
                let args = thunk().map_err(|source| BindError::Invocation {
                    method: name.to_string(),
                    source,
                })?;
                let route = StaticRoute::from_args(kind, args).map_err(|source| registration(name, source))?;
                tracing::debug!(
                    method = name,
                    kind = %kind,
                    mount = route.mount(),
                    base = self.group.base_path(),
                    "registering static route"
                );
                self.group
                    .register_static(route)
                    .map_err(|source| registration(name, source))?;
            }
            (Action::Verb(_), kind) => {
                return Err(registration(
                    name,
                    RegisterError::Signature {
                        expected: "a handler taking the request context",
                        found: kind.describe(),
                    },
                ));
            }
            (Action::Static(_), kind) => {
                return Err(registration(
                    name,
                    RegisterError::Signature {
                        expected: "a method returning static route arguments",
                        found: kind.describe(),
                    },
                ));
            }
        }

        Ok(true)
    }
}

fn registration(method: &str, source: RegisterError) -> BindError {
    BindError::Registration {
        method: method.to_string(),
        source,
    }
}
