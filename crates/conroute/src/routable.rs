// File: src/routable.rs
// Purpose: Method and field tables that stand in for runtime reflection

use std::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::error::InvocationError;
use crate::facade::{RouteGroup, StaticArgs};
use crate::handler::{HandlerFunc, HandlersChain};

/// Static action body: produces the arguments of one static route
pub type StaticThunk = Box<dyn Fn() -> Result<StaticArgs, InvocationError>>;

/// `Use` body returning a middleware list
pub type ChainThunk = Box<dyn Fn() -> HandlersChain>;

/// Body that registers routes on a group by hand
pub type GroupHook = Box<dyn Fn(&mut dyn RouteGroup)>;

/// Call shape of a method
///
/// The binder checks the shape against what the method's name asks for,
/// e.g. a `Get...` method must be a [`MethodKind::Handler`].
pub enum MethodKind {
    /// `fn(&self, &mut Context)`
    Handler(HandlerFunc),
    /// `fn(&self) -> impl IntoStaticArgs`
    Thunk(StaticThunk),
    /// `fn(&self) -> impl IntoIterator<Item = HandlerFunc>`
    Chain(ChainThunk),
    /// `fn(&self, &mut dyn RouteGroup)`
    Hook(GroupHook),
    /// Any other shape
    Opaque,
}

impl MethodKind {
    pub fn describe(&self) -> &'static str {
        match self {
            MethodKind::Handler(_) => "a handler taking the request context",
            MethodKind::Thunk(_) => "a method returning static route arguments",
            MethodKind::Chain(_) => "a method returning a handler list",
            MethodKind::Hook(_) => "a method taking a route group",
            MethodKind::Opaque => "an unsupported signature",
        }
    }
}

impl fmt::Debug for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MethodKind::Handler(_) => "Handler",
            MethodKind::Thunk(_) => "Thunk",
            MethodKind::Chain(_) => "Chain",
            MethodKind::Hook(_) => "Hook",
            MethodKind::Opaque => "Opaque",
        };
        f.write_str(name)
    }
}

/// One method of a routable type
#[derive(Debug)]
pub struct MethodEntry {
    pub name: &'static str,
    pub kind: MethodKind,
    /// Visible on the type only through an embedded field
    ///
    /// Promoted methods are bound when the embedded value itself is walked,
    /// never at the embedding level.
    pub promoted: bool,
}

impl MethodEntry {
    pub fn new(name: &'static str, kind: MethodKind) -> Self {
        Self {
            name,
            kind,
            promoted: false,
        }
    }

    pub fn handler<F>(name: &'static str, f: F) -> Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        Self::new(name, MethodKind::Handler(Arc::new(f)))
    }

    pub fn thunk<F, A>(name: &'static str, f: F) -> Self
    where
        F: Fn() -> A + 'static,
        A: IntoStaticArgs,
    {
        Self::new(name, MethodKind::Thunk(Box::new(move || f().into_static_args())))
    }

    pub fn chain<F, I>(name: &'static str, f: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = HandlerFunc>,
    {
        Self::new(name, MethodKind::Chain(Box::new(move || f().into_iter().collect())))
    }

    pub fn hook<F>(name: &'static str, f: F) -> Self
    where
        F: Fn(&mut dyn RouteGroup) + 'static,
    {
        Self::new(name, MethodKind::Hook(Box::new(f)))
    }

    pub fn opaque(name: &'static str) -> Self {
        Self::new(name, MethodKind::Opaque)
    }

    /// Mark as reachable only through embedding
    pub fn promoted(mut self) -> Self {
        self.promoted = true;
        self
    }
}

/// One nested field of a routable type
pub struct FieldEntry<'a> {
    pub name: &'static str,
    pub type_name: &'static str,
    /// Value of `#[router("...")]`, `"-"` excludes the field
    pub tag: Option<&'static str>,
    /// Anonymous field: shares the parent's group
    pub embedded: bool,
    pub value: &'a dyn Routable,
}

impl fmt::Debug for FieldEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldEntry")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("tag", &self.tag)
            .field("embedded", &self.embedded)
            .finish()
    }
}

/// A value whose shape describes routes
///
/// Usually implemented with `#[derive(Routable)]` on the struct plus
/// `#[routes]` on its impl block.
pub trait Routable {
    /// Methods declared on this type, in declaration order
    fn methods(&self) -> Vec<MethodEntry>;

    /// Nested fields, in declaration order
    fn fields(&self) -> Vec<FieldEntry<'_>>;
}

/// Method table of a type, generated by `#[routes]`
pub trait RouteMethods {
    fn route_methods(&self) -> Vec<MethodEntry>;
}

impl<T: Routable + ?Sized> Routable for Box<T> {
    fn methods(&self) -> Vec<MethodEntry> {
        (**self).methods()
    }

    fn fields(&self) -> Vec<FieldEntry<'_>> {
        (**self).fields()
    }
}

impl<T: Routable + ?Sized> Routable for Arc<T> {
    fn methods(&self) -> Vec<MethodEntry> {
        (**self).methods()
    }

    fn fields(&self) -> Vec<FieldEntry<'_>> {
        (**self).fields()
    }
}

/// Conversion of a static action's return value into route arguments
///
/// Implemented for the supported argument tuples and for `Result`s of
/// them, whose `Err` becomes an invocation failure.
pub trait IntoStaticArgs {
    fn into_static_args(self) -> Result<StaticArgs, InvocationError>;
}

impl IntoStaticArgs for StaticArgs {
    fn into_static_args(self) -> Result<StaticArgs, InvocationError> {
        Ok(self)
    }
}

impl IntoStaticArgs for (&str, &str) {
    fn into_static_args(self) -> Result<StaticArgs, InvocationError> {
        Ok(StaticArgs::Paths(self.0.to_string(), self.1.to_string()))
    }
}

impl IntoStaticArgs for (String, String) {
    fn into_static_args(self) -> Result<StaticArgs, InvocationError> {
        Ok(StaticArgs::Paths(self.0, self.1))
    }
}

impl IntoStaticArgs for (&str, crate::facade::FileSystem) {
    fn into_static_args(self) -> Result<StaticArgs, InvocationError> {
        Ok(StaticArgs::Fs(self.0.to_string(), self.1))
    }
}

impl IntoStaticArgs for (String, crate::facade::FileSystem) {
    fn into_static_args(self) -> Result<StaticArgs, InvocationError> {
        Ok(StaticArgs::Fs(self.0, self.1))
    }
}

impl IntoStaticArgs for (&str, &str, crate::facade::FileSystem) {
    fn into_static_args(self) -> Result<StaticArgs, InvocationError> {
        Ok(StaticArgs::FileInFs(self.0.to_string(), self.1.to_string(), self.2))
    }
}

impl IntoStaticArgs for (String, String, crate::facade::FileSystem) {
    fn into_static_args(self) -> Result<StaticArgs, InvocationError> {
        Ok(StaticArgs::FileInFs(self.0, self.1, self.2))
    }
}

impl<T, E> IntoStaticArgs for Result<T, E>
where
    T: IntoStaticArgs,
    E: fmt::Display,
{
    fn into_static_args(self) -> Result<StaticArgs, InvocationError> {
        self.map_err(|err| InvocationError(err.to_string()))?
            .into_static_args()
    }
}
