// conroute Procedural Macros
// Build the method and field tables that convention routing walks

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, ItemImpl};

mod fields;
mod methods;

/// Method table for an inherent impl block
///
/// Every `&self` method whose name is `Use` or starts with an action prefix
/// (`Get`, `Post`, ..., `Static`) is entered into the type's method table;
/// other methods are left alone. One `#[routes]` block per type.
///
/// # Method shapes
///
/// - `fn GetPing(&self, c: &mut Context)`: handler for `GET /ping`
/// - `fn StaticFileIcon(&self) -> (&str, &str)`: static mount, the tuple
///   holds the mount path and the file
/// - `fn Use(&self, c: &mut Context)`: middleware for this level
/// - `fn Use(&self) -> Vec<HandlerFunc>`: middleware list for this level
/// - `fn Use(&self, g: &mut dyn RouteGroup)`: register routes by hand
///
/// # Examples
///
/// ```ignore
/// #[derive(Clone, Routable)]
/// struct Admin;
///
/// #[routes]
/// impl Admin {
///     fn Use(&self, c: &mut Context) {
///         if c.get_string("uid") != "admin" {
///             c.abort_with_status(StatusCode::UNAUTHORIZED);
///         }
///     }
///
///     // GET /admin/data when bound under `#[router("admin")]`
///     fn GetData(&self, c: &mut Context) {
///         c.string(StatusCode::OK, "some important data.");
///     }
///
///     fn StaticFileCode(&self) -> (&'static str, &'static str) {
///         ("/code", "./src/main.rs")
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn routes(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemImpl);
    methods::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Field table for a struct
///
/// Named fields become sub-groups named after the field, tuple fields are
/// embedded and share the parent group.
///
/// # Field attributes
///
/// - `#[router("admin")]`: sub-group at `admin`
/// - `#[router("-")]` or `#[router(skip)]`: not routed; the field's type
///   need not implement `Routable`
/// - `#[router(embed)]`: share the parent group
///
/// # Struct attributes
///
/// - `#[router(fields_only)]`: the type has no `#[routes]` block
///
/// # Example
///
/// ```ignore
/// #[derive(Clone, Routable)]
/// #[router(fields_only)]
/// struct Main {
///     #[router(embed)]
///     auth: Auth,
///     #[router("admin")]
///     admin: Admin,
///     #[router(skip)]
///     settings: Settings,
/// }
/// ```
#[proc_macro_derive(Routable, attributes(router))]
pub fn derive_routable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    fields::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
