// File: src/methods.rs
// Purpose: `#[routes]` expansion: impl block -> RouteMethods table

use conroute_naming::{classify, Action, USE_METHOD};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{FnArg, ImplItem, ImplItemFn, ItemImpl, ReturnType, Type};

/// What a method's name asks for
enum Role {
    Use,
    Verb,
    Static,
}

/// Call shape, mirrors `MethodKind` on the runtime side
enum Shape {
    Handler,
    Thunk,
    Chain,
    Hook,
    Opaque,
}

pub fn expand(input: ItemImpl) -> syn::Result<TokenStream> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[routes] goes on an inherent impl block",
        ));
    }

    let entries: Vec<TokenStream> = input
        .items
        .iter()
        .filter_map(|item| match item {
            ImplItem::Fn(method) => entry(method),
            _ => None,
        })
        .collect();

    let self_ty = &input.self_ty;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        #[allow(non_snake_case)]
        #input

        impl #impl_generics ::conroute::RouteMethods for #self_ty #where_clause {
            fn route_methods(&self) -> ::std::vec::Vec<::conroute::MethodEntry> {
                ::std::vec![#(#entries),*]
            }
        }
    })
}

fn role_of(name: &str) -> Option<Role> {
    if name == USE_METHOD {
        return Some(Role::Use);
    }
    match classify(name)?.action {
        Action::Verb(_) => Some(Role::Verb),
        Action::Static(_) => Some(Role::Static),
    }
}

/// Table entry for one method, `None` when the method is not routing-relevant
fn entry(method: &ImplItemFn) -> Option<TokenStream> {
    let ident = &method.sig.ident;
    let name = ident.to_string();
    let role = role_of(&name)?;

    // Associated functions have no receiver and are not part of the table
    let receiver = match method.sig.inputs.first() {
        Some(FnArg::Receiver(receiver)) => receiver,
        _ => return None,
    };

    let plain = receiver.reference.is_some()
        && receiver.mutability.is_none()
        && method.sig.asyncness.is_none()
        && method.sig.generics.params.is_empty();

    let shape = if plain { shape_of(method, &role) } else { Shape::Opaque };

    let body = match shape {
        Shape::Handler => quote! {
            ::conroute::MethodEntry::handler(#name, move |c: &mut ::conroute::Context| {
                this.#ident(c);
            })
        },
        Shape::Hook => quote! {
            ::conroute::MethodEntry::hook(#name, move |g: &mut dyn ::conroute::RouteGroup| {
                this.#ident(g);
            })
        },
        Shape::Thunk => quote! {
            ::conroute::MethodEntry::thunk(#name, move || {
                ::conroute::IntoStaticArgs::into_static_args(this.#ident())
            })
        },
        Shape::Chain => quote! {
            ::conroute::MethodEntry::chain(#name, move || {
                ::std::iter::IntoIterator::into_iter(this.#ident())
                    .collect::<::std::vec::Vec<::conroute::HandlerFunc>>()
            })
        },
        Shape::Opaque => return Some(quote! { ::conroute::MethodEntry::opaque(#name) }),
    };

    Some(quote! {
        {
            let this = ::std::clone::Clone::clone(self);
            #body
        }
    })
}

fn shape_of(method: &ImplItemFn, role: &Role) -> Shape {
    let args: Vec<&Type> = method
        .sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(pat) => Some(pat.ty.as_ref()),
            FnArg::Receiver(_) => None,
        })
        .collect();
    let returns = !matches!(method.sig.output, ReturnType::Default);

    match (role, args.as_slice(), returns) {
        (Role::Use, [arg], _) if takes_group(arg) => Shape::Hook,
        (Role::Use, [_], _) => Shape::Handler,
        (Role::Use, [], true) => Shape::Chain,
        (Role::Verb, [arg], _) if takes_group(arg) => Shape::Hook,
        (Role::Verb, [_], _) => Shape::Handler,
        (Role::Static, [], true) => Shape::Thunk,
        _ => Shape::Opaque,
    }
}

/// `&mut dyn RouteGroup` and friends
fn takes_group(ty: &Type) -> bool {
    match ty {
        Type::Reference(reference) => takes_group(&reference.elem),
        Type::Paren(paren) => takes_group(&paren.elem),
        Type::TraitObject(_) => true,
        _ => false,
    }
}
