// File: src/fields.rs
// Purpose: `#[derive(Routable)]` expansion: struct -> field table

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, GenericArgument, LitStr, Member, PathArguments, Type};

const SKIP: &str = "-";

/// Parsed `#[router(...)]` on a field
#[derive(Default)]
struct FieldAttrs {
    tag: Option<String>,
    embed: bool,
}

impl FieldAttrs {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();

        for attr in attrs.iter().filter(|a| a.path().is_ident("router")) {
            // #[router("admin")]
            if let Ok(lit) = attr.parse_args::<LitStr>() {
                out.tag = Some(lit.value());
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    out.tag = Some(SKIP.to_string());
                    Ok(())
                } else if meta.path.is_ident("embed") {
                    out.embed = true;
                    Ok(())
                } else if meta.path.is_ident("path") {
                    let lit: LitStr = meta.value()?.parse()?;
                    out.tag = Some(lit.value());
                    Ok(())
                } else {
                    Err(meta.error("expected `skip`, `embed`, `path = \"...\"` or a path literal"))
                }
            })?;
        }

        Ok(out)
    }
}

/// `#[router(fields_only)]` on the struct
fn fields_only(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut found = false;
    for attr in attrs.iter().filter(|a| a.path().is_ident("router")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("fields_only") {
                found = true;
                Ok(())
            } else {
                Err(meta.error("expected `fields_only`"))
            }
        })?;
    }
    Ok(found)
}

pub fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Routable can only be derived for structs",
            ))
        }
    };

    let mut entries = Vec::new();
    for (index, field) in fields.iter().enumerate() {
        let attrs = FieldAttrs::parse(&field.attrs)?;
        if attrs.tag.as_deref() == Some(SKIP) {
            continue;
        }

        let (member, field_name, embedded) = match &field.ident {
            Some(ident) => {
                let text = ident.to_string();
                let text = text.trim_start_matches("r#").to_string();
                (Member::Named(ident.clone()), text, attrs.embed)
            }
            None => (Member::Unnamed(index.into()), index.to_string(), true),
        };

        let type_name = type_name(&field.ty);
        let tag = match &attrs.tag {
            Some(tag) => quote! { ::std::option::Option::Some(#tag) },
            None => quote! { ::std::option::Option::None },
        };

        entries.push(quote! {
            ::conroute::FieldEntry {
                name: #field_name,
                type_name: #type_name,
                tag: #tag,
                embedded: #embedded,
                value: &self.#member,
            }
        });
    }

    let methods = if fields_only(&input.attrs)? {
        quote! { ::std::vec::Vec::new() }
    } else {
        quote! { <Self as ::conroute::RouteMethods>::route_methods(self) }
    };

    // Unit structs have no fields to borrow
    let fields_body = if matches!(fields, Fields::Unit) {
        quote! { ::std::vec::Vec::new() }
    } else {
        quote! { ::std::vec![#(#entries),*] }
    };

    Ok(quote! {
        impl #impl_generics ::conroute::Routable for #name #ty_generics #where_clause {
            fn methods(&self) -> ::std::vec::Vec<::conroute::MethodEntry> {
                #methods
            }

            fn fields(&self) -> ::std::vec::Vec<::conroute::FieldEntry<'_>> {
                #fields_body
            }
        }
    })
}

/// Pointer wrappers that route through to the type they hold
const WRAPPERS: [&str; 3] = ["Box", "Arc", "Rc"];

/// Last path segment of the field type, e.g. `Admin` for `crate::api::Admin`
/// and for `Box<Admin>`
fn type_name(ty: &Type) -> String {
    match ty {
        Type::Path(path) => {
            let Some(segment) = path.path.segments.last() else {
                return String::new();
            };
            let ident = segment.ident.to_string();
            if !WRAPPERS.contains(&ident.as_str()) {
                return ident;
            }
            match &segment.arguments {
                PathArguments::AngleBracketed(args) => args
                    .args
                    .iter()
                    .find_map(|arg| match arg {
                        GenericArgument::Type(inner) => Some(type_name(inner)),
                        _ => None,
                    })
                    .unwrap_or(ident),
                _ => ident,
            }
        }
        Type::Reference(reference) => type_name(&reference.elem),
        Type::Paren(paren) => type_name(&paren.elem),
        other => quote!(#other).to_string().replace(' ', ""),
    }
}
