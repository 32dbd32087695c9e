//! Security marker attributes: deny_all, anonymous_allowed, permit_all, roles_allowed.
//!
//! # Java EE Equivalents
//! - `@DenyAll` -> `#[deny_all]`
//! - `@AnonymousAllowed` -> `#[anonymous_allowed]`
//! - `@PermitAll` -> `#[permit_all]`
//! - `@RolesAllowed({"ADMIN", "USER"})` -> `#[roles_allowed("ADMIN", "USER")]`

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ExprLit, Lit, Token};

use crate::helpers::core_crate_path;

pub const MARKER_NAMES: [&str; 4] = ["deny_all", "anonymous_allowed", "permit_all", "roles_allowed"];

/// A marker attribute found on an impl block or a method.
pub enum MarkerAttr {
    DenyAll,
    AnonymousAllowed,
    PermitAll,
    /// String literals or paths to `&str` constants.
    RolesAllowed(Vec<Expr>),
}

pub fn is_marker(attr: &Attribute) -> bool {
    MARKER_NAMES.iter().any(|name| attr.path().is_ident(name))
}

fn parse_marker(attr: &Attribute) -> syn::Result<MarkerAttr> {
    let path = attr.path();

    if path.is_ident("roles_allowed") {
        let args = attr.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated)?;
        let mut roles = Vec::new();
        for arg in args {
            match arg {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(_), ..
                })
                | Expr::Path(_) => roles.push(arg),
                _ => {
                    return Err(syn::Error::new_spanned(
                        arg,
                        r#"expected string literal like "ADMIN" or a constant like ROLE_ADMIN"#,
                    ))
                }
            }
        }
        return Ok(MarkerAttr::RolesAllowed(roles));
    }

    attr.meta.require_path_only()?;
    if path.is_ident("deny_all") {
        Ok(MarkerAttr::DenyAll)
    } else if path.is_ident("anonymous_allowed") {
        Ok(MarkerAttr::AnonymousAllowed)
    } else {
        Ok(MarkerAttr::PermitAll)
    }
}

/// Removes the marker attributes from `attrs` and returns them parsed.
pub fn take_markers(attrs: &mut Vec<Attribute>) -> syn::Result<Vec<MarkerAttr>> {
    let mut markers = Vec::new();
    let mut kept = Vec::with_capacity(attrs.len());

    for attr in attrs.drain(..) {
        if is_marker(&attr) {
            markers.push(parse_marker(&attr)?);
        } else {
            kept.push(attr);
        }
    }

    *attrs = kept;
    Ok(markers)
}

/// Builds the `ScopePolicy` expression for a set of markers.
pub fn policy_tokens(markers: &[MarkerAttr]) -> TokenStream2 {
    let core_path = core_crate_path();

    let calls = markers.iter().map(|marker| match marker {
        MarkerAttr::DenyAll => quote! { .deny_all() },
        MarkerAttr::AnonymousAllowed => quote! { .anonymous_allowed() },
        MarkerAttr::PermitAll => quote! { .permit_all() },
        MarkerAttr::RolesAllowed(roles) => quote! { .roles_allowed(&[#(#roles),*]) },
    });

    quote! {
        #core_path::http::auth::ScopePolicy::unspecified() #(#calls)*
    }
}

/// Expansion of a marker used outside an endpoint impl block.
pub fn misplaced_marker(name: &str, item: TokenStream2) -> TokenStream2 {
    let message = format!(
        "#[{}] must be placed inside an #[endpoint] or #[endpoint_exposed] impl block, \
         after the #[endpoint] attribute",
        name
    );
    quote! {
        ::std::compile_error!(#message);
        #item
    }
}
