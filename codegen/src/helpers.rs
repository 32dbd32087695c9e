//! Common helper functions for endpoint macros.

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Type, TypePath};

/// Path generated code uses to reach the runtime types.
///
/// The macros are re-exported by the `endpoint-access` facade crate, which
/// also re-exports the core crate at its root.
pub fn core_crate_path() -> TokenStream2 {
    quote! { ::endpoint_access }
}

/// Returns the last path segment of the impl's self type, e.g. `OrderEndpoint`.
pub fn simple_type_name(ty: &Type) -> syn::Result<String> {
    match ty {
        Type::Path(TypePath { qself: None, path }) => path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .ok_or_else(|| syn::Error::new_spanned(ty, "expected a named type")),
        _ => Err(syn::Error::new_spanned(
            ty,
            "endpoint macros only support named types, e.g. `impl OrderEndpoint`",
        )),
    }
}
