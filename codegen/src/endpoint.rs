//! The `#[endpoint]` and `#[endpoint_exposed]` macros.
//!
//! # Hilla Equivalent
//! `@Endpoint` / `@BrowserCallable` and `@EndpointExposed`

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::{parse_macro_input, ImplItem, ItemImpl, LitStr, Token, Type, Visibility};

use crate::helpers::{core_crate_path, simple_type_name};
use crate::markers::{policy_tokens, take_markers};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Callable from the browser.
    Endpoint,
    /// Only contributes methods to endpoints extending it.
    Exposed,
}

impl Kind {
    fn macro_name(self) -> &'static str {
        match self {
            Kind::Endpoint => "endpoint",
            Kind::Exposed => "endpoint_exposed",
        }
    }
}

/// Parsed arguments: `("Name")`, `(name = "Name")`, `(extends = Parent)`, or a mix.
#[derive(Default)]
pub struct EndpointArgs {
    name: Option<LitStr>,
    extends: Option<Type>,
}

impl Parse for EndpointArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = EndpointArgs::default();
        if input.is_empty() {
            return Ok(args);
        }

        if input.peek(LitStr) {
            args.name = Some(input.parse()?);
            if input.is_empty() {
                return Ok(args);
            }
            input.parse::<Token![,]>()?;
        }

        while !input.is_empty() {
            let key: syn::Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match key.to_string().as_str() {
                "name" => {
                    if args.name.is_some() {
                        return Err(syn::Error::new_spanned(key, "endpoint name given twice"));
                    }
                    args.name = Some(input.parse()?);
                }
                "extends" => {
                    if args.extends.is_some() {
                        return Err(syn::Error::new_spanned(key, "only one parent type is supported"));
                    }
                    args.extends = Some(input.parse()?);
                }
                _ => {
                    return Err(syn::Error::new_spanned(
                        key,
                        "expected `name = \"...\"` or `extends = ParentType`",
                    ))
                }
            }

            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }

        Ok(args)
    }
}

pub fn endpoint_impl(kind: Kind, attrs: TokenStream, input: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attrs as EndpointArgs);
    let mut item_impl = parse_macro_input!(input as ItemImpl);

    match expand(kind, args, &mut item_impl) {
        Ok(expanded) => expanded.into(),
        Err(err) => {
            let err = err.to_compile_error();
            quote! {
                #err
                #item_impl
            }
            .into()
        }
    }
}

fn expand(kind: Kind, args: EndpointArgs, item_impl: &mut ItemImpl) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &item_impl.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            format!(
                "#[{}] must be placed on an inherent impl block, not a trait impl",
                kind.macro_name()
            ),
        ));
    }
    if kind == Kind::Exposed {
        if let Some(name) = &args.name {
            return Err(syn::Error::new_spanned(
                name,
                "#[endpoint_exposed] types are not callable and take no name",
            ));
        }
    }

    let type_policy = policy_tokens(&take_markers(&mut item_impl.attrs)?);

    let mut method_names = Vec::new();
    let mut method_policies = Vec::new();
    for item in item_impl.items.iter_mut() {
        let ImplItem::Fn(method) = item else {
            continue;
        };
        let markers = take_markers(&mut method.attrs)?;

        // constructors and other associated fns are not callable
        let callable =
            matches!(method.vis, Visibility::Public(_)) && method.sig.receiver().is_some();
        if callable {
            method_names.push(method.sig.ident.to_string());
            method_policies.push(policy_tokens(&markers));
        } else if !markers.is_empty() {
            return Err(syn::Error::new_spanned(
                &method.sig.ident,
                "security attributes only apply to `pub` endpoint methods taking `self`",
            ));
        }
    }

    let core_path = core_crate_path();
    let self_ty = &item_impl.self_ty;
    let simple_name = simple_type_name(self_ty)?;
    let (impl_generics, _, where_clause) = item_impl.generics.split_for_impl();

    let endpoint_call = match (kind, &args.name) {
        (Kind::Endpoint, Some(name)) => {
            quote! { .endpoint(::std::option::Option::Some(#name)) }
        }
        (Kind::Endpoint, None) => quote! { .endpoint(::std::option::Option::None) },
        (Kind::Exposed, _) => quote! {},
    };

    let extends_call = args.extends.as_ref().map(|parent| {
        quote! {
            .extends(<#parent as #core_path::http::security::EndpointType>::definition())
        }
    });

    Ok(quote! {
        #item_impl

        impl #impl_generics #core_path::http::security::EndpointType for #self_ty #where_clause {
            fn definition() -> #core_path::http::security::TypeDefinition {
                #core_path::http::security::TypeDefinition::new(
                    ::std::any::type_name::<Self>(),
                    #simple_name,
                )
                #endpoint_call
                .policy(#type_policy)
                #(.method(#method_names, #method_policies))*
                #extends_call
            }
        }
    })
}
