//! Procedural macros declaring browser-callable endpoints and their security.
//!
//! # Hilla / Java EE Equivalents
//!
//! | Hilla / Java EE | endpoint-access-codegen |
//! |-----------------|-------------------------|
//! | `@Endpoint` | `#[endpoint]` |
//! | `@Endpoint("orders")` | `#[endpoint("orders")]` |
//! | `@BrowserCallable` | `#[browser_callable]` |
//! | `@EndpointExposed` | `#[endpoint_exposed]` |
//! | `@DenyAll` | `#[deny_all]` |
//! | `@AnonymousAllowed` | `#[anonymous_allowed]` |
//! | `@PermitAll` | `#[permit_all]` |
//! | `@RolesAllowed({"ADMIN"})` | `#[roles_allowed("ADMIN")]` |
//!
//! # Usage
//!
//! ```ignore
//! use endpoint_access::endpoint;
//!
//! pub struct OrderEndpoint;
//!
//! #[endpoint]
//! #[permit_all]
//! impl OrderEndpoint {
//!     pub fn list(&self) -> Vec<Order> { /* any authenticated caller */ }
//!
//!     #[roles_allowed("ADMIN")]
//!     pub fn cancel(&self, id: u64) { /* admins only */ }
//!
//!     #[anonymous_allowed]
//!     pub fn count(&self) -> usize { /* everyone */ }
//! }
//! ```
//!
//! Type-level markers go *after* the `#[endpoint]` attribute so the macro
//! sees and removes them. Method-level markers go on `pub fn` items taking `self`.

use proc_macro::TokenStream;

// Internal modules
mod endpoint;
mod helpers;
mod markers;

use endpoint::Kind;

/// Declares a browser-callable endpoint on an inherent `impl` block.
///
/// # Hilla Equivalent
/// `@Endpoint` / `@Endpoint("name")`
///
/// # Arguments
/// - `"Name"` or `name = "Name"`: endpoint name (default: the type name)
/// - `extends = Parent`: inherit the public methods of a type declared with
///   `#[endpoint_exposed]` (or another endpoint)
///
/// # Usage
/// ```ignore
/// #[endpoint("users", extends = CrudEndpoint)]
/// #[roles_allowed("ADMIN")]
/// impl UserEndpoint {
///     #[permit_all]
///     pub fn me(&self) -> UserInfo { .. }
/// }
/// ```
///
/// All `pub fn` items taking `self` become callable methods; associated
/// functions such as `new()` are skipped. An unmarked method falls back
/// to the markers of the type declaring it; with no marker at either level
/// the method is denied.
#[proc_macro_attribute]
pub fn endpoint(attrs: TokenStream, input: TokenStream) -> TokenStream {
    endpoint::endpoint_impl(Kind::Endpoint, attrs, input)
}

/// Alias for [`macro@endpoint`].
///
/// # Hilla Equivalent
/// `@BrowserCallable`
#[proc_macro_attribute]
pub fn browser_callable(attrs: TokenStream, input: TokenStream) -> TokenStream {
    endpoint::endpoint_impl(Kind::Endpoint, attrs, input)
}

/// Declares a type whose public methods endpoints can inherit.
///
/// # Hilla Equivalent
/// `@EndpointExposed`
///
/// The type is not callable on its own. Its type-level markers apply only to
/// the methods it declares, including when they are inherited.
///
/// # Usage
/// ```ignore
/// #[endpoint_exposed]
/// #[permit_all]
/// impl CrudEndpoint {
///     pub fn list(&self) -> Vec<Item> { .. }
/// }
/// ```
#[proc_macro_attribute]
pub fn endpoint_exposed(attrs: TokenStream, input: TokenStream) -> TokenStream {
    endpoint::endpoint_impl(Kind::Exposed, attrs, input)
}

/// Denies every caller.
///
/// # Java EE Equivalent
/// `@DenyAll`
///
/// Only valid inside an `#[endpoint]` impl block; anywhere else it is a
/// compile error.
#[proc_macro_attribute]
pub fn deny_all(_attrs: TokenStream, input: TokenStream) -> TokenStream {
    markers::misplaced_marker("deny_all", input.into()).into()
}

/// Allows every caller, including anonymous ones.
///
/// # Vaadin Equivalent
/// `@AnonymousAllowed`
///
/// Only valid inside an `#[endpoint]` impl block.
#[proc_macro_attribute]
pub fn anonymous_allowed(_attrs: TokenStream, input: TokenStream) -> TokenStream {
    markers::misplaced_marker("anonymous_allowed", input.into()).into()
}

/// Allows every authenticated caller.
///
/// # Java EE Equivalent
/// `@PermitAll`
///
/// Only valid inside an `#[endpoint]` impl block.
#[proc_macro_attribute]
pub fn permit_all(_attrs: TokenStream, input: TokenStream) -> TokenStream {
    markers::misplaced_marker("permit_all", input.into()).into()
}

/// Allows authenticated callers holding any of the listed roles.
///
/// # Java EE Equivalent
/// `@RolesAllowed({"ADMIN", "USER"})`
///
/// Only valid inside an `#[endpoint]` impl block.
#[proc_macro_attribute]
pub fn roles_allowed(_attrs: TokenStream, input: TokenStream) -> TokenStream {
    markers::misplaced_marker("roles_allowed", input.into()).into()
}
