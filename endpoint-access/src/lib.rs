//! # Endpoint Access
//!
//! Access control for browser-callable endpoints served by Actix Web.
//!
//! This crate provides a unified API combining:
//! - `endpoint-access-core`: Access checker, endpoint registry, middleware
//! - `endpoint-access-codegen`: Procedural macros (`#[endpoint]`, `#[permit_all]`, etc.)
//!
//! ## Quick Start
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! actix-web = "4"
//! endpoint-access = "0.1"
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use actix_web::dev::ServiceRequest;
//! use actix_web::{App, HttpServer};
//! use endpoint_access::prelude::*;
//!
//! pub struct OrderEndpoint;
//!
//! #[endpoint("orders")]
//! #[roles_allowed("ADMIN")]
//! impl OrderEndpoint {
//!     #[anonymous_allowed]
//!     pub fn count(&self) -> usize { 42 }
//!
//!     // falls back to #[roles_allowed("ADMIN")]
//!     pub fn cancel(&self, id: u64) {}
//! }
//!
//! let registry = Arc::new(EndpointRegistry::new().with::<OrderEndpoint>()?);
//!
//! HttpServer::new(move || {
//!     App::new().wrap(
//!         EndpointAccessTransform::new(Arc::clone(&registry), |req: &ServiceRequest| {
//!             /* resolve the caller */
//!             None
//!         })
//!         .config(EndpointAccessConfig::from_env()),
//!     )
//! })
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `macros` | Yes | Procedural macros (`#[endpoint]`, `#[roles_allowed]`, etc.) |
//! | `audit` | Yes | Audit trail of access decisions |
//!
//! ## Modules
//!
//! The main functionality is available through the `http` module:
//!
//! - [`http::auth`] - Policy model and access decisions
//! - [`http::security`] - Access checker, registry, and middleware
//! - [`http::error`] - Error types

// Re-export everything from endpoint-access-core
pub use endpoint_access_core::*;

// Re-export procedural macros when the "macros" feature is enabled
#[cfg(feature = "macros")]
pub use endpoint_access_codegen::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use endpoint_access_core::http::auth::{Decision, Marker, ScopePolicy};
    pub use endpoint_access_core::http::error::{AuthError, RegistryError};
    pub use endpoint_access_core::http::security::{
        AuthenticatedUser, Authenticator, CallerIdentity, EndpointAccessChecker,
        EndpointAccessConfig, EndpointAccessTransform, EndpointRegistry, EndpointType,
        RoleChecker, SecurityExt, User,
    };

    #[cfg(feature = "audit")]
    pub use endpoint_access_core::http::security::{AuditLogger, SecurityEvent};

    #[cfg(feature = "macros")]
    pub use endpoint_access_codegen::{
        anonymous_allowed, browser_callable, deny_all, endpoint, endpoint_exposed, permit_all,
        roles_allowed,
    };
}
