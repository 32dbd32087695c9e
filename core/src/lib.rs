//! # Endpoint Access Core
//!
//! Access control for browser-callable endpoints served by Actix Web.
//!
//! Every endpoint call is checked before the target method runs. Policy
//! comes from security attributes (`#[deny_all]`, `#[anonymous_allowed]`,
//! `#[permit_all]`, `#[roles_allowed(..)]`) on an endpoint's methods and on
//! the endpoint type itself; method-level attributes override type-level ones
//! and a target with no attribute anywhere is denied.
//!
//! ## Modules
//!
//! - [`http::auth`] - Policy model and access decisions
//! - [`http::security`] - Access checker, endpoint registry, middleware
//! - [`http::error`] - Error types

pub mod http;
