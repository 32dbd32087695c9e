//! Authorization policy model.
//!
//! # Java EE Equivalent
//! `jakarta.annotation.security` annotations

pub mod access;
pub mod policy;

pub use access::Decision;
pub use policy::{Marker, ScopePolicy};
