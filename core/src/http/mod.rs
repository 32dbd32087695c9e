//! HTTP-facing security types.

pub mod auth;
pub mod error;
pub mod security;
