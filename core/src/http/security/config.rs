//! Configuration for endpoint access control.
//!
//! # Spring Equivalent
//! `AuthenticationProvider` and Hilla's endpoint properties

use std::env;

use actix_web::dev::ServiceRequest;
use serde::Deserialize;

use crate::http::security::identity::DEFAULT_ROLE_PREFIX;
use crate::http::security::user::User;

/// Environment variable enabling development-mode messages.
pub const DEV_MODE_ENV: &str = "ENDPOINT_ACCESS_DEV_MODE";
/// Environment variable overriding the endpoint path prefix.
pub const PREFIX_ENV: &str = "ENDPOINT_ACCESS_PREFIX";
/// Environment variable overriding the role prefix.
pub const ROLE_PREFIX_ENV: &str = "ENDPOINT_ACCESS_ROLE_PREFIX";

/// Trait for extracting user identity from an HTTP request.
///
/// # Spring Equivalent
/// `AuthenticationProvider` / `UserDetailsService`
///
/// Credential validation is up to the implementation; the middleware only
/// stores the returned user in the request extensions.
pub trait Authenticator {
    /// Returns the user behind the request, or `None` for anonymous calls.
    fn get_user(&self, req: &ServiceRequest) -> Option<User>;
}

impl<F> Authenticator for F
where
    F: Fn(&ServiceRequest) -> Option<User>,
{
    fn get_user(&self, req: &ServiceRequest) -> Option<User> {
        self(req)
    }
}

/// Settings for the access checker and the endpoint middleware.
///
/// # Example
/// ```
/// use endpoint_access_core::http::security::EndpointAccessConfig;
///
/// let config = EndpointAccessConfig::new()
///     .dev_mode(true)
///     .prefix("/rpc");
///
/// assert!(config.is_dev_mode());
/// assert_eq!(config.get_prefix(), "/rpc");
/// assert_eq!(config.get_role_prefix(), Some("ROLE_"));
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EndpointAccessConfig {
    dev_mode: bool,
    prefix: String,
    role_prefix: Option<String>,
}

impl Default for EndpointAccessConfig {
    fn default() -> Self {
        EndpointAccessConfig {
            dev_mode: false,
            prefix: "/connect".to_string(),
            role_prefix: Some(DEFAULT_ROLE_PREFIX.to_string()),
        }
    }
}

impl EndpointAccessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads overrides from `ENDPOINT_ACCESS_*` environment variables.
    ///
    /// An empty `ENDPOINT_ACCESS_ROLE_PREFIX` disables prefix handling.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = env::var(DEV_MODE_ENV) {
            config.dev_mode = parse_flag(&value);
        }
        if let Ok(value) = env::var(PREFIX_ENV) {
            config = config.prefix(&value);
        }
        if let Ok(value) = env::var(ROLE_PREFIX_ENV) {
            config = config.role_prefix(Some(&value));
        }
        config
    }

    /// Enables development-mode denial messages.
    pub fn dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    /// Sets the path prefix endpoint calls are served under (default: `/connect`).
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = normalize_prefix(prefix);
        self
    }

    /// Sets the prefix role names carry as authorities (default: `ROLE_`).
    pub fn role_prefix(mut self, role_prefix: Option<&str>) -> Self {
        self.role_prefix = role_prefix.filter(|p| !p.is_empty()).map(str::to_string);
        self
    }

    pub fn is_dev_mode(&self) -> bool {
        self.dev_mode
    }

    pub fn get_prefix(&self) -> &str {
        &self.prefix
    }

    pub fn get_role_prefix(&self) -> Option<&str> {
        self.role_prefix.as_deref()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
