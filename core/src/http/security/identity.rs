//! Caller identity and role predicates.
//!
//! # Spring Security Equivalent
//! `Principal` plus `HttpServletRequest::isUserInRole`
//!
//! The checker never reads an ambient security context. The caller identity
//! and a role predicate are passed into every decision instead.

use std::fmt;

use crate::http::security::user::User;

/// Prefix Spring-style authorities carry in front of role names.
pub const DEFAULT_ROLE_PREFIX: &str = "ROLE_";

/// Role prefix in effect for a request.
///
/// The middleware stores it in the request extensions next to the [`User`].
/// `None` compares role names verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RolePrefix(Option<String>);

impl RolePrefix {
    pub fn new(prefix: Option<&str>) -> Self {
        RolePrefix(prefix.filter(|p| !p.is_empty()).map(str::to_string))
    }

    pub fn get(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl Default for RolePrefix {
    fn default() -> Self {
        RolePrefix::new(Some(DEFAULT_ROLE_PREFIX))
    }
}

/// Identity of an authenticated caller.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Principal {
    name: String,
}

impl Principal {
    pub fn new(name: impl Into<String>) -> Self {
        Principal { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Who is calling: an authenticated principal or nobody.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallerIdentity {
    Authenticated(Principal),
    Anonymous,
}

impl CallerIdentity {
    pub fn authenticated(name: impl Into<String>) -> Self {
        CallerIdentity::Authenticated(Principal::new(name))
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, CallerIdentity::Anonymous)
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            CallerIdentity::Authenticated(principal) => Some(principal),
            CallerIdentity::Anonymous => None,
        }
    }
}

impl From<Option<&User>> for CallerIdentity {
    fn from(user: Option<&User>) -> Self {
        caller_identity(user)
    }
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallerIdentity::Authenticated(principal) => f.write_str(principal.name()),
            CallerIdentity::Anonymous => f.write_str("<anonymous>"),
        }
    }
}

/// Maps the request user to a caller identity.
///
/// Anonymous users count as no principal at all.
pub fn caller_identity(user: Option<&User>) -> CallerIdentity {
    match user {
        Some(user) if !user.is_anonymous() => CallerIdentity::authenticated(user.get_username()),
        _ => CallerIdentity::Anonymous,
    }
}

/// Answers "does the current caller hold this role".
///
/// Implementations must be side-effect free; the checker may call them any
/// number of times in any order.
pub trait RoleCheck {
    fn is_user_in_role(&self, role: &str) -> bool;
}

impl<F> RoleCheck for F
where
    F: Fn(&str) -> bool,
{
    fn is_user_in_role(&self, role: &str) -> bool {
        self(role)
    }
}

/// Role predicate backed by a [`User`].
///
/// A role matches when the user holds it as a role (prefix stripped) or holds
/// the prefixed name as an authority. Without a user, or for the anonymous
/// user, no role matches.
///
/// # Example
/// ```
/// use endpoint_access_core::http::security::{RoleCheck, RoleChecker, User};
///
/// let user = User::new("bob").authorities(&["ROLE_USER".into()]);
/// let checker = RoleChecker::new(Some(&user));
///
/// assert!(checker.is_user_in_role("USER"));
/// assert!(checker.is_user_in_role("ROLE_USER"));
/// assert!(!checker.is_user_in_role("ADMIN"));
/// ```
#[derive(Clone, Debug)]
pub struct RoleChecker<'a> {
    user: Option<&'a User>,
    prefix: Option<&'a str>,
}

impl<'a> RoleChecker<'a> {
    /// Creates a checker using [`DEFAULT_ROLE_PREFIX`].
    pub fn new(user: Option<&'a User>) -> Self {
        Self::with_prefix(user, Some(DEFAULT_ROLE_PREFIX))
    }

    /// Creates a checker with a custom prefix, or none.
    pub fn with_prefix(user: Option<&'a User>, prefix: Option<&'a str>) -> Self {
        RoleChecker {
            user: user.filter(|u| !u.is_anonymous()),
            prefix: prefix.filter(|p| !p.is_empty()),
        }
    }
}

impl RoleCheck for RoleChecker<'_> {
    fn is_user_in_role(&self, role: &str) -> bool {
        let Some(user) = self.user else {
            return false;
        };

        match self.prefix {
            Some(prefix) => {
                let (bare, prefixed) = match role.strip_prefix(prefix) {
                    Some(bare) => (bare.to_string(), role.to_string()),
                    None => (role.to_string(), format!("{}{}", prefix, role)),
                };
                user.has_role(&bare) || user.has_authority(&prefixed)
            }
            None => user.has_role(role) || user.has_authority(role),
        }
    }
}
