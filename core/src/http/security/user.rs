//! User model carried through a request.
//!
//! # Spring Equivalent
//! `Authentication` / `UserDetails`

use std::fmt;

/// The user an [`Authenticator`](crate::http::security::Authenticator) attached to a request.
///
/// Roles are plain names (`ADMIN`), authorities are free-form strings and may
/// carry the `ROLE_` prefix (`ROLE_ADMIN`). An anonymous user stands for a
/// session that exists but carries no authenticated principal.
///
/// # Example
/// ```
/// use endpoint_access_core::http::security::User;
///
/// let user = User::new("admin")
///     .roles(&["ADMIN".into(), "USER".into()])
///     .authorities(&["orders:write".into()]);
///
/// assert!(user.has_role("ADMIN"));
/// assert!(user.has_authority("orders:write"));
/// assert!(!user.is_anonymous());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    username: String,
    roles: Vec<String>,
    authorities: Vec<String>,
    anonymous: bool,
}

impl User {
    /// Creates an authenticated user without roles.
    pub fn new(username: impl Into<String>) -> Self {
        User {
            username: username.into(),
            roles: Vec::new(),
            authorities: Vec::new(),
            anonymous: false,
        }
    }

    /// Creates the anonymous user.
    ///
    /// # Spring Security Equivalent
    /// `AnonymousAuthenticationToken`
    pub fn anonymous() -> Self {
        User {
            username: "anonymousUser".to_string(),
            roles: Vec::new(),
            authorities: Vec::new(),
            anonymous: true,
        }
    }

    pub fn get_username(&self) -> &str {
        &self.username
    }

    pub fn get_roles(&self) -> &[String] {
        &self.roles
    }

    pub fn get_authorities(&self) -> &[String] {
        &self.authorities
    }

    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    /// Adds roles to the user (builder pattern).
    pub fn roles(mut self, roles: &[String]) -> Self {
        for role in roles {
            if !self.roles.contains(role) {
                self.roles.push(role.clone());
            }
        }
        self
    }

    /// Adds authorities to the user (builder pattern).
    pub fn authorities(mut self, authorities: &[String]) -> Self {
        for authority in authorities {
            if !self.authorities.contains(authority) {
                self.authorities.push(authority.clone());
            }
        }
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User {{ username: {}, roles: {:?}, authorities: {:?} }}",
            self.username, self.roles, self.authorities
        )
    }
}
