//! Extractors and request helpers for the current caller.
//!
//! # Spring Equivalent
//! `@AuthenticationPrincipal` / `HttpServletRequest::getUserPrincipal`

use std::future::{ready, Ready};
use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::http::error::AuthError;
use crate::http::security::identity::{
    caller_identity, CallerIdentity, RoleCheck, RoleChecker, RolePrefix, DEFAULT_ROLE_PREFIX,
};
use crate::http::security::User;

/// Extractor for the authenticated user.
///
/// # Usage
/// ```ignore
/// use endpoint_access_core::http::security::AuthenticatedUser;
///
/// async fn handler(user: AuthenticatedUser) -> impl Responder {
///     format!("Hello, {}!", user.get_username())
/// }
/// ```
///
/// # Errors
/// Returns `401 Unauthorized` if no user, or only the anonymous user, is attached.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(User);

impl AuthenticatedUser {
    pub fn into_inner(self) -> User {
        self.0
    }
}

impl Deref for AuthenticatedUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.get_user().filter(|u| !u.is_anonymous()) {
            Some(user) => ready(Ok(AuthenticatedUser(user))),
            None => ready(Err(AuthError::Unauthorized)),
        }
    }
}

/// Extension trait exposing the caller of a request to the access checker.
pub trait SecurityExt {
    /// Returns a clone of the user attached to the request, if any.
    fn get_user(&self) -> Option<User>;

    /// Returns the caller identity; anonymous users map to `Anonymous`.
    fn caller_identity(&self) -> CallerIdentity;

    /// Checks a role against the request's [`RolePrefix`] (default: `ROLE_`).
    fn is_user_in_role(&self, role: &str) -> bool;
}

impl SecurityExt for HttpRequest {
    fn get_user(&self) -> Option<User> {
        self.extensions().get::<User>().cloned()
    }

    fn caller_identity(&self) -> CallerIdentity {
        caller_identity(self.extensions().get::<User>())
    }

    fn is_user_in_role(&self, role: &str) -> bool {
        let extensions = self.extensions();
        let prefix = match extensions.get::<RolePrefix>() {
            Some(prefix) => prefix.get(),
            None => Some(DEFAULT_ROLE_PREFIX),
        };
        RoleChecker::with_prefix(extensions.get::<User>(), prefix).is_user_in_role(role)
    }
}
