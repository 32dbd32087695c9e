//! Endpoint access checker.
//!
//! # Spring Security / Java EE Equivalent
//! Method security for `@DenyAll`, `@PermitAll`, `@RolesAllowed`, and
//! Vaadin's `@AnonymousAllowed`
//!
//! # Resolution
//! 1. If the method carries any marker, only the method policy is evaluated.
//!    This holds in both directions: `#[anonymous_allowed]` on a method opens
//!    it inside a `#[deny_all]` type, `#[deny_all]` on a method closes it
//!    inside an `#[anonymous_allowed]` type.
//! 2. Otherwise the policy of the type declaring the method is evaluated.
//! 3. If neither scope carries a marker, access is denied.
//!
//! Within one scope, markers are applied in this order:
//! `DenyAll` > `AnonymousAllowed` > (caller must be authenticated) >
//! `PermitAll` > `RolesAllowed`.

use actix_web::HttpRequest;

use crate::http::auth::{Decision, Marker, ScopePolicy};
use crate::http::security::extractor::SecurityExt;
use crate::http::security::identity::{CallerIdentity, RoleCheck, RoleChecker, DEFAULT_ROLE_PREFIX};
use crate::http::security::target::PolicyLookup;

/// Message returned for denied calls in production mode.
pub const ACCESS_DENIED_MSG: &str = "Access denied";

/// Message returned for denied calls in development mode.
pub const ACCESS_DENIED_MSG_DEV_MODE: &str = "Access denied to endpoint; \
     to enable endpoint access use one of the following attributes: \
     #[anonymous_allowed], #[permit_all], #[roles_allowed]";

/// Decides whether a caller may invoke an endpoint method.
///
/// The checker holds no state besides the development-mode flag and can be
/// shared freely between threads.
///
/// # Example
/// ```
/// use endpoint_access_core::http::auth::{Decision, ScopePolicy};
/// use endpoint_access_core::http::security::{CallerIdentity, EndpointAccessChecker, StaticTarget};
///
/// let checker = EndpointAccessChecker::new(false);
/// let target = StaticTarget::on_type(ScopePolicy::unspecified().permit_all());
///
/// let no_roles = |_: &str| false;
/// assert_eq!(
///     checker.decide(&target, &CallerIdentity::authenticated("alice"), &no_roles),
///     Decision::Allowed
/// );
/// assert!(checker.decide(&target, &CallerIdentity::Anonymous, &no_roles).is_denied());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointAccessChecker {
    dev_mode: bool,
    role_prefix: Option<String>,
}

impl Default for EndpointAccessChecker {
    fn default() -> Self {
        Self::new(false)
    }
}

impl EndpointAccessChecker {
    /// Creates a checker. In development mode, denials carry a message
    /// explaining how to open the endpoint.
    pub fn new(dev_mode: bool) -> Self {
        EndpointAccessChecker {
            dev_mode,
            role_prefix: Some(DEFAULT_ROLE_PREFIX.to_string()),
        }
    }

    /// Sets the role prefix the request adapters apply (default: `ROLE_`).
    pub fn role_prefix(mut self, role_prefix: Option<&str>) -> Self {
        self.role_prefix = role_prefix.filter(|p| !p.is_empty()).map(str::to_string);
        self
    }

    pub fn is_dev_mode(&self) -> bool {
        self.dev_mode
    }

    pub fn get_role_prefix(&self) -> Option<&str> {
        self.role_prefix.as_deref()
    }

    /// Decides access to an endpoint method.
    pub fn decide<T, R>(&self, target: &T, identity: &CallerIdentity, role_check: &R) -> Decision
    where
        T: PolicyLookup + ?Sized,
        R: RoleCheck + ?Sized,
    {
        self.to_decision(self.has_access(target, identity, role_check))
    }

    /// Decides access using the type-level policy only.
    pub fn decide_type<R>(
        &self,
        type_policy: &ScopePolicy,
        identity: &CallerIdentity,
        role_check: &R,
    ) -> Decision
    where
        R: RoleCheck + ?Sized,
    {
        self.to_decision(self.has_type_access(type_policy, identity, role_check))
    }

    /// Returns true if the caller may invoke the endpoint method.
    pub fn has_access<T, R>(&self, target: &T, identity: &CallerIdentity, role_check: &R) -> bool
    where
        T: PolicyLookup + ?Sized,
        R: RoleCheck + ?Sized,
    {
        let method_policy = target.method_policy();
        if method_policy.is_specified() {
            log::trace!("resolving access for {} at method scope: {}", identity, method_policy);
            return evaluate(method_policy, identity, role_check);
        }
        self.has_type_access(target.declaring_type_policy(), identity, role_check)
    }

    /// Returns true if the type-level policy lets the caller in.
    pub fn has_type_access<R>(
        &self,
        type_policy: &ScopePolicy,
        identity: &CallerIdentity,
        role_check: &R,
    ) -> bool
    where
        R: RoleCheck + ?Sized,
    {
        if type_policy.is_specified() {
            log::trace!("resolving access for {} at type scope: {}", identity, type_policy);
            return evaluate(type_policy, identity, role_check);
        }
        log::trace!("no security marker found for {}, denying", identity);
        false
    }

    /// Checks access for the user attached to an Actix request.
    ///
    /// Identity and roles come from the request extensions, see [`SecurityExt`].
    /// Roles are matched with this checker's role prefix.
    pub fn check_request<T>(&self, target: &T, req: &HttpRequest) -> Decision
    where
        T: PolicyLookup + ?Sized,
    {
        let user = req.get_user();
        let identity = req.caller_identity();
        let role_check = RoleChecker::with_prefix(user.as_ref(), self.get_role_prefix());
        self.decide(target, &identity, &role_check)
    }

    /// Checks type-level access for the user attached to an Actix request.
    pub fn check_type_request(&self, type_policy: &ScopePolicy, req: &HttpRequest) -> Decision {
        let user = req.get_user();
        let identity = req.caller_identity();
        let role_check = RoleChecker::with_prefix(user.as_ref(), self.get_role_prefix());
        self.decide_type(type_policy, &identity, &role_check)
    }

    /// Returns the message used for denied calls.
    pub fn denied_message(&self) -> &'static str {
        if self.dev_mode {
            ACCESS_DENIED_MSG_DEV_MODE
        } else {
            ACCESS_DENIED_MSG
        }
    }

    fn to_decision(&self, allowed: bool) -> Decision {
        if allowed {
            Decision::Allowed
        } else {
            Decision::Denied {
                message: self.denied_message().to_string(),
            }
        }
    }
}

fn evaluate<R>(policy: &ScopePolicy, identity: &CallerIdentity, role_check: &R) -> bool
where
    R: RoleCheck + ?Sized,
{
    if policy.is_deny_all() {
        return false;
    }
    if policy.is_anonymous_allowed() {
        return true;
    }
    if identity.is_anonymous() {
        log::debug!("anonymous caller rejected by {}", policy);
        return false;
    }
    if policy.is_permit_all() {
        return true;
    }
    if let Some(roles) = policy.allowed_roles() {
        let granted = roles.iter().any(|role| role_check.is_user_in_role(role));
        if !granted {
            log::debug!("{} holds none of {}", identity, Marker::RolesAllowed(roles.to_vec()));
        }
        return granted;
    }
    false
}
