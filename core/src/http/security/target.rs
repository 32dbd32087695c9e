//! Targets of an access decision.
//!
//! A target is an endpoint method together with the type that declares it.
//! The checker only needs the policy found at each of the two scopes.

use crate::http::auth::ScopePolicy;

/// Scope-qualified policy lookup for one endpoint method.
pub trait PolicyLookup {
    /// Policy attached to the method itself.
    fn method_policy(&self) -> &ScopePolicy;

    /// Policy attached to the type declaring the method.
    fn declaring_type_policy(&self) -> &ScopePolicy;
}

/// A target whose policies are given directly.
///
/// Handy for callers that keep their own policy tables, and in tests.
///
/// # Example
/// ```
/// use endpoint_access_core::http::auth::ScopePolicy;
/// use endpoint_access_core::http::security::{PolicyLookup, StaticTarget};
///
/// let target = StaticTarget::new(
///     ScopePolicy::unspecified().permit_all(),
///     ScopePolicy::unspecified().deny_all(),
/// );
/// assert!(target.method_policy().is_permit_all());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticTarget {
    method: ScopePolicy,
    declaring_type: ScopePolicy,
}

impl StaticTarget {
    pub fn new(method: ScopePolicy, declaring_type: ScopePolicy) -> Self {
        StaticTarget {
            method,
            declaring_type,
        }
    }

    /// A target with a method policy and an unmarked declaring type.
    pub fn method(method: ScopePolicy) -> Self {
        Self::new(method, ScopePolicy::unspecified())
    }

    /// An unmarked method on a type with the given policy.
    pub fn on_type(declaring_type: ScopePolicy) -> Self {
        Self::new(ScopePolicy::unspecified(), declaring_type)
    }
}

impl PolicyLookup for StaticTarget {
    fn method_policy(&self) -> &ScopePolicy {
        &self.method
    }

    fn declaring_type_policy(&self) -> &ScopePolicy {
        &self.declaring_type
    }
}

impl<T: PolicyLookup + ?Sized> PolicyLookup for &T {
    fn method_policy(&self) -> &ScopePolicy {
        (**self).method_policy()
    }

    fn declaring_type_policy(&self) -> &ScopePolicy {
        (**self).declaring_type_policy()
    }
}
