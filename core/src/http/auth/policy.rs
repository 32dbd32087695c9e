//! Security markers and the policy they form at one scope.
//!
//! # Java EE Equivalent
//! `@DenyAll`, `@PermitAll`, `@RolesAllowed` and Vaadin's `@AnonymousAllowed`
//!
//! A scope is either an endpoint method or the endpoint type declaring it.
//! Markers may be combined at one scope; [`ScopePolicy`] keeps all of them and
//! the access checker applies the priority rule when evaluating.

use std::fmt;

/// A single security marker attached to a method or an endpoint type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Nobody may call the target.
    DenyAll,
    /// Everyone may call the target, including anonymous callers.
    AnonymousAllowed,
    /// Any authenticated caller may call the target.
    PermitAll,
    /// Authenticated callers holding at least one of the roles may call the target.
    RolesAllowed(Vec<String>),
}

impl Marker {
    /// Returns the marker name, e.g. `AnonymousAllowed`.
    pub fn name(&self) -> &'static str {
        match self {
            Marker::DenyAll => "DenyAll",
            Marker::AnonymousAllowed => "AnonymousAllowed",
            Marker::PermitAll => "PermitAll",
            Marker::RolesAllowed(_) => "RolesAllowed",
        }
    }

    /// Returns the attribute used to declare the marker, e.g. `#[permit_all]`.
    pub fn attribute(&self) -> &'static str {
        match self {
            Marker::DenyAll => "#[deny_all]",
            Marker::AnonymousAllowed => "#[anonymous_allowed]",
            Marker::PermitAll => "#[permit_all]",
            Marker::RolesAllowed(_) => "#[roles_allowed]",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::RolesAllowed(roles) => write!(f, "RolesAllowed({})", roles.join(", ")),
            other => f.write_str(other.name()),
        }
    }
}

/// The markers found at one scope.
///
/// An empty policy is "unspecified": at method scope it defers to the
/// declaring type, at type scope it denies.
///
/// # Example
/// ```
/// use endpoint_access_core::http::auth::ScopePolicy;
///
/// let policy = ScopePolicy::unspecified().roles_allowed(&["ADMIN", "MANAGER"]);
/// assert!(policy.is_specified());
/// assert_eq!(policy.allowed_roles(), Some(&["ADMIN".to_string(), "MANAGER".to_string()][..]));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScopePolicy {
    deny_all: bool,
    anonymous_allowed: bool,
    permit_all: bool,
    roles_allowed: Option<Vec<String>>,
}

impl ScopePolicy {
    /// Creates a policy without any marker.
    pub fn unspecified() -> Self {
        Self::default()
    }

    /// Builds a policy from a list of markers.
    ///
    /// Repeated `RolesAllowed` markers merge their roles, keeping first-seen order.
    pub fn from_markers<I>(markers: I) -> Self
    where
        I: IntoIterator<Item = Marker>,
    {
        markers
            .into_iter()
            .fold(Self::unspecified(), |policy, marker| policy.with(marker))
    }

    /// Adds a marker (builder pattern).
    pub fn with(self, marker: Marker) -> Self {
        match marker {
            Marker::DenyAll => self.deny_all(),
            Marker::AnonymousAllowed => self.anonymous_allowed(),
            Marker::PermitAll => self.permit_all(),
            Marker::RolesAllowed(roles) => self.roles(roles),
        }
    }

    /// Adds `DenyAll`.
    pub fn deny_all(mut self) -> Self {
        self.deny_all = true;
        self
    }

    /// Adds `AnonymousAllowed`.
    pub fn anonymous_allowed(mut self) -> Self {
        self.anonymous_allowed = true;
        self
    }

    /// Adds `PermitAll`.
    pub fn permit_all(mut self) -> Self {
        self.permit_all = true;
        self
    }

    /// Adds `RolesAllowed` with the given roles.
    pub fn roles_allowed(self, roles: &[&str]) -> Self {
        self.roles(roles.iter().map(|r| r.to_string()).collect())
    }

    fn roles(mut self, roles: Vec<String>) -> Self {
        let allowed = self.roles_allowed.get_or_insert_with(Vec::new);
        for role in roles {
            if !allowed.contains(&role) {
                allowed.push(role);
            }
        }
        self
    }

    /// Returns true if at least one marker is present.
    pub fn is_specified(&self) -> bool {
        self.deny_all || self.anonymous_allowed || self.permit_all || self.roles_allowed.is_some()
    }

    pub fn is_deny_all(&self) -> bool {
        self.deny_all
    }

    pub fn is_anonymous_allowed(&self) -> bool {
        self.anonymous_allowed
    }

    pub fn is_permit_all(&self) -> bool {
        self.permit_all
    }

    /// Returns the roles of the `RolesAllowed` marker, if present.
    pub fn allowed_roles(&self) -> Option<&[String]> {
        self.roles_allowed.as_deref()
    }

    /// Returns the markers in priority order.
    pub fn markers(&self) -> Vec<Marker> {
        let mut markers = Vec::new();
        if self.deny_all {
            markers.push(Marker::DenyAll);
        }
        if self.anonymous_allowed {
            markers.push(Marker::AnonymousAllowed);
        }
        if self.permit_all {
            markers.push(Marker::PermitAll);
        }
        if let Some(roles) = &self.roles_allowed {
            markers.push(Marker::RolesAllowed(roles.clone()));
        }
        markers
    }
}

impl fmt::Display for ScopePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_specified() {
            return f.write_str("Unspecified");
        }
        let markers: Vec<String> = self.markers().iter().map(|m| m.to_string()).collect();
        f.write_str(&markers.join(" + "))
    }
}
