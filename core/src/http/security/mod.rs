//! Endpoint security: access checker, endpoint registry, and middleware.
//!
//! # Spring Equivalent
//! `org.springframework.security` method security, applied to Hilla-style
//! browser-callable endpoints
//!
//! # Module Structure
//!
//! - `checker` - The access decision engine (EndpointAccessChecker)
//! - `registry` - Endpoint definitions and target resolution
//! - `target` - Scope-qualified policy lookup (PolicyLookup)
//! - `identity` - Caller identity and role predicates
//! - `config` - Authenticator trait and EndpointAccessConfig
//! - `extractor` - Actix Web extractors and request helpers
//! - `middleware` - Endpoint access middleware (EndpointAccessTransform)
//! - `manager` - Factory methods (AuthorizationManager)
//! - `user` - User model
//! - `audit` - Audit trail of access decisions
//!
//! # Feature Flags
//! - `audit`: Enables the audit trail and middleware audit hooks

pub use checker::{EndpointAccessChecker, ACCESS_DENIED_MSG, ACCESS_DENIED_MSG_DEV_MODE};
pub use config::{Authenticator, EndpointAccessConfig};
pub use extractor::{AuthenticatedUser, SecurityExt};
pub use identity::{
    caller_identity, CallerIdentity, Principal, RoleCheck, RoleChecker, RolePrefix,
    DEFAULT_ROLE_PREFIX,
};
pub use manager::AuthorizationManager;
pub use middleware::EndpointAccessTransform;
pub use registry::{EndpointRef, EndpointRegistry, EndpointType, MethodDefinition, TargetRef, TypeDefinition};
pub use target::{PolicyLookup, StaticTarget};
pub use user::User;
#[cfg(feature = "audit")]
pub use audit::{
    AuditLogger, InMemoryEventStore, LogHandler, SecurityEvent, SecurityEventHandler,
    SecurityEventSeverity, SecurityEventType,
};

// Internal modules
mod extractor;
mod user;

// Public modules
pub mod checker;
pub mod config;
pub mod identity;
pub mod manager;
pub mod middleware;
pub mod registry;
pub mod target;
#[cfg(feature = "audit")]
pub mod audit;
