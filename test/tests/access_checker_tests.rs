//! Access decision tests.
//!
//! Runs the checker against targets resolved from the registry, the same way
//! the middleware does, without going through HTTP.

mod common;

use endpoint_access::http::auth::Decision;
use endpoint_access::http::security::{
    caller_identity, CallerIdentity, EndpointAccessChecker, EndpointRegistry, RoleChecker, User,
    ACCESS_DENIED_MSG, ACCESS_DENIED_MSG_DEV_MODE,
};

use common::{test_registry, user};

fn decide(registry: &EndpointRegistry, endpoint: &str, method: &str, caller: Option<&User>) -> Decision {
    decide_with(EndpointAccessChecker::new(false), registry, endpoint, method, caller)
}

fn decide_with(
    checker: EndpointAccessChecker,
    registry: &EndpointRegistry,
    endpoint: &str,
    method: &str,
    caller: Option<&User>,
) -> Decision {
    let target = registry
        .resolve(endpoint, method)
        .unwrap_or_else(|| panic!("{}.{} should resolve", endpoint, method));
    checker.decide(&target, &caller_identity(caller), &RoleChecker::new(caller))
}

// =============================================================================
// No Attribute
// =============================================================================

#[test]
fn test_no_attribute_denies_everyone() {
    let registry = test_registry();
    let admin = user("admin", &["ADMIN", "USER"]);

    assert!(decide(&registry, "UnsecuredEndpoint", "anything", None).is_denied());
    assert!(decide(&registry, "UnsecuredEndpoint", "anything", Some(&admin)).is_denied());
}

// =============================================================================
// DenyAll Type
// =============================================================================

#[test]
fn test_deny_all_type_unmarked_method() {
    let registry = test_registry();
    let admin = user("admin", &["ADMIN"]);

    assert!(decide(&registry, "locked", "secret", None).is_denied());
    assert!(decide(&registry, "locked", "secret", Some(&admin)).is_denied());
}

#[test]
fn test_deny_all_type_roles_allowed_method() {
    let registry = test_registry();
    let admin = user("admin", &["ADMIN"]);
    let ops = user("ops", &["OPS"]);
    let guest = user("guest", &["GUEST"]);

    assert!(decide(&registry, "locked", "maintenance", Some(&admin)).is_allowed());
    assert!(decide(&registry, "locked", "maintenance", Some(&ops)).is_allowed());
    assert!(decide(&registry, "locked", "maintenance", Some(&guest)).is_denied());
    assert!(decide(&registry, "locked", "maintenance", None).is_denied());
}

#[test]
fn test_deny_all_type_permit_all_method() {
    let registry = test_registry();
    let guest = user("guest", &[]);

    assert!(decide(&registry, "locked", "status", Some(&guest)).is_allowed());
    assert!(decide(&registry, "locked", "status", None).is_denied());
}

// =============================================================================
// AnonymousAllowed Type
// =============================================================================

#[test]
fn test_anonymous_allowed_type_unmarked_method() {
    let registry = test_registry();
    let guest = user("guest", &[]);

    assert!(decide(&registry, "public", "hello", None).is_allowed());
    assert!(decide(&registry, "public", "hello", Some(&guest)).is_allowed());
}

#[test]
fn test_anonymous_allowed_type_deny_all_method() {
    let registry = test_registry();
    let admin = user("admin", &["ADMIN"]);

    assert!(decide(&registry, "public", "closed", None).is_denied());
    assert!(decide(&registry, "public", "closed", Some(&admin)).is_denied());
}

#[test]
fn test_anonymous_allowed_type_permit_all_method() {
    let registry = test_registry();
    let guest = user("guest", &[]);

    assert!(decide(&registry, "public", "members", None).is_denied());
    assert!(decide(&registry, "public", "members", Some(&guest)).is_allowed());
}

#[test]
fn test_anonymous_user_counts_as_anonymous() {
    let registry = test_registry();
    let anonymous = User::anonymous();

    assert!(decide(&registry, "public", "members", Some(&anonymous)).is_denied());
    assert!(decide(&registry, "public", "hello", Some(&anonymous)).is_allowed());
}

// =============================================================================
// PermitAll Type
// =============================================================================

#[test]
fn test_permit_all_type() {
    let registry = test_registry();
    let guest = user("guest", &[]);

    assert!(decide(&registry, "members", "profile", Some(&guest)).is_allowed());
    assert!(decide(&registry, "members", "profile", None).is_denied());
}

#[test]
fn test_permit_all_type_roles_allowed_method() {
    let registry = test_registry();
    let admin = user("admin", &["ADMIN"]);
    let member = user("member", &["USER"]);

    assert!(decide(&registry, "members", "ban", Some(&admin)).is_allowed());
    assert!(decide(&registry, "members", "ban", Some(&member)).is_denied());
    assert!(decide(&registry, "members", "ban", None).is_denied());
}

#[test]
fn test_permit_all_type_anonymous_allowed_method() {
    let registry = test_registry();
    assert!(decide(&registry, "members", "welcome", None).is_allowed());
}

#[test]
fn test_anonymous_allowed_beats_roles_allowed_on_same_method() {
    let registry = test_registry();
    assert!(decide(&registry, "members", "banner", None).is_allowed());
}

#[test]
fn test_roles_allowed_accepts_prefixed_authority() {
    let registry = test_registry();
    let admin = User::new("admin").authorities(&["ROLE_ADMIN".into()]);

    assert!(decide(&registry, "members", "ban", Some(&admin)).is_allowed());
}

// =============================================================================
// Messages
// =============================================================================

#[test]
fn test_production_message() {
    let registry = test_registry();

    let decision = decide(&registry, "UnsecuredEndpoint", "anything", None);
    assert_eq!(decision.message(), Some(ACCESS_DENIED_MSG));
    assert_eq!(decision.message(), Some("Access denied"));
}

#[test]
fn test_dev_mode_message_names_allow_attributes() {
    let registry = test_registry();
    let checker = EndpointAccessChecker::new(true);

    let decision = decide_with(checker, &registry, "UnsecuredEndpoint", "anything", None);
    let message = decision.message().unwrap();
    assert_eq!(message, ACCESS_DENIED_MSG_DEV_MODE);
    assert!(message.contains("#[anonymous_allowed]"));
    assert!(message.contains("#[permit_all]"));
    assert!(message.contains("#[roles_allowed]"));
    assert_ne!(message, ACCESS_DENIED_MSG);
}

#[test]
fn test_allowed_has_no_message() {
    let registry = test_registry();
    let decision = decide(&registry, "public", "hello", None);
    assert_eq!(decision, Decision::Allowed);
    assert_eq!(decision.message(), None);
}

// =============================================================================
// Type-level Checks
// =============================================================================

#[test]
fn test_type_level_check() {
    let registry = test_registry();
    let checker = EndpointAccessChecker::default();
    let guest = user("guest", &[]);

    let members = registry.endpoint("members").unwrap();
    let identity = caller_identity(Some(&guest));
    let role_check = RoleChecker::new(Some(&guest));
    assert!(checker.has_type_access(members.type_policy(), &identity, &role_check));
    assert!(!checker.has_type_access(members.type_policy(), &CallerIdentity::Anonymous, &role_check));

    let unsecured = registry.endpoint("UnsecuredEndpoint").unwrap();
    assert!(checker
        .decide_type(unsecured.type_policy(), &identity, &role_check)
        .is_denied());
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn test_repeated_decisions_are_identical() {
    let registry = test_registry();
    let admin = user("admin", &["ADMIN"]);

    for (endpoint, method) in [("locked", "maintenance"), ("public", "closed"), ("members", "ban")] {
        let first = decide(&registry, endpoint, method, Some(&admin));
        let second = decide(&registry, endpoint, method, Some(&admin));
        assert_eq!(first, second);
    }
}
