//! Inherited method tests.
//!
//! An inherited method that is not re-declared falls back to the type-level
//! attributes of the type declaring it, never to those of the endpoint.

mod common;

use endpoint_access::http::auth::Decision;
use endpoint_access::http::security::{
    caller_identity, EndpointAccessChecker, EndpointRegistry, RoleChecker, User,
};

use common::{test_registry, user};

fn decide(registry: &EndpointRegistry, endpoint: &str, method: &str, caller: Option<&User>) -> Decision {
    let target = registry.resolve(endpoint, method).unwrap();
    EndpointAccessChecker::default().decide(&target, &caller_identity(caller), &RoleChecker::new(caller))
}

#[test]
fn test_inherited_unmarked_method_ignores_endpoint_attribute() {
    let registry = test_registry();
    let guest = user("guest", &[]);

    // CatalogEndpoint is #[anonymous_allowed], CrudService has no attribute
    assert!(decide(&registry, "catalog", "list", None).is_denied());
    assert!(decide(&registry, "catalog", "list", Some(&guest)).is_denied());
}

#[test]
fn test_inherited_marked_method_keeps_its_attribute() {
    let registry = test_registry();
    let guest = user("guest", &[]);

    assert!(decide(&registry, "catalog", "count", Some(&guest)).is_allowed());
    assert!(decide(&registry, "catalog", "count", None).is_denied());
}

#[test]
fn test_own_method_uses_endpoint_attribute() {
    let registry = test_registry();
    assert!(decide(&registry, "catalog", "search", None).is_allowed());
}

#[test]
fn test_inherited_method_reports_parent_as_declaring_type() {
    let registry = test_registry();

    let list = registry.resolve("catalog", "list").unwrap();
    assert!(list.declaring_type().ends_with("CrudService"));
    assert_eq!(list.endpoint(), "catalog");

    let search = registry.resolve("catalog", "search").unwrap();
    assert!(search.declaring_type().ends_with("CatalogEndpoint"));
}

#[test]
fn test_redeclared_method_without_attribute_uses_endpoint_type() {
    let registry = test_registry();

    assert!(decide(&registry, "inventory", "list", None).is_allowed());

    let list = registry.resolve("inventory", "list").unwrap();
    assert!(list.declaring_type().ends_with("InventoryEndpoint"));
}

#[test]
fn test_redeclared_method_with_attribute_uses_own_attribute() {
    let registry = test_registry();
    let admin = user("admin", &["ADMIN"]);
    let guest = user("guest", &[]);

    // CrudService::count is #[permit_all], InventoryEndpoint::count is ADMIN only
    assert!(decide(&registry, "inventory", "count", Some(&admin)).is_allowed());
    assert!(decide(&registry, "inventory", "count", Some(&guest)).is_denied());
}

#[test]
fn test_parent_type_attribute_applies_to_its_methods() {
    let registry = test_registry();
    let admin = user("admin", &["ADMIN"]);
    let guest = user("guest", &[]);

    // AdminTools is ADMIN only, MaintenanceEndpoint is #[permit_all]
    assert!(decide(&registry, "maintenance", "purge", Some(&admin)).is_allowed());
    assert!(decide(&registry, "maintenance", "purge", Some(&guest)).is_denied());
    assert!(decide(&registry, "maintenance", "report", Some(&guest)).is_allowed());
}

#[test]
fn test_multi_level_inheritance() {
    let registry = test_registry();
    let guest = user("guest", &[]);

    let ping = registry.resolve("maintenance", "ping").unwrap();
    assert!(ping.declaring_type().ends_with("MaintenanceTools"));
    assert!(decide(&registry, "maintenance", "ping", Some(&guest)).is_allowed());

    let purge = registry.resolve("maintenance", "purge").unwrap();
    assert!(purge.declaring_type().ends_with("AdminTools"));
}
