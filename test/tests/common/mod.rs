//! Common test utilities and configuration.
//!
//! This module provides shared test infrastructure including:
//! - Test endpoints declared with the security attributes
//! - A header-based test authenticator
//! - Test app builders
#![allow(dead_code)]

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{get, test, web, App, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use endpoint_access::http::security::{
    AuditLogger, AuthenticatedUser, Authenticator, EndpointAccessConfig, EndpointAccessTransform,
    EndpointRegistry, SecurityExt, User,
};
// Marker attributes inside the blocks are consumed by these macros.
use endpoint_access::{browser_callable, endpoint, endpoint_exposed};

pub const USER_HEADER: &str = "X-User";
pub const ROLES_HEADER: &str = "X-Roles";
pub const AUTHORITIES_HEADER: &str = "X-Authorities";

pub const ROLE_ADMIN: &str = "ADMIN";

// =============================================================================
// Test Endpoints
// =============================================================================

/// No security attribute anywhere.
pub struct UnsecuredEndpoint;

#[endpoint]
impl UnsecuredEndpoint {
    pub fn anything(&self) -> &'static str {
        "anything"
    }
}

/// Type denies everyone; single methods open up again.
pub struct LockedEndpoint;

#[endpoint("locked")]
#[deny_all]
impl LockedEndpoint {
    pub fn secret(&self) {}

    #[roles_allowed(ROLE_ADMIN, "OPS")]
    pub fn maintenance(&self) {}

    #[permit_all]
    pub fn status(&self) {}
}

/// Open to anonymous callers unless a method says otherwise.
#[derive(Default)]
pub struct PublicEndpoint;

#[endpoint("public")]
#[anonymous_allowed]
impl PublicEndpoint {
    pub fn new() -> Self {
        PublicEndpoint
    }

    pub fn hello(&self) -> String {
        "hello".to_string()
    }

    #[deny_all]
    pub fn closed(&self) {}

    #[permit_all]
    pub fn members(&self) {}

    fn helper(&self) {}
}

/// Any authenticated caller.
pub struct MemberEndpoint;

#[browser_callable(name = "members")]
#[permit_all]
impl MemberEndpoint {
    pub fn profile(&self) {}

    #[roles_allowed("ADMIN")]
    pub fn ban(&self, _username: &str) {}

    #[anonymous_allowed]
    pub fn welcome(&self) {}

    // Method attribute wins over the less permissive roles list.
    #[anonymous_allowed]
    #[roles_allowed("ADMIN")]
    pub fn banner(&self) {}
}

// =============================================================================
// Inheritance
// =============================================================================

/// Shared CRUD methods with no type-level attribute.
pub struct CrudService;

#[endpoint_exposed]
impl CrudService {
    pub fn list(&self) -> Vec<String> {
        Vec::new()
    }

    #[permit_all]
    pub fn count(&self) -> usize {
        0
    }
}

/// Inherits `list` and `count` unchanged.
pub struct CatalogEndpoint;

#[endpoint("catalog", extends = CrudService)]
#[anonymous_allowed]
impl CatalogEndpoint {
    pub fn search(&self, _query: &str) {}
}

/// Re-declares the inherited methods.
pub struct InventoryEndpoint;

#[endpoint(name = "inventory", extends = CrudService)]
#[anonymous_allowed]
impl InventoryEndpoint {
    pub fn list(&self) -> Vec<String> {
        Vec::new()
    }

    #[roles_allowed("ADMIN")]
    pub fn count(&self) -> usize {
        0
    }
}

/// Parent whose type-level attribute applies to the methods it declares.
pub struct AdminTools;

#[endpoint_exposed]
#[roles_allowed("ADMIN")]
impl AdminTools {
    pub fn purge(&self) {}
}

/// Two levels deep: `MaintenanceTools` extends `AdminTools`.
pub struct MaintenanceTools;

#[endpoint_exposed(extends = AdminTools)]
impl MaintenanceTools {
    #[permit_all]
    pub fn ping(&self) {}
}

pub struct MaintenanceEndpoint;

#[endpoint("maintenance", extends = MaintenanceTools)]
#[permit_all]
impl MaintenanceEndpoint {
    pub fn report(&self) {}
}

// =============================================================================
// Test Configuration
// =============================================================================

/// Reads the caller from headers, trusting them as-is.
///
/// - `X-User`: username (absent: anonymous)
/// - `X-Roles`: comma separated roles
/// - `X-Authorities`: comma separated authorities
#[derive(Clone, Default)]
pub struct HeaderAuthenticator;

impl Authenticator for HeaderAuthenticator {
    fn get_user(&self, req: &ServiceRequest) -> Option<User> {
        let username = req.headers().get(USER_HEADER)?.to_str().ok()?;
        let roles = header_list(req, ROLES_HEADER);
        let authorities = header_list(req, AUTHORITIES_HEADER);
        Some(User::new(username).roles(&roles).authorities(&authorities))
    }
}

fn header_list(req: &ServiceRequest, name: &str) -> Vec<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Creates the registry with every test endpoint.
pub fn test_registry() -> EndpointRegistry {
    let mut registry = EndpointRegistry::new();
    registry
        .register::<UnsecuredEndpoint>()
        .and_then(|r| r.register::<LockedEndpoint>())
        .and_then(|r| r.register::<PublicEndpoint>())
        .and_then(|r| r.register::<MemberEndpoint>())
        .and_then(|r| r.register::<CatalogEndpoint>())
        .and_then(|r| r.register::<InventoryEndpoint>())
        .and_then(|r| r.register::<MaintenanceEndpoint>())
        .expect("test endpoints should register");
    registry
}

/// A caller with the given roles.
pub fn user(username: &str, roles: &[&str]) -> User {
    let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
    User::new(username).roles(&roles)
}

// =============================================================================
// Test Handlers
// =============================================================================

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CallResult {
    pub endpoint: String,
    pub method: String,
}

/// Reached only when the middleware allowed the call.
pub async fn dispatch(path: web::Path<(String, String)>) -> impl Responder {
    let (endpoint, method) = path.into_inner();
    HttpResponse::Ok().json(CallResult { endpoint, method })
}

#[get("/whoami")]
pub async fn whoami(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().body(user.get_username().to_string())
}

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().body("up")
}

/// Reports whether the caller holds `role`, as handlers see it.
#[get("/has-role/{role}")]
pub async fn has_role(req: HttpRequest, role: web::Path<String>) -> impl Responder {
    HttpResponse::Ok().json(req.is_user_in_role(&role))
}

/// Answers every path it is routed, without looking at it.
pub async fn catch_all() -> impl Responder {
    HttpResponse::Ok().body("reached")
}

// =============================================================================
// Test App Builders
// =============================================================================

pub async fn create_test_app() -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    create_test_app_with(EndpointAccessConfig::default(), None).await
}

pub async fn create_test_app_with(
    config: EndpointAccessConfig,
    audit: Option<AuditLogger>,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    let call_path = format!("{}/{{endpoint}}/{{method}}", config.get_prefix());

    let mut transform =
        EndpointAccessTransform::new(Arc::new(test_registry()), HeaderAuthenticator).config(config);
    if let Some(logger) = audit {
        transform = transform.audit_logger(logger);
    }

    test::init_service(
        App::new().service(
            web::scope("")
                .wrap(transform)
                .route(&call_path, web::post().to(dispatch))
                .service(whoami)
                .service(health)
                .service(has_role),
        ),
    )
    .await
}

/// Routes everything under `/connect` to [`catch_all`], so only the
/// middleware stands between a request and a 200.
pub async fn create_catch_all_app() -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    let transform = EndpointAccessTransform::new(Arc::new(test_registry()), HeaderAuthenticator);

    test::init_service(
        App::new().service(
            web::scope("")
                .wrap(transform)
                .route("/connect/{tail:.*}", web::to(catch_all))
                .service(health),
        ),
    )
    .await
}
