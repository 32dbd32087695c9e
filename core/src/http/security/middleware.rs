//! Endpoint access middleware for Actix Web.
//!
//! # Spring Equivalent
//! `SecurityFilterChain` in front of Hilla's `EndpointController`
//!
//! Calls to `{prefix}/{endpoint}/{method}` are resolved against the
//! [`EndpointRegistry`] and checked before they reach the handler:
//! - unknown endpoint or method: `404 Not Found`
//! - any other shape under the prefix: `404 Not Found`
//! - denied: `401 Unauthorized` with `{"message": "..."}`
//! - allowed: forwarded to the inner service
//!
//! Paths are matched after percent-decoding, the same way the router matches
//! them. Paths outside the prefix pass through unchecked.

use std::rc::Rc;
use std::sync::Arc;

use actix_service::{Service, Transform};
use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage, ResponseError};
use futures_util::future::{ok, LocalBoxFuture, Ready};

use crate::http::auth::Decision;
use crate::http::error::AuthError;
use crate::http::security::checker::EndpointAccessChecker;
use crate::http::security::config::{Authenticator, EndpointAccessConfig};
use crate::http::security::identity::{caller_identity, RoleChecker, RolePrefix};
use crate::http::security::registry::EndpointRegistry;

#[cfg(feature = "audit")]
use crate::http::security::audit::{AuditLogger, SecurityEvent};
#[cfg(feature = "audit")]
use crate::http::security::target::PolicyLookup;

/// Endpoint access middleware factory.
///
/// # Example
/// ```ignore
/// let registry = Arc::new(EndpointRegistry::new().with::<OrderEndpoint>()?);
///
/// App::new().wrap(
///     EndpointAccessTransform::new(registry, TokenAuthenticator::default())
///         .config(EndpointAccessConfig::from_env())
/// )
/// ```
pub struct EndpointAccessTransform<Auth> {
    registry: Arc<EndpointRegistry>,
    authenticator: Rc<Auth>,
    config: EndpointAccessConfig,
    #[cfg(feature = "audit")]
    audit: Option<AuditLogger>,
}

impl<Auth> EndpointAccessTransform<Auth> {
    pub fn new(registry: Arc<EndpointRegistry>, authenticator: Auth) -> Self {
        EndpointAccessTransform {
            registry,
            authenticator: Rc::new(authenticator),
            config: EndpointAccessConfig::default(),
            #[cfg(feature = "audit")]
            audit: None,
        }
    }

    pub fn config(mut self, config: EndpointAccessConfig) -> Self {
        self.config = config;
        self
    }

    /// Publishes an event for every checked call.
    #[cfg(feature = "audit")]
    pub fn audit_logger(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }
}

impl<S, B, Auth> Transform<S, ServiceRequest> for EndpointAccessTransform<Auth>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    Auth: Authenticator + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = EndpointAccessService<Auth, S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(EndpointAccessService {
            registry: Arc::clone(&self.registry),
            authenticator: Rc::clone(&self.authenticator),
            checker: EndpointAccessChecker::new(self.config.is_dev_mode())
                .role_prefix(self.config.get_role_prefix()),
            config: self.config.clone(),
            #[cfg(feature = "audit")]
            audit: self.audit.clone(),
            service: Rc::new(service),
        })
    }
}

/// Endpoint access middleware service.
pub struct EndpointAccessService<Auth, S> {
    registry: Arc<EndpointRegistry>,
    authenticator: Rc<Auth>,
    checker: EndpointAccessChecker,
    config: EndpointAccessConfig,
    #[cfg(feature = "audit")]
    audit: Option<AuditLogger>,
    service: Rc<S>,
}

impl<Auth, S, B> Service<ServiceRequest> for EndpointAccessService<Auth, S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    Auth: Authenticator,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        let user = self.authenticator.get_user(&req);
        if let Some(ref u) = user {
            req.extensions_mut().insert(u.clone());
        }
        req.extensions_mut()
            .insert(RolePrefix::new(self.checker.get_role_prefix()));

        // percent-decoded path, as the router sees it
        let path = req.match_info().as_str().to_string();
        let identity = caller_identity(user.as_ref());
        let username = identity.principal().map(|p| p.name().to_string());

        let (endpoint, method) = match classify_path(&path, self.config.get_prefix()) {
            CallPath::Outside => return forward(service, req),
            CallPath::Call { endpoint, method } => (endpoint.to_string(), method.to_string()),
            CallPath::Malformed { endpoint, method } => {
                log::warn!("malformed endpoint call path {}", path);
                return self.not_found(req, &path, username.as_deref(), endpoint, method);
            }
        };

        let Some(target) = self.registry.resolve(&endpoint, &method) else {
            log::warn!("no endpoint method {}.{} for {}", endpoint, method, path);
            return self.not_found(req, &path, username.as_deref(), &endpoint, &method);
        };

        let role_check = RoleChecker::with_prefix(user.as_ref(), self.checker.get_role_prefix());
        let decision = self.checker.decide(&target, &identity, &role_check);

        #[cfg(feature = "audit")]
        if let Some(audit) = &self.audit {
            let scope = if target.method_policy().is_specified() {
                "method"
            } else {
                "declaring_type"
            };
            let event = match &decision {
                Decision::Allowed => {
                    SecurityEvent::access_granted(username.as_deref(), &endpoint, &method)
                }
                Decision::Denied { message } => {
                    SecurityEvent::access_denied(username.as_deref(), &endpoint, &method, message)
                }
            };
            audit.log(
                event
                    .path(path.as_str())
                    .detail("declaring_type", target.declaring_type())
                    .detail("scope", scope),
            );
        }

        match decision {
            Decision::Allowed => forward(service, req),
            Decision::Denied { message } => {
                log::debug!("denied {}.{} to {}", endpoint, method, identity);
                reject(req, AuthError::AccessDenied { message })
            }
        }
    }
}

impl<Auth, S> EndpointAccessService<Auth, S> {
    fn not_found<B: 'static>(
        &self,
        req: ServiceRequest,
        path: &str,
        username: Option<&str>,
        endpoint: &str,
        method: &str,
    ) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>> {
        #[cfg(feature = "audit")]
        if let Some(audit) = &self.audit {
            audit.log(SecurityEvent::endpoint_not_found(username, endpoint, method).path(path));
        }
        #[cfg(not(feature = "audit"))]
        let _ = (path, username);

        reject(
            req,
            AuthError::EndpointNotFound {
                endpoint: endpoint.to_string(),
                method: method.to_string(),
            },
        )
    }
}

fn forward<S, B>(
    service: Rc<S>,
    req: ServiceRequest,
) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    let fut = service.call(req);
    Box::pin(async move {
        let res = fut.await?;
        Ok(res.map_into_left_body())
    })
}

fn reject<B: 'static>(
    req: ServiceRequest,
    error: AuthError,
) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>> {
    let response = error.error_response().map_into_right_body();
    Box::pin(async move { Ok(req.into_response(response)) })
}

/// Where a request path sits relative to the call prefix.
#[derive(Debug, PartialEq, Eq)]
enum CallPath<'a> {
    /// Not under the prefix.
    Outside,
    /// `{prefix}/{endpoint}/{method}`
    Call { endpoint: &'a str, method: &'a str },
    /// Under the prefix, but not exactly two non-empty segments.
    Malformed { endpoint: &'a str, method: &'a str },
}

fn classify_path<'a>(path: &'a str, prefix: &str) -> CallPath<'a> {
    let Some(rest) = path.strip_prefix(prefix.trim_end_matches('/')) else {
        return CallPath::Outside;
    };
    if !rest.is_empty() && !rest.starts_with('/') {
        return CallPath::Outside;
    }

    let rest = rest.strip_prefix('/').unwrap_or(rest);
    let (endpoint, method) = rest.split_once('/').unwrap_or((rest, ""));
    if endpoint.is_empty() || method.is_empty() || method.contains('/') {
        CallPath::Malformed { endpoint, method }
    } else {
        CallPath::Call { endpoint, method }
    }
}
