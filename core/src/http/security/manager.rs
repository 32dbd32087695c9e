use std::sync::Arc;

use crate::http::security::checker::EndpointAccessChecker;
use crate::http::security::config::EndpointAccessConfig;
use crate::http::security::middleware::EndpointAccessTransform;
use crate::http::security::registry::EndpointRegistry;

/// Factory methods for the endpoint access components.
///
/// # Spring Equivalent
/// `AuthorizationManager` beans
pub struct AuthorizationManager {}

impl AuthorizationManager {
    pub fn endpoint_checker(config: &EndpointAccessConfig) -> EndpointAccessChecker {
        EndpointAccessChecker::new(config.is_dev_mode()).role_prefix(config.get_role_prefix())
    }

    pub fn endpoint_registry() -> EndpointRegistry {
        EndpointRegistry::new()
    }

    pub fn endpoint_access<Auth>(
        registry: EndpointRegistry,
        authenticator: Auth,
        config: EndpointAccessConfig,
    ) -> EndpointAccessTransform<Auth> {
        EndpointAccessTransform::new(Arc::new(registry), authenticator).config(config)
    }
}
