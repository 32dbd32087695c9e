//! Endpoint registry.
//!
//! Security markers are collected at compile time by the `#[endpoint]` and
//! `#[endpoint_exposed]` macros into a [`TypeDefinition`]. At startup the
//! definitions are registered here, which flattens `extends` chains and
//! records, for every callable method, the type that declares it.
//!
//! # Declaring type
//! A method inherited from an `#[endpoint_exposed]` parent keeps the parent
//! as its declaring type, so an unmarked inherited method falls back to the
//! parent's type-level markers, not the endpoint's. Re-declaring the method
//! in the endpoint's impl block makes the endpoint its declaring type.
//!
//! Endpoint and method names are matched case-insensitively.

use std::collections::HashMap;

use crate::http::auth::ScopePolicy;
use crate::http::error::RegistryError;
use crate::http::security::target::PolicyLookup;

/// Implemented by the `#[endpoint]` and `#[endpoint_exposed]` macros.
pub trait EndpointType {
    fn definition() -> TypeDefinition;
}

/// A method as declared in one impl block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDefinition {
    name: String,
    policy: ScopePolicy,
}

impl MethodDefinition {
    pub fn new(name: impl Into<String>, policy: ScopePolicy) -> Self {
        MethodDefinition {
            name: name.into(),
            policy,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> &ScopePolicy {
        &self.policy
    }
}

/// Security metadata of one type: its own markers, its methods, and the
/// parent it extends.
///
/// # Example
/// ```
/// use endpoint_access_core::http::auth::ScopePolicy;
/// use endpoint_access_core::http::security::{EndpointRegistry, TypeDefinition};
///
/// let definition = TypeDefinition::new("app::OrderEndpoint", "OrderEndpoint")
///     .endpoint(None)
///     .policy(ScopePolicy::unspecified().permit_all())
///     .method("list", ScopePolicy::unspecified())
///     .method("cancel", ScopePolicy::unspecified().roles_allowed(&["ADMIN"]));
///
/// let mut registry = EndpointRegistry::new();
/// registry.register_definition(definition).unwrap();
/// assert!(registry.resolve("orderendpoint", "LIST").is_some());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDefinition {
    type_name: String,
    simple_name: String,
    endpoint_name: Option<String>,
    is_endpoint: bool,
    policy: ScopePolicy,
    methods: Vec<MethodDefinition>,
    parent: Option<Box<TypeDefinition>>,
}

impl TypeDefinition {
    /// Starts a definition for an exposed (not directly callable) type.
    pub fn new(type_name: impl Into<String>, simple_name: impl Into<String>) -> Self {
        TypeDefinition {
            type_name: type_name.into(),
            simple_name: simple_name.into(),
            endpoint_name: None,
            is_endpoint: false,
            policy: ScopePolicy::unspecified(),
            methods: Vec::new(),
            parent: None,
        }
    }

    /// Marks the type as a callable endpoint, optionally under a custom name.
    pub fn endpoint(mut self, name: Option<&str>) -> Self {
        self.is_endpoint = true;
        self.endpoint_name = name.filter(|n| !n.is_empty()).map(str::to_string);
        self
    }

    /// Sets the type-level policy.
    pub fn policy(mut self, policy: ScopePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Adds a public method.
    pub fn method(mut self, name: impl Into<String>, policy: ScopePolicy) -> Self {
        self.methods.push(MethodDefinition::new(name, policy));
        self
    }

    /// Sets the parent whose methods this type inherits.
    pub fn extends(mut self, parent: TypeDefinition) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Fully qualified type name, as returned by `std::any::type_name`.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    /// Name the endpoint is called by: the custom name or the type's simple name.
    pub fn endpoint_name(&self) -> &str {
        self.endpoint_name.as_deref().unwrap_or(&self.simple_name)
    }

    pub fn is_endpoint(&self) -> bool {
        self.is_endpoint
    }

    pub fn type_policy(&self) -> &ScopePolicy {
        &self.policy
    }

    pub fn methods(&self) -> &[MethodDefinition] {
        &self.methods
    }

    pub fn parent(&self) -> Option<&TypeDefinition> {
        self.parent.as_deref()
    }
}

#[derive(Clone, Debug)]
struct MethodEntry {
    name: String,
    declaring_type: String,
    policy: ScopePolicy,
}

#[derive(Clone, Debug)]
struct EndpointEntry {
    name: String,
    type_name: String,
    methods: HashMap<String, MethodEntry>,
}

/// Registered endpoints and the type-level policy of every type involved.
#[derive(Clone, Debug, Default)]
pub struct EndpointRegistry {
    endpoints: HashMap<String, EndpointEntry>,
    types: HashMap<String, ScopePolicy>,
}

impl EndpointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the endpoint implemented by `T`.
    pub fn register<T: EndpointType>(&mut self) -> Result<&mut Self, RegistryError> {
        self.register_definition(T::definition())
    }

    /// Registers `T` and returns the registry (builder pattern).
    pub fn with<T: EndpointType>(mut self) -> Result<Self, RegistryError> {
        self.register::<T>()?;
        Ok(self)
    }

    /// Registers an endpoint from its definition.
    pub fn register_definition(
        &mut self,
        definition: TypeDefinition,
    ) -> Result<&mut Self, RegistryError> {
        if !definition.is_endpoint() {
            return Err(RegistryError::NotAnEndpoint {
                type_name: definition.type_name().to_string(),
            });
        }

        let name = definition.endpoint_name().to_string();
        let key = name.to_lowercase();
        if let Some(existing) = self.endpoints.get(&key) {
            return Err(RegistryError::DuplicateEndpoint {
                name,
                existing: existing.type_name.clone(),
            });
        }

        let mut methods = HashMap::new();
        self.collect(&definition, &mut methods);

        log::debug!(
            "registered endpoint '{}' ({}) with {} method(s)",
            name,
            definition.type_name(),
            methods.len()
        );

        self.endpoints.insert(
            key,
            EndpointEntry {
                name,
                type_name: definition.type_name().to_string(),
                methods,
            },
        );
        Ok(self)
    }

    /// Walks the `extends` chain root first, so the most specific declaration wins.
    fn collect(&mut self, definition: &TypeDefinition, methods: &mut HashMap<String, MethodEntry>) {
        if let Some(parent) = definition.parent() {
            self.collect(parent, methods);
        }

        self.types
            .insert(definition.type_name().to_string(), definition.type_policy().clone());

        for method in definition.methods() {
            methods.insert(
                method.name().to_lowercase(),
                MethodEntry {
                    name: method.name().to_string(),
                    declaring_type: definition.type_name().to_string(),
                    policy: method.policy().clone(),
                },
            );
        }
    }

    /// Resolves a call to `endpoint.method`.
    pub fn resolve(&self, endpoint: &str, method: &str) -> Option<TargetRef<'_>> {
        let entry = self.endpoints.get(&endpoint.to_lowercase())?;
        let method = entry.methods.get(&method.to_lowercase())?;
        let declaring_type_policy = self.types.get(&method.declaring_type)?;

        Some(TargetRef {
            endpoint: &entry.name,
            method_name: &method.name,
            declaring_type: &method.declaring_type,
            method_policy: &method.policy,
            declaring_type_policy,
        })
    }

    /// Returns the endpoint registered under `name`.
    pub fn endpoint(&self, name: &str) -> Option<EndpointRef<'_>> {
        let entry = self.endpoints.get(&name.to_lowercase())?;
        let type_policy = self.types.get(&entry.type_name)?;
        Some(EndpointRef { entry, type_policy })
    }

    /// Names of all registered endpoints, sorted.
    pub fn endpoint_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.endpoints.values().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

/// A resolved endpoint method and the policies of its two scopes.
#[derive(Clone, Copy, Debug)]
pub struct TargetRef<'r> {
    endpoint: &'r str,
    method_name: &'r str,
    declaring_type: &'r str,
    method_policy: &'r ScopePolicy,
    declaring_type_policy: &'r ScopePolicy,
}

impl<'r> TargetRef<'r> {
    pub fn endpoint(&self) -> &'r str {
        self.endpoint
    }

    pub fn method(&self) -> &'r str {
        self.method_name
    }

    /// Fully qualified name of the type declaring the method.
    pub fn declaring_type(&self) -> &'r str {
        self.declaring_type
    }
}

impl PolicyLookup for TargetRef<'_> {
    fn method_policy(&self) -> &ScopePolicy {
        self.method_policy
    }

    fn declaring_type_policy(&self) -> &ScopePolicy {
        self.declaring_type_policy
    }
}

/// A registered endpoint.
#[derive(Clone, Copy, Debug)]
pub struct EndpointRef<'r> {
    entry: &'r EndpointEntry,
    type_policy: &'r ScopePolicy,
}

impl<'r> EndpointRef<'r> {
    pub fn name(&self) -> &'r str {
        &self.entry.name
    }

    pub fn type_name(&self) -> &'r str {
        &self.entry.type_name
    }

    /// Type-level policy of the endpoint type itself.
    pub fn type_policy(&self) -> &'r ScopePolicy {
        self.type_policy
    }

    /// Callable method names, sorted.
    pub fn method_names(&self) -> Vec<&'r str> {
        let mut names: Vec<&str> = self.entry.methods.values().map(|m| m.name.as_str()).collect();
        names.sort_unstable();
        names
    }
}
