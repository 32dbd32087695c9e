//! Audit trail of endpoint access decisions.
//!
//! # Spring Security Equivalent
//! `AuthorizationEventPublisher` (`AuthorizationGrantedEvent` / `AuthorizationDeniedEvent`)
//!
//! # Example
//!
//! ```ignore
//! use endpoint_access_core::http::security::audit::{AuditLogger, LogHandler};
//!
//! let audit = AuditLogger::new()
//!     .add_handler(LogHandler::new())
//!     .with_handler(|event| metrics::count(event.event_type.to_string()));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

/// Kinds of audited events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityEventType {
    /// The checker allowed an endpoint call
    AccessGranted,
    /// The checker denied an endpoint call
    AccessDenied,
    /// The called endpoint or method is not registered
    EndpointNotFound,
}

impl fmt::Display for SecurityEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityEventType::AccessGranted => write!(f, "ACCESS_GRANTED"),
            SecurityEventType::AccessDenied => write!(f, "ACCESS_DENIED"),
            SecurityEventType::EndpointNotFound => write!(f, "ENDPOINT_NOT_FOUND"),
        }
    }
}

impl SecurityEventType {
    pub fn default_severity(&self) -> SecurityEventSeverity {
        match self {
            SecurityEventType::AccessGranted => SecurityEventSeverity::Info,
            SecurityEventType::EndpointNotFound => SecurityEventSeverity::Warning,
            SecurityEventType::AccessDenied => SecurityEventSeverity::Error,
        }
    }
}

/// Severity level of security events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum SecurityEventSeverity {
    #[default]
    Info,
    Warning,
    Error,
}

impl fmt::Display for SecurityEventSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityEventSeverity::Info => write!(f, "INFO"),
            SecurityEventSeverity::Warning => write!(f, "WARNING"),
            SecurityEventSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// A security audit event.
#[derive(Debug, Clone)]
pub struct SecurityEvent {
    /// Unique event ID
    pub id: String,
    /// Unix epoch milliseconds
    pub timestamp: u64,
    pub event_type: SecurityEventType,
    pub severity: SecurityEventSeverity,
    /// Caller name; `None` for anonymous calls
    pub username: Option<String>,
    pub endpoint: Option<String>,
    pub method: Option<String>,
    /// Request path
    pub path: Option<String>,
    pub details: HashMap<String, String>,
    /// Denial message
    pub error: Option<String>,
}

impl SecurityEvent {
    pub fn new(event_type: SecurityEventType) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        Self {
            id: generate_event_id(),
            timestamp: now,
            severity: event_type.default_severity(),
            event_type,
            username: None,
            endpoint: None,
            method: None,
            path: None,
            details: HashMap::new(),
            error: None,
        }
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Creates an access granted event.
    pub fn access_granted(username: Option<&str>, endpoint: &str, method: &str) -> Self {
        Self::new(SecurityEventType::AccessGranted)
            .maybe_username(username)
            .endpoint(endpoint)
            .method(method)
    }

    /// Creates an access denied event.
    pub fn access_denied(username: Option<&str>, endpoint: &str, method: &str, reason: &str) -> Self {
        Self::new(SecurityEventType::AccessDenied)
            .maybe_username(username)
            .endpoint(endpoint)
            .method(method)
            .error(reason)
    }

    /// Creates an endpoint not found event.
    pub fn endpoint_not_found(username: Option<&str>, endpoint: &str, method: &str) -> Self {
        Self::new(SecurityEventType::EndpointNotFound)
            .maybe_username(username)
            .endpoint(endpoint)
            .method(method)
    }

    fn maybe_username(self, username: Option<&str>) -> Self {
        match username {
            Some(name) => self.username(name),
            None => self,
        }
    }

    /// Formats the event as a log line.
    pub fn to_log_line(&self) -> String {
        let mut parts = vec![
            format!("[{}]", self.severity),
            format!("[{}]", self.event_type),
        ];

        parts.push(format!(
            "user={}",
            self.username.as_deref().unwrap_or("<anonymous>")
        ));
        if let (Some(endpoint), Some(method)) = (&self.endpoint, &self.method) {
            parts.push(format!("target={}.{}", endpoint, method));
        }
        if let Some(ref path) = self.path {
            parts.push(format!("path={}", path));
        }
        if let Some(ref error) = self.error {
            parts.push(format!("error=\"{}\"", error));
        }
        let mut details: Vec<_> = self.details.iter().collect();
        details.sort();
        for (k, v) in details {
            parts.push(format!("{}={}", k, v));
        }

        parts.join(" ")
    }

    /// Formats the event as JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.to_log_line())
    }
}

impl serde::Serialize for SecurityEvent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("SecurityEvent", 10)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("timestamp", &self.timestamp)?;
        state.serialize_field("event_type", &self.event_type.to_string())?;
        state.serialize_field("severity", &self.severity.to_string())?;
        state.serialize_field("username", &self.username)?;
        state.serialize_field("endpoint", &self.endpoint)?;
        state.serialize_field("method", &self.method)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("details", &self.details)?;
        state.serialize_field("error", &self.error)?;
        state.end()
    }
}

fn generate_event_id() -> String {
    use rand::Rng;
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros();
    let random: u32 = rand::thread_rng().gen();
    format!("{:x}-{:08x}", timestamp, random)
}

/// Trait for handling security events.
pub trait SecurityEventHandler: Send + Sync {
    fn handle(&self, event: &SecurityEvent);
}

/// Handler writing events through the `log` facade.
#[derive(Default)]
pub struct LogHandler {
    min_severity: SecurityEventSeverity,
}

impl LogHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set minimum severity to log.
    pub fn min_severity(mut self, severity: SecurityEventSeverity) -> Self {
        self.min_severity = severity;
        self
    }
}

impl SecurityEventHandler for LogHandler {
    fn handle(&self, event: &SecurityEvent) {
        if event.severity < self.min_severity {
            return;
        }
        let level = match event.severity {
            SecurityEventSeverity::Info => log::Level::Info,
            SecurityEventSeverity::Warning | SecurityEventSeverity::Error => log::Level::Warn,
        };
        log::log!(target: "endpoint_access::audit", level, "{}", event.to_log_line());
    }
}

/// Handler that calls a closure.
pub struct ClosureHandler<F>
where
    F: Fn(&SecurityEvent) + Send + Sync,
{
    handler: F,
}

impl<F> ClosureHandler<F>
where
    F: Fn(&SecurityEvent) + Send + Sync,
{
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

impl<F> SecurityEventHandler for ClosureHandler<F>
where
    F: Fn(&SecurityEvent) + Send + Sync,
{
    fn handle(&self, event: &SecurityEvent) {
        (self.handler)(event);
    }
}

/// In-memory event store for testing and debugging.
#[derive(Clone)]
pub struct InMemoryEventStore {
    events: Arc<Mutex<Vec<SecurityEvent>>>,
    max_events: usize,
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            max_events: 10000,
        }
    }

    /// Set maximum events to keep; the oldest are dropped first.
    pub fn max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    pub fn get_events(&self) -> Vec<SecurityEvent> {
        self.lock().clone()
    }

    pub fn get_events_by_type(&self, event_type: &SecurityEventType) -> Vec<SecurityEvent> {
        self.lock()
            .iter()
            .filter(|e| &e.event_type == event_type)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SecurityEvent>> {
        // a panicking handler must not disable auditing
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SecurityEventHandler for InMemoryEventStore {
    fn handle(&self, event: &SecurityEvent) {
        let mut events = self.lock();
        events.push(event.clone());
        if events.len() > self.max_events {
            let excess = events.len() - self.max_events;
            events.drain(..excess);
        }
    }
}

/// The main audit logger.
#[derive(Clone)]
pub struct AuditLogger {
    handlers: Arc<Vec<Arc<dyn SecurityEventHandler>>>,
    enabled: bool,
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditLogger {
    /// Create a new audit logger with no handlers.
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
            enabled: true,
        }
    }

    /// Create an audit logger writing through the `log` facade.
    pub fn with_log() -> Self {
        Self::new().add_handler(LogHandler::new())
    }

    pub fn add_handler<H: SecurityEventHandler + 'static>(mut self, handler: H) -> Self {
        let handlers = Arc::make_mut(&mut self.handlers);
        handlers.push(Arc::new(handler));
        self
    }

    /// Add a closure as event handler.
    pub fn with_handler<F>(self, handler: F) -> Self
    where
        F: Fn(&SecurityEvent) + Send + Sync + 'static,
    {
        self.add_handler(ClosureHandler::new(handler))
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn log(&self, event: SecurityEvent) {
        if !self.enabled {
            return;
        }

        for handler in self.handlers.iter() {
            handler.handle(&event);
        }
    }
}
