//! Outcome of an access decision.

use std::fmt;

use crate::http::error::AuthError;

/// Result of checking one endpoint invocation.
///
/// Denial is a normal value, not an error; callers translate it into a
/// transport-level rejection with [`Decision::into_result`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// The call may proceed.
    Allowed,
    /// The call must be rejected.
    Denied { message: String },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }

    pub fn is_denied(&self) -> bool {
        !self.is_allowed()
    }

    /// Returns the diagnostic message of a denial.
    pub fn message(&self) -> Option<&str> {
        match self {
            Decision::Allowed => None,
            Decision::Denied { message } => Some(message),
        }
    }

    /// Converts the decision into a `Result` suitable for `?` in handlers.
    pub fn into_result(self) -> Result<(), AuthError> {
        match self {
            Decision::Allowed => Ok(()),
            Decision::Denied { message } => Err(AuthError::AccessDenied { message }),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allowed => f.write_str("allowed"),
            Decision::Denied { message } => write!(f, "denied ({})", message),
        }
    }
}
