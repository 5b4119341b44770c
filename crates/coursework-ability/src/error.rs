//! Error types for authorization decisions
//!
//! A plain "no" is not an error: [`Ability::can`](crate::Ability::can) returns
//! `false`. Errors are reserved for [`Ability::require`](crate::Ability::require)
//! turning a denial into a failure, and for resources the engine cannot
//! classify.

use thiserror::Error;

use crate::actions::Action;
use crate::resources::ResourceKind;

/// Authorization error types.
#[derive(Debug, Error)]
pub enum AbilityError {
    /// The action was denied; carries the last message written during evaluation
    #[error("Access denied ({action} {resource}): {message}")]
    AccessDenied {
        /// The attempted action.
        action: Action,
        /// Canonical kind of the resource.
        resource: ResourceKind,
        /// Last message written by a rule predicate (may be empty).
        message: String,
    },

    /// The resource's type could not be resolved to a known kind
    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),
}

/// Result type for authorization operations.
pub type AbilityResult<T> = Result<T, AbilityError>;

impl AbilityError {
    /// Check if this error points at a programming or wiring fault.
    pub fn is_server_error(&self) -> bool {
        matches!(self, AbilityError::UnknownResourceType(_))
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AbilityError::AccessDenied { .. } => 403,
            AbilityError::UnknownResourceType(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AbilityError::AccessDenied { .. } => "ACCESS_DENIED",
            AbilityError::UnknownResourceType(_) => "UNKNOWN_RESOURCE_TYPE",
        }
    }
}
