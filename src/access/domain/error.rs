//! Error types for access control values.

use super::{Action, Role};
use thiserror::Error;

/// Errors returned while constructing access values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessDomainError {
    /// A user identifier was empty after trimming.
    #[error("user identifier must not be empty")]
    EmptyUserId,

    /// A session token was not a UUID.
    #[error("invalid session token '{0}'")]
    InvalidSessionToken(String),
}

/// Error returned when parsing an unknown role.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

/// Error returned when the current user may not perform an action.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessDenied {
    /// Nobody is signed in, or membership is still unknown.
    #[error("sign-in and board membership required to {}", .0.describe())]
    NotAuthorized(Action),

    /// The member's role does not grant the action.
    #[error("role '{role}' may not {}", .action.describe())]
    InsufficientRole {
        /// Role held by the user.
        role: Role,
        /// Refused action.
        action: Action,
    },
}

impl AccessDenied {
    /// Returns the refused action.
    #[must_use]
    pub const fn action(&self) -> Action {
        match self {
            Self::NotAuthorized(action) | Self::InsufficientRole { action, .. } => *action,
        }
    }
}
