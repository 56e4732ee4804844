//! Membership roles and the actions they grant.

use super::ParseRoleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Access level granted by a board membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    /// Read-only access.
    #[default]
    Viewer,
    /// May create, edit, move and delete work items.
    Editor,
    /// Editor rights plus member administration.
    Admin,
}

impl Role {
    /// Returns the canonical storage code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Editor => "editor",
            Self::Admin => "admin",
        }
    }

    /// Returns `true` when the role grants `action`.
    #[must_use]
    pub const fn permits(self, action: Action) -> bool {
        match action {
            Action::EditItems => matches!(self, Self::Editor | Self::Admin),
            Action::ManageMembers => matches!(self, Self::Admin),
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "viewer" => Ok(Self::Viewer),
            "editor" => Ok(Self::Editor),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = ParseRoleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Create, edit, move, delete or record completion on work items.
    EditItems,
    /// Approve, deny, re-role or remove members.
    ManageMembers,
}

impl Action {
    /// Returns a short description used in refusal messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::EditItems => "edit work items",
            Self::ManageMembers => "manage members",
        }
    }
}
