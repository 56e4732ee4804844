//! Signed-in users and the records kept about them.

use super::{Role, SessionToken, UserId};
use chrono::{DateTime, Utc};

/// Display metadata copied from the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    /// Email address.
    pub email: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Avatar URL.
    pub photo_url: Option<String>,
}

impl UserProfile {
    /// Creates an empty profile.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            email: None,
            display_name: None,
            photo_url: None,
        }
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Sets the avatar URL.
    #[must_use]
    pub fn with_photo_url(mut self, photo_url: impl Into<String>) -> Self {
        self.photo_url = Some(photo_url.into());
        self
    }
}

/// Authenticated user reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Provider-assigned identifier.
    pub user_id: UserId,
    /// Display metadata.
    pub profile: UserProfile,
}

impl Identity {
    /// Creates an identity.
    #[must_use]
    pub const fn new(user_id: UserId, profile: UserProfile) -> Self {
        Self { user_id, profile }
    }
}

/// Grant of a role on a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipRecord {
    /// Member identifier.
    pub user_id: UserId,
    /// Granted role.
    pub role: Role,
    /// Metadata copied from the join request.
    pub profile: UserProfile,
    /// When the membership was granted.
    pub added_at: Option<DateTime<Utc>>,
}

/// Pending request for board access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    /// Requesting user.
    pub user_id: UserId,
    /// Metadata of the requesting user.
    pub profile: UserProfile,
    /// When the request was last sent.
    pub created_at: Option<DateTime<Utc>>,
}

/// Marker of the one browser allowed to hold a session for an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSessionRecord {
    /// Token of the owning browser.
    pub token: SessionToken,
    /// When the session started.
    pub created_at: DateTime<Utc>,
    /// When the session was last resumed.
    pub last_seen: DateTime<Utc>,
}
