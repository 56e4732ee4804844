//! Route guard driven by identity and membership notifications.
//!
//! The guard is a pure state machine. The embedding shell feeds it
//! identity-provider callbacks and membership subscription events, then asks
//! it how each route should be handled.

use super::{AccessDenied, Action, Identity, Role};
use std::fmt;
use tracing::debug;

/// Access state of the current user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessState {
    /// Waiting for the identity provider's first callback.
    CheckingAuth,
    /// Nobody is signed in.
    Unauthenticated,
    /// Signed in; waiting for the membership record.
    CheckingMembership,
    /// Signed in without a membership record, or the membership check
    /// failed with `error`.
    Unauthorized {
        /// Raw text of the subscription failure, when there was one.
        error: Option<String>,
    },
    /// Signed in with a membership granting `role`.
    Authorized(Role),
}

impl AccessState {
    /// Returns a stable code for logging.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CheckingAuth => "checking-auth",
            Self::Unauthenticated => "unauthenticated",
            Self::CheckingMembership => "checking-membership",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Authorized(_) => "authorized",
        }
    }
}

impl fmt::Display for AccessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification from the membership subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipEvent {
    /// The membership record exists with this role.
    Member(Role),
    /// No membership record exists.
    NotMember,
    /// The subscription failed.
    Failed(String),
}

/// Client-side navigation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Main board view.
    Board,
    /// Board settings.
    Settings,
    /// Member administration.
    AdminMembers,
    /// Sign-in screen.
    Login,
    /// Screen shown to signed-in non-members.
    NoAccess,
}

/// How a route should be handled in the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Show the route.
    Render,
    /// Show a loading indicator.
    Pending,
    /// Navigate elsewhere, replacing the history entry.
    Redirect(Route),
    /// Show an access error screen with this text.
    Error(String),
}

/// Access state machine for one board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGuard {
    state: AccessState,
    identity: Option<Identity>,
    local: bool,
}

impl AccessGuard {
    /// Creates a guard waiting for the identity provider.
    #[must_use]
    pub const fn remote() -> Self {
        Self {
            state: AccessState::CheckingAuth,
            identity: None,
            local: false,
        }
    }

    /// Creates a guard for local mode, where everyone is an administrator.
    #[must_use]
    pub const fn local() -> Self {
        Self {
            state: AccessState::Authorized(Role::Admin),
            identity: None,
            local: true,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> &AccessState {
        &self.state
    }

    /// Returns the signed-in identity, if any.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Returns the granted role, if authorized.
    #[must_use]
    pub const fn role(&self) -> Option<Role> {
        match self.state {
            AccessState::Authorized(role) => Some(role),
            _ => None,
        }
    }

    /// Returns `true` when the current role grants `action`.
    #[must_use]
    pub const fn can(&self, action: Action) -> bool {
        matches!(self.role(), Some(role) if role.permits(action))
    }

    /// Checks that the current role grants `action`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] when the user is not authorized or the role
    /// is too low.
    pub const fn require(&self, action: Action) -> Result<Role, AccessDenied> {
        match self.role() {
            Some(role) if role.permits(action) => Ok(role),
            Some(role) => Err(AccessDenied::InsufficientRole { role, action }),
            None => Err(AccessDenied::NotAuthorized(action)),
        }
    }

    /// Applies an identity-provider callback.
    ///
    /// Ignored in local mode.
    pub fn on_auth_changed(&mut self, identity: Option<Identity>) {
        if self.local {
            return;
        }
        let next = if identity.is_some() {
            AccessState::CheckingMembership
        } else {
            AccessState::Unauthenticated
        };
        self.identity = identity;
        self.transition(next);
    }

    /// Applies a membership subscription event.
    ///
    /// Ignored in local mode and while nobody is signed in.
    pub fn on_membership_event(&mut self, event: MembershipEvent) {
        if self.local || self.identity.is_none() {
            return;
        }
        let next = match event {
            MembershipEvent::Member(role) => AccessState::Authorized(role),
            MembershipEvent::NotMember => AccessState::Unauthorized { error: None },
            MembershipEvent::Failed(error) => AccessState::Unauthorized { error: Some(error) },
        };
        self.transition(next);
    }

    /// Decides how `route` should be handled.
    #[must_use]
    pub fn resolve(&self, route: Route) -> RouteDecision {
        match route {
            Route::Login => RouteDecision::Render,
            Route::NoAccess => match self.state {
                AccessState::Authorized(_) => RouteDecision::Redirect(Route::Board),
                _ => RouteDecision::Render,
            },
            Route::Board | Route::Settings => self.resolve_member_route(None),
            Route::AdminMembers => self.resolve_member_route(Some(Action::ManageMembers)),
        }
    }

    fn resolve_member_route(&self, needs: Option<Action>) -> RouteDecision {
        match &self.state {
            AccessState::CheckingAuth | AccessState::CheckingMembership => RouteDecision::Pending,
            AccessState::Unauthenticated => RouteDecision::Redirect(Route::Login),
            AccessState::Unauthorized { error: Some(error) } if needs.is_none() => {
                RouteDecision::Error(error.clone())
            }
            AccessState::Unauthorized { .. } => RouteDecision::Redirect(Route::NoAccess),
            AccessState::Authorized(role) => match needs {
                Some(action) if !role.permits(action) => RouteDecision::Redirect(Route::NoAccess),
                _ => RouteDecision::Render,
            },
        }
    }

    fn transition(&mut self, next: AccessState) {
        if self.state != next {
            debug!(from = %self.state, to = %next, "access state changed");
        }
        self.state = next;
    }
}
