//! Domain model for board access control.
//!
//! Identity, membership roles and the soft single-session marker, plus the
//! route guard state machine. Nothing here talks to a backend.

mod error;
mod guard;
mod ids;
mod profile;
mod role;

pub use error::{AccessDenied, AccessDomainError, ParseRoleError};
pub use guard::{AccessGuard, AccessState, MembershipEvent, Route, RouteDecision};
pub use ids::{SessionToken, UserId};
pub use profile::{ActiveSessionRecord, Identity, JoinRequest, MembershipRecord, UserProfile};
pub use role::{Action, Role};
