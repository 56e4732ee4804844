//! Application services for membership administration and sign-in.

mod membership;
mod session;

pub use membership::{MembershipError, MembershipResult, MembershipService, membership_event};
pub use session::{SessionError, SessionResult, SingleSessionService};
