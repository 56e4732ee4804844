//! Shared test helpers for in-memory integration tests.

use mockable::{Clock, DefaultClock};
use prodboard::access::domain::{Identity, UserId, UserProfile};
use prodboard::board::domain::{WorkItemDetails, WorkItemId};
use rstest::fixture;
use std::sync::Arc;

/// Provides a shared clock.
#[fixture]
pub fn clock() -> Arc<DefaultClock> {
    Arc::new(DefaultClock)
}

/// Builds an identity with a derived e-mail address.
///
/// # Panics
///
/// Panics when `uid` is blank.
#[must_use]
pub fn identity(uid: &str) -> Identity {
    Identity::new(
        UserId::new(uid).expect("valid user id"),
        UserProfile::new().with_email(format!("{uid}@example.com")),
    )
}

/// Builds order details due today.
#[must_use]
pub fn details(number: &str, quantity: u32) -> WorkItemDetails {
    WorkItemDetails::new(number, quantity, DefaultClock.utc().date_naive())
}

/// Parses a work-item identifier.
///
/// # Panics
///
/// Panics when `raw` is blank.
#[must_use]
pub fn item_id(raw: &str) -> WorkItemId {
    WorkItemId::parse(raw).expect("valid work item id")
}
