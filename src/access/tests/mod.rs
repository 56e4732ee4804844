//! Unit tests for access control.


use crate::access::domain::{Identity, UserId, UserProfile};

fn identity(uid: &str) -> Identity {
    Identity::new(
        UserId::new(uid).expect("valid user id"),
        UserProfile::new()
            .with_email(format!("{uid}@example.com"))
            .with_display_name(uid.to_uppercase()),
    )
}
