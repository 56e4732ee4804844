//! In-memory integration tests for sign-in and membership gating.

use super::helpers::{clock, identity};
use mockable::DefaultClock;
use prodboard::access::{
    adapters::{DocumentMembershipDirectory, DocumentSessionStore, StaticIdentityProvider},
    domain::{AccessGuard, AccessState, Role, Route, RouteDecision},
    ports::IdentityProvider,
    services::{MembershipService, SessionError, SingleSessionService, membership_event},
};
use prodboard::board::domain::BoardId;
use prodboard::docstore::adapters::InMemoryDocumentStore;
use prodboard::storage::adapters::InMemoryKeyValueStore;
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_new_user_gains_access_once_approved(clock: Arc<DefaultClock>) {
    let documents = Arc::new(InMemoryDocumentStore::new());
    let directory = Arc::new(DocumentMembershipDirectory::new(
        Arc::clone(&documents),
        &BoardId::default(),
    ));
    let memberships = MembershipService::new(directory, Arc::clone(&clock));
    let provider = Arc::new(StaticIdentityProvider::new(Some(identity("rui"))));
    let sessions = SingleSessionService::new(
        Arc::clone(&provider),
        Arc::new(DocumentSessionStore::new(Arc::clone(&documents))),
        Arc::new(InMemoryKeyValueStore::new()),
        Arc::clone(&clock),
    );
    let mut guard = AccessGuard::remote();
    let mut auth = provider.watch();

    let signed_in = sessions.sign_in().await.expect("sign in");
    auth.changed().await.expect("auth callback");
    guard.on_auth_changed(auth.borrow_and_update().clone());
    assert_eq!(guard.resolve(Route::Board), RouteDecision::Pending);

    let mut membership = memberships.watch_membership(&signed_in.user_id);
    guard.on_membership_event(membership_event(
        membership.next().await.expect("initial membership"),
    ));
    assert_eq!(guard.resolve(Route::Board), RouteDecision::Redirect(Route::NoAccess));

    memberships
        .request_access(&signed_in)
        .await
        .expect("request access");
    let pending = memberships
        .join_requests(Role::Admin)
        .await
        .expect("list requests");
    assert_eq!(pending.len(), 1);
    memberships
        .approve(Role::Admin, &signed_in.user_id, Role::Editor)
        .await
        .expect("approve");

    guard.on_membership_event(membership_event(
        membership.next().await.expect("membership granted"),
    ));
    assert_eq!(guard.state(), &AccessState::Authorized(Role::Editor));
    assert_eq!(guard.resolve(Route::Board), RouteDecision::Render);
    assert_eq!(
        guard.resolve(Route::AdminMembers),
        RouteDecision::Redirect(Route::NoAccess)
    );

    sessions.sign_out().await.expect("sign out");
    auth.changed().await.expect("sign-out callback");
    guard.on_auth_changed(auth.borrow_and_update().clone());
    assert_eq!(guard.resolve(Route::Board), RouteDecision::Redirect(Route::Login));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sharing_an_account_across_browsers_is_refused(clock: Arc<DefaultClock>) {
    let documents = Arc::new(InMemoryDocumentStore::new());
    let sessions = Arc::new(DocumentSessionStore::new(documents));
    let browser = |uid: &str| {
        SingleSessionService::new(
            Arc::new(StaticIdentityProvider::new(Some(identity(uid)))),
            Arc::clone(&sessions),
            Arc::new(InMemoryKeyValueStore::new()),
            Arc::clone(&clock),
        )
    };
    let office = browser("rui");
    let shop_floor = browser("rui");
    let colleague = browser("lia");

    office.sign_in().await.expect("office signs in");
    let refused = shop_floor.sign_in().await;
    colleague.sign_in().await.expect("other accounts are unaffected");

    assert!(matches!(refused, Err(SessionError::AlreadyActive)));
    assert!(
        refused
            .expect_err("refused")
            .to_string()
            .contains("already active")
    );
}
