//! Shared world state for membership approval BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use prodboard::access::{
    adapters::{DocumentMembershipDirectory, DocumentSessionStore, StaticIdentityProvider},
    domain::{Identity, MembershipRecord, UserId, UserProfile},
    services::{MembershipResult, MembershipService, SessionResult, SingleSessionService},
};
use prodboard::board::domain::BoardId;
use prodboard::docstore::adapters::InMemoryDocumentStore;
use prodboard::storage::adapters::InMemoryKeyValueStore;
use rstest::fixture;

/// Membership service type used by the BDD world.
pub type TestMembershipService =
    MembershipService<DocumentMembershipDirectory<InMemoryDocumentStore>, DefaultClock>;

/// Sign-in flow of one browser.
pub type BrowserSession = SingleSessionService<
    StaticIdentityProvider,
    DocumentSessionStore<InMemoryDocumentStore>,
    InMemoryKeyValueStore,
    DefaultClock,
>;

/// Scenario world for membership behaviour tests.
pub struct MembershipWorld {
    pub clock: Arc<DefaultClock>,
    pub memberships: TestMembershipService,
    pub sessions: Arc<DocumentSessionStore<InMemoryDocumentStore>>,
    pub browsers: HashMap<String, BrowserSession>,
    pub signed_in: HashMap<String, Identity>,
    pub last_approval: Option<MembershipResult<MembershipRecord>>,
    pub last_sign_in: Option<SessionResult<Identity>>,
}

impl MembershipWorld {
    /// Creates a world over an empty document store.
    #[must_use]
    pub fn new() -> Self {
        let documents = Arc::new(InMemoryDocumentStore::new());
        let clock = Arc::new(DefaultClock);
        let directory = Arc::new(DocumentMembershipDirectory::new(
            Arc::clone(&documents),
            &BoardId::default(),
        ));
        Self {
            memberships: MembershipService::new(directory, Arc::clone(&clock)),
            sessions: Arc::new(DocumentSessionStore::new(documents)),
            clock,
            browsers: HashMap::new(),
            signed_in: HashMap::new(),
            last_approval: None,
            last_sign_in: None,
        }
    }

    /// Returns the sign-in flow of `browser`, opening it for `user` on
    /// first use.
    pub fn browser(&mut self, browser: &str, user: &str) -> Result<&BrowserSession, eyre::Report> {
        let account = identity(user)?;
        let sessions = Arc::clone(&self.sessions);
        let clock = Arc::clone(&self.clock);
        Ok(self.browsers.entry(browser.to_owned()).or_insert_with(|| {
            SingleSessionService::new(
                Arc::new(StaticIdentityProvider::new(Some(account))),
                sessions,
                Arc::new(InMemoryKeyValueStore::new()),
                clock,
            )
        }))
    }
}

impl Default for MembershipWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the identity of a scenario user.
pub fn identity(user: &str) -> Result<Identity, eyre::Report> {
    let user_id = UserId::new(user).map_err(|err| eyre::eyre!("invalid user '{user}': {err}"))?;
    Ok(Identity::new(
        user_id,
        UserProfile::new().with_email(format!("{user}@example.com")),
    ))
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> MembershipWorld {
    MembershipWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
