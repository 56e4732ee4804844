//! Soft single-session sign-in.
//!
//! Each account has one active-session marker holding the token of the
//! browser that opened it. A second browser signing in with a different or
//! missing token is signed straight back out. The marker is written by the
//! client itself, so this only deters casual sharing of an account.

use crate::access::domain::{ActiveSessionRecord, Identity, SessionToken};
use crate::access::ports::{AccessStoreError, ActiveSessionStore, IdentityError, IdentityProvider};
use crate::storage::{KeyValueStore, keys};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors returned by the single-session sign-in flow.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Another browser holds the session for this account.
    #[error("a session is already active for this user; end the previous session to sign in")]
    AlreadyActive,

    /// The matching session marker could not be refreshed.
    #[error("could not resume the session; try again")]
    CouldNotResume,

    /// The identity provider failed.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Reading the session marker failed.
    #[error(transparent)]
    Store(#[from] AccessStoreError),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Sign-in flow enforcing one browser per account.
#[derive(Clone)]
pub struct SingleSessionService<I, S, K, C>
where
    I: IdentityProvider,
    S: ActiveSessionStore,
    K: KeyValueStore,
    C: Clock + Send + Sync,
{
    identity: Arc<I>,
    sessions: Arc<S>,
    local: Arc<K>,
    clock: Arc<C>,
}

impl<I, S, K, C> SingleSessionService<I, S, K, C>
where
    I: IdentityProvider,
    S: ActiveSessionStore,
    K: KeyValueStore,
    C: Clock + Send + Sync,
{
    /// Creates the service. `local` remembers this browser's token.
    #[must_use]
    pub const fn new(identity: Arc<I>, sessions: Arc<S>, local: Arc<K>, clock: Arc<C>) -> Self {
        Self {
            identity,
            sessions,
            local,
            clock,
        }
    }

    /// Returns the token remembered by this browser.
    #[must_use]
    pub fn remembered_token(&self) -> Option<SessionToken> {
        let raw = match self.local.get(keys::SESSION_TOKEN) {
            Ok(stored) => stored?,
            Err(err) => {
                warn!(error = %err, "could not read remembered session token");
                return None;
            }
        };
        SessionToken::parse(&raw)
            .inspect_err(|err| warn!(error = %err, "ignoring malformed session token"))
            .ok()
    }

    /// Signs in, claiming or resuming the account's session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyActive`] when another browser holds the
    /// session or won a concurrent claim, [`SessionError::CouldNotResume`]
    /// when this browser's marker could not be refreshed, or the underlying
    /// error when sign-in or the marker read fails. The user is signed out
    /// whenever the session is refused.
    pub async fn sign_in(&self) -> SessionResult<Identity> {
        let identity = self.identity.sign_in().await?;
        let user = &identity.user_id;
        let existing = self.sessions.get(user).await?;
        let remembered = self.remembered_token();

        let Some(marker) = existing else {
            let now = self.clock.utc();
            let token = SessionToken::generate();
            let record = ActiveSessionRecord {
                token,
                created_at: now,
                last_seen: now,
            };
            if let Err(err) = self.sessions.create(user, &record).await {
                warn!(user = %user, error = %err, "session claim lost a race");
                return Err(self.refuse(SessionError::AlreadyActive).await);
            }
            self.remember(token);
            info!(user = %user, "session started");
            return Ok(identity);
        };

        if remembered != Some(marker.token) {
            info!(user = %user, "session active in another browser");
            return Err(self.refuse(SessionError::AlreadyActive).await);
        }
        if let Err(err) = self.sessions.touch(user, marker.token, self.clock.utc()).await {
            warn!(user = %user, error = %err, "could not refresh session marker");
            return Err(self.refuse(SessionError::CouldNotResume).await);
        }
        debug!(user = %user, "session resumed");
        Ok(identity)
    }

    /// Signs out, releasing the session marker when this browser owns it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Identity`] when the provider fails to sign
    /// out. Marker failures are logged and ignored.
    pub async fn sign_out(&self) -> SessionResult<()> {
        if let Some(identity) = self.identity.current() {
            self.release_marker(&identity).await;
        }
        self.forget();
        self.identity.sign_out().await?;
        Ok(())
    }

    async fn release_marker(&self, identity: &Identity) {
        let Some(token) = self.remembered_token() else {
            return;
        };
        let user = &identity.user_id;
        match self.sessions.get(user).await {
            Ok(Some(marker)) if marker.token == token => {
                if let Err(err) = self.sessions.delete(user).await {
                    warn!(user = %user, error = %err, "could not release session marker");
                }
            }
            Ok(_) => debug!(user = %user, "session marker not owned by this browser"),
            Err(err) => warn!(user = %user, error = %err, "could not read session marker"),
        }
    }

    async fn refuse(&self, reason: SessionError) -> SessionError {
        if let Err(err) = self.identity.sign_out().await {
            warn!(error = %err, "sign-out after refused session failed");
        }
        self.forget();
        reason
    }

    fn remember(&self, token: SessionToken) {
        if let Err(err) = self.local.set(keys::SESSION_TOKEN, &token.to_string()) {
            warn!(error = %err, "could not remember session token");
        }
    }

    fn forget(&self) {
        if let Err(err) = self.local.remove(keys::SESSION_TOKEN) {
            warn!(error = %err, "could not forget session token");
        }
    }
}
