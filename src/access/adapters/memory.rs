//! In-memory identity provider for local runs and tests.

use crate::access::domain::Identity;
use crate::access::ports::{IdentityError, IdentityProvider};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use tokio::sync::watch;

/// Identity provider that signs in a preconfigured account.
///
/// [`StaticIdentityProvider::set_account`] chooses who the next sign-in
/// returns; `None` makes sign-in report cancellation.
/// [`StaticIdentityProvider::force_sign_out`] simulates the provider
/// dropping the session on its own.
#[derive(Debug, Clone)]
pub struct StaticIdentityProvider {
    account: Arc<RwLock<Option<Identity>>>,
    current: Arc<watch::Sender<Option<Identity>>>,
}

impl StaticIdentityProvider {
    /// Creates a provider whose sign-in returns `account`.
    #[must_use]
    pub fn new(account: Option<Identity>) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            account: Arc::new(RwLock::new(account)),
            current: Arc::new(current),
        }
    }

    /// Replaces the account returned by the next sign-in.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Provider`] when the account lock is poisoned.
    pub fn set_account(&self, account: Option<Identity>) -> Result<(), IdentityError> {
        let mut guard = self
            .account
            .write()
            .map_err(|err| IdentityError::Provider(err.to_string()))?;
        *guard = account;
        Ok(())
    }

    /// Signs the current user out without going through the port.
    pub fn force_sign_out(&self) {
        self.current.send_replace(None);
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn sign_in(&self) -> Result<Identity, IdentityError> {
        let account = self
            .account
            .read()
            .map_err(|err| IdentityError::Provider(err.to_string()))?
            .clone();
        let identity = account.ok_or(IdentityError::Cancelled)?;
        self.current.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.current.send_replace(None);
        Ok(())
    }

    fn current(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    fn watch(&self) -> watch::Receiver<Option<Identity>> {
        self.current.subscribe()
    }
}
