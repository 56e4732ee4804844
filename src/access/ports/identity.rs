//! External identity provider contract.

use crate::access::domain::Identity;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

/// Identity provider contract.
///
/// The provider owns the signed-in state; [`IdentityProvider::watch`]
/// reports every change, including sign-outs triggered elsewhere.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Runs the interactive sign-in flow.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the flow is cancelled or fails.
    async fn sign_in(&self) -> Result<Identity, IdentityError>;

    /// Signs the current user out.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Provider`] when the provider fails.
    async fn sign_out(&self) -> Result<(), IdentityError>;

    /// Returns the currently signed-in identity.
    fn current(&self) -> Option<Identity>;

    /// Watches the signed-in identity.
    fn watch(&self) -> watch::Receiver<Option<Identity>>;
}

/// Errors returned by identity providers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The user abandoned the sign-in flow.
    #[error("sign-in cancelled")]
    Cancelled,

    /// The provider reported a failure.
    #[error("identity provider error: {0}")]
    Provider(String),
}
