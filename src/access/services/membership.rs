//! Join requests and member administration.

use crate::access::domain::{
    AccessDenied, Action, Identity, JoinRequest, MembershipEvent, MembershipRecord, Role, UserId,
};
use crate::access::ports::{AccessStoreError, MembershipDirectory};
use crate::realtime::{Subscription, SubscriptionErrorKind, SubscriptionEvent};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Service-level errors for membership operations.
#[derive(Debug, Error)]
pub enum MembershipError {
    /// The acting user may not manage members.
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),

    /// No join request exists for the user.
    #[error("join request not found for user {0}")]
    RequestNotFound(UserId),

    /// Storage operation failed.
    #[error(transparent)]
    Store(#[from] AccessStoreError),
}

/// Result type for membership operations.
pub type MembershipResult<T> = Result<T, MembershipError>;

/// Membership administration for one board.
#[derive(Clone)]
pub struct MembershipService<M, C>
where
    M: MembershipDirectory,
    C: Clock + Send + Sync,
{
    directory: Arc<M>,
    clock: Arc<C>,
}

impl<M, C> MembershipService<M, C>
where
    M: MembershipDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a membership service.
    #[must_use]
    pub const fn new(directory: Arc<M>, clock: Arc<C>) -> Self {
        Self { directory, clock }
    }

    /// Files or refreshes a join request for the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::Store`] when the request cannot be saved.
    pub async fn request_access(&self, identity: &Identity) -> MembershipResult<JoinRequest> {
        let request = JoinRequest {
            user_id: identity.user_id.clone(),
            profile: identity.profile.clone(),
            created_at: Some(self.clock.utc()),
        };
        self.directory.upsert_join_request(&request).await?;
        info!(user = %request.user_id, "access requested");
        Ok(request)
    }

    /// Approves a pending join request with the default viewer role.
    ///
    /// # Errors
    ///
    /// Fails as [`Self::approve`] does.
    pub async fn approve_as_viewer(
        &self,
        actor: Role,
        user: &UserId,
    ) -> MembershipResult<MembershipRecord> {
        self.approve(actor, user, Role::default()).await
    }

    /// Grants `role` to the user behind a pending join request and consumes
    /// the request. Fields of an existing member document that the record
    /// does not name are kept.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::Forbidden`] unless `actor` is an
    /// administrator, [`MembershipError::RequestNotFound`] when no request
    /// is pending, or [`MembershipError::Store`] when a write fails.
    pub async fn approve(
        &self,
        actor: Role,
        user: &UserId,
        role: Role,
    ) -> MembershipResult<MembershipRecord> {
        require_admin(actor)?;
        let request = self
            .directory
            .join_request(user)
            .await?
            .ok_or_else(|| MembershipError::RequestNotFound(user.clone()))?;
        let record = MembershipRecord {
            user_id: request.user_id,
            role,
            profile: request.profile,
            added_at: Some(self.clock.utc()),
        };
        self.directory.upsert_member(&record).await?;
        self.directory.delete_join_request(user).await?;
        info!(user = %user, role = %role, "join request approved");
        Ok(record)
    }

    /// Discards a pending join request.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::Forbidden`] unless `actor` is an
    /// administrator, or [`MembershipError::Store`] when the delete fails.
    pub async fn deny(&self, actor: Role, user: &UserId) -> MembershipResult<()> {
        require_admin(actor)?;
        self.directory.delete_join_request(user).await?;
        info!(user = %user, "join request denied");
        Ok(())
    }

    /// Changes a member's role.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::Forbidden`] unless `actor` is an
    /// administrator, or [`MembershipError::Store`] when the user is not a
    /// member or the write fails.
    pub async fn set_role(&self, actor: Role, user: &UserId, role: Role) -> MembershipResult<()> {
        require_admin(actor)?;
        self.directory.set_role(user, role).await?;
        info!(user = %user, role = %role, "member role changed");
        Ok(())
    }

    /// Revokes a membership.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::Forbidden`] unless `actor` is an
    /// administrator, or [`MembershipError::Store`] when the delete fails.
    pub async fn remove(&self, actor: Role, user: &UserId) -> MembershipResult<()> {
        require_admin(actor)?;
        self.directory.delete_member(user).await?;
        info!(user = %user, "member removed");
        Ok(())
    }

    /// Lists members, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::Forbidden`] unless `actor` is an
    /// administrator, or [`MembershipError::Store`] when the read fails.
    pub async fn members(&self, actor: Role) -> MembershipResult<Vec<MembershipRecord>> {
        require_admin(actor)?;
        Ok(self.directory.list_members().await?)
    }

    /// Lists pending join requests, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::Forbidden`] unless `actor` is an
    /// administrator, or [`MembershipError::Store`] when the read fails.
    pub async fn join_requests(&self, actor: Role) -> MembershipResult<Vec<JoinRequest>> {
        require_admin(actor)?;
        Ok(self.directory.list_join_requests().await?)
    }

    /// Watches the member list.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::Forbidden`] unless `actor` is an
    /// administrator.
    pub fn subscribe_members(
        &self,
        actor: Role,
    ) -> MembershipResult<Subscription<Vec<MembershipRecord>>> {
        require_admin(actor)?;
        Ok(self.directory.subscribe_members())
    }

    /// Watches pending join requests.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::Forbidden`] unless `actor` is an
    /// administrator.
    pub fn subscribe_join_requests(
        &self,
        actor: Role,
    ) -> MembershipResult<Subscription<Vec<JoinRequest>>> {
        require_admin(actor)?;
        Ok(self.directory.subscribe_join_requests())
    }

    /// Watches whether `user` has a pending join request.
    #[must_use]
    pub fn watch_pending_request(&self, user: &UserId) -> Subscription<bool> {
        self.directory
            .subscribe_join_request(user)
            .map(|request| Ok(request.is_some()))
    }

    /// Watches `user`'s membership as events for the access guard.
    ///
    /// Subscription failures become [`MembershipEvent::Failed`] carrying
    /// the raw error text.
    #[must_use]
    pub fn watch_membership(&self, user: &UserId) -> Subscription<MembershipEvent> {
        self.directory.subscribe_membership(user).map(|record| {
            Ok(record.map_or(MembershipEvent::NotMember, |member| {
                MembershipEvent::Member(member.role)
            }))
        })
    }
}

/// Converts a membership notification, including failures, into a guard
/// event.
#[must_use]
pub fn membership_event(
    notification: SubscriptionEvent<MembershipEvent>,
) -> MembershipEvent {
    notification.unwrap_or_else(|err| {
        let text = match err.kind() {
            SubscriptionErrorKind::PermissionDenied => {
                format!("permission-denied: {}", err.message())
            }
            SubscriptionErrorKind::Decode | SubscriptionErrorKind::Backend => {
                err.message().to_owned()
            }
        };
        MembershipEvent::Failed(text)
    })
}

const fn require_admin(actor: Role) -> Result<(), AccessDenied> {
    if actor.permits(Action::ManageMembers) {
        Ok(())
    } else {
        Err(AccessDenied::InsufficientRole {
            role: actor,
            action: Action::ManageMembers,
        })
    }
}
