//! Membership and session markers kept in the document store.
//!
//! Members and join requests live under the board namespace, keyed by user
//! id. Session markers are global, one per account.

use crate::access::domain::{
    ActiveSessionRecord, JoinRequest, MembershipRecord, Role, SessionToken, UserId, UserProfile,
};
use crate::access::ports::{
    AccessStoreError, AccessStoreResult, ActiveSessionStore, MembershipDirectory,
};
use crate::board::domain::BoardId;
use crate::docstore::{CollectionPath, Document, DocumentStore, DocumentStoreError};
use crate::realtime::{Subscription, SubscriptionError, SubscriptionErrorKind};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::warn;

/// Collection of board members.
pub const MEMBERS_COLLECTION: &str = "members";
/// Collection of pending join requests.
pub const JOIN_REQUESTS_COLLECTION: &str = "joinRequests";
/// Namespace holding account-wide records.
pub const GLOBAL_NAMESPACE: &str = "global";
/// Collection of active-session markers.
pub const ACTIVE_SESSIONS_COLLECTION: &str = "active_sessions";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemberBody {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default, rename = "photoURL")]
    photo_url: Option<String>,
    #[serde(default)]
    added_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinRequestBody {
    #[serde(default)]
    uid: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default, rename = "photoURL")]
    photo_url: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionBody {
    session_id: SessionToken,
    created_at: DateTime<Utc>,
    last_seen: DateTime<Utc>,
}

/// Membership directory over a [`DocumentStore`].
#[derive(Debug, Clone)]
pub struct DocumentMembershipDirectory<D: DocumentStore> {
    store: Arc<D>,
    members: CollectionPath,
    requests: CollectionPath,
}

impl<D: DocumentStore> DocumentMembershipDirectory<D> {
    /// Creates a directory for `board`.
    #[must_use]
    pub fn new(store: Arc<D>, board: &BoardId) -> Self {
        Self {
            store,
            members: CollectionPath::new(board.namespace(), MEMBERS_COLLECTION),
            requests: CollectionPath::new(board.namespace(), JOIN_REQUESTS_COLLECTION),
        }
    }
}

#[async_trait]
impl<D: DocumentStore + 'static> MembershipDirectory for DocumentMembershipDirectory<D> {
    async fn membership(&self, user: &UserId) -> AccessStoreResult<Option<MembershipRecord>> {
        let document = self
            .store
            .get(&self.members.doc(user.as_str()))
            .await
            .map_err(map_store_error)?;
        document
            .as_ref()
            .map(decode_member)
            .transpose()
            .map_err(AccessStoreError::persistence)
    }

    async fn list_members(&self) -> AccessStoreResult<Vec<MembershipRecord>> {
        let documents = self.store.list(&self.members).await.map_err(map_store_error)?;
        Ok(members_newest_first(documents))
    }

    async fn upsert_member(&self, record: &MembershipRecord) -> AccessStoreResult<()> {
        let body = MemberBody {
            role: Some(record.role.as_str().to_owned()),
            email: record.profile.email.clone(),
            display_name: record.profile.display_name.clone(),
            photo_url: record.profile.photo_url.clone(),
            added_at: record.added_at,
        };
        let Value::Object(fields) =
            serde_json::to_value(body).map_err(AccessStoreError::persistence)?
        else {
            return Err(AccessStoreError::persistence(std::io::Error::other(
                "member body did not encode as an object",
            )));
        };
        self.store
            .merge(&self.members.doc(record.user_id.as_str()), fields)
            .await
            .map_err(map_store_error)
    }

    async fn set_role(&self, user: &UserId, role: Role) -> AccessStoreResult<()> {
        let mut patch = Map::new();
        patch.insert("role".to_owned(), Value::from(role.as_str()));
        self.store
            .update(&self.members.doc(user.as_str()), patch)
            .await
            .map_err(map_store_error)
    }

    async fn delete_member(&self, user: &UserId) -> AccessStoreResult<()> {
        self.store
            .delete(&self.members.doc(user.as_str()))
            .await
            .map_err(map_store_error)
    }

    async fn join_request(&self, user: &UserId) -> AccessStoreResult<Option<JoinRequest>> {
        let document = self
            .store
            .get(&self.requests.doc(user.as_str()))
            .await
            .map_err(map_store_error)?;
        document
            .as_ref()
            .map(decode_join_request)
            .transpose()
            .map_err(AccessStoreError::persistence)
    }

    async fn list_join_requests(&self) -> AccessStoreResult<Vec<JoinRequest>> {
        let documents = self.store.list(&self.requests).await.map_err(map_store_error)?;
        Ok(requests_newest_first(documents))
    }

    async fn upsert_join_request(&self, request: &JoinRequest) -> AccessStoreResult<()> {
        let body = JoinRequestBody {
            uid: Some(request.user_id.to_string()),
            email: request.profile.email.clone(),
            display_name: request.profile.display_name.clone(),
            photo_url: request.profile.photo_url.clone(),
            created_at: request.created_at,
        };
        let value = serde_json::to_value(body).map_err(AccessStoreError::persistence)?;
        self.store
            .set(&self.requests.doc(request.user_id.as_str()), value)
            .await
            .map_err(map_store_error)
    }

    async fn delete_join_request(&self, user: &UserId) -> AccessStoreResult<()> {
        self.store
            .delete(&self.requests.doc(user.as_str()))
            .await
            .map_err(map_store_error)
    }

    fn subscribe_membership(&self, user: &UserId) -> Subscription<Option<MembershipRecord>> {
        self.store
            .subscribe_document(&self.members.doc(user.as_str()))
            .map(|document| {
                document
                    .as_ref()
                    .map(decode_member)
                    .transpose()
                    .map_err(decode_failure)
            })
    }

    fn subscribe_members(&self) -> Subscription<Vec<MembershipRecord>> {
        self.store
            .subscribe_collection(&self.members)
            .map(|documents| Ok(members_newest_first(documents)))
    }

    fn subscribe_join_requests(&self) -> Subscription<Vec<JoinRequest>> {
        self.store
            .subscribe_collection(&self.requests)
            .map(|documents| Ok(requests_newest_first(documents)))
    }

    fn subscribe_join_request(&self, user: &UserId) -> Subscription<Option<JoinRequest>> {
        self.store
            .subscribe_document(&self.requests.doc(user.as_str()))
            .map(|document| {
                document
                    .as_ref()
                    .map(decode_join_request)
                    .transpose()
                    .map_err(decode_failure)
            })
    }
}

/// Active-session markers over a [`DocumentStore`].
#[derive(Debug, Clone)]
pub struct DocumentSessionStore<D: DocumentStore> {
    store: Arc<D>,
    sessions: CollectionPath,
}

impl<D: DocumentStore> DocumentSessionStore<D> {
    /// Creates a session store.
    #[must_use]
    pub fn new(store: Arc<D>) -> Self {
        Self {
            store,
            sessions: CollectionPath::new(GLOBAL_NAMESPACE, ACTIVE_SESSIONS_COLLECTION),
        }
    }
}

#[async_trait]
impl<D: DocumentStore + 'static> ActiveSessionStore for DocumentSessionStore<D> {
    async fn get(&self, user: &UserId) -> AccessStoreResult<Option<ActiveSessionRecord>> {
        let document = self
            .store
            .get(&self.sessions.doc(user.as_str()))
            .await
            .map_err(map_store_error)?;
        let Some(marker) = document else {
            return Ok(None);
        };
        let body: SessionBody = marker.decode().map_err(AccessStoreError::persistence)?;
        Ok(Some(ActiveSessionRecord {
            token: body.session_id,
            created_at: body.created_at,
            last_seen: body.last_seen,
        }))
    }

    async fn create(&self, user: &UserId, record: &ActiveSessionRecord) -> AccessStoreResult<()> {
        let body = SessionBody {
            session_id: record.token,
            created_at: record.created_at,
            last_seen: record.last_seen,
        };
        let value = serde_json::to_value(body).map_err(AccessStoreError::persistence)?;
        self.store
            .create(&self.sessions.doc(user.as_str()), value)
            .await
            .map_err(map_store_error)
    }

    async fn touch(
        &self,
        user: &UserId,
        token: SessionToken,
        seen_at: DateTime<Utc>,
    ) -> AccessStoreResult<()> {
        let mut patch = Map::new();
        patch.insert("sessionId".to_owned(), Value::from(token.to_string()));
        patch.insert("lastSeen".to_owned(), Value::from(seen_at.to_rfc3339()));
        self.store
            .update(&self.sessions.doc(user.as_str()), patch)
            .await
            .map_err(map_store_error)
    }

    async fn delete(&self, user: &UserId) -> AccessStoreResult<()> {
        self.store
            .delete(&self.sessions.doc(user.as_str()))
            .await
            .map_err(map_store_error)
    }
}

fn decode_member(document: &Document) -> Result<MembershipRecord, AccessRecordError> {
    let user_id = UserId::new(document.id()).map_err(|err| AccessRecordError(err.to_string()))?;
    let body: MemberBody = document
        .decode()
        .map_err(|err| AccessRecordError(err.to_string()))?;
    let role = match body.role.as_deref().map(Role::try_from) {
        None => Role::Viewer,
        Some(Ok(role)) => role,
        Some(Err(err)) => {
            warn!(user = %user_id, error = %err, "unknown member role; treating as viewer");
            Role::Viewer
        }
    };
    Ok(MembershipRecord {
        user_id,
        role,
        profile: UserProfile {
            email: body.email,
            display_name: body.display_name,
            photo_url: body.photo_url,
        },
        added_at: body.added_at,
    })
}

fn decode_join_request(document: &Document) -> Result<JoinRequest, AccessRecordError> {
    let user_id = UserId::new(document.id()).map_err(|err| AccessRecordError(err.to_string()))?;
    let body: JoinRequestBody = document
        .decode()
        .map_err(|err| AccessRecordError(err.to_string()))?;
    Ok(JoinRequest {
        user_id,
        profile: UserProfile {
            email: body.email,
            display_name: body.display_name,
            photo_url: body.photo_url,
        },
        created_at: body.created_at,
    })
}

fn members_newest_first(documents: Vec<Document>) -> Vec<MembershipRecord> {
    let mut members: Vec<MembershipRecord> = documents
        .into_iter()
        .filter_map(|document| {
            decode_member(&document)
                .inspect_err(|err| warn!(document = document.id(), error = %err, "skipping member"))
                .ok()
        })
        .collect();
    members.sort_by(|left, right| right.added_at.cmp(&left.added_at));
    members
}

fn requests_newest_first(documents: Vec<Document>) -> Vec<JoinRequest> {
    let mut requests: Vec<JoinRequest> = documents
        .into_iter()
        .filter_map(|document| {
            decode_join_request(&document)
                .inspect_err(|err| {
                    warn!(document = document.id(), error = %err, "skipping join request");
                })
                .ok()
        })
        .collect();
    requests.sort_by(|left, right| right.created_at.cmp(&left.created_at));
    requests
}

#[derive(Debug, thiserror::Error)]
#[error("malformed access record: {0}")]
struct AccessRecordError(String);

fn decode_failure(err: AccessRecordError) -> SubscriptionError {
    SubscriptionError::new(SubscriptionErrorKind::Decode, err.0)
}

fn map_store_error(err: DocumentStoreError) -> AccessStoreError {
    match err {
        DocumentStoreError::NotFound(path) => AccessStoreError::NotFound(path.to_string()),
        DocumentStoreError::AlreadyExists(path) => {
            AccessStoreError::AlreadyExists(path.to_string())
        }
        DocumentStoreError::PermissionDenied(message) => {
            AccessStoreError::PermissionDenied(message)
        }
        DocumentStoreError::Persistence(source) => AccessStoreError::Persistence(source),
    }
}
