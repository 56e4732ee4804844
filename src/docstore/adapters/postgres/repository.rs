//! `PostgreSQL` document store implementation.

use super::{
    models::{DocumentRow, NewDocumentRow},
    poller::{fingerprint_document, fingerprint_documents, spawn_poller},
    schema::board_documents,
};
use crate::docstore::{
    CollectionPath, Document, DocumentPath,
    ports::{DocumentStore, DocumentStoreError, DocumentStoreResult},
};
use crate::realtime::Subscription;
use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::Error as DieselError;
use diesel::sql_types::{Jsonb, Text};
use diesel::upsert::excluded;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info};

/// `PostgreSQL` connection pool type used by the document store.
pub type DocumentPgPool = Pool<ConnectionManager<PgConnection>>;

const CREATE_SCHEMA_SQL: &str =
    include_str!("../../../../migrations/2026-01-01-000000_create_board_documents/up.sql");

const MERGE_SQL: &str = "UPDATE board_documents \
     SET body = body || $1, updated_at = now() \
     WHERE namespace = $2 AND collection = $3 AND document_id = $4";

const UPSERT_MERGE_SQL: &str = "INSERT INTO board_documents \
     (namespace, collection, document_id, body) VALUES ($1, $2, $3, $4) \
     ON CONFLICT (namespace, collection, document_id) \
     DO UPDATE SET body = board_documents.body || EXCLUDED.body, updated_at = now()";

/// `PostgreSQL`-backed realtime document store.
#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: DocumentPgPool,
    poll_interval: Duration,
}

impl PostgresDocumentStore {
    /// Creates a store from a connection pool.
    #[must_use]
    pub const fn new(pool: DocumentPgPool, poll_interval: Duration) -> Self {
        Self {
            pool,
            poll_interval,
        }
    }

    /// Builds a connection pool for `database_url` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Persistence`] when the pool cannot
    /// establish its initial connections.
    pub fn connect(database_url: &str, poll_interval: Duration) -> DocumentStoreResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .build(manager)
            .map_err(DocumentStoreError::persistence)?;
        info!("connected document store pool");
        Ok(Self::new(pool, poll_interval))
    }

    /// Returns the watch polling interval.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Creates the document table when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError`] when the DDL statement fails.
    pub async fn ensure_schema(&self) -> DocumentStoreResult<()> {
        run_blocking(self.pool.clone(), |connection| {
            connection
                .batch_execute(CREATE_SCHEMA_SQL)
                .map_err(map_diesel_error)
        })
        .await
    }
}

async fn run_blocking<F, T>(pool: DocumentPgPool, f: F) -> DocumentStoreResult<T>
where
    F: FnOnce(&mut PgConnection) -> DocumentStoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(DocumentStoreError::persistence)?;
        f(&mut connection)
    })
    .await
    .map_err(DocumentStoreError::persistence)?
}

async fn fetch_collection(
    pool: DocumentPgPool,
    collection: CollectionPath,
) -> DocumentStoreResult<Vec<Document>> {
    run_blocking(pool, move |connection| {
        let rows = board_documents::table
            .filter(board_documents::namespace.eq(collection.namespace()))
            .filter(board_documents::collection.eq(collection.collection()))
            .order(board_documents::document_id.asc())
            .select(DocumentRow::as_select())
            .load::<DocumentRow>(connection)
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_document).collect())
    })
    .await
}

async fn fetch_document(
    pool: DocumentPgPool,
    path: DocumentPath,
) -> DocumentStoreResult<Option<Document>> {
    run_blocking(pool, move |connection| {
        let row = board_documents::table
            .filter(board_documents::namespace.eq(path.collection().namespace()))
            .filter(board_documents::collection.eq(path.collection().collection()))
            .filter(board_documents::document_id.eq(path.id()))
            .select(DocumentRow::as_select())
            .first::<DocumentRow>(connection)
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_document))
    })
    .await
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn get(&self, path: &DocumentPath) -> DocumentStoreResult<Option<Document>> {
        fetch_document(self.pool.clone(), path.clone()).await
    }

    async fn list(&self, collection: &CollectionPath) -> DocumentStoreResult<Vec<Document>> {
        fetch_collection(self.pool.clone(), collection.clone()).await
    }

    async fn set(&self, path: &DocumentPath, body: Value) -> DocumentStoreResult<()> {
        let row = to_new_row(path, body);
        debug!(path = %path, "upserting document");
        run_blocking(self.pool.clone(), move |connection| {
            diesel::insert_into(board_documents::table)
                .values(&row)
                .on_conflict((
                    board_documents::namespace,
                    board_documents::collection,
                    board_documents::document_id,
                ))
                .do_update()
                .set((
                    board_documents::body.eq(excluded(board_documents::body)),
                    board_documents::updated_at.eq(diesel::dsl::now),
                ))
                .execute(connection)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await
    }

    async fn create(&self, path: &DocumentPath, body: Value) -> DocumentStoreResult<()> {
        let row = to_new_row(path, body);
        let created_path = path.clone();
        run_blocking(self.pool.clone(), move |connection| {
            let inserted = diesel::insert_into(board_documents::table)
                .values(&row)
                .on_conflict_do_nothing()
                .execute(connection)
                .map_err(map_diesel_error)?;
            if inserted == 0 {
                return Err(DocumentStoreError::AlreadyExists(created_path));
            }
            Ok(())
        })
        .await
    }

    async fn merge(
        &self,
        path: &DocumentPath,
        patch: Map<String, Value>,
    ) -> DocumentStoreResult<()> {
        let merged_path = path.clone();
        debug!(path = %path, "merging document");
        run_blocking(self.pool.clone(), move |connection| {
            diesel::sql_query(UPSERT_MERGE_SQL)
                .bind::<Text, _>(merged_path.collection().namespace())
                .bind::<Text, _>(merged_path.collection().collection())
                .bind::<Text, _>(merged_path.id())
                .bind::<Jsonb, _>(Value::Object(patch))
                .execute(connection)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await
    }

    async fn update(
        &self,
        path: &DocumentPath,
        patch: Map<String, Value>,
    ) -> DocumentStoreResult<()> {
        let updated_path = path.clone();
        run_blocking(self.pool.clone(), move |connection| {
            let affected = diesel::sql_query(MERGE_SQL)
                .bind::<Jsonb, _>(Value::Object(patch))
                .bind::<Text, _>(updated_path.collection().namespace())
                .bind::<Text, _>(updated_path.collection().collection())
                .bind::<Text, _>(updated_path.id())
                .execute(connection)
                .map_err(map_diesel_error)?;
            if affected == 0 {
                return Err(DocumentStoreError::NotFound(updated_path));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, path: &DocumentPath) -> DocumentStoreResult<()> {
        let deleted_path = path.clone();
        run_blocking(self.pool.clone(), move |connection| {
            diesel::delete(
                board_documents::table
                    .filter(board_documents::namespace.eq(deleted_path.collection().namespace()))
                    .filter(
                        board_documents::collection.eq(deleted_path.collection().collection()),
                    )
                    .filter(board_documents::document_id.eq(deleted_path.id())),
            )
            .execute(connection)
            .map_err(map_diesel_error)?;
            Ok(())
        })
        .await
    }

    fn subscribe_collection(&self, collection: &CollectionPath) -> Subscription<Vec<Document>> {
        let pool = self.pool.clone();
        let watched = collection.clone();
        spawn_poller(
            self.poll_interval,
            move || fetch_collection(pool.clone(), watched.clone()),
            |documents: &Vec<Document>| fingerprint_documents(documents),
        )
    }

    fn subscribe_document(&self, path: &DocumentPath) -> Subscription<Option<Document>> {
        let pool = self.pool.clone();
        let watched = path.clone();
        spawn_poller(
            self.poll_interval,
            move || fetch_document(pool.clone(), watched.clone()),
            |document: &Option<Document>| fingerprint_document(document.as_ref()),
        )
    }
}

pub(super) fn to_new_row(path: &DocumentPath, body: Value) -> NewDocumentRow {
    NewDocumentRow {
        namespace: path.collection().namespace().to_owned(),
        collection: path.collection().collection().to_owned(),
        document_id: path.id().to_owned(),
        body,
    }
}

pub(super) fn row_to_document(row: DocumentRow) -> Document {
    Document::new(row.document_id, row.body)
}

/// Maps Diesel errors onto document store errors.
///
/// `PostgreSQL` reports privilege failures (SQLSTATE 42501) without a
/// dedicated Diesel error kind, so they are recognised by message.
pub(super) fn map_diesel_error(err: DieselError) -> DocumentStoreError {
    if let DieselError::DatabaseError(_, ref info) = err
        && info.message().starts_with("permission denied")
    {
        return DocumentStoreError::PermissionDenied(info.message().to_owned());
    }
    DocumentStoreError::persistence(err)
}
