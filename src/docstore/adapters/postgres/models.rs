//! Diesel row models for document storage.

use super::schema::board_documents;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for documents.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = board_documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentRow {
    /// Owning namespace.
    pub namespace: String,
    /// Owning collection.
    pub collection: String,
    /// Document identifier.
    pub document_id: String,
    /// Document body.
    pub body: Value,
    /// Last write timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for documents; `updated_at` takes the column default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = board_documents)]
pub struct NewDocumentRow {
    /// Owning namespace.
    pub namespace: String,
    /// Owning collection.
    pub collection: String,
    /// Document identifier.
    pub document_id: String,
    /// Document body.
    pub body: Value,
}
