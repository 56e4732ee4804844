//! Diesel schema for document storage.

diesel::table! {
    /// JSON documents grouped by namespace and collection.
    board_documents (namespace, collection, document_id) {
        /// Namespace such as `boards/default` or `global`.
        #[max_length = 255]
        namespace -> Varchar,
        /// Collection name within the namespace.
        #[max_length = 255]
        collection -> Varchar,
        /// Document identifier within the collection.
        #[max_length = 255]
        document_id -> Varchar,
        /// Document body.
        body -> Jsonb,
        /// Last write timestamp.
        updated_at -> Timestamptz,
    }
}
