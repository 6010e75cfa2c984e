use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::entities::{
    Constraint, Cursor, Document, DocumentFields, DocumentPage, FetchPageError, RecordId,
};

/// Read capability of the backing document store.
///
/// Implementations apply the constraints in the given order, start strictly
/// after `cursor` when one is given, and return at most `page_size`
/// documents. A query whose predicate and ordering combination needs a
/// composite index the store does not have must fail with
/// [`FetchPageError::IndexMissing`].
#[async_trait]
pub trait DocumentStoreDatasource: Send + Sync {
    async fn fetch_page(
        &self,
        collection_path: &str,
        constraints: &[Constraint],
        page_size: usize,
        cursor: Option<&Cursor>,
    ) -> Result<DocumentPage, FetchPageError>;

    /// Single document by id, `None` if it does not exist.
    async fn get_document(
        &self,
        collection_path: &str,
        id: &RecordId,
    ) -> Result<Option<Document>, ServerError>;
}

/// Write capability of the backing document store. Only restoring a backup
/// writes through this crate.
#[async_trait]
pub trait DocumentWriteDatasource: Send + Sync {
    /// Add a new document; the store assigns its id.
    async fn add_document(
        &self,
        collection_path: &str,
        fields: DocumentFields,
    ) -> Result<RecordId, ServerError>;

    /// Merge `fields` into the document with the given id, creating it if
    /// missing.
    async fn merge_document(
        &self,
        collection_path: &str,
        id: &RecordId,
        fields: DocumentFields,
    ) -> Result<(), ServerError>;
}
