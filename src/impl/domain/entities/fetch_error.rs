use fractic_server_error::ServerError;

use crate::errors::IndexMissing;

/// Failure of a single page fetch. Only a missing index is told apart, since
/// it is the one failure the list view reports to the user.
#[derive(Debug)]
pub enum FetchPageError {
    IndexMissing {
        collection_path: String,
        details: String,
    },
    Store(ServerError),
}

impl FetchPageError {
    pub fn is_index_missing(&self) -> bool {
        matches!(self, FetchPageError::IndexMissing { .. })
    }
}

impl From<ServerError> for FetchPageError {
    fn from(e: ServerError) -> Self {
        FetchPageError::Store(e)
    }
}

impl From<FetchPageError> for ServerError {
    fn from(e: FetchPageError) -> Self {
        match e {
            FetchPageError::IndexMissing {
                collection_path,
                details,
            } => IndexMissing::new(&collection_path, &details),
            FetchPageError::Store(e) => e,
        }
    }
}
