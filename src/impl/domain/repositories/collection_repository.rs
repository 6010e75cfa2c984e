use async_trait::async_trait;

use crate::entities::{CollectionPath, Cursor, FetchPageError, FilterConfig, LedgerRecord, Page};

#[async_trait]
pub trait CollectionRepository<R: LedgerRecord>: Send + Sync {
    /// Fetch one page of typed records matching the filter configuration,
    /// continuing after `cursor` when given.
    async fn fetch_page(
        &self,
        path: &CollectionPath,
        config: &FilterConfig<R::SortField>,
        page_size: usize,
        cursor: Option<&Cursor>,
    ) -> Result<Page<R>, FetchPageError>;

    /// Read the whole collection, page by page, in store order.
    async fn fetch_all(
        &self,
        path: &CollectionPath,
        page_size: usize,
    ) -> Result<Vec<R>, FetchPageError>;
}
