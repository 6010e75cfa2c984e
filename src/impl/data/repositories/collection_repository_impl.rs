use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::{
    data::{
        datasources::document_store_datasource::DocumentStoreDatasource,
        models::document_model,
    },
    domain::{
        logic::constraint_builder::ConstraintBuilder,
        repositories::collection_repository::CollectionRepository,
    },
    entities::{CollectionPath, Cursor, FetchPageError, FilterConfig, LedgerRecord, Page},
};

pub struct CollectionRepositoryImpl<D: DocumentStoreDatasource> {
    datasource: Arc<D>,
}

impl<D: DocumentStoreDatasource> CollectionRepositoryImpl<D> {
    pub fn new(datasource: Arc<D>) -> Self {
        Self { datasource }
    }
}

impl<D: DocumentStoreDatasource> Clone for CollectionRepositoryImpl<D> {
    fn clone(&self) -> Self {
        Self {
            datasource: Arc::clone(&self.datasource),
        }
    }
}

#[async_trait]
impl<R, D> CollectionRepository<R> for CollectionRepositoryImpl<D>
where
    R: LedgerRecord,
    D: DocumentStoreDatasource,
{
    async fn fetch_page(
        &self,
        path: &CollectionPath,
        config: &FilterConfig<R::SortField>,
        page_size: usize,
        cursor: Option<&Cursor>,
    ) -> Result<Page<R>, FetchPageError> {
        let constraints = ConstraintBuilder::new(config).build()?;
        let page = self
            .datasource
            .fetch_page(&path.to_string(), &constraints, page_size, cursor)
            .await?;
        let is_full = page.documents.len() == page_size;
        let records = page
            .documents
            .into_iter()
            .map(document_model::decode::<R>)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            records,
            cursor: page.cursor,
            is_full,
        })
    }

    async fn fetch_all(
        &self,
        path: &CollectionPath,
        page_size: usize,
    ) -> Result<Vec<R>, FetchPageError> {
        let config = FilterConfig::<R::SortField>::default();
        let mut records = Vec::new();
        let mut cursor: Option<Cursor> = None;
        loop {
            let page = <Self as CollectionRepository<R>>::fetch_page(
                self,
                path,
                &config,
                page_size,
                cursor.as_ref(),
            )
            .await?;
            records.extend(page.records);
            match page.cursor {
                Some(next) if page.is_full => cursor = Some(next),
                _ => break,
            }
        }
        debug!(collection = %path, count = records.len(), "read whole collection");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        data::datasources::in_memory_document_store::InMemoryDocumentStore,
        entities::{CollectionId, DateFilter, Expense, ExpenseSortField, RecordId, SortDirection},
    };

    fn setup() -> (Arc<InMemoryDocumentStore>, CollectionPath) {
        let store = Arc::new(InMemoryDocumentStore::new());
        let path = CollectionPath::new("u1", CollectionId::Expenses);
        for (category, amount, date) in [
            ("Diesel", 900, "2024-03-02"),
            ("Tea", 40, "2024-03-05"),
            ("Rent", 5000, "2024-02-28"),
        ] {
            store
                .insert(&path, json!({ "category": category, "amount": amount, "date": date }))
                .unwrap();
        }
        (store, path)
    }

    #[tokio::test]
    async fn decodes_typed_page() {
        let (store, path) = setup();
        let repo = CollectionRepositoryImpl::new(store);
        let config =
            FilterConfig::sorted_by(ExpenseSortField::Amount).with_direction(SortDirection::Asc);
        let page = CollectionRepository::<Expense>::fetch_page(&repo, &path, &config, 2, None)
            .await
            .unwrap();
        assert!(page.is_full);
        let categories: Vec<_> = page.records.iter().map(|e| e.category.as_str()).collect();
        assert_eq!(categories, vec!["Tea", "Diesel"]);
    }

    #[tokio::test]
    async fn date_filter_applies_before_sort() {
        let (store, path) = setup();
        let repo = CollectionRepositoryImpl::new(store);
        let config = FilterConfig::sorted_by(ExpenseSortField::Date)
            .with_date_filter(DateFilter::new("2024-03-01", "2024-03-31"));
        let page = CollectionRepository::<Expense>::fetch_page(&repo, &path, &config, 20, None)
            .await
            .unwrap();
        assert!(!page.is_full);
        let categories: Vec<_> = page.records.iter().map(|e| e.category.as_str()).collect();
        assert_eq!(categories, vec!["Tea", "Diesel"]);
    }

    #[tokio::test]
    async fn malformed_document_is_a_store_failure() {
        let (store, path) = setup();
        store.insert(&path, json!({ "amount": 1 })).unwrap();
        let repo = CollectionRepositoryImpl::new(store);
        let result = CollectionRepository::<Expense>::fetch_page(
            &repo,
            &path,
            &FilterConfig::default(),
            20,
            None,
        )
        .await;
        assert!(matches!(result, Err(FetchPageError::Store(_))));
    }

    #[tokio::test]
    async fn fetch_all_walks_every_page() {
        let (store, path) = setup();
        let repo = CollectionRepositoryImpl::new(store);
        let all = CollectionRepository::<Expense>::fetch_all(&repo, &path, 2)
            .await
            .unwrap();
        let ids: Vec<_> = all.iter().map(|e| e.id.clone()).collect();
        assert_eq!(
            ids,
            vec![
                RecordId::from("doc00000001"),
                RecordId::from("doc00000002"),
                RecordId::from("doc00000003"),
            ]
        );
    }
}
