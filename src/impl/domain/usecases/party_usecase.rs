use async_trait::async_trait;
use fractic_server_error::ServerError;
use tracing::debug;

use crate::{
    data::{
        datasources::document_store_datasource::DocumentStoreDatasource,
        repositories::collection_repository_impl::CollectionRepositoryImpl,
    },
    domain::{
        logic::party_ledger::{party_balance, PartyStatementGenerator},
        repositories::collection_repository::CollectionRepository,
    },
    entities::{
        CollectionId, CollectionPath, LedgerEntry, Party, PartyBalance, PartyStatement,
        PaymentTransaction,
    },
};

#[async_trait]
pub trait PartyUsecase: Send + Sync {
    async fn balance(&self, owner: &str, party: &Party) -> Result<PartyBalance, ServerError>;

    /// Bills and payments of `party_name` between `start` and `end`
    /// (inclusive `YYYY-MM-DD` days) with a running balance.
    async fn statement(
        &self,
        owner: &str,
        party_name: &str,
        start: &str,
        end: &str,
    ) -> Result<PartyStatement, ServerError>;
}

pub(crate) struct PartyUsecaseImpl<D: DocumentStoreDatasource> {
    repository: CollectionRepositoryImpl<D>,
    page_size: usize,
}

impl<D: DocumentStoreDatasource> PartyUsecaseImpl<D> {
    pub(crate) fn new(repository: CollectionRepositoryImpl<D>, page_size: usize) -> Self {
        Self {
            repository,
            page_size,
        }
    }

    async fn history(
        &self,
        owner: &str,
        party_name: &str,
    ) -> Result<(Vec<LedgerEntry>, Vec<PaymentTransaction>), ServerError> {
        let entries_path = CollectionPath::new(owner, CollectionId::LedgerEntries);
        let transactions_path = CollectionPath::new(owner, CollectionId::Transactions);
        let (mut entries, mut transactions) = futures::try_join!(
            CollectionRepository::<LedgerEntry>::fetch_all(
                &self.repository,
                &entries_path,
                self.page_size
            ),
            CollectionRepository::<PaymentTransaction>::fetch_all(
                &self.repository,
                &transactions_path,
                self.page_size
            ),
        )?;
        entries.retain(|e| e.party_name == party_name);
        transactions.retain(|t| t.party_name == party_name);
        debug!(
            owner,
            party_name,
            entries = entries.len(),
            transactions = transactions.len(),
            "loaded party history"
        );
        Ok((entries, transactions))
    }
}

#[async_trait]
impl<D: DocumentStoreDatasource> PartyUsecase for PartyUsecaseImpl<D> {
    async fn balance(&self, owner: &str, party: &Party) -> Result<PartyBalance, ServerError> {
        let (entries, transactions) = self.history(owner, &party.name).await?;
        Ok(party_balance(party.role, &entries, &transactions))
    }

    async fn statement(
        &self,
        owner: &str,
        party_name: &str,
        start: &str,
        end: &str,
    ) -> Result<PartyStatement, ServerError> {
        let generator = PartyStatementGenerator::new(party_name, start, end)?;
        let (entries, transactions) = self.history(owner, party_name).await?;
        Ok(generator.generate(&entries, &transactions))
    }
}
