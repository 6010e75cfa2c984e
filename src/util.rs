use std::{path::Path, sync::Arc};

use fractic_server_error::ServerError;

use crate::{
    data::{
        datasources::{
            document_store_datasource::{DocumentStoreDatasource, DocumentWriteDatasource},
            settings_ron_datasource::{SettingsRonDatasource as _, SettingsRonDatasourceImpl},
        },
        repositories::collection_repository_impl::CollectionRepositoryImpl,
    },
    domain::{
        logic::{
            backup_file::validate_backup, debounced_value::DebouncedValue,
            paginated_window::PaginatedWindow,
        },
        usecases::{
            backup_usecase::{
                BackupUsecase as _, BackupUsecaseImpl, RestoreUsecase as _, RestoreUsecaseImpl,
            },
            party_usecase::{PartyUsecase as _, PartyUsecaseImpl},
        },
    },
    entities::{BackupSummary, LedgerRecord, LedgerSettings, Party, PartyBalance, PartyStatement},
};

pub type LedgerWindow<R, D> = PaginatedWindow<R, CollectionRepositoryImpl<D>>;

/// Entry point for an app screen: hands out list windows and search inputs
/// configured from one set of settings, and runs the whole-collection
/// helpers (balances, statements, backups) against the same store.
pub struct ShopLedgerUtil<D: DocumentStoreDatasource> {
    datasource: Arc<D>,
    settings: LedgerSettings,
    repository: CollectionRepositoryImpl<D>,
    backup_usecase: BackupUsecaseImpl<D>,
    party_usecase: PartyUsecaseImpl<D>,
}

impl<D: DocumentStoreDatasource> ShopLedgerUtil<D> {
    pub fn new(datasource: Arc<D>, settings: LedgerSettings) -> Self {
        let repository = CollectionRepositoryImpl::new(Arc::clone(&datasource));
        Self {
            backup_usecase: BackupUsecaseImpl::new(Arc::clone(&datasource), settings.page_size),
            party_usecase: PartyUsecaseImpl::new(repository.clone(), settings.page_size),
            repository,
            datasource,
            settings,
        }
    }

    pub fn from_settings_str(datasource: Arc<D>, settings_ron: &str) -> Result<Self, ServerError> {
        let settings = SettingsRonDatasourceImpl::new().from_string(settings_ron)?;
        Ok(Self::new(datasource, settings))
    }

    pub fn from_settings_file<P>(datasource: Arc<D>, settings_ron: P) -> Result<Self, ServerError>
    where
        P: AsRef<Path>,
    {
        let settings = SettingsRonDatasourceImpl::new().from_file(settings_ron)?;
        Ok(Self::new(datasource, settings))
    }

    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }

    /// A fresh, unbound list window over records of type `R`.
    pub fn window<R: LedgerRecord>(&self) -> LedgerWindow<R, D> {
        PaginatedWindow::with_settings(self.repository.clone(), &self.settings)
    }

    /// Debounced search box text, starting empty.
    pub fn search_input(&self) -> DebouncedValue<String> {
        DebouncedValue::new(String::new(), self.settings.search_debounce)
    }

    pub async fn party_balance(&self, owner: &str, party: &Party) -> Result<PartyBalance, ServerError> {
        self.party_usecase.balance(owner, party).await
    }

    pub async fn party_statement(
        &self,
        owner: &str,
        party_name: &str,
        start: &str,
        end: &str,
    ) -> Result<PartyStatement, ServerError> {
        self.party_usecase
            .statement(owner, party_name, start, end)
            .await
    }

    pub async fn backup_json(&self, owner: &str) -> Result<String, ServerError> {
        self.backup_usecase.export_json(owner).await
    }

    pub async fn backup_to_file<P>(&self, owner: &str, path: P) -> Result<(), ServerError>
    where
        P: AsRef<Path> + Send,
    {
        self.backup_usecase.export_to_file(owner, path).await
    }

    /// Count what a backup file holds without writing anything.
    pub fn validate_backup(&self, json: &str) -> Result<BackupSummary, ServerError> {
        validate_backup(json)
    }
}

impl<D: DocumentStoreDatasource + DocumentWriteDatasource> ShopLedgerUtil<D> {
    /// Add every record of a backup to `owner`'s collections.
    pub async fn restore_json(&self, owner: &str, json: &str) -> Result<BackupSummary, ServerError> {
        RestoreUsecaseImpl::new(Arc::clone(&self.datasource))
            .import_json(owner, json)
            .await
    }

    pub async fn restore_from_file<P>(&self, owner: &str, path: P) -> Result<BackupSummary, ServerError>
    where
        P: AsRef<Path> + Send,
    {
        RestoreUsecaseImpl::new(Arc::clone(&self.datasource))
            .import_from_file(owner, path)
            .await
    }
}
