use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use fractic_server_error::ServerError;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::{
    data::datasources::document_store_datasource::{
        DocumentStoreDatasource, DocumentWriteDatasource,
    },
    domain::logic::backup_file::{backup_entry, parse_backup, BACKUP_COLLECTIONS},
    entities::{
        BackupSummary, CollectionId, CollectionPath, Cursor, RecordId, SETTINGS_COLLECTION,
        SETTINGS_DOCUMENT,
    },
    errors::{ReadError, SerializationFailed, WriteError},
};

#[async_trait]
pub trait BackupUsecase: Send + Sync {
    /// Every collection of `owner` as pretty JSON, keyed by collection name,
    /// plus the firm profile under `settings` when there is one.
    async fn export_json(&self, owner: &str) -> Result<String, ServerError>;

    async fn export_to_file<P>(&self, owner: &str, path: P) -> Result<(), ServerError>
    where
        P: AsRef<Path> + Send;
}

#[async_trait]
pub trait RestoreUsecase: Send + Sync {
    /// Add every record of the backup to `owner`'s collections as new
    /// documents, and merge the firm profile. The whole file is checked
    /// before anything is written.
    async fn import_json(&self, owner: &str, json: &str) -> Result<BackupSummary, ServerError>;

    async fn import_from_file<P>(&self, owner: &str, path: P) -> Result<BackupSummary, ServerError>
    where
        P: AsRef<Path> + Send;
}

pub(crate) struct BackupUsecaseImpl<D: DocumentStoreDatasource> {
    datasource: Arc<D>,
    page_size: usize,
}

impl<D: DocumentStoreDatasource> BackupUsecaseImpl<D> {
    pub(crate) fn new(datasource: Arc<D>, page_size: usize) -> Self {
        Self {
            datasource,
            page_size: page_size.max(1),
        }
    }

    /// Raw documents of one collection, page by page in store order. Records
    /// are not decoded, so fields unknown to the record types are kept and a
    /// malformed record does not fail the backup.
    async fn dump(&self, owner: &str, collection: CollectionId) -> Result<Value, ServerError> {
        let path = CollectionPath::new(owner, collection).to_string();
        let mut entries = Vec::new();
        let mut cursor: Option<Cursor> = None;
        loop {
            let page = self
                .datasource
                .fetch_page(&path, &[], self.page_size, cursor.as_ref())
                .await?;
            let is_full = page.documents.len() == self.page_size;
            entries.extend(page.documents.into_iter().map(backup_entry));
            match page.cursor {
                Some(next) if is_full => cursor = Some(next),
                _ => break,
            }
        }
        Ok(Value::Array(entries))
    }

    async fn dump_settings(&self, owner: &str) -> Result<Option<Value>, ServerError> {
        let profile = self
            .datasource
            .get_document(
                &CollectionPath::settings_of(owner),
                &RecordId::from(SETTINGS_DOCUMENT),
            )
            .await?;
        Ok(profile.map(|doc| Value::Array(vec![Value::Object(doc.fields)])))
    }
}

#[async_trait]
impl<D: DocumentStoreDatasource> BackupUsecase for BackupUsecaseImpl<D> {
    async fn export_json(&self, owner: &str) -> Result<String, ServerError> {
        let (a, b, c, d, e, f, settings) = futures::try_join!(
            self.dump(owner, BACKUP_COLLECTIONS[0]),
            self.dump(owner, BACKUP_COLLECTIONS[1]),
            self.dump(owner, BACKUP_COLLECTIONS[2]),
            self.dump(owner, BACKUP_COLLECTIONS[3]),
            self.dump(owner, BACKUP_COLLECTIONS[4]),
            self.dump(owner, BACKUP_COLLECTIONS[5]),
            self.dump_settings(owner),
        )?;
        let mut backup: Map<String, Value> = BACKUP_COLLECTIONS
            .iter()
            .map(|id| id.as_str().to_string())
            .zip([a, b, c, d, e, f])
            .collect();
        if let Some(settings) = settings {
            backup.insert(SETTINGS_COLLECTION.to_string(), settings);
        }
        info!(owner, collections = backup.len(), "backup assembled");
        serde_json::to_string_pretty(&backup).map_err(|e| SerializationFailed::with_debug("backup", &e))
    }

    async fn export_to_file<P>(&self, owner: &str, path: P) -> Result<(), ServerError>
    where
        P: AsRef<Path> + Send,
    {
        let json = self.export_json(owner).await?;
        let path = path.as_ref();
        tokio::fs::write(path, json)
            .await
            .map_err(|e| WriteError::with_debug(&path.display().to_string(), &e))
    }
}

pub(crate) struct RestoreUsecaseImpl<D: DocumentWriteDatasource> {
    datasource: Arc<D>,
}

impl<D: DocumentWriteDatasource> RestoreUsecaseImpl<D> {
    pub(crate) fn new(datasource: Arc<D>) -> Self {
        Self { datasource }
    }
}

#[async_trait]
impl<D: DocumentWriteDatasource> RestoreUsecase for RestoreUsecaseImpl<D> {
    async fn import_json(&self, owner: &str, json: &str) -> Result<BackupSummary, ServerError> {
        let parsed = parse_backup(json)?;
        let summary = parsed.summary();
        for (collection, records) in parsed.collections {
            let path = CollectionPath::new(owner, collection).to_string();
            for fields in records {
                self.datasource.add_document(&path, fields).await?;
            }
        }
        if let Some(profile) = parsed.settings {
            self.datasource
                .merge_document(
                    &CollectionPath::settings_of(owner),
                    &RecordId::from(SETTINGS_DOCUMENT),
                    profile,
                )
                .await?;
        }
        if summary.total_records() == 0 {
            warn!(owner, "restored backup holds no records");
        }
        info!(owner, records = summary.total_records(), settings = summary.settings, "backup restored");
        Ok(summary)
    }

    async fn import_from_file<P>(&self, owner: &str, path: P) -> Result<BackupSummary, ServerError>
    where
        P: AsRef<Path> + Send,
    {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ReadError::with_debug(&e))?;
        self.import_json(owner, &json).await
    }
}
