use chrono::NaiveDate;
use fractic_server_error::ServerError;
use serde_json::Value;

use crate::{
    entities::{BackupSummary, CollectionId, Document, DocumentFields, SETTINGS_COLLECTION},
    errors::InvalidBackup,
};

/// Collections carried by a backup, in file order.
pub const BACKUP_COLLECTIONS: [CollectionId; 6] = [
    CollectionId::LedgerEntries,
    CollectionId::Transactions,
    CollectionId::Inventory,
    CollectionId::Parties,
    CollectionId::Expenses,
    CollectionId::Vehicles,
];

/// Default name of a backup file taken on `day`.
pub fn backup_file_name(day: NaiveDate) -> String {
    format!("shopkeeper_backup_{}.json", day.format("%Y-%m-%d"))
}

/// Backup entry for a stored document: every stored field as is, plus its
/// id under `_id`.
pub(crate) fn backup_entry(document: Document) -> Value {
    let Document { id, mut fields } = document;
    fields.insert("_id".to_string(), Value::String(id.0));
    Value::Object(fields)
}

/// Backup contents ready to be written back, ids stripped.
#[derive(Debug)]
pub(crate) struct ParsedBackup {
    pub(crate) collections: Vec<(CollectionId, Vec<DocumentFields>)>,
    pub(crate) settings: Option<DocumentFields>,
}

impl ParsedBackup {
    pub(crate) fn summary(&self) -> BackupSummary {
        BackupSummary {
            collections: self
                .collections
                .iter()
                .map(|(id, records)| (*id, records.len()))
                .collect(),
            settings: self.settings.is_some(),
        }
    }
}

/// Check that `json` is a backup this crate can restore and count what it
/// holds. Fails if no known collection (nor the firm profile) is present.
pub fn validate_backup(json: &str) -> Result<BackupSummary, ServerError> {
    Ok(parse_backup(json)?.summary())
}

pub(crate) fn parse_backup(json: &str) -> Result<ParsedBackup, ServerError> {
    let root: Value =
        serde_json::from_str(json).map_err(|e| InvalidBackup::with_debug("not valid JSON", &e))?;
    let Value::Object(mut root) = root else {
        return Err(InvalidBackup::new("top level is not an object"));
    };

    let mut collections = Vec::new();
    for collection in BACKUP_COLLECTIONS {
        let Some(Value::Array(items)) = root.remove(collection.as_str()) else {
            continue;
        };
        let records = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                restorable_fields(item).ok_or_else(|| {
                    InvalidBackup::new(&format!("record {i} of '{collection}' is not an object"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        collections.push((collection, records));
    }

    let settings = match root.remove(SETTINGS_COLLECTION) {
        Some(Value::Array(items)) => items.into_iter().next().and_then(restorable_fields),
        Some(item) => restorable_fields(item),
        None => None,
    };

    let parsed = ParsedBackup {
        collections,
        settings,
    };
    if parsed.summary().is_empty() {
        return Err(InvalidBackup::new("no known collection found"));
    }
    Ok(parsed)
}

fn restorable_fields(item: Value) -> Option<DocumentFields> {
    let Value::Object(mut fields) = item else {
        return None;
    };
    fields.remove("id");
    fields.remove("_id");
    Some(fields)
}
