use fractic_server_error::ServerError;
use serde_json::Value;

use crate::{
    entities::{Document, LedgerRecord},
    errors::InvalidDocument,
};

/// Decode a raw document into its typed record. The store keeps the id
/// outside the document body, so it is injected before decoding.
pub(crate) fn decode<R: LedgerRecord>(document: Document) -> Result<R, ServerError> {
    let Document { id, mut fields } = document;
    fields.remove("_id");
    fields.insert("id".to_string(), Value::String(id.0.clone()));
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| InvalidDocument::with_debug(R::COLLECTION.as_str(), id.as_str(), &e))
}
