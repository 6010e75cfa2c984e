use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use super::records::RecordId;

pub type DocumentFields = serde_json::Map<String, serde_json::Value>;

/// Raw snapshot of one stored document.
#[derive(Debug, PartialEq, Clone)]
pub struct Document {
    pub id: RecordId,
    pub fields: DocumentFields,
}

/// Opaque continuation point: the last document of a fetched page. The next
/// page starts strictly after it.
#[derive(Debug, PartialEq, Clone)]
pub struct Cursor {
    last: Document,
}

impl Cursor {
    pub fn after(document: &Document) -> Self {
        Self {
            last: document.clone(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.last
    }

    /// Stable string form, suitable as a UI key.
    pub fn token(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.last.id.as_str())
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct DocumentPage {
    pub documents: Vec<Document>,
    pub cursor: Option<Cursor>,
}

impl DocumentPage {
    pub fn new(documents: Vec<Document>) -> Self {
        let cursor = documents.last().map(Cursor::after);
        Self { documents, cursor }
    }
}
