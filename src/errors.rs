use fractic_server_error::{define_client_error, define_internal_error};

// IO-related.
define_client_error!(ReadError, "Error reading file.");
define_internal_error!(WriteError, "Error writing file '{path}'.", { path: &str });

// Parsing-related.
define_client_error!(InvalidRon, "Invalid {ron_type} (invalid RON format).", { ron_type: &str });
define_client_error!(InvalidIsoDate, "Invalid ISO date: {date}.", { date: &str });
define_client_error!(
    InvalidSortField,
    "'{field}' is not a sortable field of collection '{collection}'.",
    { field: &str, collection: &str }
);
define_client_error!(
    InvalidPageSize,
    "Invalid page size ({page_size}). Page size must be at least 1.",
    { page_size: usize }
);

// Store-related.
define_client_error!(
    IndexMissing,
    "Query on '{collection_path}' requires a composite index that does not exist ({details}).",
    { collection_path: &str, details: &str }
);
define_internal_error!(
    StoreUnavailable,
    "Document store unavailable while reading '{collection_path}'.",
    { collection_path: &str }
);
define_internal_error!(
    InvalidDocument,
    "Document '{id}' in collection '{collection}' does not match the expected record shape.",
    { collection: &str, id: &str }
);
define_client_error!(
    DocumentNotFound,
    "Document '{id}' not found in '{collection_path}'.",
    { collection_path: &str, id: &str }
);

// Backup-related.
define_internal_error!(
    SerializationFailed,
    "Failed to serialize {what}.",
    { what: &str }
);
define_client_error!(InvalidBackup, "Invalid backup file: {details}.", { details: &str });
