// Crate-internal.
// ---

pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod document_store_datasource;
        pub(crate) mod in_memory_document_store;
        pub(crate) mod settings_ron_datasource;
    }
    pub(crate) mod models {
        pub(crate) mod amount_model;
        pub(crate) mod document_model;
        pub(crate) mod iso_date_model;
        pub(crate) mod settings_model;
        pub(crate) mod timestamp_model;
    }
    pub(crate) mod repositories {
        pub(crate) mod collection_repository_impl;
    }
}

pub(crate) mod domain {
    pub(crate) mod entities {
        pub(crate) mod backup;
        pub(crate) mod collection;
        pub(crate) mod constraint;
        pub(crate) mod document;
        pub(crate) mod fetch_error;
        pub(crate) mod filter_config;
        pub(crate) mod page;
        pub(crate) mod party_statement;
        pub(crate) mod records;
        pub(crate) mod settings;
        pub(crate) mod sort_field;
    }
    pub(crate) mod logic {
        pub(crate) mod backup_file;
        pub(crate) mod constraint_builder;
        pub(crate) mod debounced_value;
        pub(crate) mod paginated_window;
        pub(crate) mod party_ledger;
        pub(crate) mod search_filter;
    }
    pub(crate) mod repositories {
        pub(crate) mod collection_repository;
    }
    pub(crate) mod usecases {
        pub(crate) mod backup_usecase;
        pub(crate) mod party_usecase;
    }
}

pub(crate) mod presentation {
    pub(crate) mod utils;
}

// Public exports.
// ---

#[doc(hidden)]
#[allow(unused_imports)]
pub mod exports {
    // This mod represents how clients see the library, and can differ from the
    // internal structure.
    //
    // The contents of this mod are re-exported in the root of the crate.

    pub mod entities {
        pub use crate::domain::entities::backup::*;
        pub use crate::domain::entities::collection::*;
        pub use crate::domain::entities::constraint::*;
        pub use crate::domain::entities::document::*;
        pub use crate::domain::entities::fetch_error::*;
        pub use crate::domain::entities::filter_config::*;
        pub use crate::domain::entities::page::*;
        pub use crate::domain::entities::party_statement::*;
        pub use crate::domain::entities::records::*;
        pub use crate::domain::entities::settings::*;
        pub use crate::domain::entities::sort_field::*;
    }

    pub mod datasources {
        pub use crate::data::datasources::document_store_datasource::{
            DocumentStoreDatasource, DocumentWriteDatasource,
        };
        pub use crate::data::datasources::in_memory_document_store::InMemoryDocumentStore;
    }

    pub mod repositories {
        pub use crate::data::repositories::collection_repository_impl::CollectionRepositoryImpl;
        pub use crate::domain::repositories::collection_repository::CollectionRepository;
    }

    pub mod window {
        pub use crate::domain::logic::constraint_builder::{
            end_of_day, end_of_day_in, start_of_day, start_of_day_in, ConstraintBuilder, DATE_FIELD,
        };
        pub use crate::domain::logic::debounced_value::DebouncedValue;
        pub use crate::domain::logic::paginated_window::PaginatedWindow;
        pub use crate::domain::logic::search_filter::{matches_search, search_loaded};
    }

    pub mod ledger {
        pub use crate::domain::logic::party_ledger::{party_balance, PartyStatementGenerator};
        pub use crate::domain::logic::backup_file::{
            backup_file_name, validate_backup, BACKUP_COLLECTIONS,
        };
    }

    pub mod format {
        pub use crate::presentation::utils::{format_amount, format_date};
    }
}
