use std::fmt;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum CollectionId {
    LedgerEntries,
    Transactions,
    Inventory,
    Parties,
    Vehicles,
    Expenses,
}

impl CollectionId {
    pub const ALL: [CollectionId; 6] = [
        CollectionId::LedgerEntries,
        CollectionId::Transactions,
        CollectionId::Inventory,
        CollectionId::Parties,
        CollectionId::Vehicles,
        CollectionId::Expenses,
    ];

    /// Name of the collection as stored in the backing document store.
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionId::LedgerEntries => "ledger_entries",
            CollectionId::Transactions => "transactions",
            CollectionId::Inventory => "inventory",
            CollectionId::Parties => "parties",
            CollectionId::Vehicles => "vehicles",
            CollectionId::Expenses => "expenses",
        }
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collection holding an owner's firm profile, as a single document.
pub const SETTINGS_COLLECTION: &str = "settings";
pub const SETTINGS_DOCUMENT: &str = "config";

/// A collection scoped to one owner. All of an owner's records live under
/// `users/{owner}/{collection}`.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct CollectionPath {
    owner: String,
    collection: CollectionId,
}

impl CollectionPath {
    pub fn new(owner: impl Into<String>, collection: CollectionId) -> Self {
        Self {
            owner: owner.into(),
            collection,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn collection(&self) -> CollectionId {
        self.collection
    }

    /// Path of the owner's firm profile collection.
    pub fn settings_of(owner: &str) -> String {
        format!("users/{owner}/{SETTINGS_COLLECTION}")
    }

    /// A path without an owner (signed-out user) never reaches the store.
    pub fn is_bound(&self) -> bool {
        !self.owner.trim().is_empty()
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "users/{}/{}", self.owner, self.collection)
    }
}
