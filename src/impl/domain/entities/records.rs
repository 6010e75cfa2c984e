use std::fmt::{self, Debug};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::data::models::{amount_model, timestamp_model};

use super::{
    collection::CollectionId,
    sort_field::{
        ExpenseSortField, InventorySortField, LedgerSortField, PartySortField, SortField,
        TransactionSortField, VehicleSortField,
    },
};

/// Store-assigned document id, unique within its collection.
#[derive(
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Clone,
    serde_derive::Serialize,
    serde_derive::Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId(s.to_string())
    }
}

/// A typed record of one collection.
pub trait LedgerRecord:
    Debug + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type SortField: SortField;

    const COLLECTION: CollectionId;

    fn id(&self) -> &RecordId;

    /// Fields matched by the client-side search box.
    fn searchable_text(&self) -> Vec<&str>;

    fn into_any(self) -> AnyRecord;
}

// Ledger entries (invoices).
// ---

#[derive(Debug, PartialEq, Eq, Clone, Copy, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerEntryKind {
    Sell,
    Purchase,
}

#[derive(Debug, PartialEq, Clone, serde_derive::Serialize, serde_derive::Deserialize)]
pub struct LineItem {
    pub item_name: String,
    #[serde(deserialize_with = "amount_model::deserialize")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "amount_model::deserialize_opt")]
    pub rate: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, PartialEq, Clone, serde_derive::Serialize, serde_derive::Deserialize)]
pub struct LedgerEntry {
    #[serde(rename(serialize = "_id"), alias = "_id")]
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: LedgerEntryKind,
    pub party_name: String,
    #[serde(with = "timestamp_model")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub invoice_no: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default, deserialize_with = "amount_model::deserialize")]
    pub total_amount: f64,
    #[serde(default)]
    pub vehicle: Option<String>,
    #[serde(default, deserialize_with = "amount_model::deserialize_opt")]
    pub vehicle_rent: Option<f64>,
    #[serde(default)]
    pub payment_received_by: Option<String>,
    #[serde(default)]
    pub paid_to: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl LedgerRecord for LedgerEntry {
    type SortField = LedgerSortField;
    const COLLECTION: CollectionId = CollectionId::LedgerEntries;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn searchable_text(&self) -> Vec<&str> {
        vec![&self.party_name]
    }

    fn into_any(self) -> AnyRecord {
        AnyRecord::LedgerEntry(self)
    }
}

// Payments.
// ---

#[derive(Debug, PartialEq, Eq, Clone, Copy, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Received,
    Paid,
}

#[derive(Debug, PartialEq, Clone, serde_derive::Serialize, serde_derive::Deserialize)]
pub struct PaymentTransaction {
    #[serde(rename(serialize = "_id"), alias = "_id")]
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: PaymentKind,
    pub party_name: String,
    #[serde(default, deserialize_with = "amount_model::deserialize")]
    pub amount: f64,
    #[serde(with = "timestamp_model")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub payment_mode: Option<String>,
    #[serde(default)]
    pub payment_purpose: Option<String>,
    #[serde(default)]
    pub received_by: Option<String>,
    #[serde(default)]
    pub paid_by: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl LedgerRecord for PaymentTransaction {
    type SortField = TransactionSortField;
    const COLLECTION: CollectionId = CollectionId::Transactions;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn searchable_text(&self) -> Vec<&str> {
        vec![&self.party_name]
    }

    fn into_any(self) -> AnyRecord {
        AnyRecord::Transaction(self)
    }
}

// Inventory.
// ---

#[derive(Debug, PartialEq, Clone, serde_derive::Serialize, serde_derive::Deserialize)]
pub struct InventoryItem {
    #[serde(rename(serialize = "_id"), alias = "_id")]
    pub id: RecordId,
    pub name: String,
    #[serde(default, deserialize_with = "amount_model::deserialize")]
    pub current_stock: f64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "amount_model::deserialize_opt")]
    pub sale_rate: Option<f64>,
    #[serde(default, deserialize_with = "amount_model::deserialize_opt")]
    pub purchase_rate: Option<f64>,
    #[serde(default)]
    pub hsn_code: Option<String>,
    #[serde(default, deserialize_with = "amount_model::deserialize_opt")]
    pub gst_percent: Option<f64>,
    #[serde(default)]
    pub supplier_name: Option<String>,
}

impl LedgerRecord for InventoryItem {
    type SortField = InventorySortField;
    const COLLECTION: CollectionId = CollectionId::Inventory;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn searchable_text(&self) -> Vec<&str> {
        vec![&self.name]
    }

    fn into_any(self) -> AnyRecord {
        AnyRecord::InventoryItem(self)
    }
}

// Parties.
// ---

#[derive(Debug, PartialEq, Eq, Clone, Copy, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyRole {
    Customer,
    Supplier,
}

#[derive(Debug, PartialEq, Clone, serde_derive::Serialize, serde_derive::Deserialize)]
pub struct Party {
    #[serde(rename(serialize = "_id"), alias = "_id")]
    pub id: RecordId,
    pub name: String,
    pub role: PartyRole,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub gstin: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl LedgerRecord for Party {
    type SortField = PartySortField;
    const COLLECTION: CollectionId = CollectionId::Parties;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn searchable_text(&self) -> Vec<&str> {
        vec![&self.name]
    }

    fn into_any(self) -> AnyRecord {
        AnyRecord::Party(self)
    }
}

// Vehicles.
// ---

#[derive(Debug, PartialEq, Clone, serde_derive::Serialize, serde_derive::Deserialize)]
pub struct Vehicle {
    #[serde(rename(serialize = "_id"), alias = "_id")]
    pub id: RecordId,
    pub vehicle_number: String,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl LedgerRecord for Vehicle {
    type SortField = VehicleSortField;
    const COLLECTION: CollectionId = CollectionId::Vehicles;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn searchable_text(&self) -> Vec<&str> {
        vec![&self.vehicle_number]
    }

    fn into_any(self) -> AnyRecord {
        AnyRecord::Vehicle(self)
    }
}

// Expenses.
// ---

#[derive(Debug, PartialEq, Clone, serde_derive::Serialize, serde_derive::Deserialize)]
pub struct Expense {
    #[serde(rename(serialize = "_id"), alias = "_id")]
    pub id: RecordId,
    pub category: String,
    #[serde(default, deserialize_with = "amount_model::deserialize")]
    pub amount: f64,
    #[serde(with = "timestamp_model")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub payment_mode: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl LedgerRecord for Expense {
    type SortField = ExpenseSortField;
    const COLLECTION: CollectionId = CollectionId::Expenses;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn searchable_text(&self) -> Vec<&str> {
        let mut text = vec![self.category.as_str()];
        if let Some(notes) = &self.notes {
            text.push(notes);
        }
        text
    }

    fn into_any(self) -> AnyRecord {
        AnyRecord::Expense(self)
    }
}

// Any collection.
// ---

#[derive(Debug, PartialEq, Clone, serde_derive::Serialize)]
#[serde(untagged)]
pub enum AnyRecord {
    LedgerEntry(LedgerEntry),
    Transaction(PaymentTransaction),
    InventoryItem(InventoryItem),
    Party(Party),
    Vehicle(Vehicle),
    Expense(Expense),
}

impl AnyRecord {
    pub fn collection(&self) -> CollectionId {
        match self {
            AnyRecord::LedgerEntry(_) => CollectionId::LedgerEntries,
            AnyRecord::Transaction(_) => CollectionId::Transactions,
            AnyRecord::InventoryItem(_) => CollectionId::Inventory,
            AnyRecord::Party(_) => CollectionId::Parties,
            AnyRecord::Vehicle(_) => CollectionId::Vehicles,
            AnyRecord::Expense(_) => CollectionId::Expenses,
        }
    }

    pub fn id(&self) -> &RecordId {
        match self {
            AnyRecord::LedgerEntry(r) => r.id(),
            AnyRecord::Transaction(r) => r.id(),
            AnyRecord::InventoryItem(r) => r.id(),
            AnyRecord::Party(r) => r.id(),
            AnyRecord::Vehicle(r) => r.id(),
            AnyRecord::Expense(r) => r.id(),
        }
    }
}
