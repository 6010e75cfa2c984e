use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct PartyBalance {
    pub total_billed: f64,
    pub total_paid: f64,
    /// Billed minus paid. Positive means the party owes the shop (customer)
    /// or the shop owes the party (supplier).
    pub balance: f64,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StatementRowKind {
    Bill,
    Payment,
}

#[derive(Debug, PartialEq, Clone)]
pub struct StatementRow {
    pub date: DateTime<Utc>,
    pub kind: StatementRowKind,
    pub description: String,
    pub debit: f64,
    pub credit: f64,
    /// Running balance after this row.
    pub balance: f64,
}

#[derive(Debug, PartialEq, Clone)]
pub struct PartyStatement {
    pub party_name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub rows: Vec<StatementRow>,
    pub closing_balance: f64,
}
