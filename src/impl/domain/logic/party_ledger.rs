use chrono::{Local, NaiveDate};
use fractic_server_error::ServerError;

use crate::{
    data::models::iso_date_model::ISODateModel,
    entities::{
        LedgerEntry, LedgerEntryKind, PartyBalance, PartyRole, PartyStatement, PaymentKind,
        PaymentTransaction, StatementRow, StatementRowKind,
    },
};

/// Totals of one party's bills and payments, counting only the documents that
/// match the party's role.
pub fn party_balance(
    role: PartyRole,
    entries: &[LedgerEntry],
    transactions: &[PaymentTransaction],
) -> PartyBalance {
    let (bill_kind, payment_kind) = match role {
        PartyRole::Customer => (LedgerEntryKind::Sell, PaymentKind::Received),
        PartyRole::Supplier => (LedgerEntryKind::Purchase, PaymentKind::Paid),
    };
    let total_billed = entries
        .iter()
        .filter(|e| e.kind == bill_kind)
        .map(|e| finite_or_zero(e.total_amount))
        .sum::<f64>();
    let total_paid = transactions
        .iter()
        .filter(|t| t.kind == payment_kind)
        .map(|t| finite_or_zero(t.amount))
        .sum::<f64>();
    PartyBalance {
        total_billed,
        total_paid,
        balance: total_billed - total_paid,
    }
}

fn finite_or_zero(amount: f64) -> f64 {
    if amount.is_finite() {
        amount
    } else {
        0.0
    }
}

pub struct PartyStatementGenerator<'a> {
    party_name: &'a str,
    start: NaiveDate,
    end: NaiveDate,
}

impl<'a> PartyStatementGenerator<'a> {
    /// `start` and `end` are inclusive `YYYY-MM-DD` calendar days.
    pub fn new(party_name: &'a str, start: &str, end: &str) -> Result<Self, ServerError> {
        Ok(Self {
            party_name,
            start: start.parse::<ISODateModel>()?.into(),
            end: end.parse::<ISODateModel>()?.into(),
        })
    }

    pub fn generate(
        &self,
        entries: &[LedgerEntry],
        transactions: &[PaymentTransaction],
    ) -> PartyStatement {
        let mut rows: Vec<StatementRow> = entries
            .iter()
            .filter(|e| e.party_name == self.party_name)
            .map(|e| StatementRow {
                date: e.date,
                kind: StatementRowKind::Bill,
                description: format!(
                    "Inv #{} - {} Items",
                    e.invoice_no.as_deref().filter(|s| !s.is_empty()).unwrap_or("-"),
                    e.items.len()
                ),
                debit: finite_or_zero(e.total_amount),
                credit: 0.0,
                balance: 0.0,
            })
            .chain(
                transactions
                    .iter()
                    .filter(|t| t.party_name == self.party_name)
                    .map(|t| StatementRow {
                        date: t.date,
                        kind: StatementRowKind::Payment,
                        description: format!(
                            "Pmt: {}",
                            t.payment_mode.as_deref().filter(|s| !s.is_empty()).unwrap_or("-")
                        ),
                        debit: 0.0,
                        credit: finite_or_zero(t.amount),
                        balance: 0.0,
                    }),
            )
            .filter(|row| {
                let day = row.date.with_timezone(&Local).date_naive();
                self.start <= day && day <= self.end
            })
            .collect();

        // Stable: same-day bills stay ahead of same-day payments.
        rows.sort_by_key(|row| row.date);

        let mut running = 0.0;
        for row in rows.iter_mut() {
            running += row.debit - row.credit;
            row.balance = running;
        }

        PartyStatement {
            party_name: self.party_name.to_string(),
            start: self.start,
            end: self.end,
            rows,
            closing_balance: running,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone as _, Utc};

    use super::*;
    use crate::entities::{LineItem, RecordId};

    fn local_day(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn entry(kind: LedgerEntryKind, party: &str, total: f64, date: DateTime<Utc>) -> LedgerEntry {
        LedgerEntry {
            id: RecordId::from("e"),
            kind,
            party_name: party.to_string(),
            date,
            invoice_no: Some("17".to_string()),
            items: vec![LineItem {
                item_name: "Cement".to_string(),
                quantity: 10.0,
                rate: Some(350.0),
                unit: Some("bag".to_string()),
            }],
            total_amount: total,
            vehicle: None,
            vehicle_rent: None,
            payment_received_by: None,
            paid_to: None,
            address: None,
            notes: None,
        }
    }

    fn payment(kind: PaymentKind, party: &str, amount: f64, date: DateTime<Utc>) -> PaymentTransaction {
        PaymentTransaction {
            id: RecordId::from("t"),
            kind,
            party_name: party.to_string(),
            amount,
            date,
            payment_mode: Some("UPI".to_string()),
            payment_purpose: None,
            received_by: None,
            paid_by: None,
            notes: None,
        }
    }

    #[test]
    fn customer_balance_counts_sales_and_receipts() {
        let day = local_day(2024, 3, 5, 10);
        let entries = vec![
            entry(LedgerEntryKind::Sell, "Ram", 1000.0, day),
            entry(LedgerEntryKind::Sell, "Ram", 500.0, day),
            entry(LedgerEntryKind::Purchase, "Ram", 9999.0, day),
        ];
        let transactions = vec![
            payment(PaymentKind::Received, "Ram", 400.0, day),
            payment(PaymentKind::Paid, "Ram", 7777.0, day),
        ];
        let balance = party_balance(PartyRole::Customer, &entries, &transactions);
        assert_eq!(
            balance,
            PartyBalance {
                total_billed: 1500.0,
                total_paid: 400.0,
                balance: 1100.0,
            }
        );

        let supplier = party_balance(PartyRole::Supplier, &entries, &transactions);
        assert_eq!(supplier.total_billed, 9999.0);
        assert_eq!(supplier.total_paid, 7777.0);
    }

    #[test]
    fn statement_runs_balance_in_date_order() {
        let entries = vec![
            entry(LedgerEntryKind::Sell, "Ram", 1000.0, local_day(2024, 3, 10, 9)),
            entry(LedgerEntryKind::Sell, "Ram", 300.0, local_day(2024, 3, 2, 9)),
            entry(LedgerEntryKind::Sell, "Shyam", 50.0, local_day(2024, 3, 3, 9)),
        ];
        let transactions = vec![payment(PaymentKind::Received, "Ram", 200.0, local_day(2024, 3, 5, 9))];

        let statement = PartyStatementGenerator::new("Ram", "2024-03-01", "2024-03-31")
            .unwrap()
            .generate(&entries, &transactions);

        let balances: Vec<_> = statement.rows.iter().map(|r| r.balance).collect();
        assert_eq!(balances, vec![300.0, 100.0, 1100.0]);
        assert_eq!(statement.closing_balance, 1100.0);
        assert_eq!(statement.rows[0].description, "Inv #17 - 1 Items");
        assert_eq!(statement.rows[1].description, "Pmt: UPI");
        assert_eq!(statement.rows[1].kind, StatementRowKind::Payment);
    }

    #[test]
    fn statement_range_is_inclusive_by_calendar_day() {
        let entries = vec![
            entry(LedgerEntryKind::Sell, "Ram", 1.0, local_day(2024, 2, 29, 23)),
            entry(LedgerEntryKind::Sell, "Ram", 2.0, local_day(2024, 3, 1, 0)),
            entry(LedgerEntryKind::Sell, "Ram", 4.0, local_day(2024, 3, 31, 23)),
            entry(LedgerEntryKind::Sell, "Ram", 8.0, local_day(2024, 4, 1, 0)),
        ];
        let statement = PartyStatementGenerator::new("Ram", "2024-03-01", "2024-03-31")
            .unwrap()
            .generate(&entries, &[]);
        assert_eq!(statement.rows.len(), 2);
        assert_eq!(statement.closing_balance, 6.0);
    }

    #[test]
    fn missing_invoice_and_mode_render_dash() {
        let day = local_day(2024, 3, 5, 9);
        let mut bill = entry(LedgerEntryKind::Sell, "Ram", 1.0, day);
        bill.invoice_no = None;
        bill.items.clear();
        let mut pmt = payment(PaymentKind::Received, "Ram", 1.0, day);
        pmt.payment_mode = None;
        let statement = PartyStatementGenerator::new("Ram", "2024-03-05", "2024-03-05")
            .unwrap()
            .generate(&[bill], &[pmt]);
        assert_eq!(statement.rows[0].description, "Inv #- - 0 Items");
        assert_eq!(statement.rows[1].description, "Pmt: -");
    }

    #[test]
    fn bad_range_is_rejected() {
        assert!(PartyStatementGenerator::new("Ram", "03/01/2024", "2024-03-31").is_err());
    }
}
