use std::{fmt::Debug, hash::Hash, str::FromStr};

use fractic_server_error::ServerError;

use crate::errors::InvalidSortField;

/// Closed set of fields a collection can be ordered by. Field names are
/// checked when parsed, so a misspelled field never reaches the store.
pub trait SortField:
    Debug + Clone + Copy + PartialEq + Eq + Hash + FromStr<Err = ServerError> + Send + Sync + 'static
{
    fn field_name(&self) -> &'static str;
}

macro_rules! sort_fields {
    ($(#[$meta:meta])* $name:ident in $collection:literal {
        $($variant:ident => $field:literal),+ $(,)?
    }) => {
        $(#[$meta])*
        #[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
        pub enum $name {
            $($variant),+
        }

        impl SortField for $name {
            fn field_name(&self) -> &'static str {
                match self {
                    $($name::$variant => $field),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ServerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($field => Ok($name::$variant),)+
                    other => Err(InvalidSortField::new(other, $collection)),
                }
            }
        }
    };
}

sort_fields!(LedgerSortField in "ledger_entries" {
    Date => "date",
    TotalAmount => "total_amount",
    PartyName => "party_name",
    InvoiceNo => "invoice_no",
});

sort_fields!(TransactionSortField in "transactions" {
    Date => "date",
    Amount => "amount",
    PartyName => "party_name",
});

sort_fields!(InventorySortField in "inventory" {
    Name => "name",
    CurrentStock => "current_stock",
    SaleRate => "sale_rate",
});

sort_fields!(PartySortField in "parties" {
    Name => "name",
});

sort_fields!(VehicleSortField in "vehicles" {
    VehicleNumber => "vehicle_number",
});

sort_fields!(ExpenseSortField in "expenses" {
    Date => "date",
    Amount => "amount",
    Category => "category",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_field_names() {
        assert_eq!(
            "total_amount".parse::<LedgerSortField>().unwrap(),
            LedgerSortField::TotalAmount
        );
        assert_eq!(LedgerSortField::TotalAmount.field_name(), "total_amount");
        assert_eq!(
            "vehicle_number".parse::<VehicleSortField>().unwrap(),
            VehicleSortField::VehicleNumber
        );
    }

    #[test]
    fn rejects_fields_of_other_collections() {
        assert!("total_amount".parse::<TransactionSortField>().is_err());
        assert!("Date".parse::<ExpenseSortField>().is_err());
        assert!("".parse::<PartySortField>().is_err());
    }
}
