use crate::entities::LedgerRecord;

/// Case-insensitive substring match over the record's searchable fields. An
/// empty term matches everything.
pub fn matches_search<R: LedgerRecord>(record: &R, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    record
        .searchable_text()
        .iter()
        .any(|text| text.to_lowercase().contains(&needle))
}

/// Narrow already-loaded records to those matching `term`. Only the pages
/// fetched so far are searched; records further down the collection are not
/// found until they are loaded.
pub fn search_loaded<R: LedgerRecord>(records: &[R], term: Option<&str>) -> Vec<R> {
    match term {
        Some(term) if !term.is_empty() => records
            .iter()
            .filter(|r| matches_search(*r, term))
            .cloned()
            .collect(),
        _ => records.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Expense, RecordId, Vehicle};

    fn vehicle(number: &str) -> Vehicle {
        Vehicle {
            id: RecordId::from(number),
            vehicle_number: number.to_string(),
            owner_name: None,
            driver_name: None,
            model: None,
            contact: None,
            notes: None,
        }
    }

    fn expense(category: &str, notes: Option<&str>) -> Expense {
        Expense {
            id: RecordId::from(category),
            category: category.to_string(),
            amount: 10.0,
            date: chrono::Utc::now(),
            payment_mode: None,
            notes: notes.map(str::to_string),
        }
    }

    #[test]
    fn substring_match_ignores_case() {
        let vehicles = vec![vehicle("UP70 AB 1234"), vehicle("MH12 XY 9")];
        let found = search_loaded(&vehicles, Some("ab 12"));
        assert_eq!(found, vec![vehicle("UP70 AB 1234")]);
        assert_eq!(search_loaded(&vehicles, Some("")).len(), 2);
        assert_eq!(search_loaded(&vehicles, None).len(), 2);
    }

    #[test]
    fn expenses_match_category_or_notes() {
        let expenses = vec![
            expense("Diesel", None),
            expense("Misc", Some("diesel top-up")),
            expense("Tea", Some("staff")),
        ];
        let found = search_loaded(&expenses, Some("DIESEL"));
        assert_eq!(found.len(), 2);
        assert!(!matches_search(&expenses[2], "diesel"));
    }
}
