use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering as AtomicOrdering},
        Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fractic_server_error::ServerError;
use serde_json::Value;
use tracing::debug;

use crate::{
    data::models::timestamp_model,
    entities::{
        CollectionId, CollectionPath, Comparison, Constraint, Cursor, Document, DocumentFields,
        DocumentPage, FetchPageError, FieldValue, RecordId, SortDirection,
    },
    errors::{DocumentNotFound, InvalidDocument, StoreUnavailable},
};

use super::document_store_datasource::{DocumentStoreDatasource, DocumentWriteDatasource};

/// Document store kept in process memory.
///
/// Mirrors the query rules of the hosted store the app runs against:
/// - documents without an explicit ordering come back in id order, and ids
///   are handed out in insertion order;
/// - ordering on a field drops documents that lack the field;
/// - a range predicate on one field combined with ordering on another needs
///   a composite index registered with [`Self::add_composite_index`].
#[derive(Default)]
pub struct InMemoryDocumentStore {
    state: Mutex<StoreState>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    fetch_count: AtomicUsize,
}

#[derive(Default)]
struct StoreState {
    collections: HashMap<String, Vec<Document>>,
    // (collection, range field, order field)
    composite_indexes: HashSet<(String, String, String)>,
    unavailable: bool,
    latency: Duration,
    next_id: u64,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a document; the store assigns its id.
    pub fn insert(&self, path: &CollectionPath, body: Value) -> Result<RecordId, ServerError> {
        let Value::Object(fields) = body else {
            return Err(InvalidDocument::new(path.collection().as_str(), "<new>"));
        };
        Ok(self.lock().add(&path.to_string(), fields))
    }

    /// Merge the given fields into an existing document.
    pub fn update(&self, path: &CollectionPath, id: &RecordId, body: Value) -> Result<(), ServerError> {
        let Value::Object(fields) = body else {
            return Err(InvalidDocument::new(path.collection().as_str(), id.as_str()));
        };
        let key = path.to_string();
        let mut state = self.lock();
        let document = state
            .collections
            .get_mut(&key)
            .and_then(|docs| docs.iter_mut().find(|d| &d.id == id))
            .ok_or_else(|| DocumentNotFound::new(&key, id.as_str()))?;
        document.fields.extend(fields);
        Ok(())
    }

    pub fn delete(&self, path: &CollectionPath, id: &RecordId) -> Result<(), ServerError> {
        let key = path.to_string();
        let mut state = self.lock();
        let docs = state
            .collections
            .get_mut(&key)
            .ok_or_else(|| DocumentNotFound::new(&key, id.as_str()))?;
        let before = docs.len();
        docs.retain(|d| &d.id != id);
        if docs.len() == before {
            return Err(DocumentNotFound::new(&key, id.as_str()));
        }
        Ok(())
    }

    pub fn add_composite_index(&self, collection: CollectionId, range_field: &str, order_field: &str) {
        self.lock().composite_indexes.insert((
            collection.as_str().to_string(),
            range_field.to_string(),
            order_field.to_string(),
        ));
    }

    /// While unavailable, every fetch fails with a generic store error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Delay applied to every fetch before it is answered.
    pub fn set_latency(&self, latency: Duration) {
        self.lock().latency = latency;
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(AtomicOrdering::SeqCst)
    }

    pub fn max_concurrent_fetches(&self) -> usize {
        self.max_in_flight.load(AtomicOrdering::SeqCst)
    }
}

struct InFlight<'a>(&'a InMemoryDocumentStore);

impl<'a> InFlight<'a> {
    fn enter(store: &'a InMemoryDocumentStore) -> Self {
        store.fetch_count.fetch_add(1, AtomicOrdering::SeqCst);
        let now = store.in_flight.fetch_add(1, AtomicOrdering::SeqCst) + 1;
        store.max_in_flight.fetch_max(now, AtomicOrdering::SeqCst);
        Self(store)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, AtomicOrdering::SeqCst);
    }
}

#[async_trait]
impl DocumentStoreDatasource for InMemoryDocumentStore {
    async fn fetch_page(
        &self,
        collection_path: &str,
        constraints: &[Constraint],
        page_size: usize,
        cursor: Option<&Cursor>,
    ) -> Result<DocumentPage, FetchPageError> {
        let _in_flight = InFlight::enter(self);
        let latency = self.lock().latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let state = self.lock();
        if state.unavailable {
            return Err(StoreUnavailable::new(collection_path).into());
        }

        let ordering = constraints.iter().find_map(|c| match c {
            Constraint::OrderBy { field, direction } => Some((*field, *direction)),
            _ => None,
        });
        let predicates: Vec<(&str, Comparison, &FieldValue)> = constraints
            .iter()
            .filter_map(|c| match c {
                Constraint::Where { field, op, value } => Some((*field, *op, value)),
                _ => None,
            })
            .collect();
        state.check_index(collection_path, &predicates, ordering)?;

        let mut matched: Vec<&Document> = state
            .collections
            .get(collection_path)
            .map(|docs| docs.iter().collect())
            .unwrap_or_default();
        matched.retain(|d| {
            predicates
                .iter()
                .all(|(field, op, value)| satisfies(d.fields.get(*field), *op, value))
                && ordering.map_or(true, |(field, _)| d.fields.contains_key(field))
        });
        matched.sort_by(|a, b| compare_documents(a, b, ordering));

        let start = match cursor {
            Some(c) => matched
                .iter()
                .position(|d| compare_documents(d, c.document(), ordering) == Ordering::Greater)
                .unwrap_or(matched.len()),
            None => 0,
        };
        let documents: Vec<Document> = matched[start..]
            .iter()
            .take(page_size)
            .map(|d| (*d).clone())
            .collect();
        debug!(
            collection_path,
            matched = matched.len(),
            returned = documents.len(),
            "in-memory query answered"
        );
        Ok(DocumentPage::new(documents))
    }

    async fn get_document(
        &self,
        collection_path: &str,
        id: &RecordId,
    ) -> Result<Option<Document>, ServerError> {
        let state = self.lock();
        if state.unavailable {
            return Err(StoreUnavailable::new(collection_path));
        }
        Ok(state
            .collections
            .get(collection_path)
            .and_then(|docs| docs.iter().find(|d| &d.id == id))
            .cloned())
    }
}

#[async_trait]
impl DocumentWriteDatasource for InMemoryDocumentStore {
    async fn add_document(
        &self,
        collection_path: &str,
        fields: DocumentFields,
    ) -> Result<RecordId, ServerError> {
        let mut state = self.lock();
        if state.unavailable {
            return Err(StoreUnavailable::new(collection_path));
        }
        Ok(state.add(collection_path, fields))
    }

    async fn merge_document(
        &self,
        collection_path: &str,
        id: &RecordId,
        fields: DocumentFields,
    ) -> Result<(), ServerError> {
        let mut state = self.lock();
        if state.unavailable {
            return Err(StoreUnavailable::new(collection_path));
        }
        let docs = state
            .collections
            .entry(collection_path.to_string())
            .or_default();
        match docs.iter_mut().find(|d| &d.id == id) {
            Some(document) => document.fields.extend(fields),
            None => docs.push(Document {
                id: id.clone(),
                fields,
            }),
        }
        Ok(())
    }
}

impl StoreState {
    fn add(&mut self, collection_path: &str, fields: DocumentFields) -> RecordId {
        self.next_id += 1;
        let id = RecordId(format!("doc{:08}", self.next_id));
        self.collections
            .entry(collection_path.to_string())
            .or_default()
            .push(Document {
                id: id.clone(),
                fields,
            });
        id
    }

    fn check_index(
        &self,
        collection_path: &str,
        predicates: &[(&str, Comparison, &FieldValue)],
        ordering: Option<(&str, SortDirection)>,
    ) -> Result<(), FetchPageError> {
        let Some((order_field, _)) = ordering else {
            return Ok(());
        };
        let collection = collection_path.rsplit('/').next().unwrap_or(collection_path);
        for (range_field, _, _) in predicates.iter().filter(|(_, op, _)| op.is_range()) {
            if *range_field == order_field {
                continue;
            }
            let key = (
                collection.to_string(),
                range_field.to_string(),
                order_field.to_string(),
            );
            if !self.composite_indexes.contains(&key) {
                return Err(FetchPageError::IndexMissing {
                    collection_path: collection_path.to_string(),
                    details: format!("range on '{range_field}' ordered by '{order_field}'"),
                });
            }
        }
        Ok(())
    }
}

fn satisfies(value: Option<&Value>, op: Comparison, target: &FieldValue) -> bool {
    let Some(ord) = value.and_then(|v| compare_to_target(v, target)) else {
        return false;
    };
    match op {
        Comparison::Eq => ord == Ordering::Equal,
        Comparison::Gte => ord != Ordering::Less,
        Comparison::Lte => ord != Ordering::Greater,
    }
}

fn compare_to_target(value: &Value, target: &FieldValue) -> Option<Ordering> {
    match (value, target) {
        (Value::String(s), FieldValue::Timestamp(t)) => {
            timestamp_model::parse(s).map(|dt| dt.cmp(t))
        }
        (Value::Number(n), FieldValue::Number(x)) => n.as_f64()?.partial_cmp(x),
        (Value::String(s), FieldValue::Text(x)) => Some(s.as_str().cmp(x.as_str())),
        _ => None,
    }
}

/// Sort key of a stored value. Strings that read as timestamps sort as
/// timestamps so mixed date formats still order chronologically.
enum SortKey<'a> {
    Null,
    Bool(bool),
    Number(f64),
    Timestamp(DateTime<Utc>),
    Text(&'a str),
    Other,
}

impl<'a> SortKey<'a> {
    fn of(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => SortKey::Null,
            Some(Value::Bool(b)) => SortKey::Bool(*b),
            Some(Value::Number(n)) => n.as_f64().map_or(SortKey::Other, SortKey::Number),
            Some(Value::String(s)) => match timestamp_model::parse(s) {
                Some(dt) => SortKey::Timestamp(dt),
                None => SortKey::Text(s),
            },
            Some(_) => SortKey::Other,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Null => 0,
            SortKey::Bool(_) => 1,
            SortKey::Number(_) => 2,
            SortKey::Timestamp(_) => 3,
            SortKey::Text(_) => 4,
            SortKey::Other => 5,
        }
    }

    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (SortKey::Timestamp(a), SortKey::Timestamp(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

fn compare_documents(a: &Document, b: &Document, ordering: Option<(&str, SortDirection)>) -> Ordering {
    let (by_field, direction) = match ordering {
        Some((field, direction)) => (
            SortKey::of(a.fields.get(field)).cmp(&SortKey::of(b.fields.get(field))),
            direction,
        ),
        None => (Ordering::Equal, SortDirection::Asc),
    };
    // Ties break on id, in the direction of the last ordering.
    let ord = by_field.then_with(|| a.id.cmp(&b.id));
    match direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn path() -> CollectionPath {
        CollectionPath::new("u1", CollectionId::Transactions)
    }

    fn ids(page: &DocumentPage) -> Vec<&str> {
        page.documents.iter().map(|d| d.id.as_str()).collect()
    }

    fn seed(store: &InMemoryDocumentStore) -> Vec<RecordId> {
        [
            json!({ "party_name": "A", "amount": 300, "date": "2024-03-01" }),
            json!({ "party_name": "B", "amount": 100, "date": "2024-03-05T12:00:00Z" }),
            json!({ "party_name": "C", "amount": 200, "date": "2024-03-09" }),
            json!({ "party_name": "D", "date": "2024-04-01" }),
        ]
        .into_iter()
        .map(|body| store.insert(&path(), body).unwrap())
        .collect()
    }

    #[tokio::test]
    async fn unordered_queries_follow_insertion_order() {
        let store = InMemoryDocumentStore::new();
        let ids_in = seed(&store);
        let page = store
            .fetch_page(&path().to_string(), &[], 10, None)
            .await
            .unwrap();
        assert_eq!(page.documents.len(), 4);
        assert_eq!(page.documents[0].id, ids_in[0]);
        assert_eq!(page.documents[3].id, ids_in[3]);
        assert_eq!(page.cursor.unwrap().document().id, ids_in[3]);
    }

    #[tokio::test]
    async fn ordering_skips_documents_without_the_field() {
        let store = InMemoryDocumentStore::new();
        seed(&store);
        let order = [Constraint::OrderBy {
            field: "amount",
            direction: SortDirection::Desc,
        }];
        let page = store
            .fetch_page(&path().to_string(), &order, 10, None)
            .await
            .unwrap();
        let amounts: Vec<_> = page
            .documents
            .iter()
            .map(|d| d.fields["amount"].as_i64().unwrap())
            .collect();
        assert_eq!(amounts, vec![300, 200, 100]);
    }

    #[tokio::test]
    async fn cursor_continues_after_last_document() {
        let store = InMemoryDocumentStore::new();
        seed(&store);
        let p = path().to_string();
        let first = store.fetch_page(&p, &[], 3, None).await.unwrap();
        let second = store
            .fetch_page(&p, &[], 3, first.cursor.as_ref())
            .await
            .unwrap();
        assert_eq!(ids(&first), vec!["doc00000001", "doc00000002", "doc00000003"]);
        assert_eq!(ids(&second), vec!["doc00000004"]);
    }

    #[tokio::test]
    async fn cursor_survives_deletion_of_its_document() {
        let store = InMemoryDocumentStore::new();
        let ids_in = seed(&store);
        let p = path().to_string();
        let first = store.fetch_page(&p, &[], 2, None).await.unwrap();
        store.delete(&path(), &ids_in[1]).unwrap();
        let second = store
            .fetch_page(&p, &[], 2, first.cursor.as_ref())
            .await
            .unwrap();
        assert_eq!(ids(&second), vec!["doc00000003", "doc00000004"]);
    }

    #[tokio::test]
    async fn range_on_other_field_than_order_needs_index() {
        let store = InMemoryDocumentStore::new();
        seed(&store);
        let constraints = [
            Constraint::Where {
                field: "date",
                op: Comparison::Gte,
                value: FieldValue::Timestamp(timestamp_model::parse("2024-03-02").unwrap()),
            },
            Constraint::OrderBy {
                field: "amount",
                direction: SortDirection::Asc,
            },
        ];
        let p = path().to_string();
        let err = store.fetch_page(&p, &constraints, 10, None).await.unwrap_err();
        assert!(err.is_index_missing());

        store.add_composite_index(CollectionId::Transactions, "date", "amount");
        let page = store.fetch_page(&p, &constraints, 10, None).await.unwrap();
        assert_eq!(ids(&page), vec!["doc00000002", "doc00000003"]);
    }

    #[tokio::test]
    async fn equality_and_mixed_date_formats() {
        let store = InMemoryDocumentStore::new();
        seed(&store);
        let p = path().to_string();
        let by_party = [Constraint::Where {
            field: "party_name",
            op: Comparison::Eq,
            value: FieldValue::Text("C".to_string()),
        }];
        let page = store.fetch_page(&p, &by_party, 10, None).await.unwrap();
        assert_eq!(ids(&page), vec!["doc00000003"]);

        let march = [
            Constraint::Where {
                field: "date",
                op: Comparison::Gte,
                value: FieldValue::Timestamp(timestamp_model::parse("2024-03-01").unwrap()),
            },
            Constraint::Where {
                field: "date",
                op: Comparison::Lte,
                value: FieldValue::Timestamp(timestamp_model::parse("2024-03-31").unwrap()),
            },
            Constraint::OrderBy {
                field: "date",
                direction: SortDirection::Desc,
            },
        ];
        let page = store.fetch_page(&p, &march, 10, None).await.unwrap();
        assert_eq!(ids(&page), vec!["doc00000003", "doc00000002", "doc00000001"]);
    }

    #[tokio::test]
    async fn unavailable_store_fails_generically() {
        let store = InMemoryDocumentStore::new();
        seed(&store);
        store.set_unavailable(true);
        let err = store
            .fetch_page(&path().to_string(), &[], 10, None)
            .await
            .unwrap_err();
        assert!(!err.is_index_missing());
        assert_eq!(store.fetch_count(), 1);
    }

    #[test]
    fn update_merges_and_delete_removes() {
        let store = InMemoryDocumentStore::new();
        let ids_in = seed(&store);
        store
            .update(&path(), &ids_in[0], json!({ "amount": 350, "notes": "fixed" }))
            .unwrap();
        let state = store.lock();
        let doc = &state.collections[&path().to_string()][0];
        assert_eq!(doc.fields["amount"], json!(350));
        assert_eq!(doc.fields["party_name"], json!("A"));
        drop(state);

        store.delete(&path(), &ids_in[0]).unwrap();
        assert!(store.delete(&path(), &ids_in[0]).is_err());
        assert!(store
            .update(&path(), &RecordId::from("nope"), json!({}))
            .is_err());
    }

    #[tokio::test]
    async fn merge_creates_then_extends_named_document() {
        let store = InMemoryDocumentStore::new();
        let settings = CollectionPath::settings_of("u1");
        let config = RecordId::from("config");
        assert!(store.get_document(&settings, &config).await.unwrap().is_none());

        let fields = |v: Value| v.as_object().cloned().unwrap();
        store
            .merge_document(&settings, &config, fields(json!({ "firm_name": "Om Traders" })))
            .await
            .unwrap();
        store
            .merge_document(&settings, &config, fields(json!({ "gstin": "09ABC" })))
            .await
            .unwrap();
        let doc = store.get_document(&settings, &config).await.unwrap().unwrap();
        assert_eq!(doc.fields["firm_name"], json!("Om Traders"));
        assert_eq!(doc.fields["gstin"], json!("09ABC"));

        let added = store
            .add_document(&path().to_string(), fields(json!({ "party_name": "Z" })))
            .await
            .unwrap();
        assert_eq!(added, RecordId::from("doc00000001"));
    }
}
