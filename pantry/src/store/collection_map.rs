use crate::codec::CollectionSnapshot;
use crate::collection::{Document, DocumentId};
use crate::common::Value;
use dashmap::DashMap;
use itertools::Itertools;
use std::sync::Arc;

/// The in-memory contents of one collection.
///
/// # Purpose
/// `CollectionMap` maps [DocumentId] to [Document] for a single named
/// collection. Reads go straight to a [DashMap] and never block on the store's
/// write lock; they may observe a write that is in flight but never a torn
/// document, since documents are replaced whole.
///
/// # Characteristics
/// - **Cheap to clone**: clones share the same backing map
/// - **Copy-out reads**: every read returns owned copies of the documents
/// - **Ordered snapshots**: [CollectionMap::entries] and
///   [CollectionMap::documents] return documents in ascending [DocumentId] order
#[derive(Clone)]
pub struct CollectionMap {
    inner: Arc<CollectionMapInner>,
}

impl CollectionMap {
    pub fn new(name: &str) -> CollectionMap {
        CollectionMap {
            inner: Arc::new(CollectionMapInner::new(name)),
        }
    }

    /// Creates a collection holding the decoded contents of a collection file.
    pub fn from_snapshot(name: &str, snapshot: CollectionSnapshot) -> CollectionMap {
        let map = CollectionMap::new(name);
        for (id, document) in snapshot {
            map.inner.backing_map.insert(id, document);
        }
        map
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn get(&self, id: &str) -> Option<Document> {
        self.inner
            .backing_map
            .get(id)
            .map(|entry| entry.value().clone())
    }

    pub fn contains_key(&self, id: &str) -> bool {
        self.inner.backing_map.contains_key(id)
    }

    /// Stores a document, returning the one it replaced.
    pub fn put(&self, id: DocumentId, document: Document) -> Option<Document> {
        self.inner.backing_map.insert(id, document)
    }

    pub fn remove(&self, id: &str) -> Option<Document> {
        self.inner.backing_map.remove(id).map(|(_, document)| document)
    }

    pub fn size(&self) -> usize {
        self.inner.backing_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.backing_map.is_empty()
    }

    /// All entries, ordered by ID.
    pub fn entries(&self) -> Vec<(DocumentId, Document)> {
        self.inner
            .backing_map
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .sorted_by(|a, b| a.0.cmp(&b.0))
            .collect()
    }

    /// All documents, ordered by ID.
    pub fn documents(&self) -> Vec<Document> {
        self.entries()
            .into_iter()
            .map(|(_, document)| document)
            .collect()
    }

    /// Documents whose `field` equals `value`, ordered by ID.
    ///
    /// A missing field counts as null, so a null `value` also matches
    /// documents that lack the field.
    pub fn find_by_field(&self, field: &str, value: &Value) -> Vec<Document> {
        self.inner
            .backing_map
            .iter()
            .filter(|entry| match entry.value().get(field) {
                Some(found) => found == value,
                None => value.is_null(),
            })
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .sorted_by(|a, b| a.0.cmp(&b.0))
            .map(|(_, document)| document)
            .collect()
    }

    /// The largest integer `id` field among the documents, if any.
    pub fn max_id(&self) -> Option<u64> {
        self.inner
            .backing_map
            .iter()
            .filter_map(|entry| match entry.value().id() {
                Some(Value::I64(id)) if *id > 0 => Some(*id as u64),
                Some(Value::String(id)) => DocumentId::from(id.as_str()).numeric_value(),
                _ => entry.key().numeric_value(),
            })
            .max()
    }
}

struct CollectionMapInner {
    name: String,
    backing_map: DashMap<DocumentId, Document>,
}

impl CollectionMapInner {
    fn new(name: &str) -> CollectionMapInner {
        CollectionMapInner {
            name: name.to_string(),
            backing_map: DashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    fn sample() -> CollectionMap {
        let map = CollectionMap::new("menu_items");
        map.put(DocumentId::from(10u64), doc! { id: 10, category: "pizza" });
        map.put(DocumentId::from(2u64), doc! { id: 2, category: "burger" });
        map.put(DocumentId::from(7u64), doc! { id: 7, category: "pizza", note: () });
        map
    }

    #[test]
    fn put_get_remove() {
        let map = CollectionMap::new("t");
        assert!(map.is_empty());
        assert!(map.put(DocumentId::from(1u64), doc! { a: 1 }).is_none());
        assert_eq!(map.get("1"), Some(doc! { a: 1 }));

        let previous = map.put(DocumentId::from(1u64), doc! { a: 2 });
        assert_eq!(previous, Some(doc! { a: 1 }));
        assert_eq!(map.size(), 1);

        assert_eq!(map.remove("1"), Some(doc! { a: 2 }));
        assert_eq!(map.remove("1"), None);
        assert_eq!(map.get("1"), None);
    }

    #[test]
    fn entries_are_ordered_by_id() {
        let ids: Vec<String> = sample()
            .entries()
            .into_iter()
            .map(|(id, _)| id.to_string())
            .collect();
        assert_eq!(ids, vec!["2", "7", "10"]);
    }

    #[test]
    fn find_by_field_matches_typed_values() {
        let map = sample();
        let pizzas = map.find_by_field("category", &Value::from("pizza"));
        assert_eq!(pizzas.len(), 2);
        assert_eq!(pizzas[0].get("id"), Some(&Value::I64(7)));
        assert_eq!(pizzas[1].get("id"), Some(&Value::I64(10)));

        assert_eq!(map.find_by_field("id", &Value::I64(2)).len(), 1);
        assert!(map.find_by_field("id", &Value::F64(2.0)).is_empty());
    }

    #[test]
    fn find_by_field_null_matches_missing_field() {
        let map = sample();
        let found = map.find_by_field("note", &Value::Null);
        let ids: Vec<_> = found.iter().filter_map(|d| d.get("id")).collect();
        assert_eq!(ids, vec![&Value::I64(2), &Value::I64(7), &Value::I64(10)]);

        // a missing field never matches a non-null value
        assert!(map.find_by_field("note", &Value::from("")).is_empty());
    }

    #[test]
    fn max_id_considers_integer_and_numeric_string_ids() {
        let map = sample();
        assert_eq!(map.max_id(), Some(10));

        map.put(DocumentId::from("42"), doc! { id: "42" });
        map.put(DocumentId::from("abc"), doc! { id: "abc" });
        assert_eq!(map.max_id(), Some(42));

        assert_eq!(CollectionMap::new("empty").max_id(), None);
    }

    #[test]
    fn from_snapshot_installs_documents() {
        let mut snapshot = CollectionSnapshot::new();
        snapshot.insert(DocumentId::from(3u64), doc! { id: 3 });
        snapshot.insert(DocumentId::from(1u64), doc! { id: 1 });

        let map = CollectionMap::from_snapshot("orders", snapshot);
        assert_eq!(map.name(), "orders");
        assert_eq!(map.size(), 2);
        assert_eq!(map.get("3"), Some(doc! { id: 3 }));
    }

    #[test]
    fn clones_share_contents() {
        let map = CollectionMap::new("t");
        let clone = map.clone();
        map.put(DocumentId::from(5u64), doc! { id: 5 });
        assert!(clone.contains_key("5"));
    }
}
