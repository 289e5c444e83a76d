use crate::codec;
use crate::common::{Value, DOC_CREATED_AT, DOC_ID, DOC_UPDATED_AT};
use crate::errors::{ErrorKind, PantryError, PantryResult};
use indexmap::IndexMap;
use std::fmt::{Debug, Display, Formatter};

/// Represents a document in a Pantry collection.
///
/// A document is an insertion-ordered map from field name to [Value]. Field
/// order is preserved by the codec, so a document is written to disk in the
/// order its fields were first put.
///
/// The store manages three fields of every stored document:
///
/// * `id` - the document's identifier within its collection. Assigned by the
///   store on insert unless the caller provides one.
/// * `createdAt` - epoch milliseconds of the insert.
/// * `updatedAt` - epoch milliseconds of the last insert or update.
///
/// Equality is field-for-field and ignores field order.
#[derive(Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    data: IndexMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: IndexMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Associates the specified [Value] with the specified key in this document.
    ///
    /// An existing key keeps its position and has its value replaced; a new key
    /// is appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty.
    ///
    /// ```rust
    /// use pantry::collection::Document;
    ///
    /// let mut doc = Document::new();
    /// doc.put("name", "Margherita Pizza").unwrap();
    /// doc.put("price", 16.99).unwrap();
    /// assert_eq!(doc.size(), 2);
    /// ```
    pub fn put<T: Into<Value>>(&mut self, key: impl Into<String>, value: T) -> PantryResult<()> {
        let key = key.into();
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(PantryError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }

        self.data.insert(key, value.into());
        Ok(())
    }

    /// Returns the value of the field, or `None` if the document has no such field.
    ///
    /// A field explicitly set to null returns `Some(&Value::Null)`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Removes a field, keeping the order of the remaining fields.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    /// Copies every field of `patch` into this document, overwriting fields
    /// that already exist. Nested documents are replaced, not merged.
    pub fn merge(&mut self, patch: &Document) {
        for (key, value) in patch.iter() {
            self.data.insert(key.clone(), value.clone());
        }
    }

    /// The `id` field, if present and not null.
    pub fn id(&self) -> Option<&Value> {
        self.data.get(DOC_ID).filter(|id| !id.is_null())
    }

    pub fn created_at(&self) -> Option<i64> {
        self.data.get(DOC_CREATED_AT).and_then(Value::as_i64)
    }

    pub fn updated_at(&self) -> Option<i64> {
        self.data.get(DOC_UPDATED_AT).and_then(Value::as_i64)
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.data.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", codec::encode(self))
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Document {
            data: iter.into_iter().collect(),
        }
    }
}

/// Strips the quotes `stringify!` keeps around string-literal keys.
#[doc(hidden)]
pub fn normalize(key: &str) -> String {
    key.trim_matches('"').to_string()
}

/// Creates a [Document] from `key: value` pairs.
///
/// Keys may be bare identifiers or string literals. A braced value becomes a
/// nested document; any other value goes through `Value::from`.
///
/// ```rust
/// use pantry::doc;
///
/// let item = doc! {
///     name: "Classic Tiramisu",
///     "imageUrl": "https://example.com/tiramisu.jpg",
///     price: 8.99,
///     nutrition: { calories: 450 },
/// };
/// assert_eq!(item.size(), 4);
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::collection::Document::new()
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            let mut doc = $crate::collection::Document::new();
            $(
                doc.put($crate::collection::normalize(stringify!($key)), $crate::doc_value!($value))
                    .expect(&format!("Failed to put value {} in document", stringify!($value)));
            )*
            doc
        }
    };
}

/// Helper macro to convert values for the doc! macro.
#[macro_export]
#[doc(hidden)]
macro_rules! doc_value {
    // match a nested document
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    #[test]
    fn test_new_document_is_empty() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.size(), 0);
    }

    #[test]
    fn test_put_and_get() {
        let mut doc = Document::new();
        doc.put("name", "Alice").unwrap();
        doc.put("age", 30).unwrap();
        assert_eq!(doc.get("name"), Some(&Value::from("Alice")));
        assert_eq!(doc.get("age"), Some(&Value::I64(30)));
        assert_eq!(doc.get("missing"), None);
    }

    #[test]
    fn test_put_empty_key_fails() {
        let mut doc = Document::new();
        let err = doc.put("", 1).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_put_existing_key_keeps_position() {
        let mut doc = doc! { a: 1, b: 2, c: 3 };
        doc.put("b", 20).unwrap();
        let keys: Vec<&String> = doc.keys().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(doc.get("b"), Some(&Value::I64(20)));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut doc = doc! { a: 1, b: 2, c: 3 };
        assert_eq!(doc.remove("b"), Some(Value::I64(2)));
        let keys: Vec<&String> = doc.keys().collect();
        assert_eq!(keys, vec!["a", "c"]);
        assert_eq!(doc.remove("b"), None);
    }

    #[test]
    fn test_merge_overwrites_and_appends() {
        let mut doc = doc! { name: "a", qty: 1, meta: { x: 1, y: 2 } };
        let patch = doc! { name: "b", status: "PENDING", meta: { x: 9 } };
        doc.merge(&patch);

        assert_eq!(doc.get("name"), Some(&Value::from("b")));
        assert_eq!(doc.get("qty"), Some(&Value::I64(1)));
        assert_eq!(doc.get("status"), Some(&Value::from("PENDING")));
        // shallow merge: nested document replaced as a whole
        assert_eq!(doc.get("meta"), Some(&Value::Document(doc! { x: 9 })));
    }

    #[test]
    fn test_equality_ignores_field_order() {
        let a = doc! { x: 1, y: "two" };
        let b = doc! { y: "two", x: 1 };
        assert_eq!(a, b);
        assert_ne!(a, doc! { x: 1 });
    }

    #[test]
    fn test_managed_field_accessors() {
        let doc = doc! { id: 7, createdAt: 100i64, updatedAt: 200i64 };
        assert_eq!(doc.id(), Some(&Value::I64(7)));
        assert_eq!(doc.created_at(), Some(100));
        assert_eq!(doc.updated_at(), Some(200));

        let doc = doc! { id: () };
        assert_eq!(doc.id(), None);
    }

    #[test]
    fn test_doc_macro_string_keys_and_nesting() {
        let doc = doc! {
            "imageUrl": "https://example.com/a.jpg",
            address: { city: "Naples", zip: 80100 },
        };
        assert!(doc.contains_key("imageUrl"));
        let address = doc.get("address").and_then(Value::as_document).unwrap();
        assert_eq!(address.get("zip"), Some(&Value::I64(80100)));
    }

    #[test]
    fn test_from_iterator_and_into_iterator() {
        let doc: Document = vec![
            ("a".to_string(), Value::I64(1)),
            ("b".to_string(), Value::Bool(true)),
        ]
        .into_iter()
        .collect();
        let pairs: Vec<(String, Value)> = doc.into_iter().collect();
        assert_eq!(pairs[0], ("a".to_string(), Value::I64(1)));
        assert_eq!(pairs[1], ("b".to_string(), Value::Bool(true)));
    }

    #[test]
    fn test_display_is_compact_json() {
        let doc = doc! { name: "a", n: 1 };
        assert_eq!(doc.to_string(), r#"{"name":"a","n":1}"#);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        use crate::collection::DocumentId;

        let doc = doc! {
            id: 7,
            name: "Tiramisu",
            price: 9.5,
            available: true,
            note: (),
            extras: { cocoa: "dark", shots: 2 },
        };
        let json = serde_json::to_string(&doc).unwrap();
        let decoded: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, doc);
        assert_eq!(decoded.keys().collect::<Vec<_>>(), doc.keys().collect::<Vec<_>>());

        let id = DocumentId::from(7u64);
        let json = serde_json::to_string(&id).unwrap();
        let decoded: DocumentId = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, id);
    }
}
