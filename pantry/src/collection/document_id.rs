use crate::common::{Value, MAX_ID};
use crate::errors::{ErrorKind, PantryError, PantryResult};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::ops::Deref;

/// The identifier of a document within its collection.
///
/// On disk and in the collection map an ID is always a string. IDs drawn from
/// the store's allocator are positive integers rendered in decimal; callers
/// may also supply their own numeric or string IDs on insert.
///
/// IDs order numerically when both are numeric, numeric IDs sort before
/// non-numeric ones, and non-numeric IDs sort lexically.
///
/// ```rust
/// use pantry::collection::DocumentId;
///
/// let id = DocumentId::from(12u64);
/// assert_eq!(id, "12");
/// assert_eq!(id.numeric_value(), Some(12));
/// assert!(DocumentId::from(9u64) < DocumentId::from(10u64));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentId {
    id_value: String,
}

impl DocumentId {
    /// Derives the ID from the value of a document's `id` field.
    ///
    /// # Errors
    ///
    /// Returns [ErrorKind::InvalidId] unless the value is a positive integer or
    /// a non-empty string.
    pub fn from_value(value: &Value) -> PantryResult<DocumentId> {
        match value {
            Value::I64(n) if *n > 0 => Ok(DocumentId::from(*n as u64)),
            Value::String(s) if !s.is_empty() => Ok(DocumentId::from(s.as_str())),
            _ => {
                log::error!("Invalid document id {:?}", value);
                Err(PantryError::new(
                    &format!(
                        "Document id must be a positive integer or a non-empty string, found {}",
                        value
                    ),
                    ErrorKind::InvalidId,
                ))
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.id_value
    }

    /// The ID as an integer, if it is one.
    ///
    /// Digit strings above [MAX_ID] do not fit an `id` field and count as
    /// plain string IDs.
    pub fn numeric_value(&self) -> Option<u64> {
        if self.id_value.bytes().all(|b| b.is_ascii_digit()) {
            self.id_value.parse().ok().filter(|n| *n <= MAX_ID)
        } else {
            None
        }
    }
}

impl Deref for DocumentId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.id_value
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.id_value
    }
}

// lets maps keyed by DocumentId be queried with a plain &str
impl Borrow<str> for DocumentId {
    fn borrow(&self) -> &str {
        &self.id_value
    }
}

impl From<u64> for DocumentId {
    fn from(value: u64) -> Self {
        DocumentId {
            id_value: value.to_string(),
        }
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        DocumentId {
            id_value: value.to_string(),
        }
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        DocumentId { id_value: value }
    }
}

impl PartialEq<&str> for DocumentId {
    fn eq(&self, other: &&str) -> bool {
        self.id_value == *other
    }
}

impl PartialEq<str> for DocumentId {
    fn eq(&self, other: &str) -> bool {
        self.id_value == other
    }
}

impl Ord for DocumentId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric_value(), other.numeric_value()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.id_value.cmp(&other.id_value)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.id_value.cmp(&other.id_value),
        }
    }
}

impl PartialOrd for DocumentId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id_value)
    }
}

impl Debug for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DocumentId({})", self.id_value)
    }
}
