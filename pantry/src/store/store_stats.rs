use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// A point-in-time summary of a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    data_dir: PathBuf,
    collections: Vec<(String, usize)>,
    next_id: u64,
}

impl StoreStats {
    pub(crate) fn new(data_dir: PathBuf, mut collections: Vec<(String, usize)>, next_id: u64) -> Self {
        collections.sort();
        StoreStats {
            data_dir,
            collections,
            next_id,
        }
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Collection names with their document counts, sorted by name.
    pub fn collections(&self) -> &[(String, usize)] {
        &self.collections
    }

    pub fn collection_count(&self) -> usize {
        self.collections.len()
    }

    pub fn document_count(&self) -> usize {
        self.collections.iter().map(|(_, count)| count).sum()
    }

    /// Document count of one collection, `None` if the collection is unknown.
    pub fn count_of(&self, collection: &str) -> Option<usize> {
        self.collections
            .iter()
            .find(|(name, _)| name == collection)
            .map(|(_, count)| *count)
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }
}

impl Display for StoreStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Collections: {}", self.collections.len())?;
        for (name, count) in &self.collections {
            writeln!(f, "  {}: {} documents", name, count)?;
        }
        writeln!(f, "Next id: {}", self.next_id)?;
        write!(f, "Data directory: {}", self.data_dir.display())
    }
}
