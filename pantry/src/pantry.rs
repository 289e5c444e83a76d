use crate::collection::{Document, DocumentId, IdAllocator};
use crate::common::{
    current_time_millis, next_timestamp_after, validate_collection_name, Value, DEFAULT_COLLECTIONS,
    DOC_CREATED_AT, DOC_ID, DOC_UPDATED_AT, MENU_ITEMS, PANTRY_VERSION,
};
use crate::errors::PantryResult;
use crate::pantry_builder::PantryBuilder;
use crate::pantry_config::{PantryConfig, PersistenceMode};
use crate::store::{sample_menu_items, CollectionMap, FileStore, StoreStats};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// An embedded, file-backed JSON document store.
///
/// # Purpose
/// `Pantry` keeps named collections of [Document]s in memory and writes every
/// change straight through to the data directory, one `<collection>.json` file
/// per collection. On open it reloads whatever the directory holds.
///
/// # Characteristics
/// - **Cheap to clone**: clones share the same store
/// - **Serialized writes**: `insert`, `update` and `delete` run one at a time
///   across all collections, file write included
/// - **Lock-free reads**: `find_*` and `count` never wait for a writer and may
///   see a write that has not reached disk yet
/// - **Implicit collections**: a collection exists from its first use
///
/// One data directory must not be shared by two processes; neither would see
/// the other's writes and each would overwrite the other's files.
///
/// # Usage
/// ```rust,no_run
/// use pantry::doc;
/// use pantry::pantry::Pantry;
///
/// let db = Pantry::builder().data_dir("data").open().unwrap();
/// let id = db.insert("cart_items", doc! { itemId: 3, quantity: 2 }).unwrap();
/// db.update("cart_items", &id, doc! { quantity: 3 }).unwrap();
/// let pizzas = db.find_by_field("menu_items", "category", "pizza").unwrap();
/// ```
#[derive(Clone)]
pub struct Pantry {
    inner: Arc<PantryInner>,
}

impl Pantry {
    pub fn builder() -> PantryBuilder {
        PantryBuilder::new()
    }

    pub(crate) fn new(config: PantryConfig) -> Self {
        Pantry {
            inner: Arc::new(PantryInner::new(config)),
        }
    }

    /// Loads the store from its data directory.
    ///
    /// Creates the directory if needed, registers the default collections,
    /// loads every collection file, moves the ID counter past the largest
    /// stored ID and, if enabled, seeds an empty menu with the sample items.
    /// Calling it again is a no-op.
    ///
    /// Unreadable or malformed collection files are logged and skipped.
    pub fn initialize(&self) -> PantryResult<()> {
        self.inner.initialize()
    }

    /// Inserts a document and returns its ID.
    ///
    /// A non-null `id` field is used as the ID and must be a positive integer
    /// or a non-empty string; otherwise a new ID is drawn and written into the
    /// document as an integer. `createdAt` and `updatedAt` are set to now. A
    /// document with the same ID is replaced.
    ///
    /// Numeric IDs are limited to `i64::MAX`. Once that ID has been used,
    /// inserts without an `id` fail with [ErrorKind::InvalidId].
    ///
    /// [ErrorKind::InvalidId]: crate::errors::ErrorKind::InvalidId
    pub fn insert(&self, collection: &str, document: Document) -> PantryResult<DocumentId> {
        self.inner.insert(collection, document)
    }

    /// All documents of the collection, ordered by ID.
    pub fn find_all(&self, collection: &str) -> PantryResult<Vec<Document>> {
        let collection = self.inner.open_collection(collection)?;
        Ok(collection.documents())
    }

    pub fn find_by_id(&self, collection: &str, id: &str) -> PantryResult<Option<Document>> {
        let collection = self.inner.open_collection(collection)?;
        Ok(collection.get(id))
    }

    /// Documents whose `field` equals `value`, ordered by ID.
    ///
    /// Values must match in type as well as content, so `1` does not match
    /// `1.0`. A null `value` matches documents holding an explicit null as
    /// well as documents without the field.
    pub fn find_by_field<V: Into<Value>>(
        &self,
        collection: &str,
        field: &str,
        value: V,
    ) -> PantryResult<Vec<Document>> {
        let collection = self.inner.open_collection(collection)?;
        Ok(collection.find_by_field(field, &value.into()))
    }

    /// Merges `patch` into the document with the given ID.
    ///
    /// Fields of `patch` overwrite existing ones, nested documents included;
    /// `id` and `createdAt` in the patch are ignored. Returns `false`, and
    /// creates nothing, if there is no such document.
    pub fn update(&self, collection: &str, id: &str, patch: Document) -> PantryResult<bool> {
        self.inner.update(collection, id, patch)
    }

    /// Removes the document with the given ID, returning whether it existed.
    pub fn delete(&self, collection: &str, id: &str) -> PantryResult<bool> {
        self.inner.delete(collection, id)
    }

    pub fn count(&self, collection: &str) -> PantryResult<usize> {
        let collection = self.inner.open_collection(collection)?;
        Ok(collection.size())
    }

    /// Names of all known collections, sorted.
    pub fn collection_names(&self) -> Vec<String> {
        self.inner.collection_names()
    }

    pub fn stats(&self) -> StoreStats {
        self.inner.stats()
    }

    /// Logs the store statistics at info level.
    pub fn log_stats(&self) {
        let stats = self.stats();
        log::info!("Pantry statistics, {} collections", stats.collection_count());
        for (name, count) in stats.collections() {
            log::info!("  {}: {} documents", name, count);
        }
        log::info!("Next id {}, data persisted to {}", stats.next_id(), stats.data_dir().display());
    }

    pub fn data_dir(&self) -> PathBuf {
        self.inner.file_store.data_dir().to_path_buf()
    }

    pub fn config(&self) -> PantryConfig {
        self.inner.config.clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.initialized.load(Ordering::Acquire)
    }
}

struct PantryInner {
    config: PantryConfig,
    file_store: FileStore,
    collections: DashMap<String, CollectionMap>,
    id_allocator: IdAllocator,
    write_lock: Mutex<()>,
    initialized: AtomicBool,
}

impl PantryInner {
    fn new(config: PantryConfig) -> Self {
        let file_store = FileStore::new(config.data_dir());
        PantryInner {
            config,
            file_store,
            collections: DashMap::new(),
            id_allocator: IdAllocator::new(),
            write_lock: Mutex::new(()),
            initialized: AtomicBool::from(false),
        }
    }

    fn initialize(&self) -> PantryResult<()> {
        let _guard = self.write_lock.lock();
        if self.initialized.load(Ordering::Acquire) {
            return Ok(());
        }

        self.config.initialize();
        self.file_store.ensure_data_dir()?;

        for name in DEFAULT_COLLECTIONS {
            self.open_collection(name)?;
        }
        self.load_collections()?;

        let max_id = self
            .collections
            .iter()
            .filter_map(|entry| entry.value().max_id())
            .max()
            .unwrap_or(0);
        self.id_allocator.advance_past(max_id);
        log::info!("Next id set to {}", self.id_allocator.peek());

        if self.config.seed_sample_data() && self.open_collection(MENU_ITEMS)?.is_empty() {
            self.seed_sample_menu()?;
        }

        self.initialized.store(true, Ordering::Release);
        log::info!(
            "Pantry {} initialized at {} ({})",
            PANTRY_VERSION,
            self.file_store.data_dir().display(),
            self.config.persistence_mode()
        );
        Ok(())
    }

    fn load_collections(&self) -> PantryResult<()> {
        for name in self.file_store.collection_names()? {
            match self.file_store.load_collection(&name) {
                Ok(Some(snapshot)) => {
                    let collection = CollectionMap::from_snapshot(&name, snapshot);
                    log::info!(
                        "Loaded collection {} ({} documents)",
                        name,
                        collection.size()
                    );
                    self.collections.insert(name, collection);
                }
                Ok(None) => log::debug!("Collection file for {} is empty", name),
                Err(err) => log::error!("Skipping collection {}: {}", name, err),
            }
        }
        Ok(())
    }

    fn seed_sample_menu(&self) -> PantryResult<()> {
        let items = sample_menu_items()?;
        let count = items.len();
        for item in items {
            self.insert_locked(MENU_ITEMS, item)?;
        }
        log::info!("Sample menu data initialized with {} items", count);
        Ok(())
    }

    fn open_collection(&self, name: &str) -> PantryResult<CollectionMap> {
        if let Some(collection) = self.collections.get(name) {
            return Ok(collection.value().clone());
        }

        validate_collection_name(name)?;
        let collection = self
            .collections
            .entry(name.to_string())
            .or_insert_with(|| CollectionMap::new(name))
            .value()
            .clone();
        Ok(collection)
    }

    fn insert(&self, collection: &str, document: Document) -> PantryResult<DocumentId> {
        let _guard = self.write_lock.lock();
        self.insert_locked(collection, document)
    }

    fn insert_locked(&self, collection: &str, mut document: Document) -> PantryResult<DocumentId> {
        let collection = self.open_collection(collection)?;

        let id = match document.id() {
            Some(value) => {
                let id = DocumentId::from_value(value)?;
                if let Some(numeric) = id.numeric_value() {
                    self.id_allocator.advance_past(numeric);
                }
                id
            }
            None => {
                // never above MAX_ID, so it fits the i64 field
                let next = self.id_allocator.next_id()?;
                document.put(DOC_ID, next as i64)?;
                DocumentId::from(next)
            }
        };

        let now = current_time_millis();
        document.put(DOC_CREATED_AT, now)?;
        document.put(DOC_UPDATED_AT, now)?;

        let previous = collection.put(id.clone(), document);
        if previous.is_some() {
            log::warn!("[{}] Replaced existing document with id {}", collection.name(), id);
        }

        self.persist(&collection, || match previous {
            Some(previous) => {
                collection.put(id.clone(), previous);
            }
            None => {
                collection.remove(&id);
            }
        })?;

        log::debug!("[{}] Inserted document with id {}", collection.name(), id);
        Ok(id)
    }

    fn update(&self, collection: &str, id: &str, mut patch: Document) -> PantryResult<bool> {
        let _guard = self.write_lock.lock();
        let collection = self.open_collection(collection)?;

        let Some(previous) = collection.get(id) else {
            log::debug!("[{}] No document with id {} to update", collection.name(), id);
            return Ok(false);
        };

        for managed in [DOC_ID, DOC_CREATED_AT] {
            if patch.remove(managed).is_some() {
                log::debug!("[{}] Ignoring managed field {} in update", collection.name(), managed);
            }
        }
        let mut document = previous.clone();
        document.merge(&patch);

        let last_stamp = previous
            .updated_at()
            .or(previous.created_at())
            .unwrap_or(0);
        document.put(DOC_UPDATED_AT, next_timestamp_after(last_stamp))?;

        let id = DocumentId::from(id);
        collection.put(id.clone(), document);
        self.persist(&collection, || {
            collection.put(id.clone(), previous);
        })?;

        log::debug!("[{}] Updated document with id {}", collection.name(), id);
        Ok(true)
    }

    fn delete(&self, collection: &str, id: &str) -> PantryResult<bool> {
        let _guard = self.write_lock.lock();
        let collection = self.open_collection(collection)?;

        let Some(removed) = collection.remove(id) else {
            log::debug!("[{}] No document with id {} to delete", collection.name(), id);
            return Ok(false);
        };

        self.persist(&collection, || {
            collection.put(DocumentId::from(id), removed);
        })?;

        log::debug!("[{}] Deleted document with id {}", collection.name(), id);
        Ok(true)
    }

    /// Writes the collection file. `rollback` undoes the in-memory change and
    /// only runs when the write fails in fail-closed mode.
    fn persist<F: FnOnce()>(&self, collection: &CollectionMap, rollback: F) -> PantryResult<()> {
        let result = self
            .file_store
            .save_collection(collection.name(), &collection.entries());

        match (result, self.config.persistence_mode()) {
            (Ok(()), _) => Ok(()),
            (Err(err), PersistenceMode::FailOpen) => {
                log::error!(
                    "[{}] Change kept in memory but not persisted: {}",
                    collection.name(),
                    err
                );
                Ok(())
            }
            (Err(err), PersistenceMode::FailClosed) => {
                rollback();
                log::error!("[{}] Change rolled back: {}", collection.name(), err);
                Err(err)
            }
        }
    }

    fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .collections
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    fn stats(&self) -> StoreStats {
        let collections = self
            .collections
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().size()))
            .collect();
        StoreStats::new(
            self.file_store.data_dir().to_path_buf(),
            collections,
            self.id_allocator.peek(),
        )
    }
}
