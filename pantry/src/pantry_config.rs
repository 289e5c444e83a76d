//! Configuration management for a Pantry store.

use crate::common::DEFAULT_DATA_DIR;
use crate::errors::{ErrorKind, PantryError, PantryResult};
use parking_lot::RwLock;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What a mutation does when its collection file cannot be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistenceMode {
    /// Log the failure and keep the in-memory change. The call succeeds and
    /// the file catches up on the next successful write of that collection.
    #[default]
    FailOpen,
    /// Roll the in-memory change back and return the error, so memory never
    /// runs ahead of disk.
    FailClosed,
}

impl Display for PersistenceMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistenceMode::FailOpen => write!(f, "fail-open"),
            PersistenceMode::FailClosed => write!(f, "fail-closed"),
        }
    }
}

/// Configuration for a Pantry store.
///
/// `PantryConfig` is cheap to clone; clones share the same settings. All
/// settings are frozen once the store is initialized, and setters called after
/// that return [ErrorKind::InvalidOperation].
///
/// | Setting | Default |
/// |---|---|
/// | data directory | `data` |
/// | seed sample data | `true` |
/// | persistence mode | [PersistenceMode::FailOpen] |
///
/// Usually configured through [crate::pantry_builder::PantryBuilder] rather
/// than directly.
#[derive(Clone)]
pub struct PantryConfig {
    inner: Arc<PantryConfigInner>,
}

impl Default for PantryConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PantryConfig {
    pub fn new() -> Self {
        PantryConfig {
            inner: Arc::new(PantryConfigInner::new()),
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.inner.data_dir()
    }

    /// Sets the directory holding the collection files.
    ///
    /// # Errors
    ///
    /// Returns [ErrorKind::ValidationError] for an empty path and
    /// [ErrorKind::InvalidOperation] after initialization.
    pub fn set_data_dir<P: AsRef<Path>>(&self, data_dir: P) -> PantryResult<()> {
        self.inner.set_data_dir(data_dir.as_ref())
    }

    pub fn seed_sample_data(&self) -> bool {
        self.inner.seed_sample_data()
    }

    /// Whether an empty menu collection is filled with the sample menu on
    /// initialization.
    pub fn set_seed_sample_data(&self, seed: bool) -> PantryResult<()> {
        self.inner.set_seed_sample_data(seed)
    }

    pub fn persistence_mode(&self) -> PersistenceMode {
        self.inner.persistence_mode()
    }

    pub fn set_persistence_mode(&self, mode: PersistenceMode) -> PantryResult<()> {
        self.inner.set_persistence_mode(mode)
    }

    pub fn is_configured(&self) -> bool {
        self.inner.configured.load(Ordering::Relaxed)
    }

    pub(crate) fn initialize(&self) {
        self.inner.configured.store(true, Ordering::Relaxed);
    }
}

struct PantryConfigInner {
    configured: AtomicBool,
    data_dir: RwLock<PathBuf>,
    seed_sample_data: AtomicBool,
    persistence_mode: RwLock<PersistenceMode>,
}

impl PantryConfigInner {
    fn new() -> Self {
        PantryConfigInner {
            configured: AtomicBool::from(false),
            data_dir: RwLock::new(PathBuf::from(DEFAULT_DATA_DIR)),
            seed_sample_data: AtomicBool::from(true),
            persistence_mode: RwLock::new(PersistenceMode::default()),
        }
    }

    fn check_not_configured(&self, setting: &str) -> PantryResult<()> {
        if self.configured.load(Ordering::Relaxed) {
            log::error!("{} cannot be changed after initialization", setting);
            return Err(PantryError::new(
                &format!("{} cannot be changed after initialization", setting),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }

    fn data_dir(&self) -> PathBuf {
        self.data_dir.read().clone()
    }

    fn set_data_dir(&self, data_dir: &Path) -> PantryResult<()> {
        self.check_not_configured("Data directory")?;

        if data_dir.as_os_str().is_empty() {
            log::error!("Data directory cannot be empty");
            return Err(PantryError::new(
                "Data directory cannot be empty",
                ErrorKind::ValidationError,
            ));
        }

        *self.data_dir.write() = data_dir.to_path_buf();
        Ok(())
    }

    fn seed_sample_data(&self) -> bool {
        self.seed_sample_data.load(Ordering::Relaxed)
    }

    fn set_seed_sample_data(&self, seed: bool) -> PantryResult<()> {
        self.check_not_configured("Sample data seeding")?;
        self.seed_sample_data.store(seed, Ordering::Relaxed);
        Ok(())
    }

    fn persistence_mode(&self) -> PersistenceMode {
        *self.persistence_mode.read()
    }

    fn set_persistence_mode(&self, mode: PersistenceMode) -> PantryResult<()> {
        self.check_not_configured("Persistence mode")?;
        *self.persistence_mode.write() = mode;
        Ok(())
    }
}
