use crate::errors::PantryError;
use crate::pantry_config::{PantryConfig, PersistenceMode};
use crate::{errors::PantryResult, pantry::Pantry};
use std::path::Path;

/// Fluent builder for opening a [Pantry] store.
///
/// The first invalid setting is remembered and returned by
/// [PantryBuilder::open]; later settings are ignored once an error occurred.
///
/// ```rust,no_run
/// use pantry::pantry::Pantry;
/// use pantry::pantry_config::PersistenceMode;
///
/// let db = Pantry::builder()
///     .data_dir("/var/lib/foodie/data")
///     .persistence_mode(PersistenceMode::FailClosed)
///     .open()
///     .unwrap();
/// ```
#[derive(Default)]
pub struct PantryBuilder {
    error: Option<PantryError>,
    pantry_config: PantryConfig,
}

impl PantryBuilder {
    pub fn new() -> Self {
        PantryBuilder {
            error: None,
            pantry_config: PantryConfig::new(),
        }
    }

    pub fn data_dir<P: AsRef<Path>>(mut self, data_dir: P) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.pantry_config.set_data_dir(data_dir) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn seed_sample_data(mut self, seed: bool) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.pantry_config.set_seed_sample_data(seed) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn persistence_mode(mut self, mode: PersistenceMode) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.pantry_config.set_persistence_mode(mode) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Creates the store and loads it from the data directory.
    pub fn open(self) -> PantryResult<Pantry> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let pantry = Pantry::new(self.pantry_config);
        pantry.initialize()?;
        Ok(pantry)
    }
}
