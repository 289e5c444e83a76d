use crate::codec::{decode_collection, encode_collection, CollectionSnapshot};
use crate::collection::{Document, DocumentId};
use crate::common::{validate_collection_name, COLLECTION_FILE_EXTENSION, TEMP_FILE_EXTENSION};
use crate::errors::{ErrorKind, PantryError, PantryResult};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Reads and writes collection files in the data directory.
///
/// Every collection lives in `<name>.json` as one line of JSON. Writes go to
/// `<name>.json.tmp` first and are renamed into place, so a reader never sees
/// a half-written collection file.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> FileStore {
        FileStore {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Creates the data directory and its parents if missing.
    ///
    /// Returns `true` if the directory had to be created.
    pub fn ensure_data_dir(&self) -> PantryResult<bool> {
        if self.data_dir.is_dir() {
            return Ok(false);
        }

        fs::create_dir_all(&self.data_dir).map_err(|err| {
            log::error!(
                "Failed to create data directory {}: {}",
                self.data_dir.display(),
                err
            );
            PantryError::new_with_cause(
                &format!(
                    "Failed to create data directory {}",
                    self.data_dir.display()
                ),
                ErrorKind::IOError,
                err.into(),
            )
        })?;
        log::info!("Created data directory {}", self.data_dir.display());
        Ok(true)
    }

    pub fn collection_path(&self, name: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", name, COLLECTION_FILE_EXTENSION))
    }

    fn temp_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.{}", name, TEMP_FILE_EXTENSION))
    }

    /// Names of the collections that have a file in the data directory, sorted.
    ///
    /// Temporary files and files whose name is not a valid collection name are
    /// skipped. A missing data directory has no collections.
    pub fn collection_names(&self) -> PantryResult<Vec<String>> {
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                log::error!(
                    "Failed to list data directory {}: {}",
                    self.data_dir.display(),
                    err
                );
                return Err(err.into());
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(COLLECTION_FILE_EXTENSION)
            {
                continue;
            }

            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if validate_collection_name(name).is_err() {
                log::warn!("Ignoring file {} with invalid collection name", path.display());
                continue;
            }
            names.push(name.to_string());
        }

        names.sort();
        Ok(names)
    }

    /// Loads a collection file.
    ///
    /// Returns `None` if the file is absent or blank. Malformed content never
    /// fails the load; the decoder drops what it cannot read.
    pub fn load_collection(&self, name: &str) -> PantryResult<Option<CollectionSnapshot>> {
        let path = self.collection_path(name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                log::error!("Failed to read collection file {}: {}", path.display(), err);
                return Err(PantryError::new_with_cause(
                    &format!("Failed to read collection file {}", path.display()),
                    ErrorKind::IOError,
                    err.into(),
                ));
            }
        };

        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(decode_collection(&content)))
    }

    /// Replaces the collection file with the given entries.
    pub fn save_collection(
        &self,
        name: &str,
        entries: &[(DocumentId, Document)],
    ) -> PantryResult<()> {
        let json = encode_collection(entries.iter().map(|(id, document)| (id, document)));
        let temp_path = self.temp_path(name);
        let path = self.collection_path(name);

        self.write_atomically(&temp_path, &path, &json).map_err(|err| {
            log::error!("Failed to save collection {}: {}", name, err);
            // don't leave a stale temp file behind
            let _ = fs::remove_file(&temp_path);
            PantryError::new_with_cause(
                &format!("Failed to save collection {} to {}", name, path.display()),
                ErrorKind::IOError,
                err.into(),
            )
        })?;

        log::debug!("Saved {} documents to {}", entries.len(), path.display());
        Ok(())
    }

    fn write_atomically(&self, temp_path: &Path, path: &Path, json: &str) -> std::io::Result<()> {
        {
            let mut file = fs::File::create(temp_path)?;
            file.write_all(json.as_bytes())?;
            file.write_all(b"\n")?;
            file.sync_all()?;
        }
        fs::rename(temp_path, path)
    }
}
