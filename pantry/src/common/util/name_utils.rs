use crate::errors::{ErrorKind, PantryError, PantryResult};
use once_cell::sync::Lazy;
use regex::Regex;

// collection names double as file names inside the data directory
static COLLECTION_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+$").expect("collection name pattern is valid")
});

/// Validates a collection name.
///
/// A name must be non-empty and consist only of ASCII letters, digits,
/// `_` and `-`, so that `<name>.json` always stays inside the data directory.
pub fn validate_collection_name(name: &str) -> PantryResult<()> {
    if name.is_empty() {
        log::error!("Collection name cannot be empty");
        return Err(PantryError::new(
            "Collection name cannot be empty",
            ErrorKind::ValidationError,
        ));
    }

    if !COLLECTION_NAME.is_match(name) {
        log::error!("Collection name '{}' contains invalid characters", name);
        return Err(PantryError::new(
            &format!(
                "Collection name '{}' may only contain letters, digits, '_' and '-'",
                name
            ),
            ErrorKind::ValidationError,
        ));
    }

    Ok(())
}
