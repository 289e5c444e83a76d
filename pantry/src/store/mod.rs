//! Storage for Pantry collections.
//!
//! Collections live in memory in [CollectionMap]s and are written through to
//! disk by the [FileStore], one `<name>.json` file per collection, after every
//! mutation.

mod collection_map;
mod file_store;
mod sample_data;
mod store_stats;

pub use collection_map::*;
pub use file_store::*;
pub(crate) use sample_data::*;
pub use store_stats::*;
