//! Documents and their identifiers.

mod document;
mod document_id;
mod id_allocator;

pub use document::*;
pub use document_id::*;
pub use id_allocator::*;
