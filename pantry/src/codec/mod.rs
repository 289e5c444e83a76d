//! The JSON codec used for collection files.
//!
//! Pantry reads and writes a small JSON dialect: objects whose values are
//! null, booleans, numbers, strings or nested objects. Encoding is exact.
//! Decoding is lenient and never fails; whatever it cannot classify is kept
//! as a raw string, and entries it cannot read at all are dropped with a
//! warning.

mod decoder;
mod encoder;
mod scanner;

pub use decoder::*;
pub use encoder::*;
pub use scanner::*;
