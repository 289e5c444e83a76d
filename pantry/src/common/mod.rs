//! Common types shared across Pantry: the [Value] model, reserved field and
//! collection names, and small utilities.

mod constants;
mod value;
pub mod util;

pub use constants::*;
pub use util::*;
pub use value::*;
