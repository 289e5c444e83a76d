mod date_utils;
mod name_utils;

pub use date_utils::*;
pub use name_utils::*;
