//! XML parsing and navigation helpers.

mod utils;

pub use utils::*;
