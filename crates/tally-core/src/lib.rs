pub mod dates;
pub mod suggestions;
pub mod types;

pub use types::*;
