pub mod error;
pub mod tolerance;

pub use error::{LoftError, Result};
pub use tolerance::Tolerance;
