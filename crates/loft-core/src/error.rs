use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoftError {
    #[error("Construction error: {0}")]
    Construction(String),

    #[error("Invalid direction token: {0:?} (expected \"U\" or \"V\")")]
    InvalidDirection(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Unimplemented: {0}")]
    Unimplemented(&'static str),

    #[error("Singular linear system: {0}")]
    Singular(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, LoftError>;
