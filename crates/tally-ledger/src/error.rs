use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures surfaced by the ledger store. No operation retries internally;
/// everything propagates synchronously to the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another habit already has this name under case-insensitive
    /// comparison after trimming.
    #[error("habit \"{0}\" already exists")]
    DuplicateName(String),

    /// A store operation ran before the store was opened. Not recoverable
    /// by retry; the application must construct the store first.
    #[error("habit store is not initialized")]
    Uninitialized,

    /// The database is held by another process.
    #[error("habit store is locked by another process ({0})")]
    Locked(PathBuf),

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl StoreError {
    /// Stable classification code. The presentation layer words
    /// `duplicate_name` as a validation message; everything else degrades
    /// to a generic "try again".
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::DuplicateName(_) => "duplicate_name",
            StoreError::Uninitialized => "uninitialized",
            StoreError::Locked(_) | StoreError::Io(_) | StoreError::Storage(_) => "storage",
        }
    }
}
