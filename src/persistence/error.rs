//! Store errors

use thiserror::Error;

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error while preparing the database location
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    /// SQLite engine error
    #[error("store db error: {0}")]
    Db(#[from] rusqlite::Error),
    /// A previous holder of the connection panicked
    #[error("store connection lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;
