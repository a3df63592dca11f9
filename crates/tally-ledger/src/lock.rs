use crate::error::{Result, StoreError};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::Path;

/// Exclusive lock guarding the database against a second process.
/// Automatically released when dropped.
///
/// The store assumes a single active writer; acquiring this lock before
/// opening the store makes that assumption explicit at the filesystem
/// level. SQLite's own locking still protects the data if the guard is
/// skipped.
pub struct StoreLock {
    _file: File,
}

impl StoreLock {
    /// Try to acquire the lock for the database at `db_path` (non-blocking).
    /// Fails with [`StoreError::Locked`] if another process holds it.
    pub fn acquire(db_path: &Path) -> Result<Self> {
        let lock_path = db_path.with_extension("db.lock");
        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&lock_path)?;

        file.try_lock_exclusive()
            .map_err(|_| StoreError::Locked(lock_path))?;

        Ok(Self { _file: file })
    }
}
