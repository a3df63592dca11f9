use std::path::PathBuf;

/// Database file name.
pub const DB_FILE: &str = "habits.db";

/// Per-user data root for the ledger: the platform data directory, with a
/// `~/.tally` fallback when it cannot be determined.
pub fn data_root() -> PathBuf {
    if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("tally")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".tally")
    } else {
        PathBuf::from(".tally")
    }
}

/// Default location of the habit database.
pub fn default_db_path() -> PathBuf {
    data_root().join(DB_FILE)
}
