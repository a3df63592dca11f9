//! SQLite-backed storage for habits and their completion logs.
//!
//! One `habits.db` file in WAL mode. The store owns all persisted rows;
//! summaries and analytics are derived from them on every read.

use crate::error::{Result, StoreError};
use crate::{paths, summary};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tally_core::dates;
use tally_core::types::{CompletionRecord, Habit, HabitSummary, Status};

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS habits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS habit_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    habit_id INTEGER NOT NULL REFERENCES habits(id),
    date TEXT NOT NULL,
    status INTEGER NOT NULL,
    UNIQUE(habit_id, date)
);

CREATE INDEX IF NOT EXISTS idx_habit_logs_habit ON habit_logs(habit_id);
CREATE INDEX IF NOT EXISTS idx_habit_logs_habit_date ON habit_logs(habit_id, date DESC);

CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

/// SQLite-backed habit store. Single connection, single active writer.
pub struct HabitStore {
    conn: Connection,
}

impl HabitStore {
    /// Open or create the database at `db_path` with full schema.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        let store = Self { conn };
        store.apply_pragmas()?;
        store.apply_schema()?;
        tracing::debug!(path = %db_path.display(), "habit store opened");
        Ok(store)
    }

    /// Open at the platform default location (see [`paths::default_db_path`]).
    pub fn open_default() -> Result<Self> {
        Self::open(&paths::default_db_path())
    }

    /// In-memory store, mainly for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.apply_pragmas()?;
        store.apply_schema()?;
        Ok(store)
    }

    fn apply_pragmas(&self) -> Result<()> {
        self.conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    }

    fn apply_schema(&self) -> Result<()> {
        // Idempotent via IF NOT EXISTS
        self.conn.execute_batch(SCHEMA_SQL)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('version', '1')",
            [],
        )?;
        Ok(())
    }

    /// Current schema version recorded in `schema_meta`.
    pub fn schema_version(&self) -> Result<u32> {
        let version: String = self.conn.query_row(
            "SELECT value FROM schema_meta WHERE key = 'version'",
            [],
            |row| row.get(0),
        )?;
        Ok(version.parse().unwrap_or(1))
    }

    // ── Habits ──────────────────────────────────────────────────────

    /// Create a habit, stamping the current time as `created_at`.
    ///
    /// The name is trimmed first; a case-insensitive collision with an
    /// existing name fails with [`StoreError::DuplicateName`].
    pub fn create_habit(&self, name: &str) -> Result<Habit> {
        self.create_habit_at(name, &dates::now_rfc3339())
    }

    /// Create a habit with a caller-supplied creation timestamp.
    pub fn create_habit_at(&self, name: &str, created_at: &str) -> Result<Habit> {
        let name = name.trim();
        let tx = self.conn.unchecked_transaction()?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM habits WHERE LOWER(name) = LOWER(?1)",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(StoreError::DuplicateName(name.to_string()));
        }

        tx.execute(
            "INSERT INTO habits (name, created_at) VALUES (?1, ?2)",
            params![name, created_at],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        tracing::debug!(id, name, "habit created");

        Ok(Habit {
            id,
            name: name.to_string(),
            created_at: created_at.to_string(),
        })
    }

    /// Delete a habit and all of its completion records in one
    /// transaction. Deleting an id that does not exist is a no-op.
    pub fn delete_habit(&self, id: i64) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM habit_logs WHERE habit_id = ?1", params![id])?;
        tx.execute("DELETE FROM habits WHERE id = ?1", params![id])?;
        tx.commit()?;
        tracing::debug!(id, "habit deleted");
        Ok(())
    }

    /// All habits without aggregates, newest first.
    pub fn list_habits(&self) -> Result<Vec<Habit>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM habits ORDER BY created_at DESC")?;
        let habits = stmt
            .query_map([], |row| {
                Ok(Habit {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(habits)
    }

    /// Each habit joined with its list-screen aggregates, newest habit
    /// first. Recomputed from the log on every call.
    pub fn list_habits_with_summary(&self) -> Result<Vec<HabitSummary>> {
        self.list_habits_with_summary_on(&dates::today_ymd())
    }

    pub(crate) fn list_habits_with_summary_on(&self, today: &str) -> Result<Vec<HabitSummary>> {
        Ok(summary::habits_with_summary(&self.conn, today)?)
    }

    // ── Completion log ──────────────────────────────────────────────

    /// The single write path for completion state: inserts a status-1
    /// record if none exists for `(habit_id, date)`, otherwise flips the
    /// existing record. The first toggle of a day always means "done".
    pub fn toggle_completion(&self, habit_id: i64, date: &str) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        let existing: Option<(i64, Status)> = tx
            .query_row(
                "SELECT id, status FROM habit_logs WHERE habit_id = ?1 AND date = ?2",
                params![habit_id, date],
                |row| {
                    let raw: i64 = row.get(1)?;
                    Ok((row.get(0)?, status_from_raw(1, raw)?))
                },
            )
            .optional()?;

        match existing {
            Some((log_id, status)) => {
                tx.execute(
                    "UPDATE habit_logs SET status = ?1 WHERE id = ?2",
                    params![status.toggled().as_i64(), log_id],
                )?;
            }
            None => {
                tx.execute(
                    "INSERT INTO habit_logs (habit_id, date, status) VALUES (?1, ?2, 1)",
                    params![habit_id, date],
                )?;
            }
        }

        tx.commit()?;
        tracing::debug!(habit_id, date, "completion toggled");
        Ok(())
    }

    /// All completion records for a habit, newest date first.
    pub fn list_logs(&self, habit_id: i64) -> Result<Vec<CompletionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, date, status FROM habit_logs
             WHERE habit_id = ?1 ORDER BY date DESC",
        )?;
        let logs = stmt
            .query_map(params![habit_id], map_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(logs)
    }
}

impl Drop for HabitStore {
    fn drop(&mut self) {
        // Merge WAL back into the main DB so users see a single file when idle.
        let _ = self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);");
    }
}

// ── Row mapping ─────────────────────────────────────────────────────

fn status_from_raw(idx: usize, raw: i64) -> rusqlite::Result<Status> {
    Status::from_i64(raw).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, raw))
}

fn map_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<CompletionRecord> {
    let raw: i64 = row.get(3)?;
    Ok(CompletionRecord {
        id: row.get(0)?,
        habit_id: row.get(1)?,
        date: row.get(2)?,
        status: status_from_raw(3, raw)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> HabitStore {
        HabitStore::open_in_memory().unwrap()
    }

    fn toggle_days(store: &HabitStore, habit_id: i64, dates: &[&str]) {
        for d in dates {
            store.toggle_completion(habit_id, d).unwrap();
        }
    }

    #[test]
    fn schema_creation() {
        let store = test_store();
        let tables: Vec<String> = store
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<Vec<_>>>()
            .unwrap();
        assert!(tables.contains(&"habits".to_string()));
        assert!(tables.contains(&"habit_logs".to_string()));
        assert!(tables.contains(&"schema_meta".to_string()));
        assert_eq!(store.schema_version().unwrap(), 1);
    }

    #[test]
    fn create_habit_trims_and_assigns_id() {
        let store = test_store();
        let habit = store.create_habit("  Reading  ").unwrap();
        assert_eq!(habit.name, "Reading");
        assert!(habit.id > 0);
        assert!(!habit.created_at.is_empty());
    }

    #[test]
    fn duplicate_name_is_case_insensitive() {
        let store = test_store();
        store.create_habit("Reading").unwrap();

        let err = store.create_habit("reading ").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(_)));
        assert_eq!(err.code(), "duplicate_name");

        // A genuinely different name still works
        store.create_habit("Reading2").unwrap();
    }

    #[test]
    fn create_habit_at_keeps_supplied_timestamp() {
        let store = test_store();
        let habit = store
            .create_habit_at("Reading", "2024-01-01T08:00:00Z")
            .unwrap();
        assert_eq!(habit.created_at, "2024-01-01T08:00:00Z");
        let listed = store.list_habits().unwrap();
        assert_eq!(listed[0].created_at, "2024-01-01T08:00:00Z");
    }

    #[test]
    fn toggle_alternates_starting_from_done() {
        let store = test_store();
        let habit = store.create_habit("Water").unwrap();

        store.toggle_completion(habit.id, "2024-01-01").unwrap();
        let logs = store.list_logs(habit.id).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, Status::Done);

        store.toggle_completion(habit.id, "2024-01-01").unwrap();
        let logs = store.list_logs(habit.id).unwrap();
        // Toggling off keeps the record, with an explicit 0
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, Status::NotDone);

        store.toggle_completion(habit.id, "2024-01-01").unwrap();
        assert_eq!(store.list_logs(habit.id).unwrap()[0].status, Status::Done);

        // An even number of toggles always lands back on explicit 0
        store.toggle_completion(habit.id, "2024-01-01").unwrap();
        let logs = store.list_logs(habit.id).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, Status::NotDone);
    }

    #[test]
    fn one_record_per_habit_and_date() {
        let store = test_store();
        let habit = store.create_habit("Water").unwrap();
        for _ in 0..5 {
            store.toggle_completion(habit.id, "2024-01-01").unwrap();
        }
        let count: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM habit_logs", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn delete_cascades_to_logs() {
        let store = test_store();
        let habit = store.create_habit("Water").unwrap();
        toggle_days(&store, habit.id, &["2024-01-01", "2024-01-02"]);

        store.delete_habit(habit.id).unwrap();
        assert!(store.list_logs(habit.id).unwrap().is_empty());
        assert!(store.list_habits().unwrap().is_empty());
    }

    #[test]
    fn delete_unknown_id_is_a_no_op() {
        let store = test_store();
        store.delete_habit(999).unwrap();
    }

    #[test]
    fn toggle_for_unknown_habit_is_a_storage_error() {
        let store = test_store();
        let err = store.toggle_completion(999, "2024-01-01").unwrap_err();
        assert_eq!(err.code(), "storage");
    }

    #[test]
    fn list_habits_newest_first() {
        let store = test_store();
        store
            .create_habit_at("Older", "2024-01-01T08:00:00Z")
            .unwrap();
        store
            .create_habit_at("Newer", "2024-02-01T08:00:00Z")
            .unwrap();
        let names: Vec<String> = store
            .list_habits()
            .unwrap()
            .into_iter()
            .map(|h| h.name)
            .collect();
        assert_eq!(names, vec!["Newer", "Older"]);
    }

    #[test]
    fn list_logs_newest_date_first() {
        let store = test_store();
        let habit = store.create_habit("Water").unwrap();
        toggle_days(
            &store,
            habit.id,
            &["2024-01-02", "2024-01-10", "2024-01-05"],
        );
        let dates: Vec<String> = store
            .list_logs(habit.id)
            .unwrap()
            .into_iter()
            .map(|l| l.date)
            .collect();
        assert_eq!(dates, vec!["2024-01-10", "2024-01-05", "2024-01-02"]);
    }

    // ── Summary aggregation ─────────────────────────────────────────

    #[test]
    fn summary_counts_only_completions() {
        let store = test_store();
        let habit = store.create_habit("Water").unwrap();
        toggle_days(&store, habit.id, &["2024-01-01", "2024-01-02"]);
        // Toggle one day back off: explicit 0 row remains
        store.toggle_completion(habit.id, "2024-01-02").unwrap();

        let summaries = store.list_habits_with_summary_on("2024-01-03").unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].total_completions, 1);
    }

    #[test]
    fn summary_completed_today_needs_a_status_one_row() {
        let store = test_store();
        let habit = store.create_habit("Water").unwrap();

        let s = store.list_habits_with_summary_on("2024-01-01").unwrap();
        assert!(!s[0].completed_today);

        store.toggle_completion(habit.id, "2024-01-01").unwrap();
        let s = store.list_habits_with_summary_on("2024-01-01").unwrap();
        assert!(s[0].completed_today);

        // Explicit 0 for today reads as not completed
        store.toggle_completion(habit.id, "2024-01-01").unwrap();
        let s = store.list_habits_with_summary_on("2024-01-01").unwrap();
        assert!(!s[0].completed_today);
    }

    #[test]
    fn summary_streak_counts_uncontradicted_completions() {
        let store = test_store();
        let habit = store.create_habit("Water").unwrap();
        // Three completions with a calendar gap: the ledger streak does not
        // require contiguity, so all three count.
        toggle_days(
            &store,
            habit.id,
            &["2024-01-01", "2024-01-02", "2024-01-05"],
        );
        let s = store.list_habits_with_summary_on("2024-01-05").unwrap();
        assert_eq!(s[0].current_streak, 3);

        // An explicit miss after them contradicts every earlier completion
        store.toggle_completion(habit.id, "2024-01-06").unwrap();
        store.toggle_completion(habit.id, "2024-01-06").unwrap();
        let s = store.list_habits_with_summary_on("2024-01-06").unwrap();
        assert_eq!(s[0].current_streak, 0);

        // A completion after the miss starts the count again
        store.toggle_completion(habit.id, "2024-01-07").unwrap();
        let s = store.list_habits_with_summary_on("2024-01-07").unwrap();
        assert_eq!(s[0].current_streak, 1);
    }

    #[test]
    fn summary_orders_newest_habit_first() {
        let store = test_store();
        store
            .create_habit_at("Older", "2024-01-01T08:00:00Z")
            .unwrap();
        store
            .create_habit_at("Newer", "2024-02-01T08:00:00Z")
            .unwrap();
        let names: Vec<String> = store
            .list_habits_with_summary()
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Newer", "Older"]);
    }

    #[test]
    fn summary_is_pure_function_of_stored_state() {
        let store = test_store();
        let habit = store.create_habit("Water").unwrap();
        toggle_days(
            &store,
            habit.id,
            &["2024-01-01", "2024-01-02", "2024-01-03"],
        );
        let first = store.list_habits_with_summary_on("2024-01-03").unwrap();
        let second = store.list_habits_with_summary_on("2024-01-03").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn summary_for_habit_with_no_logs_is_zeroed() {
        let store = test_store();
        store.create_habit("Water").unwrap();
        let s = store.list_habits_with_summary_on("2024-01-01").unwrap();
        assert_eq!(s[0].total_completions, 0);
        assert!(!s[0].completed_today);
        assert_eq!(s[0].current_streak, 0);
    }

    #[test]
    fn store_persists_across_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("habits.db");

        {
            let store = HabitStore::open(&db_path).unwrap();
            let habit = store.create_habit("Water").unwrap();
            store.toggle_completion(habit.id, "2024-01-01").unwrap();
        }

        let store = HabitStore::open(&db_path).unwrap();
        let habits = store.list_habits().unwrap();
        assert_eq!(habits.len(), 1);
        assert_eq!(habits[0].name, "Water");
        let logs = store.list_logs(habits[0].id).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, Status::Done);
    }

    #[test]
    fn wal_checkpoint_on_drop() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("habits.db");

        {
            let store = HabitStore::open(&db_path).unwrap();
            store.create_habit("Water").unwrap();
            // Drop triggers checkpoint
        }

        assert!(db_path.exists());
        let wal_path = tmp.path().join("habits.db-wal");
        if wal_path.exists() {
            let size = std::fs::metadata(&wal_path).unwrap().len();
            assert_eq!(size, 0, "WAL file should be empty after checkpoint");
        }
    }
}
