//! List-screen summary aggregation.
//!
//! One query joins every habit with three independently computed
//! aggregates. `current_streak` here is the ledger definition: the number
//! of completions with no later-dated explicit status-0 row for the same
//! habit. It does not check calendar contiguity, and a day with no row at
//! all never breaks it. The detail screen's strict calendar-contiguous
//! streak lives in `tally-analytics`.

use rusqlite::{params, Connection};
use tally_core::types::HabitSummary;

const SUMMARY_SQL: &str = "
SELECT
    h.id,
    h.name,
    h.created_at,
    COALESCE(stats.total_completions, 0) AS total_completions,
    COALESCE(today_log.status, 0) AS completed_today,
    COALESCE(streak.current_streak, 0) AS current_streak
FROM habits h
LEFT JOIN (
    SELECT habit_id, COUNT(*) AS total_completions
    FROM habit_logs
    WHERE status = 1
    GROUP BY habit_id
) stats ON h.id = stats.habit_id
LEFT JOIN (
    SELECT habit_id, status
    FROM habit_logs
    WHERE date = ?1 AND status = 1
) today_log ON h.id = today_log.habit_id
LEFT JOIN (
    SELECT habit_id, COUNT(*) AS current_streak
    FROM habit_logs hl1
    WHERE status = 1
      AND NOT EXISTS (
        SELECT 1 FROM habit_logs hl2
        WHERE hl2.habit_id = hl1.habit_id
          AND hl2.date > hl1.date
          AND hl2.status = 0
      )
    GROUP BY habit_id
) streak ON h.id = streak.habit_id
ORDER BY h.created_at DESC
";

/// Every habit with its aggregates, newest habit first. `today` is the
/// local date in `YYYY-MM-DD` form; date comparisons are lexicographic.
pub(crate) fn habits_with_summary(
    conn: &Connection,
    today: &str,
) -> rusqlite::Result<Vec<HabitSummary>> {
    let mut stmt = conn.prepare(SUMMARY_SQL)?;
    let rows = stmt.query_map(params![today], |row| {
        let completed_today: i64 = row.get(4)?;
        Ok(HabitSummary {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at: row.get(2)?,
            total_completions: row.get(3)?,
            completed_today: completed_today == 1,
            current_streak: row.get(5)?,
        })
    })?;
    rows.collect()
}
