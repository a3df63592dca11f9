use serde::{Deserialize, Serialize};

/// A tracked habit. Immutable after creation except for deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: i64,
    /// Trimmed display name, unique case-insensitively across the store.
    pub name: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// Per-day completion state. Stored as INTEGER 0/1.
///
/// A missing row for a date reads the same as an explicit `NotDone` row;
/// the explicit row only exists when a completed day was toggled back off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Status {
    NotDone = 0,
    Done = 1,
}

impl Status {
    pub fn is_done(self) -> bool {
        matches!(self, Status::Done)
    }

    /// The state after one toggle.
    pub fn toggled(self) -> Status {
        match self {
            Status::Done => Status::NotDone,
            Status::NotDone => Status::Done,
        }
    }

    pub fn from_i64(v: i64) -> Option<Status> {
        match v {
            0 => Some(Status::NotDone),
            1 => Some(Status::Done),
            _ => None,
        }
    }

    pub fn as_i64(self) -> i64 {
        self as i64
    }
}

impl From<Status> for u8 {
    fn from(s: Status) -> u8 {
        s as u8
    }
}

impl TryFrom<u8> for Status {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Status::from_i64(v as i64).ok_or_else(|| format!("invalid status {v}, expected 0 or 1"))
    }
}

/// One row of a habit's completion log.
///
/// At most one record exists per `(habit_id, date)`; the store enforces
/// this as a hard uniqueness constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub id: i64,
    pub habit_id: i64,
    /// Calendar date in `YYYY-MM-DD` form, local-day granularity.
    pub date: String,
    pub status: Status,
}

/// A habit joined with its list-screen aggregates. Derived on every read,
/// never persisted.
///
/// `current_streak` here is the ledger definition: the count of completions
/// with no later explicit status-0 row for the same habit. It does not
/// require calendar contiguity; see `tally-analytics` for the strict
/// per-habit streak shown on the detail screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitSummary {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub total_completions: i64,
    pub completed_today: bool,
    pub current_streak: i64,
}

/// One day of the detail-screen completion series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMark {
    pub date: String,
    pub completed: bool,
}

/// The analytics bundle for one habit's detail view. Pure function output;
/// lives for the rendering of one screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitAnalytics {
    /// Percentage of logged rows with status 1, over all ever-logged days.
    pub completion_rate: f64,
    /// Calendar-contiguous streak ending today, capped at the lookback window.
    pub current_streak: u32,
    /// Longest run of consecutive status-1 rows in the stored log.
    pub best_streak: u32,
    pub total_completions: u32,
    pub weekly_average: f64,
    pub monthly_average: f64,
    /// Exactly one entry per day of the lookback window, oldest first.
    pub streak_data: Vec<DayMark>,
    /// Trailing 7-day completion percentage per window day, oldest first.
    pub sparkline_data: Vec<f64>,
}

/// Lookback window for the detail-screen metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookbackWindow {
    Week,
    Fortnight,
}

impl LookbackWindow {
    pub fn days(self) -> usize {
        match self {
            LookbackWindow::Week => 7,
            LookbackWindow::Fortnight => 14,
        }
    }
}
