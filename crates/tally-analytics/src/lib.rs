//! Detail-screen analytics for a single habit.
//!
//! [`compute_analytics`] is a pure function of a log snapshot and a
//! lookback window: no store access, no I/O, and exactly one clock read at
//! entry. The ledger's sparsity convention applies throughout: a date with
//! no row reads as "not completed", the same as an explicit status-0 row.

use std::collections::HashSet;

use tally_core::dates::{self, to_ymd};
use tally_core::types::{CompletionRecord, DayMark, HabitAnalytics, LookbackWindow};
use time::{Date, Duration};

/// Compute the analytics bundle for one habit's log, relative to today's
/// local date.
pub fn compute_analytics(logs: &[CompletionRecord], window: LookbackWindow) -> HabitAnalytics {
    compute_analytics_at(logs, window, dates::today())
}

/// Same as [`compute_analytics`] with an explicit reference day.
pub fn compute_analytics_at(
    logs: &[CompletionRecord],
    window: LookbackWindow,
    today: Date,
) -> HabitAnalytics {
    if logs.is_empty() {
        return HabitAnalytics::default();
    }

    // Defensive copy, newest first. The fixed-width YYYY-MM-DD form sorts
    // lexicographically in date order, so no parsing is needed.
    let mut sorted: Vec<&CompletionRecord> = logs.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let completed_count = sorted.iter().filter(|r| r.status.is_done()).count();
    let completion_rate = completed_count as f64 / sorted.len() as f64 * 100.0;

    let done_dates: HashSet<&str> = sorted
        .iter()
        .filter(|r| r.status.is_done())
        .map(|r| r.date.as_str())
        .collect();

    let days = window.days();

    // Current streak: walk calendar days backward from today, capped at
    // the window. A day with no row breaks it exactly like an explicit
    // status-0 row.
    let mut current_streak = 0u32;
    for i in 0..days {
        let day = to_ymd(today - Duration::days(i as i64));
        if done_dates.contains(day.as_str()) {
            current_streak += 1;
        } else {
            break;
        }
    }

    // Best streak: run length over stored rows in date order. Days with no
    // row are invisible here, so a calendar gap neither extends nor resets
    // the run while an explicit status-0 row resets it. Asymmetric with
    // the current-streak scan above; kept to match the ledger's historical
    // behavior.
    let mut best_streak = 0u32;
    let mut run = 0u32;
    for rec in sorted.iter().rev() {
        if rec.status.is_done() {
            run += 1;
            best_streak = best_streak.max(run);
        } else {
            run = 0;
        }
    }

    // Per-day series over the window, oldest first, dense by construction.
    let mut streak_data = Vec::with_capacity(days);
    for i in (0..days).rev() {
        let day = to_ymd(today - Duration::days(i as i64));
        let completed = done_dates.contains(day.as_str());
        streak_data.push(DayMark {
            date: day,
            completed,
        });
    }

    // Sparkline: trailing 7-calendar-day completion percentage ending on
    // each window day, oldest first. Always out of 7, however sparse the
    // log is.
    let mut sparkline_data = Vec::with_capacity(days);
    for i in (0..days).rev() {
        let end = today - Duration::days(i as i64);
        let in_week = (0..7)
            .filter(|j| done_dates.contains(to_ymd(end - Duration::days(*j)).as_str()))
            .count();
        sparkline_data.push(in_week as f64 / 7.0 * 100.0);
    }

    // Averages over the logged row count, not the lookback window.
    let weekly_average = if completed_count > 0 {
        completed_count as f64 / sorted.len().div_ceil(7) as f64
    } else {
        0.0
    };
    let monthly_average = if completed_count > 0 {
        completed_count as f64 / sorted.len().div_ceil(30) as f64
    } else {
        0.0
    };

    HabitAnalytics {
        completion_rate,
        current_streak,
        best_streak,
        total_completions: completed_count as u32,
        weekly_average,
        monthly_average,
        streak_data,
        sparkline_data,
    }
}
