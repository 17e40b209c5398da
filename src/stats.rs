use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Sink for completed work intervals.
///
/// Fire-and-forget: the controller reports each accepted completion once and
/// moves on. A durable sink should apply its own idempotent deduplication on
/// top of the controller's cooldown.
pub trait StatsSink {
    fn interval_completed(&mut self, duration_minutes: u32);
}

/// Drops every completion (guest mode)
#[derive(Debug, Default)]
pub struct NullStats;

impl StatsSink for NullStats {
    fn interval_completed(&mut self, _duration_minutes: u32) {}
}

/// Offline per-user counters: today, this week, and lifetime totals.
///
/// Daily counts reset at midnight and weekly counts on Monday, detected by
/// date comparison at record time rather than by a background job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalStats {
    pub today_pomodoros: u32,
    pub weekly_pomodoros: u32,
    pub total_pomodoros: u32,
    pub total_focus_minutes: u32,
    pub today_date: NaiveDate,
    pub week_start_date: NaiveDate,
}

impl LocalStats {
    pub fn new() -> Self {
        let today = Local::now().date_naive();
        Self {
            today_pomodoros: 0,
            weekly_pomodoros: 0,
            total_pomodoros: 0,
            total_focus_minutes: 0,
            today_date: today,
            week_start_date: week_start(today),
        }
    }

    /// Reset stale daily/weekly windows relative to `today`
    fn roll_over(&mut self, today: NaiveDate) {
        if self.today_date != today {
            self.today_pomodoros = 0;
            self.today_date = today;
        }
        let week = week_start(today);
        if self.week_start_date != week {
            self.weekly_pomodoros = 0;
            self.week_start_date = week;
        }
    }

    fn record(&mut self, today: NaiveDate, duration_minutes: u32) {
        self.roll_over(today);
        self.today_pomodoros += 1;
        self.weekly_pomodoros += 1;
        self.total_pomodoros += 1;
        self.total_focus_minutes += duration_minutes;
    }
}

impl Default for LocalStats {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsSink for LocalStats {
    fn interval_completed(&mut self, duration_minutes: u32) {
        self.record(Local::now().date_naive(), duration_minutes);
    }
}

/// Monday of the week containing `date`
fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}
