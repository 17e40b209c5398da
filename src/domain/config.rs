use super::enums::Mode;
use std::time::Duration;
use thiserror::Error;

/// Bounds for the work interval duration, in minutes
pub const WORK_MINUTES_RANGE: (u32, u32) = (5, 60);
/// Bounds for the short break duration, in minutes
pub const SHORT_BREAK_MINUTES_RANGE: (u32, u32) = (5, 30);
/// Bounds for the long break duration, in minutes
pub const LONG_BREAK_MINUTES_RANGE: (u32, u32) = (5, 60);

/// Validation failure for a cycle configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be between {min} and {max} minutes, got {got}")]
    DurationOutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
        got: u32,
    },
    #[error("long break interval must be at least 1, got 0")]
    ZeroInterval,
}

/// Validated interval durations and long-break cadence.
///
/// Immutable once handed to the controller; durations that fail the bounds
/// never reach the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleConfig {
    work_minutes: u32,
    short_break_minutes: u32,
    long_break_minutes: u32,
    long_break_interval: u32,
}

impl CycleConfig {
    pub fn new(
        work_minutes: u32,
        short_break_minutes: u32,
        long_break_minutes: u32,
        long_break_interval: u32,
    ) -> Result<Self, ConfigError> {
        check_range("work duration", work_minutes, WORK_MINUTES_RANGE)?;
        check_range(
            "short break duration",
            short_break_minutes,
            SHORT_BREAK_MINUTES_RANGE,
        )?;
        check_range(
            "long break duration",
            long_break_minutes,
            LONG_BREAK_MINUTES_RANGE,
        )?;
        if long_break_interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        Ok(Self {
            work_minutes,
            short_break_minutes,
            long_break_minutes,
            long_break_interval,
        })
    }

    pub fn work_minutes(&self) -> u32 {
        self.work_minutes
    }

    pub fn short_break_minutes(&self) -> u32 {
        self.short_break_minutes
    }

    pub fn long_break_minutes(&self) -> u32 {
        self.long_break_minutes
    }

    /// Number of work intervals between long breaks
    pub fn long_break_interval(&self) -> u32 {
        self.long_break_interval
    }

    /// Configured minutes for a mode
    pub fn minutes_for(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Work => self.work_minutes,
            Mode::ShortBreak => self.short_break_minutes,
            Mode::LongBreak => self.long_break_minutes,
        }
    }

    /// Configured duration for a mode
    pub fn duration_for(&self, mode: Mode) -> Duration {
        Duration::from_secs(u64::from(self.minutes_for(mode)) * 60)
    }
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            long_break_interval: 4,
        }
    }
}

fn check_range(field: &'static str, got: u32, (min, max): (u32, u32)) -> Result<(), ConfigError> {
    if got < min || got > max {
        return Err(ConfigError::DurationOutOfRange {
            field,
            min,
            max,
            got,
        });
    }
    Ok(())
}
