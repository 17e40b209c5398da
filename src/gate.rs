use crate::domain::TaskId;
use std::time::{Duration, Instant};

/// Window inside which a second stats emission is treated as a duplicate
pub const EMIT_COOLDOWN: Duration = Duration::from_secs(5);

/// Couples work-interval completion to task progress and stats emission.
///
/// When a task's recorded progress reaches its estimate, the gate holds the
/// task through one more break and one more work interval (the "final
/// interval") before the controller marks it completed. Independently, it
/// suppresses stats emissions that arrive within [`EMIT_COOLDOWN`] of the
/// last accepted one.
#[derive(Debug, Default)]
pub struct CompletionGate {
    awaiting_final: Option<TaskId>,
    in_final_interval: bool,
    last_emit: Option<Instant>,
}

impl CompletionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Task holding the deferred final interval, if any
    pub fn awaiting_final(&self) -> Option<TaskId> {
        self.awaiting_final
    }

    /// True while the one extra work interval is underway
    pub fn in_final_interval(&self) -> bool {
        self.in_final_interval
    }

    /// Record that a task's progress reached its estimate. Returns true if
    /// the task was newly flagged; a task already awaiting stays as-is.
    pub fn mark_estimate_reached(&mut self, id: TaskId) -> bool {
        if self.awaiting_final == Some(id) {
            return false;
        }
        self.awaiting_final = Some(id);
        self.in_final_interval = false;
        true
    }

    /// Called when a break ends: if a task is awaiting, flag the upcoming
    /// work interval as its final one and return the task id.
    pub fn begin_final_interval(&mut self) -> Option<TaskId> {
        let id = self.awaiting_final?;
        self.in_final_interval = true;
        Some(id)
    }

    /// Called when the final work interval expires: returns the awaited task
    /// and clears the pending state.
    pub fn finish_final_interval(&mut self) -> Option<TaskId> {
        self.in_final_interval = false;
        self.awaiting_final.take()
    }

    /// Drop any pending finalization (tracked task deleted, estimate raised,
    /// or the host abandoned the cycle)
    pub fn clear_pending(&mut self) {
        self.awaiting_final = None;
        self.in_final_interval = false;
    }

    /// Drop only the final-interval flag, keeping the awaited task (used when
    /// the selection moves to a different task mid-cycle)
    pub fn clear_final_flag(&mut self) {
        self.in_final_interval = false;
    }

    /// Cooldown check for a stats emission at `now`. An accepted emission
    /// records its instant; a suppressed one leaves the record unchanged so
    /// a burst of duplicates collapses to the first.
    pub fn try_emit(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_emit {
            if now.duration_since(last) < EMIT_COOLDOWN {
                return false;
            }
        }
        self.last_emit = Some(now);
        true
    }
}
