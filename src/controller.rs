use crate::clock::{Clock, Remaining, SystemTimeSource, TimeSource};
use crate::domain::{CycleConfig, Mode, TaskId, TaskList};
use crate::gate::CompletionGate;
use crate::notifications::Notifier;
use crate::persistence::Snapshot;
use crate::stats::StatsSink;
use std::sync::Arc;
use std::time::Duration;

/// Counters for the work/break alternation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleState {
    /// Interval kind currently loaded in the clock
    pub mode: Mode,
    /// Fully-completed work intervals since construction; never reset
    pub sessions: u32,
    /// Work intervals since the last long break, in [0, long_break_interval)
    pub since_long_break: u32,
}

/// The pomodoro cycle engine.
///
/// Owns the clock, the work/break sequencing counters, the completion gate,
/// and the task list, and reports accepted completions to a stats sink. A
/// host drives it by calling [`tick`](Self::tick) once a second and relaying
/// user commands; all state lives here rather than in module globals.
///
/// Every transition stops the clock before restarting it, so there is never
/// more than one countdown in flight.
pub struct CycleController {
    config: CycleConfig,
    state: CycleState,
    clock: Clock,
    gate: CompletionGate,
    tasks: TaskList,
    stats: Box<dyn StatsSink>,
    notifier: Box<dyn Notifier>,
    time: Arc<dyn TimeSource>,
}

impl CycleController {
    pub fn new(
        config: CycleConfig,
        stats: Box<dyn StatsSink>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self::with_time_source(config, stats, notifier, Arc::new(SystemTimeSource))
    }

    /// Construct with an injected time source (tests drive a manual one)
    pub fn with_time_source(
        config: CycleConfig,
        stats: Box<dyn StatsSink>,
        notifier: Box<dyn Notifier>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        let mut clock = Clock::new(time.clone());
        clock.reload(config.duration_for(Mode::Work));

        Self {
            config,
            state: CycleState {
                mode: Mode::Work,
                sessions: 0,
                since_long_break: 0,
            },
            clock,
            gate: CompletionGate::new(),
            tasks: TaskList::new(),
            stats,
            notifier,
            time,
        }
    }

    /// Rebuild a controller from a persisted snapshot. The restored timer is
    /// stopped; a mid-interval remaining resumes on the next `start`.
    pub fn restore(
        config: CycleConfig,
        snapshot: Snapshot,
        stats: Box<dyn StatsSink>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self::restore_with_time_source(config, snapshot, stats, notifier, Arc::new(SystemTimeSource))
    }

    pub fn restore_with_time_source(
        config: CycleConfig,
        snapshot: Snapshot,
        stats: Box<dyn StatsSink>,
        notifier: Box<dyn Notifier>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        let mut controller = Self::with_time_source(config, stats, notifier, time);
        controller.state.mode = snapshot.mode;
        controller.state.sessions = snapshot.sessions;
        controller.state.since_long_break = snapshot
            .pomodoros_since_long_break
            .min(config.long_break_interval() - 1);
        controller.tasks = TaskList::from_parts(
            snapshot.tasks,
            snapshot.next_task_id,
            snapshot.current_task_id,
        );

        let full = config.duration_for(snapshot.mode);
        let remaining = snapshot.remaining_total_seconds.min(full.as_secs());
        if remaining == 0 {
            controller.clock.reload(full);
        } else {
            controller.clock.reload(Duration::from_secs(remaining));
        }
        controller
    }

    /// Capture the persistable fields (timer position plus task list)
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.state.mode,
            remaining_total_seconds: self.clock.remaining().total,
            sessions: self.state.sessions,
            pomodoros_since_long_break: self.state.since_long_break,
            tasks: self.tasks.tasks().to_vec(),
            next_task_id: self.tasks.next_id(),
            current_task_id: self.tasks.current_id(),
            saved_at: Some(chrono::Local::now().to_rfc3339()),
        }
    }

    /// Start (or resume) the countdown for the current mode. Declines with
    /// `false` in work mode when no task is selected, so the host can prompt
    /// for one. Already running is a no-op.
    pub fn start(&mut self) -> bool {
        if self.clock.is_running() {
            return true;
        }
        if self.state.mode == Mode::Work && self.tasks.current().is_none() {
            return false;
        }
        self.clock.start(self.clock.remaining_duration());
        true
    }

    /// Stop the countdown, keeping the remaining time. No-op when paused.
    pub fn pause(&mut self) {
        self.clock.stop();
    }

    /// Stop and reload the current mode's full duration. Cycle counters are
    /// intentionally preserved across a manual reset.
    pub fn reset(&mut self) {
        let mode = self.state.mode;
        self.switch_mode(mode);
        self.notifier
            .notify(&format!("Timer reset to {} minutes", self.config.minutes_for(mode)));
    }

    /// Manually load a mode at its full duration, stopped. Advances no
    /// counters: a manual switch is not a completed interval.
    pub fn switch_mode(&mut self, mode: Mode) {
        self.clock.reload(self.config.duration_for(mode));
        self.state.mode = mode;
        if mode == Mode::LongBreak {
            // safeguard: the expiry path has usually reset this already
            self.state.since_long_break = 0;
        }
    }

    /// Force immediate expiry of the current interval, with the same
    /// task-progress and gate effects as a natural expiry.
    pub fn skip(&mut self) {
        self.clock.stop();
        self.handle_expiry();
    }

    /// Advance the clock; runs the sequencer when the interval expires.
    /// Call once a second while the host is alive.
    pub fn tick(&mut self) {
        if self.clock.tick() {
            self.handle_expiry();
        }
    }

    /// Add a task, select it, and start a fresh cadence toward the next long
    /// break. The lifetime session count is untouched.
    pub fn add_task(&mut self, name: &str, estimated_pomodoros: u32) -> TaskId {
        let id = self.tasks.add(name, estimated_pomodoros);
        self.state.since_long_break = 0;
        self.select_task(Some(id));
        id
    }

    /// Change the active task. Stops the clock and reloads a full work
    /// interval; any in-progress final interval no longer applies.
    pub fn select_task(&mut self, id: Option<TaskId>) -> bool {
        if !self.tasks.select(id) {
            return false;
        }
        self.gate.clear_final_flag();
        self.switch_mode(Mode::Work);
        true
    }

    /// Delete a task. Deleting the active task stops the clock and reloads a
    /// work interval; a pending finalization for it is dropped.
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let was_current = self.tasks.current_id() == Some(id);
        if !self.tasks.delete(id) {
            return false;
        }
        if self.gate.awaiting_final() == Some(id) {
            self.gate.clear_pending();
        }
        if was_current {
            self.gate.clear_final_flag();
            self.switch_mode(Mode::Work);
        }
        true
    }

    /// Manually toggle a task's done state. Completing the tracked task
    /// drops its pending finalization; completing the active one deselects it.
    pub fn toggle_task_completed(&mut self, id: TaskId) -> Option<bool> {
        let completed = self.tasks.toggle_completed(id)?;
        if completed && self.gate.awaiting_final() == Some(id) {
            self.gate.clear_pending();
        }
        Some(completed)
    }

    pub fn rename_task(&mut self, id: TaskId, name: &str) -> bool {
        self.tasks.rename(id, name)
    }

    /// Apply a new estimate and re-run gate qualification: progress already
    /// at a lowered estimate qualifies immediately, while raising the
    /// estimate above recorded progress clears any pending finalization.
    pub fn edit_task_estimate(&mut self, id: TaskId, estimated_pomodoros: u32) -> Option<u32> {
        let applied = self.tasks.set_estimate(id, estimated_pomodoros)?;
        let task = self.tasks.get(id)?;
        if task.completed {
            return Some(applied);
        }
        if task.estimate_reached() {
            let name = task.name.clone();
            if self.gate.mark_estimate_reached(id) {
                self.notifier.notify(&format!(
                    "One more session for \"{name}\" before completing. Take your break."
                ));
            }
        } else if self.gate.awaiting_final() == Some(id) {
            self.gate.clear_pending();
        }
        Some(applied)
    }

    /// Swap in a new (already validated) configuration and reload the
    /// current mode at its new full duration, stopped.
    pub fn set_config(&mut self, config: CycleConfig) {
        self.config = config;
        let mode = self.state.mode;
        self.switch_mode(mode);
    }

    pub fn config(&self) -> &CycleConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn remaining(&self) -> Remaining {
        self.clock.remaining()
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    /// Task holding a deferred final interval, if any
    pub fn awaiting_final_task(&self) -> Option<TaskId> {
        self.gate.awaiting_final()
    }

    /// True while the one extra work interval before task completion runs
    pub fn in_final_interval(&self) -> bool {
        self.gate.in_final_interval()
    }

    fn handle_expiry(&mut self) {
        match self.state.mode {
            Mode::Work => self.complete_work(),
            Mode::ShortBreak | Mode::LongBreak => self.complete_break(),
        }
    }

    /// Natural (or skipped) work expiry: gate first, then counters, task
    /// progress, stats, and the break transition.
    fn complete_work(&mut self) {
        if self.gate.in_final_interval() {
            self.finalize_tracked_task();
            return;
        }

        self.state.sessions += 1;
        self.state.since_long_break += 1;

        self.record_progress();

        let next = if self.state.since_long_break >= self.config.long_break_interval() {
            Mode::LongBreak
        } else {
            Mode::ShortBreak
        };
        self.switch_mode(next);
        self.clock.start(self.config.duration_for(next));
        self.notifier.notify("Take a break!");
    }

    /// Record progress on the active task and report the completion to the
    /// stats sink. A missing task makes both a no-op: the interval still
    /// counted, but there is nothing to credit.
    fn record_progress(&mut self) {
        let Some(task) = self.tasks.current_mut() else {
            return;
        };
        task.completed_pomodoros += 1;
        let id = task.id;
        let name = task.name.clone();
        let reached = task.estimate_reached();

        if reached && self.gate.mark_estimate_reached(id) {
            self.notifier.notify(&format!(
                "One more session for \"{name}\" before completing. Take your break."
            ));
        }

        if self.gate.try_emit(self.time.now()) {
            self.stats.interval_completed(self.config.work_minutes());
        }
    }

    /// Break expiry: back to work. A task awaiting its final interval flags
    /// the upcoming work interval; work auto-starts only with a task selected.
    fn complete_break(&mut self) {
        if let Some(id) = self.gate.awaiting_final() {
            match self.tasks.get(id) {
                Some(task) if !task.completed => {
                    let name = task.name.clone();
                    self.gate.begin_final_interval();
                    self.notifier
                        .notify(&format!("Final session for \"{name}\" starting."));
                }
                _ => self.gate.clear_pending(),
            }
        }

        self.switch_mode(Mode::Work);
        if self.tasks.current().is_some() {
            self.clock.start(self.config.duration_for(Mode::Work));
            self.notifier.notify("Get back to work!");
        } else {
            self.notifier.notify("Break over. Time to focus!");
        }
    }

    /// The final work interval expired: mark the awaited task done, deselect
    /// it, and wait for the user to pick the next one. No counters advance
    /// and no completion is reported for this interval.
    fn finalize_tracked_task(&mut self) {
        if let Some(id) = self.gate.finish_final_interval() {
            let mut finished = None;
            if let Some(task) = self.tasks.get_mut(id) {
                task.completed = true;
                finished = Some(task.name.clone());
            }
            if let Some(name) = finished {
                if self.tasks.current_id() == Some(id) {
                    self.tasks.select(None);
                }
                self.notifier.notify(&format!(
                    "Task \"{name}\" finished! Select a new task to continue."
                ));
            }
        }
        self.switch_mode(Mode::Work);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualTimeSource;
    use crate::notifications::Notifier;
    use crate::stats::StatsSink;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct RecordingStats(Rc<RefCell<Vec<u32>>>);

    impl StatsSink for RecordingStats {
        fn interval_completed(&mut self, duration_minutes: u32) {
            self.0.borrow_mut().push(duration_minutes);
        }
    }

    struct RecordingNotifier(Rc<RefCell<Vec<String>>>);

    impl Notifier for RecordingNotifier {
        fn notify(&mut self, message: &str) {
            self.0.borrow_mut().push(message.to_string());
        }
    }

    struct Harness {
        time: Arc<ManualTimeSource>,
        controller: CycleController,
        stats: Rc<RefCell<Vec<u32>>>,
        notes: Rc<RefCell<Vec<String>>>,
    }

    fn harness(config: CycleConfig) -> Harness {
        let time = Arc::new(ManualTimeSource::new());
        let stats = Rc::new(RefCell::new(Vec::new()));
        let notes = Rc::new(RefCell::new(Vec::new()));
        let controller = CycleController::with_time_source(
            config,
            Box::new(RecordingStats(stats.clone())),
            Box::new(RecordingNotifier(notes.clone())),
            time.clone(),
        );
        Harness {
            time,
            controller,
            stats,
            notes,
        }
    }

    impl Harness {
        /// Let the currently loaded interval run out naturally
        fn run_out(&mut self) {
            assert!(self.controller.is_running(), "interval should be running");
            self.time.advance_secs(self.controller.remaining().total);
            self.controller.tick();
        }

        fn emissions(&self) -> usize {
            self.stats.borrow().len()
        }
    }

    #[test]
    fn test_initial_state() {
        let h = harness(CycleConfig::default());
        assert_eq!(h.controller.mode(), Mode::Work);
        assert_eq!(h.controller.remaining().total, 25 * 60);
        assert!(!h.controller.is_running());
        assert_eq!(h.controller.state().sessions, 0);
    }

    #[test]
    fn test_start_requires_active_task_in_work_mode() {
        let mut h = harness(CycleConfig::default());
        assert!(!h.controller.start());

        h.controller.add_task("Write report", 8);
        assert!(h.controller.start());
        assert!(h.controller.is_running());

        // Starting again while running is a no-op
        assert!(h.controller.start());
    }

    #[test]
    fn test_break_can_start_without_task() {
        let mut h = harness(CycleConfig::default());
        h.controller.switch_mode(Mode::ShortBreak);
        assert!(h.controller.start());
    }

    #[test]
    fn test_long_break_cadence() {
        // Scenario A: breaks observed are Short, Short, Short, Long
        let mut h = harness(CycleConfig::default());
        h.controller.add_task("Deep work", 12);
        h.controller.start();

        let mut breaks = Vec::new();
        for _ in 0..4 {
            h.run_out(); // work expires, break auto-starts
            breaks.push(h.controller.mode());
            h.run_out(); // break expires, work auto-starts
            assert_eq!(h.controller.mode(), Mode::Work);
        }

        assert_eq!(
            breaks,
            vec![
                Mode::ShortBreak,
                Mode::ShortBreak,
                Mode::ShortBreak,
                Mode::LongBreak
            ]
        );
        assert_eq!(h.controller.state().sessions, 4);
        assert_eq!(h.controller.state().since_long_break, 0);
    }

    #[test]
    fn test_counter_resets_immediately_after_long_break_starts() {
        let mut h = harness(CycleConfig::new(25, 5, 15, 2).unwrap());
        h.controller.add_task("Deep work", 12);
        h.controller.start();

        h.run_out();
        assert_eq!(h.controller.state().since_long_break, 1);
        h.run_out();
        h.run_out();
        assert_eq!(h.controller.mode(), Mode::LongBreak);
        assert_eq!(h.controller.state().since_long_break, 0);
    }

    #[test]
    fn test_manual_switch_does_not_count() {
        let mut h = harness(CycleConfig::default());
        h.controller.add_task("Deep work", 8);
        h.controller.start();

        h.controller.switch_mode(Mode::ShortBreak);
        assert_eq!(h.controller.state().sessions, 0);
        assert_eq!(h.controller.state().since_long_break, 0);
        assert_eq!(h.controller.tasks().current().unwrap().completed_pomodoros, 0);
        assert!(!h.controller.is_running());
        assert_eq!(h.emissions(), 0);
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut h = harness(CycleConfig::default());

        // Pausing a never-started controller changes nothing
        h.controller.pause();
        h.controller.pause();
        assert_eq!(h.controller.mode(), Mode::Work);
        assert_eq!(h.controller.remaining().total, 25 * 60);

        h.controller.add_task("Task", 8);
        h.controller.start();
        h.time.advance_secs(60);
        h.controller.tick();
        h.controller.pause();
        h.controller.pause();
        assert_eq!(h.controller.remaining().total, 24 * 60);

        // Resume picks up where the pause left off
        h.controller.start();
        h.time.advance_secs(24 * 60);
        h.controller.tick();
        assert_eq!(h.controller.mode(), Mode::ShortBreak);
    }

    #[test]
    fn test_reset_preserves_cycle_counters() {
        let mut h = harness(CycleConfig::default());
        h.controller.add_task("Deep work", 8);
        h.controller.start();
        h.run_out();
        h.run_out();
        assert_eq!(h.controller.state().sessions, 1);

        h.time.advance_secs(100);
        h.controller.tick();
        h.controller.reset();

        assert!(!h.controller.is_running());
        assert_eq!(h.controller.remaining().total, 25 * 60);
        assert_eq!(h.controller.state().sessions, 1);
        assert_eq!(h.controller.state().since_long_break, 1);
    }

    #[test]
    fn test_switch_to_long_break_resets_counter_defensively() {
        let mut h = harness(CycleConfig::default());
        h.controller.add_task("Deep work", 8);
        h.controller.start();
        h.run_out();
        h.run_out();
        assert_eq!(h.controller.state().since_long_break, 1);

        h.controller.switch_mode(Mode::LongBreak);
        assert_eq!(h.controller.state().since_long_break, 0);
    }

    #[test]
    fn test_deferred_task_completion() {
        // Scenario B: estimate 2, third work interval finishes the task
        let mut h = harness(CycleConfig::default());
        let id = h.controller.add_task("Small task", 2);
        h.controller.start();

        h.run_out();
        assert_eq!(h.controller.tasks().get(id).unwrap().completed_pomodoros, 1);

        h.run_out(); // break over, second work interval starts
        h.run_out(); // estimate reached
        let task = h.controller.tasks().get(id).unwrap();
        assert_eq!(task.completed_pomodoros, 2);
        assert!(!task.completed);
        assert_eq!(h.controller.awaiting_final_task(), Some(id));
        assert!(h.controller.mode().is_break());

        h.run_out(); // break expires into the final interval
        assert!(h.controller.in_final_interval());
        assert_eq!(h.controller.mode(), Mode::Work);
        assert!(h.controller.is_running());

        h.run_out(); // final interval expires: finalize
        let task = h.controller.tasks().get(id).unwrap();
        assert!(task.completed);
        assert_eq!(task.completed_pomodoros, 2);
        assert_eq!(h.controller.tasks().current_id(), None);
        assert_eq!(h.controller.awaiting_final_task(), None);
        assert!(!h.controller.in_final_interval());
        assert_eq!(h.controller.mode(), Mode::Work);
        assert!(!h.controller.is_running());

        let notes = h.notes.borrow();
        assert!(notes.iter().any(|n| n.contains("One more session")));
        assert!(notes.iter().any(|n| n.contains("finished")));
    }

    #[test]
    fn test_final_interval_advances_no_counters() {
        let mut h = harness(CycleConfig::default());
        h.controller.add_task("Small task", 2);
        h.controller.start();

        h.run_out();
        h.run_out();
        h.run_out();
        let sessions_before = h.controller.state().sessions;
        let emissions_before = h.emissions();

        h.run_out(); // into final interval
        h.run_out(); // finalize

        assert_eq!(h.controller.state().sessions, sessions_before);
        assert_eq!(h.emissions(), emissions_before);
    }

    #[test]
    fn test_stats_cooldown_suppresses_rapid_completions() {
        // Scenario C: completions at t=0 and t=3 record once, t>=5 records again
        let mut h = harness(CycleConfig::default());
        h.controller.add_task("Deep work", 8);
        h.controller.start();

        h.controller.skip(); // work completes at t=0
        assert_eq!(h.emissions(), 1);

        h.time.advance_secs(3);
        h.controller.skip(); // break over
        h.controller.skip(); // work completes at t=3: suppressed
        assert_eq!(h.emissions(), 1);
        assert_eq!(h.controller.tasks().current().unwrap().completed_pomodoros, 2);

        h.time.advance_secs(3);
        h.controller.skip(); // break over
        h.controller.skip(); // work completes at t=6: accepted
        assert_eq!(h.emissions(), 2);
    }

    #[test]
    fn test_skip_break_runs_full_expiry_logic() {
        let mut h = harness(CycleConfig::default());
        h.controller.add_task("Deep work", 8);
        h.controller.start();
        h.run_out();
        assert_eq!(h.controller.mode(), Mode::ShortBreak);

        h.controller.skip();
        assert_eq!(h.controller.mode(), Mode::Work);
        assert!(h.controller.is_running());
    }

    #[test]
    fn test_skip_work_counts_as_completion() {
        let mut h = harness(CycleConfig::default());
        h.controller.add_task("Deep work", 8);
        h.controller.start();

        h.controller.skip();
        assert_eq!(h.controller.state().sessions, 1);
        assert_eq!(h.emissions(), 1);
        assert_eq!(h.controller.mode(), Mode::ShortBreak);
    }

    #[test]
    fn test_no_task_expiry_counts_but_does_not_emit() {
        let mut h = harness(CycleConfig::default());
        let id = h.controller.add_task("Task", 8);
        h.controller.start();

        // Complete the task by hand mid-interval: it is deselected but the
        // countdown keeps going
        h.controller.toggle_task_completed(id);
        assert!(h.controller.is_running());
        assert_eq!(h.controller.tasks().current_id(), None);

        h.run_out();
        assert_eq!(h.controller.state().sessions, 1);
        assert_eq!(h.emissions(), 0);
        assert_eq!(h.controller.tasks().get(id).unwrap().completed_pomodoros, 0);
    }

    #[test]
    fn test_break_does_not_auto_start_work_without_task() {
        let mut h = harness(CycleConfig::default());
        let id = h.controller.add_task("Task", 8);
        h.controller.start();
        h.run_out();
        assert!(h.controller.mode().is_break());

        h.controller.toggle_task_completed(id);
        h.run_out(); // break over, nothing selected

        assert_eq!(h.controller.mode(), Mode::Work);
        assert!(!h.controller.is_running());
        assert!(h
            .notes
            .borrow()
            .iter()
            .any(|n| n.contains("Break over")));
    }

    #[test]
    fn test_deleting_tracked_task_clears_pending_finalization() {
        let mut h = harness(CycleConfig::default());
        let id = h.controller.add_task("Small task", 2);
        h.controller.start();
        h.run_out();
        h.run_out();
        h.run_out();
        assert_eq!(h.controller.awaiting_final_task(), Some(id));

        h.controller.delete_task(id);
        assert_eq!(h.controller.awaiting_final_task(), None);
        assert!(!h.controller.in_final_interval());
        assert_eq!(h.controller.mode(), Mode::Work);
        assert!(!h.controller.is_running());
    }

    #[test]
    fn test_manually_completing_tracked_task_skips_finalization() {
        let mut h = harness(CycleConfig::default());
        let id = h.controller.add_task("Small task", 2);
        h.controller.start();
        h.run_out();
        h.run_out();
        h.run_out();
        assert!(h.controller.mode().is_break());

        h.controller.toggle_task_completed(id);
        assert_eq!(h.controller.awaiting_final_task(), None);

        h.run_out(); // break expires: no final interval, no auto-start
        assert!(!h.controller.in_final_interval());
        assert!(!h.controller.is_running());
    }

    #[test]
    fn test_lowering_estimate_qualifies_immediately() {
        let mut h = harness(CycleConfig::default());
        let id = h.controller.add_task("Task", 4);
        h.controller.start();
        h.run_out();
        h.run_out();
        h.run_out();
        assert_eq!(h.controller.tasks().get(id).unwrap().completed_pomodoros, 2);
        assert_eq!(h.controller.awaiting_final_task(), None);

        h.controller.edit_task_estimate(id, 2);
        assert_eq!(h.controller.awaiting_final_task(), Some(id));
        assert!(h
            .notes
            .borrow()
            .iter()
            .any(|n| n.contains("One more session")));
    }

    #[test]
    fn test_raising_estimate_clears_pending_finalization() {
        let mut h = harness(CycleConfig::default());
        let id = h.controller.add_task("Task", 2);
        h.controller.start();
        h.run_out();
        h.run_out();
        h.run_out();
        assert_eq!(h.controller.awaiting_final_task(), Some(id));

        h.controller.edit_task_estimate(id, 4);
        assert_eq!(h.controller.awaiting_final_task(), None);

        // The task must re-qualify through further work intervals
        h.run_out(); // break expires, ordinary work resumes
        assert!(!h.controller.in_final_interval());
        h.run_out();
        assert_eq!(h.controller.tasks().get(id).unwrap().completed_pomodoros, 3);
        assert!(!h.controller.tasks().get(id).unwrap().completed);
    }

    #[test]
    fn test_add_task_resets_cadence_but_not_sessions() {
        let mut h = harness(CycleConfig::default());
        h.controller.add_task("First", 8);
        h.controller.start();
        h.run_out();
        h.run_out();
        assert_eq!(h.controller.state().since_long_break, 1);
        assert_eq!(h.controller.state().sessions, 1);

        h.controller.add_task("Second", 8);
        assert_eq!(h.controller.state().since_long_break, 0);
        assert_eq!(h.controller.state().sessions, 1);
        assert_eq!(h.controller.tasks().current().unwrap().name, "Second");
        assert!(!h.controller.is_running());
        assert_eq!(h.controller.mode(), Mode::Work);
    }

    #[test]
    fn test_set_config_reloads_current_mode() {
        let mut h = harness(CycleConfig::default());
        h.controller.add_task("Task", 8);
        h.controller.start();
        h.time.advance_secs(60);
        h.controller.tick();

        h.controller.set_config(CycleConfig::new(50, 10, 30, 4).unwrap());
        assert!(!h.controller.is_running());
        assert_eq!(h.controller.remaining().total, 50 * 60);
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let mut h = harness(CycleConfig::default());
        let id = h.controller.add_task("Task", 8);
        h.controller.start();
        h.run_out();
        h.run_out();
        h.time.advance_secs(5 * 60);
        h.controller.tick();
        h.controller.pause();

        let snapshot = h.controller.snapshot();
        assert_eq!(snapshot.sessions, 1);
        assert_eq!(snapshot.remaining_total_seconds, 20 * 60);

        let restored = CycleController::restore(
            CycleConfig::default(),
            snapshot,
            Box::new(crate::stats::NullStats),
            Box::new(crate::notifications::NullNotifier),
        );
        assert_eq!(restored.mode(), Mode::Work);
        assert_eq!(restored.state().sessions, 1);
        assert_eq!(restored.state().since_long_break, 1);
        assert_eq!(restored.remaining().total, 20 * 60);
        assert!(!restored.is_running());
        assert_eq!(restored.tasks().current_id(), Some(id));
        assert_eq!(restored.tasks().len(), 1);
    }
}
