//! Pomodoro cycle engine: a clock, a work/break sequencer, and a completion
//! gate that couples interval expiry to task progress and stats reporting.
//!
//! A host UI constructs a [`CycleController`], relays user commands
//! (start/pause/reset/skip/switch), and calls [`CycleController::tick`] once
//! a second; the controller does the rest. Collaborators the engine does not
//! own (notification delivery, durable stats) plug in behind the
//! [`Notifier`] and [`StatsSink`] traits.

pub mod clock;
pub mod controller;
pub mod domain;
pub mod gate;
pub mod notifications;
pub mod persistence;
pub mod stats;
pub mod ticker;

pub use clock::{Clock, ManualTimeSource, Remaining, SystemTimeSource, TimeSource};
pub use controller::{CycleController, CycleState};
pub use domain::{ConfigError, CycleConfig, Mode, Task, TaskId, TaskList};
pub use gate::CompletionGate;
pub use notifications::{DesktopNotifier, Notifier, NullNotifier};
pub use persistence::Snapshot;
pub use stats::{LocalStats, NullStats, StatsSink};
