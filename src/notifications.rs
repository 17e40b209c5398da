/// User-facing notification delivery.
///
/// The controller fires short messages at cycle boundaries (break starting,
/// final interval, task finished). Delivery is fire-and-forget: an
/// implementation must not panic and has no way to report failure back.

#[cfg(target_os = "macos")]
use std::process::Command;

pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Discards every notification
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&mut self, _message: &str) {}
}

/// Native desktop notifications.
/// Currently only implements macOS notifications; no-op elsewhere.
#[derive(Debug)]
pub struct DesktopNotifier {
    title: String,
}

impl DesktopNotifier {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new("Cadence")
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&mut self, message: &str) {
        #[cfg(target_os = "macos")]
        {
            let script = format!(
                r#"display notification "{}" with title "{}""#,
                message.replace('"', "\\\""),
                self.title.replace('"', "\\\"")
            );

            let _ = Command::new("osascript").arg("-e").arg(&script).output();
        }

        #[cfg(not(target_os = "macos"))]
        {
            // No-op on other platforms
            let _ = (&self.title, message);
        }
    }
}
