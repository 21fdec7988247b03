//! Blocking user notifications.
//!
//! An alert suspends input until it is dismissed, so the app raises one at
//! most per event and never from inside a loop.

/// Shows blocking messages to the user.
pub trait Notifier {
    /// Show `message` and return once it is dismissed.
    fn alert(&mut self, message: &str);
}

/// Notifier that writes alerts to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

/// Notifier that keeps every alert.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    messages: Vec<String>,
}

impl RecordingNotifier {
    /// Create a notifier with no alerts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Alerts shown so far.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_keeps_messages() {
        let mut notifier = RecordingNotifier::new();
        notifier.alert("first");
        notifier.alert("second");

        assert_eq!(notifier.messages(), ["first", "second"]);
    }
}
