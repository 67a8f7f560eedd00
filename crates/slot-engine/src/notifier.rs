//! Confirmation delivery for a chosen slot.
//!
//! The matcher never calls a notifier; the presentation layer resolves the
//! chosen slot and hands it over. Outcomes are a plain `bool`: no retries, no
//! failure causes. Checking that the recipient is a usable address is the
//! caller's job.

use std::sync::Mutex;

use chrono::SecondsFormat;
use tracing::info;

use crate::config::SchedulerConfig;
use crate::slot::Slot;

/// Delivers a confirmation for `slot` to `recipient`.
pub trait Notifier: Send + Sync {
    /// Returns `true` when delivery succeeded.
    fn notify(&self, recipient: &str, slot: &Slot) -> bool;
}

/// A composed confirmation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl Confirmation {
    pub fn new(sender: &str, recipient: &str, slot: &Slot) -> Self {
        let subject = format!("Interview confirmed: {}", slot);
        let body = format!(
            "Your interview is scheduled for {}.\n\
             In UTC: {}.\n\
             Please reply to {} if you need to reschedule.",
            slot,
            slot.utc().to_rfc3339_opts(SecondsFormat::Secs, true),
            sender,
        );
        Self {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            subject,
            body,
        }
    }
}

/// Writes the confirmation to the log instead of a mail server and reports
/// success.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    sender: String,
}

impl LogNotifier {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            sender: config.sender.clone(),
        }
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, recipient: &str, slot: &Slot) -> bool {
        let message = Confirmation::new(&self.sender, recipient, slot);
        info!(
            from = %message.sender,
            to = %message.recipient,
            subject = %message.subject,
            "confirmation dispatched"
        );
        true
    }
}

/// Keeps every confirmation in memory. Useful in tests and dry runs.
#[derive(Debug)]
pub struct RecordingNotifier {
    sender: String,
    succeed: bool,
    sent: Mutex<Vec<Confirmation>>,
}

impl RecordingNotifier {
    pub fn new(sender: &str) -> Self {
        Self {
            sender: sender.to_string(),
            succeed: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// A notifier whose deliveries all fail. Attempts are still recorded.
    pub fn failing(sender: &str) -> Self {
        Self {
            succeed: false,
            ..Self::new(sender)
        }
    }

    /// Every confirmation attempted so far, oldest first.
    pub fn sent(&self) -> Vec<Confirmation> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, recipient: &str, slot: &Slot) -> bool {
        let message = Confirmation::new(&self.sender, recipient, slot);
        match self.sent.lock() {
            Ok(mut sent) => sent.push(message),
            Err(poisoned) => poisoned.into_inner().push(message),
        }
        self.succeed
    }
}
