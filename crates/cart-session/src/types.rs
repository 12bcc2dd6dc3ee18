use crate::{LineItem, LogEntry, PendingSlot};
use intent_parser::Command;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum number of action log entries kept
    pub log_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { log_capacity: 200 }
    }
}

/// Speech recognizer output. Only final results are interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    Interim(String),
    Final(String),
}

/// What one utterance produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub command: Command,
    /// Toast messages, in emission order
    pub toasts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Send the shopper to this hosted checkout page.
    Redirect(String),
    /// Checkout did not start; carries the toast to show.
    Failed(String),
}

/// Read-only view of a session after a processing step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub command: Option<Command>,
    pub cart: Vec<LineItem>,
    pub total_cents: u64,
    pub pending: Option<PendingSlot>,
    /// Newest first
    pub log: Vec<LogEntry>,
}
