//! Bounded, newest-first record of interpreted commands.

use intent_parser::{Command, CommandAction};
use std::collections::VecDeque;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: u64,
    pub at: OffsetDateTime,
    pub action: CommandAction,
    pub object: String,
    pub status: String,
}

impl LogEntry {
    /// "HH:MM:SS" in UTC.
    pub fn clock_label(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}",
            self.at.hour(),
            self.at.minute(),
            self.at.second()
        )
    }
}

#[derive(Debug, Clone)]
pub struct ActionLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    next_id: u64,
}

impl ActionLog {
    /// A log keeping at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(256)),
            capacity,
            next_id: 0,
        }
    }

    pub fn record(&mut self, command: &Command) -> &LogEntry {
        if self.entries.len() == self.capacity {
            self.entries.pop_back();
        }
        self.next_id += 1;
        self.entries.push_front(LogEntry {
            id: self.next_id,
            at: OffsetDateTime::now_utc(),
            action: command.action,
            object: command.object.clone(),
            status: command.status.clone(),
        });
        &self.entries[0]
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intent_parser::parse_command;

    #[test]
    fn test_newest_first() {
        let mut log = ActionLog::new(10);
        log.record(&parse_command("add the mesh pants"));
        log.record(&parse_command("remove the track jacket"));
        let actions: Vec<_> = log.entries().map(|e| e.action).collect();
        assert_eq!(actions, vec![CommandAction::Delete, CommandAction::AddToCart]);
        assert_eq!(log.latest().map(|e| e.object.as_str()), Some("Velocity Track Jacket"));
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut log = ActionLog::new(2);
        for text in ["add the mesh pants", "add the track jacket", "add cargo shorts"] {
            log.record(&parse_command(text));
        }
        assert_eq!(log.len(), 2);
        let objects: Vec<_> = log.entries().map(|e| e.object.clone()).collect();
        assert_eq!(objects, vec!["Studio Cargo Shorts", "Velocity Track Jacket"]);
        assert_eq!(log.latest().map(|e| e.id), Some(3));
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut log = ActionLog::new(0);
        log.record(&parse_command("hello"));
        log.record(&parse_command("hello again"));
        assert_eq!(log.capacity(), 1);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_clock_label_format() {
        let mut log = ActionLog::new(1);
        let label = log.record(&parse_command("hi")).clock_label();
        assert_eq!(label.len(), 8);
        assert_eq!(label.as_bytes()[2], b':');
    }
}
