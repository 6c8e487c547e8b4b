//! Append-only message log for one session

use crate::state_machine::Message;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A message as recorded in a session's log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggedMessage {
    pub sequence_id: u64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub message: Message,
}

/// Ordered message log. Messages are never edited or removed individually;
/// the whole log is cleared on restart.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<LoggedMessage>,
    next_sequence: u64,
}

impl Transcript {
    /// Append a message and return the recorded copy
    pub fn push(&mut self, message: Message) -> LoggedMessage {
        let logged = LoggedMessage {
            sequence_id: self.next_sequence,
            created_at: Utc::now(),
            message,
        };
        self.next_sequence += 1;
        self.messages.push(logged.clone());
        logged
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.next_sequence = 0;
    }

    pub fn messages(&self) -> &[LoggedMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_ids_increase_and_reset() {
        let mut log = Transcript::default();
        assert_eq!(log.push(Message::user("a")).sequence_id, 0);
        assert_eq!(log.push(Message::user("b")).sequence_id, 1);
        assert_eq!(log.len(), 2);

        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.push(Message::user("c")).sequence_id, 0);
        assert_eq!(log.messages()[0].message.content, "c");
    }

    #[test]
    fn test_logged_message_flattens() {
        let mut log = Transcript::default();
        let logged = log.push(Message::assistant("hi", ["One", "Two"]));
        let json = serde_json::to_value(&logged).unwrap();
        assert_eq!(json["sender"], "assistant");
        assert_eq!(json["content"], "hi");
        assert_eq!(json["suggested_replies"][1], "Two");
        assert_eq!(json["sequence_id"], 0);
    }
}
