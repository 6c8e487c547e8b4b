//! Effects produced by state transitions

use super::state::Message;
use crate::catalog;

/// Effects to be applied to the session after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a message to the session log
    AppendMessage(Message),

    /// Clear the session log; always followed by the greeting
    ResetLog,
}

impl Effect {
    pub fn append(message: Message) -> Self {
        Effect::AppendMessage(message)
    }

    pub fn greeting() -> Self {
        Effect::AppendMessage(catalog::greeting())
    }

    /// The message this effect adds to the log, if any
    pub fn message(&self) -> Option<&Message> {
        match self {
            Effect::AppendMessage(message) => Some(message),
            Effect::ResetLog => None,
        }
    }
}
