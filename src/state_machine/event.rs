//! Events that can occur in a chat session

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Free text or a clicked suggested reply; both are handled the same way
    UserMessage { text: String },

    /// Discard everything and start over from the greeting
    Restart,
}

impl Event {
    pub fn user_message(text: impl Into<String>) -> Self {
        Event::UserMessage { text: text.into() }
    }
}
