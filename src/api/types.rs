//! API request and response types

use crate::session::{LoggedMessage, SessionSnapshot, TurnOutcome};
use serde::{Deserialize, Serialize};

/// Request to send a chat message (free text or a clicked suggested reply)
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Response with a session snapshot
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: SessionSnapshot,
}

/// How a chat submission was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatOutcome {
    Ignored,
    Replied,
    Abandoned,
}

/// Response for chat action
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub outcome: ChatOutcome,
    /// Messages appended by this turn, oldest first
    pub messages: Vec<LoggedMessage>,
}

impl From<TurnOutcome> for ChatResponse {
    fn from(outcome: TurnOutcome) -> Self {
        match outcome {
            TurnOutcome::Ignored => Self {
                outcome: ChatOutcome::Ignored,
                messages: vec![],
            },
            TurnOutcome::Replied { user, reply } => Self {
                outcome: ChatOutcome::Replied,
                messages: vec![user, reply],
            },
            TurnOutcome::Abandoned { user } => Self {
                outcome: ChatOutcome::Abandoned,
                messages: vec![user],
            },
        }
    }
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
