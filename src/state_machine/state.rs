//! Conversation state types

use serde::{Deserialize, Serialize};

/// Step value once the learner has finished onboarding. Exploration turns
/// never advance it further.
pub const MAX_STEP: u32 = 2;

/// Where a visitor is in the onboarding flow.
///
/// Progress is carried by the variant itself, so an empty answer can never be
/// mistaken for a missing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatState {
    /// Fresh session, waiting for the first topic
    #[default]
    AwaitingTopic,

    /// Topic chosen, waiting for the learner's level
    AwaitingLevel { topic: String },

    /// Level chosen, waiting for the preferred learning style
    AwaitingStyle { topic: String, level: String },

    /// Onboarding complete; every further turn is keyword-classified
    Exploring {
        topic: String,
        level: String,
        style: String,
    },
}

impl ChatState {
    pub fn topic(&self) -> Option<&str> {
        match self {
            ChatState::AwaitingTopic => None,
            ChatState::AwaitingLevel { topic }
            | ChatState::AwaitingStyle { topic, .. }
            | ChatState::Exploring { topic, .. } => Some(topic),
        }
    }

    pub fn level(&self) -> Option<&str> {
        match self {
            ChatState::AwaitingStyle { level, .. } | ChatState::Exploring { level, .. } => {
                Some(level)
            }
            _ => None,
        }
    }

    pub fn style(&self) -> Option<&str> {
        match self {
            ChatState::Exploring { style, .. } => Some(style),
            _ => None,
        }
    }

    /// Onboarding counter: 0 until a level is known, 1 once it is, and
    /// [`MAX_STEP`] from the moment the style is set.
    pub fn step(&self) -> u32 {
        match self {
            ChatState::AwaitingTopic | ChatState::AwaitingLevel { .. } => 0,
            ChatState::AwaitingStyle { .. } => 1,
            ChatState::Exploring { .. } => MAX_STEP,
        }
    }

    /// Short machine name, used in logs and the SSE stream
    pub fn name(&self) -> &'static str {
        match self {
            ChatState::AwaitingTopic => "awaiting_topic",
            ChatState::AwaitingLevel { .. } => "awaiting_level",
            ChatState::AwaitingStyle { .. } => "awaiting_style",
            ChatState::Exploring { .. } => "exploring",
        }
    }

    pub fn is_exploring(&self) -> bool {
        matches!(self, ChatState::Exploring { .. })
    }

    /// Flat view of the answers collected so far
    pub fn profile(&self) -> LearnerProfile {
        LearnerProfile {
            topic: self.topic().map(str::to_string),
            level: self.level().map(str::to_string),
            style: self.style().map(str::to_string),
        }
    }
}

/// The learner's answers, with unanswered questions left as `None`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LearnerProfile {
    pub topic: Option<String>,
    pub level: Option<String>,
    pub style: Option<String>,
}

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

/// One chat message as produced by the engine.
///
/// `content` is lightweight markdown (headings, ordered lists, fenced code).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub content: String,
    #[serde(default)]
    pub suggested_replies: Vec<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            content: content.into(),
            suggested_replies: vec![],
        }
    }

    pub fn assistant<I, S>(content: impl Into<String>, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sender: Sender::Assistant,
            content: content.into(),
            suggested_replies: replies.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_follow_variant() {
        let state = ChatState::AwaitingStyle {
            topic: "Chess".to_string(),
            level: "beginner".to_string(),
        };
        assert_eq!(state.topic(), Some("Chess"));
        assert_eq!(state.level(), Some("beginner"));
        assert_eq!(state.style(), None);
        assert_eq!(state.step(), 1);
    }

    #[test]
    fn test_default_is_awaiting_topic() {
        let state = ChatState::default();
        assert_eq!(state, ChatState::AwaitingTopic);
        assert_eq!(state.step(), 0);
        assert_eq!(state.profile(), LearnerProfile::default());
    }

    #[test]
    fn test_state_serializes_tagged() {
        let state = ChatState::AwaitingLevel {
            topic: "Rust".to_string(),
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["type"], "awaiting_level");
        assert_eq!(json["topic"], "Rust");
    }
}
