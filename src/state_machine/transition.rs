//! Pure state transition function
//!
//! Given the same state and input, these functions always produce the same
//! output. They read only the static tables in [`crate::catalog`].

use super::{ChatState, Effect, Event, Message};
use crate::catalog;

/// Result of a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_state: ChatState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ChatState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// The assistant reply produced by this transition, if any
    #[allow(dead_code)] // Used by tests
    pub fn reply(&self) -> Option<&Message> {
        self.effects
            .iter()
            .filter_map(Effect::message)
            .rfind(|m| m.sender == super::Sender::Assistant)
    }
}

/// Event-level transition.
///
/// Blank input leaves the state untouched and produces no effects; the session
/// normally declines it before it gets here.
pub fn transition(state: &ChatState, event: Event) -> TransitionResult {
    match event {
        Event::UserMessage { text } => {
            if text.trim().is_empty() {
                return TransitionResult::new(state.clone());
            }
            let (new_state, reply) = respond(state, &text);
            TransitionResult::new(new_state)
                .with_effect(Effect::append(Message::user(text)))
                .with_effect(Effect::append(reply))
        }
        Event::Restart => TransitionResult::new(ChatState::AwaitingTopic)
            .with_effect(Effect::ResetLog)
            .with_effect(Effect::greeting()),
    }
}

/// Core turn: maps the current state and one user input to the next state and
/// the assistant's reply. Every input is accepted; unknown values fall through
/// to generic templates.
pub fn respond(state: &ChatState, input: &str) -> (ChatState, Message) {
    let input = input.trim();
    match state {
        ChatState::AwaitingTopic => {
            let topic = input.to_string();
            let reply = Message::assistant(
                format!(
                    "Great choice! Let's personalize your {topic} learning journey. What's your current level?"
                ),
                catalog::LEVEL_REPLIES.iter().copied(),
            );
            (ChatState::AwaitingLevel { topic }, reply)
        }

        ChatState::AwaitingLevel { topic } => {
            let reply = Message::assistant(
                "Perfect! To make your learning experience more effective, what's your preferred learning style?",
                catalog::STYLE_REPLIES.iter().copied(),
            );
            (
                ChatState::AwaitingStyle {
                    topic: topic.clone(),
                    level: input.to_lowercase(),
                },
                reply,
            )
        }

        ChatState::AwaitingStyle { topic, level } => {
            let plan = catalog::plan_for(topic);
            let reply = Message::assistant(plan.render(topic, level), plan.replies.iter().copied());
            (
                ChatState::Exploring {
                    topic: topic.clone(),
                    level: level.clone(),
                    style: input.to_lowercase(),
                },
                reply,
            )
        }

        ChatState::Exploring { topic, level, .. } => {
            (state.clone(), topic_response(topic, level, input))
        }
    }
}

/// What a free-form exploration turn is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Intent {
    Project,
    Exercise,
    Explore,
}

/// Checked in order; the first keyword found wins.
const INTENT_KEYWORDS: &[(&str, Intent)] = &[
    ("project", Intent::Project),
    ("exercise", Intent::Exercise),
];

pub(crate) fn classify(input: &str) -> Intent {
    let lowered = input.to_lowercase();
    INTENT_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(*keyword))
        .map_or(Intent::Explore, |(_, intent)| *intent)
}

fn topic_response(topic: &str, level: &str, input: &str) -> Message {
    match classify(input) {
        Intent::Project => Message::assistant(
            format!(
                "🚀 Here's a {level} project idea for {topic}:

### Project Overview
1. **Goal**: Build a real-world application
2. **Skills**: Problem-solving, design, implementation
3. **Timeline**: 2-3 weeks

Would you like to:"
            ),
            catalog::PROJECT_REPLIES.iter().copied(),
        ),
        Intent::Exercise => {
            let exercise = catalog::exercise_for(topic, level);
            Message::assistant(
                format!(
                    "💪 Let's practice {topic}!

### Exercise
Here's a {level} challenge for you to solve:
```
{exercise}
```

How would you like to proceed?"
                ),
                catalog::EXERCISE_REPLIES.iter().copied(),
            )
        }
        Intent::Explore => Message::assistant(
            format!(
                "Let's explore {topic} together!

### Available Resources
1. 📚 Interactive Lessons
2. 🎯 Practice Exercises
3. 🚀 Real Projects
4. 📊 Progress Tracking

What interests you most?"
            ),
            catalog::EXPLORE_REPLIES.iter().copied(),
        ),
    }
}
