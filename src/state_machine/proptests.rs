//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use crate::catalog;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Non-blank free text, including mixed case and the classifier keywords
fn arb_input() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z][a-zA-Z &()]{0,30}",
        Just("project".to_string()),
        Just("Try Exercise".to_string()),
        Just("PROGRAMMING".to_string()),
        Just("Mathematics".to_string()),
    ]
}

fn arb_blank() -> impl Strategy<Value = String> {
    "[ \t\n]{0,8}"
}

fn arb_state() -> impl Strategy<Value = ChatState> {
    let word = "[a-zA-Z ]{1,20}";
    prop_oneof![
        Just(ChatState::AwaitingTopic),
        word.prop_map(|topic| ChatState::AwaitingLevel { topic }),
        (word, word).prop_map(|(topic, level)| ChatState::AwaitingStyle { topic, level }),
        (word, word, word).prop_map(|(topic, level, style)| ChatState::Exploring {
            topic,
            level,
            style,
        }),
    ]
}

fn arb_exploring_state() -> impl Strategy<Value = ChatState> {
    ("[a-zA-Z ]{1,20}", "[a-z]{1,12}", "[a-z ]{1,20}").prop_map(|(topic, level, style)| {
        ChatState::Exploring {
            topic,
            level,
            style,
        }
    })
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        8 => arb_input().prop_map(Event::user_message),
        1 => arb_blank().prop_map(Event::user_message),
        1 => Just(Event::Restart),
    ]
}

/// Ordering of the flat fields: a later answer never exists without the
/// earlier ones.
fn is_ordered(state: &ChatState) -> bool {
    let p = state.profile();
    (p.style.is_none() || p.level.is_some()) && (p.level.is_none() || p.topic.is_some())
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: the first three turns fill topic, level, style in order
    #[test]
    fn prop_onboarding_fills_fields_in_order(
        a in arb_input(),
        b in arb_input(),
        c in arb_input(),
    ) {
        let (s1, _) = respond(&ChatState::AwaitingTopic, &a);
        prop_assert_eq!(s1.topic(), Some(a.trim()));
        prop_assert!(s1.level().is_none());

        let (s2, _) = respond(&s1, &b);
        let level = b.trim().to_lowercase();
        prop_assert_eq!(s2.level(), Some(level.as_str()));
        prop_assert!(s2.style().is_none());

        let (s3, _) = respond(&s2, &c);
        let style = c.trim().to_lowercase();
        prop_assert_eq!(s3.style(), Some(style.as_str()));
        prop_assert_eq!(s3.topic(), Some(a.trim()));
        prop_assert_eq!(s3.step(), MAX_STEP);
    }

    // Invariant 2: respond is deterministic
    #[test]
    fn prop_respond_is_deterministic(state in arb_state(), input in arb_input()) {
        prop_assert_eq!(respond(&state, &input), respond(&state, &input));
    }

    // Invariant 3: once exploring, the state never changes and no question is re-asked
    #[test]
    fn prop_exploring_is_saturated(
        state in arb_exploring_state(),
        inputs in proptest::collection::vec(arb_input(), 1..10),
    ) {
        let mut current = state.clone();
        for input in inputs {
            let (next, reply) = respond(&current, &input);
            prop_assert_eq!(&next, &state);
            prop_assert_eq!(next.step(), MAX_STEP);
            let reask = reply.suggested_replies == catalog::LEVEL_REPLIES
                || reply.suggested_replies == catalog::STYLE_REPLIES
                || reply.suggested_replies == catalog::TOPIC_REPLIES;
            prop_assert!(!reask, "re-asked onboarding question: {:?}", reply);
            current = next;
        }
    }

    // Invariant 4: step never decreases except through Restart
    #[test]
    fn prop_step_monotonic_without_restart(events in proptest::collection::vec(arb_event(), 0..20)) {
        let mut state = ChatState::AwaitingTopic;
        for event in events {
            let restart = event == Event::Restart;
            let result = transition(&state, event);
            if restart {
                prop_assert_eq!(&result.new_state, &ChatState::AwaitingTopic);
            } else {
                prop_assert!(result.new_state.step() >= state.step());
            }
            prop_assert!(is_ordered(&result.new_state));
            state = result.new_state;
        }
    }

    // Invariant 5: every accepted user message yields exactly one echo and one reply
    #[test]
    fn prop_user_message_effects(state in arb_state(), input in arb_input()) {
        let result = transition(&state, Event::user_message(input.clone()));
        prop_assert_eq!(result.effects.len(), 2);
        let first = result.effects[0].message().map(|m| m.sender);
        let second = result.effects[1].message().map(|m| m.sender);
        prop_assert_eq!(first, Some(Sender::User));
        prop_assert_eq!(second, Some(Sender::Assistant));
    }

    // Invariant 6: blank input is a no-op from any state
    #[test]
    fn prop_blank_input_is_noop(state in arb_state(), blank in arb_blank()) {
        let result = transition(&state, Event::user_message(blank));
        prop_assert_eq!(result.new_state, state);
        prop_assert!(result.effects.is_empty());
    }

    // Invariant 7: plan lookup does not depend on the case of the topic
    #[test]
    fn prop_plan_case_insensitive(
        topic in prop_oneof![Just("programming"), Just("mathematics"), Just("history")],
        upper in any::<bool>(),
        level in "[a-z]{1,10}",
    ) {
        let cased = if upper { topic.to_uppercase() } else { topic.to_string() };
        let (_, a) = respond(&ChatState::AwaitingStyle { topic: topic.to_string(), level: level.clone() }, "visual");
        let (_, b) = respond(&ChatState::AwaitingStyle { topic: cased, level }, "visual");
        prop_assert_eq!(&a.suggested_replies, &b.suggested_replies);
        // Known plans never echo the topic, so the whole message matches
        if topic != "history" {
            prop_assert_eq!(a.content, b.content);
        }
    }

    // Invariant 8: unknown topics never fail and keep the literal topic in the plan
    #[test]
    fn prop_unknown_topic_uses_generic_plan(topic in "[A-Z][a-z]{3,12} [A-Z][a-z]{3,12}") {
        let state = ChatState::AwaitingStyle { topic: topic.clone(), level: "beginner".to_string() };
        let (_, reply) = respond(&state, "discussion based");
        prop_assert!(reply.content.contains(&topic));
        prop_assert_eq!(reply.suggested_replies[0].as_str(), "Theoretical Overview");
    }
}
