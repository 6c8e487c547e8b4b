//! Per-visitor chat sessions
//!
//! A [`Session`] owns one [`ChatState`] and one message log, applies the
//! effects produced by the state machine, and broadcasts every change to
//! stream subscribers. The typing delay lives here and only here: the engine
//! itself is synchronous.

mod manager;
mod transcript;

pub use manager::SessionManager;
pub use transcript::{LoggedMessage, Transcript};

use crate::state_machine::{transition, ChatState, Effect, Event, LearnerProfile};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::broadcast;

/// Errors surfaced to callers of the session layer
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),
    #[error("Session {0} is still answering the previous message")]
    Busy(String),
}

/// Events sent to stream subscribers
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Message { message: LoggedMessage },
    Typing { active: bool },
    Reset { snapshot: SessionSnapshot },
}

/// What happened to a submitted message
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// Blank input; nothing was recorded
    Ignored,
    /// The turn completed with an assistant reply
    Replied {
        user: LoggedMessage,
        reply: LoggedMessage,
    },
    /// The session was restarted while the reply was pending
    Abandoned { user: LoggedMessage },
}

/// Point-in-time view of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: String,
    pub state: ChatState,
    pub step: u32,
    pub profile: LearnerProfile,
    pub messages: Vec<LoggedMessage>,
    pub typing: bool,
    pub created_at: DateTime<Utc>,
}

struct SessionInner {
    state: ChatState,
    transcript: Transcript,
    typing: bool,
    /// Bumped on every restart so a pending turn can tell it was superseded
    generation: u64,
    last_active: Instant,
}

/// One visitor's conversation
pub struct Session {
    id: String,
    created_at: DateTime<Utc>,
    typing_delay: Duration,
    inner: Mutex<SessionInner>,
    turn_lock: tokio::sync::Mutex<()>,
    broadcast_tx: broadcast::Sender<SessionEvent>,
}

impl Session {
    pub fn new(id: impl Into<String>, typing_delay: Duration) -> Self {
        let (broadcast_tx, _) = broadcast::channel(64);
        let mut inner = SessionInner {
            state: ChatState::AwaitingTopic,
            transcript: Transcript::default(),
            typing: false,
            generation: 0,
            last_active: Instant::now(),
        };
        let opening = transition(&inner.state, Event::Restart);
        inner.state = opening.new_state;
        apply_effects(&mut inner.transcript, opening.effects);

        Self {
            id: id.into(),
            created_at: Utc::now(),
            typing_delay,
            inner: Mutex::new(inner),
            turn_lock: tokio::sync::Mutex::new(()),
            broadcast_tx,
        }
    }

    #[allow(dead_code)] // Accessor for callers holding an Arc<Session>
    pub fn id(&self) -> &str {
        &self.id
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.broadcast_tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.broadcast_tx.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.lock();
        self.snapshot_of(&inner)
    }

    fn snapshot_of(&self, inner: &SessionInner) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            state: inner.state.clone(),
            step: inner.state.step(),
            profile: inner.state.profile(),
            messages: inner.transcript.messages().to_vec(),
            typing: inner.typing,
            created_at: self.created_at,
        }
    }

    #[allow(dead_code)] // State query utility
    pub fn state(&self) -> ChatState {
        self.lock().state.clone()
    }

    pub fn touch(&self) {
        self.lock().last_active = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.lock().last_active.elapsed()
    }

    /// Run one turn.
    ///
    /// The reply is computed up front but only committed after the typing
    /// delay, and only if no restart happened meanwhile. Dropping the returned
    /// future during the delay leaves the state untouched.
    pub async fn submit(&self, text: &str) -> Result<TurnOutcome, SessionError> {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!(session_id = %self.id, "Ignoring blank input");
            return Ok(TurnOutcome::Ignored);
        }

        let Ok(_turn) = self.turn_lock.try_lock() else {
            return Err(SessionError::Busy(self.id.clone()));
        };

        let (generation, result, user) = {
            let mut inner = self.lock();
            inner.last_active = Instant::now();
            let result = transition(&inner.state, Event::user_message(text));
            let mut effects = result.effects.into_iter();
            let echo: Vec<Effect> = effects.next().into_iter().collect();
            let user = apply_effects(&mut inner.transcript, echo).pop();
            // Only a logged echo has a reply pending behind it
            inner.typing = user.is_some();
            (inner.generation, (result.new_state, effects.collect::<Vec<_>>()), user)
        };
        let Some(user) = user else {
            // transition() only skips the echo for blank input, handled above
            return Ok(TurnOutcome::Ignored);
        };

        self.notify(SessionEvent::Message {
            message: user.clone(),
        });
        self.notify(SessionEvent::Typing { active: true });
        let _typing = TypingGuard { session: self };

        if !self.typing_delay.is_zero() {
            tokio::time::sleep(self.typing_delay).await;
        }

        let (new_state, effects) = result;
        let mut appended = {
            let mut inner = self.lock();
            if inner.generation != generation {
                tracing::info!(session_id = %self.id, "Turn abandoned by restart");
                return Ok(TurnOutcome::Abandoned { user });
            }
            tracing::debug!(
                session_id = %self.id,
                from = inner.state.name(),
                to = new_state.name(),
                messages = inner.transcript.len(),
                "State transition"
            );
            if new_state.is_exploring() && !inner.state.is_exploring() {
                let profile = new_state.profile();
                tracing::info!(
                    session_id = %self.id,
                    topic = profile.topic.as_deref().unwrap_or_default(),
                    level = profile.level.as_deref().unwrap_or_default(),
                    style = profile.style.as_deref().unwrap_or_default(),
                    "Onboarding complete"
                );
            }
            inner.state = new_state;
            inner.typing = false;
            inner.last_active = Instant::now();
            apply_effects(&mut inner.transcript, effects)
        };

        for message in &appended {
            self.notify(SessionEvent::Message {
                message: message.clone(),
            });
        }
        self.notify(SessionEvent::Typing { active: false });

        match appended.pop() {
            Some(reply) => Ok(TurnOutcome::Replied { user, reply }),
            None => Ok(TurnOutcome::Abandoned { user }),
        }
    }

    /// Discard state and log and start again from the greeting. Any turn still
    /// waiting out its typing delay is dropped.
    pub fn restart(&self) -> SessionSnapshot {
        let snapshot = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.typing = false;
            inner.last_active = Instant::now();
            let result = transition(&inner.state, Event::Restart);
            inner.state = result.new_state;
            apply_effects(&mut inner.transcript, result.effects);
            self.snapshot_of(&inner)
        };
        tracing::info!(session_id = %self.id, "Session restarted");
        self.notify(SessionEvent::Reset {
            snapshot: snapshot.clone(),
        });
        snapshot
    }
}

/// Clears the typing flag if a turn ends without committing, e.g. when the
/// request future is dropped mid-delay.
struct TypingGuard<'a> {
    session: &'a Session,
}

impl Drop for TypingGuard<'_> {
    fn drop(&mut self) {
        let was_typing = {
            let mut inner = self.session.lock();
            std::mem::replace(&mut inner.typing, false)
        };
        if was_typing {
            self.session.notify(SessionEvent::Typing { active: false });
        }
    }
}

/// Apply effects to a log, returning the messages that were appended
fn apply_effects(
    transcript: &mut Transcript,
    effects: impl IntoIterator<Item = Effect>,
) -> Vec<LoggedMessage> {
    let mut appended = Vec::new();
    for effect in effects {
        match effect {
            Effect::AppendMessage(message) => appended.push(transcript.push(message)),
            Effect::ResetLog => {
                transcript.clear();
                appended.clear();
            }
        }
    }
    appended
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::state_machine::Sender;
    use std::sync::Arc;

    fn session() -> Session {
        Session::new("test-session", Duration::ZERO)
    }

    #[test]
    fn test_new_session_has_greeting_only() {
        let snapshot = session().snapshot();
        assert_eq!(snapshot.state, ChatState::AwaitingTopic);
        assert_eq!(snapshot.step, 0);
        assert_eq!(snapshot.messages.len(), 1);
        assert_eq!(snapshot.messages[0].message, catalog::greeting());
        assert!(!snapshot.typing);
    }

    #[tokio::test]
    async fn test_mathematics_exercise_scenario() {
        let session = session();
        for input in ["Mathematics", "Beginner", "Visual (diagrams & videos)", "exercise"] {
            let outcome = session.submit(input).await.unwrap();
            assert!(matches!(outcome, TurnOutcome::Replied { .. }));
        }

        let snapshot = session.snapshot();
        let users = snapshot
            .messages
            .iter()
            .filter(|m| m.message.sender == Sender::User)
            .count();
        let assistants = snapshot
            .messages
            .iter()
            .filter(|m| m.message.sender == Sender::Assistant)
            .count();
        assert_eq!(users, 4);
        // Four replies plus the greeting
        assert_eq!(assistants, 5);

        let last = snapshot.messages.last().unwrap();
        assert!(last.message.content.contains("```\nSolve: 2x + 5 = 13\n```"));
        assert_eq!(snapshot.profile.topic.as_deref(), Some("Mathematics"));
        assert_eq!(snapshot.profile.level.as_deref(), Some("beginner"));
        assert_eq!(
            snapshot.profile.style.as_deref(),
            Some("visual (diagrams & videos)")
        );
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let session = session();
        let outcome = session.submit("   ").await.unwrap();
        assert!(matches!(outcome, TurnOutcome::Ignored));
        assert_eq!(session.snapshot().messages.len(), 1);
        assert_eq!(session.state(), ChatState::AwaitingTopic);
    }

    #[tokio::test]
    async fn test_restart_resets_everything() {
        let session = session();
        for input in ["Programming", "Advanced", "Reading", "project", "more"] {
            session.submit(input).await.unwrap();
        }
        assert!(session.state().is_exploring());

        let snapshot = session.restart();
        assert_eq!(snapshot.state, ChatState::AwaitingTopic);
        assert_eq!(snapshot.step, 0);
        assert_eq!(snapshot.messages.len(), 1);
        assert_eq!(snapshot.messages[0].sequence_id, 0);
        assert_eq!(snapshot.messages[0].message, catalog::greeting());
    }

    #[tokio::test]
    async fn test_restart_during_typing_abandons_turn() {
        let session = Arc::new(Session::new("slow", Duration::from_millis(200)));
        let pending = {
            let session = session.clone();
            tokio::spawn(async move { session.submit("Science").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(session.snapshot().typing);
        session.restart();

        let outcome = pending.await.unwrap().unwrap();
        assert!(matches!(outcome, TurnOutcome::Abandoned { .. }));
        let snapshot = session.snapshot();
        assert_eq!(snapshot.messages.len(), 1);
        assert_eq!(snapshot.state, ChatState::AwaitingTopic);
        assert!(!snapshot.typing);
    }

    #[tokio::test]
    async fn test_concurrent_turn_is_busy() {
        let session = Arc::new(Session::new("busy", Duration::from_millis(200)));
        let pending = {
            let session = session.clone();
            tokio::spawn(async move { session.submit("Science").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let second = session.submit("Programming").await;
        assert!(matches!(second, Err(SessionError::Busy(_))));

        let first = pending.await.unwrap().unwrap();
        assert!(matches!(first, TurnOutcome::Replied { .. }));
        assert_eq!(session.state().topic(), Some("Science"));
    }

    #[tokio::test]
    async fn test_typing_flag_tracks_pending_reply() {
        let session = Arc::new(Session::new("typing", Duration::from_millis(200)));
        session.submit("  ").await.unwrap();
        assert!(!session.snapshot().typing);

        let pending = {
            let session = session.clone();
            tokio::spawn(async move { session.submit("Science").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(session.snapshot().typing);

        assert!(session.submit("Beginner").await.is_err());
        assert!(session.snapshot().typing);

        pending.await.unwrap().unwrap();
        assert!(!session.snapshot().typing);
    }

    #[tokio::test]
    async fn test_dropped_turn_does_not_advance_state() {
        let session = Session::new("dropped", Duration::from_millis(200));
        let result =
            tokio::time::timeout(Duration::from_millis(50), session.submit("Science")).await;
        assert!(result.is_err());

        let snapshot = session.snapshot();
        assert_eq!(snapshot.state, ChatState::AwaitingTopic);
        assert!(!snapshot.typing);
        // The user message was shown before the delay; no reply followed
        assert_eq!(snapshot.messages.len(), 2);
        assert_eq!(snapshot.messages[1].message.sender, Sender::User);
    }

    #[tokio::test]
    async fn test_events_are_broadcast() {
        let session = session();
        let mut rx = session.subscribe();
        session.submit("Programming").await.unwrap();

        let mut kinds = Vec::new();
        while let Ok(event) = rx.try_recv() {
            kinds.push(match event {
                SessionEvent::Message { message } => format!("{:?}", message.message.sender),
                SessionEvent::Typing { active } => format!("typing:{active}"),
                SessionEvent::Reset { .. } => "reset".to_string(),
            });
        }
        assert_eq!(kinds, vec!["User", "typing:true", "Assistant", "typing:false"]);
    }
}
