//! Scripted conversation state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions: the
//! session feeds in an [`Event`], gets back the next [`ChatState`] plus the
//! [`Effect`]s to apply, and owns all I/O itself.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{ChatState, LearnerProfile, Message, Sender};
#[allow(unused_imports)] // Public API re-exports
pub use transition::{respond, transition, TransitionResult};
