//! Access-cycle state machine.
//!
//! # States
//!
//! - `WaitingForCard`: polling the reader for a card
//! - `Verifying`: fetching the user list and deciding
//! - `Actuating`: driving the door cycle (granted decisions only)
//! - `Indicating`: success/failure feedback pulse
//!
//! # Valid transitions
//!
//! - WaitingForCard → Verifying
//! - Verifying → Actuating (granted) | Indicating (denied, directory down)
//! - Actuating → Indicating
//! - Indicating → WaitingForCard
//!
//! The cycle repeats until the loop is cancelled.

use doorkeep_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One phase of the reader-mode access cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessState {
    /// Polling the reader for a card.
    WaitingForCard,

    /// Fetching the user list and deciding.
    Verifying,

    /// Driving the door motor cycle.
    Actuating,

    /// Success or failure feedback pulse.
    Indicating,
}

impl fmt::Display for AccessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccessState::WaitingForCard => "WaitingForCard",
            AccessState::Verifying => "Verifying",
            AccessState::Actuating => "Actuating",
            AccessState::Indicating => "Indicating",
        };
        write!(f, "{name}")
    }
}

impl AccessState {
    /// Check if transition to `target` is valid from this state.
    #[must_use]
    pub fn can_transition_to(&self, target: &AccessState) -> bool {
        matches!(
            (self, target),
            (AccessState::WaitingForCard, AccessState::Verifying)
                | (
                    AccessState::Verifying,
                    AccessState::Actuating | AccessState::Indicating
                )
                | (AccessState::Actuating, AccessState::Indicating)
                | (AccessState::Indicating, AccessState::WaitingForCard)
        )
    }
}

/// Transition-validated holder of the current access state.
#[derive(Debug)]
pub struct StateMachine {
    current: AccessState,
}

impl StateMachine {
    /// Create a machine in `WaitingForCard`.
    #[must_use]
    pub fn new() -> Self {
        StateMachine {
            current: AccessState::WaitingForCard,
        }
    }

    /// The current state.
    #[must_use]
    pub fn current(&self) -> AccessState {
        self.current
    }

    /// Transition to `next`, validating the edge.
    ///
    /// # Errors
    /// Returns `Error::InvalidStateTransition` if the edge is not part of
    /// the access cycle.
    pub fn transition_to(&mut self, next: AccessState) -> Result<()> {
        if !self.current.can_transition_to(&next) {
            return Err(Error::InvalidStateTransition {
                from: self.current.to_string(),
                to: next.to_string(),
            });
        }
        tracing::trace!(from = %self.current, to = %next, "access state transition");
        self.current = next;
        Ok(())
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
