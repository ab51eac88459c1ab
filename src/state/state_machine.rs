use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle of a game session.
///
/// Sessions only ever move forward: `Setup` -> `InProgress` -> `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    /// Course and roster are being assembled.
    Setup,
    /// Players are working through the course.
    InProgress,
    /// The last hole has been submitted; the leaderboard is final.
    Completed,
}

impl SessionStatus {
    /// Whether `to` is a legal single step from the current status.
    pub fn can_transition_to(self, to: SessionStatus) -> bool {
        matches!(
            (self, to),
            (SessionStatus::Setup, SessionStatus::InProgress)
                | (SessionStatus::InProgress, SessionStatus::Completed)
        )
    }

    /// Compute the status reached when moving towards `to`.
    ///
    /// Requesting the current status is accepted and leaves it unchanged so that a repeated
    /// completion request is harmless.
    pub fn transition(self, to: SessionStatus) -> Result<SessionStatus, InvalidTransition> {
        if self == to || self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(InvalidTransition { from: self, to })
        }
    }

    /// Whether the session still accepts hole progression.
    pub fn is_playing(self) -> bool {
        self == SessionStatus::InProgress
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionStatus::Setup => "setup",
            SessionStatus::InProgress => "in-progress",
            SessionStatus::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// Error returned when a status change would move a session backwards or skip a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid transition: session cannot move from {from} to {to}")]
pub struct InvalidTransition {
    /// Status the session was in.
    pub from: SessionStatus,
    /// Status that was requested.
    pub to: SessionStatus,
}
