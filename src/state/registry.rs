use std::time::SystemTime;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::warn;

use crate::state::{
    game::{Bar, GameSession, Player, PlayerId, Score, ScoreInput, SessionId},
    leaderboard::{self, LeaderboardEntry},
    state_machine::{InvalidTransition, SessionStatus},
};

/// Failures raised by the session core. Every failing call leaves the registry untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// Session creation was called with an empty name, course or roster, or exceeded a limit.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// No session with this identifier exists.
    #[error("session `{0}` not found")]
    SessionNotFound(SessionId),
    /// Status change would move the session backwards.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
}

/// Upper bounds applied when a course and roster are assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    /// Maximum number of holes in a course.
    pub max_course_length: usize,
    /// Maximum number of players in a roster.
    pub max_players: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_course_length: 18,
            max_players: 8,
        }
    }
}

/// Collection of sessions plus the pointer to the one the active screens follow.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: IndexMap<SessionId, GameSession>,
    current: Option<SessionId>,
    limits: SessionLimits,
}

impl SessionRegistry {
    /// Create an empty registry enforcing the given limits.
    pub fn new(limits: SessionLimits) -> Self {
        Self {
            sessions: IndexMap::new(),
            current: None,
            limits,
        }
    }

    /// Rebuild a registry from previously persisted sessions.
    ///
    /// A current pointer referring to a session that is not part of `sessions` is dropped.
    pub fn restore(
        limits: SessionLimits,
        sessions: impl IntoIterator<Item = GameSession>,
        current: Option<SessionId>,
    ) -> Self {
        let sessions: IndexMap<_, _> = sessions
            .into_iter()
            .map(|session| (session.id, session))
            .collect();
        let current = current.filter(|id| sessions.contains_key(id));
        Self {
            sessions,
            current,
            limits,
        }
    }

    /// Validate the setup, create the session in progress and make it current.
    pub fn create_session(
        &mut self,
        name: &str,
        course: Vec<Bar>,
        players: Vec<Player>,
    ) -> Result<SessionId, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::InvalidConfiguration(
                "session name must not be empty".into(),
            ));
        }
        if course.is_empty() {
            return Err(SessionError::InvalidConfiguration(
                "course must contain at least one bar".into(),
            ));
        }
        if players.is_empty() {
            return Err(SessionError::InvalidConfiguration(
                "a session requires at least one player".into(),
            ));
        }
        if course.len() > self.limits.max_course_length {
            return Err(SessionError::InvalidConfiguration(format!(
                "course has {} bars, the maximum is {}",
                course.len(),
                self.limits.max_course_length
            )));
        }
        if players.len() > self.limits.max_players {
            return Err(SessionError::InvalidConfiguration(format!(
                "roster has {} players, the maximum is {}",
                players.len(),
                self.limits.max_players
            )));
        }

        let mut session = GameSession::new(name.to_string(), course, players);
        session.status = session.status.transition(SessionStatus::InProgress)?;

        let id = session.id;
        self.sessions.insert(id, session);
        self.current = Some(id);
        Ok(id)
    }

    /// Append one ledger entry per input, stamped with the current hole and the wall clock.
    ///
    /// Entries are never merged: appending twice for the same player and hole sums both.
    /// Player ids outside the roster are recorded as given. Returns the number of entries
    /// appended.
    pub fn append_scores(
        &mut self,
        id: SessionId,
        entries: &[ScoreInput],
    ) -> Result<usize, SessionError> {
        let session = self.get_mut(id)?;
        let hole_id = session
            .current_hole()
            .map(|bar| bar.id.clone())
            .ok_or_else(|| {
                SessionError::InvalidConfiguration(format!(
                    "session `{id}` has no hole at index {}",
                    session.current_hole_index
                ))
            })?;

        let recorded_at = SystemTime::now();
        for entry in entries {
            if !session.has_player(entry.player_id) {
                warn!(
                    session_id = %id,
                    player_id = %entry.player_id,
                    "recording score for a player outside the roster"
                );
            }
            session.scores.push(Score {
                player_id: entry.player_id,
                hole_id: hole_id.clone(),
                strokes: entry.strokes,
                recorded_at,
                bonus_completed: entry.bonus_completed,
            });
        }

        Ok(entries.len())
    }

    /// Move the pointer to the next hole. On the last hole the pointer stays put.
    pub fn advance_hole(&mut self, id: SessionId) -> Result<usize, SessionError> {
        let session = self.get_mut(id)?;
        if session.current_hole_index < session.last_hole_index() {
            session.current_hole_index += 1;
        }
        Ok(session.current_hole_index)
    }

    /// Move the session status forward. Backward moves fail with [`SessionError::InvalidTransition`].
    pub fn set_status(
        &mut self,
        id: SessionId,
        status: SessionStatus,
    ) -> Result<SessionStatus, SessionError> {
        let session = self.get_mut(id)?;
        session.status = session.status.transition(status)?;
        Ok(session.status)
    }

    /// Remove a session; clears the current pointer when it designated this session.
    pub fn delete_session(&mut self, id: SessionId) -> Result<GameSession, SessionError> {
        let removed = self
            .sessions
            .shift_remove(&id)
            .ok_or(SessionError::SessionNotFound(id))?;
        if self.current == Some(id) {
            self.current = None;
        }
        Ok(removed)
    }

    /// Derive the ranked leaderboard of a session.
    pub fn leaderboard(&self, id: SessionId) -> Result<Vec<LeaderboardEntry>, SessionError> {
        Ok(leaderboard::compute(self.get(id)?))
    }

    /// Total score (sips minus bonus credits) for one player of a session.
    pub fn player_score(&self, id: SessionId, player_id: PlayerId) -> Result<i64, SessionError> {
        let session = self.get(id)?;
        Ok(leaderboard::tally_player(&session.scores, player_id).total_score())
    }

    /// Point the active views at another session, or at none.
    pub fn select_current(&mut self, id: Option<SessionId>) -> Result<(), SessionError> {
        if let Some(id) = id {
            self.get(id)?;
        }
        self.current = id;
        Ok(())
    }

    /// Borrow a session.
    pub fn get(&self, id: SessionId) -> Result<&GameSession, SessionError> {
        self.sessions
            .get(&id)
            .ok_or(SessionError::SessionNotFound(id))
    }

    fn get_mut(&mut self, id: SessionId) -> Result<&mut GameSession, SessionError> {
        self.sessions
            .get_mut(&id)
            .ok_or(SessionError::SessionNotFound(id))
    }

    /// Sessions in creation order.
    pub fn sessions(&self) -> impl Iterator<Item = &GameSession> {
        self.sessions.values()
    }

    /// Number of sessions held.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the registry holds no session.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Identifier of the current session, if any.
    pub fn current_id(&self) -> Option<SessionId> {
        self.current
    }

    /// The current session, if any.
    pub fn current(&self) -> Option<&GameSession> {
        self.current.and_then(|id| self.sessions.get(&id))
    }
}
