use serde::{Deserialize, Serialize};

use crate::core::{piece::PieceKind, role_board::RoleBoard};

use super::GameStatus;

/// Score at which the NES score counter wraps back to zero.
pub const ROLLOVER_SCORE: u32 = 1_600_000;

/// Session-level settings fixed before any game starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Level the games of this session start at.
    pub start_level: u32,
    /// When set, the score counter is capped at 999,999 and never rolls over.
    pub maxout_capped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    /// No game has started, or the previous one was reset.
    Waiting,
    Playing,
    GameOver,
}

/// Score rollover bookkeeping of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolloverProfile {
    rollovers: u32,
    maxout_capped: bool,
}

impl RolloverProfile {
    #[must_use]
    pub const fn new(maxout_capped: bool) -> Self {
        Self {
            rollovers: 0,
            maxout_capped,
        }
    }

    /// Number of times the displayed score has wrapped past [`ROLLOVER_SCORE`].
    #[must_use]
    pub const fn rollovers(&self) -> u32 {
        self.rollovers
    }

    #[must_use]
    pub const fn is_maxout_capped(&self) -> bool {
        self.maxout_capped
    }

    /// Recomputes the rollover count from the true score.
    pub const fn calculate_rollover_on_score(&mut self, score: u32) {
        self.rollovers = score / ROLLOVER_SCORE;
    }
}

/// The estimated game state published once per frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub level: u32,
    pub lines: u32,
    pub score: u32,
    pub board: RoleBoard,
    pub next: Option<PieceKind>,
}

/// Per-session game context the estimator reports into.
///
/// Holds the status of the current game, its rollover profile and the latest
/// published snapshot. Level, lines and score only move forward between calls
/// to [`GameSession::start_game`].
#[derive(Debug, Clone)]
pub struct GameSession {
    config: SessionConfig,
    status: GameStatus,
    profile: RolloverProfile,
    session_state: SessionState,
    snapshot: Option<GameSnapshot>,
    linecap_reached: bool,
    games_started: u32,
}

impl GameSession {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            status: GameStatus::new(config.start_level),
            profile: RolloverProfile::new(config.maxout_capped),
            session_state: SessionState::Waiting,
            snapshot: None,
            linecap_reached: false,
            games_started: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    #[must_use]
    pub fn start_level(&self) -> u32 {
        self.status.start_level()
    }

    #[must_use]
    pub fn transition_lines(&self) -> u32 {
        self.status.transition_lines()
    }

    #[must_use]
    pub fn profile(&self) -> &RolloverProfile {
        &self.profile
    }

    pub fn profile_mut(&mut self) -> &mut RolloverProfile {
        &mut self.profile
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    /// The last snapshot passed to [`GameSession::set_full_state`] in this game.
    #[must_use]
    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        self.snapshot.as_ref()
    }

    /// Next piece of the latest snapshot.
    #[must_use]
    pub fn next_piece(&self) -> Option<PieceKind> {
        self.snapshot.as_ref().and_then(|snapshot| snapshot.next)
    }

    #[must_use]
    pub fn is_linecap_reached(&self) -> bool {
        self.linecap_reached
    }

    #[must_use]
    pub fn games_started(&self) -> u32 {
        self.games_started
    }

    /// Resets the status and profile for a new game at the configured start level.
    pub fn start_game(&mut self) {
        self.status = GameStatus::new(self.config.start_level);
        self.profile = RolloverProfile::new(self.config.maxout_capped);
        self.session_state = SessionState::Playing;
        self.snapshot = None;
        self.linecap_reached = false;
        self.games_started += 1;
    }

    /// Marks the current game as over. The final status stays readable.
    pub fn end_game(&mut self) {
        self.session_state = SessionState::GameOver;
    }

    /// Publishes the state estimated for the current frame.
    pub fn set_full_state(
        &mut self,
        board: RoleBoard,
        next: Option<PieceKind>,
        level: u32,
        lines: u32,
        score: u32,
    ) {
        debug_assert!(
            level >= self.status.level() && lines >= self.status.lines() && score >= self.status.score(),
            "game status must not decrease"
        );
        self.status = GameStatus::with_progress(self.status.start_level(), level, lines, score);
        self.snapshot = Some(GameSnapshot {
            level,
            lines,
            score,
            board,
            next,
        });
    }

    pub fn linecap_reached(&mut self) {
        self.linecap_reached = true;
    }
}
