use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Active -> Won
/// - Active -> Lost
/// - Active -> TimedOut
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Active,
    Won,
    Lost,
    TimedOut,
}

impl SessionState {
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// No moves are accepted anymore
    pub const fn is_terminal(self) -> bool {
        !self.is_active()
    }
}

/// One play-through, from the first reveal to a terminal state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    config: GameConfig,
    board: Board,
    state: SessionState,
    policy: ScoringPolicy,
    score: Score,
    elapsed_secs: u32,
    triggered_mine: Option<Coord2>,
}

impl GameSession {
    pub fn new(config: GameConfig, generator: impl MineGenerator) -> Result<Self> {
        let board = Board::new(&config, generator)?;
        Ok(Self::with_board(config, board))
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        Self::new(config, RandomMineGenerator::new(seed))
    }

    /// Session over an already generated board.
    pub fn from_board(board: Board, time_limit: Option<u32>) -> Self {
        let (rows, cols) = board.size();
        let mut config = GameConfig::new_unchecked(rows, cols, board.mine_count());
        if let Some(seconds) = time_limit {
            config = config.with_time_limit(seconds);
        }
        Self::with_board(config, board)
    }

    fn with_board(config: GameConfig, board: Board) -> Self {
        Self {
            config,
            board,
            state: Default::default(),
            policy: Default::default(),
            score: Score::ZERO,
            elapsed_secs: 0,
            triggered_mine: None,
        }
    }

    pub fn with_policy(mut self, policy: ScoringPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only access, cells only change through session operations.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn is_win(&self) -> bool {
        matches!(self.state, SessionState::Won)
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Seconds seen by the last `tick`, frozen once the game ends.
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn flags_remaining(&self) -> i64 {
        self.board.mines_remaining_estimate()
    }

    /// Share of the time limit still available, from 1.0 down to 0.0.
    pub fn time_fraction_left(&self) -> Option<f32> {
        let limit = self.config.time_limit()?;
        if limit == 0 {
            return Some(0.0);
        }
        let used = self.elapsed_secs as f32 / limit as f32;
        Some((1.0 - used).clamp(0.0, 1.0))
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<SessionEvent> {
        let coords = self.board.validate_coords(coords)?;
        if self.check_active().is_err() {
            log::debug!("Reveal at {:?} ignored, session is {:?}", coords, self.state);
            return Ok(SessionEvent::NoChange);
        }

        Ok(match RevealEngine::reveal(&mut self.board, coords)? {
            RevealOutcome::NoChange => SessionEvent::NoChange,
            RevealOutcome::Detonated => {
                self.triggered_mine = Some(coords);
                self.end(SessionState::Lost);
                SessionEvent::Detonated { at: coords }
            }
            RevealOutcome::Continue { opened } => {
                self.score.apply(self.policy.reveal_delta(opened));
                if RevealEngine::check_win(&self.board) {
                    self.end(SessionState::Won);
                    SessionEvent::Won { opened }
                } else {
                    SessionEvent::Revealed { opened }
                }
            }
        })
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<SessionEvent> {
        let coords = self.board.validate_coords(coords)?;
        if self.check_active().is_err() {
            log::debug!("Flag at {:?} ignored, session is {:?}", coords, self.state);
            return Ok(SessionEvent::NoChange);
        }

        match self.board.toggle_flag(coords) {
            Ok(true) => {
                let on_mine = self.board.cell_at(coords).is_mine();
                self.score.apply(self.policy.flag_delta(on_mine));
                Ok(SessionEvent::Flagged)
            }
            Ok(false) => Ok(SessionEvent::Unflagged),
            Err(GameError::IllegalAction) => {
                log::debug!("Flag at {:?} ignored, cell is revealed", coords);
                Ok(SessionEvent::NoChange)
            }
            Err(err) => Err(err),
        }
    }

    /// Feeds the externally measured play time; the only way to reach `TimedOut`.
    pub fn tick(&mut self, elapsed_secs: u32) -> SessionEvent {
        if self.state.is_terminal() {
            return SessionEvent::NoChange;
        }
        // the clock never runs backwards
        self.elapsed_secs = self.elapsed_secs.max(elapsed_secs);

        match self.config.time_limit() {
            Some(limit) if self.elapsed_secs >= limit => {
                self.board.reveal_all();
                self.end(SessionState::TimedOut);
                SessionEvent::TimedOut
            }
            _ => SessionEvent::NoChange,
        }
    }

    /// Snapshot for the presentation layer.
    pub fn view(&self) -> BoardView {
        BoardView::from_session(self)
    }

    /// Outcome to hand to the leaderboard, only once the game has ended.
    pub fn leaderboard_entry(
        &self,
        name: impl Into<String>,
        level: impl Into<String>,
    ) -> Option<LeaderboardEntry> {
        self.state.is_terminal().then(|| {
            LeaderboardEntry::new(name, self.score.value(), level, self.elapsed_secs)
        })
    }

    fn check_active(&self) -> Result<()> {
        if self.state.is_active() {
            Ok(())
        } else {
            Err(GameError::IllegalAction)
        }
    }

    fn end(&mut self, state: SessionState) {
        log::debug!(
            "Session ended {:?} after {}s with score {}",
            state,
            self.elapsed_secs,
            self.score
        );
        self.state = state;
    }
}
