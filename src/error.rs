use crate::types::RoomCode;

/// Errors surfaced to the offending connection as an `error` event.
///
/// Authorization and wrong-phase violations are not errors: the engine
/// ignores them silently, see [`crate::game::Outcome::Ignored`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("Invalid message format: {0}")]
    Parse(String),

    #[error("Game {0} not found")]
    RoomNotFound(RoomCode),

    #[error("Join a game first")]
    NotJoined,

    #[error("Question {0} not found")]
    QuestionNotFound(usize),

    #[error("No fast money sets available")]
    NoFastMoneySets,

    #[error("Fast money question {0} does not exist")]
    FastMoneyIndex(usize),

    #[error("You already buzzed in")]
    AlreadyBuzzed,

    #[error("A player from the other team must answer next")]
    SameTeamBuzz,

    #[error("Player {0} not found")]
    PlayerNotFound(String),
}

impl GameError {
    /// Stable protocol code sent alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            GameError::Parse(_) => "PARSE_ERROR",
            GameError::RoomNotFound(_) => "ROOM_NOT_FOUND",
            GameError::NotJoined => "NOT_JOINED",
            GameError::QuestionNotFound(_) => "QUESTION_NOT_FOUND",
            GameError::NoFastMoneySets => "NO_FAST_MONEY_SETS",
            GameError::FastMoneyIndex(_) => "FAST_MONEY_INDEX",
            GameError::AlreadyBuzzed => "ALREADY_BUZZED",
            GameError::SameTeamBuzz => "SAME_TEAM_BUZZ",
            GameError::PlayerNotFound(_) => "PLAYER_NOT_FOUND",
        }
    }
}

pub type GameResult<T> = Result<T, GameError>;
