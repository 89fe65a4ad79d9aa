use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type ClientId = String;
pub type RoomCode = String;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TeamId {
    #[serde(rename = "teamA")]
    TeamA,
    #[serde(rename = "teamB")]
    TeamB,
}

impl TeamId {
    pub fn other(self) -> TeamId {
        match self {
            TeamId::TeamA => TeamId::TeamB,
            TeamId::TeamB => TeamId::TeamA,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum GamePhase {
    Lobby,
    FaceOff,
    PlayOrPass,
    RoundPlay,
    TeamSteal,
    RoundEnd,
    #[serde(rename = "fast-money-p1")]
    FastMoneyP1,
    #[serde(rename = "fast-money-p2")]
    FastMoneyP2,
    GameOver,
}

/// Per-room rules, embedded in every snapshot so clients can render them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub round_seconds: u32,
    pub winning_score: u32,
    pub max_rounds: u32,
    pub fast_money_p1_seconds: u32,
    pub fast_money_p2_seconds: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_seconds: 45,
            winning_score: 300,
            max_rounds: 5,
            fast_money_p1_seconds: 20,
            fast_money_p2_seconds: 25,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub score: u32,
    pub strikes: u8,
}

impl Team {
    fn new(id: TeamId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            score: 0,
            strikes: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Teams {
    #[serde(rename = "teamA")]
    pub team_a: Team,
    #[serde(rename = "teamB")]
    pub team_b: Team,
}

impl Default for Teams {
    fn default() -> Self {
        Self {
            team_a: Team::new(TeamId::TeamA, "Team A"),
            team_b: Team::new(TeamId::TeamB, "Team B"),
        }
    }
}

impl Teams {
    pub fn get(&self, id: TeamId) -> &Team {
        match id {
            TeamId::TeamA => &self.team_a,
            TeamId::TeamB => &self.team_b,
        }
    }

    pub fn get_mut(&mut self, id: TeamId) -> &mut Team {
        match id {
            TeamId::TeamA => &mut self.team_a,
            TeamId::TeamB => &mut self.team_b,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: ClientId,
    pub name: String,
    pub team: TeamId,
}

/// A ranked survey answer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurveyAnswer {
    pub text: String,
    pub points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurveyQuestion {
    pub prompt: String,
    /// Ordered by descending points
    pub answers: Vec<SurveyAnswer>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RevealedAnswer {
    pub text: String,
    pub points: u32,
    pub revealed_by: TeamId,
}

/// A face-off submission; `rank` is the 1-based position of the matched answer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuzzEvent {
    pub player_id: ClientId,
    pub player_name: String,
    pub team: TeamId,
    pub text: String,
    pub rank: Option<usize>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlayChoice {
    Play,
    Pass,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FastMoneyStatus {
    Matched,
    Missed,
    Duplicate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FastMoneyAnswer {
    pub text: String,
    pub points: u32,
    pub status: FastMoneyStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FastMoneyState {
    pub set_index: usize,
    pub questions: Vec<SurveyQuestion>,
    /// Optional `[player1, player2]` contestants named by the host
    pub players: Option<[ClientId; 2]>,
    pub p1_answers: Vec<Option<FastMoneyAnswer>>,
    pub p2_answers: Vec<Option<FastMoneyAnswer>>,
    pub current_question_index: usize,
    pub p1_score: u32,
    pub p2_score: u32,
}

impl FastMoneyState {
    pub fn new(set_index: usize, questions: Vec<SurveyQuestion>, players: Option<[ClientId; 2]>) -> Self {
        let slots = questions.len();
        Self {
            set_index,
            questions,
            players,
            p1_answers: vec![None; slots],
            p2_answers: vec![None; slots],
            current_question_index: 0,
            p1_score: 0,
            p2_score: 0,
        }
    }

    pub fn total(&self) -> u32 {
        self.p1_score.saturating_add(self.p2_score)
    }
}

/// The full per-room aggregate; serialized as-is for every `state` broadcast
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub code: RoomCode,
    pub host_id: ClientId,
    pub config: GameConfig,
    pub teams: Teams,
    pub players: Vec<Player>,
    pub phase: GamePhase,

    pub current_round: u32,
    pub point_multiplier: u32,
    pub question_index: Option<usize>,
    pub current_question: Option<SurveyQuestion>,
    pub round_ends_at: Option<DateTime<Utc>>,
    pub round_duration: u32,
    pub revealed_answers: Vec<RevealedAnswer>,
    pub message: String,

    pub face_off_buzzers: Vec<BuzzEvent>,
    pub face_off_winner: Option<Player>,

    pub controlling_team: Option<TeamId>,
    pub current_turn_team: Option<TeamId>,
    pub current_player_index: usize,

    pub stealing_team: Option<TeamId>,
    pub steal_answer: Option<String>,

    pub fast_money: Option<FastMoneyState>,

    pub winning_team: Option<TeamId>,
}

impl Game {
    pub fn new(code: RoomCode, host_id: ClientId, config: GameConfig) -> Self {
        let round_duration = config.round_seconds;
        Self {
            code,
            host_id,
            config,
            teams: Teams::default(),
            players: Vec::new(),
            phase: GamePhase::Lobby,
            current_round: 0,
            point_multiplier: 1,
            question_index: None,
            current_question: None,
            round_ends_at: None,
            round_duration,
            revealed_answers: Vec::new(),
            message: String::new(),
            face_off_buzzers: Vec::new(),
            face_off_winner: None,
            controlling_team: None,
            current_turn_team: None,
            current_player_index: 0,
            stealing_team: None,
            steal_answer: None,
            fast_money: None,
            winning_team: None,
        }
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn is_host(&self, id: &str) -> bool {
        self.host_id == id
    }
}
