use crate::error::GameError;
use crate::game::Action;
use crate::types::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_question_index() -> usize {
    0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    Create,
    Join {
        code: RoomCode,
        #[serde(default)]
        name: Option<String>,
    },
    // Host-only messages
    SetTeam {
        player_id: ClientId,
        team: TeamId,
    },
    StartRound {
        #[serde(default = "default_question_index")]
        question_index: usize,
        #[serde(default)]
        duration: Option<u32>,
    },
    ChoosePlayPass {
        choice: PlayChoice,
    },
    FinishRound,
    StartFastMoney {
        #[serde(default)]
        players: Option<[ClientId; 2]>,
    },
    FastMoneyAnswer {
        text: String,
        #[serde(default)]
        question_index: Option<usize>,
    },
    #[serde(rename = "finish-fast-money-p1")]
    FinishFastMoneyP1,
    Reset,
    // Player messages
    BuzzIn {
        text: String,
    },
    Answer {
        text: String,
    },
    StealAttempt {
        text: String,
    },
}

impl ClientMessage {
    /// Room-scoped action, or `None` for room entry messages
    pub fn into_action(self) -> Option<Action> {
        let action = match self {
            ClientMessage::Create | ClientMessage::Join { .. } => return None,
            ClientMessage::SetTeam { player_id, team } => Action::SetTeam { player_id, team },
            ClientMessage::StartRound {
                question_index,
                duration,
            } => Action::StartRound {
                question_index,
                duration,
            },
            ClientMessage::ChoosePlayPass { choice } => Action::ChoosePlayPass { choice },
            ClientMessage::FinishRound => Action::FinishRound,
            ClientMessage::StartFastMoney { players } => Action::StartFastMoney { players },
            ClientMessage::FastMoneyAnswer {
                text,
                question_index,
            } => Action::FastMoneyAnswer {
                text,
                question_index,
            },
            ClientMessage::FinishFastMoneyP1 => Action::FinishFastMoneyP1,
            ClientMessage::Reset => Action::Reset,
            ClientMessage::BuzzIn { text } => Action::BuzzIn { text },
            ClientMessage::Answer { text } => Action::Answer { text },
            ClientMessage::StealAttempt { text } => Action::StealAttempt { text },
        };
        Some(action)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    Welcome {
        client_id: ClientId,
    },
    Created {
        code: RoomCode,
    },
    Joined {
        code: RoomCode,
    },
    State {
        state: Box<Game>,
        server_now: DateTime<Utc>,
    },
    Error {
        code: String,
        message: String,
    },
}

impl From<&GameError> for ServerMessage {
    fn from(e: &GameError) -> Self {
        ServerMessage::Error {
            code: e.code().to_string(),
            message: e.to_string(),
        }
    }
}
