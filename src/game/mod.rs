//! Per-room game engine
//!
//! Everything in here is synchronous and operates on a single [`Game`]
//! aggregate. Callers hold the room lock for the duration of [`Game::apply`]
//! and broadcast the snapshot when it reports [`Outcome::Updated`].

mod faceoff;
mod fast_money;
pub mod matcher;
mod scoring;

use crate::error::{GameError, GameResult};
use crate::questions::QuestionBank;
use crate::types::*;
use chrono::{DateTime, Duration, Utc};

pub use scoring::point_multiplier;

/// Whether an action changed the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// State changed, broadcast a snapshot
    Updated,
    /// Not allowed for this actor or phase; dropped without feedback
    Ignored,
}

/// Room-scoped actions, already routed to a game
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetTeam {
        player_id: ClientId,
        team: TeamId,
    },
    StartRound {
        question_index: usize,
        duration: Option<u32>,
    },
    BuzzIn {
        text: String,
    },
    ChoosePlayPass {
        choice: PlayChoice,
    },
    Answer {
        text: String,
    },
    StealAttempt {
        text: String,
    },
    FinishRound,
    StartFastMoney {
        players: Option<[ClientId; 2]>,
    },
    FastMoneyAnswer {
        text: String,
        question_index: Option<usize>,
    },
    FinishFastMoneyP1,
    Reset,
}

impl Action {
    pub fn is_host_only(&self) -> bool {
        !matches!(
            self,
            Action::BuzzIn { .. } | Action::Answer { .. } | Action::StealAttempt { .. }
        )
    }
}

impl Game {
    /// Apply an action on behalf of `actor`
    pub fn apply(
        &mut self,
        actor: &str,
        action: Action,
        bank: &QuestionBank,
        now: DateTime<Utc>,
    ) -> GameResult<Outcome> {
        if action.is_host_only() && !self.is_host(actor) {
            tracing::debug!("Ignoring host action from {} in room {}", actor, self.code);
            return Ok(Outcome::Ignored);
        }

        match action {
            Action::SetTeam { player_id, team } => Ok(self.set_team(&player_id, team)),
            Action::StartRound {
                question_index,
                duration,
            } => self.start_round(bank, question_index, duration),
            Action::BuzzIn { text } => self.buzz_in(actor, &text, now),
            Action::ChoosePlayPass { choice } => Ok(self.choose_play_pass(choice, now)),
            Action::Answer { text } => Ok(self.answer(actor, &text)),
            Action::StealAttempt { text } => Ok(self.steal_attempt(&text)),
            Action::FinishRound => Ok(self.finish_round()),
            Action::StartFastMoney { players } => self.start_fast_money(bank, players, now),
            Action::FastMoneyAnswer {
                text,
                question_index,
            } => self.fast_money_answer(&text, question_index),
            Action::FinishFastMoneyP1 => Ok(self.finish_fast_money_p1(now)),
            Action::Reset => Ok(self.reset()),
        }
    }

    /// Add a player to whichever team has fewer members (ties go to team A)
    pub fn add_player(&mut self, id: ClientId, name: String) -> &Player {
        let count = |team: TeamId| self.players.iter().filter(|p| p.team == team).count();
        let team = if count(TeamId::TeamA) <= count(TeamId::TeamB) {
            TeamId::TeamA
        } else {
            TeamId::TeamB
        };
        self.players.push(Player { id, name, team });
        &self.players[self.players.len() - 1]
    }

    /// Drop a player from the roster. Team score and strikes are untouched.
    pub fn remove_player(&mut self, id: &str) -> Option<Player> {
        let index = self.players.iter().position(|p| p.id == id)?;
        Some(self.players.remove(index))
    }

    fn set_team(&mut self, player_id: &str, team: TeamId) -> Outcome {
        match self.players.iter_mut().find(|p| p.id == player_id) {
            Some(player) if player.team != team => {
                player.team = team;
                Outcome::Updated
            }
            _ => Outcome::Ignored,
        }
    }

    fn start_round(
        &mut self,
        bank: &QuestionBank,
        question_index: usize,
        duration: Option<u32>,
    ) -> GameResult<Outcome> {
        if !matches!(self.phase, GamePhase::Lobby | GamePhase::RoundEnd) {
            return Ok(Outcome::Ignored);
        }
        let question = bank
            .survey(question_index)
            .ok_or(GameError::QuestionNotFound(question_index))?;

        self.current_round += 1;
        self.point_multiplier = point_multiplier(self.current_round);
        self.question_index = Some(question_index);
        self.current_question = Some(question.clone());
        self.round_duration = duration.unwrap_or(self.config.round_seconds);
        self.round_ends_at = None;
        self.revealed_answers.clear();
        self.teams.team_a.strikes = 0;
        self.teams.team_b.strikes = 0;
        self.face_off_buzzers.clear();
        self.face_off_winner = None;
        self.controlling_team = None;
        self.current_turn_team = None;
        self.current_player_index = 0;
        self.stealing_team = None;
        self.steal_answer = None;
        self.phase = GamePhase::FaceOff;
        self.message = format!(
            "Round {} ({}x points). Face-Off! Best answer wins control.",
            self.current_round, self.point_multiplier
        );

        tracing::info!(
            "Room {} started round {} with question {}",
            self.code,
            self.current_round,
            question_index
        );
        Ok(Outcome::Updated)
    }

    fn choose_play_pass(&mut self, choice: PlayChoice, now: DateTime<Utc>) -> Outcome {
        if self.phase != GamePhase::PlayOrPass {
            return Outcome::Ignored;
        }
        let Some(winner_team) = self.face_off_winner.as_ref().map(|w| w.team) else {
            return Outcome::Ignored;
        };

        let team = match choice {
            PlayChoice::Play => {
                self.message = format!("{} chooses to PLAY!", self.teams.get(winner_team).name);
                winner_team
            }
            PlayChoice::Pass => {
                let other = winner_team.other();
                self.message = format!(
                    "{} passes to {}!",
                    self.teams.get(winner_team).name,
                    self.teams.get(other).name
                );
                other
            }
        };

        self.controlling_team = Some(team);
        self.current_turn_team = Some(team);
        self.current_player_index = 0;
        self.phase = GamePhase::RoundPlay;
        self.round_ends_at = Some(now + Duration::seconds(i64::from(self.round_duration)));
        Outcome::Updated
    }

    /// Host force-finish of the current round
    fn finish_round(&mut self) -> Outcome {
        if !matches!(self.phase, GamePhase::RoundPlay | GamePhase::TeamSteal) {
            return Outcome::Ignored;
        }
        self.round_ends_at = None;
        if !self.check_winner() {
            self.phase = GamePhase::RoundEnd;
        }
        Outcome::Updated
    }

    /// Back to the lobby, keeping code, host, roster and team scores
    fn reset(&mut self) -> Outcome {
        let scores = (self.teams.team_a.score, self.teams.team_b.score);
        let players = std::mem::take(&mut self.players);
        let code = std::mem::take(&mut self.code);
        let host_id = std::mem::take(&mut self.host_id);

        *self = Game::new(code, host_id, self.config.clone());
        self.players = players;
        self.teams.team_a.score = scores.0;
        self.teams.team_b.score = scores.1;

        tracing::info!("Room {} reset (scores kept at {}:{})", self.code, scores.0, scores.1);
        Outcome::Updated
    }

    /// Expire the running deadline, as if the host had finished the phase
    pub fn expire_deadline(&mut self, now: DateTime<Utc>) -> Outcome {
        match self.round_ends_at {
            Some(deadline) if deadline <= now => {}
            _ => return Outcome::Ignored,
        }

        match self.phase {
            GamePhase::RoundPlay => {
                self.message = "Time up!".to_string();
                self.finish_round()
            }
            GamePhase::FastMoneyP1 => self.finish_fast_money_p1(now),
            GamePhase::FastMoneyP2 => self.finish_fast_money_p2(),
            // Deadline belongs to a phase we already left
            _ => {
                self.round_ends_at = None;
                Outcome::Updated
            }
        }
    }
}
