use super::matcher::rank_answer;
use super::Outcome;
use crate::error::{GameError, GameResult};
use crate::types::*;
use chrono::{DateTime, Utc};

impl Game {
    /// Face-off submission.
    ///
    /// A #1 answer wins outright. Otherwise one player from the other team
    /// gets to answer and the better rank takes control. On equal ranks the
    /// first buzz keeps control.
    pub(super) fn buzz_in(
        &mut self,
        actor: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> GameResult<Outcome> {
        if self.phase != GamePhase::FaceOff || text.trim().is_empty() {
            return Ok(Outcome::Ignored);
        }
        let Some(question) = self.current_question.as_ref() else {
            return Ok(Outcome::Ignored);
        };
        let Some(player) = self.player(actor).cloned() else {
            return Ok(Outcome::Ignored);
        };

        if let Some(first) = self.face_off_buzzers.first() {
            if first.player_id == player.id {
                return Err(GameError::AlreadyBuzzed);
            }
            if first.team == player.team {
                return Err(GameError::SameTeamBuzz);
            }
        }

        let rank = rank_answer(question, text);
        self.face_off_buzzers.push(BuzzEvent {
            player_id: player.id.clone(),
            player_name: player.name.clone(),
            team: player.team,
            text: text.trim().to_string(),
            rank,
            timestamp: now,
        });

        let winner = match self.face_off_buzzers.as_slice() {
            [only] if only.rank == Some(1) => only,
            [only] => {
                self.message = format!(
                    "{} answered. {} gets a chance to beat it!",
                    only.player_name,
                    self.teams.get(only.team.other()).name
                );
                return Ok(Outcome::Updated);
            }
            [first, second, ..] => {
                // Unmatched answers rank below every match
                let worst = usize::MAX;
                if second.rank.unwrap_or(worst) < first.rank.unwrap_or(worst) {
                    second
                } else {
                    first
                }
            }
            [] => return Ok(Outcome::Ignored),
        };

        // Taken from the buzz itself; the winner may have left since
        let winner = Player {
            id: winner.player_id.clone(),
            name: winner.player_name.clone(),
            team: winner.team,
        };
        self.message = format!(
            "{} wins the Face-Off for {}! Play or pass?",
            winner.name,
            self.teams.get(winner.team).name
        );
        tracing::info!("Room {} face-off won by {}", self.code, winner.id);
        self.face_off_winner = Some(winner);
        self.phase = GamePhase::PlayOrPass;
        Ok(Outcome::Updated)
    }
}
