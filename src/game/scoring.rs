use super::matcher::evaluate_answer;
use super::Outcome;
use crate::types::*;

const MAX_STRIKES: u8 = 3;

/// 1x in round 1, 2x in rounds 2-3, 3x from round 4 on
pub fn point_multiplier(round: u32) -> u32 {
    match round {
        0 | 1 => 1,
        2 | 3 => 2,
        _ => 3,
    }
}

impl Game {
    /// Round-play guess. Any player may answer, regardless of control.
    pub(super) fn answer(&mut self, actor: &str, text: &str) -> Outcome {
        if self.phase != GamePhase::RoundPlay || text.trim().is_empty() {
            return Outcome::Ignored;
        }
        let Some(question) = self.current_question.as_ref() else {
            return Outcome::Ignored;
        };
        let Some(player) = self.player(actor).cloned() else {
            return Outcome::Ignored;
        };

        match evaluate_answer(question, text, &self.revealed_answers).cloned() {
            Some(hit) => {
                let awarded = self.reveal(&hit, player.team);
                self.message = format!("{} found \"{}\" (+{})!", player.name, hit.text, awarded);
            }
            None => {
                let team = self.teams.get_mut(player.team);
                team.strikes = (team.strikes + 1).min(MAX_STRIKES);
                let strikes = team.strikes;
                self.message = format!(
                    "{} missed ({} strike{}).",
                    player.name,
                    strikes,
                    if strikes == 1 { "" } else { "s" }
                );

                if strikes >= MAX_STRIKES {
                    let stealing = player.team.other();
                    self.phase = GamePhase::TeamSteal;
                    self.stealing_team = Some(stealing);
                    self.round_ends_at = None;
                    self.message = format!("{} can STEAL!", self.teams.get(stealing).name);
                    tracing::info!("Room {}: {:?} may steal", self.code, stealing);
                }
            }
        }
        Outcome::Updated
    }

    /// Single steal attempt; the round ends whatever the result
    pub(super) fn steal_attempt(&mut self, text: &str) -> Outcome {
        if self.phase != GamePhase::TeamSteal || text.trim().is_empty() {
            return Outcome::Ignored;
        }
        let (Some(question), Some(stealing)) = (self.current_question.as_ref(), self.stealing_team)
        else {
            return Outcome::Ignored;
        };

        self.steal_answer = Some(text.to_string());
        match evaluate_answer(question, text, &self.revealed_answers).cloned() {
            Some(hit) => {
                self.reveal(&hit, stealing);
                self.message = format!(
                    "STEAL SUCCESSFUL! {} found \"{}\"!",
                    self.teams.get(stealing).name,
                    hit.text
                );
            }
            None => {
                let keeper = self.controlling_team.unwrap_or(stealing.other());
                self.message = format!(
                    "Steal failed! Points remain with {}.",
                    self.teams.get(keeper).name
                );
            }
        }
        tracing::info!("Room {} steal resolved: {}", self.code, self.message);

        self.round_ends_at = None;
        if !self.check_winner() {
            self.phase = GamePhase::RoundEnd;
        }
        Outcome::Updated
    }

    /// Record a reveal and award `points * multiplier`; returns the award
    fn reveal(&mut self, answer: &SurveyAnswer, team: TeamId) -> u32 {
        let awarded = answer.points.saturating_mul(self.point_multiplier);
        let score = &mut self.teams.get_mut(team).score;
        *score = score.saturating_add(awarded);
        self.revealed_answers.push(RevealedAnswer {
            text: answer.text.clone(),
            points: answer.points,
            revealed_by: team,
        });
        awarded
    }

    /// Decide the game if a team reached the winning score or the last round
    /// is over. Equal scores keep the game going in sudden death.
    ///
    /// Returns `true` when a winner was decided.
    pub fn check_winner(&mut self) -> bool {
        let a = self.teams.team_a.score;
        let b = self.teams.team_b.score;
        let threshold = self.config.winning_score;

        if a < threshold && b < threshold && self.current_round < self.config.max_rounds {
            return false;
        }

        if a == b {
            self.winning_team = None;
            self.phase = GamePhase::RoundEnd;
            self.message = "It's a tie! Sudden death, next round decides.".to_string();
            return false;
        }

        let winner = if a > b { TeamId::TeamA } else { TeamId::TeamB };
        self.winning_team = Some(winner);
        self.phase = GamePhase::GameOver;
        self.message = format!("{} wins the game!", self.teams.get(winner).name);
        tracing::info!("Room {} decided: {:?} wins {}:{}", self.code, winner, a, b);
        true
    }
}
