use super::matcher::{exact_match, normalize};
use super::Outcome;
use crate::error::{GameError, GameResult};
use crate::questions::QuestionBank;
use crate::types::*;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;

impl Game {
    pub(super) fn start_fast_money(
        &mut self,
        bank: &QuestionBank,
        players: Option<[ClientId; 2]>,
        now: DateTime<Utc>,
    ) -> GameResult<Outcome> {
        if bank.fast_money_sets.is_empty() {
            return Err(GameError::NoFastMoneySets);
        }
        if let Some(missing) = players
            .iter()
            .flatten()
            .find(|id| self.player(id).is_none())
        {
            return Err(GameError::PlayerNotFound(missing.clone()));
        }

        let set_index = rand::rng().random_range(0..bank.fast_money_sets.len());
        let questions = bank
            .fast_money_set(set_index)
            .map(<[SurveyQuestion]>::to_vec)
            .unwrap_or_default();

        self.fast_money = Some(FastMoneyState::new(set_index, questions, players));
        self.phase = GamePhase::FastMoneyP1;
        self.round_ends_at = Some(now + Duration::seconds(i64::from(self.config.fast_money_p1_seconds)));
        self.message = "FAST MONEY! Player 1, you're up.".to_string();
        tracing::info!("Room {} started fast money with set {}", self.code, set_index);
        Ok(Outcome::Updated)
    }

    /// Record the current contestant's answer for one bonus question
    pub(super) fn fast_money_answer(
        &mut self,
        text: &str,
        question_index: Option<usize>,
    ) -> GameResult<Outcome> {
        let second = match self.phase {
            GamePhase::FastMoneyP1 => false,
            GamePhase::FastMoneyP2 => true,
            _ => return Ok(Outcome::Ignored),
        };
        let Some(fm) = self.fast_money.as_mut() else {
            return Ok(Outcome::Ignored);
        };

        let index = question_index.unwrap_or(fm.current_question_index);
        let question = fm
            .questions
            .get(index)
            .ok_or(GameError::FastMoneyIndex(index))?;

        let mut recorded = match exact_match(question, text) {
            Some(hit) => FastMoneyAnswer {
                text: hit.text.clone(),
                points: hit.points,
                status: FastMoneyStatus::Matched,
            },
            None => FastMoneyAnswer {
                text: text.trim().to_string(),
                points: 0,
                status: FastMoneyStatus::Missed,
            },
        };

        if second {
            let duplicate = fm.p1_answers[index]
                .as_ref()
                .is_some_and(|first| normalize(&first.text) == normalize(&recorded.text));
            if duplicate {
                recorded.points = 0;
                recorded.status = FastMoneyStatus::Duplicate;
            }
        }

        let answers = if second {
            &mut fm.p2_answers
        } else {
            &mut fm.p1_answers
        };
        answers[index] = Some(recorded);
        let score = answers
            .iter()
            .flatten()
            .fold(0u32, |acc, a| acc.saturating_add(a.points));
        if second {
            fm.p2_score = score;
        } else {
            fm.p1_score = score;
        }
        fm.current_question_index = (index + 1).min(fm.questions.len());

        self.message = format!("Fast money total: {}", fm.total());
        Ok(Outcome::Updated)
    }

    pub(super) fn finish_fast_money_p1(&mut self, now: DateTime<Utc>) -> Outcome {
        if self.phase != GamePhase::FastMoneyP1 {
            return Outcome::Ignored;
        }
        let Some(fm) = self.fast_money.as_mut() else {
            return Outcome::Ignored;
        };
        fm.current_question_index = 0;

        self.phase = GamePhase::FastMoneyP2;
        self.round_ends_at = Some(now + Duration::seconds(i64::from(self.config.fast_money_p2_seconds)));
        self.message = "Player 2, don't repeat Player 1's answers!".to_string();
        Outcome::Updated
    }

    /// Closing of the bonus round when player 2 runs out of time
    pub(super) fn finish_fast_money_p2(&mut self) -> Outcome {
        if self.phase != GamePhase::FastMoneyP2 {
            return Outcome::Ignored;
        }
        let total = self.fast_money.as_ref().map_or(0, FastMoneyState::total);

        self.round_ends_at = None;
        self.phase = GamePhase::GameOver;
        self.message = format!("Fast money over: {} points!", total);
        tracing::info!("Room {} fast money finished with {}", self.code, total);
        Outcome::Updated
    }
}
