//! Survey question bank
//!
//! The bank ships with a built-in set of surveys and one fast money set.
//! A JSON file with the same shape can replace it at startup.

use crate::types::{SurveyAnswer, SurveyQuestion};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of questions in every fast money set
pub const FAST_MONEY_QUESTIONS: usize = 5;

/// Upper bound for a single answer's points in a loaded bank
pub const MAX_ANSWER_POINTS: u32 = 10_000;

#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("Failed to read question bank: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse question bank: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid question bank: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionBank {
    pub surveys: Vec<SurveyQuestion>,
    #[serde(default)]
    pub fast_money_sets: Vec<Vec<SurveyQuestion>>,
}

type Table = &'static [(&'static str, &'static [(&'static str, u32)])];

const SURVEYS: Table = &[
    (
        "Name a popular pizza topping.",
        &[
            ("Pepperoni", 35),
            ("Mushrooms", 20),
            ("Onions", 14),
            ("Sausage", 12),
            ("Bacon", 9),
            ("Extra cheese", 6),
            ("Peppers", 4),
        ],
    ),
    (
        "Name something you bring on a camping trip.",
        &[
            ("Tent", 33),
            ("Sleeping bag", 26),
            ("Flashlight", 17),
            ("Food", 12),
            ("Water", 7),
            ("Bug spray", 5),
        ],
    ),
    (
        "Name a reason you might be late to work.",
        &[
            ("Traffic", 40),
            ("Overslept", 28),
            ("Car trouble", 12),
            ("Weather", 9),
            ("Public transit delay", 6),
            ("Child drop-off", 5),
        ],
    ),
    (
        "Name something you associate with pirates.",
        &[
            ("Treasure", 34),
            ("Ship", 22),
            ("Parrot", 18),
            ("Eye patch", 12),
            ("Hook", 8),
            ("Rum", 6),
        ],
    ),
    (
        "Name something people do while waiting in line.",
        &[
            ("Check phone", 39),
            ("Talk", 21),
            ("Listen to music", 13),
            ("People watch", 11),
            ("Read", 9),
            ("Fidget", 7),
        ],
    ),
    (
        "Name a household chore kids might do for allowance.",
        &[
            ("Dishes", 31),
            ("Taking out trash", 24),
            ("Vacuuming", 18),
            ("Laundry", 11),
            ("Mowing lawn", 9),
            ("Dusting", 7),
        ],
    ),
    (
        "Name something you need to make pancakes.",
        &[
            ("Flour", 30),
            ("Eggs", 25),
            ("Milk", 20),
            ("Syrup", 10),
            ("Butter", 9),
            ("Pan", 6),
        ],
    ),
    (
        "Name a popular board game.",
        &[
            ("Monopoly", 32),
            ("Scrabble", 21),
            ("Chess", 18),
            ("Clue", 12),
            ("Risk", 9),
            ("Settlers of Catan", 8),
        ],
    ),
];

const FAST_MONEY: &[Table] = &[&[
    (
        "Name a day of the week.",
        &[
            ("Friday", 42),
            ("Saturday", 28),
            ("Sunday", 15),
            ("Monday", 8),
            ("Wednesday", 4),
        ],
    ),
    (
        "Name a fruit you eat in the summer.",
        &[
            ("Watermelon", 55),
            ("Strawberry", 22),
            ("Peach", 11),
            ("Grape", 6),
            ("Cherry", 4),
        ],
    ),
    (
        "Name something you buy by the roll.",
        &[
            ("Toilet paper", 52),
            ("Paper towels", 24),
            ("Tape", 12),
            ("Wrapping paper", 7),
            ("Aluminum foil", 3),
        ],
    ),
    (
        "Name a reason people wake up at 2 AM.",
        &[
            ("Bathroom", 48),
            ("Baby crying", 21),
            ("Bad dream", 14),
            ("Thirsty", 9),
            ("Noise", 5),
        ],
    ),
    (
        "Name an animal you might see at the zoo.",
        &[
            ("Lion", 38),
            ("Monkey", 26),
            ("Elephant", 19),
            ("Tiger", 10),
            ("Bear", 5),
        ],
    ),
]];

fn build(table: Table) -> Vec<SurveyQuestion> {
    table
        .iter()
        .map(|(prompt, answers)| SurveyQuestion {
            prompt: prompt.to_string(),
            answers: answers
                .iter()
                .map(|(text, points)| SurveyAnswer {
                    text: text.to_string(),
                    points: *points,
                })
                .collect(),
        })
        .collect()
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self {
            surveys: build(SURVEYS),
            fast_money_sets: FAST_MONEY.iter().copied().map(build).collect(),
        }
    }
}

impl QuestionBank {
    /// Load a bank from a JSON file and validate it
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let raw = std::fs::read_to_string(path)?;
        let mut bank: QuestionBank = serde_json::from_str(&raw)?;
        bank.validate()?;
        bank.sort_answers();
        Ok(bank)
    }

    pub fn survey(&self, index: usize) -> Option<&SurveyQuestion> {
        self.surveys.get(index)
    }

    pub fn fast_money_set(&self, index: usize) -> Option<&[SurveyQuestion]> {
        self.fast_money_sets.get(index).map(Vec::as_slice)
    }

    fn validate(&self) -> Result<(), BankError> {
        if self.surveys.is_empty() {
            return Err(BankError::Invalid("no survey questions".to_string()));
        }
        let all = self
            .surveys
            .iter()
            .chain(self.fast_money_sets.iter().flatten());
        for question in all {
            if question.answers.is_empty() {
                return Err(BankError::Invalid(format!(
                    "question '{}' has no answers",
                    question.prompt
                )));
            }
            if let Some(answer) = question
                .answers
                .iter()
                .find(|a| a.points > MAX_ANSWER_POINTS)
            {
                return Err(BankError::Invalid(format!(
                    "answer '{}' has {} points, at most {} allowed",
                    answer.text, answer.points, MAX_ANSWER_POINTS
                )));
            }
        }
        if let Some((i, set)) = self
            .fast_money_sets
            .iter()
            .enumerate()
            .find(|(_, set)| set.len() != FAST_MONEY_QUESTIONS)
        {
            return Err(BankError::Invalid(format!(
                "fast money set {} has {} questions, expected {}",
                i,
                set.len(),
                FAST_MONEY_QUESTIONS
            )));
        }
        Ok(())
    }

    // Face-off ranking relies on descending point order
    fn sort_answers(&mut self) {
        let all = self
            .surveys
            .iter_mut()
            .chain(self.fast_money_sets.iter_mut().flatten());
        for question in all {
            question.answers.sort_by(|a, b| b.points.cmp(&a.points));
        }
    }
}
