//! Free-text answer matching

use crate::types::{RevealedAnswer, SurveyAnswer, SurveyQuestion};
use std::collections::HashSet;

pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Find the first unrevealed answer whose text contains the input.
///
/// Substring containment is intentionally loose: "pepper" finds "Pepperoni".
pub fn evaluate_answer<'q>(
    question: &'q SurveyQuestion,
    text: &str,
    revealed: &[RevealedAnswer],
) -> Option<&'q SurveyAnswer> {
    let needle = normalize(text);
    let already: HashSet<String> = revealed.iter().map(|r| normalize(&r.text)).collect();

    question.answers.iter().find(|answer| {
        let candidate = normalize(&answer.text);
        !already.contains(&candidate) && candidate.contains(&needle)
    })
}

/// 1-based rank of the answer the input matches, ignoring reveals
pub fn rank_answer(question: &SurveyQuestion, text: &str) -> Option<usize> {
    let matched = evaluate_answer(question, text, &[])?;
    question
        .answers
        .iter()
        .position(|answer| std::ptr::eq(answer, matched))
        .map(|i| i + 1)
}

/// Exact normalized match, used by fast money
pub fn exact_match<'q>(question: &'q SurveyQuestion, text: &str) -> Option<&'q SurveyAnswer> {
    let needle = normalize(text);
    question
        .answers
        .iter()
        .find(|answer| normalize(&answer.text) == needle)
}
