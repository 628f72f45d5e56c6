//! Grading rules for single-correct-choice exams.
//!
//! Everything here is pure: callers load questions and choices, and the
//! functions decide what gets written. A selection is correct only when it
//! points at a choice of that same question flagged `is_correct`; a correct
//! answer earns the full question mark, anything else earns zero.

use std::collections::HashMap;

use crate::db::models::{AnswerChoice, Question};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ScoringError {
    #[error("Question {0} is not part of this exam")]
    UnknownQuestion(String),
    #[error("Choice {choice_id} does not belong to question {question_id}")]
    ForeignChoice { question_id: String, choice_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GradedAnswer {
    pub(crate) question_id: String,
    pub(crate) selected_choice_id: Option<String>,
    pub(crate) is_correct: bool,
    pub(crate) earned_mark: i32,
}

/// Grades one answer row per question, in question order.
///
/// Questions missing from `selections`, or mapped to `None` or an empty id,
/// produce an unselected row. Any key that is not one of `questions` fails the
/// whole batch.
pub(crate) fn grade_answers(
    questions: &[Question],
    choices: &[AnswerChoice],
    selections: &HashMap<String, Option<String>>,
) -> Result<Vec<GradedAnswer>, ScoringError> {
    let mut unknown: Vec<&String> = selections
        .keys()
        .filter(|key| !questions.iter().any(|question| &question.id == *key))
        .collect();
    unknown.sort();
    if let Some(key) = unknown.first() {
        return Err(ScoringError::UnknownQuestion((*key).clone()));
    }

    questions
        .iter()
        .map(|question| {
            let selected = selections
                .get(&question.id)
                .and_then(|value| value.as_deref())
                .filter(|value| !value.is_empty());
            grade_one(question, choices, selected)
        })
        .collect()
}

fn grade_one(
    question: &Question,
    choices: &[AnswerChoice],
    selected: Option<&str>,
) -> Result<GradedAnswer, ScoringError> {
    let Some(choice_id) = selected else {
        return Ok(GradedAnswer {
            question_id: question.id.clone(),
            selected_choice_id: None,
            is_correct: false,
            earned_mark: 0,
        });
    };

    let choice = choices
        .iter()
        .find(|choice| choice.id == choice_id && choice.question_id == question.id)
        .ok_or_else(|| ScoringError::ForeignChoice {
            question_id: question.id.clone(),
            choice_id: choice_id.to_string(),
        })?;

    Ok(GradedAnswer {
        question_id: question.id.clone(),
        selected_choice_id: Some(choice.id.clone()),
        is_correct: choice.is_correct,
        earned_mark: if choice.is_correct { question.mark } else { 0 },
    })
}

/// Summed in `i64` so no combination of stored marks can overflow.
pub(crate) fn total_earned(answers: &[GradedAnswer]) -> i64 {
    answers.iter().map(|answer| i64::from(answer.earned_mark)).sum()
}

pub(crate) fn full_mark(questions: &[Question]) -> i64 {
    questions.iter().map(|question| i64::from(question.mark)).sum()
}

/// The correct choice of a question, if exactly one choice is flagged.
pub(crate) fn correct_choice<'a>(
    question_id: &str,
    choices: &'a [AnswerChoice],
) -> Option<&'a AnswerChoice> {
    let mut flagged =
        choices.iter().filter(|choice| choice.question_id == question_id && choice.is_correct);
    match (flagged.next(), flagged.next()) {
        (Some(choice), None) => Some(choice),
        _ => None,
    }
}
