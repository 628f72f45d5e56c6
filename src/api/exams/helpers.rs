use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::db::models::{AnswerChoice, Exam, Question};
use crate::repositories;
use crate::schemas::exam::{ChoiceResponse, QuestionResponse};

pub(super) async fn fetch_exam(state: &AppState, exam_id: &str) -> Result<Exam, ApiError> {
    repositories::exams::find_by_id(state.db(), exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch exam"))?
        .ok_or_else(|| ApiError::NotFound("Exam not found".to_string()))
}

pub(super) async fn fetch_question(
    state: &AppState,
    question_id: &str,
) -> Result<Question, ApiError> {
    repositories::questions::find_by_id(state.db(), question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch question"))?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))
}

/// Pairs each question with its own choices, keeping question order.
pub(super) fn questions_with_choices(
    questions: Vec<Question>,
    choices: Vec<AnswerChoice>,
) -> Vec<QuestionResponse> {
    let mut remaining = choices;
    questions
        .into_iter()
        .map(|question| {
            let (own, rest): (Vec<_>, Vec<_>) =
                remaining.drain(..).partition(|choice| choice.question_id == question.id);
            remaining = rest;
            QuestionResponse::from_db(question, own.into_iter().map(ChoiceResponse::from_db).collect())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn question(id: &str, position: i32) -> Question {
        Question {
            id: id.to_string(),
            exam_id: "e1".to_string(),
            text: id.to_uppercase(),
            mark: 1,
            position,
            created_at: datetime!(2025-02-01 8:00),
            updated_at: datetime!(2025-02-01 8:00),
        }
    }

    fn choice(id: &str, question_id: &str) -> AnswerChoice {
        AnswerChoice {
            id: id.to_string(),
            question_id: question_id.to_string(),
            text: id.to_string(),
            is_correct: false,
            created_at: datetime!(2025-02-01 8:00),
            updated_at: datetime!(2025-02-01 8:00),
        }
    }

    #[test]
    fn choices_are_grouped_under_their_question() {
        let grouped = questions_with_choices(
            vec![question("q1", 0), question("q2", 1)],
            vec![choice("a", "q2"), choice("b", "q1"), choice("c", "q2")],
        );

        assert_eq!(grouped[0].id, "q1");
        assert_eq!(grouped[0].choices.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(), ["b"]);
        assert_eq!(
            grouped[1].choices.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
            ["a", "c"]
        );
    }
}
