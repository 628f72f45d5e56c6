use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use crate::core::time::format_primitive;
use crate::db::models::{AnswerChoice, Exam, Question};
use crate::repositories::exams::ExamTotals;

/// Question marks are stored as SMALLINT-sized values so exam totals stay within `i32`.
pub(crate) const MAX_QUESTION_MARK: i32 = 32_767;

#[derive(Debug, Deserialize)]
pub(crate) struct ExamListQuery {
    #[serde(default)]
    pub(crate) course_id: Option<String>,
    #[serde(default)]
    pub(crate) skip: i64,
    #[serde(default = "crate::api::pagination::default_limit")]
    pub(crate) limit: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ExamCreate {
    #[serde(alias = "courseId")]
    pub(crate) course_id: String,
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub(crate) title: String,
    #[serde(default)]
    #[serde(alias = "totalMarks")]
    #[validate(range(min = 0, message = "total_marks must be non-negative"))]
    pub(crate) total_marks: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_exam_update"))]
pub(crate) struct ExamUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub(crate) title: Option<String>,
    /// Absent keeps the declared total, `null` clears it.
    #[serde(default, alias = "totalMarks", deserialize_with = "deserialize_explicit_null")]
    pub(crate) total_marks: Option<Option<i32>>,
}

fn validate_exam_update(update: &ExamUpdate) -> Result<(), ValidationError> {
    match update.total_marks {
        Some(Some(total)) if total < 0 => Err(ValidationError::new("total_marks")
            .with_message("total_marks must be non-negative".into())),
        _ => Ok(()),
    }
}

fn deserialize_explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
pub(crate) struct ExamResponse {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) total_marks: Option<i32>,
    pub(crate) created_by: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) question_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) question_marks_total: Option<i32>,
}

impl ExamResponse {
    pub(crate) fn from_db(exam: Exam) -> Self {
        Self {
            id: exam.id,
            course_id: exam.course_id,
            title: exam.title,
            total_marks: exam.total_marks,
            created_by: exam.created_by,
            created_at: format_primitive(exam.created_at),
            updated_at: format_primitive(exam.updated_at),
            question_count: None,
            question_marks_total: None,
        }
    }

    pub(crate) fn with_totals(mut self, totals: ExamTotals) -> Self {
        self.question_count = Some(totals.question_count);
        self.question_marks_total = Some(totals.question_marks_total);
        self
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuestionCreate {
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub(crate) text: String,
    #[validate(range(
        min = 1,
        max = MAX_QUESTION_MARK,
        message = "mark must be between 1 and 32767"
    ))]
    pub(crate) mark: i32,
    #[serde(default)]
    #[serde(alias = "order")]
    #[validate(range(min = 0, message = "position must be non-negative"))]
    pub(crate) position: i32,
    #[serde(default)]
    #[validate(nested)]
    pub(crate) choices: Vec<ChoiceCreate>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuestionUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub(crate) text: Option<String>,
    #[serde(default)]
    #[validate(range(
        min = 1,
        max = MAX_QUESTION_MARK,
        message = "mark must be between 1 and 32767"
    ))]
    pub(crate) mark: Option<i32>,
    #[serde(default)]
    #[serde(alias = "order")]
    #[validate(range(min = 0, message = "position must be non-negative"))]
    pub(crate) position: Option<i32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionResponse {
    pub(crate) id: String,
    pub(crate) exam_id: String,
    pub(crate) text: String,
    pub(crate) mark: i32,
    pub(crate) position: i32,
    pub(crate) choices: Vec<ChoiceResponse>,
    pub(crate) created_at: String,
}

impl QuestionResponse {
    pub(crate) fn from_db(question: Question, choices: Vec<ChoiceResponse>) -> Self {
        Self {
            id: question.id,
            exam_id: question.exam_id,
            text: question.text,
            mark: question.mark,
            position: question.position,
            choices,
            created_at: format_primitive(question.created_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ChoiceCreate {
    #[validate(length(min = 1, max = 255, message = "text must be 1-255 characters"))]
    pub(crate) text: String,
    #[serde(default)]
    #[serde(alias = "isCorrect")]
    pub(crate) is_correct: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ChoiceUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "text must be 1-255 characters"))]
    pub(crate) text: Option<String>,
    #[serde(default)]
    #[serde(alias = "isCorrect")]
    pub(crate) is_correct: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChoiceResponse {
    pub(crate) id: String,
    pub(crate) question_id: String,
    pub(crate) text: String,
    pub(crate) is_correct: bool,
}

impl ChoiceResponse {
    pub(crate) fn from_db(choice: AnswerChoice) -> Self {
        Self {
            id: choice.id,
            question_id: choice.question_id,
            text: choice.text,
            is_correct: choice.is_correct,
        }
    }
}
