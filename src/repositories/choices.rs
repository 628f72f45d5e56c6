use sqlx::PgPool;

use crate::db::models::AnswerChoice;

const COLUMNS: &str = "id, question_id, text, is_correct, created_at, updated_at";

pub(crate) struct CreateChoice<'a> {
    pub(crate) id: &'a str,
    pub(crate) question_id: &'a str,
    pub(crate) text: &'a str,
    pub(crate) is_correct: bool,
    pub(crate) now: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateChoice<'_>,
) -> Result<AnswerChoice, sqlx::Error> {
    sqlx::query_as::<_, AnswerChoice>(&format!(
        "INSERT INTO answer_choices (id, question_id, text, is_correct, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$5)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.question_id)
    .bind(params.text)
    .bind(params.is_correct)
    .bind(params.now)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    choice_id: &str,
) -> Result<Option<AnswerChoice>, sqlx::Error> {
    sqlx::query_as::<_, AnswerChoice>(&format!(
        "SELECT {COLUMNS} FROM answer_choices WHERE id = $1"
    ))
    .bind(choice_id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn list_by_question(
    pool: &PgPool,
    question_id: &str,
) -> Result<Vec<AnswerChoice>, sqlx::Error> {
    sqlx::query_as::<_, AnswerChoice>(&format!(
        "SELECT {COLUMNS} FROM answer_choices WHERE question_id = $1 ORDER BY created_at, id"
    ))
    .bind(question_id)
    .fetch_all(pool)
    .await
}

/// Every choice of every question in the exam.
pub(crate) async fn list_by_exam(
    executor: impl sqlx::PgExecutor<'_>,
    exam_id: &str,
) -> Result<Vec<AnswerChoice>, sqlx::Error> {
    sqlx::query_as::<_, AnswerChoice>(
        "SELECT c.id, c.question_id, c.text, c.is_correct, c.created_at, c.updated_at
         FROM answer_choices c
         JOIN questions q ON q.id = c.question_id
         WHERE q.exam_id = $1
         ORDER BY c.created_at, c.id",
    )
    .bind(exam_id)
    .fetch_all(executor)
    .await
}

pub(crate) async fn update(
    executor: impl sqlx::PgExecutor<'_>,
    choice_id: &str,
    text: Option<String>,
    is_correct: Option<bool>,
    now: time::PrimitiveDateTime,
) -> Result<Option<AnswerChoice>, sqlx::Error> {
    sqlx::query_as::<_, AnswerChoice>(&format!(
        "UPDATE answer_choices SET
            text = COALESCE($1, text),
            is_correct = COALESCE($2, is_correct),
            updated_at = $3
         WHERE id = $4
         RETURNING {COLUMNS}",
    ))
    .bind(text)
    .bind(is_correct)
    .bind(now)
    .bind(choice_id)
    .fetch_optional(executor)
    .await
}

/// Clears the correct flag on the question's choices other than `keep_id`.
pub(crate) async fn clear_other_correct(
    executor: impl sqlx::PgExecutor<'_>,
    question_id: &str,
    keep_id: &str,
    now: time::PrimitiveDateTime,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE answer_choices SET is_correct = FALSE, updated_at = $1
         WHERE question_id = $2 AND id <> $3 AND is_correct",
    )
    .bind(now)
    .bind(question_id)
    .bind(keep_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub(crate) async fn delete(pool: &PgPool, choice_id: &str) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM answer_choices WHERE id = $1").bind(choice_id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
