use crate::db::models::AttemptAnswer;

const COLUMNS: &str =
    "id, attempt_id, question_id, selected_choice_id, is_correct, earned_mark, updated_at";

pub(crate) struct UpsertAnswer<'a> {
    pub(crate) id: &'a str,
    pub(crate) attempt_id: &'a str,
    pub(crate) question_id: &'a str,
    pub(crate) selected_choice_id: Option<&'a str>,
    pub(crate) is_correct: bool,
    pub(crate) earned_mark: i32,
    pub(crate) now: time::PrimitiveDateTime,
}

/// One row per (attempt, question); a repeated save overwrites the previous selection.
pub(crate) async fn upsert(
    executor: impl sqlx::PgExecutor<'_>,
    params: UpsertAnswer<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO attempt_answers (
            id, attempt_id, question_id, selected_choice_id, is_correct, earned_mark, updated_at
         )
         VALUES ($1,$2,$3,$4,$5,$6,$7)
         ON CONFLICT (attempt_id, question_id) DO UPDATE SET
            selected_choice_id = EXCLUDED.selected_choice_id,
            is_correct = EXCLUDED.is_correct,
            earned_mark = EXCLUDED.earned_mark,
            updated_at = EXCLUDED.updated_at",
    )
    .bind(params.id)
    .bind(params.attempt_id)
    .bind(params.question_id)
    .bind(params.selected_choice_id)
    .bind(params.is_correct)
    .bind(params.earned_mark)
    .bind(params.now)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) async fn list_by_attempt(
    executor: impl sqlx::PgExecutor<'_>,
    attempt_id: &str,
) -> Result<Vec<AttemptAnswer>, sqlx::Error> {
    sqlx::query_as::<_, AttemptAnswer>(&format!(
        "SELECT {COLUMNS} FROM attempt_answers WHERE attempt_id = $1"
    ))
    .bind(attempt_id)
    .fetch_all(executor)
    .await
}
