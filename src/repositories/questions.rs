use sqlx::PgPool;

use crate::db::models::Question;

const COLUMNS: &str = "id, exam_id, text, mark, position, created_at, updated_at";

pub(crate) struct CreateQuestion<'a> {
    pub(crate) id: &'a str,
    pub(crate) exam_id: &'a str,
    pub(crate) text: &'a str,
    pub(crate) mark: i32,
    pub(crate) position: i32,
    pub(crate) now: time::PrimitiveDateTime,
}

pub(crate) struct UpdateQuestion {
    pub(crate) text: Option<String>,
    pub(crate) mark: Option<i32>,
    pub(crate) position: Option<i32>,
    pub(crate) now: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateQuestion<'_>,
) -> Result<Question, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "INSERT INTO questions (id, exam_id, text, mark, position, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$6,$6)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.exam_id)
    .bind(params.text)
    .bind(params.mark)
    .bind(params.position)
    .bind(params.now)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    question_id: &str,
) -> Result<Option<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!("SELECT {COLUMNS} FROM questions WHERE id = $1"))
        .bind(question_id)
        .fetch_optional(pool)
        .await
}

/// Questions of an exam in display order; ties keep creation order.
pub(crate) async fn list_by_exam(
    executor: impl sqlx::PgExecutor<'_>,
    exam_id: &str,
) -> Result<Vec<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {COLUMNS} FROM questions WHERE exam_id = $1 ORDER BY position, created_at, id"
    ))
    .bind(exam_id)
    .fetch_all(executor)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    question_id: &str,
    params: UpdateQuestion,
) -> Result<Option<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "UPDATE questions SET
            text = COALESCE($1, text),
            mark = COALESCE($2, mark),
            position = COALESCE($3, position),
            updated_at = $4
         WHERE id = $5
         RETURNING {COLUMNS}",
    ))
    .bind(params.text)
    .bind(params.mark)
    .bind(params.position)
    .bind(params.now)
    .bind(question_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, question_id: &str) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM questions WHERE id = $1").bind(question_id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
