use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::ExamAttempt;
use crate::db::types::AttemptStatus;

pub(crate) const COLUMNS: &str = "\
    id, user_id, exam_id, status, started_at, submitted_at, full_mark, user_mark, updated_at";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AttemptListRow {
    pub(crate) id: String,
    pub(crate) exam_id: String,
    pub(crate) exam_title: String,
    pub(crate) status: AttemptStatus,
    pub(crate) started_at: time::PrimitiveDateTime,
    pub(crate) submitted_at: Option<time::PrimitiveDateTime>,
    pub(crate) full_mark: i32,
    pub(crate) user_mark: i32,
}

/// Serializes start requests for one (exam, user) pair until the transaction ends.
pub(crate) async fn acquire_start_lock(
    executor: impl sqlx::PgExecutor<'_>,
    exam_id: &str,
    user_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1 || ':' || $2))")
        .bind(exam_id)
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub(crate) async fn find_in_progress(
    executor: impl sqlx::PgExecutor<'_>,
    exam_id: &str,
    user_id: &str,
) -> Result<Option<ExamAttempt>, sqlx::Error> {
    sqlx::query_as::<_, ExamAttempt>(&format!(
        "SELECT {COLUMNS} FROM exam_attempts
         WHERE exam_id = $1 AND user_id = $2 AND status = $3"
    ))
    .bind(exam_id)
    .bind(user_id)
    .bind(AttemptStatus::InProgress)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn find_latest_submitted(
    executor: impl sqlx::PgExecutor<'_>,
    exam_id: &str,
    user_id: &str,
) -> Result<Option<ExamAttempt>, sqlx::Error> {
    sqlx::query_as::<_, ExamAttempt>(&format!(
        "SELECT {COLUMNS} FROM exam_attempts
         WHERE exam_id = $1 AND user_id = $2 AND status = $3
         ORDER BY submitted_at DESC, id DESC
         LIMIT 1"
    ))
    .bind(exam_id)
    .bind(user_id)
    .bind(AttemptStatus::Submitted)
    .fetch_optional(executor)
    .await
}

/// Owner-scoped lookup; another user's attempt reads as missing.
pub(crate) async fn find_for_user(
    executor: impl sqlx::PgExecutor<'_>,
    attempt_id: &str,
    user_id: &str,
) -> Result<Option<ExamAttempt>, sqlx::Error> {
    sqlx::query_as::<_, ExamAttempt>(&format!(
        "SELECT {COLUMNS} FROM exam_attempts WHERE id = $1 AND user_id = $2"
    ))
    .bind(attempt_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn lock_for_user(
    executor: impl sqlx::PgExecutor<'_>,
    attempt_id: &str,
    user_id: &str,
) -> Result<Option<ExamAttempt>, sqlx::Error> {
    sqlx::query_as::<_, ExamAttempt>(&format!(
        "SELECT {COLUMNS} FROM exam_attempts WHERE id = $1 AND user_id = $2 FOR UPDATE"
    ))
    .bind(attempt_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

pub(crate) struct CreateAttempt<'a> {
    pub(crate) id: &'a str,
    pub(crate) user_id: &'a str,
    pub(crate) exam_id: &'a str,
    pub(crate) full_mark: i32,
    pub(crate) now: time::PrimitiveDateTime,
}

/// Returns false when an in-progress attempt for the pair already exists.
pub(crate) async fn create_in_progress(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateAttempt<'_>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO exam_attempts (
            id, user_id, exam_id, status, started_at, submitted_at, full_mark, user_mark, updated_at
         )
         VALUES ($1,$2,$3,$4,$5,NULL,$6,0,$5)
         ON CONFLICT (user_id, exam_id) WHERE status = 'in_progress' DO NOTHING",
    )
    .bind(params.id)
    .bind(params.user_id)
    .bind(params.exam_id)
    .bind(AttemptStatus::InProgress)
    .bind(params.now)
    .bind(params.full_mark)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Stores `SUM(earned_mark)` as the attempt's score while it is still in progress.
pub(crate) async fn recompute_user_mark(
    executor: impl sqlx::PgExecutor<'_>,
    attempt_id: &str,
    now: time::PrimitiveDateTime,
) -> Result<Option<ExamAttempt>, sqlx::Error> {
    sqlx::query_as::<_, ExamAttempt>(&format!(
        "UPDATE exam_attempts SET
            user_mark = (
                SELECT COALESCE(SUM(earned_mark), 0)::INTEGER
                FROM attempt_answers WHERE attempt_id = $1
            ),
            updated_at = $2
         WHERE id = $1 AND status = $3
         RETURNING {COLUMNS}"
    ))
    .bind(attempt_id)
    .bind(now)
    .bind(AttemptStatus::InProgress)
    .fetch_optional(executor)
    .await
}

/// Final scoring and status transition in one statement.
pub(crate) async fn submit(
    executor: impl sqlx::PgExecutor<'_>,
    attempt_id: &str,
    now: time::PrimitiveDateTime,
) -> Result<Option<ExamAttempt>, sqlx::Error> {
    sqlx::query_as::<_, ExamAttempt>(&format!(
        "UPDATE exam_attempts SET
            user_mark = (
                SELECT COALESCE(SUM(earned_mark), 0)::INTEGER
                FROM attempt_answers WHERE attempt_id = $1
            ),
            status = $2,
            submitted_at = $3,
            updated_at = $3
         WHERE id = $1 AND status = $4
         RETURNING {COLUMNS}"
    ))
    .bind(attempt_id)
    .bind(AttemptStatus::Submitted)
    .bind(now)
    .bind(AttemptStatus::InProgress)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn list_by_user(
    pool: &PgPool,
    user_id: &str,
    status: Option<AttemptStatus>,
    skip: i64,
    limit: i64,
) -> Result<Vec<AttemptListRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT a.id,
                a.exam_id,
                e.title AS exam_title,
                a.status,
                a.started_at,
                a.submitted_at,
                a.full_mark,
                a.user_mark
         FROM exam_attempts a
         JOIN exams e ON e.id = a.exam_id
         WHERE a.user_id = ",
    );
    builder.push_bind(user_id);

    if let Some(status) = status {
        builder.push(" AND a.status = ");
        builder.push_bind(status);
    }

    builder.push(" ORDER BY a.started_at DESC, a.id DESC OFFSET ");
    builder.push_bind(skip.max(0));
    builder.push(" LIMIT ");
    builder.push_bind(limit.clamp(1, 1000));

    builder.build_query_as::<AttemptListRow>().fetch_all(pool).await
}

pub(crate) async fn count_by_user(
    pool: &PgPool,
    user_id: &str,
    status: Option<AttemptStatus>,
) -> Result<i64, sqlx::Error> {
    let mut builder =
        QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM exam_attempts WHERE user_id = ");
    builder.push_bind(user_id);

    if let Some(status) = status {
        builder.push(" AND status = ");
        builder.push_bind(status);
    }

    builder.build_query_scalar::<i64>().fetch_one(pool).await
}
