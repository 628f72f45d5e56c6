use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::Exam;

pub(crate) const COLUMNS: &str =
    "id, course_id, title, total_marks, created_by, created_at, updated_at";

pub(crate) struct CreateExam<'a> {
    pub(crate) id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) total_marks: Option<i32>,
    pub(crate) created_by: &'a str,
    pub(crate) now: time::PrimitiveDateTime,
}

pub(crate) struct UpdateExam {
    pub(crate) title: Option<String>,
    /// `None` leaves the column alone; `Some(None)` clears it.
    pub(crate) total_marks: Option<Option<i32>>,
    pub(crate) now: time::PrimitiveDateTime,
}

/// Aggregates computed from the exam's questions.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub(crate) struct ExamTotals {
    pub(crate) question_count: i64,
    pub(crate) question_marks_total: i32,
}

pub(crate) async fn create(pool: &PgPool, params: CreateExam<'_>) -> Result<Exam, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "INSERT INTO exams (id, course_id, title, total_marks, created_by, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$6,$6)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.title)
    .bind(params.total_marks)
    .bind(params.created_by)
    .bind(params.now)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
) -> Result<Option<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!("SELECT {COLUMNS} FROM exams WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn list(
    pool: &PgPool,
    course_id: Option<&str>,
    skip: i64,
    limit: i64,
) -> Result<Vec<Exam>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM exams"));
    if let Some(course_id) = course_id {
        builder.push(" WHERE course_id = ");
        builder.push_bind(course_id);
    }
    builder.push(" ORDER BY created_at DESC OFFSET ");
    builder.push_bind(skip.max(0));
    builder.push(" LIMIT ");
    builder.push_bind(limit.clamp(1, 1000));

    builder.build_query_as::<Exam>().fetch_all(pool).await
}

pub(crate) async fn count(pool: &PgPool, course_id: Option<&str>) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM exams");
    if let Some(course_id) = course_id {
        builder.push(" WHERE course_id = ");
        builder.push_bind(course_id);
    }
    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

pub(crate) async fn totals(
    executor: impl sqlx::PgExecutor<'_>,
    exam_id: &str,
) -> Result<ExamTotals, sqlx::Error> {
    sqlx::query_as::<_, ExamTotals>(
        "SELECT COUNT(*) AS question_count,
                COALESCE(SUM(mark), 0)::INTEGER AS question_marks_total
         FROM questions WHERE exam_id = $1",
    )
    .bind(exam_id)
    .fetch_one(executor)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    id: &str,
    params: UpdateExam,
) -> Result<Option<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "UPDATE exams SET
            title = COALESCE($1, title),
            total_marks = CASE WHEN $2 THEN $3 ELSE total_marks END,
            updated_at = $4
         WHERE id = $5
         RETURNING {COLUMNS}",
    ))
    .bind(params.title)
    .bind(params.total_marks.is_some())
    .bind(params.total_marks.flatten())
    .bind(params.now)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM exams WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn list_titles_by_ids(
    pool: &PgPool,
    exam_ids: &[String],
) -> Result<Vec<(String, String)>, sqlx::Error> {
    if exam_ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, (String, String)>("SELECT id, title FROM exams WHERE id = ANY($1)")
        .bind(exam_ids)
        .fetch_all(pool)
        .await
}
