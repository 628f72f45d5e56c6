use sqlx::PgPool;

use crate::db::models::{Course, Enrollment};

const COLUMNS: &str = "id, user_id, course_id, enrolled_at";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CourseEnrollmentRow {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) username: String,
    pub(crate) full_name: String,
    pub(crate) enrolled_at: time::PrimitiveDateTime,
}

/// Idempotent: enrolling twice returns the existing row.
pub(crate) async fn ensure(
    pool: &PgPool,
    id: &str,
    user_id: &str,
    course_id: &str,
    now: time::PrimitiveDateTime,
) -> Result<Enrollment, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "INSERT INTO enrollments (id, user_id, course_id, enrolled_at)
         VALUES ($1,$2,$3,$4)
         ON CONFLICT (user_id, course_id) DO UPDATE SET user_id = EXCLUDED.user_id
         RETURNING {COLUMNS}",
    ))
    .bind(id)
    .bind(user_id)
    .bind(course_id)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete(
    pool: &PgPool,
    user_id: &str,
    course_id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM enrollments WHERE user_id = $1 AND course_id = $2")
        .bind(user_id)
        .bind(course_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn list_courses_for_user(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        "SELECT c.id, c.name, c.grade, c.created_by, c.created_at, c.updated_at
         FROM courses c
         JOIN enrollments e ON e.course_id = c.id
         WHERE e.user_id = $1
         ORDER BY c.grade, c.name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_for_course(
    pool: &PgPool,
    course_id: &str,
) -> Result<Vec<CourseEnrollmentRow>, sqlx::Error> {
    sqlx::query_as::<_, CourseEnrollmentRow>(
        "SELECT e.id, e.user_id, u.username, u.full_name, e.enrolled_at
         FROM enrollments e
         JOIN users u ON u.id = e.user_id
         WHERE e.course_id = $1
         ORDER BY u.full_name, u.username",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
}
