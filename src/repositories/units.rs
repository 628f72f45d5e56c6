use sqlx::PgPool;

use crate::db::models::Unit;

const COLUMNS: &str = "id, course_id, title, position, created_at, updated_at";

pub(crate) struct CreateUnit<'a> {
    pub(crate) id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) position: i32,
    pub(crate) now: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateUnit<'_>) -> Result<Unit, sqlx::Error> {
    sqlx::query_as::<_, Unit>(&format!(
        "INSERT INTO units (id, course_id, title, position, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$5)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.title)
    .bind(params.position)
    .bind(params.now)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, unit_id: &str) -> Result<Option<Unit>, sqlx::Error> {
    sqlx::query_as::<_, Unit>(&format!("SELECT {COLUMNS} FROM units WHERE id = $1"))
        .bind(unit_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_by_course(
    pool: &PgPool,
    course_id: &str,
) -> Result<Vec<Unit>, sqlx::Error> {
    sqlx::query_as::<_, Unit>(&format!(
        "SELECT {COLUMNS} FROM units WHERE course_id = $1 ORDER BY position, created_at"
    ))
    .bind(course_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    unit_id: &str,
    title: Option<String>,
    position: Option<i32>,
    now: time::PrimitiveDateTime,
) -> Result<Option<Unit>, sqlx::Error> {
    sqlx::query_as::<_, Unit>(&format!(
        "UPDATE units SET
            title = COALESCE($1, title),
            position = COALESCE($2, position),
            updated_at = $3
         WHERE id = $4
         RETURNING {COLUMNS}",
    ))
    .bind(title)
    .bind(position)
    .bind(now)
    .bind(unit_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, unit_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM units WHERE id = $1").bind(unit_id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
