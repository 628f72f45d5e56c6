use sqlx::PgPool;

use crate::db::models::Lesson;

const COLUMNS: &str = "id, unit_id, title, position, content, created_at, updated_at";

pub(crate) struct CreateLesson<'a> {
    pub(crate) id: &'a str,
    pub(crate) unit_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) position: i32,
    pub(crate) content: &'a str,
    pub(crate) now: time::PrimitiveDateTime,
}

pub(crate) struct UpdateLesson {
    pub(crate) title: Option<String>,
    pub(crate) position: Option<i32>,
    pub(crate) content: Option<String>,
    pub(crate) now: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateLesson<'_>) -> Result<Lesson, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!(
        "INSERT INTO lessons (id, unit_id, title, position, content, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$6,$6)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.unit_id)
    .bind(params.title)
    .bind(params.position)
    .bind(params.content)
    .bind(params.now)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    lesson_id: &str,
) -> Result<Option<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!("SELECT {COLUMNS} FROM lessons WHERE id = $1"))
        .bind(lesson_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_by_unit(pool: &PgPool, unit_id: &str) -> Result<Vec<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!(
        "SELECT {COLUMNS} FROM lessons WHERE unit_id = $1 ORDER BY position, created_at"
    ))
    .bind(unit_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    lesson_id: &str,
    params: UpdateLesson,
) -> Result<Option<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!(
        "UPDATE lessons SET
            title = COALESCE($1, title),
            position = COALESCE($2, position),
            content = COALESCE($3, content),
            updated_at = $4
         WHERE id = $5
         RETURNING {COLUMNS}",
    ))
    .bind(params.title)
    .bind(params.position)
    .bind(params.content)
    .bind(params.now)
    .bind(lesson_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, lesson_id: &str) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM lessons WHERE id = $1").bind(lesson_id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
