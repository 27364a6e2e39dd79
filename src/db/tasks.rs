use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{DueTask, Task};

pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    title: &str,
    description: Option<&str>,
    due_date: DateTime<Utc>,
) -> Result<Task, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "INSERT INTO tasks (user_id, title, description, due_date)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(user_id)
    .bind(title)
    .bind(description)
    .bind(due_date)
    .fetch_one(pool)
    .await
}

pub async fn list_by_owner(pool: &PgPool, user_id: Uuid) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE user_id = $1 ORDER BY due_date")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

/// Exact, case-sensitive match on `status`.
pub async fn list_by_owner_and_status(
    pool: &PgPool,
    user_id: Uuid,
    status: &str,
) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "SELECT * FROM tasks WHERE user_id = $1 AND status = $2 ORDER BY due_date",
    )
    .bind(user_id)
    .bind(status)
    .fetch_all(pool)
    .await
}

/// Unscoped update: matches on id alone, whoever owns the task. `None` keeps
/// the stored value; `Some(None)` clears the description.
pub async fn update_unscoped(
    pool: &PgPool,
    id: Uuid,
    title: Option<&str>,
    description: Option<Option<&str>>,
    due_date: Option<DateTime<Utc>>,
    status: Option<&str>,
) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "UPDATE tasks SET
            title = COALESCE($2, title),
            description = CASE WHEN $3 THEN $4 ELSE description END,
            due_date = COALESCE($5, due_date),
            status = COALESCE($6, status)
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(title)
    .bind(description.is_some())
    .bind(description.flatten())
    .bind(due_date)
    .bind(status)
    .fetch_optional(pool)
    .await
}

/// Unscoped delete. Returns whether a row was removed.
pub async fn delete_unscoped(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Tasks with `start <= due_date <= end`, across all owners.
pub async fn due_between(
    pool: &PgPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<DueTask>, sqlx::Error> {
    sqlx::query_as::<_, DueTask>(
        "SELECT t.id AS task_id, t.title, t.due_date,
                u.name AS owner_name, u.email AS owner_email, u.phone AS owner_phone
         FROM tasks t
         JOIN users u ON u.id = t.user_id
         WHERE t.due_date >= $1 AND t.due_date <= $2
         ORDER BY t.due_date",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}
