use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::extract::JsonBody;
use crate::models::Task;
use crate::routes::auth::MessageResponse;
use crate::state::SharedState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    pub title: Option<String>,
    /// Absent keeps the stored description, `null` clears it.
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found!".to_string())
}

/// Ids that do not parse cannot name a stored task.
fn parse_task_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| task_not_found())
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    JsonBody(req): JsonBody<CreateTask>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }

    let task = db::tasks::create(
        &state.pool,
        auth.user_id,
        &req.title,
        req.description.as_deref(),
        req.due_date,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = db::tasks::list_by_owner(&state.pool, auth.user_id).await?;
    Ok(Json(tasks))
}

pub async fn list_by_status(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = db::tasks::list_by_owner_and_status(&state.pool, auth.user_id, &status).await?;
    Ok(Json(tasks))
}

// Update and delete match on the task id alone; the caller only has to be
// authenticated, not the owner.
pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateTask>,
) -> Result<Json<Task>, AppError> {
    let id = parse_task_id(&id)?;

    let task = db::tasks::update_unscoped(
        &state.pool,
        id,
        req.title.as_deref(),
        req.description.as_ref().map(|d| d.as_deref()),
        req.due_date,
        req.status.as_deref(),
    )
    .await?
    .ok_or_else(task_not_found)?;

    if task.user_id != auth.user_id {
        tracing::warn!("User {} updated task {id} owned by {}", auth.user_id, task.user_id);
    }

    Ok(Json(task))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_task_id(&id)?;

    if !db::tasks::delete_unscoped(&state.pool, id).await? {
        return Err(task_not_found());
    }

    tracing::debug!("User {} deleted task {id}", auth.user_id);

    Ok(MessageResponse::new("Task deleted successfully!"))
}
