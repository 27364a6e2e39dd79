use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// A task inside the reminder window, joined with its owner's contact details.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DueTask {
    pub task_id: Uuid,
    pub title: String,
    pub due_date: DateTime<Utc>,
    pub owner_name: String,
    pub owner_email: String,
    pub owner_phone: Option<String>,
}
