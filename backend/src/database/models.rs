//! Rust structs that represent database table mappings.
//!
//! These are the rows as stored, plus the small write/query parameter
//! structs the stores accept. API-facing response shapes live next to their
//! handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account role. Everything a caller may do is derived from this.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Manager,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Manager => f.write_str("manager"),
        }
    }
}

/// A user row. The password hash never leaves the backend.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Parameters for inserting a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// A stored refresh token. The signed token string itself is the lookup
/// key; rotation keeps at most one live row per user.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Task workflow state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "text", rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    ToDo,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "to-do",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }
}

/// A task row.
#[derive(Debug, Clone, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub assigned_to: Uuid,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Parameters for inserting a task.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub assigned_to: Uuid,
    pub created_by: Uuid,
}

/// Field updates for a task. `assigned_to` is `None` when the caller does
/// not reassign.
#[derive(Debug, Clone)]
pub struct TaskChanges {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub assigned_to: Option<Uuid>,
}

/// Visibility filter for task listings. Both `None` means unrestricted.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFilter {
    pub assigned_to: Option<Uuid>,
    pub status: Option<TaskStatus>,
}

/// A user reference embedded in task responses: id plus display name.
#[derive(Debug, Clone, Serialize)]
pub struct UserRef {
    pub id: Uuid,
    pub username: String,
}

/// A task joined with the usernames of its assignee and creator, the shape
/// the API returns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetail {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub assigned_to: UserRef,
    pub created_by: UserRef,
    pub created_at: DateTime<Utc>,
}

/// 1-based pagination window.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: u64,
    pub limit: u64,
}

impl Page {
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1) * self.limit
    }

    /// Total number of pages for `total` rows.
    pub fn pages(&self, total: u64) -> u64 {
        if self.limit == 0 {
            0
        } else {
            total.div_ceil(self.limit)
        }
    }
}
