//! Handler functions for task CRUD endpoints.
//!
//! Visibility is role-scoped: managers operate on every task, plain users
//! only on tasks assigned to them, and only managers may create, delete,
//! or reassign.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::{AuthUser, Manager};
use crate::database::models::{NewTask, Page, Role, TaskChanges, TaskDetail, TaskFilter, TaskStatus};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub status: Option<TaskStatus>,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    10
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListResponse {
    pub tasks: Vec<TaskDetail>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(length(min = 3, max = 100, message = "Title must be 3 to 100 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,

    #[serde(default)]
    pub status: TaskStatus,

    pub assigned_to: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(length(min = 3, max = 100, message = "Title must be 3 to 100 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,

    #[serde(default)]
    pub status: TaskStatus,

    /// Present only when the caller reassigns the task; manager-only.
    pub assigned_to: Option<Uuid>,
}

pub async fn list_tasks(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<TaskListResponse>, AppError> {
    let filter = TaskFilter {
        // Managers see everything; everyone else only their own tasks.
        assigned_to: (user.role != Role::Manager).then_some(user.id),
        status: query.status,
    };
    let page = Page {
        page: query.page,
        limit: query.limit,
    };

    let (tasks, total) = state.tasks.list(filter, page).await?;
    tracing::info!(user_id = %user.id, page = query.page, "tasks fetched");

    Ok(Json(TaskListResponse {
        tasks,
        total,
        page: page.page,
        pages: page.pages(total),
    }))
}

pub async fn create_task(
    State(state): State<AppState>,
    Manager(manager): Manager,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskDetail>), AppError> {
    payload.validate()?;

    let task = state
        .tasks
        .insert(NewTask {
            title: payload.title,
            description: payload.description,
            status: payload.status,
            assigned_to: payload.assigned_to,
            created_by: manager.id,
        })
        .await?;

    tracing::info!(task_id = %task.id, user_id = %manager.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<TaskDetail>, AppError> {
    payload.validate()?;

    let task = state
        .tasks
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

    if user.role != Role::Manager {
        if task.assigned_to != user.id {
            tracing::warn!(user_id = %user.id, "unauthorized task update attempt");
            return Err(AppError::Forbidden("Not authorized".to_string()));
        }
        if payload.assigned_to.is_some_and(|target| target != task.assigned_to) {
            tracing::warn!(user_id = %user.id, "unauthorized task reassignment attempt");
            return Err(AppError::Forbidden(
                "Only managers can reassign tasks".to_string(),
            ));
        }
    }

    let task = state
        .tasks
        .update(
            id,
            TaskChanges {
                title: payload.title,
                description: payload.description,
                status: payload.status,
                assigned_to: payload.assigned_to,
            },
        )
        .await?;

    tracing::info!(task_id = %task.id, user_id = %user.id, "task updated");
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Manager(manager): Manager,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    state
        .tasks
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

    state.tasks.delete(id).await?;

    tracing::info!(task_id = %id, user_id = %manager.id, "task deleted");
    Ok(Json(json!({ "message": "Task deleted" })))
}
