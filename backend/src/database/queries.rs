//! Database query functions (Data Access Objects).
//!
//! Storage is consumed through the `UserStore`, `RefreshTokenStore`, and
//! `TaskStore` traits so the auth service and handlers depend on
//! capabilities rather than on Postgres; the `Pg*` types here are the
//! production implementations, and tests swap in the in-memory ones.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::models::{
    NewTask, NewUser, Page, RefreshTokenRecord, Task, TaskChanges, TaskDetail, TaskFilter, User,
    UserRef,
};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, new: NewUser) -> Result<User, sqlx::Error>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;
    async fn list(&self, page: Page) -> Result<(Vec<User>, u64), sqlx::Error>;
}

#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Deletes every stored token for `user_id`, then inserts the new one.
    /// One logical operation; concurrent callers race last-writer-wins.
    async fn replace_for_user(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error>;

    async fn find(&self, token: &str) -> Result<Option<RefreshTokenRecord>, sqlx::Error>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert(&self, new: NewTask) -> Result<TaskDetail, sqlx::Error>;
    async fn find(&self, id: Uuid) -> Result<Option<Task>, sqlx::Error>;
    async fn update(&self, id: Uuid, changes: TaskChanges) -> Result<TaskDetail, sqlx::Error>;
    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error>;
    async fn list(
        &self,
        filter: TaskFilter,
        page: Page,
    ) -> Result<(Vec<TaskDetail>, u64), sqlx::Error>;
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, new: NewUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, email, password_hash, role) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, username, email, password_hash, role, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.role)
        .fetch_one(&self.pool)
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list(&self, page: Page) -> Result<(Vec<User>, u64), sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users ORDER BY created_at LIMIT $1 OFFSET $2",
        )
        .bind(page.limit as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok((users, total as u64))
    }
}

pub struct PgRefreshTokenStore {
    pool: PgPool,
}

impl PgRefreshTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenStore for PgRefreshTokenStore {
    async fn replace_for_user(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO refresh_tokens (token, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(token)
            .bind(user_id)
            .bind(expires_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await
    }

    async fn find(&self, token: &str) -> Result<Option<RefreshTokenRecord>, sqlx::Error> {
        sqlx::query_as::<_, RefreshTokenRecord>(
            "SELECT token, user_id, expires_at FROM refresh_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
    }
}

pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn detail(&self, id: Uuid) -> Result<TaskDetail, sqlx::Error> {
        let row = sqlx::query_as::<_, TaskDetailRow>(&format!(
            "{DETAIL_SELECT} WHERE t.id = $1"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}

/// Flattened join of a task with its assignee and creator usernames.
#[derive(FromRow)]
struct TaskDetailRow {
    id: Uuid,
    title: String,
    description: String,
    status: super::models::TaskStatus,
    assigned_to: Uuid,
    assigned_to_username: String,
    created_by: Uuid,
    created_by_username: String,
    created_at: DateTime<Utc>,
}

impl From<TaskDetailRow> for TaskDetail {
    fn from(row: TaskDetailRow) -> Self {
        TaskDetail {
            id: row.id,
            title: row.title,
            description: row.description,
            status: row.status,
            assigned_to: UserRef {
                id: row.assigned_to,
                username: row.assigned_to_username,
            },
            created_by: UserRef {
                id: row.created_by,
                username: row.created_by_username,
            },
            created_at: row.created_at,
        }
    }
}

const DETAIL_SELECT: &str = "SELECT t.id, t.title, t.description, t.status, t.created_at, \
     t.assigned_to, a.username AS assigned_to_username, \
     t.created_by, c.username AS created_by_username \
     FROM tasks t \
     JOIN users a ON a.id = t.assigned_to \
     JOIN users c ON c.id = t.created_by";

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn insert(&self, new: NewTask) -> Result<TaskDetail, sqlx::Error> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO tasks (id, title, description, status, assigned_to, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.status)
        .bind(new.assigned_to)
        .bind(new.created_by)
        .fetch_one(&self.pool)
        .await?;

        self.detail(id).await
    }

    async fn find(&self, id: Uuid) -> Result<Option<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn update(&self, id: Uuid, changes: TaskChanges) -> Result<TaskDetail, sqlx::Error> {
        sqlx::query(
            "UPDATE tasks SET title = $1, description = $2, status = $3, \
             assigned_to = COALESCE($4, assigned_to) WHERE id = $5",
        )
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.status)
        .bind(changes.assigned_to)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.detail(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list(
        &self,
        filter: TaskFilter,
        page: Page,
    ) -> Result<(Vec<TaskDetail>, u64), sqlx::Error> {
        let status = filter.status.map(|status| status.as_str());

        let rows = sqlx::query_as::<_, TaskDetailRow>(&format!(
            "{DETAIL_SELECT} \
             WHERE ($1::uuid IS NULL OR t.assigned_to = $1) \
             AND ($2::text IS NULL OR t.status = $2) \
             ORDER BY t.created_at LIMIT $3 OFFSET $4"
        ))
        .bind(filter.assigned_to)
        .bind(status)
        .bind(page.limit as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks t \
             WHERE ($1::uuid IS NULL OR t.assigned_to = $1) \
             AND ($2::text IS NULL OR t.status = $2)",
        )
        .bind(filter.assigned_to)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows.into_iter().map(Into::into).collect(), total as u64))
    }
}
