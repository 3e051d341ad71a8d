//! In-memory store implementations for tests.
//!
//! These back the same traits as the Postgres stores so unit and router
//! tests can exercise the full auth flow without a database. Inherent
//! helpers (role changes, raw record insertion, user removal) exist so
//! tests can set up states the public API cannot reach directly.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::models::{
    NewTask, NewUser, Page, RefreshTokenRecord, Role, Task, TaskChanges, TaskDetail, TaskFilter,
    User, UserRef,
};
use super::queries::{RefreshTokenStore, TaskStore, UserStore};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_role(&self, id: Uuid, role: Role) {
        if let Some(user) = self.users.lock().unwrap().get_mut(&id) {
            user.role = role;
        }
    }

    pub fn remove(&self, id: Uuid) {
        self.users.lock().unwrap().remove(&id);
    }

    fn username_of(&self, id: Uuid) -> String {
        self.users
            .lock()
            .unwrap()
            .get(&id)
            .map(|user| user.username.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, new: NewUser) -> Result<User, sqlx::Error> {
        let user = User {
            id: Uuid::new_v4(),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            created_at: Utc::now(),
        };
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn list(&self, page: Page) -> Result<(Vec<User>, u64), sqlx::Error> {
        let mut users: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
        users.sort_by_key(|user| user.created_at);
        let total = users.len() as u64;
        let users = users
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((users, total))
    }
}

#[derive(Default)]
pub struct MemoryRefreshTokenStore {
    tokens: Mutex<Vec<RefreshTokenRecord>>,
}

impl MemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a raw record, bypassing rotation. For expiry tests.
    pub fn insert_record(&self, record: RefreshTokenRecord) {
        self.tokens.lock().unwrap().push(record);
    }

    pub fn count_for_user(&self, user_id: Uuid) -> usize {
        self.tokens
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.user_id == user_id)
            .count()
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryRefreshTokenStore {
    async fn replace_for_user(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let mut tokens = self.tokens.lock().unwrap();
        tokens.retain(|record| record.user_id != user_id);
        tokens.push(RefreshTokenRecord {
            token: token.to_string(),
            user_id,
            expires_at,
        });
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<RefreshTokenRecord>, sqlx::Error> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|record| record.token == token)
            .cloned())
    }
}

pub struct MemoryTaskStore {
    tasks: Mutex<Vec<Task>>,
    users: Arc<MemoryUserStore>,
}

impl MemoryTaskStore {
    pub fn new(users: Arc<MemoryUserStore>) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            users,
        }
    }

    fn detail(&self, task: &Task) -> TaskDetail {
        TaskDetail {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            assigned_to: UserRef {
                id: task.assigned_to,
                username: self.users.username_of(task.assigned_to),
            },
            created_by: UserRef {
                id: task.created_by,
                username: self.users.username_of(task.created_by),
            },
            created_at: task.created_at,
        }
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn insert(&self, new: NewTask) -> Result<TaskDetail, sqlx::Error> {
        let task = Task {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            status: new.status,
            assigned_to: new.assigned_to,
            created_by: new.created_by,
            created_at: Utc::now(),
        };
        let detail = self.detail(&task);
        self.tasks.lock().unwrap().push(task);
        Ok(detail)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Task>, sqlx::Error> {
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .find(|task| task.id == id)
            .cloned())
    }

    async fn update(&self, id: Uuid, changes: TaskChanges) -> Result<TaskDetail, sqlx::Error> {
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(sqlx::Error::RowNotFound)?;
        task.title = changes.title;
        task.description = changes.description;
        task.status = changes.status;
        if let Some(assigned_to) = changes.assigned_to {
            task.assigned_to = assigned_to;
        }
        let task = task.clone();
        drop(tasks);
        Ok(self.detail(&task))
    }

    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        self.tasks.lock().unwrap().retain(|task| task.id != id);
        Ok(())
    }

    async fn list(
        &self,
        filter: TaskFilter,
        page: Page,
    ) -> Result<(Vec<TaskDetail>, u64), sqlx::Error> {
        let tasks: Vec<Task> = self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|task| {
                filter
                    .assigned_to
                    .map_or(true, |user_id| task.assigned_to == user_id)
                    && filter.status.map_or(true, |status| task.status == status)
            })
            .cloned()
            .collect();

        let total = tasks.len() as u64;
        let details = tasks
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .map(|task| self.detail(&task))
            .collect();
        Ok((details, total))
    }
}
