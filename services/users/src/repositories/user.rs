//! User storage
//!
//! [`UserStore`] is the seam between the handlers and persistence. The
//! store owns id assignment: callers hand over a validated record without
//! an id and get back the stored [`User`].

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{User, ValidatedUser};

/// Persistence operations for users
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user, assigning its id
    async fn create(&self, new_user: &ValidatedUser) -> DatabaseResult<User>;

    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>>;
}

/// PostgreSQL-backed user store
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new user store over `pool`
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        user_name: row.get("user_name"),
        display_name: row.get("display_name"),
        password: row.get("password"),
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, new_user: &ValidatedUser) -> DatabaseResult<User> {
        info!("Creating new user: {}", new_user.user_name);

        let row = sqlx::query(
            r#"
            INSERT INTO users (user_name, display_name, password)
            VALUES ($1, $2, $3)
            RETURNING id, user_name, display_name, password
            "#,
        )
        .bind(&new_user.user_name)
        .bind(&new_user.display_name)
        .bind(&new_user.password)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(user_from_row(&row))
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        debug!("Finding user by ID: {}", id);

        let row = sqlx::query(
            r#"
            SELECT id, user_name, display_name, password
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.as_ref().map(user_from_row))
    }
}

/// In-process user store, used with `USERS_STORAGE=memory` and in tests
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, new_user: &ValidatedUser) -> DatabaseResult<User> {
        info!("Creating new user: {}", new_user.user_name);

        let mut users = self.users.write().await;
        let mut id = Uuid::new_v4();
        while users.contains_key(&id) {
            id = Uuid::new_v4();
        }

        let user = User {
            id,
            user_name: new_user.user_name.clone(),
            display_name: new_user.display_name.clone(),
            password: new_user.password.clone(),
        };
        users.insert(id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        debug!("Finding user by ID: {}", id);
        Ok(self.users.read().await.get(&id).cloned())
    }
}
