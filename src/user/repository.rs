use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::UserModel;
use crate::shared::AppError;

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository {
    async fn insert_user(&self, user: &UserModel) -> Result<(), AppError>;
    async fn get_user(&self, user_id: Uuid) -> Result<Option<UserModel>, AppError>;
    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<UserModel>, AppError>;
}

/// In-memory implementation of UserRepository for development and testing
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, UserModel>>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    pub async fn user_count(&self) -> usize {
        self.users.lock().await.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user))]
    async fn insert_user(&self, user: &UserModel) -> Result<(), AppError> {
        debug!(user_id = %user.id, google_id = %user.google_id, "Creating user in memory");

        let mut users = self.users.lock().await;
        if users.contains_key(&user.id) || users.values().any(|u| u.google_id == user.google_id) {
            warn!(user_id = %user.id, "User already exists in memory");
            return Err(AppError::DatabaseError("User already exists".to_string()));
        }
        users.insert(user.id, user.clone());

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_user(&self, user_id: Uuid) -> Result<Option<UserModel>, AppError> {
        let users = self.users.lock().await;
        Ok(users.get(&user_id).cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<UserModel>, AppError> {
        let users = self.users.lock().await;
        Ok(users.values().find(|u| u.google_id == google_id).cloned())
    }
}

/// PostgreSQL implementation of user repository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> UserModel {
    UserModel {
        id: row.get("id"),
        google_id: row.get("google_id"),
        display_name: row.get("display_name"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        image: row.get("image"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self, user))]
    async fn insert_user(&self, user: &UserModel) -> Result<(), AppError> {
        debug!(user_id = %user.id, "Creating user in database");

        sqlx::query(
            "INSERT INTO users \
             (id, google_id, display_name, first_name, last_name, image, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user.id)
        .bind(&user.google_id)
        .bind(&user.display_name)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.image)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create user in database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_user(&self, user_id: Uuid) -> Result<Option<UserModel>, AppError> {
        let row = sqlx::query(
            "SELECT id, google_id, display_name, first_name, last_name, image, created_at \
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = %user_id, "Failed to fetch user from database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(row.as_ref().map(user_from_row))
    }

    #[instrument(skip(self))]
    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<UserModel>, AppError> {
        let row = sqlx::query(
            "SELECT id, google_id, display_name, first_name, last_name, image, created_at \
             FROM users WHERE google_id = $1",
        )
        .bind(google_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch user by provider id");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(row.as_ref().map(user_from_row))
    }
}
