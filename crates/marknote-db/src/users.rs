//! User repository implementation.
//!
//! Stores the identity rows that every document and tag hangs off.
//! Password hashing and session issuance live in the authentication
//! collaborator; this layer only writes the opaque credential at
//! registration and never reads it back.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};
use tracing::debug;
use uuid::Uuid;

use marknote_core::{new_v7, CreateUserRequest, Error, Result, User, UserRepository};

/// PostgreSQL implementation of UserRepository.
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, req: CreateUserRequest) -> Result<User> {
        if req.username.trim().is_empty() {
            return Err(Error::InvalidInput("username cannot be empty".to_string()));
        }
        if req.email.trim().is_empty() {
            return Err(Error::InvalidInput("email cannot be empty".to_string()));
        }

        let id = new_v7();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO users (id, username, email, credential, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5)",
        )
        .bind(id)
        .bind(&req.username)
        .bind(&req.email)
        .bind(&req.credential)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return Error::Conflict("username or email already taken".to_string());
                }
            }
            Error::Database(e)
        })?;

        debug!(
            subsystem = "database",
            component = "users",
            op = "create",
            owner_id = %id,
            "User created"
        );

        Ok(User {
            id,
            username: req.username,
            email: req.email,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(user)
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, created_at, updated_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        // Documents, tags, and associations go with the row via the
        // schema's ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
