//! Account storage: capability interface plus the PostgreSQL implementation.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Account;

use super::DbPool;

/// The storage capability the account core depends on. Any backend that
/// honors the uniqueness and not-found semantics below can stand in.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persists a new account. A uniqueness violation on username or email
    /// surfaces as [`AppError::Duplicate`].
    async fn create(&self, username: &str, email: &str, password_hash: &str)
        -> AppResult<Account>;

    async fn get_by_id(&self, id: Uuid) -> AppResult<Account>;

    async fn get_by_email(&self, email: &str) -> AppResult<Account>;

    /// Overwrites username, email and password hash; bumps `updated_at`.
    async fn update(&self, account: &Account) -> AppResult<Account>;

    /// Removes the account; [`AppError::NotFound`] if nothing was deleted.
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct PgUserRepository {
    pool: DbPool,
}

impl PgUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

// Postgres unique_violation
const UNIQUE_VIOLATION: &str = "23505";

fn map_unique_violation(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            AppError::Duplicate
        }
        _ => AppError::Db(e),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> AppResult<Account> {
        let row = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;
        Ok(row)
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "SELECT id, username, email, password_hash, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "SELECT id, username, email, password_hash, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    async fn update(&self, account: &Account) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            r#"
            UPDATE users
            SET username = $2, email = $3, password_hash = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(account.id)
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?
        .ok_or(AppError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let r = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if r.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
