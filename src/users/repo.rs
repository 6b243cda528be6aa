use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use tracing::debug;

use crate::users::repo_types::UserRecord;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already registered: {0}")]
    Duplicate(String),

    #[error("user record was modified concurrently: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence of user records keyed by email.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Insert a user with an empty job list. Fails with `Duplicate` if the
    /// email is taken.
    async fn create(&self, email: &str, password_hash: &str) -> Result<UserRecord, StoreError>;

    /// Write `user.jobs` back, provided nobody else saved since `user` was
    /// loaded. Returns the record with its new version.
    async fn save_jobs(&self, user: &UserRecord) -> Result<UserRecord, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const UNIQUE_VIOLATION: &str = "23505";

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password_hash, jobs, version, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<UserRecord, StoreError> {
        let fresh = UserRecord::new(email, password_hash);
        let res = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (id, email, password_hash, jobs, version, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, password_hash, jobs, version, created_at
            "#,
        )
        .bind(fresh.id)
        .bind(&fresh.email)
        .bind(&fresh.password_hash)
        .bind(&fresh.jobs)
        .bind(fresh.version)
        .bind(fresh.created_at)
        .fetch_one(&self.db)
        .await;

        match res {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Err(StoreError::Duplicate(email.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save_jobs(&self, user: &UserRecord) -> Result<UserRecord, StoreError> {
        let saved = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users
               SET jobs = $1, version = version + 1
             WHERE email = $2 AND version = $3
            RETURNING id, email, password_hash, jobs, version, created_at
            "#,
        )
        .bind(Json(user.jobs()))
        .bind(&user.email)
        .bind(user.version)
        .fetch_optional(&self.db)
        .await?;

        match saved {
            Some(u) => {
                debug!(email = %u.email, version = u.version, "jobs saved");
                Ok(u)
            }
            None => Err(StoreError::Conflict(user.email.clone())),
        }
    }
}
