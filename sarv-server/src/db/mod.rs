//! Database Module
//!
//! Handles SQLite connection pool and migrations

pub mod models;
pub mod repository;

use crate::db::models::{Role, SubscriptionTier, User};
use crate::utils::{AppError, now_millis, snowflake_id};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;

/// Database service — owns a SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Create a new database service with WAL mode
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        // Build connection options: WAL, foreign keys, normal sync
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON")
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        // busy_timeout: 写冲突时等待 5s 而非立即失败
        sqlx::query("PRAGMA busy_timeout = 5000;")
            .execute(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to set busy_timeout: {e}")))?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        Self::migrate(&pool).await?;

        Ok(Self { pool })
    }

    /// In-memory database for tests
    pub async fn new_in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::database(e.to_string()))?
            .pragma("foreign_keys", "ON");
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    async fn migrate(pool: &SqlitePool) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    /// Seed the console admin account from ADMIN_PHONE / ADMIN_PASSWORD when
    /// it does not exist yet. No-op when the variables are unset.
    pub async fn ensure_admin_account(&self) -> Result<(), AppError> {
        let (Ok(phone), Ok(password)) = (
            std::env::var("ADMIN_PHONE"),
            std::env::var("ADMIN_PASSWORD"),
        ) else {
            return Ok(());
        };

        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM user WHERE phone = ?")
            .bind(&phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        if existing.is_some() {
            return Ok(());
        }

        let hash = User::hash_password(&password)
            .map_err(|e| AppError::internal(format!("Failed to hash admin password: {e}")))?;
        let id = snowflake_id();
        sqlx::query(
            "INSERT INTO user (id, phone, hash_pass, name, role, subscription_tier, active, has_online_menu, created_at) \
             VALUES (?, ?, ?, 'Sarv Admin', ?, ?, 1, 0, ?)",
        )
        .bind(id)
        .bind(&phone)
        .bind(&hash)
        .bind(Role::Admin)
        .bind(SubscriptionTier::Professional)
        .bind(now_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

        tracing::info!(user_id = id, "Admin account seeded");
        Ok(())
    }
}
