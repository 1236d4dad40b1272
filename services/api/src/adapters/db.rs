//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.
//!
//! Topic records are stored as one row per (user, topic) pair with the curriculum
//! as a JSONB column, and progress moves through a single atomic UPDATE. Two tabs
//! saving different topics, or racing progress updates, can no longer clobber each
//! other the way a whole-document read-modify-write would.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use curri_builder_core::domain::{DayEntry, TopicRecord, User, UserCredentials};
use curri_builder_core::ports::{DatabaseService, PortError, PortResult};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn map_db_error(e: sqlx::Error) -> PortError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() || db.is_check_violation() => {
            PortError::Conflict(db.to_string())
        }
        _ => PortError::Unexpected(e.to_string()),
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    user_id: Uuid,
    email: Option<String>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            user_id: self.user_id,
            email: self.email,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    user_id: Uuid,
    email: String,
    hashed_password: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.user_id,
            email: self.email,
            hashed_password: self.hashed_password,
        }
    }
}

#[derive(FromRow)]
struct TopicRecordRow {
    topic_name: String,
    curriculum: Json<Vec<DayEntry>>,
    progress: i32,
    total_days: i32,
}
impl TopicRecordRow {
    fn to_domain(self) -> (String, TopicRecord) {
        (
            self.topic_name,
            TopicRecord {
                curriculum: self.curriculum.0,
                progress: self.progress as u32,
                total_days: self.total_days as u32,
            },
        )
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (user_id, email, hashed_password) VALUES ($1, $2, $3) \
             RETURNING user_id, email",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(record.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT user_id, email, hashed_password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("No user with email {}", email))
            }
            _ => PortError::Unexpected(e.to_string()),
        })?;

        Ok(record.to_domain())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > now()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        row.map(|(user_id,)| user_id).ok_or(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn save_topic(
        &self,
        user_id: Uuid,
        topic_name: &str,
        curriculum: &[DayEntry],
    ) -> PortResult<()> {
        // Regenerating an existing topic overwrites the curriculum and resets
        // progress to zero. Rows for other topics are independent.
        sqlx::query(
            "INSERT INTO topic_records (user_id, topic_name, curriculum, progress, total_days) \
             VALUES ($1, $2, $3, 0, $4) \
             ON CONFLICT (user_id, topic_name) DO UPDATE \
             SET curriculum = EXCLUDED.curriculum, \
                 progress = 0, \
                 total_days = EXCLUDED.total_days, \
                 updated_at = now()",
        )
        .bind(user_id)
        .bind(topic_name)
        .bind(Json(curriculum))
        .bind(curriculum.len() as i32)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn update_progress(
        &self,
        user_id: Uuid,
        topic_name: &str,
        new_progress: u32,
    ) -> PortResult<()> {
        // GREATEST keeps progress monotonic non-decreasing inside a single
        // statement; a missing row simply updates nothing. The table's CHECK
        // constraint rejects values past total_days.
        sqlx::query(
            "UPDATE topic_records \
             SET progress = GREATEST(progress, $3), updated_at = now() \
             WHERE user_id = $1 AND topic_name = $2",
        )
        .bind(user_id)
        .bind(topic_name)
        .bind(new_progress as i32)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn get_user_topics(&self, user_id: Uuid) -> PortResult<HashMap<String, TopicRecord>> {
        let rows = sqlx::query_as::<_, TopicRecordRow>(
            "SELECT topic_name, curriculum, progress, total_days \
             FROM topic_records WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(rows.into_iter().map(TopicRecordRow::to_domain).collect())
    }
}
