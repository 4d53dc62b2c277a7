// src/services/settings.rs
//! Key/value settings backed by the settings table. Handlers hold the
//! service through shared state rather than touching the table directly.

use sqlx::SqlitePool;

use crate::common::ApiError;

pub struct SettingsService {
    pool: SqlitePool,
}

impl SettingsService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_setting(&self, key: &str) -> Result<Option<String>, ApiError> {
        sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(ApiError::DatabaseError)
    }

    pub async fn set_setting(&self, key: &str, value: &str) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value) VALUES (?, ?)
            ON CONFLICT (key) DO UPDATE SET value = excluded.value,
                                            updated_at = datetime('now')
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(ApiError::DatabaseError)?;
        Ok(())
    }

    pub async fn all_settings(&self) -> Result<Vec<(String, String)>, ApiError> {
        sqlx::query_as("SELECT key, value FROM settings ORDER BY key")
            .fetch_all(&self.pool)
            .await
            .map_err(ApiError::DatabaseError)
    }
}
