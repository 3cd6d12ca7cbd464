use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::KvError;

/// String values under string keys, backed by the `kv_store` table.
pub struct KvRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct KvRow {
    value: String,
    updated_at: String,
}

/// A stored value with the time it was last written.
#[derive(Debug, Clone, PartialEq)]
pub struct KvEntry {
    pub value: String,
    pub updated_at: Option<DateTime<Utc>>,
}

impl KvRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.get_entry(key).await?.map(|e| e.value))
    }

    pub async fn get_entry(&self, key: &str) -> Result<Option<KvEntry>, KvError> {
        let row: Option<KvRow> =
            sqlx::query_as("SELECT value, updated_at FROM kv_store WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|row| KvEntry {
            value: row.value,
            updated_at: DateTime::parse_from_rfc3339(&row.updated_at)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }))
    }

    /// Inserts or replaces the value under `key`.
    pub async fn put(&self, key: &str, value: &str) -> Result<(), KvError> {
        let updated_at = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(&updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Returns whether a value was removed.
    pub async fn delete(&self, key: &str) -> Result<bool, KvError> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
