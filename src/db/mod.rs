mod kv_repo;
mod menu_repo;

pub use kv_repo::{KvEntry, KvRepository};
pub use menu_repo::MenuRepository;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations
pub async fn init_db(path: &Path) -> Result<SqlitePool, KvError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite:{}?mode=rwc", path.display());
    let options = SqliteConnectOptions::from_str(&db_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::debug!(path = %path.display(), "Database ready");

    Ok(pool)
}

#[derive(Debug)]
pub enum KvError {
    Io(std::io::Error),
    Database(sqlx::Error),
    Migrate(sqlx::migrate::MigrateError),
    Encode(weekmenu_core::Error),
}

impl std::fmt::Display for KvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KvError::Io(e) => write!(f, "Failed to create database directory: {}", e),
            KvError::Database(e) => write!(f, "Database error: {}", e),
            KvError::Migrate(e) => write!(f, "Failed to migrate database: {}", e),
            KvError::Encode(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for KvError {}

impl From<std::io::Error> for KvError {
    fn from(e: std::io::Error) -> Self {
        KvError::Io(e)
    }
}

impl From<sqlx::Error> for KvError {
    fn from(e: sqlx::Error) -> Self {
        KvError::Database(e)
    }
}

impl From<sqlx::migrate::MigrateError> for KvError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        KvError::Migrate(e)
    }
}

impl From<weekmenu_core::Error> for KvError {
    fn from(e: weekmenu_core::Error) -> Self {
        KvError::Encode(e)
    }
}
