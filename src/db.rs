use std::{env, fs, path::Path};

use sqlx::SqlitePool;

use crate::{auth::hash_password, models::ROLE_ADMIN};

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

pub fn ensure_sqlite_dir(db_url: &str) -> std::io::Result<()> {
    let path = if let Some(path) = db_url.strip_prefix("sqlite://") {
        Some(path)
    } else if let Some(path) = db_url.strip_prefix("sqlite:") {
        Some(path)
    } else {
        None
    };

    let Some(path) = path else {
        return Ok(());
    };

    let path = path.split('?').next().unwrap_or(path);
    if path == ":memory:" || path.is_empty() {
        return Ok(());
    }

    let path = path.strip_prefix("file:").unwrap_or(path);
    let db_path = Path::new(path);
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Creates the first admin account from the environment when none exists yet.
pub async fn seed_admin(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE role = ?",
    )
    .bind(ROLE_ADMIN)
    .fetch_one(pool)
    .await?;

    if existing > 0 {
        return Ok(());
    }

    let username = env::var("ADMIN_USER").unwrap_or_else(|_| "admin".to_string());
    let password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());

    if password == "admin" {
        log::warn!("ADMIN_PASSWORD not set. Using default password 'admin'. Set ADMIN_PASSWORD in production.");
    }

    let password_hash = hash_password(&password)
        .map_err(|_| sqlx::Error::Protocol("password hash failed".into()))?;

    sqlx::query("INSERT INTO users (username, password_hash, role) VALUES (?, ?, ?)")
        .bind(username)
        .bind(password_hash)
        .bind(ROLE_ADMIN)
        .execute(pool)
        .await?;

    Ok(())
}
