use sqlx::error::ErrorKind;
use sqlx::SqlitePool;

use crate::models::{UserRow, ROLE_PELANGGAN};

pub async fn find_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        "SELECT id_user, username, password_hash, role FROM users WHERE username = ? LIMIT 1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.kind() == ErrorKind::UniqueViolation)
        .unwrap_or(false)
}

/// Creates the account and, for customers, the 1:1 profile row in the same
/// transaction. Returns `Ok(false)` when the username is already taken; the
/// users table is left untouched in that case.
pub async fn register(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
    role: &str,
    nama: &str,
    hp: &str,
    alamat: &str,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query("INSERT INTO users (username, password_hash, role) VALUES (?, ?, ?)")
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .execute(&mut *tx)
        .await;

    let id_user = match inserted {
        Ok(result) => result.last_insert_rowid(),
        Err(err) if is_unique_violation(&err) => return Ok(false),
        Err(err) => return Err(err),
    };

    if role == ROLE_PELANGGAN {
        sqlx::query(
            "INSERT INTO profil_pelanggan (id_user, nama_lengkap, no_hp, alamat) VALUES (?, ?, ?, ?)",
        )
        .bind(id_user)
        .bind(nama)
        .bind(hp)
        .bind(alamat)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(true)
}

/// Username change with an optional password change. `Ok(false)` when the new
/// username collides with an existing account.
pub async fn update_account(
    pool: &SqlitePool,
    id_user: i64,
    username: &str,
    password_hash: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = match password_hash {
        Some(hash) => {
            sqlx::query("UPDATE users SET username = ?, password_hash = ? WHERE id_user = ?")
                .bind(username)
                .bind(hash)
                .bind(id_user)
                .execute(pool)
                .await
        }
        None => {
            sqlx::query("UPDATE users SET username = ? WHERE id_user = ?")
                .bind(username)
                .bind(id_user)
                .execute(pool)
                .await
        }
    };

    match result {
        Ok(_) => Ok(true),
        Err(err) if is_unique_violation(&err) => Ok(false),
        Err(err) => Err(err),
    }
}

/// Password reset by username. `Ok(false)` when no such account exists.
pub async fn reset_password(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET password_hash = ? WHERE username = ?")
        .bind(password_hash)
        .bind(username)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Removes a customer: profile and account go together, in one transaction.
pub async fn delete_customer(pool: &SqlitePool, id_user: i64) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM profil_pelanggan WHERE id_user = ?")
        .bind(id_user)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM users WHERE id_user = ?")
        .bind(id_user)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}
