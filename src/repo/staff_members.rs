use sqlx::SqlitePool;

use crate::models::PelayanRow;

const COLUMNS: &str =
    "id_pelayan, id_user, nama_pelayan, spesialisasi, status_aktif, foto_pelayan";

pub async fn list(pool: &SqlitePool) -> Result<Vec<PelayanRow>, sqlx::Error> {
    sqlx::query_as::<_, PelayanRow>(&format!(
        "SELECT {COLUMNS} FROM pelayan ORDER BY id_pelayan"
    ))
    .fetch_all(pool)
    .await
}

pub async fn find_by_user(
    pool: &SqlitePool,
    id_user: i64,
) -> Result<Option<PelayanRow>, sqlx::Error> {
    sqlx::query_as::<_, PelayanRow>(&format!(
        "SELECT {COLUMNS} FROM pelayan WHERE id_user = ? LIMIT 1"
    ))
    .bind(id_user)
    .fetch_optional(pool)
    .await
}

pub async fn insert(
    pool: &SqlitePool,
    id_user: Option<i64>,
    nama: &str,
    spesialisasi: &str,
    status: &str,
    foto: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO pelayan (id_user, nama_pelayan, spesialisasi, status_aktif, foto_pelayan) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id_user)
    .bind(nama)
    .bind(spesialisasi)
    .bind(status)
    .bind(foto)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn update(
    pool: &SqlitePool,
    id_pelayan: i64,
    nama: &str,
    spesialisasi: &str,
    foto: Option<&str>,
) -> Result<(), sqlx::Error> {
    match foto {
        Some(foto) => {
            sqlx::query(
                "UPDATE pelayan SET nama_pelayan = ?, spesialisasi = ?, foto_pelayan = ? WHERE id_pelayan = ?",
            )
            .bind(nama)
            .bind(spesialisasi)
            .bind(foto)
            .bind(id_pelayan)
            .execute(pool)
            .await?;
        }
        None => {
            sqlx::query(
                "UPDATE pelayan SET nama_pelayan = ?, spesialisasi = ? WHERE id_pelayan = ?",
            )
            .bind(nama)
            .bind(spesialisasi)
            .bind(id_pelayan)
            .execute(pool)
            .await?;
        }
    }
    Ok(())
}

/// Availability toggle shown on the admin staff screen.
pub async fn set_status(
    pool: &SqlitePool,
    id_pelayan: i64,
    status: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE pelayan SET status_aktif = ? WHERE id_pelayan = ?")
        .bind(status)
        .bind(id_pelayan)
        .execute(pool)
        .await?;
    Ok(())
}

/// Staff self-service: display name and, when uploaded, a new photo.
pub async fn update_profile(
    pool: &SqlitePool,
    id_user: i64,
    nama: &str,
    foto: Option<&str>,
) -> Result<(), sqlx::Error> {
    match foto {
        Some(foto) => {
            sqlx::query(
                "UPDATE pelayan SET nama_pelayan = ?, foto_pelayan = ? WHERE id_user = ?",
            )
            .bind(nama)
            .bind(foto)
            .bind(id_user)
            .execute(pool)
            .await?;
        }
        None => {
            sqlx::query("UPDATE pelayan SET nama_pelayan = ? WHERE id_user = ?")
                .bind(nama)
                .bind(id_user)
                .execute(pool)
                .await?;
        }
    }
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id_pelayan: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM pelayan WHERE id_pelayan = ?")
        .bind(id_pelayan)
        .execute(pool)
        .await?;
    Ok(())
}
