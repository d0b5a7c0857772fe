use sqlx::SqlitePool;

use crate::models::{CustomerRow, ProfilRow, ROLE_PELANGGAN};

pub async fn list(pool: &SqlitePool) -> Result<Vec<CustomerRow>, sqlx::Error> {
    sqlx::query_as::<_, CustomerRow>(
        r#"SELECT u.id_user, u.username, p.nama_lengkap, p.no_hp, p.alamat
           FROM users u JOIN profil_pelanggan p ON u.id_user = p.id_user
           WHERE u.role = ?
           ORDER BY p.nama_lengkap"#,
    )
    .bind(ROLE_PELANGGAN)
    .fetch_all(pool)
    .await
}

pub async fn find_profile(
    pool: &SqlitePool,
    id_user: i64,
) -> Result<Option<ProfilRow>, sqlx::Error> {
    sqlx::query_as::<_, ProfilRow>(
        "SELECT id_user, nama_lengkap, no_hp, alamat FROM profil_pelanggan WHERE id_user = ?",
    )
    .bind(id_user)
    .fetch_optional(pool)
    .await
}

pub async fn update_profile(
    pool: &SqlitePool,
    id_user: i64,
    nama: &str,
    hp: &str,
    alamat: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE profil_pelanggan SET nama_lengkap = ?, no_hp = ?, alamat = ? WHERE id_user = ?",
    )
    .bind(nama)
    .bind(hp)
    .bind(alamat)
    .bind(id_user)
    .execute(pool)
    .await?;
    Ok(())
}
