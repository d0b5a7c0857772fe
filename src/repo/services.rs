use sqlx::SqlitePool;

use crate::models::LayananRow;

pub async fn list(pool: &SqlitePool) -> Result<Vec<LayananRow>, sqlx::Error> {
    sqlx::query_as::<_, LayananRow>(
        "SELECT id_layanan, nama_layanan, kategori, harga, deskripsi, foto_katalog FROM layanan ORDER BY id_layanan",
    )
    .fetch_all(pool)
    .await
}

pub async fn insert(
    pool: &SqlitePool,
    nama: &str,
    kategori: &str,
    harga: i64,
    deskripsi: &str,
    foto: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO layanan (nama_layanan, kategori, harga, deskripsi, foto_katalog) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(nama)
    .bind(kategori)
    .bind(harga)
    .bind(deskripsi)
    .bind(foto)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// The photo is only replaced when a new one was uploaded.
pub async fn update(
    pool: &SqlitePool,
    id_layanan: i64,
    nama: &str,
    kategori: &str,
    harga: i64,
    deskripsi: &str,
    foto: Option<&str>,
) -> Result<(), sqlx::Error> {
    match foto {
        Some(foto) => {
            sqlx::query(
                "UPDATE layanan SET nama_layanan = ?, kategori = ?, harga = ?, deskripsi = ?, foto_katalog = ? WHERE id_layanan = ?",
            )
            .bind(nama)
            .bind(kategori)
            .bind(harga)
            .bind(deskripsi)
            .bind(foto)
            .bind(id_layanan)
            .execute(pool)
            .await?;
        }
        None => {
            sqlx::query(
                "UPDATE layanan SET nama_layanan = ?, kategori = ?, harga = ?, deskripsi = ? WHERE id_layanan = ?",
            )
            .bind(nama)
            .bind(kategori)
            .bind(harga)
            .bind(deskripsi)
            .bind(id_layanan)
            .execute(pool)
            .await?;
        }
    }
    Ok(())
}

pub async fn update_price(
    pool: &SqlitePool,
    id_layanan: i64,
    harga: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE layanan SET harga = ? WHERE id_layanan = ?")
        .bind(harga)
        .bind(id_layanan)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id_layanan: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM layanan WHERE id_layanan = ?")
        .bind(id_layanan)
        .execute(pool)
        .await?;
    Ok(())
}
