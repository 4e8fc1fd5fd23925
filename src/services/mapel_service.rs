// src/services/mapel_service.rs
use crate::{
    error::{AppError, AppResult},
    models::mapel::MataPelajaran,
};
use sqlx::SqlitePool;
use uuid::Uuid;

pub async fn create_mapel(db_pool: &SqlitePool, kode: &str, nama: &str) -> AppResult<MataPelajaran> {
    let kode = kode.trim().to_uppercase();
    let nama = nama.trim();
    if kode.is_empty() || nama.is_empty() {
        return Err(AppError::BadRequest("Kode dan nama mata pelajaran wajib diisi.".into()));
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO mata_pelajaran (id, kode, nama) VALUES (?1, ?2, ?3)")
        .bind(&id)
        .bind(&kode)
        .bind(nama)
        .execute(db_pool)
        .await
        .map_err(|e| AppError::from_insert(e, "Kode mata pelajaran sudah digunakan."))?;

    tracing::info!("✅ Subject '{}' added.", kode);
    Ok(MataPelajaran {
        id,
        kode,
        nama: nama.to_string(),
    })
}

pub async fn find_all_mapel(db_pool: &SqlitePool) -> AppResult<Vec<MataPelajaran>> {
    let list = sqlx::query_as::<_, MataPelajaran>(
        "SELECT id, kode, nama FROM mata_pelajaran ORDER BY kode ASC",
    )
    .fetch_all(db_pool)
    .await?;
    Ok(list)
}

pub async fn find_mapel_by_id(db_pool: &SqlitePool, id: &str) -> AppResult<Option<MataPelajaran>> {
    let mapel = sqlx::query_as::<_, MataPelajaran>(
        "SELECT id, kode, nama FROM mata_pelajaran WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(db_pool)
    .await?;
    Ok(mapel)
}
