// src/services/tahun_ajaran_service.rs
use crate::{
    error::{AppError, AppResult},
    models::tahun_ajaran::{TahunAjaran, MAX_AJARAN_LEN},
};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

fn validate_label(ajaran: &str) -> AppResult<&str> {
    let ajaran = ajaran.trim();
    if ajaran.is_empty() {
        return Err(AppError::BadRequest("Tahun ajaran wajib diisi.".into()));
    }
    if ajaran.chars().count() > MAX_AJARAN_LEN {
        return Err(AppError::BadRequest(format!(
            "Tahun ajaran maksimal {} karakter.",
            MAX_AJARAN_LEN
        )));
    }
    Ok(ajaran)
}

pub async fn create_ajaran(db_pool: &SqlitePool, ajaran: &str) -> AppResult<TahunAjaran> {
    let ajaran = validate_label(ajaran)?;
    let id = Uuid::new_v4().to_string();
    let created_at = Utc::now();

    sqlx::query(
        "INSERT INTO tahun_ajaran (id, ajaran, is_aktif, created_at) VALUES (?1, ?2, 0, ?3)",
    )
    .bind(&id)
    .bind(ajaran)
    .bind(created_at)
    .execute(db_pool)
    .await
    .map_err(|e| AppError::from_insert(e, "Tahun ajaran sudah ada."))?;

    tracing::info!("✅ Academic year '{}' added.", ajaran);
    Ok(TahunAjaran {
        id,
        ajaran: ajaran.to_string(),
        is_aktif: false,
        created_at,
    })
}

pub async fn find_all_ajaran(db_pool: &SqlitePool) -> AppResult<Vec<TahunAjaran>> {
    let list = sqlx::query_as::<_, TahunAjaran>(
        "SELECT id, ajaran, is_aktif, created_at FROM tahun_ajaran ORDER BY created_at DESC, rowid DESC",
    )
    .fetch_all(db_pool)
    .await?;
    Ok(list)
}

pub async fn ajaran_exists(db_pool: &SqlitePool, ajaran: &str) -> AppResult<bool> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tahun_ajaran WHERE ajaran = ?1")
        .bind(ajaran.trim())
        .fetch_one(db_pool)
        .await?;
    Ok(count > 0)
}

/// Makes `id` the active academic year (all others become inactive), optionally renaming it.
pub async fn edit_ajaran(
    db_pool: &SqlitePool,
    id: &str,
    new_label: Option<&str>,
) -> AppResult<TahunAjaran> {
    let new_label = new_label
        .filter(|l| !l.trim().is_empty())
        .map(validate_label)
        .transpose()?;

    let mut tx = db_pool.begin().await?;

    let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tahun_ajaran WHERE id = ?1")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?
        > 0;
    if !exists {
        return Err(AppError::NotFound("Tahun ajaran tidak ditemukan.".into()));
    }

    if let Some(label) = new_label {
        sqlx::query("UPDATE tahun_ajaran SET ajaran = ?1 WHERE id = ?2")
            .bind(label)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_insert(e, "Tahun ajaran sudah ada."))?;
    }

    sqlx::query("UPDATE tahun_ajaran SET is_aktif = (id = ?1)")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let updated = sqlx::query_as::<_, TahunAjaran>(
        "SELECT id, ajaran, is_aktif, created_at FROM tahun_ajaran WHERE id = ?1",
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::info!("✅ Academic year '{}' is now active.", updated.ajaran);
    Ok(updated)
}

/// Deletes an academic year; grades recorded under it are removed by the foreign key.
pub async fn delete_ajaran(db_pool: &SqlitePool, id: &str) -> AppResult<()> {
    let rows_affected = sqlx::query("DELETE FROM tahun_ajaran WHERE id = ?1")
        .bind(id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Academic year '{}' not found for deletion.", id);
        return Err(AppError::NotFound("Tahun ajaran tidak ditemukan.".into()));
    }
    tracing::info!("✅ Academic year '{}' deleted.", id);
    Ok(())
}
