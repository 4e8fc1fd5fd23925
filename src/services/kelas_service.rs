// src/services/kelas_service.rs
//! Class records and their membership set.
//!
//! `kelas.jumlah_siswa` caches `COUNT(*)` of the class's rows in `kelas_siswa`. Every change
//! to the membership set goes through [`add_member`] / [`remove_member`], which recompute the
//! cached count from the set inside the caller's transaction.
use crate::{
    error::{AppError, AppResult},
    models::{
        kelas::{Kelas, KelasDetail, KelasSelector},
        siswa::{SiswaResponse, SiswaRow},
    },
};
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

const KELAS_COLUMNS: &str = "id, kelas, nama, jumlah_siswa, created_at";

pub async fn create_kelas(db_pool: &SqlitePool, kelas: &str, nama: &str) -> AppResult<Kelas> {
    let kelas = kelas.trim();
    let nama = nama.trim();
    if kelas.is_empty() || nama.is_empty() {
        return Err(AppError::BadRequest("Tingkat dan nama kelas wajib diisi.".into()));
    }

    let id = Uuid::new_v4().to_string();
    let created_at = Utc::now();
    tracing::info!("Creating class {} {}", kelas, nama);

    sqlx::query(
        r#"
        INSERT INTO kelas (id, kelas, nama, jumlah_siswa, created_at)
        VALUES (?1, ?2, ?3, 0, ?4)
        "#,
    )
    .bind(&id)
    .bind(kelas)
    .bind(nama)
    .bind(created_at)
    .execute(db_pool)
    .await
    .map_err(|e| AppError::from_insert(e, "Kelas sudah ada."))?;

    Ok(Kelas {
        id,
        kelas: kelas.to_string(),
        nama: nama.to_string(),
        jumlah_siswa: 0,
        created_at,
    })
}

pub async fn find_all_kelas(db_pool: &SqlitePool) -> AppResult<Vec<Kelas>> {
    let kelas = sqlx::query_as::<_, Kelas>(&format!(
        "SELECT {} FROM kelas ORDER BY kelas ASC, nama ASC",
        KELAS_COLUMNS
    ))
    .fetch_all(db_pool)
    .await?;
    tracing::debug!("Found {} classes.", kelas.len());
    Ok(kelas)
}

pub async fn find_kelas_by_id(
    conn: &mut SqliteConnection,
    kelas_id: &str,
) -> AppResult<Option<Kelas>> {
    let kelas = sqlx::query_as::<_, Kelas>(&format!(
        "SELECT {} FROM kelas WHERE id = ?1",
        KELAS_COLUMNS
    ))
    .bind(kelas_id)
    .fetch_optional(conn)
    .await?;
    Ok(kelas)
}

/// Looks a class up by grade + section.
pub async fn find_kelas_by_selector(
    conn: &mut SqliteConnection,
    selector: &KelasSelector,
) -> AppResult<Option<Kelas>> {
    let kelas = sqlx::query_as::<_, Kelas>(&format!(
        "SELECT {} FROM kelas WHERE kelas = ?1 AND nama = ?2",
        KELAS_COLUMNS
    ))
    .bind(&selector.kelas)
    .bind(&selector.nama)
    .fetch_optional(conn)
    .await?;
    Ok(kelas)
}

/// Same as [`find_kelas_by_id`] but a missing class is a 404.
pub async fn get_kelas(db_pool: &SqlitePool, kelas_id: &str) -> AppResult<Kelas> {
    let mut conn = db_pool.acquire().await?;
    find_kelas_by_id(&mut conn, kelas_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Kelas tidak ditemukan.".into()))
}

pub async fn get_kelas_detail(db_pool: &SqlitePool, kelas_id: &str) -> AppResult<KelasDetail> {
    let kelas = get_kelas(db_pool, kelas_id).await?;

    let siswa = sqlx::query_as::<_, SiswaRow>(
        r#"
        SELECT s.id, s.nis, s.nama, s.jenis_kelamin, s.tahun_masuk, s.foto, s.kelas_id,
               s.created_at, k.kelas AS kelas_kelas, k.nama AS kelas_nama
        FROM kelas_siswa ks
        JOIN siswa s ON s.id = ks.siswa_id
        JOIN kelas k ON k.id = ks.kelas_id
        WHERE ks.kelas_id = ?1
        ORDER BY s.nama ASC
        "#,
    )
    .bind(kelas_id)
    .fetch_all(db_pool)
    .await?
    .into_iter()
    .map(SiswaResponse::from)
    .collect();

    Ok(KelasDetail { kelas, siswa })
}

/// Deletes a class. Its students stay, with their class reference cleared.
/// Returns how many students were detached.
pub async fn delete_kelas(db_pool: &SqlitePool, kelas_id: &str) -> AppResult<u64> {
    let mut tx = db_pool.begin().await?;

    if find_kelas_by_id(&mut tx, kelas_id).await?.is_none() {
        return Err(AppError::NotFound("Kelas tidak ditemukan.".into()));
    }

    let detached = sqlx::query("UPDATE siswa SET kelas_id = NULL WHERE kelas_id = ?1")
        .bind(kelas_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM kelas_siswa WHERE kelas_id = ?1")
        .bind(kelas_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE users SET wali_kelas_id = NULL WHERE wali_kelas_id = ?1")
        .bind(kelas_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM kelas WHERE id = ?1")
        .bind(kelas_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::info!("✅ Class '{}' deleted, {} students detached.", kelas_id, detached);
    Ok(detached)
}

// --- Membership maintenance ---

/// Adds a student to a class's membership set and refreshes the cached count.
pub async fn add_member(
    conn: &mut SqliteConnection,
    kelas_id: &str,
    siswa_id: &str,
) -> AppResult<i64> {
    sqlx::query("INSERT OR IGNORE INTO kelas_siswa (kelas_id, siswa_id) VALUES (?1, ?2)")
        .bind(kelas_id)
        .bind(siswa_id)
        .execute(&mut *conn)
        .await?;
    recount(conn, kelas_id).await
}

/// Pulls a student out of a class's membership set and refreshes the cached count.
/// Returns `None` when the class does not exist (nothing to update).
pub async fn remove_member(
    conn: &mut SqliteConnection,
    kelas_id: &str,
    siswa_id: &str,
) -> AppResult<Option<i64>> {
    sqlx::query("DELETE FROM kelas_siswa WHERE kelas_id = ?1 AND siswa_id = ?2")
        .bind(kelas_id)
        .bind(siswa_id)
        .execute(&mut *conn)
        .await?;

    let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM kelas WHERE id = ?1")
        .bind(kelas_id)
        .fetch_one(&mut *conn)
        .await?
        > 0;
    if !exists {
        return Ok(None);
    }
    recount(conn, kelas_id).await.map(Some)
}

/// Recomputes `jumlah_siswa` from the membership set in a single statement.
async fn recount(conn: &mut SqliteConnection, kelas_id: &str) -> AppResult<i64> {
    sqlx::query(
        r#"
        UPDATE kelas
        SET jumlah_siswa = (SELECT COUNT(*) FROM kelas_siswa WHERE kelas_id = ?1)
        WHERE id = ?1
        "#,
    )
    .bind(kelas_id)
    .execute(&mut *conn)
    .await?;

    let jumlah = sqlx::query_scalar::<_, i64>("SELECT jumlah_siswa FROM kelas WHERE id = ?1")
        .bind(kelas_id)
        .fetch_one(&mut *conn)
        .await?;
    tracing::debug!("Class '{}' now has {} students.", kelas_id, jumlah);
    Ok(jumlah)
}

/// Ids in a class's membership set.
pub async fn member_ids(conn: &mut SqliteConnection, kelas_id: &str) -> AppResult<Vec<String>> {
    let ids = sqlx::query_scalar::<_, String>(
        "SELECT siswa_id FROM kelas_siswa WHERE kelas_id = ?1 ORDER BY siswa_id",
    )
    .bind(kelas_id)
    .fetch_all(conn)
    .await?;
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::setup_test_db;

    #[tokio::test]
    async fn duplicate_class_is_rejected() {
        let pool = setup_test_db().await;
        create_kelas(&pool, "7", "A").await.unwrap();
        let err = create_kelas(&pool, "7", "A").await.unwrap_err();
        assert!(matches!(err, AppError::Duplicate(_)));
        // same section in another grade is fine
        create_kelas(&pool, "8", "A").await.unwrap();
    }

    #[tokio::test]
    async fn blank_fields_are_rejected() {
        let pool = setup_test_db().await;
        let err = create_kelas(&pool, " ", "A").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn membership_changes_keep_count_in_sync() {
        let pool = setup_test_db().await;
        let kelas = create_kelas(&pool, "7", "B").await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        assert_eq!(add_member(&mut conn, &kelas.id, "s1").await.unwrap(), 1);
        assert_eq!(add_member(&mut conn, &kelas.id, "s2").await.unwrap(), 2);
        // adding twice does not inflate the count
        assert_eq!(add_member(&mut conn, &kelas.id, "s2").await.unwrap(), 2);

        assert_eq!(remove_member(&mut conn, &kelas.id, "s1").await.unwrap(), Some(1));
        // pulling an absent member is a no-op
        assert_eq!(remove_member(&mut conn, &kelas.id, "s1").await.unwrap(), Some(1));
        assert_eq!(member_ids(&mut conn, &kelas.id).await.unwrap(), vec!["s2".to_string()]);
    }

    #[tokio::test]
    async fn removing_from_missing_class_reports_none() {
        let pool = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();
        assert_eq!(remove_member(&mut conn, "ghost", "s1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn selector_lookup_matches_grade_and_section() {
        let pool = setup_test_db().await;
        let kelas = create_kelas(&pool, "9", "C").await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let hit = KelasSelector { kelas: "9".into(), nama: "C".into() };
        let miss = KelasSelector { kelas: "9".into(), nama: "".into() };
        assert_eq!(find_kelas_by_selector(&mut conn, &hit).await.unwrap().unwrap().id, kelas.id);
        assert!(find_kelas_by_selector(&mut conn, &miss).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_missing_class_is_not_found() {
        let pool = setup_test_db().await;
        let err = get_kelas(&pool, "nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = delete_kelas(&pool, "nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
