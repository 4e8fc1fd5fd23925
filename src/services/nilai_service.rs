// src/services/nilai_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        kelas::KelasRef,
        nilai::{AddNilaiRequest, NilaiItem, NilaiRow, NilaiSheetRow, RekapNilai, Semester},
        siswa::SiswaBrief,
    },
    services::{kelas_service, mapel_service, tahun_ajaran_service},
};
use sqlx::SqlitePool;
use std::collections::HashMap;
use uuid::Uuid;

/// Stores a grade, replacing any earlier one for the same student/subject/semester/year.
pub async fn record_nilai(db_pool: &SqlitePool, req: &AddNilaiRequest) -> AppResult<()> {
    if !(0..=100).contains(&req.nilai) {
        return Err(AppError::BadRequest("Nilai harus antara 0 dan 100.".into()));
    }

    let siswa_exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM siswa WHERE id = ?1")
        .bind(&req.siswa_id)
        .fetch_one(db_pool)
        .await?
        > 0;
    if !siswa_exists {
        return Err(AppError::NotFound("Siswa tidak ditemukan.".into()));
    }
    if mapel_service::find_mapel_by_id(db_pool, &req.mapel_id).await?.is_none() {
        return Err(AppError::NotFound("Mata pelajaran tidak ditemukan.".into()));
    }
    if !tahun_ajaran_service::ajaran_exists(db_pool, &req.tahun_ajaran).await? {
        return Err(AppError::NotFound("Tahun ajaran tidak ditemukan.".into()));
    }

    sqlx::query(
        r#"
        INSERT INTO nilai (id, siswa_id, mapel_id, semester, tahun_ajaran, nilai)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT(siswa_id, mapel_id, semester, tahun_ajaran) DO UPDATE SET
            nilai = excluded.nilai
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&req.siswa_id)
    .bind(&req.mapel_id)
    .bind(req.semester)
    .bind(req.tahun_ajaran.trim())
    .bind(req.nilai)
    .execute(db_pool)
    .await?;

    tracing::info!(
        "✅ Grade saved: student '{}', subject '{}', {} {}.",
        req.siswa_id,
        req.mapel_id,
        req.semester.as_str(),
        req.tahun_ajaran
    );
    Ok(())
}

/// Grade recap of a class for one semester, sorted by subject code then student name.
pub async fn rekap_nilai(
    db_pool: &SqlitePool,
    kelas_id: &str,
    semester: Semester,
    tahun_ajaran: &str,
) -> AppResult<RekapNilai> {
    let kelas = kelas_service::get_kelas(db_pool, kelas_id).await?;
    let tahun_ajaran = tahun_ajaran.trim();

    let rows = sqlx::query_as::<_, NilaiRow>(
        r#"
        SELECT s.id AS siswa_id, s.nis, s.nama AS siswa_nama,
               m.kode AS mapel_kode, m.nama AS mapel_nama, n.nilai
        FROM nilai n
        JOIN siswa s ON s.id = n.siswa_id
        JOIN mata_pelajaran m ON m.id = n.mapel_id
        JOIN kelas_siswa ks ON ks.siswa_id = n.siswa_id AND ks.kelas_id = ?1
        WHERE n.semester = ?2 AND n.tahun_ajaran = ?3
        "#,
    )
    .bind(kelas_id)
    .bind(semester)
    .bind(tahun_ajaran)
    .fetch_all(db_pool)
    .await?;

    let siswa = sqlx::query_as::<_, SiswaBrief>(
        r#"
        SELECT s.id, s.nis, s.nama
        FROM kelas_siswa ks
        JOIN siswa s ON s.id = ks.siswa_id
        WHERE ks.kelas_id = ?1
        ORDER BY s.nama ASC
        "#,
    )
    .bind(kelas_id)
    .fetch_all(db_pool)
    .await?;

    let mut nilai: Vec<NilaiItem> = rows.into_iter().map(NilaiItem::from).collect();
    nilai.sort_by(|a, b| {
        a.mata_pelajaran
            .kode
            .cmp(&b.mata_pelajaran.kode)
            .then_with(|| a.siswa.nama.cmp(&b.siswa.nama))
    });
    let mapel = unique_mapel(&nilai);

    tracing::debug!(
        "Grade recap for class '{}' ({} {}): {} grades over {} subjects.",
        kelas_id,
        semester.as_str(),
        tahun_ajaran,
        nilai.len(),
        mapel.len()
    );

    Ok(RekapNilai {
        kelas: KelasRef::from(&kelas),
        semester,
        tahun_ajaran: tahun_ajaran.to_string(),
        mapel,
        nilai,
        siswa,
    })
}

/// Distinct subject codes in ascending order.
pub fn unique_mapel(nilai: &[NilaiItem]) -> Vec<String> {
    let mut kode: Vec<String> = nilai.iter().map(|n| n.mata_pelajaran.kode.clone()).collect();
    kode.sort();
    kode.dedup();
    kode
}

/// Pivots the recap into one row per student with a column per subject code.
pub fn nilai_sheet(rekap: &RekapNilai) -> Vec<NilaiSheetRow> {
    let column: HashMap<&str, usize> = rekap
        .mapel
        .iter()
        .enumerate()
        .map(|(i, kode)| (kode.as_str(), i))
        .collect();

    let mut scores: HashMap<&str, Vec<Option<i64>>> = HashMap::new();
    for item in &rekap.nilai {
        if let Some(&col) = column.get(item.mata_pelajaran.kode.as_str()) {
            scores
                .entry(item.siswa.id.as_str())
                .or_insert_with(|| vec![None; rekap.mapel.len()])[col] = Some(item.nilai);
        }
    }

    rekap
        .siswa
        .iter()
        .map(|s| {
            let nilai = scores
                .remove(s.id.as_str())
                .unwrap_or_else(|| vec![None; rekap.mapel.len()]);
            let present: Vec<i64> = nilai.iter().flatten().copied().collect();
            let rata_rata = if present.is_empty() {
                None
            } else {
                Some(present.iter().sum::<i64>() as f64 / present.len() as f64)
            };
            NilaiSheetRow {
                nis: s.nis.clone(),
                nama: s.nama.clone(),
                nilai,
                rata_rata,
            }
        })
        .collect()
}
