// src/services/absen_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        absen::{AbsenEntry, AbsenRow, RekapAbsen, RekapAbsenSiswa, StatusAbsen},
        kelas::KelasRef,
        siswa::SiswaBrief,
    },
    services::kelas_service,
};
use chrono::{Datelike, NaiveDate};
use sqlx::SqlitePool;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// First day of the month and first day of the following month.
fn month_bounds(tahun: i32, bulan: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(tahun, bulan, 1)?;
    let end = if bulan == 12 {
        NaiveDate::from_ymd_opt(tahun + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(tahun, bulan + 1, 1)?
    };
    Some((start, end))
}

pub fn days_in_month(tahun: i32, bulan: u32) -> Option<u32> {
    let (start, end) = month_bounds(tahun, bulan)?;
    Some((end - start).num_days() as u32)
}

/// Stores (or overwrites) the attendance of a class on one day.
pub async fn record_absen(
    db_pool: &SqlitePool,
    kelas_id: &str,
    tanggal: NaiveDate,
    entries: &[AbsenEntry],
) -> AppResult<usize> {
    if entries.is_empty() {
        return Err(AppError::BadRequest("Data absen kosong.".into()));
    }

    let mut tx = db_pool.begin().await?;

    if kelas_service::find_kelas_by_id(&mut tx, kelas_id).await?.is_none() {
        return Err(AppError::NotFound("Kelas tidak ditemukan.".into()));
    }
    let members: HashSet<String> = kelas_service::member_ids(&mut tx, kelas_id)
        .await?
        .into_iter()
        .collect();

    for entry in entries {
        if !members.contains(&entry.siswa_id) {
            return Err(AppError::BadRequest(format!(
                "Siswa {} bukan anggota kelas ini.",
                entry.siswa_id
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO absen (id, siswa_id, kelas_id, tanggal, status)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(siswa_id, tanggal) DO UPDATE SET
                status = excluded.status,
                kelas_id = excluded.kelas_id
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&entry.siswa_id)
        .bind(kelas_id)
        .bind(tanggal)
        .bind(entry.status)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!(
        "✅ Attendance for class '{}' on {} saved ({} entries).",
        kelas_id,
        tanggal,
        entries.len()
    );
    Ok(entries.len())
}

/// Attendance recap of a class for one month.
pub async fn rekap_absen(
    db_pool: &SqlitePool,
    kelas_id: &str,
    tahun: i32,
    bulan: u32,
) -> AppResult<RekapAbsen> {
    let (start, end) = month_bounds(tahun, bulan)
        .ok_or_else(|| AppError::BadRequest("Bulan atau tahun tidak valid.".into()))?;
    let count_day = (end - start).num_days() as u32;

    let kelas = kelas_service::get_kelas(db_pool, kelas_id).await?;

    let members = sqlx::query_as::<_, SiswaBrief>(
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

    let rows = sqlx::query_as::<_, AbsenRow>(
        r#"
        SELECT a.siswa_id, a.tanggal, a.status
        FROM absen a
        JOIN kelas_siswa ks ON ks.siswa_id = a.siswa_id AND ks.kelas_id = ?1
        WHERE a.tanggal >= ?2 AND a.tanggal < ?3
        "#,
    )
    .bind(kelas_id)
    .bind(start)
    .bind(end)
    .fetch_all(db_pool)
    .await?;

    tracing::debug!(
        "Attendance recap for class '{}' {}-{:02}: {} students, {} records.",
        kelas_id,
        tahun,
        bulan,
        members.len(),
        rows.len()
    );

    Ok(RekapAbsen {
        kelas: KelasRef::from(&kelas),
        tahun,
        bulan,
        count_day,
        rekap: build_rekap_absen(count_day, members, &rows),
    })
}

/// Lays attendance rows out as one status slot per day and counts each status.
pub fn build_rekap_absen(
    count_day: u32,
    members: Vec<SiswaBrief>,
    rows: &[AbsenRow],
) -> Vec<RekapAbsenSiswa> {
    let mut by_siswa: HashMap<&str, Vec<Option<StatusAbsen>>> = HashMap::new();
    for row in rows {
        let day = row.tanggal.day() as usize;
        if day == 0 || day > count_day as usize {
            continue;
        }
        let slots = by_siswa
            .entry(row.siswa_id.as_str())
            .or_insert_with(|| vec![None; count_day as usize]);
        slots[day - 1] = Some(row.status);
    }

    members
        .into_iter()
        .map(|siswa| {
            let status_per_hari = by_siswa
                .remove(siswa.id.as_str())
                .unwrap_or_else(|| vec![None; count_day as usize]);
            let count = |s: StatusAbsen| status_per_hari.iter().filter(|x| **x == Some(s)).count() as u32;
            RekapAbsenSiswa {
                total_hadir: count(StatusAbsen::Hadir),
                total_izin: count(StatusAbsen::Izin),
                total_sakit: count(StatusAbsen::Sakit),
                total_alpha: count(StatusAbsen::Alpha),
                siswa_id: siswa.id,
                nis: siswa.nis,
                nama: siswa.nama,
                status_per_hari,
            }
        })
        .collect()
}
