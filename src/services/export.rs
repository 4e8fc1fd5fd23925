// src/services/export.rs
//! Spreadsheet (CSV) rendering of the recaps.
use crate::{
    error::{AppError, AppResult},
    models::{absen::RekapAbsen, nilai::RekapNilai},
    services::nilai_service,
};

pub const NAMA_BULAN: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni", "Juli", "Agustus", "September",
    "Oktober", "November", "Desember",
];

pub fn nama_bulan(bulan: u32) -> &'static str {
    NAMA_BULAN
        .get((bulan as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("")
}

pub fn rekap_absen_title(rekap: &RekapAbsen) -> String {
    format!(
        "Absensi Kelas {} {} {} {}",
        rekap.kelas.kelas,
        rekap.kelas.nama,
        nama_bulan(rekap.bulan),
        rekap.tahun
    )
}

pub fn rekap_nilai_title(rekap: &RekapNilai) -> String {
    format!(
        "Rekap Nilai Kelas {} {} Semester {} {}",
        rekap.kelas.kelas,
        rekap.kelas.nama,
        rekap.semester.as_str(),
        rekap.tahun_ajaran
    )
}

/// Filename-safe slug, e.g. "2024/2025" -> "2024-2025".
pub fn slug(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

fn writer() -> csv::Writer<Vec<u8>> {
    // the title row is shorter than the table rows
    csv::WriterBuilder::new().flexible(true).from_writer(Vec::new())
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> AppResult<Vec<u8>> {
    wtr.into_inner().map_err(|e| {
        tracing::error!("Failed to flush CSV buffer: {:?}", e.error());
        AppError::InternalServerError
    })
}

/// Title row, then `Nama Siswa | 1..n | H | I | S | A`, then one row per student.
pub fn rekap_absen_csv(rekap: &RekapAbsen) -> AppResult<Vec<u8>> {
    let mut wtr = writer();
    wtr.write_record([rekap_absen_title(rekap)])?;

    let mut header = vec!["Nama Siswa".to_string()];
    header.extend((1..=rekap.count_day).map(|d| d.to_string()));
    header.extend(["H", "I", "S", "A"].map(String::from));
    wtr.write_record(&header)?;

    for siswa in &rekap.rekap {
        let mut row = vec![siswa.nama.clone()];
        row.extend(
            siswa
                .status_per_hari
                .iter()
                .map(|s| s.map(|s| s.code()).unwrap_or("").to_string()),
        );
        row.extend(
            [siswa.total_hadir, siswa.total_izin, siswa.total_sakit, siswa.total_alpha]
                .map(|t| t.to_string()),
        );
        wtr.write_record(&row)?;
    }

    finish(wtr)
}

/// Title row, then `NIS | Nama Siswa | <kode>... | Rata-rata`, one row per student.
pub fn rekap_nilai_csv(rekap: &RekapNilai) -> AppResult<Vec<u8>> {
    let mut wtr = writer();
    wtr.write_record([rekap_nilai_title(rekap)])?;

    let mut header = vec!["NIS".to_string(), "Nama Siswa".to_string()];
    header.extend(rekap.mapel.iter().cloned());
    header.push("Rata-rata".to_string());
    wtr.write_record(&header)?;

    for row in nilai_service::nilai_sheet(rekap) {
        let mut record = vec![row.nis, row.nama];
        record.extend(
            row.nilai
                .iter()
                .map(|n| n.map(|n| n.to_string()).unwrap_or_default()),
        );
        record.push(row.rata_rata.map(|r| format!("{:.2}", r)).unwrap_or_default());
        wtr.write_record(&record)?;
    }

    finish(wtr)
}
