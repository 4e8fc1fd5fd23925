// src/models/absen.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::kelas::KelasRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum StatusAbsen {
    Hadir,
    Izin,
    Sakit,
    Alpha,
}

impl StatusAbsen {
    /// One-letter code used in recap sheets.
    pub fn code(self) -> &'static str {
        match self {
            StatusAbsen::Hadir => "H",
            StatusAbsen::Izin => "I",
            StatusAbsen::Sakit => "S",
            StatusAbsen::Alpha => "A",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsenEntry {
    pub siswa_id: String,
    pub status: StatusAbsen,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAbsenRequest {
    #[serde(default)]
    pub kelas: Option<String>, // class id; defaults to the caller's wali kelas
    pub tanggal: NaiveDate,
    pub absen: Vec<AbsenEntry>,
}

#[derive(Debug, Clone, FromRow)]
pub struct AbsenRow {
    pub siswa_id: String,
    pub tanggal: NaiveDate,
    pub status: StatusAbsen,
}

#[derive(Debug, Default, Deserialize)]
pub struct RekapAbsenQuery {
    pub bulan: Option<String>,
    pub tahun: Option<String>,
    pub kelas: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RekapAbsenSiswa {
    pub siswa_id: String,
    pub nis: String,
    pub nama: String,
    /// One slot per day of the month, `None` when nothing was recorded.
    pub status_per_hari: Vec<Option<StatusAbsen>>,
    pub total_hadir: u32,
    pub total_izin: u32,
    pub total_sakit: u32,
    pub total_alpha: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RekapAbsen {
    pub kelas: KelasRef,
    pub tahun: i32,
    pub bulan: u32,
    pub count_day: u32,
    pub rekap: Vec<RekapAbsenSiswa>,
}
