// src/models/siswa.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::kelas::{KelasRef, KelasSelector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum JenisKelamin {
    #[serde(rename = "Laki-Laki")]
    #[sqlx(rename = "Laki-Laki")]
    LakiLaki,
    #[serde(rename = "Perempuan")]
    #[sqlx(rename = "Perempuan")]
    Perempuan,
}

/// Student row joined with its class (LEFT JOIN, so the class columns may be NULL).
/// The password hash is never selected into this struct.
#[derive(Debug, Clone, FromRow)]
pub struct SiswaRow {
    pub id: String,
    pub nis: String,
    pub nama: String,
    pub jenis_kelamin: JenisKelamin,
    pub tahun_masuk: i64,
    pub foto: Option<String>,
    pub kelas_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub kelas_kelas: Option<String>,
    pub kelas_nama: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiswaResponse {
    pub id: String,
    pub nis: String,
    pub nama: String,
    pub jenis_kelamin: JenisKelamin,
    pub tahun_masuk: i64,
    pub foto: Option<String>,
    pub kelas: Option<KelasRef>,
    pub created_at: DateTime<Utc>,
}

impl From<SiswaRow> for SiswaResponse {
    fn from(row: SiswaRow) -> Self {
        // A reference to a class that no longer exists shows up as no class
        let kelas = match (row.kelas_id, row.kelas_kelas, row.kelas_nama) {
            (Some(id), Some(kelas), Some(nama)) => Some(KelasRef { id, kelas, nama }),
            _ => None,
        };
        Self {
            id: row.id,
            nis: row.nis,
            nama: row.nama,
            jenis_kelamin: row.jenis_kelamin,
            tahun_masuk: row.tahun_masuk,
            foto: row.foto,
            kelas,
            created_at: row.created_at,
        }
    }
}

/// Just enough of a student to maintain class membership.
#[derive(Debug, Clone, FromRow)]
pub struct SiswaKelasRef {
    pub id: String,
    pub kelas_id: Option<String>,
}

/// Minimal student info used in recaps.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct SiswaBrief {
    pub id: String,
    pub nis: String,
    pub nama: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSiswaRequest {
    pub nis: String,
    pub nama: String,
    pub jenis_kelamin: JenisKelamin,
    pub tahun_masuk: i64,
    pub password: String,
    #[serde(default)]
    pub foto: Option<String>,
    // Class selector: grade + section
    #[serde(default)]
    pub kelas: Option<String>,
    #[serde(default)]
    pub nama_kelas: Option<String>,
}

impl CreateSiswaRequest {
    /// `None` when neither selector field is given. A half-filled selector is still a
    /// selector, and will simply not match any class.
    pub fn kelas_selector(&self) -> Option<KelasSelector> {
        let kelas = self.kelas.as_deref().map(str::trim).unwrap_or_default();
        let nama = self.nama_kelas.as_deref().map(str::trim).unwrap_or_default();
        if kelas.is_empty() && nama.is_empty() {
            None
        } else {
            Some(KelasSelector {
                kelas: kelas.to_string(),
                nama: nama.to_string(),
            })
        }
    }
}

/// Validated input for `siswa_service::create_siswa`.
#[derive(Debug, Clone)]
pub struct NewSiswa {
    pub nis: String,
    pub nama: String,
    pub jenis_kelamin: JenisKelamin,
    pub tahun_masuk: i64,
    pub password_hash: String,
    pub foto: Option<String>,
    pub kelas: Option<KelasSelector>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteManySiswaRequest {
    pub data_checked: Vec<String>,
}

/// Raw query string of `get-siswa`. Everything arrives as text; empty values mean "not set".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiswaQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub tahun_masuk: Option<String>,
    pub jenis_kelamin: Option<String>,
    pub kelas_nama: Option<String>,
}

/// Normalized filters for the student list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SiswaFilter {
    pub search: Option<String>,
    pub tahun_masuk: Option<i64>,
    pub jenis_kelamin: Option<String>,
    pub kelas_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiswaSummary {
    pub jumlah_siswa: i64,
    pub lk: Vec<SiswaResponse>,
    pub pr: Vec<SiswaResponse>,
}
