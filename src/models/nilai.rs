// src/models/nilai.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::{kelas::KelasRef, siswa::SiswaBrief};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Semester {
    Ganjil,
    Genap,
}

impl Semester {
    pub fn as_str(self) -> &'static str {
        match self {
            Semester::Ganjil => "ganjil",
            Semester::Genap => "genap",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ganjil" => Some(Semester::Ganjil),
            "genap" => Some(Semester::Genap),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddNilaiRequest {
    pub siswa_id: String,
    pub mapel_id: String,
    pub semester: Semester,
    pub tahun_ajaran: String,
    pub nilai: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct NilaiRow {
    pub siswa_id: String,
    pub nis: String,
    pub siswa_nama: String,
    pub mapel_kode: String,
    pub mapel_nama: String,
    pub nilai: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapelBrief {
    pub kode: String,
    pub nama: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NilaiItem {
    pub siswa: SiswaBrief,
    pub mata_pelajaran: MapelBrief,
    pub nilai: i64,
}

impl From<NilaiRow> for NilaiItem {
    fn from(row: NilaiRow) -> Self {
        Self {
            siswa: SiswaBrief {
                id: row.siswa_id,
                nis: row.nis,
                nama: row.siswa_nama,
            },
            mata_pelajaran: MapelBrief {
                kode: row.mapel_kode,
                nama: row.mapel_nama,
            },
            nilai: row.nilai,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RekapNilaiQuery {
    pub semester: Option<String>,
    pub tahun_ajaran: Option<String>,
    pub kelas: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RekapNilai {
    pub kelas: KelasRef,
    pub semester: Semester,
    pub tahun_ajaran: String,
    /// Distinct subject codes, sorted.
    pub mapel: Vec<String>,
    pub nilai: Vec<NilaiItem>,
    /// Class members, sorted by name; students without grades are listed too.
    pub siswa: Vec<SiswaBrief>,
}

/// One line of the student × subject sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct NilaiSheetRow {
    pub nis: String,
    pub nama: String,
    pub nilai: Vec<Option<i64>>, // aligned with `RekapNilai::mapel`
    pub rata_rata: Option<f64>,
}
