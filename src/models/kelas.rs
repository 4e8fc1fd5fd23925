// src/models/kelas.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::siswa::SiswaResponse;

/// A class row. `jumlah_siswa` caches the size of the class's membership set (`kelas_siswa`).
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kelas {
    pub id: String,
    pub kelas: String, // grade / level, e.g. "7" or "X"
    pub nama: String,  // section, e.g. "A"
    pub jumlah_siswa: i64,
    pub created_at: DateTime<Utc>,
}

/// Short form embedded in student and recap payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KelasRef {
    pub id: String,
    pub kelas: String,
    pub nama: String,
}

impl From<&Kelas> for KelasRef {
    fn from(k: &Kelas) -> Self {
        Self {
            id: k.id.clone(),
            kelas: k.kelas.clone(),
            nama: k.nama.clone(),
        }
    }
}

/// Composite key used to pick a class when registering a student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KelasSelector {
    pub kelas: String,
    pub nama: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateKelasRequest {
    pub kelas: String,
    pub nama: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KelasDetail {
    #[serde(flatten)]
    pub kelas: Kelas,
    pub siswa: Vec<SiswaResponse>,
}
