// src/models/tahun_ajaran.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const MAX_AJARAN_LEN: usize = 10;

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TahunAjaran {
    pub id: String,
    pub ajaran: String, // e.g. "2024/2025"
    pub is_aktif: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAjaranRequest {
    pub ajaran: String,
}

/// Body of `edit-ajaran/{id}`. The client may send only the id; a label renames the year.
#[derive(Debug, Default, Deserialize)]
pub struct EditAjaranRequest {
    #[serde(default)]
    pub ajaran: Option<String>,
}
