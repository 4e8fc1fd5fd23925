// src/models/mapel.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MataPelajaran {
    pub id: String,
    pub kode: String,
    pub nama: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateMapelRequest {
    pub kode: String,
    pub nama: String,
}
