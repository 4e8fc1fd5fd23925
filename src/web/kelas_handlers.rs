// src/web/kelas_handlers.rs
use crate::{
    error::AppResult,
    models::kelas::CreateKelasRequest,
    services::kelas_service,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

// POST /api/kelas/add-kelas (admin)
pub async fn handle_add_kelas(
    State(state): State<AppState>,
    Json(payload): Json<CreateKelasRequest>,
) -> AppResult<Json<Value>> {
    let kelas = kelas_service::create_kelas(&state.db_pool, &payload.kelas, &payload.nama).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Berhasil menambahkan kelas",
        "kelas": kelas,
    })))
}

// GET /api/kelas/get-kelas
pub async fn handle_get_kelas(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let kelas = kelas_service::find_all_kelas(&state.db_pool).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Berhasil mengambil data kelas",
        "kelas": kelas,
    })))
}

// GET /api/kelas/get-kelas/{id}
pub async fn handle_get_kelas_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let detail = kelas_service::get_kelas_detail(&state.db_pool, &id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Berhasil mengambil detail kelas",
        "kelas": detail,
    })))
}

// DELETE /api/kelas/delete-kelas/{id} (admin)
pub async fn handle_delete_kelas(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let detached = kelas_service::delete_kelas(&state.db_pool, &id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Berhasil menghapus kelas",
        "siswaDilepas": detached,
    })))
}
