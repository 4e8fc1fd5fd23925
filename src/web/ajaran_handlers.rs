// src/web/ajaran_handlers.rs
use crate::{
    error::AppResult,
    models::tahun_ajaran::{CreateAjaranRequest, EditAjaranRequest},
    services::tahun_ajaran_service,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

// POST /api/ajaran/add-ajaran (admin)
pub async fn handle_add_ajaran(
    State(state): State<AppState>,
    Json(payload): Json<CreateAjaranRequest>,
) -> AppResult<Json<Value>> {
    let ajaran = tahun_ajaran_service::create_ajaran(&state.db_pool, &payload.ajaran).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Berhasil menambahkan tahun ajaran",
        "data": ajaran,
    })))
}

// GET /api/ajaran/get-ajaran
pub async fn handle_get_ajaran(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let ajaran = tahun_ajaran_service::find_all_ajaran(&state.db_pool).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Berhasil mengambil tahun ajaran",
        "ajaran": ajaran,
    })))
}

// PUT /api/ajaran/edit-ajaran/{id} (admin)
pub async fn handle_edit_ajaran(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<EditAjaranRequest>,
) -> AppResult<Json<Value>> {
    let ajaran =
        tahun_ajaran_service::edit_ajaran(&state.db_pool, &id, payload.ajaran.as_deref()).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Berhasil mengubah tahun ajaran",
        "data": ajaran,
    })))
}

// DELETE /api/ajaran/delete-ajaran/{id} (admin)
pub async fn handle_delete_ajaran(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    tahun_ajaran_service::delete_ajaran(&state.db_pool, &id).await?;
    Ok(Json(json!({ "success": true, "message": "Berhasil menghapus tahun ajaran" })))
}
