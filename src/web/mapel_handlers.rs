// src/web/mapel_handlers.rs
use crate::{
    error::AppResult, models::mapel::CreateMapelRequest, services::mapel_service,
    state::AppState,
};
use axum::{extract::State, Json};
use serde_json::{json, Value};

// POST /api/mapel/add-mapel (admin)
pub async fn handle_add_mapel(
    State(state): State<AppState>,
    Json(payload): Json<CreateMapelRequest>,
) -> AppResult<Json<Value>> {
    let mapel = mapel_service::create_mapel(&state.db_pool, &payload.kode, &payload.nama).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Berhasil menambahkan mata pelajaran",
        "mapel": mapel,
    })))
}

// GET /api/mapel/get-mapel
pub async fn handle_get_mapel(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let mapel = mapel_service::find_all_mapel(&state.db_pool).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Berhasil mengambil mata pelajaran",
        "mapel": mapel,
    })))
}
