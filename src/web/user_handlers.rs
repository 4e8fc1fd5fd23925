// src/web/user_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{CreateGuruRequest, NewUser, ROLE_GURU},
    services::{auth_service, user_service},
    state::AppState,
};
use axum::{extract::State, Json};
use serde_json::{json, Value};

// POST /api/user/add-guru (admin)
pub async fn handle_add_guru(
    State(state): State<AppState>,
    Json(payload): Json<CreateGuruRequest>,
) -> AppResult<Json<Value>> {
    if payload.password.is_empty() {
        return Err(AppError::BadRequest("Password wajib diisi.".into()));
    }

    let password_hash = auth_service::hash_password(&payload.password, state.bcrypt_cost).await?;
    let wali_kelas_id = payload
        .wali_kelas
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());

    let user = user_service::create_user(
        &state.db_pool,
        NewUser {
            id: payload.id.trim().to_string(),
            nama: payload.nama.trim().to_string(),
            role: ROLE_GURU.to_string(),
            password_hash,
            wali_kelas_id,
        },
    )
    .await?;
    let profile = user_service::user_profile(&state.db_pool, &user).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Berhasil menambahkan guru",
        "user": profile,
    })))
}
