// src/web/auth_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::LoginRequest,
    services::{auth_service, user_service},
    state::AppState,
    web::mw_auth::{CurrentUser, SESSION_USER_KEY},
};
use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::{json, Value};
use tower_sessions::Session;

// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginRequest>,
) -> AppResult<Json<Value>> {
    tracing::info!("Login attempt for id: {}", form.id);

    let user = match user_service::find_user_by_id(&state.db_pool, form.id.trim()).await? {
        Some(user) => user,
        None => {
            tracing::warn!("Unknown user: {}", form.id);
            return Err(AppError::InvalidCredentials);
        }
    };

    if !auth_service::verify_password(&form.password, &user.password_hash).await? {
        tracing::warn!("Wrong password for id: {}", form.id);
        return Err(AppError::InvalidCredentials);
    }

    // New session id on login
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::SessionError(format!("Failed to cycle id: {}", e)))?;
    session
        .insert(SESSION_USER_KEY, &user.id)
        .await
        .map_err(|e| AppError::SessionError(format!("Failed to write session: {}", e)))?;

    let profile = user_service::user_profile(&state.db_pool, &user).await?;
    tracing::info!("✅ Login successful for: {}", user.id);
    Ok(Json(json!({
        "success": true,
        "message": "Login berhasil",
        "user": profile,
    })))
}

// POST /api/auth/logout
pub async fn handle_logout(session: Session) -> AppResult<Json<Value>> {
    let user_id: Option<String> = session.get(SESSION_USER_KEY).await.ok().flatten();

    session
        .delete()
        .await
        .map_err(|e| AppError::SessionError(format!("Failed to delete session: {}", e)))?;

    match user_id {
        Some(id) => tracing::info!("🚪 User '{}' logged out.", id),
        None => tracing::info!("🚪 Anonymous session closed."),
    }

    Ok(Json(json!({ "success": true, "message": "Logout berhasil" })))
}

// GET /api/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AppResult<Json<Value>> {
    let profile = user_service::user_profile(&state.db_pool, &user).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Berhasil mengambil data pengguna",
        "user": profile,
    })))
}
