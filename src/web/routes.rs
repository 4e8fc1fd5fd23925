// src/web/routes.rs
use crate::{
    state::AppState,
    web::{
        absen_handlers, ajaran_handlers, auth_handlers, kelas_handlers, mapel_handlers,
        mw_admin, mw_auth, nilai_handlers, siswa_handlers, user_handlers,
    },
};
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

async fn health() -> Json<Value> {
    Json(json!({ "success": true, "message": "ok" }))
}

pub fn create_router(app_state: AppState) -> Router {
    // --- Public routes ---
    let public_routes = Router::new()
        .route("/api/auth/login", post(auth_handlers::handle_login))
        .route("/api/auth/logout", post(auth_handlers::handle_logout))
        .route("/health", get(health));

    // --- Admin routes ---
    // require_admin only; require_auth comes from the parent router
    let admin_routes = Router::new()
        .route("/api/user/add-guru", post(user_handlers::handle_add_guru))
        .route("/api/siswa/add-siswa", post(siswa_handlers::handle_add_siswa))
        .route("/api/siswa/delete-siswa/{id}", delete(siswa_handlers::handle_delete_one))
        .route("/api/siswa/delete-many-siswa", delete(siswa_handlers::handle_delete_many))
        .route("/api/kelas/add-kelas", post(kelas_handlers::handle_add_kelas))
        .route("/api/kelas/delete-kelas/{id}", delete(kelas_handlers::handle_delete_kelas))
        .route("/api/ajaran/add-ajaran", post(ajaran_handlers::handle_add_ajaran))
        .route("/api/ajaran/edit-ajaran/{id}", put(ajaran_handlers::handle_edit_ajaran))
        .route("/api/ajaran/delete-ajaran/{id}", delete(ajaran_handlers::handle_delete_ajaran))
        .route("/api/mapel/add-mapel", post(mapel_handlers::handle_add_mapel))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_admin::require_admin,
        ));

    // --- Authenticated routes ---
    let authenticated_routes = Router::new()
        .route("/api/auth/me", get(auth_handlers::handle_me))
        .route("/api/siswa/get-siswa", get(siswa_handlers::handle_get_all))
        .route("/api/siswa/get-detail", get(siswa_handlers::handle_get_detail))
        .route("/api/kelas/get-kelas", get(kelas_handlers::handle_get_kelas))
        .route("/api/kelas/get-kelas/{id}", get(kelas_handlers::handle_get_kelas_detail))
        .route("/api/ajaran/get-ajaran", get(ajaran_handlers::handle_get_ajaran))
        .route("/api/mapel/get-mapel", get(mapel_handlers::handle_get_mapel))
        .route("/api/absen/add-absen", post(absen_handlers::handle_add_absen))
        .route("/api/absen/rekap-absen", get(absen_handlers::handle_rekap_absen))
        .route("/api/absen/rekap-absen/export", get(absen_handlers::handle_export_absen))
        .route("/api/absen/rekap-absen/print", get(absen_handlers::handle_print_absen))
        .route("/api/nilai/add-nilai", post(nilai_handlers::handle_add_nilai))
        .route("/api/nilai/rekap-nilai", get(nilai_handlers::handle_rekap_nilai))
        .route("/api/nilai/rekap-nilai/export", get(nilai_handlers::handle_export_nilai))
        .route("/api/nilai/rekap-nilai/print", get(nilai_handlers::handle_print_nilai))
        .merge(admin_routes)
        // Applies to everything above, admin routes included, and runs before require_admin
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_auth::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .with_state(app_state)
}
