// src/web/siswa_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        pagination::PageInfo,
        siswa::{CreateSiswaRequest, DeleteManySiswaRequest, NewSiswa, SiswaQuery},
    },
    services::{auth_service, siswa_service},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

// GET /api/siswa/get-siswa?page=&limit=&search=&tahunMasuk=&jenisKelamin=&kelasNama=
pub async fn handle_get_all(
    State(state): State<AppState>,
    Query(query): Query<SiswaQuery>,
) -> AppResult<Json<Value>> {
    let filter = query.to_filter()?;
    let pagination = query.pagination();

    let (siswa, total) = siswa_service::find_siswa_page(&state.db_pool, &filter, pagination).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Berhasil mengambil data siswa",
        "data": siswa,
        "pagination": PageInfo::new(pagination, total),
    })))
}

// GET /api/siswa/get-detail
pub async fn handle_get_detail(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let summary = siswa_service::siswa_summary(&state.db_pool).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Berhasil mengambil detail data",
        "data": summary,
    })))
}

// POST /api/siswa/add-siswa (admin)
pub async fn handle_add_siswa(
    State(state): State<AppState>,
    Json(payload): Json<CreateSiswaRequest>,
) -> AppResult<Json<Value>> {
    let nis = payload.nis.trim().to_string();
    let nama = payload.nama.trim().to_string();
    if nis.is_empty() || nama.is_empty() {
        return Err(AppError::BadRequest("NIS dan nama wajib diisi.".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::BadRequest("Password wajib diisi.".into()));
    }

    let kelas = payload.kelas_selector();
    let password_hash = auth_service::hash_password(&payload.password, state.bcrypt_cost).await?;
    let foto = payload.foto.filter(|f| !f.trim().is_empty());

    let siswa = siswa_service::create_siswa(
        &state.db_pool,
        NewSiswa {
            nis,
            nama,
            jenis_kelamin: payload.jenis_kelamin,
            tahun_masuk: payload.tahun_masuk,
            password_hash,
            foto,
            kelas,
        },
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Berhasil menambahkan siswa",
        "data": siswa,
    })))
}

// DELETE /api/siswa/delete-siswa/{id} (admin)
pub async fn handle_delete_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    siswa_service::delete_siswa(&state.db_pool, &id).await?;
    Ok(Json(json!({ "success": true, "message": "Berhasil menghapus siswa" })))
}

// DELETE /api/siswa/delete-many-siswa (admin), body: { "dataChecked": [...] }
pub async fn handle_delete_many(
    State(state): State<AppState>,
    Json(payload): Json<DeleteManySiswaRequest>,
) -> AppResult<Json<Value>> {
    let deleted = siswa_service::delete_many_siswa(&state.db_pool, &payload.data_checked).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Berhasil menghapus siswa terpilih",
        "deleted": deleted,
    })))
}
