// src/web/nilai_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        nilai::{AddNilaiRequest, RekapNilai, RekapNilaiQuery, Semester},
        user::User,
    },
    services::{export, nilai_service, user_service},
    state::AppState,
    templates::RekapNilaiPrint,
    web::mw_auth::CurrentUser,
};
use askama::Template;
use axum::{
    extract::{Extension, Query, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use serde_json::{json, Value};

// POST /api/nilai/add-nilai
pub async fn handle_add_nilai(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<AddNilaiRequest>,
) -> AppResult<Json<Value>> {
    user_service::ensure_siswa_in_scope(&state.db_pool, &user, &payload.siswa_id).await?;
    nilai_service::record_nilai(&state.db_pool, &payload).await?;
    tracing::debug!("Grade recorded by '{}'.", user.id);
    Ok(Json(json!({ "success": true, "message": "Berhasil menyimpan nilai" })))
}

async fn load_rekap(state: &AppState, user: &User, query: &RekapNilaiQuery) -> AppResult<RekapNilai> {
    let kelas_id = user_service::resolve_kelas_scope(user, query.kelas.as_deref())?;
    let semester = query
        .semester
        .as_deref()
        .and_then(Semester::parse)
        .ok_or_else(|| AppError::BadRequest("Semester harus ganjil atau genap.".into()))?;
    let tahun_ajaran = query
        .tahun_ajaran
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("Tahun ajaran wajib diisi.".into()))?;

    nilai_service::rekap_nilai(&state.db_pool, &kelas_id, semester, tahun_ajaran).await
}

// GET /api/nilai/rekap-nilai?semester=&tahunAjaran=&kelas=
pub async fn handle_rekap_nilai(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<RekapNilaiQuery>,
) -> AppResult<Json<Value>> {
    let rekap = load_rekap(&state, &user, &query).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Berhasil mengambil rekap nilai",
        "mapel": rekap.mapel,
        "data": rekap,
    })))
}

// GET /api/nilai/rekap-nilai/export
pub async fn handle_export_nilai(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<RekapNilaiQuery>,
) -> AppResult<impl IntoResponse> {
    let rekap = load_rekap(&state, &user, &query).await?;
    let body = export::rekap_nilai_csv(&rekap)?;
    let filename = format!(
        "nilai-{}-{}-{}-{}.csv",
        export::slug(&rekap.kelas.kelas),
        export::slug(&rekap.kelas.nama),
        rekap.semester.as_str(),
        export::slug(&rekap.tahun_ajaran)
    );
    tracing::info!("📄 Grade export '{}' requested by '{}'.", filename, user.id);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    ))
}

// GET /api/nilai/rekap-nilai/print
pub async fn handle_print_nilai(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<RekapNilaiQuery>,
) -> AppResult<Html<String>> {
    let rekap = load_rekap(&state, &user, &query).await?;
    Ok(Html(RekapNilaiPrint::from(&rekap).render()?))
}
