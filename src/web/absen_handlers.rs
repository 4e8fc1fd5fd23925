// src/web/absen_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        absen::{AddAbsenRequest, RekapAbsen, RekapAbsenQuery},
        user::User,
    },
    services::{absen_service, export, user_service},
    state::AppState,
    templates::RekapAbsenPrint,
    web::mw_auth::CurrentUser,
};
use askama::Template;
use axum::{
    extract::{Extension, Query, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use chrono::{Datelike, Local};
use serde_json::{json, Value};

// POST /api/absen/add-absen
pub async fn handle_add_absen(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<AddAbsenRequest>,
) -> AppResult<Json<Value>> {
    let kelas_id = user_service::resolve_kelas_scope(&user, payload.kelas.as_deref())?;
    let saved =
        absen_service::record_absen(&state.db_pool, &kelas_id, payload.tanggal, &payload.absen)
            .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Berhasil menyimpan absen",
        "jumlah": saved,
    })))
}

/// Month and year from the query; missing values fall back to the current month.
fn parse_periode(query: &RekapAbsenQuery) -> AppResult<(i32, u32)> {
    let today = Local::now().date_naive();

    let bulan = match query.bulan.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v
            .parse::<u32>()
            .ok()
            .filter(|b| (1..=12).contains(b))
            .ok_or_else(|| AppError::BadRequest("Bulan tidak valid.".into()))?,
        None => today.month(),
    };
    let tahun = match query.tahun.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v
            .parse::<i32>()
            .map_err(|_| AppError::BadRequest("Tahun tidak valid.".into()))?,
        None => today.year(),
    };
    Ok((tahun, bulan))
}

async fn load_rekap(
    state: &AppState,
    user: &User,
    query: &RekapAbsenQuery,
) -> AppResult<RekapAbsen> {
    let kelas_id = user_service::resolve_kelas_scope(user, query.kelas.as_deref())?;
    let (tahun, bulan) = parse_periode(query)?;
    absen_service::rekap_absen(&state.db_pool, &kelas_id, tahun, bulan).await
}

// GET /api/absen/rekap-absen?bulan=&tahun=&kelas=
pub async fn handle_rekap_absen(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<RekapAbsenQuery>,
) -> AppResult<Json<Value>> {
    let rekap = load_rekap(&state, &user, &query).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Berhasil mengambil rekap absen",
        "countDay": rekap.count_day,
        "data": rekap,
    })))
}

// GET /api/absen/rekap-absen/export
pub async fn handle_export_absen(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<RekapAbsenQuery>,
) -> AppResult<impl IntoResponse> {
    let rekap = load_rekap(&state, &user, &query).await?;
    let body = export::rekap_absen_csv(&rekap)?;
    let filename = format!(
        "absensi-{}-{}-{}-{}.csv",
        export::slug(&rekap.kelas.kelas),
        export::slug(&rekap.kelas.nama),
        rekap.tahun,
        rekap.bulan
    );
    tracing::info!("📄 Attendance export '{}' requested by '{}'.", filename, user.id);

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

// GET /api/absen/rekap-absen/print
pub async fn handle_print_absen(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<RekapAbsenQuery>,
) -> AppResult<Html<String>> {
    let rekap = load_rekap(&state, &user, &query).await?;
    let page = RekapAbsenPrint::from(&rekap).render()?;
    Ok(Html(page))
}
