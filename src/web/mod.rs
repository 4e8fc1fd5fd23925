// src/web/mod.rs
pub mod absen_handlers;
pub mod ajaran_handlers;
pub mod auth_handlers;
pub mod kelas_handlers;
pub mod mapel_handlers;
pub mod mw_admin;
pub mod mw_auth;
pub mod nilai_handlers;
pub mod routes;
pub mod siswa_handlers;
pub mod user_handlers;
