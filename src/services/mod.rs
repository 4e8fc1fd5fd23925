// src/services/mod.rs
pub mod absen_service;
pub mod auth_service;
pub mod export;
pub mod kelas_service;
pub mod mapel_service;
pub mod nilai_service;
pub mod siswa_service;
pub mod tahun_ajaran_service;
pub mod user_service;
