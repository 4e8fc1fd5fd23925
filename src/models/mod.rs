// src/models/mod.rs
pub mod absen;
pub mod kelas;
pub mod mapel;
pub mod nilai;
pub mod pagination;
pub mod siswa;
pub mod tahun_ajaran;
pub mod user;
