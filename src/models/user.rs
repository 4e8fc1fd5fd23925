// src/models/user.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::kelas::KelasRef;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_GURU: &str = "guru";

// A staff account read from the 'users' table
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub password_hash: String,
    pub nama: String,
    pub role: String, // "admin" or "guru"
    pub wali_kelas_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case(ROLE_ADMIN)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub id: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGuruRequest {
    pub id: String,
    pub nama: String,
    pub password: String,
    #[serde(default)]
    pub wali_kelas: Option<String>, // class id
}

/// Input for `user_service::create_user`, password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub nama: String,
    pub role: String,
    pub password_hash: String,
    pub wali_kelas_id: Option<String>,
}

// What the client sees about the logged-in account
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub nama: String,
    pub role: String,
    pub wali_kelas: Option<KelasRef>,
}
