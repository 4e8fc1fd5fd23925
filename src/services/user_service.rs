// src/services/user_service.rs
use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    models::{
        kelas::KelasRef,
        user::{NewUser, User, UserProfile, ROLE_ADMIN},
    },
    services::{auth_service, kelas_service},
};
use chrono::Utc;
use sqlx::SqlitePool;

/// Fetches an account by its login id.
pub async fn find_user_by_id(db_pool: &SqlitePool, user_id: &str) -> AppResult<Option<User>> {
    tracing::debug!("Looking up user by id: {}", user_id);
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, password_hash, nama, role, wali_kelas_id, created_at
        FROM users
        WHERE id = ?1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db_pool)
    .await?;

    if user.is_none() {
        tracing::debug!("User '{}' not found.", user_id);
    }
    Ok(user)
}

pub async fn count_users(db_pool: &SqlitePool) -> AppResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(db_pool)
        .await?;
    Ok(count)
}

pub async fn create_user(db_pool: &SqlitePool, new: NewUser) -> AppResult<User> {
    tracing::info!("Creating {} account: {}", new.role, new.id);

    if new.id.trim().is_empty() || new.nama.trim().is_empty() {
        return Err(AppError::BadRequest("ID dan nama wajib diisi.".into()));
    }

    if let Some(kelas_id) = &new.wali_kelas_id {
        // fails with 404 when the class is missing
        kelas_service::get_kelas(db_pool, kelas_id).await?;
    }

    let created_at = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO users (id, password_hash, nama, role, wali_kelas_id, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&new.id)
    .bind(&new.password_hash)
    .bind(&new.nama)
    .bind(&new.role)
    .bind(&new.wali_kelas_id)
    .bind(created_at)
    .execute(db_pool)
    .await
    .map_err(|e| AppError::from_insert(e, "ID pengguna sudah digunakan."))?;

    tracing::info!("✅ Account '{}' created.", new.id);
    Ok(User {
        id: new.id,
        password_hash: new.password_hash,
        nama: new.nama,
        role: new.role,
        wali_kelas_id: new.wali_kelas_id,
        created_at,
    })
}

/// Creates the configured admin account when the users table is still empty.
pub async fn seed_admin(db_pool: &SqlitePool, config: &AppConfig) -> AppResult<bool> {
    let (Some(admin_id), Some(admin_password)) = (&config.admin_id, &config.admin_password) else {
        tracing::debug!("ADMIN_ID/ADMIN_PASSWORD not set, skipping admin seed.");
        return Ok(false);
    };

    if count_users(db_pool).await? > 0 {
        tracing::debug!("Accounts already exist, skipping admin seed.");
        return Ok(false);
    }

    let password_hash = auth_service::hash_password(admin_password, config.bcrypt_cost).await?;
    create_user(
        db_pool,
        NewUser {
            id: admin_id.clone(),
            nama: "Administrator".to_string(),
            role: ROLE_ADMIN.to_string(),
            password_hash,
            wali_kelas_id: None,
        },
    )
    .await?;
    tracing::info!("🔑 Seeded admin account '{}'.", admin_id);
    Ok(true)
}

pub async fn user_profile(db_pool: &SqlitePool, user: &User) -> AppResult<UserProfile> {
    let wali_kelas = match &user.wali_kelas_id {
        Some(kelas_id) => {
            let mut conn = db_pool.acquire().await?;
            kelas_service::find_kelas_by_id(&mut conn, kelas_id)
                .await?
                .as_ref()
                .map(KelasRef::from)
        }
        None => None,
    };

    Ok(UserProfile {
        id: user.id.clone(),
        nama: user.nama.clone(),
        role: user.role.clone(),
        wali_kelas,
    })
}

/// Picks the class a recap or attendance request works on.
/// Guru accounts default to (and are limited to) their own wali kelas; admins must name one.
pub fn resolve_kelas_scope(user: &User, requested: Option<&str>) -> AppResult<String> {
    let requested = requested.map(str::trim).filter(|k| !k.is_empty());

    if user.is_admin() {
        return requested
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("Kelas wajib dipilih.".into()));
    }

    match (&user.wali_kelas_id, requested) {
        (Some(own), None) => Ok(own.clone()),
        (Some(own), Some(req)) if own == req => Ok(own.clone()),
        (Some(_), Some(req)) => {
            tracing::warn!("User '{}' tried to access class '{}'.", user.id, req);
            Err(AppError::Forbidden)
        }
        (None, _) => Err(AppError::BadRequest("Anda bukan wali kelas.".into())),
    }
}

/// Guru accounts may only touch students of their own wali kelas; admins reach everyone.
pub async fn ensure_siswa_in_scope(db_pool: &SqlitePool, user: &User, siswa_id: &str) -> AppResult<()> {
    if user.is_admin() {
        return Ok(());
    }
    let Some(kelas_id) = &user.wali_kelas_id else {
        return Err(AppError::BadRequest("Anda bukan wali kelas.".into()));
    };

    let member = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM kelas_siswa WHERE kelas_id = ?1 AND siswa_id = ?2",
    )
    .bind(kelas_id)
    .bind(siswa_id)
    .fetch_one(db_pool)
    .await?
        > 0;

    if !member {
        tracing::warn!(
            "User '{}' tried to reach student '{}' outside class '{}'.",
            user.id,
            siswa_id,
            kelas_id
        );
        return Err(AppError::Forbidden);
    }
    Ok(())
}
