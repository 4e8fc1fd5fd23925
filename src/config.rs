// src/config.rs
use crate::error::{AppError, AppResult};
use std::{env, net::SocketAddr};

const DEFAULT_DATABASE_URL: &str = "sqlite://sekolah.db";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Runtime settings, read once from the environment (and `.env`) at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Marks the session cookie `Secure`; leave off when serving plain HTTP.
    pub session_secure: bool,
    pub bcrypt_cost: u32,
    /// Seed admin account, only used when the users table is empty.
    pub admin_id: Option<String>,
    pub admin_password: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::ConfigError(format!("BIND_ADDR: {}", e)))?;

        let session_secure = match env::var("SESSION_SECURE") {
            Ok(v) => parse_bool(&v)
                .ok_or_else(|| AppError::ConfigError(format!("SESSION_SECURE: '{}'", v)))?,
            Err(_) => false,
        };

        let bcrypt_cost = match env::var("BCRYPT_COST") {
            Ok(v) => parse_cost(&v)?,
            Err(_) => bcrypt::DEFAULT_COST,
        };

        Ok(Self {
            database_url,
            bind_addr,
            session_secure,
            bcrypt_cost,
            admin_id: non_empty_var("ADMIN_ID"),
            admin_password: non_empty_var("ADMIN_PASSWORD"),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_cost(value: &str) -> AppResult<u32> {
    let cost = value
        .trim()
        .parse::<u32>()
        .map_err(|e| AppError::ConfigError(format!("BCRYPT_COST: {}", e)))?;
    // bcrypt only accepts 4..=31
    if !(4..=31).contains(&cost) {
        return Err(AppError::ConfigError(format!(
            "BCRYPT_COST must be between 4 and 31, got {}",
            cost
        )));
    }
    Ok(cost)
}
