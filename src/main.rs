// src/main.rs

// --- Modules ---
mod config;
mod db;
mod error;
mod models;
mod services;
mod state;
mod templates;
mod web;

#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod tests;

// --- Imports ---
use crate::{config::AppConfig, services::user_service, state::AppState};
use axum::serve;
use time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tower_sessions::{ExpiredDeletion, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Logging ---
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "sekolah_admin=debug,tower_http=info,sqlx=warn,tower_sessions=info".into()
        }))
        .with(fmt::layer())
        .init();

    tracing::info!("🚀 Starting school administration server...");

    let config = AppConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    // --- Database ---
    let db_pool = match db::create_db_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("❌ Could not initialise the database: {}", e);
            return Err(anyhow::anyhow!("Database connection/migration failed: {}", e));
        }
    };

    if user_service::seed_admin(&db_pool, &config).await? {
        tracing::info!("👤 Seed admin account created.");
    }

    // --- Sessions ---
    let session_store = SqliteStore::new(db_pool.clone())
        .with_table_name("sessions")
        .map_err(|e| anyhow::anyhow!("Invalid session table name: {}", e))?;
    session_store.migrate().await?;

    let cleanup_store = session_store.clone();
    tokio::spawn(async move {
        if let Err(e) = cleanup_store
            .continuously_delete_expired(tokio::time::Duration::from_secs(60 * 60))
            .await
        {
            tracing::error!("Session cleanup task stopped: {:?}", e);
        }
    });
    tracing::info!("🧹 Session cleanup task started.");

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.session_secure)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::days(1)));

    let app_state = AppState {
        db_pool,
        bcrypt_cost: config.bcrypt_cost,
    };

    // --- Listener ---
    let listener = match TcpListener::bind(config.bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("❌ Could not bind {}: {}", config.bind_addr, e);
            return Err(e.into());
        }
    };
    tracing::info!("📡 Listening on http://{}", config.bind_addr);

    let app = web::routes::create_router(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(session_layer),
    );

    if let Err(e) = serve(listener, app.into_make_service()).await {
        tracing::error!("❌ Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
