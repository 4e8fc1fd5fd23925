// src/web/mw_auth.rs
use crate::{error::AppError, models::user::User, services::user_service, state::AppState};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;

pub const SESSION_USER_KEY: &str = "user_id";

// The logged-in account, placed in the request extensions by `require_auth`
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Lets a request through only when the session belongs to an existing account.
pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = session
        .get::<String>(SESSION_USER_KEY)
        .await
        .map_err(|e| {
            tracing::error!("Auth MW: failed to read session: {:?}", e);
            AppError::SessionError(format!("Failed to read session: {}", e))
        })?;

    let Some(user_id) = user_id else {
        tracing::debug!("Auth MW: no user in session.");
        return Err(AppError::Unauthorized);
    };

    match user_service::find_user_by_id(&state.db_pool, &user_id).await? {
        Some(user) => {
            tracing::debug!("Auth MW: user '{}' authenticated.", user_id);
            request.extensions_mut().insert(CurrentUser(user));
            Ok(next.run(request).await)
        }
        None => {
            // Account deleted after login
            tracing::warn!("Auth MW: session user '{}' no longer exists.", user_id);
            Err(AppError::Unauthorized)
        }
    }
}
