// src/web/mw_admin.rs
use crate::{error::AppError, web::mw_auth::CurrentUser};
use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::Response,
};

/// Admin-only gate. Must run *after* `require_auth`.
pub async fn require_admin(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if user.is_admin() {
        tracing::debug!("Admin MW: access granted for {}", user.id);
        Ok(next.run(request).await)
    } else {
        tracing::warn!("Admin MW: access denied for {} (role '{}').", user.id, user.role);
        Err(AppError::Forbidden)
    }
}
