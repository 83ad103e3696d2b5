//! Current-identity endpoint.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::{
    session::require_session,
    state::AuthState,
    storage::admin_elevated,
    types::{ErrorResponse, IdentityResponse},
};

#[utoipa::path(
    get,
    path = "/v1/auth/me",
    responses(
        (status = 200, description = "Identity of the current session", body = IdentityResponse),
        (status = 401, description = "Missing or invalid session cookie", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn me(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    let claims = match require_session(&headers, &auth_state) {
        Ok(claims) => claims,
        Err(status) => return (status, Json(ErrorResponse::new("Unauthorized"))).into_response(),
    };

    // The token's own elevated copy may be stale over a 24h lifetime, so the
    // live flag is re-read; a failed lookup defaults to false.
    let elevated = admin_elevated(&pool, claims.id)
        .await
        .map_err(|err| error!("Failed to lookup elevated flag: {err}"))
        .unwrap_or(false);

    let response = IdentityResponse {
        id: claims.id.to_string(),
        email: claims.email,
        elevated,
    };
    (StatusCode::OK, Json(response)).into_response()
}
