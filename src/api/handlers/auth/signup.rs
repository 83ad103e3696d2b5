//! Admin signup endpoint.
//!
//! New accounts are inserted in `PENDING` status and become usable only
//! after an external approval step; no session is issued here.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use regex::Regex;
use sqlx::PgPool;
use tracing::error;

use super::{
    password::hash_password,
    storage::{insert_admin, SignupOutcome},
    types::{ErrorResponse, SignupRequest, SignupResponse},
};

pub(crate) const MSG_MISSING_FIELDS: &str = "Missing email or password";
pub(crate) const MSG_INVALID_EMAIL: &str = "Invalid email";
pub(crate) const MSG_DUPLICATE_EMAIL: &str = "Email already registered";
pub(crate) const MSG_ACCEPTED: &str = "Registration received; awaiting approval";

/// Basic email format check; lookups themselves stay case-sensitive.
pub(crate) fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email))
}

#[utoipa::path(
    post,
    path = "/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Registration accepted, pending approval", body = SignupResponse),
        (status = 400, description = "Validation error or duplicate email", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn signup(
    pool: Extension<PgPool>,
    payload: Option<Json<SignupRequest>>,
) -> impl IntoResponse {
    let request: SignupRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(MSG_MISSING_FIELDS)),
            )
                .into_response()
        }
    };

    if request.email.trim().is_empty() || request.password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(MSG_MISSING_FIELDS)),
        )
            .into_response();
    }

    if !valid_email(&request.email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(MSG_INVALID_EMAIL)),
        )
            .into_response();
    }

    let password_hash = match hash_password(&request.password) {
        Ok(hash) => hash,
        Err(err) => {
            error!("Failed to hash password: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Signup failed")),
            )
                .into_response();
        }
    };

    // A concurrent duplicate insert fails on the store's unique constraint
    // and surfaces here as a conflict, same as the sequential case.
    match insert_admin(&pool, &request.email, &password_hash).await {
        Ok(SignupOutcome::Created) => (
            StatusCode::OK,
            Json(SignupResponse {
                success: true,
                message: MSG_ACCEPTED.to_string(),
            }),
        )
            .into_response(),
        Ok(SignupOutcome::Conflict) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(MSG_DUPLICATE_EMAIL)),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to insert admin: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Signup failed")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@example.com"));
        assert!(valid_email("name.surname@example.co"));
    }

    #[test]
    fn valid_email_rejects_missing_parts() {
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("missing-at.example.com"));
        assert!(!valid_email("missing-domain@"));
    }

    #[tokio::test]
    async fn signup_rejects_missing_payload_without_store_access() {
        // No pool round trip happens for validation failures; an unreachable
        // pool would otherwise make this test fail with a 500.
        let pool = unreachable_pool();
        let response = signup(Extension(pool), None).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn signup_rejects_blank_fields() {
        let pool = unreachable_pool();
        let response = signup(
            Extension(pool),
            Some(Json(SignupRequest {
                email: "  ".to_string(),
                password: String::new(),
            })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn signup_maps_store_failure_to_500() {
        let pool = unreachable_pool();
        let response = signup(
            Extension(pool),
            Some(Json(SignupRequest {
                email: "new@example.com".to_string(),
                password: "hunter2".to_string(),
            })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    fn unreachable_pool() -> PgPool {
        use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
        use std::time::Duration;

        let options = PgConnectOptions::new()
            .host("127.0.0.1")
            .port(1)
            .username("invalid")
            .database("invalid")
            .ssl_mode(PgSslMode::Disable);
        PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy_with(options)
    }
}
