//! Admin login endpoint.
//!
//! Flow Overview:
//! 1) Validate presence of email and password before any store access.
//! 2) Look up the admin and check approval status.
//! 3) Verify the password and issue a session cookie.
//!
//! Unknown email and wrong password produce the identical response so the
//! endpoint cannot be used to enumerate accounts.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::{
    password::verify_password,
    session::session_cookie,
    state::AuthState,
    storage::{lookup_admin_by_email, AdminRecord, ApprovalStatus},
    token::SessionClaims,
    types::{AdminSummary, ErrorResponse, LoginRequest, LoginResponse},
};

pub(crate) const MSG_MISSING_FIELDS: &str = "Missing email or password";
pub(crate) const MSG_INVALID_CREDENTIALS: &str = "Invalid email or password";
pub(crate) const MSG_PENDING_APPROVAL: &str = "Account pending approval";
pub(crate) const MSG_APPROVAL_DENIED: &str = "Account approval was denied";

/// Result of the credential checks, separated from transport concerns.
enum LoginOutcome {
    /// Unknown email or wrong password; indistinguishable by design.
    Invalid,
    Pending,
    Rejected,
    Accepted(AdminRecord),
}

fn login_outcome(record: Option<AdminRecord>, password: &str) -> LoginOutcome {
    let Some(record) = record else {
        return LoginOutcome::Invalid;
    };
    // Approval status is reported before password verification so a locked
    // out admin learns whether to wait or stop.
    match record.status {
        ApprovalStatus::Pending => return LoginOutcome::Pending,
        ApprovalStatus::Rejected => return LoginOutcome::Rejected,
        ApprovalStatus::Approved => {}
    }
    if verify_password(password, &record.password_hash) {
        LoginOutcome::Accepted(record)
    } else {
        LoginOutcome::Invalid
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookie set", body = LoginResponse),
        (status = 400, description = "Missing email or password", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 403, description = "Account not approved", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let request: LoginRequest = match payload {
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

    let record = match lookup_admin_by_email(&pool, &request.email).await {
        Ok(record) => record,
        Err(err) => {
            error!("Failed to lookup admin: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Login failed")),
            )
                .into_response();
        }
    };

    match login_outcome(record, &request.password) {
        LoginOutcome::Invalid => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(MSG_INVALID_CREDENTIALS)),
        )
            .into_response(),
        LoginOutcome::Pending => (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::new(MSG_PENDING_APPROVAL)),
        )
            .into_response(),
        LoginOutcome::Rejected => (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::new(MSG_APPROVAL_DENIED)),
        )
            .into_response(),
        LoginOutcome::Accepted(record) => accept(&auth_state, &record).into_response(),
    }
}

fn accept(auth_state: &AuthState, record: &AdminRecord) -> axum::response::Response {
    let claims = SessionClaims {
        id: record.id,
        email: record.email.clone(),
        elevated: record.elevated,
    };
    let token = match auth_state.codec().issue(&claims) {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to issue session token: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Login failed")),
            )
                .into_response();
        }
    };

    let mut response_headers = HeaderMap::new();
    match session_cookie(auth_state.config(), &token) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Login failed")),
            )
                .into_response();
        }
    }

    let body = LoginResponse {
        success: true,
        admin: AdminSummary {
            id: record.id.to_string(),
            email: record.email.clone(),
        },
    };
    (StatusCode::OK, response_headers, Json(body)).into_response()
}
