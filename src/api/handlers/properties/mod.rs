//! Property listing endpoints.
//!
//! Listings are publicly readable; creating one requires a session and the
//! new row starts in `PENDING` status. Moderation (approve or reject) is
//! reserved for callers whose resolved role is `ADMIN`, resolved through the
//! same lookup the authorization gate uses.

use axum::{
    extract::{Extension, Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use super::auth::{
    session::require_session,
    storage::{user_role, Role},
    types::ErrorResponse,
    AuthState,
};

pub mod storage;
pub mod types;

use self::storage::{fetch_properties, insert_property, set_property_status};
use self::types::{CreatePropertyRequest, PropertyResponse, PropertyStatus, UpdateStatusRequest};

pub(crate) const MSG_INVALID_STATUS: &str = "Invalid status";
pub(crate) const MSG_MISSING_TITLE: &str = "Title is required";
pub(crate) const MSG_INVALID_PRICE: &str = "Price must be positive";
pub(crate) const MSG_NOT_FOUND: &str = "Property not found";
pub(crate) const MSG_FORBIDDEN: &str = "Admin role required";

#[derive(Debug, Deserialize)]
pub struct ListPropertiesQuery {
    status: Option<String>,
}

#[utoipa::path(
    get,
    path = "/v1/properties",
    params(("status" = Option<String>, Query, description = "Filter by listing status")),
    responses(
        (status = 200, description = "Listings, newest first", body = [PropertyResponse]),
        (status = 400, description = "Unknown status filter", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse)
    ),
    tag = "properties"
)]
pub async fn list_properties(
    Query(query): Query<ListPropertiesQuery>,
    pool: Extension<PgPool>,
) -> impl IntoResponse {
    let status = match query.status.as_deref() {
        None => None,
        Some(value) => match value.parse::<PropertyStatus>() {
            Ok(status) => Some(status),
            Err(()) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::new(MSG_INVALID_STATUS)),
                )
                    .into_response()
            }
        },
    };

    match fetch_properties(&pool, status).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(err) => {
            error!("Failed to list properties: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Listing failed")),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/v1/properties",
    request_body = CreatePropertyRequest,
    responses(
        (status = 201, description = "Listing created in PENDING status", body = PropertyResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid session cookie", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse)
    ),
    tag = "properties"
)]
pub async fn create_property(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<CreatePropertyRequest>>,
) -> impl IntoResponse {
    let claims = match require_session(&headers, &auth_state) {
        Ok(claims) => claims,
        Err(status) => return (status, Json(ErrorResponse::new("Unauthorized"))).into_response(),
    };

    let Some(Json(request)) = payload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(MSG_MISSING_TITLE)),
        )
            .into_response();
    };

    if request.title.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(MSG_MISSING_TITLE)),
        )
            .into_response();
    }
    if request.price <= 0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(MSG_INVALID_PRICE)),
        )
            .into_response();
    }

    match insert_property(&pool, claims.id, &request).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(err) => {
            error!("Failed to insert property: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Listing failed")),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    patch,
    path = "/v1/properties/{id}/status",
    params(("id" = String, Path, description = "Listing id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = PropertyResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid session cookie", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Listing not found", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse)
    ),
    tag = "properties"
)]
pub async fn update_property_status(
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<UpdateStatusRequest>>,
) -> impl IntoResponse {
    let claims = match require_session(&headers, &auth_state) {
        Ok(claims) => claims,
        Err(status) => return (status, Json(ErrorResponse::new("Unauthorized"))).into_response(),
    };

    // Same role resolution as the gate: anything short of a confirmed ADMIN
    // record is a denial, including lookup failures.
    match user_role(&pool, claims.id).await {
        Ok(Some(Role::Admin)) => {}
        Ok(_) => {
            return (
                StatusCode::FORBIDDEN,
                Json(ErrorResponse::new(MSG_FORBIDDEN)),
            )
                .into_response()
        }
        Err(err) => {
            error!("Failed to lookup role for status update: {err}");
            return (
                StatusCode::FORBIDDEN,
                Json(ErrorResponse::new(MSG_FORBIDDEN)),
            )
                .into_response();
        }
    }

    let Some(Json(request)) = payload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(MSG_INVALID_STATUS)),
        )
            .into_response();
    };

    // Moderation only moves a listing forward; PENDING is the insert default.
    if request.status == PropertyStatus::Pending {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(MSG_INVALID_STATUS)),
        )
            .into_response();
    }

    match set_property_status(&pool, id, request.status).await {
        Ok(Some(updated)) => (StatusCode::OK, Json(updated)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(MSG_NOT_FOUND)),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to update property status: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Listing failed")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::AuthConfig;
    use axum::http::header::COOKIE;
    use secrecy::SecretString;
    use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
    use std::time::Duration;

    fn unreachable_pool() -> PgPool {
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

    fn auth_state() -> Arc<AuthState> {
        Arc::new(
            AuthState::new(
                AuthConfig::new("http://localhost:3000".to_string()),
                &SecretString::from("test-secret".to_string()),
            )
            .expect("state"),
        )
    }

    fn headers_with_session(state: &AuthState) -> HeaderMap {
        let claims = crate::api::handlers::auth::token::SessionClaims {
            id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            elevated: false,
        };
        let token = state.codec().issue(&claims).expect("token");
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            format!("admin-token={token}").parse().expect("cookie"),
        );
        headers
    }

    #[tokio::test]
    async fn create_property_requires_session() {
        let pool = unreachable_pool();
        let response = create_property(HeaderMap::new(), Extension(pool), Extension(auth_state()), None)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn create_property_validates_before_store_access() {
        let state = auth_state();
        let headers = headers_with_session(&state);
        let pool = unreachable_pool();

        let response = create_property(
            headers.clone(),
            Extension(pool.clone()),
            Extension(state.clone()),
            Some(Json(CreatePropertyRequest {
                title: "  ".to_string(),
                description: String::new(),
                price: 100,
                location: String::new(),
                images: Vec::new(),
            })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = create_property(
            headers,
            Extension(pool),
            Extension(state),
            Some(Json(CreatePropertyRequest {
                title: "Loft".to_string(),
                description: String::new(),
                price: 0,
                location: String::new(),
                images: Vec::new(),
            })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_properties_rejects_unknown_status_filter() {
        let pool = unreachable_pool();
        let response = list_properties(
            Query(ListPropertiesQuery {
                status: Some("on-sale".to_string()),
            }),
            Extension(pool),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_status_denies_on_role_lookup_failure() {
        // The unreachable pool makes the role lookup fail; the handler must
        // deny rather than proceed to the update.
        let state = auth_state();
        let headers = headers_with_session(&state);
        let pool = unreachable_pool();
        let response = update_property_status(
            Path(Uuid::new_v4()),
            headers,
            Extension(pool),
            Extension(state),
            Some(Json(UpdateStatusRequest {
                status: PropertyStatus::Approved,
            })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn listing_id_deserializes_from_path_segment() {
        // Path<Uuid> extraction relies on Uuid deserializing from a plain
        // string segment.
        let id = Uuid::new_v4();
        let parsed: Uuid =
            serde_json::from_str(&format!("\"{id}\"")).expect("uuid from string");
        assert_eq!(parsed, id);
    }

    #[tokio::test]
    async fn update_status_requires_session() {
        let pool = unreachable_pool();
        let response = update_property_status(
            Path(Uuid::new_v4()),
            HeaderMap::new(),
            Extension(pool),
            Extension(auth_state()),
            Some(Json(UpdateStatusRequest {
                status: PropertyStatus::Rejected,
            })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
