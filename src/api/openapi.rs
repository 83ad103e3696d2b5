//! OpenAPI document assembled from the `#[utoipa::path]` annotations.
//!
//! Title, version, description, and license come from Cargo metadata. The
//! document is served by Swagger UI at `/docs` and printed by the `openapi`
//! binary for spec consumers.

use utoipa::OpenApi;

use crate::api::handlers::{auth, health, properties};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::login::login,
        auth::signup::signup,
        auth::me::me,
        auth::session::logout,
        properties::list_properties,
        properties::create_property,
        properties::update_property_status,
    ),
    components(schemas(
        health::Health,
        auth::types::LoginRequest,
        auth::types::LoginResponse,
        auth::types::AdminSummary,
        auth::types::SignupRequest,
        auth::types::SignupResponse,
        auth::types::IdentityResponse,
        auth::types::ErrorResponse,
        properties::types::PropertyStatus,
        properties::types::PropertyResponse,
        properties::types::CreatePropertyRequest,
        properties::types::UpdateStatusRequest,
    )),
    tags(
        (name = "health", description = "Service and database health"),
        (name = "auth", description = "Admin signup, login, and sessions"),
        (name = "properties", description = "Property listing administration")
    )
)]
pub struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_info_from_cargo() {
        let spec = openapi();
        assert_eq!(spec.info.title, env!("CARGO_PKG_NAME"));
        assert_eq!(spec.info.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn openapi_tags_and_paths() {
        let spec = openapi();
        let tags = spec.tags.clone().unwrap_or_default();
        assert!(tags.iter().any(|tag| tag.name == "auth"));
        assert!(tags.iter().any(|tag| tag.name == "properties"));
        assert!(spec.paths.paths.contains_key("/v1/auth/login"));
        assert!(spec.paths.paths.contains_key("/v1/auth/logout"));
        assert!(spec.paths.paths.contains_key("/v1/properties/{id}/status"));
    }
}
