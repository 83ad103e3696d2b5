//! Request/response types for auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AdminSummary {
    pub id: String,
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub success: bool,
    pub admin: AdminSummary,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignupResponse {
    pub success: bool,
    pub message: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct IdentityResponse {
    pub id: String,
    pub email: String,
    pub elevated: bool,
}

/// Uniform JSON error body for every non-2xx auth response.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[test]
    fn login_request_round_trips() -> Result<()> {
        let request = LoginRequest {
            email: "admin@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        let value = serde_json::to_value(&request)?;
        let email = value
            .get("email")
            .and_then(serde_json::Value::as_str)
            .context("missing email")?;
        assert_eq!(email, "admin@example.com");
        let decoded: LoginRequest = serde_json::from_value(value)?;
        assert_eq!(decoded.password, "hunter2");
        Ok(())
    }

    #[test]
    fn login_response_never_includes_hash_field() -> Result<()> {
        let response = LoginResponse {
            success: true,
            admin: AdminSummary {
                id: "b2f2c0a4".to_string(),
                email: "admin@example.com".to_string(),
            },
        };
        let value = serde_json::to_value(&response)?;
        assert_eq!(
            value,
            serde_json::json!({
                "success": true,
                "admin": {"id": "b2f2c0a4", "email": "admin@example.com"}
            })
        );
        Ok(())
    }

    #[test]
    fn error_response_round_trips() -> Result<()> {
        let value = serde_json::to_value(ErrorResponse::new("Invalid email or password"))?;
        assert_eq!(
            value,
            serde_json::json!({"error": "Invalid email or password"})
        );
        Ok(())
    }
}
