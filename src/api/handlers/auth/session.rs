//! Session cookie plumbing shared by the auth endpoints and the gate.

use axum::{
    extract::Extension,
    http::{
        header::{InvalidHeaderValue, COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::IntoResponse,
};
use std::sync::Arc;

use super::state::{AuthConfig, AuthState};
use super::token::SessionClaims;

pub(crate) const SESSION_COOKIE_NAME: &str = "admin-token";

/// Build a secure `HttpOnly` cookie holding the session token.
pub(crate) fn session_cookie(
    config: &AuthConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let ttl_seconds = config.session_ttl_seconds();
    // Only mark cookies secure when the frontend is served over HTTPS.
    let secure = config.session_cookie_secure();
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_seconds}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub(crate) fn clear_session_cookie(config: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let secure = config.session_cookie_secure();
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Pull the raw session token out of the cookie header, if present.
pub(crate) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME {
            return Some(val.to_string());
        }
    }
    None
}

/// Resolve the session cookie into verified claims.
///
/// A missing cookie and an invalid or expired token are indistinguishable to
/// the caller: both are 401.
pub(crate) fn require_session(
    headers: &HeaderMap,
    auth_state: &AuthState,
) -> Result<SessionClaims, StatusCode> {
    let token = extract_session_token(headers).ok_or(StatusCode::UNAUTHORIZED)?;
    auth_state
        .codec()
        .verify(&token)
        .ok_or(StatusCode::UNAUTHORIZED)
}

#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    responses(
        (status = 204, description = "Session cookie cleared")
    ),
    tag = "auth"
)]
pub async fn logout(auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    // Tokens are stateless; logout is purely clearing the cookie.
    let mut response_headers = HeaderMap::new();
    if let Ok(cookie) = clear_session_cookie(auth_state.config()) {
        response_headers.insert(SET_COOKIE, cookie);
    }
    (StatusCode::NO_CONTENT, response_headers).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn auth_state() -> AuthState {
        let config = AuthConfig::new("http://localhost:3000".to_string());
        let secret = SecretString::from("test-secret".to_string());
        AuthState::new(config, &secret).expect("state")
    }

    #[test]
    fn session_cookie_is_http_only_lax() {
        let config = AuthConfig::new("http://localhost:3000".to_string());
        let cookie = session_cookie(&config, "tok").expect("cookie");
        let value = cookie.to_str().expect("ascii");
        assert!(value.starts_with("admin-token=tok;"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("SameSite=Lax"));
        assert!(value.contains("Max-Age=86400"));
        assert!(!value.contains("Secure"));
    }

    #[test]
    fn session_cookie_secure_over_https() {
        let config = AuthConfig::new("https://admin.stead.dev".to_string());
        let cookie = session_cookie(&config, "tok").expect("cookie");
        assert!(cookie.to_str().expect("ascii").contains("; Secure"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let config = AuthConfig::new("http://localhost:3000".to_string());
        let cookie = clear_session_cookie(&config).expect("cookie");
        assert!(cookie.to_str().expect("ascii").contains("Max-Age=0"));
    }

    #[test]
    fn extract_session_token_finds_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; admin-token=abc123; lang=en"),
        );
        assert_eq!(extract_session_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn extract_session_token_missing() {
        let headers = HeaderMap::new();
        assert_eq!(extract_session_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(extract_session_token(&headers), None);
    }

    #[test]
    fn require_session_rejects_missing_and_garbage() {
        let state = auth_state();

        let headers = HeaderMap::new();
        assert_eq!(
            require_session(&headers, &state).err(),
            Some(StatusCode::UNAUTHORIZED)
        );

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("admin-token=garbage"));
        assert_eq!(
            require_session(&headers, &state).err(),
            Some(StatusCode::UNAUTHORIZED)
        );
    }

    #[test]
    fn require_session_accepts_valid_token() {
        let state = auth_state();
        let claims = super::super::token::SessionClaims {
            id: uuid::Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            elevated: false,
        };
        let token = state.codec().issue(&claims).expect("issue");

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("admin-token={token}")).expect("header"),
        );
        assert_eq!(require_session(&headers, &state).ok(), Some(claims));
    }
}
