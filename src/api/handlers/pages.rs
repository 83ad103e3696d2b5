//! Minimal server-rendered pages used as redirect targets by the
//! authorization gate; the real UI lives in the frontend.

use axum::response::{Html, IntoResponse, Redirect};

/// `/` never renders: the gate always redirects it. This fallback keeps the
/// behavior if the route is ever hit directly.
pub async fn root() -> impl IntoResponse {
    Redirect::temporary("/auth/login")
}

pub async fn login_page() -> impl IntoResponse {
    Html(concat!(
        "<!doctype html><html><head><title>Sign in</title></head>",
        "<body><h1>Sign in</h1>",
        "<p>POST /v1/auth/login with email and password.</p>",
        "</body></html>"
    ))
}

pub async fn admin_page() -> impl IntoResponse {
    Html(concat!(
        "<!doctype html><html><head><title>Administration</title></head>",
        "<body><h1>Administration</h1>",
        "<p>Property listing administration.</p>",
        "</body></html>"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::LOCATION, StatusCode};

    #[tokio::test]
    async fn root_falls_back_to_login_redirect() {
        let response = root().await.into_response();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
            Some("/auth/login")
        );
    }

    #[tokio::test]
    async fn pages_render_html() {
        let response = login_page().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let response = admin_page().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
