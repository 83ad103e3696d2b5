//! Route authorization gate.
//!
//! The decision procedure is transport-free: it consumes a request path, the
//! verified session claims (if any), and a role-lookup capability, and
//! produces an allow-or-redirect decision. A thin axum middleware adapter
//! turns that decision into a response. Any uncertainty (missing cookie,
//! tampered token, store error, missing record) fails closed to the login
//! redirect; the gate never mutates the store.

use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use sqlx::PgPool;
use std::{future::Future, pin::Pin, sync::Arc};
use tracing::error;
use uuid::Uuid;

use crate::api::handlers::auth::{
    session::extract_session_token,
    storage::{user_role, Role},
    token::SessionClaims,
    AuthState,
};

pub(crate) const LOGIN_PATH: &str = "/auth/login";
pub(crate) const ADMIN_HOME: &str = "/admin";

/// What the gate decides for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectTo(&'static str),
}

/// Path classification; evaluation order matches the class, first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    Root,
    Login,
    Admin,
    Other,
}

#[must_use]
pub fn classify(path: &str) -> PathClass {
    if path == "/" {
        PathClass::Root
    } else if path == LOGIN_PATH {
        PathClass::Login
    } else if path.starts_with(ADMIN_HOME) {
        PathClass::Admin
    } else {
        PathClass::Other
    }
}

/// Capability to resolve a subject's role, only exercised for admin paths.
pub trait RoleLookup {
    fn role<'a>(
        &'a self,
        subject: Uuid,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<Option<Role>>> + Send + 'a>>;
}

impl RoleLookup for PgPool {
    fn role<'a>(
        &'a self,
        subject: Uuid,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<Option<Role>>> + Send + 'a>> {
        Box::pin(user_role(self, subject))
    }
}

/// Decide whether a request may proceed.
///
/// The role lookup runs only for admin paths and only with a valid session;
/// a lookup error is treated exactly like a non-admin role.
pub async fn evaluate<L: RoleLookup + ?Sized>(
    path: &str,
    session: Option<&SessionClaims>,
    roles: &L,
) -> GateDecision {
    match classify(path) {
        PathClass::Root => {
            if session.is_some() {
                GateDecision::RedirectTo(ADMIN_HOME)
            } else {
                GateDecision::RedirectTo(LOGIN_PATH)
            }
        }
        PathClass::Login => {
            if session.is_some() {
                GateDecision::RedirectTo(ADMIN_HOME)
            } else {
                GateDecision::Allow
            }
        }
        PathClass::Admin => {
            let Some(claims) = session else {
                return GateDecision::RedirectTo(LOGIN_PATH);
            };
            match roles.role(claims.id).await {
                Ok(Some(Role::Admin)) => GateDecision::Allow,
                Ok(_) => GateDecision::RedirectTo(LOGIN_PATH),
                Err(err) => {
                    error!("Role lookup failed, denying admin access: {err}");
                    GateDecision::RedirectTo(LOGIN_PATH)
                }
            }
        }
        PathClass::Other => GateDecision::Allow,
    }
}

/// Axum adapter: read the cookie, verify the token, evaluate, and either
/// forward the request or answer with a redirect.
pub async fn authorize(
    Extension(pool): Extension<PgPool>,
    Extension(auth_state): Extension<Arc<AuthState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let session = extract_session_token(request.headers())
        .and_then(|token| auth_state.codec().verify(&token));

    match evaluate(&path, session.as_ref(), &pool).await {
        GateDecision::Allow => next.run(request).await,
        GateDecision::RedirectTo(target) => Redirect::temporary(target).into_response(),
    }
}
