//! Auth configuration and shared state.

use anyhow::Result;
use secrecy::SecretString;

use super::token::SessionCodec;

const DEFAULT_SESSION_TTL_SECONDS: i64 = 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    frontend_base_url: String,
    session_ttl_seconds: i64,
}

impl AuthConfig {
    #[must_use]
    pub fn new(frontend_base_url: String) -> Self {
        Self {
            frontend_base_url,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    pub(crate) fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    pub(crate) fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    pub(crate) fn session_cookie_secure(&self) -> bool {
        self.frontend_base_url.starts_with("https://")
    }
}

/// Shared auth state: configuration plus the session token codec, built once
/// at startup from validated configuration.
pub struct AuthState {
    config: AuthConfig,
    codec: SessionCodec,
}

impl AuthState {
    /// # Errors
    ///
    /// Returns an error if the codec cannot be constructed from the secret.
    pub fn new(config: AuthConfig, session_secret: &SecretString) -> Result<Self> {
        let codec = SessionCodec::new(session_secret, config.session_ttl_seconds())?;
        Ok(Self { config, codec })
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn codec(&self) -> &SessionCodec {
        &self.codec
    }
}
