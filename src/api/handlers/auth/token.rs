//! Stateless session tokens (PASETO v4.local).
//!
//! The token is the only session state: a symmetric, authenticated PASETO
//! carrying the subject id, email, and elevated-privilege flag with a fixed
//! TTL. Verification never errors past this boundary; anything malformed,
//! tampered with, or expired is simply "no session".

use anyhow::{Context, Result};
use pasetors::claims::{Claims, ClaimsValidationRules};
use pasetors::keys::SymmetricKey;
use pasetors::token::UntrustedToken;
use pasetors::{local, version4::V4, Local};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Identity claim carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub id: Uuid,
    pub email: String,
    pub elevated: bool,
}

/// Issues and verifies session tokens with a process-wide symmetric key.
pub struct SessionCodec {
    key: SymmetricKey<V4>,
    ttl_seconds: u64,
}

impl SessionCodec {
    /// Build a codec from the configured secret.
    ///
    /// The 32-byte PASETO key is derived from the secret with SHA-256, so
    /// operators are free to configure a passphrase of any length.
    ///
    /// # Errors
    ///
    /// Returns an error if the TTL is not positive or key setup fails.
    pub fn new(secret: &SecretString, ttl_seconds: i64) -> Result<Self> {
        if ttl_seconds <= 0 {
            return Err(anyhow::anyhow!(
                "session TTL must be a positive number of seconds, got {ttl_seconds}"
            ));
        }
        let ttl_seconds =
            u64::try_from(ttl_seconds).context("session TTL must be a positive number")?;
        let digest = Sha256::digest(secret.expose_secret().as_bytes());
        let key = SymmetricKey::<V4>::from(digest.as_slice())
            .map_err(|err| anyhow::anyhow!("failed to derive session key: {err}"))?;
        Ok(Self { key, ttl_seconds })
    }

    /// Issue a signed token for the given claims with issued-at and expiry
    /// set relative to now.
    ///
    /// # Errors
    ///
    /// Returns an error if claim encoding or encryption fails.
    pub fn issue(&self, claims: &SessionClaims) -> Result<String> {
        let mut token_claims =
            Claims::new_expires_in(&std::time::Duration::from_secs(self.ttl_seconds))
                .map_err(|err| anyhow::anyhow!("failed to build session claims: {err}"))?;
        token_claims
            .subject(&claims.id.to_string())
            .map_err(|err| anyhow::anyhow!("failed to set token subject: {err}"))?;
        token_claims
            .add_additional("email", claims.email.as_str())
            .map_err(|err| anyhow::anyhow!("failed to set token email: {err}"))?;
        token_claims
            .add_additional("elevated", claims.elevated)
            .map_err(|err| anyhow::anyhow!("failed to set token elevated flag: {err}"))?;

        self.encrypt(&token_claims)
    }

    /// Verify integrity and expiry, returning the claims only if both hold.
    ///
    /// Structural corruption, a key mismatch, or an expired token all yield
    /// `None`; this function never panics or returns an error.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        let untrusted = UntrustedToken::<Local, V4>::try_from(token).ok()?;
        // Default rules validate exp, iat, and nbf against the current time.
        let rules = ClaimsValidationRules::new();
        let trusted = local::decrypt(&self.key, &untrusted, &rules, None, None).ok()?;
        let claims = trusted.payload_claims()?;

        let id = claims
            .get_claim("sub")
            .and_then(serde_json::Value::as_str)
            .and_then(|sub| Uuid::parse_str(sub).ok())?;
        let email = claims
            .get_claim("email")
            .and_then(serde_json::Value::as_str)?
            .to_string();
        let elevated = claims
            .get_claim("elevated")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);

        Some(SessionClaims {
            id,
            email,
            elevated,
        })
    }

    fn encrypt(&self, claims: &Claims) -> Result<String> {
        local::encrypt(&self.key, claims, None, None)
            .map_err(|err| anyhow::anyhow!("failed to encrypt session token: {err}"))
    }
}
