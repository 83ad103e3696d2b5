use anyhow::{anyhow, Context, Result};
use base64::Engine;
use rand::{rngs::OsRng, RngCore};
use secrecy::SecretString;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Deployment environment. Anything that is not `development` is treated as
/// production for fail-closed decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => Err(anyhow!("unknown environment: {other}")),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Process-wide configuration, built once at startup and injected into the
/// token codec and store clients.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub environment: Environment,
    pub session_secret: SecretString,
    pub frontend_url: String,
    pub session_ttl_seconds: i64,
}

impl GlobalArgs {
    /// Build globals from parsed CLI matches.
    ///
    /// A missing session secret aborts startup outside development; in
    /// development an ephemeral random secret is generated instead, so
    /// tokens do not survive a restart there.
    ///
    /// # Errors
    ///
    /// Returns an error when the secret is unset in production or when the
    /// environment value cannot be parsed.
    pub fn from_matches(matches: &clap::ArgMatches) -> Result<Self> {
        let environment = matches
            .get_one::<String>("environment")
            .map(String::as_str)
            .unwrap_or("production")
            .parse::<Environment>()?;

        let session_secret = match matches.get_one::<String>("session-secret") {
            Some(secret) if !secret.trim().is_empty() => SecretString::from(secret.clone()),
            _ => match environment {
                Environment::Development => {
                    warn!(
                        "no session secret configured; using an ephemeral secret, \
                         sessions will not survive a restart"
                    );
                    ephemeral_secret().context("failed to generate ephemeral session secret")?
                }
                Environment::Production => {
                    return Err(anyhow!(
                        "session secret is required in production (set STEAD_SESSION_SECRET)"
                    ));
                }
            },
        };

        let frontend_url = matches
            .get_one::<String>("frontend-url")
            .map(String::clone)
            .unwrap_or_else(|| "http://localhost:3000".to_string());

        let session_ttl_seconds = matches
            .get_one::<i64>("session-ttl")
            .copied()
            .unwrap_or(86_400);

        Ok(Self {
            environment,
            session_secret,
            frontend_url,
            session_ttl_seconds,
        })
    }
}

fn ephemeral_secret() -> Result<SecretString> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to gather randomness")?;
    Ok(SecretString::from(
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes),
    ))
}
