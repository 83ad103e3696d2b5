//! # Stead (Property Listing Administration)
//!
//! `stead` is the backend for a property-listing administration application.
//! It owns admin authentication (login, signup, current identity), the
//! route-authorization gate over the admin surface, and listing CRUD against
//! a managed Postgres store.
//!
//! ## Accounts & Approval
//!
//! Admin accounts are created through signup in `PENDING` status and become
//! usable only after an external approval workflow flips them to `APPROVED`.
//! Rejected or pending accounts can never obtain a session.
//!
//! ## Sessions
//!
//! Sessions are stateless: a PASETO v4.local token carrying the subject id,
//! email, and elevated-privilege flag, bound to a process-wide secret and a
//! 24-hour expiry. There is no server-side session table; every request
//! re-resolves identity from the token plus at most one store lookup.
//!
//! ## Authorization Gate
//!
//! `/`, `/auth/login`, and everything under `/admin` are guarded by a pure
//! decision procedure mapping (path, session validity, resolved role) to
//! allow-or-redirect. Any uncertainty (bad cookie, store error, missing
//! record) fails closed to the login redirect.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
