//! Database access for admin accounts and user roles.

use anyhow::{Context, Result};
use sqlx::{PgPool, Row};
use std::str::FromStr;
use tracing::Instrument;
use uuid::Uuid;

/// Admin account lifecycle state; only approved accounts may log in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl FromStr for ApprovalStatus {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(anyhow::anyhow!("unknown approval status: {other}")),
        }
    }
}

/// Role of a general-population user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Landlord,
    Realtor,
    User,
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "ADMIN" => Ok(Self::Admin),
            "LANDLORD" => Ok(Self::Landlord),
            "REALTOR" => Ok(Self::Realtor),
            "USER" => Ok(Self::User),
            other => Err(anyhow::anyhow!("unknown role: {other}")),
        }
    }
}

/// Admin row as needed by the login flow. The hash never leaves this module
/// except through password verification.
pub struct AdminRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub status: ApprovalStatus,
    pub elevated: bool,
}

/// Outcome when attempting to create a new admin account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupOutcome {
    Created,
    Conflict,
}

/// Look up an admin by email. The match is case-sensitive.
pub async fn lookup_admin_by_email(pool: &PgPool, email: &str) -> Result<Option<AdminRecord>> {
    let query =
        "SELECT id, email, password_hash, status::text AS status, elevated FROM admins WHERE email = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup admin by email")?;

    row.map(|row| {
        let status: String = row.get("status");
        Ok(AdminRecord {
            id: row.get("id"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            status: status.parse()?,
            elevated: row.get("elevated"),
        })
    })
    .transpose()
}

/// Insert a new admin in PENDING status.
///
/// The duplicate-email race between concurrent signups is arbitrated by the
/// store's unique constraint, not application logic: a unique violation maps
/// to [`SignupOutcome::Conflict`].
pub async fn insert_admin(pool: &PgPool, email: &str, password_hash: &str) -> Result<SignupOutcome> {
    let query = r"
        INSERT INTO admins (email, password_hash, status)
        VALUES ($1, $2, 'PENDING')
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(email)
        .bind(password_hash)
        .execute(pool)
        .instrument(span)
        .await;

    match result {
        Ok(_) => Ok(SignupOutcome::Created),
        Err(err) if is_unique_violation(&err) => Ok(SignupOutcome::Conflict),
        Err(err) => Err(err).context("failed to insert admin"),
    }
}

/// Live elevated-privilege flag for an admin; false when the record is gone.
pub async fn admin_elevated(pool: &PgPool, admin_id: Uuid) -> Result<bool> {
    let query = r"
        SELECT elevated
        FROM admins
        WHERE id = $1
        LIMIT 1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(admin_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup admin elevated flag")?;
    Ok(row.is_some_and(|row| row.get::<bool, _>("elevated")))
}

/// Resolve the role of a user record by id, used by the authorization gate.
pub async fn user_role(pool: &PgPool, user_id: Uuid) -> Result<Option<Role>> {
    let query = r"
        SELECT role::text AS role
        FROM users
        WHERE id = $1
        LIMIT 1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(user_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user role")?;

    row.map(|row| {
        let role: String = row.get("role");
        role.parse()
    })
    .transpose()
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}
