//! Database access for property listings.

use anyhow::{Context, Result};
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::types::{CreatePropertyRequest, PropertyResponse, PropertyStatus};

fn row_to_response(row: &sqlx::postgres::PgRow) -> Result<PropertyResponse> {
    let status: String = row.get("status");
    Ok(PropertyResponse {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        price: row.get("price"),
        location: row.get("location"),
        status: status
            .parse()
            .map_err(|()| anyhow::anyhow!("unknown property status: {status}"))?,
        owner_id: row.get("owner_id"),
        images: row.get("images"),
        created_at: row.get("created_at"),
    })
}

/// List properties, newest first, optionally filtered by status.
pub async fn fetch_properties(
    pool: &PgPool,
    status: Option<PropertyStatus>,
) -> Result<Vec<PropertyResponse>> {
    let query = r#"
        SELECT
            id::text AS id, title, description, price, location,
            status::text AS status, owner_id::text AS owner_id, images,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
        FROM properties
        WHERE $1::text IS NULL OR status = $1
        ORDER BY created_at DESC
    "#;
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .bind(status.map(PropertyStatus::as_str))
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list properties")?;

    rows.iter().map(row_to_response).collect()
}

/// Insert a new listing in PENDING status owned by `owner_id`.
pub async fn insert_property(
    pool: &PgPool,
    owner_id: Uuid,
    request: &CreatePropertyRequest,
) -> Result<PropertyResponse> {
    let query = r#"
        INSERT INTO properties (title, description, price, location, status, owner_id, images)
        VALUES ($1, $2, $3, $4, 'PENDING', $5, $6)
        RETURNING
            id::text AS id, title, description, price, location,
            status::text AS status, owner_id::text AS owner_id, images,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
    "#;
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.price)
        .bind(&request.location)
        .bind(owner_id)
        .bind(&request.images)
        .fetch_one(pool)
        .instrument(span)
        .await
        .context("failed to insert property")?;

    row_to_response(&row)
}

/// Update a listing's status; `None` when the listing does not exist.
pub async fn set_property_status(
    pool: &PgPool,
    property_id: Uuid,
    status: PropertyStatus,
) -> Result<Option<PropertyResponse>> {
    let query = r#"
        UPDATE properties
        SET status = $2
        WHERE id = $1
        RETURNING
            id::text AS id, title, description, price, location,
            status::text AS status, owner_id::text AS owner_id, images,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
    "#;
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(property_id)
        .bind(status.as_str())
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to update property status")?;

    row.as_ref().map(row_to_response).transpose()
}
