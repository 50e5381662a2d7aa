//! Database operations for the `deals` table.

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `deals` table.
///
/// Numeric columns are nullable in the schema; rows written by the ingest
/// path always carry a value, using `0` for "not found".
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DealRow {
    pub id: Uuid,
    pub photo_id: String,
    pub business_name: Option<String>,
    pub deal_text: String,
    pub price: Option<Decimal>,
    pub expires_at: Option<DateTime<Utc>>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    /// The upload timestamp carried by the originating message.
    pub created_at: DateTime<Utc>,
}

/// Filters for [`list_deals`].
#[derive(Debug, Clone, Copy)]
pub struct DealListFilters {
    /// Keep only deals with no expiration or one still in the future.
    pub active_only: bool,
    pub limit: i64,
}

impl Default for DealListFilters {
    fn default() -> Self {
        Self {
            active_only: false,
            limit: 50,
        }
    }
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Inserts an extracted deal and returns its generated `id`.
///
/// `price`, `latitude` and `longitude` are bound as `f64` and rounded by the
/// database into `NUMERIC(10,2)`, `NUMERIC(10,8)` and `NUMERIC(11,8)`.
/// The expiration date is stored as midnight UTC. `created_at` is the
/// message's timestamp string cast by Postgres, so a timestamp Postgres
/// cannot read fails the insert.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_deal(
    pool: &PgPool,
    deal: &dealsnap_core::ExtractedDeal,
) -> Result<Uuid, DbError> {
    let expires_at: Option<DateTime<Utc>> = deal
        .expires_at
        .map(|date| date.and_time(NaiveTime::MIN).and_utc());

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO deals \
             (photo_id, business_name, deal_text, price, expires_at, \
              latitude, longitude, created_at) \
         VALUES ($1, $2, $3, $4::numeric(10,2), $5, \
                 $6::numeric(10,8), $7::numeric(11,8), $8::timestamptz) \
         RETURNING id",
    )
    .bind(&deal.photo_id)
    .bind(&deal.business_name)
    .bind(&deal.deal_text)
    .bind(deal.price)
    .bind(expires_at)
    .bind(deal.latitude)
    .bind(deal.longitude)
    .bind(&deal.timestamp)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Returns deals newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_deals(pool: &PgPool, filters: DealListFilters) -> Result<Vec<DealRow>, DbError> {
    let rows = sqlx::query_as::<_, DealRow>(
        "SELECT id, photo_id, business_name, deal_text, price, expires_at, \
                latitude, longitude, created_at \
         FROM deals \
         WHERE ($1::BOOLEAN = false OR expires_at IS NULL OR expires_at > NOW()) \
         ORDER BY created_at DESC, id DESC \
         LIMIT $2",
    )
    .bind(filters.active_only)
    .bind(filters.limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single deal by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_deal(pool: &PgPool, id: Uuid) -> Result<Option<DealRow>, DbError> {
    let row = sqlx::query_as::<_, DealRow>(
        "SELECT id, photo_id, business_name, deal_text, price, expires_at, \
                latitude, longitude, created_at \
         FROM deals \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
