//! Destinations for assembled deals.

use std::future::Future;

use dealsnap_core::ExtractedDeal;
use dealsnap_db::{DbError, PoolConfig};
use sqlx::PgPool;
use uuid::Uuid;

/// Durable storage for deals.
///
/// A successful `store` means the deal is persisted under the returned id.
pub trait RecordSink {
    type Error: std::error::Error + Send + Sync + 'static;

    fn store(
        &self,
        deal: &ExtractedDeal,
    ) -> impl Future<Output = Result<Uuid, Self::Error>> + Send;
}

/// Postgres-backed sink writing to the `deals` table.
#[derive(Debug, Clone)]
pub struct PgDealSink {
    pool: PgPool,
}

impl PgDealSink {
    /// Opens a pool against `database_url`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the connection cannot be established.
    pub async fn open(database_url: &str, config: PoolConfig) -> Result<Self, DbError> {
        let pool = dealsnap_db::connect_pool(database_url, config).await?;
        Ok(Self { pool })
    }

    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Waits for in-flight queries and closes every connection.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

impl RecordSink for PgDealSink {
    type Error = DbError;

    async fn store(&self, deal: &ExtractedDeal) -> Result<Uuid, DbError> {
        dealsnap_db::insert_deal(&self.pool, deal).await
    }
}
