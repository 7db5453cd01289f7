use crate::entities::{prelude::*, weathers};
use crate::models::WeatherRecord;
use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::debug;

use super::lock_location;

/// Rows per INSERT; keeps well under SQLite's bound-parameter limit.
const INSERT_CHUNK: usize = 100;

pub struct WeatherRepository {
    conn: DatabaseConnection,
}

impl WeatherRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_for_location(&self, location_id: i32) -> Result<Vec<weathers::Model>> {
        let rows = Weathers::find()
            .filter(weathers::Column::LocationId.eq(location_id))
            .order_by_asc(weathers::Column::Id)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    /// Stores the forecast for a location in one transaction.
    ///
    /// Returns `false` without writing anything when the location already has
    /// forecast rows, so two cold requests racing each other store one copy.
    pub async fn insert_batch_if_absent(
        &self,
        location_id: i32,
        records: &[WeatherRecord],
    ) -> Result<bool> {
        if records.is_empty() {
            return Ok(false);
        }

        let err = match self.write_batch(location_id, records).await {
            Ok(written) => return Ok(written),
            Err(err) => err,
        };

        // A writer that lost a lock race still succeeds if the winner's rows landed.
        if self.count_for_location(location_id).await? > 0 {
            debug!(
                "Batch write for location {} lost to a concurrent writer: {:#}",
                location_id, err
            );
            return Ok(false);
        }
        Err(err)
    }

    async fn write_batch(&self, location_id: i32, records: &[WeatherRecord]) -> Result<bool> {
        let txn = self.conn.begin().await?;
        lock_location(&txn, location_id).await?;

        let existing = Weathers::find()
            .filter(weathers::Column::LocationId.eq(location_id))
            .count(&txn)
            .await?;

        if existing > 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        let created_at = chrono::Utc::now().to_rfc3339();
        let models: Vec<weathers::ActiveModel> = records
            .iter()
            .map(|record| weathers::ActiveModel {
                location_id: Set(location_id),
                forecast: Set(record.forecast.clone()),
                time: Set(record.time.clone()),
                created_at: Set(created_at.clone()),
                ..Default::default()
            })
            .collect();

        for chunk in models.chunks(INSERT_CHUNK) {
            Weathers::insert_many(chunk.to_vec()).exec(&txn).await?;
        }

        txn.commit().await?;
        Ok(true)
    }

    async fn count_for_location(&self, location_id: i32) -> Result<u64> {
        let count = Weathers::find()
            .filter(weathers::Column::LocationId.eq(location_id))
            .count(&self.conn)
            .await?;
        Ok(count)
    }
}
