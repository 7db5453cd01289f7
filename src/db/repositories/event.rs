use crate::entities::{events, prelude::*};
use crate::models::EventRecord;
use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::debug;

use super::lock_location;

const INSERT_CHUNK: usize = 100;

pub struct EventRepository {
    conn: DatabaseConnection,
}

impl EventRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_for_location(&self, location_id: i32) -> Result<Vec<events::Model>> {
        let rows = Events::find()
            .filter(events::Column::LocationId.eq(location_id))
            .order_by_asc(events::Column::Id)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    /// Same contract as the weather batch insert: a no-op returning `false`
    /// when the location already has events.
    pub async fn insert_batch_if_absent(
        &self,
        location_id: i32,
        records: &[EventRecord],
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

    async fn write_batch(&self, location_id: i32, records: &[EventRecord]) -> Result<bool> {
        let txn = self.conn.begin().await?;
        lock_location(&txn, location_id).await?;

        let existing = Events::find()
            .filter(events::Column::LocationId.eq(location_id))
            .count(&txn)
            .await?;

        if existing > 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        let created_at = chrono::Utc::now().to_rfc3339();
        let mut models = Vec::with_capacity(records.len());
        for record in records {
            let event_data = record
                .event_data
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?;

            models.push(events::ActiveModel {
                location_id: Set(location_id),
                link: Set(record.link.clone()),
                name: Set(record.name.clone()),
                event_date: Set(record.event_date.clone()),
                summary: Set(record.summary.clone()),
                event_data: Set(event_data),
                created_at: Set(created_at.clone()),
                ..Default::default()
            });
        }

        for chunk in models.chunks(INSERT_CHUNK) {
            Events::insert_many(chunk.to_vec()).exec(&txn).await?;
        }

        txn.commit().await?;
        Ok(true)
    }

    async fn count_for_location(&self, location_id: i32) -> Result<u64> {
        let count = Events::find()
            .filter(events::Column::LocationId.eq(location_id))
            .count(&self.conn)
            .await?;
        Ok(count)
    }
}
