use crate::entities::{locations, prelude::*};
use crate::models::NewLocation;
use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::debug;

pub struct LocationRepository {
    conn: DatabaseConnection,
}

impl LocationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_query(&self, search_query: &str) -> Result<Option<locations::Model>> {
        let model = Locations::find()
            .filter(locations::Column::SearchQuery.eq(search_query))
            .order_by_asc(locations::Column::Id)
            .one(&self.conn)
            .await?;
        Ok(model)
    }

    /// Inserts the location unless a row for the same query already exists,
    /// then returns whichever row is stored.
    pub async fn insert_or_get(&self, location: &NewLocation) -> Result<locations::Model> {
        let active_model = locations::ActiveModel {
            search_query: Set(location.search_query.clone()),
            formatted_query: Set(location.formatted_query.clone()),
            latitude: Set(location.latitude),
            longitude: Set(location.longitude),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let inserted = Locations::insert(active_model)
            .on_conflict(
                OnConflict::column(locations::Column::SearchQuery)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        if inserted == 0 {
            debug!(
                "Location '{}' was inserted concurrently, reusing stored row",
                location.search_query
            );
        }

        self.find_by_query(&location.search_query)
            .await?
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Location '{}' missing right after insert",
                    location.search_query
                )
            })
    }

    pub async fn count(&self) -> Result<u64> {
        use sea_orm::PaginatorTrait;
        Ok(Locations::find().count(&self.conn).await?)
    }
}
