use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        // Rows written before the unique index existed may be duplicated;
        // keep the oldest one per query. Dependent rows cascade.
        conn.execute_unprepared(
            "DELETE FROM locations WHERE id NOT IN (SELECT MIN(id) FROM locations GROUP BY search_query)",
        )
        .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_locations_search_query_unique")
                    .table(Locations::Table)
                    .col(Locations::SearchQuery)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_weathers_location_id")
                    .table(Weathers::Table)
                    .col(Weathers::LocationId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_events_location_id")
                    .table(Events::Table)
                    .col(Events::LocationId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_events_location_id")
                    .table(Events::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_weathers_location_id")
                    .table(Weathers::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_locations_search_query_unique")
                    .table(Locations::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Locations {
    Table,
    SearchQuery,
}

#[derive(DeriveIden)]
enum Weathers {
    Table,
    LocationId,
}

#[derive(DeriveIden)]
enum Events {
    Table,
    LocationId,
}
