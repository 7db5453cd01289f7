pub mod event;
pub mod location;
pub mod weather;

use anyhow::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::entities::{locations, prelude::*};

/// Takes the write lock for a location's child rows inside `txn`.
///
/// Must be the first statement of the transaction. On SQLite a leading write
/// acquires the database write lock up front (waiting out `busy_timeout`)
/// instead of failing a later read-to-write upgrade. On Postgres it row-locks
/// the parent location, so batch writers for one location run one at a time.
pub(super) async fn lock_location<C>(txn: &C, location_id: i32) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Locations::update_many()
        .col_expr(
            locations::Column::FormattedQuery,
            Expr::col(locations::Column::FormattedQuery).into(),
        )
        .filter(locations::Column::Id.eq(location_id))
        .exec(txn)
        .await?;

    if result.rows_affected == 0 {
        anyhow::bail!("Location {location_id} does not exist");
    }
    Ok(())
}
