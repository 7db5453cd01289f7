use tracing::info;

use crate::config::Config;
use crate::db::Store;

/// Connecting runs every pending migration.
pub async fn cmd_migrate(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_url).await?;
    let locations = store.location_count().await?;
    info!("Migrations applied ({} cached locations)", locations);
    println!("Database is up to date ({locations} cached locations)");
    Ok(())
}
