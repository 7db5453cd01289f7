use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{debug, warn};

use super::ResolveError;

/// How bulk weather/event rows reach the store after a provider fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistMode {
    /// The insert completes before the response is sent; a failed insert
    /// fails the request.
    #[default]
    Awaited,

    /// The insert runs on a spawned task after the response is built.
    /// Best effort: failures are logged and counted, the caller never sees them.
    Background,
}

impl PersistMode {
    pub(crate) async fn persist<W>(
        self,
        resource: &'static str,
        location_id: i32,
        write: W,
    ) -> Result<(), ResolveError>
    where
        W: Future<Output = anyhow::Result<bool>> + Send + 'static,
    {
        match self {
            Self::Awaited => {
                let written = write.await.map_err(ResolveError::database)?;
                log_written(resource, location_id, written);
                Ok(())
            }
            Self::Background => {
                tokio::spawn(async move {
                    match write.await {
                        Ok(written) => log_written(resource, location_id, written),
                        Err(e) => {
                            metrics::counter!("cache_persist_failures_total", "resource" => resource)
                                .increment(1);
                            warn!(
                                resource,
                                location_id, "Background cache write failed: {:#}", e
                            );
                        }
                    }
                });
                Ok(())
            }
        }
    }
}

fn log_written(resource: &'static str, location_id: i32, written: bool) {
    if written {
        debug!(resource, location_id, "Cached provider rows");
    } else {
        debug!(
            resource,
            location_id, "Rows already cached by a concurrent request, batch dropped"
        );
    }
}
