//! The cache-or-fetch flow shared by every resolver.

use std::future::Future;
use tracing::debug;

use super::ResolveError;

/// Returns the cached value when `lookup` finds one, otherwise runs `fetch`.
///
/// `fetch` is only constructed on a miss, so providers are never contacted
/// for a key the store already holds.
pub(crate) async fn cache_or_fetch<T, Lookup, Fetch, FetchFut>(
    resource: &'static str,
    lookup: Lookup,
    fetch: Fetch,
) -> Result<T, ResolveError>
where
    Lookup: Future<Output = Result<Option<T>, ResolveError>>,
    Fetch: FnOnce() -> FetchFut,
    FetchFut: Future<Output = Result<T, ResolveError>>,
{
    if let Some(cached) = lookup.await? {
        metrics::counter!("cache_lookups_total", "resource" => resource, "outcome" => "hit")
            .increment(1);
        debug!(resource, "Served from cache");
        return Ok(cached);
    }

    metrics::counter!("cache_lookups_total", "resource" => resource, "outcome" => "miss")
        .increment(1);
    debug!(resource, "Cache miss, asking provider");
    fetch().await
}

/// Treats an empty row set as a miss.
pub(crate) fn non_empty<T>(rows: Vec<T>) -> Option<Vec<T>> {
    (!rows.is_empty()).then_some(rows)
}

pub(crate) fn record_provider_outcome(provider: &'static str, outcome: &'static str) {
    metrics::counter!("provider_requests_total", "provider" => provider, "outcome" => outcome)
        .increment(1);
}
