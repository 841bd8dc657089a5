//! Opportunistic cache warming for a fresh recommendation list.
//!
//! Items run concurrently (at most [`PREFETCH_LIMIT`] at once), each under
//! its own deadline. Every item is reported as its own `DetailsLoaded` the
//! moment it settles, so a slow lookup never holds back a fast one. Posters
//! are requested by the reducer once the details are cached.

use std::sync::Arc;

use futures::stream::{self, Stream, StreamExt};
use log::debug;

use crate::api::{ApiError, RecommendationBackend};
use crate::core::action::{Action, PREFETCH_LIMIT, PrefetchItem};
use crate::core::config::Timeouts;

pub fn prefetch_details(
    backend: Arc<dyn RecommendationBackend>,
    items: Vec<PrefetchItem>,
    timeouts: Timeouts,
) -> impl Stream<Item = Action> + Send + 'static {
    stream::iter(items)
        .map(move |item| prefetch_one(backend.clone(), item, timeouts))
        .buffer_unordered(PREFETCH_LIMIT)
}

async fn prefetch_one(
    backend: Arc<dyn RecommendationBackend>,
    item: PrefetchItem,
    timeouts: Timeouts,
) -> Action {
    let result = tokio::time::timeout(
        timeouts.prefetch,
        backend.movie_details(&item.request, timeouts.prefetch),
    )
    .await
    .unwrap_or(Err(ApiError::Timeout));

    match &result {
        Ok(Some(_)) => debug!("Prefetched {}", item.key),
        Ok(None) => debug!("Prefetch found nothing for {}", item.key),
        Err(e) => debug!("Prefetch failed for {}: {}", item.key, e),
    }

    Action::DetailsLoaded {
        key: item.key,
        result,
    }
}
