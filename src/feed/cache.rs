use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::feed::{
    error::FeedError,
    source::FeedSource,
    types::{PredictionRecord, RecordSet},
};

#[derive(Debug, Clone)]
struct CachedFeed {
    records: RecordSet,
    fetched_at: OffsetDateTime,
}

/// Single-slot memoizing cache in front of a [`FeedSource`].
///
/// Cache hits read the slot synchronously and never wait on the network. Misses
/// and forced refreshes go through `fetch_gate`, so at most one request per cache
/// is in flight. A non-forced caller that queued behind an in-flight fetch reuses
/// its result instead of issuing a second request. A failed fetch leaves the slot
/// as it was.
pub struct FeedCache<S> {
    source: S,
    slot: RwLock<Option<CachedFeed>>,
    fetch_gate: Mutex<()>,
}

impl<S: FeedSource> FeedCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            slot: RwLock::new(None),
            fetch_gate: Mutex::new(()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cached(&self) -> Option<RecordSet> {
        self.read_slot()
            .as_ref()
            .map(|cached| cached.records.clone())
    }

    pub fn fetched_at(&self) -> Option<OffsetDateTime> {
        self.read_slot().as_ref().map(|cached| cached.fetched_at)
    }

    pub async fn fetch_all(&self, force_refresh: bool) -> Result<RecordSet, FeedError> {
        if !force_refresh && let Some(records) = self.cached() {
            tracing::trace!(target: "feed.cache", records = records.len(), "feed_cache_hit");
            return Ok(records);
        }

        let _in_flight = self.fetch_gate.lock().await;
        if !force_refresh && let Some(records) = self.cached() {
            tracing::debug!(
                target: "feed.cache",
                records = records.len(),
                "feed_cache_filled_while_waiting"
            );
            return Ok(records);
        }

        tracing::debug!(target: "feed.cache", force_refresh, "feed_cache_fetch");
        let records = match self.source.fetch_records().await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(
                    target: "feed.cache",
                    kind = ?err.kind,
                    http_status = ?err.http_status,
                    error = %err,
                    kept_previous = self.cached().is_some(),
                    "feed_cache_fetch_failed"
                );
                return Err(err);
            }
        };

        for record in records.iter() {
            if record.outcome_distribution.is_degenerate() {
                tracing::warn!(
                    target: "feed.cache",
                    record_id = %record.id,
                    sum = record.outcome_distribution.sum(),
                    "feed_record_degenerate_distribution"
                );
            }
        }

        let fetched_at = OffsetDateTime::now_utc();
        *self.write_slot() = Some(CachedFeed {
            records: records.clone(),
            fetched_at,
        });
        tracing::info!(
            target: "feed.cache",
            records = records.len(),
            force_refresh,
            "feed_cache_populated"
        );

        Ok(records)
    }

    /// Looks up a record, fetching first when nothing is cached. Absence is `Ok(None)`.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<PredictionRecord>, FeedError> {
        let records = match self.cached() {
            Some(records) => records,
            None => self.fetch_all(false).await?,
        };
        Ok(records.find(id).cloned())
    }

    fn read_slot(&self) -> RwLockReadGuard<'_, Option<CachedFeed>> {
        self.slot.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_slot(&self) -> RwLockWriteGuard<'_, Option<CachedFeed>> {
        self.slot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
