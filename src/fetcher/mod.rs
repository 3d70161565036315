//! Day-manifest fetching: one network fetch per day per session.
//!
//! [`DayFetcher`] sits between the navigation engine and a [`ManifestSource`]
//! and owns the session's [`DayCache`]. It guarantees:
//!
//! - a cached day is answered without touching the network
//! - concurrent requests for the same day collapse into one in-flight fetch
//!   whose outcome is shared with every waiter
//! - the cache and the day index are updated in a single step on success and
//!   left untouched on any failure
//! - a failed fetch is not retried; callers treat failure as "no data for
//!   this day", never as a fatal error

mod http;
mod wire;

pub use http::HttpManifestSource;
pub use wire::{DayIndexDoc, RawSnapshot};

use crate::cache::DayCache;
use crate::model::{DayKey, DayManifest, Period, SnapshotEntry};
use crate::observability::Metrics;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

/// Fetch errors are recoverable and string-backed so one outcome can be
/// cloned out to every waiter of a collapsed fetch.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("unexpected status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("malformed index document: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// Where day index documents come from. Implemented over HTTP in production
/// and by scripted fakes in tests.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    async fn fetch(&self, day: DayKey) -> Result<DayIndexDoc>;
}

type SharedOutcome = Option<Result<DayKey>>;

enum FetchRole {
    Leader(watch::Sender<SharedOutcome>),
    Waiter(watch::Receiver<SharedOutcome>),
}

/// Session-scoped fetching front end over a [`ManifestSource`] and the
/// [`DayCache`] it fills.
pub struct DayFetcher {
    source: Arc<dyn ManifestSource>,
    cache: Mutex<DayCache>,
    in_flight: Mutex<HashMap<DayKey, watch::Receiver<SharedOutcome>>>,
    metrics: Arc<Metrics>,
}

impl DayFetcher {
    pub fn new(source: Arc<dyn ManifestSource>, metrics: Arc<Metrics>) -> Self {
        Self {
            source,
            cache: Mutex::new(DayCache::new()),
            in_flight: Mutex::new(HashMap::new()),
            metrics,
        }
    }

    /// Makes sure `day` has been fetched, returning the key the manifest is
    /// cached under (the document's declared date may differ from the
    /// requested day). Idempotent: a cache hit never touches the network.
    pub async fn ensure_day(&self, day: DayKey) -> Result<DayKey> {
        if self.cache.lock().await.has(day) {
            self.metrics.cache_hit();
            return Ok(day);
        }

        let role = {
            let mut in_flight = self.in_flight.lock().await;
            match in_flight.get(&day) {
                Some(rx) => FetchRole::Waiter(rx.clone()),
                None => {
                    let (tx, rx) = watch::channel(None);
                    in_flight.insert(day, rx);
                    FetchRole::Leader(tx)
                }
            }
        };

        match role {
            FetchRole::Leader(tx) => {
                let outcome = self.fetch_and_store(day).await;
                // Publish before deregistering so late waiters still find
                // either the live channel or the warm cache.
                let _ = tx.send(Some(outcome.clone()));
                self.in_flight.lock().await.remove(&day);
                outcome
            }
            FetchRole::Waiter(rx) => self.await_shared(day, rx).await,
        }
    }

    /// Joins an in-flight fetch and shares its outcome.
    async fn await_shared(
        &self,
        day: DayKey,
        mut rx: watch::Receiver<SharedOutcome>,
    ) -> Result<DayKey> {
        debug!(%day, "Joining in-flight fetch");
        let shared = loop {
            let current = rx.borrow().as_ref().cloned();
            if let Some(outcome) = current {
                break Some(outcome);
            }
            if rx.changed().await.is_err() {
                break rx.borrow().as_ref().cloned();
            }
        };

        match shared {
            Some(outcome) => outcome,
            None => {
                // The leading caller was dropped before publishing. Clear the
                // dead channel so the next request can fetch fresh.
                let mut in_flight = self.in_flight.lock().await;
                if in_flight.get(&day).is_some_and(|stored| stored.same_channel(&rx)) {
                    in_flight.remove(&day);
                }
                Err(FetchError::Request(format!("fetch for {day} was abandoned")))
            }
        }
    }

    async fn fetch_and_store(&self, day: DayKey) -> Result<DayKey> {
        // A previous leader may have finished between our cache check and
        // registration.
        if self.cache.lock().await.has(day) {
            self.metrics.cache_hit();
            return Ok(day);
        }

        let doc = match self.source.fetch(day).await {
            Ok(doc) => doc,
            Err(err) => {
                self.metrics.fetch_failure();
                warn!(%day, error = %err, "Day index fetch failed");
                return Err(err);
            }
        };

        let key = doc.authoritative_day(day);
        let manifest = doc.into_manifest();
        debug!(%day, %key, snapshots = manifest.len(), "Day index fetched");

        // Single atomic update: manifest and day index land together.
        self.cache.lock().await.insert(key, manifest);
        self.metrics.day_fetched();
        Ok(key)
    }

    pub async fn cached(&self, day: DayKey) -> bool {
        self.cache.lock().await.has(day)
    }

    /// A clone of the cached manifest for `day`, if fetched.
    pub async fn manifest(&self, day: DayKey) -> Option<DayManifest> {
        self.cache.lock().await.get(day).cloned()
    }

    /// Resolves one snapshot entry by its (day, period, index) triple.
    pub async fn entry_at(
        &self,
        day: DayKey,
        period: Period,
        index: usize,
    ) -> Option<SnapshotEntry> {
        self.cache.lock().await.get(day)?.get(period, index).cloned()
    }

    /// All fetched days in calendar order.
    pub async fn known_days(&self) -> Vec<DayKey> {
        self.cache.lock().await.known_days().collect()
    }
}
