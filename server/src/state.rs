use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::warn;
use trophy_shared::SeasonStore;

use crate::config::{
    ChampionsSource, champions_source, upstream_connect_timeout, upstream_http_timeout,
};

pub fn document_fingerprint(bytes: &[u8]) -> u32 {
    crc32fast::hash(bytes)
}

/// The currently served store. Replaced wholesale on every load.
#[derive(Debug, Clone)]
pub struct LoadedStore {
    pub generation: u64,
    /// crc32 of the document bytes the store was built from.
    pub fingerprint: u32,
    pub store: Arc<SeasonStore>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl Default for LoadedStore {
    fn default() -> Self {
        Self {
            generation: 0,
            fingerprint: document_fingerprint(b""),
            store: Arc::new(SeasonStore::default()),
            loaded_at: None,
            last_error: None,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub seasons: Arc<RwLock<LoadedStore>>,
    pub source: ChampionsSource,
    pub http_client: reqwest::Client,
    pub observability: Arc<ObservabilityCounters>,
}

#[derive(Debug, Default)]
pub struct ObservabilityCounters {
    loads_ok_total: AtomicU64,
    loads_failed_total: AtomicU64,
    season_list_requests_total: AtomicU64,
    leaderboard_requests_total: AtomicU64,
}

#[derive(Debug, Clone, Copy)]
pub struct ObservabilitySnapshot {
    pub loads_ok_total: u64,
    pub loads_failed_total: u64,
    pub season_list_requests_total: u64,
    pub leaderboard_requests_total: u64,
}

impl ObservabilityCounters {
    pub fn snapshot(&self) -> ObservabilitySnapshot {
        ObservabilitySnapshot {
            loads_ok_total: self.loads_ok_total.load(Ordering::Relaxed),
            loads_failed_total: self.loads_failed_total.load(Ordering::Relaxed),
            season_list_requests_total: self.season_list_requests_total.load(Ordering::Relaxed),
            leaderboard_requests_total: self.leaderboard_requests_total.load(Ordering::Relaxed),
        }
    }

    pub fn record_load_ok(&self) {
        self.loads_ok_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load_failed(&self) {
        self.loads_failed_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_season_list_request(&self) {
        self.season_list_requests_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_leaderboard_request(&self) {
        self.leaderboard_requests_total
            .fetch_add(1, Ordering::Relaxed);
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_source(champions_source())
    }

    pub fn with_source(source: ChampionsSource) -> Self {
        let request_timeout = upstream_http_timeout();
        let connect_timeout = upstream_connect_timeout();
        let http_client = reqwest::Client::builder()
            .user_agent("trophy-case/0.1")
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(
                    error = %e,
                    "failed to build configured HTTP client, falling back to defaults"
                );
                reqwest::Client::new()
            });
        Self {
            seasons: Arc::new(RwLock::new(LoadedStore::default())),
            source,
            http_client,
            observability: Arc::new(ObservabilityCounters::default()),
        }
    }

    /// Cheap handle to the current store; the lock is released before returning.
    pub async fn current(&self) -> (u32, Arc<SeasonStore>) {
        let loaded = self.seasons.read().await;
        (loaded.fingerprint, Arc::clone(&loaded.store))
    }

    /// Swap in a new store and bump the generation.
    pub async fn replace_store(
        &self,
        store: SeasonStore,
        fingerprint: u32,
        error: Option<String>,
    ) -> u64 {
        let mut loaded = self.seasons.write().await;
        loaded.generation += 1;
        loaded.fingerprint = fingerprint;
        loaded.store = Arc::new(store);
        loaded.loaded_at = Some(Utc::now());
        loaded.last_error = error;
        loaded.generation
    }
}

#[cfg(test)]
mod tests {
    use trophy_shared::SeasonStore;

    use super::{AppState, document_fingerprint};
    use crate::config::ChampionsSource;

    #[tokio::test]
    async fn replacing_store_bumps_generation_and_fingerprint() {
        let state = AppState::with_source(ChampionsSource::File("unused.json".to_owned()));
        let (fingerprint, store) = state.current().await;
        assert_eq!(fingerprint, document_fingerprint(b""));
        assert!(store.is_empty());
        assert_eq!(state.seasons.read().await.generation, 0);

        let document = br#"[{"year": 2024}]"#;
        let next = SeasonStore::from_slice(document).expect("load fixture");
        assert_eq!(
            state
                .replace_store(next, document_fingerprint(document), None)
                .await,
            1
        );

        let (fingerprint, store) = state.current().await;
        assert_eq!(fingerprint, document_fingerprint(document));
        assert_eq!(store.len(), 1);
        let loaded = state.seasons.read().await.clone();
        assert_eq!(loaded.generation, 1);
        assert!(loaded.loaded_at.is_some());
    }

    #[test]
    fn fingerprint_tracks_document_content() {
        assert_ne!(
            document_fingerprint(br#"[{"year":2024,"champion":"Alice"}]"#),
            document_fingerprint(br#"[{"year":2024,"champion":"Bob"}]"#)
        );
    }
}
