use thiserror::Error;
use tracing::{info, warn};
use trophy_shared::{SeasonStore, StoreError};

use crate::config::{ChampionsSource, champions_refresh_interval};
use crate::state::{AppState, document_fingerprint};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch champions document: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("failed to read champions document: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Periodic reloads after the startup load. Returns immediately when no
/// refresh interval is configured.
pub async fn run_refresh(state: AppState) {
    let Some(period) = champions_refresh_interval() else {
        return;
    };
    info!(
        "champions refresh enabled (interval: {}s)",
        period.as_secs()
    );

    let mut interval = tokio::time::interval(period);
    // Consume the immediate first tick; the startup load already ran.
    interval.tick().await;

    loop {
        interval.tick().await;
        load_once(&state).await;
    }
}

/// One best-effort load. Any failure leaves an empty store in place.
pub async fn load_once(state: &AppState) -> u64 {
    match fetch_store(&state.http_client, &state.source).await {
        Ok((store, fingerprint)) => {
            let count = store.len();
            let skipped = store.skipped();
            if skipped > 0 {
                warn!(skipped, "ignored non-object entries in champions document");
            }
            let generation = state.replace_store(store, fingerprint, None).await;
            state.observability.record_load_ok();
            info!(
                generation,
                source = state.source.describe(),
                "loaded {count} seasons"
            );
            generation
        }
        Err(e) => {
            warn!(
                error = %e,
                source = state.source.describe(),
                "failed to load champions document, serving an empty trophy case"
            );
            state.observability.record_load_failed();
            state
                .replace_store(
                    SeasonStore::default(),
                    document_fingerprint(b""),
                    Some(e.to_string()),
                )
                .await
        }
    }
}

async fn fetch_store(
    client: &reqwest::Client,
    source: &ChampionsSource,
) -> Result<(SeasonStore, u32), LoadError> {
    let bytes = match source {
        ChampionsSource::Url(url) => {
            let resp = client.get(url).send().await?.error_for_status()?;
            resp.bytes().await?.to_vec()
        }
        ChampionsSource::File(path) => tokio::fs::read(path).await?,
    };
    let store = SeasonStore::from_slice(&bytes)?;
    Ok((store, document_fingerprint(&bytes)))
}
