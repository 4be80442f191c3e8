use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::error;
use trophy_shared::{LeaderboardRow, SeasonRecord, SortOrder, leaderboard, list};

use crate::state::AppState;

const QUERY_CACHE_CONTROL: &str = "public, max-age=30";
const MAX_QUERY_LEN: usize = 128;

#[derive(Debug, Default, Deserialize)]
pub struct SeasonsQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub order: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SeasonsResponse<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub league: Option<&'a str>,
    pub order: SortOrder,
    pub seasons: Vec<SeasonRecord>,
}

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let loaded = state.seasons.read().await.clone();
    let observability = state.observability.snapshot();
    Json(serde_json::json!({
        "status": "ok",
        "seasons": loaded.store.len(),
        "generation": loaded.generation,
        "loaded_at": loaded.loaded_at.map(|at| at.to_rfc3339()),
        "last_error": loaded.last_error,
        "source": state.source.describe(),
        "observability": {
            "loads_ok_total": observability.loads_ok_total,
            "loads_failed_total": observability.loads_failed_total,
            "season_list_requests_total": observability.season_list_requests_total,
            "leaderboard_requests_total": observability.leaderboard_requests_total,
        }
    }))
}

/// Filtered, year-sorted season list.
pub async fn list_seasons(
    State(state): State<AppState>,
    Query(query): Query<SeasonsQuery>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    state.observability.record_season_list_request();

    let search = validate_query(&query.q)?;
    let order = match query.order.as_deref().map(str::trim) {
        None | Some("") => SortOrder::default(),
        Some(raw) => raw.parse::<SortOrder>().map_err(|_| StatusCode::BAD_REQUEST)?,
    };

    let (fingerprint, store) = state.current().await;
    let etag = seasons_etag(fingerprint, order, search);
    if if_none_match_matches(&headers, &etag) {
        return Ok(not_modified_response(QUERY_CACHE_CONTROL, Some(etag.as_str())));
    }

    let body = SeasonsResponse {
        league: store.league(),
        order,
        seasons: list(store.seasons(), search, order),
    };
    let json = serialize_body(&body)?;
    Ok(json_bytes_response(json, QUERY_CACHE_CONTROL, Some(etag.as_str())))
}

/// Dialog content for a single season.
pub async fn get_season(
    State(state): State<AppState>,
    Path(raw_year): Path<String>,
) -> Result<Response, StatusCode> {
    let year: i32 = raw_year
        .trim()
        .parse()
        .map_err(|_| StatusCode::BAD_REQUEST)?;

    let (_, store) = state.current().await;
    let season = store.find(year).ok_or(StatusCode::NOT_FOUND)?;
    let json = serialize_body(&season.detail())?;
    Ok(json_bytes_response(json, QUERY_CACHE_CONTROL, None))
}

/// Podium leaderboard across every loaded season, narrowed by competitor name.
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    state.observability.record_leaderboard_request();

    let search = validate_query(&query.q)?;
    let (fingerprint, store) = state.current().await;
    let etag = leaderboard_etag(fingerprint, search);
    if if_none_match_matches(&headers, &etag) {
        return Ok(not_modified_response(QUERY_CACHE_CONTROL, Some(etag.as_str())));
    }

    let rows: Vec<LeaderboardRow> = leaderboard(store.seasons(), search);
    let json = serialize_body(&rows)?;
    Ok(json_bytes_response(json, QUERY_CACHE_CONTROL, Some(etag.as_str())))
}

fn validate_query(raw: &str) -> Result<&str, StatusCode> {
    if raw.chars().count() > MAX_QUERY_LEN || raw.chars().any(char::is_control) {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(raw)
}

fn serialize_body<T: Serialize>(value: &T) -> Result<Bytes, StatusCode> {
    serde_json::to_vec(value).map(Bytes::from).map_err(|e| {
        error!(error = %e, "failed to serialize response body");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

fn seasons_etag(fingerprint: u32, order: SortOrder, query: &str) -> String {
    format!(
        "\"seasons-{fingerprint:08x}-{order}-{:08x}\"",
        crc32fast::hash(query.as_bytes())
    )
}

fn leaderboard_etag(fingerprint: u32, query: &str) -> String {
    format!(
        "\"leaderboard-{fingerprint:08x}-{:08x}\"",
        crc32fast::hash(query.as_bytes())
    )
}

fn json_bytes_response(body: Bytes, cache_control: &'static str, etag: Option<&str>) -> Response {
    let mut response = Response::new(Body::from(body));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control),
    );
    if let Some(etag) = etag
        && let Ok(etag_header) = HeaderValue::from_str(etag)
    {
        headers.insert(header::ETAG, etag_header);
    }
    response
}

fn not_modified_response(cache_control: &'static str, etag: Option<&str>) -> Response {
    let mut response = StatusCode::NOT_MODIFIED.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control),
    );
    if let Some(etag) = etag
        && let Ok(etag_header) = HeaderValue::from_str(etag)
    {
        headers.insert(header::ETAG, etag_header);
    }
    response
}

fn normalize_etag(candidate: &str) -> &str {
    candidate.strip_prefix("W/").unwrap_or(candidate).trim()
}

fn if_none_match_matches(headers: &HeaderMap, etag: &str) -> bool {
    let Some(value) = headers.get(header::IF_NONE_MATCH) else {
        return false;
    };
    let Ok(raw) = value.to_str() else {
        return false;
    };

    raw.split(',').any(|candidate| {
        let candidate = candidate.trim();
        candidate == "*" || normalize_etag(candidate) == normalize_etag(etag)
    })
}
