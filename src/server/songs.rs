//! `/api/songs` routes.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::models::Track;
use crate::service::Order;

use super::error::ApiError;
use super::state::AppState;

const DEFAULT_BROWSE_LIMIT: usize = 20;
const DEFAULT_FEED_LIMIT: usize = 10;
const DEFAULT_SEARCH_LIMIT: usize = 25;
const DEFAULT_GENRE: &str = "pop";
const RECENT_TERM: &str = "popular";
const RECOMMENDED_TERM: &str = "top";

/// Positive integer from a query string, else `default`.
fn parse_limit(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|s| s.trim().parse().ok())
        .filter(|&n| n > 0)
        .unwrap_or(default)
}

/// First non-blank candidate.
fn first_present<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|s| !s.trim().is_empty())
}

#[derive(Deserialize)]
struct BrowseParams {
    genre: Option<String>,
    limit: Option<String>,
}

#[derive(Deserialize)]
struct LimitParams {
    limit: Option<String>,
}

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
    limit: Option<String>,
    country: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupParams {
    track_id: Option<String>,
    country: Option<String>,
}

/// An identifier sent either as a JSON number or a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdParam {
    Number(i64),
    Text(String),
}

impl IdParam {
    fn into_string(self) -> String {
        match self {
            IdParam::Number(n) => n.to_string(),
            IdParam::Text(s) => s,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderBody {
    user_id: Option<IdParam>,
    song_id: Option<IdParam>,
    track_id: Option<IdParam>,
    country: Option<String>,
}

#[derive(Serialize)]
struct Pagination {
    page: usize,
    limit: usize,
    total: usize,
    pages: usize,
}

#[derive(Serialize)]
struct BrowseResponse {
    success: bool,
    data: Vec<Track>,
    pagination: Pagination,
}

#[derive(Serialize)]
struct SongsResponse {
    success: bool,
    count: usize,
    songs: Vec<Track>,
}

impl SongsResponse {
    fn new(songs: Vec<Track>) -> Self {
        Self {
            success: true,
            count: songs.len(),
            songs,
        }
    }
}

#[derive(Serialize)]
struct SongResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    song: Track,
}

#[derive(Serialize)]
struct OrderResponse {
    success: bool,
    message: &'static str,
    order: Order,
}

async fn list_songs(
    State(state): State<AppState>,
    Query(params): Query<BrowseParams>,
) -> Result<Json<BrowseResponse>, ApiError> {
    let genre = first_present(&[params.genre.as_deref()]).unwrap_or(DEFAULT_GENRE);
    let limit = parse_limit(params.limit.as_deref(), DEFAULT_BROWSE_LIMIT);

    let songs = state
        .songs
        .browse(genre, limit)
        .await
        .map_err(state.fail("Failed to fetch songs"))?;

    Ok(Json(BrowseResponse {
        success: true,
        pagination: Pagination {
            page: 1,
            limit: songs.len(),
            total: songs.len(),
            pages: 1,
        },
        data: songs,
    }))
}

async fn recent_songs(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Result<Json<SongsResponse>, ApiError> {
    let limit = parse_limit(params.limit.as_deref(), DEFAULT_FEED_LIMIT);
    let songs = state
        .songs
        .browse(RECENT_TERM, limit)
        .await
        .map_err(state.fail("Failed to fetch recent songs"))?;
    Ok(Json(SongsResponse::new(songs)))
}

async fn recommended_songs(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Result<Json<SongsResponse>, ApiError> {
    let limit = parse_limit(params.limit.as_deref(), DEFAULT_FEED_LIMIT);
    let songs = state
        .songs
        .browse(RECOMMENDED_TERM, limit)
        .await
        .map_err(state.fail("Failed to fetch recommended songs"))?;
    Ok(Json(SongsResponse::new(songs)))
}

async fn search_songs(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SongsResponse>, ApiError> {
    let limit = parse_limit(params.limit.as_deref(), DEFAULT_SEARCH_LIMIT);
    let songs = state
        .songs
        .search(
            params.q.as_deref().unwrap_or_default(),
            limit,
            params.country.as_deref(),
        )
        .await
        .map_err(state.fail("Failed to search songs"))?;
    Ok(Json(SongsResponse::new(songs)))
}

async fn get_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<LookupParams>,
) -> Result<Json<SongResponse>, ApiError> {
    let raw_id = first_present(&[params.track_id.as_deref(), Some(id.as_str())]);
    let song = state
        .songs
        .lookup(raw_id, params.country.as_deref())
        .await
        .map_err(state.fail("Failed to fetch song"))?;
    Ok(Json(SongResponse {
        success: true,
        message: None,
        song,
    }))
}

async fn play_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<LookupParams>,
) -> Result<Json<SongResponse>, ApiError> {
    let raw_id = first_present(&[params.track_id.as_deref(), Some(id.as_str())]);
    let song = state
        .songs
        .lookup(raw_id, params.country.as_deref())
        .await
        .map_err(state.fail("Failed to track play"))?;
    Ok(Json(SongResponse {
        success: true,
        message: Some("Play tracked successfully"),
        song,
    }))
}

async fn order_song(
    State(state): State<AppState>,
    payload: Result<Json<OrderBody>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let Json(body) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let track_id = body.track_id.map(IdParam::into_string);
    let song_id = body.song_id.map(IdParam::into_string);
    let raw_id = first_present(&[track_id.as_deref(), song_id.as_deref()])
        .ok_or_else(|| ApiError::BadRequest("trackId or songId is required".into()))?;

    let order = state
        .songs
        .order(
            body.user_id.map(IdParam::into_string),
            Some(raw_id),
            body.country.as_deref(),
        )
        .await
        .map_err(state.fail("Failed to create order"))?;

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse {
            success: true,
            message: "Order created successfully",
            order,
        }),
    ))
}

pub fn song_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_songs))
        .route("/recent", get(recent_songs))
        .route("/recommended", get(recommended_songs))
        .route("/search", get(search_songs))
        .route("/order", post(order_song))
        .route("/{id}", get(get_song))
        .route("/{id}/play", post(play_song))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(Some("5"), 10), 5);
        assert_eq!(parse_limit(Some("0"), 10), 10);
        assert_eq!(parse_limit(Some("abc"), 10), 10);
        assert_eq!(parse_limit(None, 25), 25);
    }

    #[test]
    fn test_first_present() {
        assert_eq!(first_present(&[Some(""), Some("12")]), Some("12"));
        assert_eq!(first_present(&[Some("7"), Some("12")]), Some("7"));
        assert_eq!(first_present(&[None, Some(" ")]), None);
    }
}
