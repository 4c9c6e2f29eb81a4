//! HTTP server exposing the song endpoints.

mod error;
mod songs;
mod state;

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::cache::MemoryTrackCache;
use crate::config::ServerConfig;
use crate::error::Result;
use crate::service::SongService;

pub use error::ApiError;
pub use state::AppState;

async fn home() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "riffus" }))
}

/// Build the router over an assembled state.
pub fn make_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .nest("/api/songs", songs::song_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Construct the provider, cache and service described by `config`.
pub fn build_state(config: &ServerConfig) -> Result<AppState> {
    let provider = config.provider.build(config.client_options())?;
    let mut songs =
        SongService::new(provider).with_default_country(config.default_country.clone());
    if config.use_cache {
        songs = songs.with_cache(Arc::new(MemoryTrackCache::with_capacity(
            config.cache_capacity,
        )));
    }
    Ok(AppState::new(songs, config.development))
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    let app = make_app(build_state(&config)?);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        "Server listening on {} (provider: {}, cache: {})",
        addr, config.provider, config.use_cache
    );

    axum::serve(listener, app).await?;
    Ok(())
}
