//! # Riffus
//!
//! A music metadata backend that searches a public catalog (iTunes or
//! Deezer), merges the results with locally cached tracks and serves them
//! over a small JSON HTTP API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use riffus::{server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig {
//!         use_cache: true,
//!         ..ServerConfig::default()
//!     };
//!     server::run_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Building blocks
//!
//! - [`RetryPolicy`] - bounded retries with linearly growing delays
//! - [`Reconciler`] - deduplicates tracks from several sources by identity
//! - [`api::Provider`] - the upstream catalog seam, with [`api::ItunesApi`]
//!   and [`api::DeezerApi`]
//! - [`SongService`] - search, lookup and order operations

pub mod api;
pub mod cache;
pub mod config;
pub mod converters;
pub mod error;
pub mod models;
pub mod reconcile;
pub mod retry;
pub mod server;
pub mod service;

#[cfg(test)]
mod testing;

pub use api::{Provider, ProviderKind};
pub use config::ServerConfig;
pub use error::{CatalogError, Result};
pub use models::{Track, TrackSource};
pub use reconcile::Reconciler;
pub use retry::RetryPolicy;
pub use service::SongService;
