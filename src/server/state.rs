//! Shared handler state.

use std::sync::Arc;

use crate::error::CatalogError;
use crate::service::SongService;

use super::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub songs: Arc<SongService>,
    pub development: bool,
}

impl AppState {
    pub fn new(songs: SongService, development: bool) -> Self {
        Self {
            songs: Arc::new(songs),
            development,
        }
    }

    /// Error mapper for a handler whose failures read `message`.
    pub fn fail(&self, message: &'static str) -> impl Fn(CatalogError) -> ApiError {
        let development = self.development;
        move |err| ApiError::from_catalog(err, message, development)
    }
}
