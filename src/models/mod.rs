//! Data models shared by providers, the cache and the HTTP layer.

pub mod track;

pub use track::{FallbackKey, IdentityKey, Track, TrackSource};
