//! Server configuration.

use std::time::Duration;

use crate::api::{ClientOptions, ProviderKind, DEFAULT_COUNTRY};
use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::retry::RetryPolicy;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 4000;

/// Everything needed to assemble and run the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,

    /// Upstream catalog to query.
    pub provider: ProviderKind,

    /// Overrides the provider's production base URL.
    pub provider_base_url: Option<String>,

    /// Keep seen tracks in memory and merge them into searches.
    pub use_cache: bool,

    /// Most records the track cache holds before evicting the oldest.
    pub cache_capacity: usize,

    /// Include error details in 500 responses.
    pub development: bool,

    pub default_country: String,
    pub retry: RetryPolicy,
    pub retry_client_errors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            provider: ProviderKind::default(),
            provider_base_url: None,
            use_cache: false,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            development: false,
            default_country: DEFAULT_COUNTRY.to_string(),
            retry: RetryPolicy::default(),
            retry_client_errors: true,
        }
    }
}

impl ServerConfig {
    /// Address to bind, as `host:port`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Connection options for the configured provider.
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self
                .provider_base_url
                .clone()
                .unwrap_or_else(|| self.provider.default_base_url().to_string()),
            retry: self.retry,
            retry_client_errors: self.retry_client_errors,
        }
    }

    /// Set the retry policy from millisecond values.
    pub fn with_retry_millis(mut self, max_retries: u32, delay_ms: u64, timeout_ms: u64) -> Self {
        self.retry = RetryPolicy::new(
            max_retries,
            Duration::from_millis(delay_ms),
            Duration::from_millis(timeout_ms),
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_options_use_default_base_url() {
        let config = ServerConfig {
            provider: ProviderKind::Deezer,
            ..Default::default()
        };
        let options = config.client_options();
        assert_eq!(options.base_url, "https://api.deezer.com/");
        assert_eq!(options.retry, RetryPolicy::default());
        assert!(options.retry_client_errors);
        assert_eq!(config.cache_capacity, DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig {
            provider_base_url: Some("http://127.0.0.1:9999".to_string()),
            port: 8080,
            ..Default::default()
        }
        .with_retry_millis(5, 200, 3000);

        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
        assert_eq!(config.client_options().base_url, "http://127.0.0.1:9999");
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.retry_delay, Duration::from_millis(200));
        assert_eq!(config.retry.timeout, Duration::from_millis(3000));
    }
}
