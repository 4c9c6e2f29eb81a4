//! Retrying JSON GET client shared by the providers.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::retry::RetryPolicy;

/// User agent sent to every provider.
const USER_AGENT: &str = "Riffus-Music-App/1.0";

/// Connection settings for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Base URL; endpoints are appended to it verbatim.
    pub base_url: String,

    /// Retry policy applied to every GET. Its timeout bounds each attempt.
    pub retry: RetryPolicy,

    /// Whether upstream 4xx responses are retried like any other failure.
    pub retry_client_errors: bool,
}

impl ClientOptions {
    /// Options with the default retry policy.
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            retry: RetryPolicy::default(),
            retry_client_errors: true,
        }
    }
}

/// HTTP client performing retried GET requests that return JSON.
#[derive(Debug, Clone)]
pub(crate) struct JsonClient {
    client: Client,
    options: ClientOptions,
}

impl JsonClient {
    pub(crate) fn new(options: ClientOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(options.retry.timeout)
            .build()?;

        Ok(Self { client, options })
    }

    /// GET `endpoint` (relative to the base URL) with query parameters.
    pub(crate) async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{}", self.options.base_url, endpoint);
        debug!("GET {} with params: {:?}", url, params);

        let retry_client_errors = self.options.retry_client_errors;
        self.options
            .retry
            .run_if(
                || self.get_once(&url, params),
                |err| retry_client_errors || !err.is_client_error(),
            )
            .await
    }

    /// A single attempt.
    async fn get_once(&self, url: &str, params: &[(&str, String)]) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("GET {} failed with {}: {}", url, status, body);
            return Err(CatalogError::Upstream {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("Unknown status")
                    .to_string(),
            });
        }

        let body = response.text().await.map_err(request_error)?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn request_error(err: reqwest::Error) -> CatalogError {
    if err.is_timeout() {
        CatalogError::Timeout
    } else {
        CatalogError::RequestError(err)
    }
}
