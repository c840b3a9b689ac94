//! HTTP client for registry requests
//!
//! Wraps reqwest with a request timeout, a User-Agent and exponential
//! backoff retries (max 3) for timeouts, transport errors and HTTP 429.

use crate::error::RegistryError;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Default timeout for HTTP requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("peerbump/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                RegistryError::network_error("", "HTTP client", format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
        })
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Perform a GET request, retrying transient failures
    ///
    /// 404 maps to `PackageNotFound` and is never retried.
    pub async fn get(
        &self,
        url: &str,
        package: &str,
        registry: &str,
    ) -> Result<reqwest::Response, RegistryError> {
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tracing::debug!(url, attempt, "retrying registry request");
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay *= 2;
            }

            let response = match self.client.get(url).send().await {
                Ok(response) => response,
                Err(e) if e.is_timeout() => {
                    last_error = Some(RegistryError::timeout(package, registry));
                    continue;
                }
                Err(e) => {
                    last_error = Some(RegistryError::network_error(package, registry, e.to_string()));
                    continue;
                }
            };

            match response.status() {
                StatusCode::TOO_MANY_REQUESTS => {
                    last_error = Some(RegistryError::rate_limit_exceeded(registry));
                }
                StatusCode::NOT_FOUND => {
                    return Err(RegistryError::package_not_found(package, registry));
                }
                status if !status.is_success() => {
                    return Err(RegistryError::network_error(
                        package,
                        registry,
                        format!("HTTP {}", status),
                    ));
                }
                _ => return Ok(response),
            }
        }

        Err(last_error
            .unwrap_or_else(|| RegistryError::network_error(package, registry, "unknown error")))
    }

    /// Perform a GET request and parse the body as JSON
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        package: &str,
        registry: &str,
    ) -> Result<T, RegistryError> {
        let response = self.get(url, package, registry).await?;
        response.json::<T>().await.map_err(|e| {
            RegistryError::invalid_response(package, registry, format!("failed to parse JSON: {}", e))
        })
    }
}
