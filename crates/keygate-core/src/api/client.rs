//! API client for the demo backend.
//!
//! This module provides the `ApiClient` struct for validating an API key and
//! making the two protected calls. Requests are never retried; each failure is
//! returned to the caller as an `ApiError`.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::ApiKey;
use crate::models::{AddNumbersRequest, AddNumbersResponse, RandomNumber};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Header carrying the derived API key on every request
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Default HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const TEST_AUTH_PATH: &str = "test-auth";
const RANDOM_NUMBER_PATH: &str = "random-number";
const ADD_NUMBERS_PATH: &str = "add-numbers";

/// API client for the demo backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client for the backend at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Self::normalize_base_url(base_url)?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Validate the base URL and strip any trailing slash.
    fn normalize_base_url(base_url: &str) -> Result<String, ApiError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed =
            Url::parse(trimmed).map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", trimmed, e)))?;
        match parsed.scheme() {
            "http" | "https" => Ok(trimmed.to_string()),
            other => Err(ApiError::InvalidBaseUrl(format!(
                "{}: unsupported scheme '{}'",
                trimmed, other
            ))),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Attach the key and send, mapping non-success statuses to errors.
    async fn send(request: RequestBuilder, key: &ApiKey) -> Result<Response, ApiError> {
        let response = request
            .header(API_KEY_HEADER, key.as_str())
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Request failed before a response was received");
                ApiError::Network(e)
            })?;

        Self::check_response(response).await
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            debug!(%status, "Request rejected");
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, ApiError> {
        // A body cut off mid-read is a transport failure, not a bad payload
        let text = response.text().await.map_err(|e| {
            warn!(url = url, error = %e, "Failed to read response body");
            ApiError::Network(e)
        })?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse JSON from {}: {}", url, e)))
    }

    // ===== Endpoints =====

    /// Ask the backend whether `key` is valid. Any 2xx means yes.
    pub async fn test_auth(&self, key: &ApiKey) -> Result<(), ApiError> {
        let url = self.url(TEST_AUTH_PATH);
        debug!(url = %url, key = key.fingerprint(), "Verifying API key");
        Self::send(self.client.get(&url), key).await?;
        Ok(())
    }

    /// Fetch a random number
    pub async fn random_number(&self, key: &ApiKey) -> Result<RandomNumber, ApiError> {
        let url = self.url(RANDOM_NUMBER_PATH);
        debug!(url = %url, "Fetching random number");
        let response = Self::send(self.client.get(&url), key).await?;
        Self::decode(response, &url).await
    }

    /// Have the backend add two integers
    pub async fn add_numbers(
        &self,
        key: &ApiKey,
        num1: i64,
        num2: i64,
    ) -> Result<AddNumbersResponse, ApiError> {
        let url = self.url(ADD_NUMBERS_PATH);
        debug!(url = %url, num1, num2, "Adding numbers");
        let body = AddNumbersRequest { num1, num2 };
        let response = Self::send(self.client.post(&url).json(&body), key).await?;
        Self::decode(response, &url).await
    }
}
