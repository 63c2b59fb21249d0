//! Shared HTTP plumbing: retrying client and JSON round-trips.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::provider::{LLMError, Result};

/// Builds a client that retries transient failures (connect errors, 5xx, 429)
/// with exponential backoff.
pub fn build_http_client(timeout: Duration, max_retries: u32) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LLMError::Config(format!("failed to build HTTP client: {}", e)))?;

    let retry_policy = ExponentialBackoff::builder()
        .retry_bounds(Duration::from_millis(100), Duration::from_secs(5))
        .build_with_max_retries(max_retries);

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

/// A client without retries, used by provider constructors.
pub fn plain_client() -> ClientWithMiddleware {
    ClientBuilder::new(reqwest::Client::new()).build()
}

/// How a provider presents its API key.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ApiKey<'a> {
    /// `Authorization: Bearer <key>`
    Bearer(&'a str),
    /// A vendor-specific header such as `x-goog-api-key`.
    Header(&'static str, &'a str),
}

/// POSTs `body` as JSON and decodes the JSON reply.
///
/// 401/403 become [`LLMError::Auth`], any other non-success status
/// becomes [`LLMError::Api`] carrying the response text.
pub(crate) async fn post_json<B, T>(
    client: &ClientWithMiddleware,
    vendor: &str,
    url: &str,
    key: ApiKey<'_>,
    body: &B,
) -> Result<T>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let request = client.post(url).header("Content-Type", "application/json");
    let request = match key {
        ApiKey::Bearer(token) => request.header("Authorization", format!("Bearer {}", token)),
        ApiKey::Header(name, value) => request.header(name, value),
    };

    let response = request.json(body).send().await?;
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await?;
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(LLMError::Auth(format!(
                "{} authentication failed: {}. Please check your API key.",
                vendor, text
            )));
        }
        return Err(LLMError::Api(format!(
            "{} API error: HTTP {}: {}",
            vendor, status, text
        )));
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
