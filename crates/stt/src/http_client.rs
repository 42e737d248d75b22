use std::{sync::OnceLock, time::Duration};

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::{Result, SttError};

/// Common HTTP client to reuse connections across STT providers
///
/// Timeouts are set per request from each provider's configuration.
pub fn http_client() -> Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();

    CLIENT
        .get_or_init(|| {
            let mut headers = http::HeaderMap::new();
            headers.insert(http::header::CONNECTION, http::HeaderValue::from_static("keep-alive"));

            Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .pool_idle_timeout(Some(Duration::from_secs(5)))
                .tcp_nodelay(true)
                .tcp_keepalive(Some(Duration::from_secs(60)))
                .default_headers(headers)
                .build()
                .expect("Failed to build default HTTP client")
        })
        .clone()
}

/// Send a provider request and return the body of a 2xx response
///
/// Transport failures map to [`SttError::NetworkFailure`], a request that
/// cannot be built to [`SttError::RequestConstructionFailed`], and any
/// non-2xx status to [`SttError::NonOkStatus`] carrying the raw body.
pub(crate) async fn send(provider: &str, request: RequestBuilder) -> Result<String> {
    let response = request.send().await.map_err(|e| {
        tracing::debug!(provider, "{provider} request failed: {e}");
        if e.is_builder() {
            SttError::RequestConstructionFailed(format!("Failed to build request to {provider}: {e}"))
        } else if e.is_timeout() {
            SttError::NetworkFailure(format!("Request to {provider} timed out: {e}"))
        } else {
            SttError::NetworkFailure(format!("Failed to send request to {provider}: {e}"))
        }
    })?;

    let status = response.status();

    let body = response.text().await.map_err(|e| {
        tracing::debug!(provider, "Failed to read {provider} response body: {e}");
        SttError::NetworkFailure(format!("Failed to read response from {provider}: {e}"))
    })?;

    if !status.is_success() {
        tracing::debug!(provider, status = status.as_u16(), "{provider} API error ({status}): {body}");

        return Err(SttError::NonOkStatus {
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}

/// Decode a provider's JSON body
pub(crate) fn decode<T: DeserializeOwned>(provider: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        tracing::debug!(provider, "Failed to parse {provider} response: {e}");
        SttError::ResponseDecodeFailed(format!("{provider}: {e}"))
    })
}
