use async_trait::async_trait;
use reqwest::Client;
use tracing::error;

use crate::errors::AppError;

/// Shown when the endpoint gave no usable explanation of its own.
pub const CONNECTIVITY_MESSAGE: &str =
    "There is an issue with the API call. Please ensure your internet connection.";

/// Raw outcome of a POST that reached the server, whatever the status.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The single network verb the assistants need.
///
/// `bearer_token`, when given, is sent as an `Authorization: Bearer` header.
/// Implementations return `Err` only when no response arrived at all
/// (connect failure, timeout, unreadable body); HTTP error statuses come back
/// as `Ok` so the caller can read the server's error payload.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        bearer_token: Option<&str>,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, AppError>;
}

/// `reqwest`-backed transport. No request timeout is configured.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Unexpected(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        bearer_token: Option<&str>,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, AppError> {
        let mut request = self
            .client
            .post(url)
            .header("Content-Type", "application/json");
        if let Some(token) = bearer_token {
            request = request.bearer_auth(token);
        }
        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| {
                // The url carries the API key.
                let e = e.without_url();
                if e.is_timeout() {
                    error!("Assistant request timed out: {e}");
                } else if e.is_connect() {
                    error!("Assistant connection failed: {e}");
                } else {
                    error!("Assistant request failed: {e}");
                }
                AppError::transport(CONNECTIVITY_MESSAGE)
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            let e = e.without_url();
            error!("Failed to read assistant response body: {e}");
            AppError::transport(CONNECTIVITY_MESSAGE)
        })?;

        Ok(TransportResponse { status, body })
    }
}
