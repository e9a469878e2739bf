//! USGS FDSN event API client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

use crate::config::UpstreamSettings;
use crate::domain::query::UpstreamQuery;

use super::error::InfraError;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("upstream unreachable: {detail}")]
    Transport { detail: String },
}

/// Source of raw earthquake event data.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Issue one event query and return the raw response body.
    async fn query(&self, query: &UpstreamQuery) -> Result<String, UpstreamError>;
}

/// HTTP client for the upstream event endpoint.
///
/// The request timeout bounds the whole exchange; there are no retries, a
/// single failure is surfaced to the caller.
pub struct UsgsClient {
    client: Client,
    endpoint: Url,
}

impl UsgsClient {
    pub fn new(settings: &UpstreamSettings) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(settings.timeout)
            .build()
            .map_err(|err| InfraError::http_client(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: settings.url.clone(),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("temblor/", env!("CARGO_PKG_VERSION"))
    }
}

#[async_trait]
impl EventSource for UsgsClient {
    async fn query(&self, query: &UpstreamQuery) -> Result<String, UpstreamError> {
        let pairs: Vec<(&str, &str)> = query.pairs().collect();

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&pairs)
            .send()
            .await
            .map_err(|err| UpstreamError::Transport {
                detail: err.to_string(),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| UpstreamError::Transport {
                detail: err.to_string(),
            })?;

        if !status.is_success() {
            return Err(UpstreamError::Status { status, body });
        }

        Ok(body)
    }
}
