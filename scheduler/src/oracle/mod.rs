//! # Capacity Oracle Client
//!
//! Talks to the external capacity oracle over HTTP/JSON. The oracle publishes
//! a memory-capacity score per node and tracks the reservations the scheduler
//! commits. Every call is a fresh round trip bounded by the client timeout and
//! the caller's cancellation signal.

pub mod reporter;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, header::CONTENT_TYPE};
use serde::Serialize;
use shared::{api::OracleScores, models::RawScoreSet};
use tokio_util::sync::CancellationToken;

use crate::{config::Config, errors::PluginError};

pub use reporter::{ReservationReporter, ReservationSink, reservations_for};

/// Source of raw per-node scores.
#[async_trait]
pub trait CapacityOracle: Send + Sync {
    /// Fetch the full node -> score map.
    async fn fetch_scores(&self, cancel: &CancellationToken) -> Result<RawScoreSet, PluginError>;
}

/// HTTP transport to the capacity oracle.
#[derive(Debug, Clone)]
pub struct OracleClient {
    http: Client,
    base_url: String,
}

impl OracleClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PluginError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PluginError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, PluginError> {
        Self::new(&config.oracle_url, config.oracle_timeout)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends `request`, racing it against `cancel`, and rejects non-success statuses.
    async fn send(
        &self,
        request: RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<Response, PluginError> {
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PluginError::Cancelled),
            res = request.send() => res.map_err(transport_error)?,
        };

        if !response.status().is_success() {
            tracing::warn!(
                status=%response.status(),
                url=%response.url(),
                "Capacity oracle rejected request"
            );
            return Err(PluginError::UnexpectedStatus {
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }

    /// POST `body` as JSON to `path`.
    async fn post_json<T>(
        &self,
        path: &str,
        body: &T,
        cancel: &CancellationToken,
    ) -> Result<(), PluginError>
    where
        T: Serialize + ?Sized + Sync,
    {
        let payload =
            serde_json::to_vec(body).map_err(|e| PluginError::Serialization(e.to_string()))?;
        let request = self
            .http
            .post(self.url(path))
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        self.send(request, cancel).await.map(|_| ())
    }
}

#[async_trait]
impl CapacityOracle for OracleClient {
    async fn fetch_scores(&self, cancel: &CancellationToken) -> Result<RawScoreSet, PluginError> {
        let response = self.send(self.http.get(self.url("/scores")), cancel).await?;

        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PluginError::Cancelled),
            body = response.bytes() => body.map_err(transport_error)?,
        };

        let data: OracleScores =
            serde_json::from_slice(&body).map_err(|e| PluginError::Decode(e.to_string()))?;

        tracing::debug!(nodes = data.result.len(), "Fetched node scores");
        Ok(data.result)
    }
}

fn transport_error(err: reqwest::Error) -> PluginError {
    if err.is_timeout() {
        PluginError::Transport(format!("request timed out: {}", err))
    } else {
        PluginError::Transport(err.to_string())
    }
}
