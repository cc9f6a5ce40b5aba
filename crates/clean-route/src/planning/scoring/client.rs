use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use super::wire::{ScoringRequest, WireScoredRoute};

/// Reasons the remote scorer could not be used. Never fatal to a planning run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringUnavailable {
    #[error("remote scoring is not configured")]
    Disabled,
    #[error("scoring transport failed: {0}")]
    Transport(String),
    #[error("scoring request timed out after {0:?}")]
    TimedOut(Duration),
    #[error("scoring service responded with status {0}")]
    Status(u16),
    #[error("malformed scoring response: {0}")]
    Malformed(String),
}

/// Outbound hook to a batch route scorer.
pub trait ScoringClient: Send + Sync {
    fn score(
        &self,
        request: &ScoringRequest,
    ) -> impl Future<Output = Result<Vec<WireScoredRoute>, ScoringUnavailable>> + Send;
}

/// Scorer speaking the JSON batch protocol over HTTP.
#[derive(Debug, Clone)]
pub struct HttpScoringClient {
    client: Client,
    endpoint: String,
}

impl HttpScoringClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

impl ScoringClient for HttpScoringClient {
    async fn score(
        &self,
        request: &ScoringRequest,
    ) -> Result<Vec<WireScoredRoute>, ScoringUnavailable> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|err| ScoringUnavailable::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoringUnavailable::Status(status.as_u16()));
        }

        response
            .json::<Vec<WireScoredRoute>>()
            .await
            .map_err(|err| ScoringUnavailable::Malformed(err.to_string()))
    }
}

/// Scorer used when no remote endpoint is configured; always defers to local scoring.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledScoring;

impl ScoringClient for DisabledScoring {
    async fn score(
        &self,
        _request: &ScoringRequest,
    ) -> Result<Vec<WireScoredRoute>, ScoringUnavailable> {
        Err(ScoringUnavailable::Disabled)
    }
}

/// Either an HTTP scorer or none, chosen from configuration at startup.
#[derive(Debug, Clone)]
pub enum ConfiguredScoring {
    Http(HttpScoringClient),
    Disabled(DisabledScoring),
}

impl ConfiguredScoring {
    pub fn from_endpoint(client: Client, endpoint: Option<&str>) -> Self {
        match endpoint {
            Some(url) => Self::Http(HttpScoringClient::new(client, url)),
            None => Self::Disabled(DisabledScoring),
        }
    }
}

impl ScoringClient for ConfiguredScoring {
    async fn score(
        &self,
        request: &ScoringRequest,
    ) -> Result<Vec<WireScoredRoute>, ScoringUnavailable> {
        match self {
            Self::Http(client) => client.score(request).await,
            Self::Disabled(client) => client.score(request).await,
        }
    }
}
