//! reqwest-backed client for the triage analysis service.
//!
//! Endpoints (relative to the configured base, e.g. `http://localhost:5001/api`):
//! - `POST /analyze` with `{"prompt": "..."}`
//! - `GET /health`
//! - `GET /diseases`
//!
//! Non-2xx bodies may carry `{"error": "..."}`; anything else becomes
//! `"Server error: {status}"`.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::analysis::{
    AnalysisBoundary, AnalysisError, AnalysisOutcome, AnalysisRequest, DiseaseEntry, HealthStatus,
};
use crate::analysis::types::DiseaseCatalogue;

/// Error body shape used by the service on non-2xx responses.
#[derive(Deserialize, Debug)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

pub struct HttpAnalysisClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAnalysisClient {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, AnalysisError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AnalysisError::Config(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// Build the `Api` error for a non-success response, preferring the body's
/// `error` field over the synthesized status message.
fn api_error(status: u16, body: &[u8]) -> AnalysisError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("Server error: {status}"));
    AnalysisError::Api { status, message }
}

/// Read a response body and decode it, mapping every failure to an `AnalysisError`.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AnalysisError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| AnalysisError::Network(e.to_string()))?;

    if !status.is_success() {
        let err = api_error(status.as_u16(), &body);
        warn!("Analysis service error: {}", err);
        return Err(err);
    }

    serde_json::from_slice(&body).map_err(|e| AnalysisError::Parse(e.to_string()))
}

#[async_trait]
impl AnalysisBoundary for HttpAnalysisClient {
    fn endpoint(&self) -> &str {
        &self.base_url
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome, AnalysisError> {
        info!(
            "Analysis request: url={}, prompt_len={}",
            self.url("analyze"),
            request.prompt.len()
        );

        let response = self
            .client
            .post(self.url("analyze"))
            .json(request)
            .send()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        debug!("Analysis response status: {}", response.status());

        let raw: serde_json::Value = read_json(response).await?;
        AnalysisOutcome::from_value(raw).map_err(|e| AnalysisError::Parse(e.to_string()))
    }

    async fn health(&self) -> Result<HealthStatus, AnalysisError> {
        let response = self
            .client
            .get(self.url("health"))
            .send()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;
        read_json(response).await
    }

    async fn diseases(&self) -> Result<Vec<DiseaseEntry>, AnalysisError> {
        let response = self
            .client
            .get(self.url("diseases"))
            .send()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;
        let catalogue: DiseaseCatalogue = read_json(response).await?;
        debug!("Loaded {} diseases", catalogue.diseases.len());
        Ok(catalogue.diseases)
    }
}
