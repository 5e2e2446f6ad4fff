use std::fmt;

use async_trait::async_trait;

use super::types::{AnalysisOutcome, AnalysisRequest, DiseaseEntry, HealthStatus};

/// Errors that can occur while talking to the analysis service.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Client misconfigured (bad base URL, TLS backend failure).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The service answered with a non-success status.
    /// `message` is the body's `error` field, or `"Server error: {status}"`.
    Api { status: u16, message: String },
    /// Success status, but the body wasn't a usable JSON object.
    Parse(String),
}

impl AnalysisError {
    /// The text a user should see for this failure.
    pub fn user_message(&self) -> &str {
        match self {
            AnalysisError::Config(msg) | AnalysisError::Network(msg) | AnalysisError::Parse(msg) => {
                msg
            }
            AnalysisError::Api { message, .. } => message,
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::Config(msg) => write!(f, "config error: {msg}"),
            AnalysisError::Network(msg) => write!(f, "network error: {msg}"),
            AnalysisError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            AnalysisError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for AnalysisError {}

/// The remote analysis service, as seen from this client.
#[async_trait]
pub trait AnalysisBoundary: Send + Sync {
    /// Base URL requests are sent to (used in user-facing guidance).
    fn endpoint(&self) -> &str;

    /// `POST /analyze`
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome, AnalysisError>;

    /// `GET /health`
    async fn health(&self) -> Result<HealthStatus, AnalysisError>;

    /// `GET /diseases`
    async fn diseases(&self) -> Result<Vec<DiseaseEntry>, AnalysisError>;
}
