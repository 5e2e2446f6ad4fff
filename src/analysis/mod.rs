pub mod boundary;
pub mod http;
pub mod types;

pub use boundary::{AnalysisBoundary, AnalysisError};
pub use http::HttpAnalysisClient;
pub use types::{AnalysisOutcome, AnalysisRequest, AnalysisResult, DiseaseEntry, HealthStatus, Prediction};
