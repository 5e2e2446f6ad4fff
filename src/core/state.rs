//! # Application State
//!
//! Core business state for Triage. Domain logic only, no TUI types.
//! Presentation state (scroll offsets, animation clocks) lives in `tui`.
//!
//! ```text
//! App
//! ├── ui: UiState                 // Idle | Loading | Results | Error
//! ├── input: InputState           // buffer + empty-submit flag
//! ├── status_message: String      // status bar text
//! ├── api_base: String            // analysis service, for error guidance
//! └── diseases: DiseasePanel      // catalogue overlay
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::analysis::{AnalysisError, AnalysisOutcome, AnalysisRequest, DiseaseEntry};
use crate::core::input::InputState;
use crate::core::progress::Stage;
use crate::render::ResultView;

/// A completed analysis, projected and ready to show.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    /// Correlates log lines and the exported report for this analysis.
    pub id: String,
    pub request: AnalysisRequest,
    pub outcome: Arc<AnalysisOutcome>,
    pub view: ResultView,
}

/// Which of the three user-facing error explanations applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NetworkFailure,
    ModelUnavailable,
    AnalysisFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorView {
    pub kind: ErrorKind,
    pub title: String,
    pub message: String,
}

impl ErrorView {
    /// Classify a boundary failure into what the user is told.
    ///
    /// Server messages mentioning `Model` or `train` (case-sensitive, the way
    /// the service phrases it) mean the model hasn't been provisioned.
    pub fn classify(err: &AnalysisError, api_base: &str) -> Self {
        match err {
            AnalysisError::Network(_) => ErrorView {
                kind: ErrorKind::NetworkFailure,
                title: "Cannot Connect to Server".to_string(),
                message: format!(
                    "The analysis service at {api_base} appears to be unreachable. \
                     Make sure it is running, then try again."
                ),
            },
            AnalysisError::Api { message, .. }
                if message.contains("Model") || message.contains("train") =>
            {
                ErrorView {
                    kind: ErrorKind::ModelUnavailable,
                    title: "Model Not Found".to_string(),
                    message: "The analysis model is not available. \
                              Train or deploy the model first, then try again."
                        .to_string(),
                }
            }
            other => ErrorView {
                kind: ErrorKind::AnalysisFailed,
                title: "Analysis Failed".to_string(),
                message: other.user_message().to_string(),
            },
        }
    }
}

/// Exactly one screen is visible at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum UiState {
    Idle,
    Loading { stage: Stage, request: AnalysisRequest },
    Results(Box<Rendered>),
    Error(ErrorView),
}

impl UiState {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading { .. })
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, UiState::Idle)
    }
}

/// Disease catalogue overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum DiseasePanel {
    Hidden,
    Loading,
    Shown(Vec<DiseaseEntry>),
    Failed(String),
}

pub struct App {
    pub ui: UiState,
    pub input: InputState,
    pub status_message: String,
    pub api_base: String,
    pub diseases: DiseasePanel,
    /// Catalogue is fetched once and kept for the rest of the run.
    pub disease_cache: Option<Vec<DiseaseEntry>>,
}

impl App {
    pub fn new(api_base: String) -> Self {
        Self {
            ui: UiState::Idle,
            input: InputState::default(),
            status_message: String::from("Describe your symptoms to begin"),
            api_base,
            diseases: DiseasePanel::Hidden,
            disease_cache: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert!(app.ui.is_idle());
        assert_eq!(app.input.char_count(), 0);
        assert_eq!(app.diseases, DiseasePanel::Hidden);
    }

    #[test]
    fn test_network_errors_point_at_the_service() {
        let view = ErrorView::classify(
            &AnalysisError::Network("connection refused".to_string()),
            "http://localhost:5001/api",
        );
        assert_eq!(view.kind, ErrorKind::NetworkFailure);
        assert!(view.message.contains("http://localhost:5001/api"));
    }

    #[test]
    fn test_model_messages_are_model_unavailable() {
        let err = AnalysisError::Api {
            status: 503,
            message: "Model not found. Please train the model first.".to_string(),
        };
        assert_eq!(ErrorView::classify(&err, "x").kind, ErrorKind::ModelUnavailable);
    }

    #[test]
    fn test_other_api_messages_are_shown_verbatim() {
        let err = AnalysisError::Api {
            status: 500,
            message: "model missing".to_string(),
        };
        let view = ErrorView::classify(&err, "x");
        assert_eq!(view.kind, ErrorKind::AnalysisFailed);
        assert_eq!(view.message, "model missing");

        let err = AnalysisError::Api {
            status: 500,
            message: "Server error: 500".to_string(),
        };
        assert_eq!(ErrorView::classify(&err, "x").message, "Server error: 500");
    }

    #[test]
    fn test_parse_errors_are_analysis_failures() {
        let err = AnalysisError::Parse("expected value at line 1".to_string());
        assert_eq!(ErrorView::classify(&err, "x").kind, ErrorKind::AnalysisFailed);
    }
}
