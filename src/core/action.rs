//! # Actions
//!
//! Everything that can happen in Triage becomes an `Action`.
//! User presses Enter? That's `Action::Submit`.
//! The service answers? That's `Action::AnalysisSucceeded(outcome)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing any I/O the caller must
//! perform. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use std::sync::Arc;

use log::{debug, info, warn};

use crate::analysis::{AnalysisError, AnalysisOutcome, AnalysisRequest, DiseaseEntry, HealthStatus};
use crate::core::input::{self, Edit, Sample};
use crate::core::progress::Stage;
use crate::core::state::{App, DiseasePanel, ErrorView, Rendered, UiState};
use crate::render::ResultView;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Edit(Edit),
    SelectSample(Sample),
    Submit,
    ClearInputFlag(u64),
    AdvanceStage(Stage),
    AnalysisSucceeded(Arc<AnalysisOutcome>),
    AnalysisFailed(AnalysisError),
    Reset,
    HealthChecked(Result<HealthStatus, AnalysisError>),
    ToggleDiseases,
    DiseasesLoaded(Result<Vec<DiseaseEntry>, AnalysisError>),
    Quit,
}

/// I/O requested by `update`, performed by the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    /// Send the request and start the staged-progress timer.
    StartAnalysis(AnalysisRequest),
    /// Clear the input flag with this token after `INPUT_FLAG_DURATION`.
    ScheduleFlagClear(u64),
    /// Persist a completed analysis without waiting for it.
    RecordHistory {
        request: AnalysisRequest,
        outcome: Arc<AnalysisOutcome>,
    },
    FetchDiseases,
    ScrollToTop,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Edit(edit) => {
            if app.ui.is_idle() {
                app.input.apply(edit);
            }
            Effect::None
        }
        Action::SelectSample(sample) => {
            if app.ui.is_idle() {
                app.input.select_sample(sample);
                app.status_message = format!("Example: {}", sample.label());
            }
            Effect::None
        }
        Action::Submit => {
            if !app.ui.is_idle() {
                debug!("Submit ignored outside the input screen");
                return Effect::None;
            }
            match input::submit(&app.input.text) {
                Ok(request) => {
                    info!("Submitting analysis (prompt_len={})", request.prompt.len());
                    app.input.flag = None;
                    app.diseases = DiseasePanel::Hidden;
                    app.status_message = String::from("Analyzing...");
                    app.ui = UiState::Loading {
                        stage: Stage::Extracting,
                        request: request.clone(),
                    };
                    Effect::StartAnalysis(request)
                }
                Err(e) => {
                    app.status_message = capitalize_first(&e.to_string());
                    Effect::ScheduleFlagClear(app.input.raise_flag())
                }
            }
        }
        Action::ClearInputFlag(token) => {
            app.input.clear_flag(token);
            Effect::None
        }
        Action::AdvanceStage(next) => {
            match &mut app.ui {
                UiState::Loading { stage, .. } if next > *stage => *stage = next,
                _ => debug!("Stale stage update ignored: {:?}", next),
            }
            Effect::None
        }
        Action::AnalysisSucceeded(outcome) => {
            let UiState::Loading { request, .. } = &app.ui else {
                warn!("Analysis result arrived outside Loading, dropped");
                return Effect::None;
            };
            let request = request.clone();
            let view = ResultView::project(&outcome.result);
            let rendered = Rendered {
                id: uuid::Uuid::new_v4().to_string(),
                request: request.clone(),
                outcome: outcome.clone(),
                view,
            };
            info!("Analysis {} complete", rendered.id);
            app.status_message = String::from("Analysis complete");
            app.ui = UiState::Results(Box::new(rendered));
            Effect::RecordHistory { request, outcome }
        }
        Action::AnalysisFailed(err) => {
            if !app.ui.is_loading() {
                warn!("Analysis error arrived outside Loading, dropped: {}", err);
                return Effect::None;
            }
            warn!("Analysis failed: {}", err);
            app.status_message = String::from("Analysis failed");
            app.ui = UiState::Error(ErrorView::classify(&err, &app.api_base));
            Effect::None
        }
        Action::Reset => {
            if !matches!(app.ui, UiState::Results(_) | UiState::Error(_)) {
                return Effect::None;
            }
            app.ui = UiState::Idle;
            app.input.clear();
            app.status_message = String::from("Describe your symptoms to begin");
            Effect::ScrollToTop
        }
        Action::HealthChecked(result) => {
            // Only the idle screen's status line is free; elsewhere it reports the request
            if !app.ui.is_idle() || app.input.is_flagged() {
                debug!("Health result not shown over current status: {:?}", result);
                return Effect::None;
            }
            app.status_message = match result {
                Ok(health) if health.is_ok() => {
                    if health.version.is_empty() {
                        format!("{} online", service_name(&health))
                    } else {
                        format!("{} v{} online", service_name(&health), health.version)
                    }
                }
                Ok(health) => format!("Service reports status '{}'", health.status),
                Err(e) => {
                    warn!("Health check failed: {}", e);
                    String::from("Analysis service unreachable")
                }
            };
            Effect::None
        }
        Action::ToggleDiseases => {
            if !matches!(app.diseases, DiseasePanel::Hidden) {
                app.diseases = DiseasePanel::Hidden;
                return Effect::None;
            }
            if !app.ui.is_idle() {
                return Effect::None;
            }
            match &app.disease_cache {
                Some(list) => {
                    app.diseases = DiseasePanel::Shown(list.clone());
                    Effect::None
                }
                None => {
                    app.diseases = DiseasePanel::Loading;
                    Effect::FetchDiseases
                }
            }
        }
        Action::DiseasesLoaded(result) => {
            match result {
                Ok(list) => {
                    app.disease_cache = Some(list.clone());
                    if app.diseases == DiseasePanel::Loading {
                        app.diseases = DiseasePanel::Shown(list);
                    }
                }
                Err(e) => {
                    warn!("Disease catalogue failed: {}", e);
                    if app.diseases == DiseasePanel::Loading {
                        app.diseases = DiseasePanel::Failed(e.user_message().to_string());
                    }
                }
            }
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn service_name(health: &HealthStatus) -> &str {
    if health.service.is_empty() {
        "Analysis service"
    } else {
        &health.service
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
