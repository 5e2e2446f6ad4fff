//! # Request Orchestrator
//!
//! Runs `update()` and performs the `Effect` it returns: spawning the
//! analysis request, the cosmetic progress timer, the input-flag timer,
//! the history write, and the catalogue fetch.
//!
//! Background tasks report back by sending `Action`s over the mpsc channel
//! the UI loop drains. Only the UI loop touches `App`.
//!
//! ```text
//!   UI event ─► dispatch() ─► update() ─► Effect ─► perform()
//!                  ▲                                   │
//!                  └──────── Action (mpsc) ◄── tokio tasks
//! ```

use std::sync::{Arc, mpsc};

use log::{info, warn};
use tokio::task::JoinHandle;

use crate::analysis::{AnalysisBoundary, AnalysisRequest};
use crate::core::action::{Action, Effect, update};
use crate::core::history;
use crate::core::input::INPUT_FLAG_DURATION;
use crate::core::progress::ProgressTimer;
use crate::core::state::App;
use crate::store::SessionStore;

pub struct Orchestrator {
    boundary: Arc<dyn AnalysisBoundary>,
    store: Arc<dyn SessionStore>,
    tx: mpsc::Sender<Action>,
    progress: ProgressTimer,
}

impl Orchestrator {
    pub fn new(
        boundary: Arc<dyn AnalysisBoundary>,
        store: Arc<dyn SessionStore>,
        tx: mpsc::Sender<Action>,
    ) -> Self {
        Self {
            boundary,
            store,
            tx,
            progress: ProgressTimer::default(),
        }
    }

    /// Apply `action`, perform its effect, and hand the effect back so the
    /// UI can react to presentation-only effects (quit, scroll).
    pub fn dispatch(&mut self, app: &mut App, action: Action) -> Effect {
        let effect = update(app, action);

        // Stage text must never outlive a result or error.
        if !app.ui.is_loading() {
            self.progress.cancel();
        }

        self.perform(&effect);
        effect
    }

    fn perform(&mut self, effect: &Effect) {
        match effect {
            Effect::StartAnalysis(request) => {
                self.progress.cancel();
                self.progress = ProgressTimer::start(self.tx.clone());
                spawn_analysis(self.boundary.clone(), request.clone(), self.tx.clone());
            }
            Effect::ScheduleFlagClear(token) => {
                schedule_flag_clear(*token, self.tx.clone());
            }
            Effect::RecordHistory { request, outcome } => {
                // Detached: never awaited on the completion path
                let _ = history::record(self.store.clone(), request.clone(), outcome.clone());
            }
            Effect::FetchDiseases => spawn_disease_fetch(self.boundary.clone(), self.tx.clone()),
            Effect::None | Effect::Quit | Effect::ScrollToTop => {}
        }
    }

    /// Ping `GET /health` once and report it to the status bar.
    pub fn check_health(&self) {
        let boundary = self.boundary.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = boundary.health().await;
            if tx.send(Action::HealthChecked(result)).is_err() {
                warn!("Failed to send health result: receiver dropped");
            }
        });
    }

    pub fn progress_active(&self) -> bool {
        self.progress.is_active()
    }
}

/// Issue the analysis request on its own task and report the outcome.
pub fn spawn_analysis(
    boundary: Arc<dyn AnalysisBoundary>,
    request: AnalysisRequest,
    tx: mpsc::Sender<Action>,
) -> JoinHandle<()> {
    info!("Spawning analysis request to {}", boundary.endpoint());
    tokio::spawn(async move {
        let started = std::time::Instant::now();
        let action = match boundary.analyze(&request).await {
            Ok(outcome) => Action::AnalysisSucceeded(Arc::new(outcome)),
            Err(e) => Action::AnalysisFailed(e),
        };
        info!(
            "Analysis request finished in {}ms",
            started.elapsed().as_millis()
        );
        if tx.send(action).is_err() {
            warn!("Failed to send analysis result: receiver dropped");
        }
    })
}

fn spawn_disease_fetch(boundary: Arc<dyn AnalysisBoundary>, tx: mpsc::Sender<Action>) {
    tokio::spawn(async move {
        let result = boundary.diseases().await;
        if tx.send(Action::DiseasesLoaded(result)).is_err() {
            warn!("Failed to send disease catalogue: receiver dropped");
        }
    });
}

fn schedule_flag_clear(token: u64, tx: mpsc::Sender<Action>) {
    tokio::spawn(async move {
        tokio::time::sleep(INPUT_FLAG_DURATION).await;
        let _ = tx.send(Action::ClearInputFlag(token));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisError, AnalysisOutcome, DiseaseEntry, HealthStatus};
    use crate::core::input::Edit;
    use crate::core::progress::Stage;
    use crate::core::state::UiState;
    use crate::test_support::{RecordingStore, sample_outcome, test_app};
    use async_trait::async_trait;
    use std::time::Duration;

    /// Boundary that answers after a fixed (virtual) delay.
    struct DelayedBoundary {
        delay: Duration,
        result: Result<AnalysisOutcome, AnalysisError>,
    }

    #[async_trait]
    impl AnalysisBoundary for DelayedBoundary {
        fn endpoint(&self) -> &str {
            "http://stub"
        }

        async fn analyze(&self, _request: &AnalysisRequest) -> Result<AnalysisOutcome, AnalysisError> {
            tokio::time::sleep(self.delay).await;
            self.result.clone()
        }

        async fn health(&self) -> Result<HealthStatus, AnalysisError> {
            Ok(HealthStatus::default())
        }

        async fn diseases(&self) -> Result<Vec<DiseaseEntry>, AnalysisError> {
            Ok(Vec::new())
        }
    }

    fn orchestrator(
        delay: Duration,
        result: Result<AnalysisOutcome, AnalysisError>,
        store: Arc<dyn SessionStore>,
    ) -> (Orchestrator, mpsc::Receiver<Action>) {
        let (tx, rx) = mpsc::channel();
        let boundary = Arc::new(DelayedBoundary { delay, result });
        (Orchestrator::new(boundary, store, tx), rx)
    }

    /// Advance virtual time in small steps, feeding every received action
    /// back through the orchestrator, until `done` holds.
    async fn pump(
        orch: &mut Orchestrator,
        app: &mut App,
        rx: &mpsc::Receiver<Action>,
        done: impl Fn(&App) -> bool,
    ) {
        for _ in 0..500 {
            while let Ok(action) = rx.try_recv() {
                orch.dispatch(app, action);
            }
            if done(app) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached");
    }

    fn submit(orch: &mut Orchestrator, app: &mut App, text: &str) {
        orch.dispatch(app, Action::Edit(Edit::Paste(text.to_string())));
        orch.dispatch(app, Action::Submit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_response_cancels_progress_before_stage_two() {
        let store = Arc::new(RecordingStore::signed_out());
        let (mut orch, rx) = orchestrator(Duration::from_millis(200), Ok(sample_outcome()), store);
        let mut app = test_app();

        submit(&mut orch, &mut app, "chest pain");
        assert!(orch.progress_active());

        pump(&mut orch, &mut app, &rx, |a| matches!(a.ui, UiState::Results(_))).await;
        assert!(!orch.progress_active());

        // Past both stage deadlines: nothing stale arrives
        tokio::time::sleep(Duration::from_secs(3)).await;
        while let Ok(action) = rx.try_recv() {
            assert!(!matches!(action, Action::AdvanceStage(_)), "stale stage: {:?}", action);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_response_walks_through_all_stages() {
        let store = Arc::new(RecordingStore::signed_out());
        let (mut orch, rx) = orchestrator(Duration::from_secs(5), Ok(sample_outcome()), store);
        let mut app = test_app();

        submit(&mut orch, &mut app, "chest pain");
        pump(&mut orch, &mut app, &rx, |a| {
            matches!(a.ui, UiState::Loading { stage: Stage::Reporting, .. })
        })
        .await;
        pump(&mut orch, &mut app, &rx, |a| matches!(a.ui, UiState::Results(_))).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_lands_on_error_screen() {
        let store = Arc::new(RecordingStore::signed_in("user-1"));
        let (mut orch, rx) = orchestrator(
            Duration::from_millis(50),
            Err(AnalysisError::Network("connection refused".to_string())),
            store.clone(),
        );
        let mut app = test_app();

        submit(&mut orch, &mut app, "chest pain");
        pump(&mut orch, &mut app, &rx, |a| matches!(a.ui, UiState::Error(_))).await;
        assert!(!orch.progress_active());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(store.rows().is_empty(), "failed analyses are never persisted");
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_with_session_persists_in_background() {
        let store = Arc::new(RecordingStore::signed_in("user-1"));
        let (mut orch, rx) = orchestrator(Duration::from_millis(50), Ok(sample_outcome()), store.clone());
        let mut app = test_app();

        submit(&mut orch, &mut app, "chest pain");
        pump(&mut orch, &mut app, &rx, |a| matches!(a.ui, UiState::Results(_))).await;

        for _ in 0..100 {
            if !store.rows().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(store.rows().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_submit_flag_clears_after_two_seconds() {
        let store = Arc::new(RecordingStore::signed_out());
        let (mut orch, rx) = orchestrator(Duration::ZERO, Ok(sample_outcome()), store);
        let mut app = test_app();

        orch.dispatch(&mut app, Action::Submit);
        assert!(app.input.is_flagged());

        tokio::time::sleep(Duration::from_millis(1900)).await;
        while let Ok(action) = rx.try_recv() {
            orch.dispatch(&mut app, action);
        }
        assert!(app.input.is_flagged());

        pump(&mut orch, &mut app, &rx, |a| !a.input.is_flagged()).await;
    }
}
