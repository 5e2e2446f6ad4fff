//! Submit-to-history flow against mocked analysis and store services.

use std::sync::{Arc, mpsc};
use std::time::Duration;

use serde_json::json;
use triage::analysis::{AnalysisBoundary, HttpAnalysisClient};
use triage::core::action::{Action, Effect};
use triage::core::input::Edit;
use triage::core::orchestrator::Orchestrator;
use triage::core::state::{App, ErrorKind, UiState};
use triage::store::{NoStore, SessionStore, SupabaseStore};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn boundary_for(server: &MockServer) -> Arc<dyn AnalysisBoundary> {
    Arc::new(
        HttpAnalysisClient::new(format!("{}/api", server.uri()), Some(Duration::from_secs(5)))
            .expect("client should build"),
    )
}

async fn mount_analysis(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "risk_level": "Medium",
            "is_emergency": false,
            "predicted_disease": "Migraine",
            "confidence": 0.72,
            "confidence_label": "Moderate",
            "symptoms_detected": ["headache", "nausea"],
            "top_predictions": [{"disease": "Migraine", "probability": 0.72}],
            "precautions": ["rest in a dark room"],
            "detailed_analysis": "## Analysis Report"
        })))
        .mount(server)
        .await;
}

/// Wait for the background task that answers the analysis, dispatching
/// any progress ticks that arrive first.
async fn settle(orchestrator: &mut Orchestrator, app: &mut App, rx: &mpsc::Receiver<Action>) -> Effect {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        match rx.try_recv() {
            Ok(action @ (Action::AnalysisSucceeded(_) | Action::AnalysisFailed(_))) => {
                return orchestrator.dispatch(app, action);
            }
            Ok(other) => {
                orchestrator.dispatch(app, other);
            }
            Err(_) => {
                assert!(tokio::time::Instant::now() < deadline, "no analysis result arrived");
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }
    }
}

async fn wait_for_request(server: &MockServer, request_path: &str) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let seen = server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .any(|r| r.url.path() == request_path);
        if seen {
            return;
        }
        assert!(tokio::time::Instant::now() < deadline, "{request_path} never called");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

fn submit(orchestrator: &mut Orchestrator, app: &mut App, prompt: &str) {
    orchestrator.dispatch(app, Action::Edit(Edit::Paste(prompt.to_string())));
    let effect = orchestrator.dispatch(app, Action::Submit);
    assert!(matches!(effect, Effect::StartAnalysis(_)));
    assert!(app.ui.is_loading());
}

// ============================================================================
// Flow Tests
// ============================================================================

#[tokio::test]
async fn test_signed_in_analysis_is_saved_to_history() {
    let service = MockServer::start().await;
    let store_server = MockServer::start().await;
    mount_analysis(&service).await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "user-9"})))
        .mount(&store_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/analyses"))
        .and(body_partial_json(json!({
            "user_id": "user-9",
            "prompt": "headache and nausea",
            "disease": "Migraine",
            "risk_level": "Medium",
            "is_emergency": false
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&store_server)
        .await;

    let store: Arc<dyn SessionStore> = Arc::new(SupabaseStore::new(
        store_server.uri(),
        "anon".to_string(),
        Some("token".to_string()),
    ));
    let (tx, rx) = mpsc::channel();
    let mut orchestrator = Orchestrator::new(boundary_for(&service), store, tx);
    let mut app = App::new(format!("{}/api", service.uri()));

    submit(&mut orchestrator, &mut app, "  headache and nausea  ");
    let effect = settle(&mut orchestrator, &mut app, &rx).await;

    assert!(matches!(effect, Effect::RecordHistory { .. }));
    let UiState::Results(rendered) = &app.ui else {
        panic!("expected results, got {:?}", app.ui);
    };
    assert_eq!(rendered.view.disease.name, "Migraine");
    assert_eq!(rendered.view.confidence.percent, 72);
    assert!(!orchestrator.progress_active());

    wait_for_request(&store_server, "/rest/v1/analyses").await;
}

#[tokio::test]
async fn test_signed_out_analysis_writes_nothing() {
    let service = MockServer::start().await;
    let store_server = MockServer::start().await;
    mount_analysis(&service).await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&store_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/analyses"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&store_server)
        .await;

    let store: Arc<dyn SessionStore> = Arc::new(SupabaseStore::new(
        store_server.uri(),
        "anon".to_string(),
        Some("expired".to_string()),
    ));
    let (tx, rx) = mpsc::channel();
    let mut orchestrator = Orchestrator::new(boundary_for(&service), store, tx);
    let mut app = App::new(format!("{}/api", service.uri()));

    submit(&mut orchestrator, &mut app, "headache");
    settle(&mut orchestrator, &mut app, &rx).await;
    assert!(matches!(app.ui, UiState::Results(_)));

    wait_for_request(&store_server, "/auth/v1/user").await;
    // Give a stray insert time to show up before expectations are checked
    tokio::time::sleep(Duration::from_millis(100)).await;
}

#[tokio::test]
async fn test_service_error_shows_error_screen() {
    let service = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "Model not loaded"})))
        .mount(&service)
        .await;

    let (tx, rx) = mpsc::channel();
    let mut orchestrator = Orchestrator::new(boundary_for(&service), Arc::new(NoStore), tx);
    let mut app = App::new(format!("{}/api", service.uri()));

    submit(&mut orchestrator, &mut app, "fever");
    let effect = settle(&mut orchestrator, &mut app, &rx).await;

    assert_eq!(effect, Effect::None);
    let UiState::Error(error) = &app.ui else {
        panic!("expected error, got {:?}", app.ui);
    };
    assert_eq!(error.kind, ErrorKind::ModelUnavailable);
    assert!(!orchestrator.progress_active());
}
