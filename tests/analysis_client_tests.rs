use std::time::Duration;

use serde_json::json;
use triage::analysis::{AnalysisBoundary, AnalysisError, AnalysisRequest, HttpAnalysisClient};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn client_for(server: &MockServer) -> HttpAnalysisClient {
    HttpAnalysisClient::new(format!("{}/api", server.uri()), Some(Duration::from_secs(5)))
        .expect("client should build")
}

fn request(prompt: &str) -> AnalysisRequest {
    AnalysisRequest {
        prompt: prompt.to_string(),
    }
}

fn analysis_body() -> serde_json::Value {
    json!({
        "success": true,
        "risk_level": "HIGH",
        "is_emergency": true,
        "predicted_disease": "Heart attack",
        "severity_score": 6.5,
        "confidence": 0.8675,
        "confidence_label": "High",
        "symptoms_detected": ["chest_pain", "sweating"],
        "top_predictions": [
            {"disease": "Heart attack", "probability": 0.8675},
            {"disease": "GERD", "probability": 0.0712}
        ],
        "precautions": ["call ambulance", "chew aspirin"],
        "detailed_analysis": "## Analysis Report\n**Most Likely Condition:** Heart attack",
        "model_version": "2.1"
    })
}

// ============================================================================
// Analyze
// ============================================================================

#[tokio::test]
async fn test_analyze_posts_prompt_and_parses_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .and(body_json(json!({"prompt": "chest pain and sweating"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(analysis_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let outcome = client
        .analyze(&request("chest pain and sweating"))
        .await
        .expect("analysis should succeed");

    assert_eq!(outcome.result.predicted_disease.as_deref(), Some("Heart attack"));
    assert_eq!(outcome.result.risk_level.as_deref(), Some("HIGH"));
    assert!(outcome.result.is_emergency);
    assert_eq!(outcome.result.top_predictions.len(), 2);
    assert_eq!(outcome.result.precautions[0], "call ambulance");
    // Fields the client doesn't model survive in the raw payload
    assert_eq!(outcome.raw["model_version"], "2.1");
}

#[tokio::test]
async fn test_analyze_tolerates_missing_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "predicted_disease": "Common Cold",
            "symptoms_detected": null
        })))
        .mount(&mock_server)
        .await;

    let outcome = client_for(&mock_server)
        .analyze(&request("sneezing"))
        .await
        .expect("sparse result should still parse");

    assert!(outcome.result.symptoms_detected.is_empty());
    assert!(outcome.result.top_predictions.is_empty());
    assert_eq!(outcome.result.confidence, None);
    assert!(!outcome.result.is_emergency);
}

#[tokio::test]
async fn test_analyze_error_body_message_is_surfaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "model missing"})))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .analyze(&request("fever"))
        .await
        .expect_err("500 should fail");

    assert_eq!(
        err,
        AnalysisError::Api {
            status: 500,
            message: "model missing".to_string()
        }
    );
    assert_eq!(err.user_message(), "model missing");
}

#[tokio::test]
async fn test_analyze_unparsable_error_body_falls_back_to_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .analyze(&request("fever"))
        .await
        .expect_err("500 should fail");

    assert_eq!(err.user_message(), "Server error: 500");
}

#[tokio::test]
async fn test_analyze_malformed_success_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .analyze(&request("fever"))
        .await
        .expect_err("garbage should fail");

    assert!(matches!(err, AnalysisError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_analyze_unreachable_service_is_network_error() {
    // Nothing listens on the discard port
    let client = HttpAnalysisClient::new("http://127.0.0.1:9/api", Some(Duration::from_secs(2)))
        .expect("client should build");

    let err = client
        .analyze(&request("fever"))
        .await
        .expect_err("connection should be refused");

    assert!(matches!(err, AnalysisError::Network(_)), "got {err:?}");
}

// ============================================================================
// Health and catalogue
// ============================================================================

#[tokio::test]
async fn test_health_reports_service_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "service": "symptom-analyzer",
            "version": "2.1"
        })))
        .mount(&mock_server)
        .await;

    let health = client_for(&mock_server).health().await.expect("health should succeed");
    assert!(health.is_ok());
    assert_eq!(health.service, "symptom-analyzer");
}

#[tokio::test]
async fn test_diseases_lists_catalogue() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/diseases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "diseases": [
                {"name": "Malaria", "risk_level": "High", "is_emergency": false},
                {"name": "Heart attack", "risk_level": "Critical", "is_emergency": true}
            ],
            "count": 2
        })))
        .mount(&mock_server)
        .await;

    let diseases = client_for(&mock_server)
        .diseases()
        .await
        .expect("catalogue should load");

    assert_eq!(diseases.len(), 2);
    assert_eq!(diseases[1].name, "Heart attack");
    assert!(diseases[1].is_emergency);
}

#[tokio::test]
async fn test_diseases_error_is_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/diseases"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"error": "Model not loaded"})))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .diseases()
        .await
        .expect_err("503 should fail");
    assert_eq!(err.user_message(), "Model not loaded");
}
