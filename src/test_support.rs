//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::analysis::AnalysisOutcome;
use crate::core::state::App;
use crate::store::{Session, SessionStore, StoreError};

/// Creates a test App pointed at an address nothing listens on.
pub fn test_app() -> App {
    App::new("http://127.0.0.1:9/api".to_string())
}

/// A realistic emergency payload with `confidence = 0.8675`.
pub fn sample_outcome() -> AnalysisOutcome {
    AnalysisOutcome::from_value(json!({
        "predicted_disease": "Heart attack",
        "confidence": 0.8675,
        "confidence_label": "Very High",
        "risk_level": "HIGH",
        "is_emergency": true,
        "severity_score": 6.5,
        "symptoms_detected": ["chest_pain", "breathlessness", "dizziness"],
        "precautions": ["call ambulance", "chew or swallow aspirin", "keep calm"],
        "top_predictions": [
            {"disease": "Heart attack", "probability": 0.8675},
            {"disease": "GERD", "probability": 0.0712},
            {"disease": "Hypertension", "probability": 0.0301}
        ],
        "detailed_analysis": "## Analysis Report\n**Most Likely Condition:** Heart attack\n### Recommended Precautions\n1. Call ambulance\n---\n*Disclaimer*"
    }))
    .expect("fixture is a valid outcome")
}

/// In-memory store that records inserted rows.
pub struct RecordingStore {
    session: Option<Session>,
    fail_inserts: bool,
    rows: Mutex<Vec<(String, serde_json::Value)>>,
}

impl RecordingStore {
    pub fn signed_out() -> Self {
        Self {
            session: None,
            fail_inserts: false,
            rows: Mutex::new(Vec::new()),
        }
    }

    pub fn signed_in(user_id: &str) -> Self {
        Self {
            session: Some(Session {
                user_id: user_id.to_string(),
                access_token: "token".to_string(),
            }),
            ..Self::signed_out()
        }
    }

    pub fn failing(user_id: &str) -> Self {
        Self {
            fail_inserts: true,
            ..Self::signed_in(user_id)
        }
    }

    pub fn rows(&self) -> Vec<(String, serde_json::Value)> {
        self.rows.lock().expect("rows lock").clone()
    }
}

#[async_trait]
impl SessionStore for RecordingStore {
    async fn get_session(&self) -> Result<Option<Session>, StoreError> {
        Ok(self.session.clone())
    }

    async fn insert(&self, table: &str, record: &serde_json::Value) -> Result<(), StoreError> {
        if self.fail_inserts {
            return Err(StoreError::Api {
                status: 500,
                message: "insert rejected".to_string(),
            });
        }
        self.rows
            .lock()
            .expect("rows lock")
            .push((table.to_string(), record.clone()));
        Ok(())
    }
}
