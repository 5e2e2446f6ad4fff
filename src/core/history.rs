//! # History Writer
//!
//! Best-effort persistence of completed analyses to the `analyses` table.
//! Runs on a detached task: the caller never waits for it, and nothing it
//! does (no session, auth failure, write failure) is ever shown to the user.

use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::analysis::{AnalysisOutcome, AnalysisRequest};
use crate::store::{Session, SessionStore, StoreError};

pub const ANALYSES_TABLE: &str = "analyses";

/// One row of the `analyses` table.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub user_id: String,
    pub prompt: String,
    pub disease: Option<String>,
    pub risk_level: Option<String>,
    pub confidence: Option<f64>,
    pub is_emergency: bool,
    /// The response body exactly as received.
    pub full_result: serde_json::Value,
}

impl HistoryRecord {
    pub fn new(session: &Session, request: &AnalysisRequest, outcome: &AnalysisOutcome) -> Self {
        let result = &outcome.result;
        Self {
            user_id: session.user_id.clone(),
            prompt: request.prompt.clone(),
            disease: result.predicted_disease.clone(),
            risk_level: result.risk_level.clone(),
            confidence: result.confidence,
            is_emergency: result.is_emergency,
            full_result: outcome.raw.clone(),
        }
    }
}

/// Write one history row if there is a signed-in session.
///
/// Returns `Ok(false)` when skipped for lack of a session.
pub async fn write(
    store: &dyn SessionStore,
    request: &AnalysisRequest,
    outcome: &AnalysisOutcome,
) -> Result<bool, StoreError> {
    let Some(session) = store.get_session().await? else {
        debug!("No active session, history not saved");
        return Ok(false);
    };

    let record = HistoryRecord::new(&session, request, outcome);
    let row = serde_json::to_value(&record).map_err(|e| StoreError::Parse(e.to_string()))?;
    store.insert(ANALYSES_TABLE, &row).await?;
    Ok(true)
}

/// Spawn [`write`] on a detached task; failures are logged and dropped.
///
/// The handle is returned for tests; production callers drop it.
pub fn record(
    store: Arc<dyn SessionStore>,
    request: AnalysisRequest,
    outcome: Arc<AnalysisOutcome>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match write(store.as_ref(), &request, &outcome).await {
            Ok(true) => info!("Analysis saved to history"),
            Ok(false) => {}
            Err(e) => warn!("Could not save history: {}", e),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingStore, sample_outcome};

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            prompt: "chest pain".to_string(),
        }
    }

    #[tokio::test]
    async fn test_no_session_writes_nothing() {
        let store = RecordingStore::signed_out();
        let written = write(&store, &request(), &sample_outcome()).await.unwrap();
        assert!(!written);
        assert!(store.rows().is_empty());
    }

    #[tokio::test]
    async fn test_session_writes_one_row_with_full_result() {
        let store = RecordingStore::signed_in("user-42");
        let outcome = sample_outcome();
        let written = write(&store, &request(), &outcome).await.unwrap();
        assert!(written);

        let rows = store.rows();
        assert_eq!(rows.len(), 1);
        let (table, row) = &rows[0];
        assert_eq!(table, ANALYSES_TABLE);
        assert_eq!(row["user_id"], "user-42");
        assert_eq!(row["prompt"], "chest pain");
        assert_eq!(row["disease"], "Heart attack");
        assert_eq!(row["risk_level"], "HIGH");
        assert_eq!(row["is_emergency"], true);
        assert_eq!(row["full_result"], outcome.raw);
    }

    #[tokio::test]
    async fn test_insert_failure_is_reported_to_caller() {
        let store = RecordingStore::failing("user-42");
        let err = write(&store, &request(), &sample_outcome()).await.unwrap_err();
        assert!(matches!(err, StoreError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_record_swallows_failures() {
        let store: Arc<dyn SessionStore> = Arc::new(RecordingStore::failing("user-42"));
        let handle = record(store, request(), Arc::new(sample_outcome()));
        // The task completes normally even though the insert failed
        tokio_test::assert_ok!(handle.await);
    }
}
