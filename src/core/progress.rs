//! # Staged Progress
//!
//! Cosmetic loading feedback. The three stages advance on a fixed clock
//! (+900ms, +1800ms) and have nothing to do with how far the real request
//! has got. The timer is cancelled as soon as the request completes.

use std::sync::mpsc;
use std::time::Duration;

use log::debug;
use tokio::task::AbortHandle;

use crate::core::action::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Extracting,
    Classifying,
    Reporting,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Extracting, Stage::Classifying, Stage::Reporting];

    /// 1-based position shown in the step indicator.
    pub fn number(self) -> u8 {
        match self {
            Stage::Extracting => 1,
            Stage::Classifying => 2,
            Stage::Reporting => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Extracting => "Extracting symptoms from your description...",
            Stage::Classifying => "Running ML classification model...",
            Stage::Reporting => "Generating detailed report...",
        }
    }

    pub fn step_name(self) -> &'static str {
        match self {
            Stage::Extracting => "Extract",
            Stage::Classifying => "Classify",
            Stage::Reporting => "Report",
        }
    }

    /// Offset from submission at which this stage becomes active.
    pub fn delay(self) -> Duration {
        match self {
            Stage::Extracting => Duration::ZERO,
            Stage::Classifying => Duration::from_millis(900),
            Stage::Reporting => Duration::from_millis(1800),
        }
    }
}

/// Handle to the scheduled stage updates. Cancelling is idempotent: a timer
/// that already fired or was already cancelled is left alone.
#[derive(Debug, Default)]
pub struct ProgressTimer {
    handle: Option<AbortHandle>,
}

impl ProgressTimer {
    /// Schedule `AdvanceStage` for every stage after the first.
    /// Must be called from inside a tokio runtime.
    pub fn start(tx: mpsc::Sender<Action>) -> Self {
        let task = tokio::spawn(async move {
            let started = tokio::time::Instant::now();
            for stage in Stage::ALL.into_iter().skip(1) {
                tokio::time::sleep_until(started + stage.delay()).await;
                debug!("Progress stage {} reached", stage.number());
                if tx.send(Action::AdvanceStage(stage)).is_err() {
                    return;
                }
            }
        });
        Self {
            handle: Some(task.abort_handle()),
        }
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Progress timer cancelled");
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for ProgressTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
