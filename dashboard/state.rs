use std::sync::{Arc, Mutex};

use irisnet::{DashboardFrame, EpochMetrics};

// ---------------------------------------------------------------------------
// Run status
// ---------------------------------------------------------------------------

pub enum RunStatus {
    /// Training is running on the worker thread.
    Running,
    /// Training finished every epoch.
    Done {
        final_metrics:    Option<EpochMetrics>,
        elapsed_total_ms: u64,
    },
    /// Loading, preprocessing or training failed; the run is over.
    Failed {
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Main state struct
// ---------------------------------------------------------------------------

pub struct DashboardState {
    /// Every frame produced so far, so late subscribers can catch up.
    pub frames:       Vec<DashboardFrame>,
    pub status:       RunStatus,
    pub total_epochs: usize,
}

impl DashboardState {
    pub fn new(total_epochs: usize) -> Self {
        DashboardState {
            frames: Vec::new(),
            status: RunStatus::Running,
            total_epochs,
        }
    }

    /// SSE payload announcing how the run ended, or `None` while running.
    pub fn final_event(&self) -> Option<(&'static str, String)> {
        match &self.status {
            RunStatus::Running => None,
            RunStatus::Done { final_metrics, elapsed_total_ms } => {
                let json = serde_json::json!({
                    "elapsed_total_ms": elapsed_total_ms,
                    "final_metrics": final_metrics,
                });
                Some(("done", json.to_string()))
            }
            RunStatus::Failed { reason } => {
                let json = serde_json::json!({ "reason": reason });
                Some(("failed", json.to_string()))
            }
        }
    }
}

/// Shared state type — an `Arc<Mutex<DashboardState>>` passed to every handler.
pub type SharedState = Arc<Mutex<DashboardState>>;
