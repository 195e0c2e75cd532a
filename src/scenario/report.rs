//! Result of a successful smoke run.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Step;

/// Status and latency observed for one step
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step: Step,
    pub method: String,
    pub status: u16,
    pub elapsed_ms: u64,
}

/// What a passing run created and observed
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub base_url: String,
    pub username: String,
    pub community_id: String,
    pub channel_id: String,
    /// Id returned by the send-message call
    pub sent_message_id: String,
    /// Id taken from the first listed message; used for reaction, fetch and delete
    pub message_id: String,
    pub messages_listed: usize,
    pub communities_listed: usize,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub steps: Vec<StepOutcome>,
}

impl RunReport {
    pub fn passed_steps(&self) -> usize {
        self.steps.len()
    }

    /// Whether the listed message is the one this run sent
    pub fn message_ids_agree(&self) -> bool {
        self.sent_message_id == self.message_id
    }

    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.steps.iter().find(|outcome| outcome.step == step)
    }
}
