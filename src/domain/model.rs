use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rendered request ready to leave the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub requester: String,
    pub text: String,
    pub service_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// 模擬送出完成
    Accepted,
    /// Link handed to the messaging client; whether it was actually sent is unknown.
    HandedOff { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub outcome: DeliveryOutcome,
    pub submitted_at: DateTime<Utc>,
}

impl DeliveryReceipt {
    pub fn new(outcome: DeliveryOutcome) -> Self {
        Self {
            outcome,
            submitted_at: Utc::now(),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self.outcome, DeliveryOutcome::Accepted)
    }
}
