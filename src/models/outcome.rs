use std::fmt::{Display, Formatter, Result};

use serde::Serialize;
use uuid::Uuid;

/// The single terminal value produced for every inbound event. Rejections
/// and skips are distinguished from technical failures so operators can
/// tell "correctly ignored" from "broken".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase", tag = "outcome")]
pub enum EventOutcome {
    Delivered { contact_moment_id: Option<Uuid> },
    Rejected { reason: String },
    Failed { reason: String },
    Skipped,
}

impl EventOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            EventOutcome::Delivered { .. } => "delivered",
            EventOutcome::Rejected { .. } => "rejected",
            EventOutcome::Failed { .. } => "failed",
            EventOutcome::Skipped => "skipped",
        }
    }
}

impl Display for EventOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            EventOutcome::Rejected { reason } | EventOutcome::Failed { reason } => {
                write!(f, "{}: {}", self.label(), reason)
            }
            _ => write!(f, "{}", self.label()),
        }
    }
}
