use thiserror::Error;

use crate::models::event::{EventAction, SubjectType};

/// Everything that can stop one event from being delivered. Variants map
/// onto the three terminal outcomes: business rejections, a skipped
/// scenario, and technical failures.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("missing or invalid configuration: {0}")]
    Configuration(String),

    #[error("no scenario mapped for {subject}/{action}")]
    UnsupportedScenario {
        subject: SubjectType,
        action: EventAction,
    },

    #[error("{service} unavailable: {detail}")]
    UpstreamUnavailable {
        service: &'static str,
        detail: String,
    },

    #[error("{service} has no data for '{reference}'")]
    DataNotFound {
        service: &'static str,
        reference: String,
    },

    #[error("{service} returned a malformed response: {detail}")]
    MalformedResponse {
        service: &'static str,
        detail: String,
    },

    #[error("case type '{case_type_id}' is not on whitelist '{whitelist}'")]
    NotWhitelisted {
        case_type_id: String,
        whitelist: &'static str,
    },

    #[error("notifications are disabled for case type '{case_type_id}'")]
    NotificationsDisabled { case_type_id: String },

    #[error("delivery provider failed: {0}")]
    DeliveryFailed(String),

    #[error("delivery provider rejected the request: {0}")]
    DeliveryRejected(String),

    #[error("completion reporting failed: {0}")]
    TelemetryFailed(String),
}

impl ProcessingError {
    /// Business rejections are expected behavior, not technical failures.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ProcessingError::NotWhitelisted { .. } | ProcessingError::NotificationsDisabled { .. }
        )
    }
}
