use tracing::debug;

use crate::{errors::ProcessingError, models::case::CaseType};

/// Hard stop when the case type is not on the scenario's configured
/// allow-list. Not a retry candidate.
pub fn validate_whitelisted(
    allow_list: &[String],
    case_type_id: &str,
    whitelist_name: &'static str,
) -> Result<(), ProcessingError> {
    if allow_list.iter().any(|id| id == case_type_id) {
        debug!(case_type_id, whitelist_name, "Case type is whitelisted");
        Ok(())
    } else {
        Err(ProcessingError::NotWhitelisted {
            case_type_id: case_type_id.to_string(),
            whitelist: whitelist_name,
        })
    }
}

/// Hard stop when the case type opts out of notifications.
pub fn validate_notify_permitted(case_type: &CaseType) -> Result<(), ProcessingError> {
    if case_type.is_notification_expected {
        Ok(())
    } else {
        Err(ProcessingError::NotificationsDisabled {
            case_type_id: case_type.identification.clone(),
        })
    }
}
