use async_trait::async_trait;
use serde_json::json;

use crate::{
    config::Config,
    errors::ProcessingError,
    models::{delivery::PersonalizationMap, event::NotificationEvent},
    queries::QueryServices,
    scenarios::{NotificationScenario, PreparedData, base_personalization, prepare_case_data},
};

/// The status of an existing case changed.
pub struct CaseStatusUpdatedScenario;

impl CaseStatusUpdatedScenario {
    /// Status-change notifications additionally carry the description of
    /// the status that triggered the event.
    fn with_status(data: &PreparedData) -> PersonalizationMap {
        let mut map = base_personalization(data);

        let description = data
            .latest_status
            .as_ref()
            .and_then(|s| s.description.clone())
            .unwrap_or_default();
        map.insert("status.omschrijving".to_string(), json!(description));

        map
    }
}

#[async_trait]
impl NotificationScenario for CaseStatusUpdatedScenario {
    fn whitelist_name(&self) -> &'static str {
        "zaak_update"
    }

    fn email_template_id(&self, config: &Config) -> Result<String, ProcessingError> {
        Config::require_template(
            &config.zaak_update_email_template_id,
            "ZAAK_UPDATE_EMAIL_TEMPLATE_ID",
        )
    }

    fn sms_template_id(&self, config: &Config) -> Result<String, ProcessingError> {
        Config::require_template(
            &config.zaak_update_sms_template_id,
            "ZAAK_UPDATE_SMS_TEMPLATE_ID",
        )
    }

    async fn prepare_data(
        &self,
        queries: &QueryServices,
        config: &Config,
        event: &NotificationEvent,
    ) -> Result<PreparedData, ProcessingError> {
        prepare_case_data(queries, config, event, self.whitelist_name()).await
    }

    fn email_personalization(&self, data: &PreparedData) -> PersonalizationMap {
        Self::with_status(data)
    }

    fn sms_personalization(&self, data: &PreparedData) -> PersonalizationMap {
        Self::with_status(data)
    }
}
