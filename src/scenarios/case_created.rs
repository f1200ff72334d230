use async_trait::async_trait;

use crate::{
    config::Config,
    errors::ProcessingError,
    models::{delivery::PersonalizationMap, event::NotificationEvent},
    queries::QueryServices,
    scenarios::{NotificationScenario, PreparedData, base_personalization, prepare_case_data},
};

/// A new case was registered for the citizen.
pub struct CaseCreatedScenario;

#[async_trait]
impl NotificationScenario for CaseCreatedScenario {
    fn whitelist_name(&self) -> &'static str {
        "zaak_create"
    }

    fn email_template_id(&self, config: &Config) -> Result<String, ProcessingError> {
        Config::require_template(
            &config.zaak_create_email_template_id,
            "ZAAK_CREATE_EMAIL_TEMPLATE_ID",
        )
    }

    fn sms_template_id(&self, config: &Config) -> Result<String, ProcessingError> {
        Config::require_template(
            &config.zaak_create_sms_template_id,
            "ZAAK_CREATE_SMS_TEMPLATE_ID",
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
        base_personalization(data)
    }

    fn sms_personalization(&self, data: &PreparedData) -> PersonalizationMap {
        base_personalization(data)
    }
}
