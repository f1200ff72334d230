use async_trait::async_trait;
use serde_json::json;

use crate::{
    config::Config,
    errors::ProcessingError,
    models::{delivery::PersonalizationMap, event::NotificationEvent},
    queries::QueryServices,
    scenarios::{NotificationScenario, PreparedData, base_personalization, prepare_case_data},
};

/// A case reached its final status and was closed.
pub struct CaseClosedScenario;

impl CaseClosedScenario {
    fn with_result(data: &PreparedData) -> PersonalizationMap {
        let mut map = base_personalization(data);

        let result = data
            .latest_status
            .as_ref()
            .and_then(|s| s.description.clone())
            .unwrap_or_default();
        map.insert("zaak.resultaat".to_string(), json!(result));

        map
    }
}

#[async_trait]
impl NotificationScenario for CaseClosedScenario {
    fn whitelist_name(&self) -> &'static str {
        "zaak_close"
    }

    fn email_template_id(&self, config: &Config) -> Result<String, ProcessingError> {
        Config::require_template(
            &config.zaak_close_email_template_id,
            "ZAAK_CLOSE_EMAIL_TEMPLATE_ID",
        )
    }

    fn sms_template_id(&self, config: &Config) -> Result<String, ProcessingError> {
        Config::require_template(
            &config.zaak_close_sms_template_id,
            "ZAAK_CLOSE_SMS_TEMPLATE_ID",
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
        Self::with_result(data)
    }

    fn sms_personalization(&self, data: &PreparedData) -> PersonalizationMap {
        Self::with_result(data)
    }
}
