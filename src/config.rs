use anyhow::{Error, Result, anyhow};
use dotenvy::dotenv;
use serde::Deserialize;

use crate::errors::ProcessingError;

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    pub case_registry_url: String,
    pub party_registry_url: String,
    pub delivery_api_url: String,
    pub delivery_api_key: String,
    pub contact_registry_url: String,

    pub upstream_timeout_seconds: u64,

    pub zaak_create_email_template_id: Option<String>,
    pub zaak_create_sms_template_id: Option<String>,
    #[serde(default)]
    pub zaak_create_whitelist: Vec<String>,

    pub zaak_update_email_template_id: Option<String>,
    pub zaak_update_sms_template_id: Option<String>,
    #[serde(default)]
    pub zaak_update_whitelist: Vec<String>,

    pub zaak_close_email_template_id: Option<String>,
    pub zaak_close_sms_template_id: Option<String>,
    #[serde(default)]
    pub zaak_close_whitelist: Vec<String>,
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        let config = envy::from_env::<Self>()
            .map_err(|e| anyhow!("Invalid or missing environmental variable: {}", e))?;
        Ok(config)
    }

    /// Allow-list of case-type identifications for a scenario's whitelist
    /// name. Unknown names resolve to an empty list, which permits nothing.
    pub fn allow_list(&self, whitelist_name: &str) -> &[String] {
        match whitelist_name {
            "zaak_create" => &self.zaak_create_whitelist,
            "zaak_update" => &self.zaak_update_whitelist,
            "zaak_close" => &self.zaak_close_whitelist,
            _ => &[],
        }
    }

    /// Resolves an optional template id, turning its absence into a
    /// per-event configuration error rather than a startup failure.
    pub fn require_template(
        value: &Option<String>,
        key: &'static str,
    ) -> Result<String, ProcessingError> {
        value
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| ProcessingError::Configuration(key.to_string()))
    }
}
