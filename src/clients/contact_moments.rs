use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    clients::http_client,
    config::Config,
    errors::ProcessingError,
    models::{
        delivery::ContactMoment,
        event::{NotificationChannel, NotificationEvent},
    },
};

#[async_trait]
pub trait CompletionSink: Send + Sync {
    /// Registers the terminal outcome of one event with the originating
    /// system so it does not re-deliver the event.
    async fn report_completion(
        &self,
        event: &NotificationEvent,
        channel: Option<NotificationChannel>,
        outcome: &str,
    ) -> Result<ContactMoment, ProcessingError>;
}

pub struct HttpCompletionSink {
    http_client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct ContactMomentRequest<'a> {
    #[serde(rename = "kanaal")]
    channel: &'a str,

    #[serde(rename = "tekst")]
    text: String,

    #[serde(rename = "registratiedatum")]
    registered_at: String,
}

impl HttpCompletionSink {
    pub fn new(config: &Config) -> Result<Self, ProcessingError> {
        info!(base_url = %config.contact_registry_url, "Completion sink client initialized");

        Ok(Self {
            http_client: http_client(config.upstream_timeout_seconds)?,
            base_url: config.contact_registry_url.clone(),
        })
    }
}

#[async_trait]
impl CompletionSink for HttpCompletionSink {
    async fn report_completion(
        &self,
        event: &NotificationEvent,
        channel: Option<NotificationChannel>,
        outcome: &str,
    ) -> Result<ContactMoment, ProcessingError> {
        let url = format!("{}/contactmomenten", self.base_url);

        let request = ContactMomentRequest {
            channel: channel.map_or("none", |c| match c {
                NotificationChannel::Email => "email",
                NotificationChannel::Sms => "sms",
            }),
            text: format!(
                "Notification processing for case '{}' finished: {}",
                event.case_ref, outcome
            ),
            registered_at: Utc::now().to_rfc3339(),
        };

        debug!(case_ref = %event.case_ref, outcome, "Reporting completion");

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProcessingError::TelemetryFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProcessingError::TelemetryFailed(format!(
                "status {}",
                status
            )));
        }

        response
            .json::<ContactMoment>()
            .await
            .map_err(|e| ProcessingError::TelemetryFailed(e.to_string()))
    }
}
