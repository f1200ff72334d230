use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    clients::{http_client, status_error, transport_error},
    config::Config,
    errors::ProcessingError,
    models::{
        delivery::{DeliveryReceipt, PersonalizationMap, Template},
        event::NotificationChannel,
    },
};

const SERVICE: &str = "delivery provider";

#[async_trait]
pub trait DeliveryProvider: Send + Sync {
    async fn list_templates(
        &self,
        channel: NotificationChannel,
    ) -> Result<Vec<Template>, ProcessingError>;

    /// Exactly one delivery attempt. No internal retry: retrying here could
    /// send the same notification twice.
    async fn send(
        &self,
        channel: NotificationChannel,
        address: &str,
        template_id: &str,
        personalization: &PersonalizationMap,
    ) -> Result<DeliveryReceipt, ProcessingError>;
}

pub struct NotifyDeliveryClient {
    http_client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    email_address: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<&'a str>,

    template_id: &'a str,

    // An empty personalization map means "send without personalization",
    // so the field is omitted entirely.
    #[serde(skip_serializing_if = "Option::is_none")]
    personalisation: Option<&'a PersonalizationMap>,
}

#[derive(Deserialize)]
struct SendResponse {
    id: Uuid,
}

#[derive(Deserialize)]
struct TemplateListResponse {
    templates: Vec<Template>,
}

impl NotifyDeliveryClient {
    pub fn new(config: &Config) -> Result<Self, ProcessingError> {
        info!(base_url = %config.delivery_api_url, "Delivery provider client initialized");

        Ok(Self {
            http_client: http_client(config.upstream_timeout_seconds)?,
            base_url: config.delivery_api_url.clone(),
            api_key: config.delivery_api_key.clone(),
        })
    }
}

#[async_trait]
impl DeliveryProvider for NotifyDeliveryClient {
    async fn list_templates(
        &self,
        channel: NotificationChannel,
    ) -> Result<Vec<Template>, ProcessingError> {
        let url = format!("{}/v2/templates?type={}", self.base_url, channel);

        debug!(%channel, "Listing delivery templates");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(SERVICE, status, &channel.to_string()));
        }

        let listing: TemplateListResponse =
            response
                .json()
                .await
                .map_err(|e| ProcessingError::MalformedResponse {
                    service: SERVICE,
                    detail: e.to_string(),
                })?;

        Ok(listing.templates)
    }

    async fn send(
        &self,
        channel: NotificationChannel,
        address: &str,
        template_id: &str,
        personalization: &PersonalizationMap,
    ) -> Result<DeliveryReceipt, ProcessingError> {
        let url = format!("{}/v2/notifications/{}", self.base_url, channel);

        let request = SendRequest {
            email_address: (channel == NotificationChannel::Email).then_some(address),
            phone_number: (channel == NotificationChannel::Sms).then_some(address),
            template_id,
            personalisation: (!personalization.is_empty()).then_some(personalization),
        };

        debug!(%channel, template_id, "Sending notification");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProcessingError::DeliveryFailed(e.to_string()))?;

        let status = response.status();

        if status.is_success() {
            let accepted: SendResponse = response
                .json()
                .await
                .map_err(|e| ProcessingError::DeliveryFailed(e.to_string()))?;

            info!(%channel, template_id, delivery_id = %accepted.id, "Notification accepted by provider");

            Ok(DeliveryReceipt {
                id: accepted.id,
                channel,
                template_id: template_id.to_string(),
            })
        } else if status.is_client_error() {
            let detail = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ProcessingError::DeliveryRejected(detail))
        } else {
            Err(ProcessingError::DeliveryFailed(format!("status {}", status)))
        }
    }
}
